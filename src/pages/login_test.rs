use super::*;

#[test]
fn registration_input_trims_identity_fields() {
    let (username, email) = registration_input("  alice ", " a@x.com ", "pw", "pw").unwrap();
    assert_eq!(username, "alice");
    assert_eq!(email, "a@x.com");
}

#[test]
fn registration_input_requires_all_fields() {
    let err = registration_input("alice", "   ", "pw", "pw").unwrap_err();
    assert_eq!(err, "Username, email, and password are required.");
    assert!(registration_input("alice", "a@x.com", "", "").is_err());
}

#[test]
fn registration_input_rejects_mismatched_confirmation() {
    let err = registration_input("alice", "a@x.com", "pw1", "pw2").unwrap_err();
    assert_eq!(err, "Passwords do not match.");
}

#[test]
fn modes_have_distinct_headings() {
    let headings = [AuthMode::Login, AuthMode::Register, AuthMode::ResetPassword].map(AuthMode::heading);
    assert_eq!(headings, ["Welcome back", "Create an account", "Reset your password"]);
}
