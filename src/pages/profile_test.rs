use super::*;

fn alice() -> User {
    User::new("u1", "alice", "a@x.com")
}

#[test]
fn unchanged_fields_are_omitted() {
    let update = profile_changes(&alice(), "alice", " a@x.com ");
    assert_eq!(update, ProfileUpdate::default());
    assert!(!has_pending_changes(&update, false, false));
}

#[test]
fn changed_fields_are_trimmed() {
    let update = profile_changes(&alice(), "  alicia ", "a@x.com");
    assert_eq!(update.username.as_deref(), Some("alicia"));
    assert_eq!(update.email, None);
    assert!(has_pending_changes(&update, false, false));
}

#[test]
fn image_actions_count_as_changes() {
    let update = ProfileUpdate::default();
    assert!(has_pending_changes(&update, true, false));
    assert!(has_pending_changes(&update, false, true));
}
