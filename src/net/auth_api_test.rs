use super::*;
use serde_json::json;

fn payload(value: serde_json::Value) -> AuthPayload {
    serde_json::from_value(value).unwrap()
}

// =============================================================
// credentials_from
// =============================================================

#[test]
fn credentials_from_complete_payload() {
    let (token, user) =
        credentials_from(payload(json!({"token": "t1", "user": {"_id": "u1", "username": "a"}})), LOGIN_INCOMPLETE).unwrap();
    assert_eq!(token, "t1");
    assert_eq!(user.id, "u1");
}

#[test]
fn credentials_from_missing_user_fails() {
    let err = credentials_from(payload(json!({"token": "t1"})), LOGIN_INCOMPLETE).unwrap_err();
    assert_eq!(err.to_string(), "Login response did not contain token or user data.");
}

#[test]
fn credentials_from_empty_token_fails() {
    let err = credentials_from(payload(json!({"token": "", "user": {"id": "u1"}})), REGISTER_INCOMPLETE).unwrap_err();
    assert_eq!(err.to_string(), "Registration response did not contain token or user data.");
}

// =============================================================
// Multipart bodies
// =============================================================

#[test]
fn register_form_has_credentials_and_optional_image() {
    let form = register_form("alice", "a@x.com", "secret", None);
    assert_eq!(form.get("username"), Some("alice"));
    assert_eq!(form.get("email"), Some("a@x.com"));
    assert_eq!(form.get("password"), Some("secret"));
    assert!(form.file.is_none());
}

#[test]
fn profile_form_sends_only_changed_fields() {
    let update = ProfileUpdate { username: Some("bob".to_owned()), email: None };
    let form = profile_form(&update, None, false);
    assert_eq!(form.fields, vec![("username", "bob".to_owned())]);
}

#[test]
fn profile_form_flags_image_clear() {
    let form = profile_form(&ProfileUpdate::default(), None, true);
    assert_eq!(form.get("clearProfileImage"), Some("true"));
}

#[test]
fn profile_form_attaches_new_image() {
    let image = ImageUpload {
        file_name: "me.gif".to_owned(),
        content_type: "image/gif".to_owned(),
        bytes: vec![7],
    };
    let form = profile_form(&ProfileUpdate::default(), Some(image), false);
    assert_eq!(form.file.as_ref().map(|(name, _)| *name), Some("profileImage"));
}

// =============================================================
// Server-side stubs
// =============================================================

#[cfg(not(feature = "hydrate"))]
#[tokio::test]
async fn stubs_report_unavailable_off_browser() {
    let config = ApiConfig::default();
    assert_eq!(login(&config, "a@x.com", "pw").await, Err(ApiError::Unavailable));
    assert_eq!(current_user(&config, "t1").await, Err(ApiError::Unavailable));
    assert_eq!(logout(&config, "t1").await, Err(ApiError::Unavailable));
}
