use super::*;
use serde_json::json;

// =============================================================
// User normalization
// =============================================================

#[test]
fn user_maps_upstream_id_to_id() {
    let user: User = serde_json::from_value(json!({"_id": "u1", "username": "a"})).unwrap();
    assert_eq!(user.id, "u1");
    assert_eq!(user.upstream_id.as_deref(), Some("u1"));
    assert_eq!(user.username, "a");
    assert_eq!(user.email, "");
}

#[test]
fn user_prefers_existing_id_over_upstream_id() {
    let user: User = serde_json::from_value(json!({"id": "canonical", "_id": "mongo"})).unwrap();
    assert_eq!(user.id, "canonical");
    assert_eq!(user.upstream_id.as_deref(), Some("mongo"));
}

#[test]
fn user_empty_id_falls_back_to_upstream_id() {
    let user: User = serde_json::from_value(json!({"id": "", "_id": "u9"})).unwrap();
    assert_eq!(user.id, "u9");
}

#[test]
fn user_integer_id_becomes_string() {
    let user: User = serde_json::from_value(json!({"_id": 42})).unwrap();
    assert_eq!(user.id, "42");
}

#[test]
fn user_without_any_id_is_rejected() {
    let err = serde_json::from_value::<User>(json!({"username": "ghost"})).unwrap_err();
    assert!(err.to_string().contains("no id"));
}

#[test]
fn user_keeps_unknown_attributes() {
    let user: User = serde_json::from_value(json!({"_id": "u1", "role": "admin", "createdAt": "2024-01-01"})).unwrap();
    assert_eq!(user.extra.get("role"), Some(&json!("admin")));
    assert_eq!(user.extra.get("createdAt"), Some(&json!("2024-01-01")));
}

#[test]
fn user_serializes_both_identifier_fields() {
    let user: User = serde_json::from_value(json!({"_id": "42", "username": "alice", "email": "a@x.com"})).unwrap();
    assert_eq!(
        serde_json::to_value(&user).unwrap(),
        json!({"id": "42", "_id": "42", "username": "alice", "email": "a@x.com"})
    );
}

#[test]
fn user_profile_image_accepts_string_or_document() {
    let from_string: User = serde_json::from_value(json!({"id": "u1", "profileImage": "/img/a.png"})).unwrap();
    assert_eq!(from_string.profile_image.as_deref(), Some("/img/a.png"));

    let from_doc: User =
        serde_json::from_value(json!({"id": "u1", "profileImage": {"url": "/img/b.png", "public_id": "x"}})).unwrap();
    assert_eq!(from_doc.profile_image.as_deref(), Some("/img/b.png"));

    let empty: User = serde_json::from_value(json!({"id": "u1", "profileImage": ""})).unwrap();
    assert!(empty.profile_image.is_none());
}

#[test]
fn user_normalized_is_idempotent() {
    let mut user = User::new("", "bob", "b@x.com");
    user.upstream_id = Some("u7".to_owned());
    let once = user.normalized();
    let twice = once.clone().normalized();
    assert_eq!(once, twice);
    assert_eq!(twice.id, "u7");
}

#[test]
fn user_storage_round_trip_is_stable() {
    let user: User = serde_json::from_value(json!({"_id": "u1", "username": "a", "bio": "hi"})).unwrap();
    let raw = serde_json::to_string(&user).unwrap();
    let restored: User = serde_json::from_str(&raw).unwrap();
    assert_eq!(restored, user);
}

// =============================================================
// Auth payloads
// =============================================================

#[test]
fn auth_payload_tolerates_missing_fields() {
    let payload: AuthPayload = serde_json::from_value(json!({"token": "t"})).unwrap();
    assert_eq!(payload.token.as_deref(), Some("t"));
    assert!(payload.user.is_none());
}

#[test]
fn otp_verification_reads_change_token() {
    let body: OtpVerification =
        serde_json::from_value(json!({"success": true, "passwordChangeToken": "pct"})).unwrap();
    assert_eq!(body.password_change_token, "pct");
}

// =============================================================
// Polls
// =============================================================

fn poll_json() -> serde_json::Value {
    json!({
        "_id": "p1",
        "question": "Tabs or spaces?",
        "options": [
            {"_id": "o1", "text": "Tabs", "votes": 3, "voters": ["u1", "u2", "u3"]},
            {"_id": "o2", "text": "Spaces", "votes": 1.0, "voters": [{"_id": "u4", "username": "d"}]}
        ],
        "totalVotes": 4,
        "votedBy": ["u1", "u2", "u3", "u4"],
        "createdBy": {"_id": "u1", "username": "alice"},
        "images": [{"url": "https://cdn/x.png"}],
        "createdAt": "2024-05-01T00:00:00Z"
    })
}

#[test]
fn poll_deserializes_backend_shape() {
    let poll: Poll = serde_json::from_value(poll_json()).unwrap();
    assert_eq!(poll.id, "p1");
    assert_eq!(poll.options.len(), 2);
    assert_eq!(poll.options[1].votes, 1);
    assert_eq!(poll.options[1].voters, vec!["u4".to_owned()]);
    assert_eq!(poll.total_votes, 4);
    assert_eq!(poll.voted_by.len(), 4);
    assert_eq!(poll.created_by.as_ref().and_then(|c| c.username.as_deref()), Some("alice"));
    assert_eq!(poll.images[0].url, "https://cdn/x.png");
    assert!(poll.user_vote.is_none());
}

#[test]
fn poll_creator_may_be_bare_id() {
    let mut value = poll_json();
    value["createdBy"] = json!("u1");
    let poll: Poll = serde_json::from_value(value).unwrap();
    assert_eq!(poll.created_by, Some(PollCreator { id: "u1".to_owned(), username: None }));
}

#[test]
fn poll_missing_optional_collections_default_empty() {
    let poll: Poll = serde_json::from_value(json!({"_id": "p2", "question": "Empty?"})).unwrap();
    assert!(poll.options.is_empty());
    assert!(poll.voted_by.is_empty());
    assert!(poll.images.is_empty());
    assert_eq!(poll.total_votes, 0);
    assert!(poll.created_by.is_none());
}

#[test]
fn poll_rejects_fractional_counts() {
    let mut value = poll_json();
    value["totalVotes"] = json!(2.5);
    assert!(serde_json::from_value::<Poll>(value).is_err());
}

#[test]
fn poll_requires_identifier() {
    assert!(serde_json::from_value::<Poll>(json!({"question": "No id"})).is_err());
}

#[test]
fn envelope_unwraps_data_list() {
    let body = json!({"success": true, "count": 1, "data": [poll_json()]});
    let envelope: Envelope<Vec<Poll>> = serde_json::from_value(body).unwrap();
    assert_eq!(envelope.success, Some(true));
    assert_eq!(envelope.data.map(|polls| polls.len()), Some(1));
}
