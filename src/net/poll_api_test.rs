use super::*;

fn config() -> ApiConfig {
    ApiConfig::from_values(Some("https://api.test/auth"), Some("https://api.test/polls"))
}

fn draft() -> PollDraft {
    PollDraft { question: "Best editor?".to_owned(), options: vec!["vim".to_owned(), "emacs".to_owned()] }
}

// =============================================================
// Paths
// =============================================================

#[test]
fn poll_paths_resolve_under_polls_base() {
    let config = config();
    assert_eq!(config.polls_url(&poll_path("p1")), "https://api.test/polls/p1");
    assert_eq!(config.polls_url(&vote_path("p1")), "https://api.test/polls/p1/vote");
    assert_eq!(config.polls_url(&remove_vote_path("p1")), "https://api.test/polls/p1/remove-vote");
}

// =============================================================
// Payload
// =============================================================

#[test]
fn payload_carries_draft_and_encoded_images() {
    let image = ImageUpload { file_name: "a.jpg".to_owned(), content_type: "image/jpeg".to_owned(), bytes: b"abc".to_vec() };
    let payload = PollPayload::new(&draft(), &[image]);
    assert_eq!(
        serde_json::to_value(&payload).unwrap(),
        serde_json::json!({
            "question": "Best editor?",
            "options": ["vim", "emacs"],
            "images": [{"base64": "YWJj", "fileName": "a.jpg"}]
        })
    );
}

#[test]
fn payload_without_images_sends_empty_list() {
    let payload = PollPayload::new(&draft(), &[]);
    assert!(payload.images.is_empty());
}

// =============================================================
// Token guard
// =============================================================

#[tokio::test]
async fn protected_calls_require_token() {
    let config = config();
    let err = create_poll(&config, None, &draft(), &[]).await.unwrap_err();
    assert_eq!(err.to_string(), "Authentication required. Please log in to create a poll.");

    let err = delete_poll(&config, Some(""), "p1").await.unwrap_err();
    assert_eq!(err, ApiError::Unauthenticated { action: "delete a poll" });

    assert!(matches!(my_polls(&config, None).await, Err(ApiError::Unauthenticated { .. })));
    assert!(matches!(voted_polls(&config, None).await, Err(ApiError::Unauthenticated { .. })));
    assert!(matches!(update_poll(&config, None, "p1", &draft(), &[]).await, Err(ApiError::Unauthenticated { .. })));
    assert!(matches!(remove_vote(&config, None, "p1", "o1").await, Err(ApiError::Unauthenticated { .. })));
}

#[cfg(not(feature = "hydrate"))]
#[tokio::test]
async fn anonymous_vote_reaches_transport() {
    let err = vote(&config(), None, "p1", "o1").await.unwrap_err();
    assert_eq!(err, ApiError::Unavailable);
}
