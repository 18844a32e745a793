use super::*;

fn png(bytes: Vec<u8>) -> ImageUpload {
    ImageUpload { file_name: "chart.png".to_owned(), content_type: "image/png".to_owned(), bytes }
}

#[test]
fn encode_produces_plain_base64_and_file_name() {
    let encoded = png(b"hello".to_vec()).encode();
    assert_eq!(encoded.base64, "aGVsbG8=");
    assert_eq!(encoded.file_name, "chart.png");
    assert_eq!(
        serde_json::to_value(&encoded).unwrap(),
        serde_json::json!({"base64": "aGVsbG8=", "fileName": "chart.png"})
    );
}

#[test]
fn check_image_accepts_allowed_types_within_limit() {
    for ty in ALLOWED_IMAGE_TYPES {
        assert_eq!(check_image("a", ty, 1024, POLL_IMAGE_MAX_BYTES), Ok(()));
    }
}

#[test]
fn check_image_rejects_other_types() {
    let err = check_image("doc.pdf", "application/pdf", 10, POLL_IMAGE_MAX_BYTES).unwrap_err();
    assert_eq!(err.to_string(), "File \"doc.pdf\" is not an allowed image type (JPEG, PNG, GIF).");
}

#[test]
fn check_image_rejects_oversized_file() {
    let err = check_image("big.jpg", "image/jpeg", POLL_IMAGE_MAX_BYTES + 1, POLL_IMAGE_MAX_BYTES).unwrap_err();
    assert_eq!(err.to_string(), "File \"big.jpg\" exceeds the 5MB size limit.");
}

#[test]
fn check_image_allows_exact_limit() {
    assert!(check_image("edge.gif", "image/gif", PROFILE_IMAGE_MAX_BYTES, PROFILE_IMAGE_MAX_BYTES).is_ok());
}

#[test]
fn upload_check_uses_byte_length() {
    assert!(png(vec![0; 10]).check(10).is_ok());
    assert!(matches!(png(vec![0; 11]).check(10), Err(UploadError::TooLarge { .. })));
}

#[test]
fn check_image_count_enforces_poll_limit() {
    assert!(check_image_count(0, POLL_IMAGE_LIMIT).is_ok());
    assert!(check_image_count(3, 2).is_ok());
    assert_eq!(check_image_count(4, 2), Err(UploadError::TooMany { limit: POLL_IMAGE_LIMIT }));
}
