use super::*;

#[test]
fn no_auth_header_when_anonymous() {
    assert_eq!(AuthHeader::None.header(), None);
}

#[test]
fn x_auth_token_header_carries_raw_token() {
    assert_eq!(AuthHeader::XAuthToken("t1").header(), Some(("x-auth-token", "t1".to_owned())));
}

#[test]
fn raw_authorization_header_has_no_scheme() {
    assert_eq!(AuthHeader::Raw("t1").header(), Some(("Authorization", "t1".to_owned())));
}

#[test]
fn bearer_header_prefixes_scheme() {
    assert_eq!(AuthHeader::Bearer("t1").header(), Some(("Authorization", "Bearer t1".to_owned())));
}

#[test]
fn multipart_form_collects_fields_and_file() {
    let upload = ImageUpload {
        file_name: "me.png".to_owned(),
        content_type: "image/png".to_owned(),
        bytes: vec![1, 2, 3],
    };
    let form = MultipartForm::default()
        .field("username", "alice")
        .field("email", "a@x.com")
        .file("profileImage", Some(upload.clone()));
    assert_eq!(form.get("username"), Some("alice"));
    assert_eq!(form.get("email"), Some("a@x.com"));
    assert_eq!(form.get("password"), None);
    assert_eq!(form.file, Some(("profileImage", upload)));
}

#[test]
fn multipart_form_without_file() {
    let form = MultipartForm::default().field("clearProfileImage", "true").file("profileImage", None);
    assert!(form.file.is_none());
    assert_eq!(form.get("clearProfileImage"), Some("true"));
}
