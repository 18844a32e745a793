use super::*;

fn image(name: &str) -> ImageUpload {
    ImageUpload { file_name: name.to_owned(), content_type: "image/png".to_owned(), bytes: vec![1, 2, 3] }
}

fn draft() -> PollDraft {
    PollDraft { question: " Pizza? ".to_owned(), options: vec!["yes".to_owned(), " no ".to_owned(), String::new()] }
}

#[test]
fn submission_returns_clean_draft() {
    let clean = submission(&draft(), &[image("a.png")]).unwrap();
    assert_eq!(clean.question, "Pizza?");
    assert_eq!(clean.options, vec!["yes".to_owned(), "no".to_owned()]);
}

#[test]
fn submission_requires_an_image() {
    let err = submission(&draft(), &[]).unwrap_err();
    assert_eq!(err, "Please upload at least one image for the poll.");
}

#[test]
fn submission_caps_image_count() {
    let many: Vec<ImageUpload> = (0..=POLL_IMAGE_LIMIT).map(|i| image(&format!("{i}.png"))).collect();
    let err = submission(&draft(), &many).unwrap_err();
    assert_eq!(err, "You can upload a maximum of 5 images.");
}

#[test]
fn submission_rejects_unsupported_image() {
    let mut pdf = image("doc.pdf");
    pdf.content_type = "application/pdf".to_owned();
    assert!(submission(&draft(), &[pdf]).is_err());
}

#[test]
fn submission_reports_draft_errors_first() {
    let bad = PollDraft { question: String::new(), options: vec![] };
    assert_eq!(submission(&bad, &[]).unwrap_err(), "Poll question cannot be empty.");
}
