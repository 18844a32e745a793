//! Image upload checks and encoding.
//!
//! Poll images travel as base64 JSON, profile images as multipart file parts.
//! Both start life as an `ImageUpload` read out of a file input.

#[cfg(test)]
#[path = "upload_test.rs"]
mod upload_test;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;

/// Largest accepted poll image.
pub const POLL_IMAGE_MAX_BYTES: u64 = 5 * 1024 * 1024;
/// Largest accepted profile image.
pub const PROFILE_IMAGE_MAX_BYTES: u64 = 2 * 1024 * 1024;
/// Images per poll.
pub const POLL_IMAGE_LIMIT: usize = 5;
pub const ALLOWED_IMAGE_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/gif"];

/// A file picked by the user, fully read into memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Poll image as the create/update endpoints expect it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EncodedImage {
    pub base64: String,
    #[serde(rename = "fileName")]
    pub file_name: String,
}

impl ImageUpload {
    /// Base64 body without a data-URL prefix.
    pub fn encode(&self) -> EncodedImage {
        EncodedImage { base64: STANDARD.encode(&self.bytes), file_name: self.file_name.clone() }
    }

    /// Check type and size against `max_bytes`.
    ///
    /// # Errors
    ///
    /// Returns the first rule this file breaks.
    pub fn check(&self, max_bytes: u64) -> Result<(), UploadError> {
        check_image(&self.file_name, &self.content_type, self.bytes.len() as u64, max_bytes)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    #[error("File \"{name}\" is not an allowed image type (JPEG, PNG, GIF).")]
    UnsupportedType { name: String },
    #[error("File \"{name}\" exceeds the {limit_mb}MB size limit.")]
    TooLarge { name: String, limit_mb: u64 },
    #[error("You can upload a maximum of {limit} images.")]
    TooMany { limit: usize },
}

/// Validate one file's metadata before reading it.
///
/// # Errors
///
/// Returns `UnsupportedType` or `TooLarge`.
pub fn check_image(name: &str, content_type: &str, size: u64, max_bytes: u64) -> Result<(), UploadError> {
    if !ALLOWED_IMAGE_TYPES.contains(&content_type) {
        return Err(UploadError::UnsupportedType { name: name.to_owned() });
    }
    if size > max_bytes {
        return Err(UploadError::TooLarge { name: name.to_owned(), limit_mb: max_bytes / (1024 * 1024) });
    }
    Ok(())
}

/// Ensure adding `incoming` images keeps the poll within its limit.
///
/// # Errors
///
/// Returns `TooMany` when the total would exceed `POLL_IMAGE_LIMIT`.
pub fn check_image_count(existing: usize, incoming: usize) -> Result<(), UploadError> {
    if existing + incoming > POLL_IMAGE_LIMIT {
        return Err(UploadError::TooMany { limit: POLL_IMAGE_LIMIT });
    }
    Ok(())
}

/// Files selected in the `<input type="file">` that fired `ev`.
#[cfg(feature = "hydrate")]
pub fn selected_files(ev: &leptos::ev::Event) -> Vec<web_sys::File> {
    let input = leptos::prelude::event_target::<web_sys::HtmlInputElement>(ev);
    let Some(list) = input.files() else {
        return Vec::new();
    };
    (0..list.length()).filter_map(|i| list.get(i)).collect()
}

/// Read a browser file into memory.
///
/// # Errors
///
/// Returns a description of the JS failure if the file cannot be read.
#[cfg(feature = "hydrate")]
pub async fn read_file(file: &web_sys::File) -> Result<ImageUpload, String> {
    let buffer = wasm_bindgen_futures::JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| format!("{e:?}"))?;
    Ok(ImageUpload {
        file_name: file.name(),
        content_type: file.type_(),
        bytes: js_sys::Uint8Array::new(&buffer).to_vec(),
    })
}

/// Check and read every selected file, stopping at the first rejection.
///
/// # Errors
///
/// Returns the user-facing message for the first file that fails.
#[cfg(feature = "hydrate")]
pub async fn read_images(files: Vec<web_sys::File>, existing: usize, max_bytes: u64) -> Result<Vec<ImageUpload>, String> {
    check_image_count(existing, files.len()).map_err(|e| e.to_string())?;
    let mut uploads = Vec::with_capacity(files.len());
    for file in files {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let size = file.size() as u64;
        check_image(&file.name(), &file.type_(), size, max_bytes).map_err(|e| e.to_string())?;
        uploads.push(read_file(&file).await?);
    }
    Ok(uploads)
}
