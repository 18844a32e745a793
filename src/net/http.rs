//! Request plumbing shared by the auth and poll clients.
//!
//! Browser builds send through `gloo-net`; the helpers that touch it are
//! compiled only with `hydrate`. Header selection and multipart layout are
//! plain data so they can be checked natively.

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

use crate::util::upload::ImageUpload;

#[cfg(feature = "hydrate")]
use super::error::{ApiError, check_status, decode_response};

/// How a request carries the session token. The backend accepts different
/// header conventions per route.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthHeader<'a> {
    None,
    /// `x-auth-token: <token>`
    XAuthToken(&'a str),
    /// `Authorization: <token>`
    Raw(&'a str),
    /// `Authorization: Bearer <token>`
    Bearer(&'a str),
}

impl AuthHeader<'_> {
    /// Header name and value to attach, if any.
    pub fn header(&self) -> Option<(&'static str, String)> {
        match *self {
            Self::None => None,
            Self::XAuthToken(token) => Some(("x-auth-token", token.to_owned())),
            Self::Raw(token) => Some(("Authorization", token.to_owned())),
            Self::Bearer(token) => Some(("Authorization", format!("Bearer {token}"))),
        }
    }
}

/// Text fields plus an optional file part for multipart endpoints.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MultipartForm {
    pub fields: Vec<(&'static str, String)>,
    pub file: Option<(&'static str, ImageUpload)>,
}

impl MultipartForm {
    pub fn field(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.fields.push((name, value.into()));
        self
    }

    pub fn file(mut self, name: &'static str, upload: Option<ImageUpload>) -> Self {
        self.file = upload.map(|u| (name, u));
        self
    }

    /// Value of the first field named `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.iter().find(|(k, _)| *k == name).map(|(_, v)| v.as_str())
    }

    #[cfg(feature = "hydrate")]
    pub(crate) fn to_form_data(&self) -> Result<web_sys::FormData, ApiError> {
        let form = web_sys::FormData::new().map_err(js_error)?;
        for (name, value) in &self.fields {
            form.append_with_str(name, value).map_err(js_error)?;
        }
        if let Some((name, upload)) = &self.file {
            let bytes = js_sys::Uint8Array::from(upload.bytes.as_slice());
            let parts = js_sys::Array::of1(&bytes);
            let options = web_sys::BlobPropertyBag::new();
            options.set_type(&upload.content_type);
            let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options).map_err(js_error)?;
            form.append_with_blob_and_filename(name, &blob, &upload.file_name)
                .map_err(js_error)?;
        }
        Ok(form)
    }
}

#[cfg(feature = "hydrate")]
fn js_error(e: wasm_bindgen::JsValue) -> ApiError {
    ApiError::Network(format!("{e:?}"))
}

#[cfg(feature = "hydrate")]
pub(crate) fn network_error(e: gloo_net::Error) -> ApiError {
    ApiError::Network(e.to_string())
}

/// Attach the session header selected by `auth`.
#[cfg(feature = "hydrate")]
pub(crate) fn with_auth(
    builder: gloo_net::http::RequestBuilder,
    auth: AuthHeader<'_>,
) -> gloo_net::http::RequestBuilder {
    match auth.header() {
        Some((name, value)) => builder.header(name, &value),
        None => builder,
    }
}

/// Send a built request and decode its body as `T`.
#[cfg(feature = "hydrate")]
pub(crate) async fn send<T: serde::de::DeserializeOwned>(
    request: Result<gloo_net::http::Request, gloo_net::Error>,
    fallback: &str,
) -> Result<T, ApiError> {
    let resp = request.map_err(network_error)?.send().await.map_err(network_error)?;
    let status = resp.status();
    let body = resp.text().await.map_err(network_error)?;
    decode_response(status, &body, fallback)
}

/// Send a built request where only the status matters.
#[cfg(feature = "hydrate")]
pub(crate) async fn send_unit(
    request: Result<gloo_net::http::Request, gloo_net::Error>,
    fallback: &str,
) -> Result<(), ApiError> {
    let resp = request.map_err(network_error)?.send().await.map_err(network_error)?;
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    check_status(status, &body, fallback)
}
