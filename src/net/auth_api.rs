//! Auth REST client: login, registration, profile, password reset.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR): stubs returning `ApiError::Unavailable`, since these
//! endpoints are only called from browser event handlers.
//!
//! ERROR HANDLING
//! ==============
//! Each call carries its own fallback sentence for when the backend gives no
//! `message`. Successful login/registration responses that lack the token or
//! user are failures too; the session must never receive half a credential.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "auth_api_test.rs"]
mod auth_api_test;

use super::error::ApiError;
use super::http::MultipartForm;
use super::types::{Ack, AuthPayload, OtpVerification, ProfileUpdate, User};
use crate::config::ApiConfig;
use crate::util::upload::ImageUpload;

#[cfg(feature = "hydrate")]
use super::http::{AuthHeader, send, send_unit, with_auth};
#[cfg(feature = "hydrate")]
use super::types::Envelope;

const LOGIN_FAILED: &str = "Login failed due to an unexpected error.";
const LOGIN_INCOMPLETE: &str = "Login response did not contain token or user data.";
const REGISTER_FAILED: &str = "Registration failed due to an unexpected error.";
const REGISTER_INCOMPLETE: &str = "Registration response did not contain token or user data.";
const CURRENT_USER_FAILED: &str = "Failed to fetch user data. Please log in again.";
const PROFILE_FAILED: &str = "Failed to update profile.";
const FORGOT_FAILED: &str = "Failed to send password reset email.";
const VERIFY_FAILED: &str = "OTP verification failed.";
const RESET_FAILED: &str = "Password reset failed.";
const LOGOUT_FAILED: &str = "Logout failed.";

/// Split a login/registration body into the pair the session stores.
///
/// # Errors
///
/// Returns `ApiError::MissingField` with `incomplete` when either half is absent.
pub fn credentials_from(payload: AuthPayload, incomplete: &'static str) -> Result<(String, User), ApiError> {
    match (payload.token.filter(|t| !t.is_empty()), payload.user) {
        (Some(token), Some(user)) => Ok((token, user)),
        _ => Err(ApiError::MissingField(incomplete)),
    }
}

/// Multipart body for `POST /register`.
pub fn register_form(username: &str, email: &str, password: &str, image: Option<ImageUpload>) -> MultipartForm {
    MultipartForm::default()
        .field("username", username)
        .field("email", email)
        .field("password", password)
        .file("profileImage", image)
}

/// Multipart body for `PUT /profile`. Only fields being changed are sent.
pub fn profile_form(update: &ProfileUpdate, image: Option<ImageUpload>, clear_image: bool) -> MultipartForm {
    let mut form = MultipartForm::default();
    if let Some(username) = &update.username {
        form = form.field("username", username.as_str());
    }
    if let Some(email) = &update.email {
        form = form.field("email", email.as_str());
    }
    if clear_image {
        form = form.field("clearProfileImage", "true");
    }
    form.file("profileImage", image)
}

/// Exchange email and password for a token and user via `POST /login`.
///
/// # Errors
///
/// Returns an error if the request fails or the response is incomplete.
pub async fn login(config: &ApiConfig, email: &str, password: &str) -> Result<(String, User), ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let payload = serde_json::json!({ "email": email, "password": password });
        let request = gloo_net::http::Request::post(&config.auth_url("login")).json(&payload);
        let body: AuthPayload = send(request, LOGIN_FAILED).await?;
        credentials_from(body, LOGIN_INCOMPLETE)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (config, email, password, LOGIN_FAILED, LOGIN_INCOMPLETE);
        Err(ApiError::Unavailable)
    }
}

/// Create an account via multipart `POST /register`.
///
/// # Errors
///
/// Returns an error if the request fails or the response is incomplete.
pub async fn register(
    config: &ApiConfig,
    username: &str,
    email: &str,
    password: &str,
    image: Option<ImageUpload>,
) -> Result<(String, User), ApiError> {
    let form = register_form(username, email, password, image);
    #[cfg(feature = "hydrate")]
    {
        let data = form.to_form_data()?;
        let request = gloo_net::http::Request::post(&config.auth_url("register")).body(data);
        let body: AuthPayload = send(request, REGISTER_FAILED).await?;
        credentials_from(body, REGISTER_INCOMPLETE)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (config, form, REGISTER_FAILED, REGISTER_INCOMPLETE);
        Err(ApiError::Unavailable)
    }
}

/// Fetch the user owning `token` via `GET /user`.
///
/// # Errors
///
/// Returns an error if the request fails or the body has no `data`.
pub async fn current_user(config: &ApiConfig, token: &str) -> Result<User, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let builder = with_auth(gloo_net::http::Request::get(&config.auth_url("user")), AuthHeader::XAuthToken(token));
        let body: Envelope<User> = send(builder.build(), CURRENT_USER_FAILED).await?;
        body.data.ok_or(ApiError::MissingField(CURRENT_USER_FAILED))
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (config, token, CURRENT_USER_FAILED);
        Err(ApiError::Unavailable)
    }
}

/// Update username/email and optionally replace or clear the profile image
/// via multipart `PUT /profile`. Returns the updated user.
///
/// # Errors
///
/// Returns an error if the request fails or the body has no `data`.
pub async fn update_profile(
    config: &ApiConfig,
    token: &str,
    update: &ProfileUpdate,
    image: Option<ImageUpload>,
    clear_image: bool,
) -> Result<User, ApiError> {
    let form = profile_form(update, image, clear_image);
    #[cfg(feature = "hydrate")]
    {
        let data = form.to_form_data()?;
        let builder = with_auth(gloo_net::http::Request::put(&config.auth_url("profile")), AuthHeader::Raw(token));
        let body: Envelope<User> = send(builder.body(data), PROFILE_FAILED).await?;
        body.data.ok_or(ApiError::MissingField(PROFILE_FAILED))
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (config, token, form, PROFILE_FAILED);
        Err(ApiError::Unavailable)
    }
}

/// Ask the backend to email a one-time password via `POST /forgotpassword`.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn forgot_password(config: &ApiConfig, email: &str) -> Result<Ack, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let payload = serde_json::json!({ "email": email });
        let request = gloo_net::http::Request::post(&config.auth_url("forgotpassword")).json(&payload);
        send(request, FORGOT_FAILED).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (config, email, FORGOT_FAILED);
        Err(ApiError::Unavailable)
    }
}

/// Trade an emailed OTP for a password-change token via `POST /verify-otp`.
///
/// # Errors
///
/// Returns an error if the request fails or the OTP is rejected.
pub async fn verify_otp(config: &ApiConfig, email: &str, otp: &str) -> Result<OtpVerification, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let payload = serde_json::json!({ "email": email, "otp": otp });
        let request = gloo_net::http::Request::post(&config.auth_url("verify-otp")).json(&payload);
        send(request, VERIFY_FAILED).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (config, email, otp, VERIFY_FAILED);
        Err(ApiError::Unavailable)
    }
}

/// Set a new password via `PUT /resetpassword`. The response may carry a
/// fresh token and user, which callers feed into the session.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn reset_password(config: &ApiConfig, password: &str, change_token: &str) -> Result<AuthPayload, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let payload = serde_json::json!({ "password": password, "passwordChangeToken": change_token });
        let request = gloo_net::http::Request::put(&config.auth_url("resetpassword")).json(&payload);
        send(request, RESET_FAILED).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (config, password, change_token, RESET_FAILED);
        Err(ApiError::Unavailable)
    }
}

/// Invalidate `token` server-side via `POST /logout`.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn logout(config: &ApiConfig, token: &str) -> Result<(), ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let builder = with_auth(gloo_net::http::Request::post(&config.auth_url("logout")), AuthHeader::XAuthToken(token));
        send_unit(builder.json(&serde_json::json!({})), LOGOUT_FAILED).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (config, token, LOGOUT_FAILED);
        Err(ApiError::Unavailable)
    }
}
