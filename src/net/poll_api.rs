//! Poll REST client: CRUD, voting, and per-user listings.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net` with
//! `Authorization: Bearer <token>`.
//! Server-side (SSR): stubs returning `ApiError::Unavailable`.
//!
//! Callers pass the session token they hold; protected operations reject a
//! missing token before touching the network.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "poll_api_test.rs"]
mod poll_api_test;

use serde::Serialize;

use super::error::{ApiError, require_token};
use super::types::{Ack, Poll};
use crate::config::ApiConfig;
use crate::state::polls::PollDraft;
use crate::util::upload::{EncodedImage, ImageUpload};

#[cfg(feature = "hydrate")]
use super::http::{AuthHeader, send, with_auth};
#[cfg(feature = "hydrate")]
use super::types::Envelope;

/// JSON body for create and update.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PollPayload {
    pub question: String,
    pub options: Vec<String>,
    pub images: Vec<EncodedImage>,
}

impl PollPayload {
    pub fn new(draft: &PollDraft, images: &[ImageUpload]) -> Self {
        Self {
            question: draft.question.clone(),
            options: draft.options.clone(),
            images: images.iter().map(ImageUpload::encode).collect(),
        }
    }
}

pub(crate) fn poll_path(poll_id: &str) -> String {
    poll_id.to_owned()
}

pub(crate) fn vote_path(poll_id: &str) -> String {
    format!("{poll_id}/vote")
}

pub(crate) fn remove_vote_path(poll_id: &str) -> String {
    format!("{poll_id}/remove-vote")
}

#[cfg(feature = "hydrate")]
fn envelope_data<T>(body: Envelope<T>, fallback: &'static str) -> Result<T, ApiError> {
    body.data.ok_or(ApiError::MissingField(fallback))
}

/// Create a poll via `POST /create`.
///
/// # Errors
///
/// Returns `Unauthenticated` without a token, or the request failure.
pub async fn create_poll(
    config: &ApiConfig,
    token: Option<&str>,
    draft: &PollDraft,
    images: &[ImageUpload],
) -> Result<Poll, ApiError> {
    const FAILED: &str = "Failed to create poll. Please try again.";
    let token = require_token(token, "create a poll")?;
    let payload = PollPayload::new(draft, images);
    #[cfg(feature = "hydrate")]
    {
        let builder = with_auth(gloo_net::http::Request::post(&config.polls_url("create")), AuthHeader::Bearer(token));
        envelope_data(send(builder.json(&payload), FAILED).await?, FAILED)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (config, token, payload, FAILED);
        Err(ApiError::Unavailable)
    }
}

/// Fetch every poll via `GET /`.
///
/// # Errors
///
/// Returns the request failure.
pub async fn all_polls(config: &ApiConfig) -> Result<Vec<Poll>, ApiError> {
    const FAILED: &str = "Failed to fetch polls.";
    #[cfg(feature = "hydrate")]
    {
        let request = gloo_net::http::Request::get(&config.polls_url("")).build();
        envelope_data(send(request, FAILED).await?, FAILED)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (config, FAILED);
        Err(ApiError::Unavailable)
    }
}

/// Fetch one poll via `GET /{id}`.
///
/// # Errors
///
/// Returns the request failure.
pub async fn poll_by_id(config: &ApiConfig, poll_id: &str) -> Result<Poll, ApiError> {
    const FAILED: &str = "Failed to fetch poll details.";
    #[cfg(feature = "hydrate")]
    {
        let request = gloo_net::http::Request::get(&config.polls_url(&poll_path(poll_id))).build();
        envelope_data(send(request, FAILED).await?, FAILED)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (config, poll_id, FAILED);
        Err(ApiError::Unavailable)
    }
}

/// Cast a vote via `POST /{id}/vote` and return the updated poll.
/// Anonymous votes are allowed; the token is attached only when present.
///
/// # Errors
///
/// Returns the request failure.
pub async fn vote(config: &ApiConfig, token: Option<&str>, poll_id: &str, option_id: &str) -> Result<Poll, ApiError> {
    const FAILED: &str = "Failed to cast vote.";
    #[cfg(feature = "hydrate")]
    {
        let auth = token.filter(|t| !t.is_empty()).map_or(AuthHeader::None, AuthHeader::Bearer);
        let builder = with_auth(gloo_net::http::Request::post(&config.polls_url(&vote_path(poll_id))), auth);
        let payload = serde_json::json!({ "optionId": option_id });
        envelope_data(send(builder.json(&payload), FAILED).await?, FAILED)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (config, token, poll_id, option_id, FAILED);
        Err(ApiError::Unavailable)
    }
}

/// Withdraw the current user's vote via `POST /{id}/remove-vote`.
///
/// # Errors
///
/// Returns `Unauthenticated` without a token, or the request failure.
pub async fn remove_vote(
    config: &ApiConfig,
    token: Option<&str>,
    poll_id: &str,
    option_id: &str,
) -> Result<Poll, ApiError> {
    const FAILED: &str = "Failed to remove your vote. Please try again.";
    let token = require_token(token, "remove your vote")?;
    #[cfg(feature = "hydrate")]
    {
        let builder = with_auth(
            gloo_net::http::Request::post(&config.polls_url(&remove_vote_path(poll_id))),
            AuthHeader::Bearer(token),
        );
        let payload = serde_json::json!({ "optionId": option_id });
        envelope_data(send(builder.json(&payload), FAILED).await?, FAILED)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (config, token, poll_id, option_id, FAILED);
        Err(ApiError::Unavailable)
    }
}

/// Replace a poll's question, options, and images via `PUT /{id}`.
///
/// # Errors
///
/// Returns `Unauthenticated` without a token, or the request failure.
pub async fn update_poll(
    config: &ApiConfig,
    token: Option<&str>,
    poll_id: &str,
    draft: &PollDraft,
    images: &[ImageUpload],
) -> Result<Poll, ApiError> {
    const FAILED: &str = "Failed to update poll.";
    let token = require_token(token, "update a poll")?;
    let payload = PollPayload::new(draft, images);
    #[cfg(feature = "hydrate")]
    {
        let builder = with_auth(gloo_net::http::Request::put(&config.polls_url(&poll_path(poll_id))), AuthHeader::Bearer(token));
        envelope_data(send(builder.json(&payload), FAILED).await?, FAILED)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (config, token, poll_id, payload, FAILED);
        Err(ApiError::Unavailable)
    }
}

/// Delete a poll via `DELETE /{id}`.
///
/// # Errors
///
/// Returns `Unauthenticated` without a token, or the request failure.
pub async fn delete_poll(config: &ApiConfig, token: Option<&str>, poll_id: &str) -> Result<Ack, ApiError> {
    const FAILED: &str = "Failed to delete poll.";
    let token = require_token(token, "delete a poll")?;
    #[cfg(feature = "hydrate")]
    {
        let builder = with_auth(
            gloo_net::http::Request::delete(&config.polls_url(&poll_path(poll_id))),
            AuthHeader::Bearer(token),
        );
        send(builder.build(), FAILED).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (config, token, poll_id, FAILED);
        Err(ApiError::Unavailable)
    }
}

/// Polls created by the token's owner via `GET /my-polls`.
///
/// # Errors
///
/// Returns `Unauthenticated` without a token, or the request failure.
pub async fn my_polls(config: &ApiConfig, token: Option<&str>) -> Result<Vec<Poll>, ApiError> {
    const FAILED: &str = "Failed to fetch your created polls.";
    let token = require_token(token, "view your polls")?;
    #[cfg(feature = "hydrate")]
    {
        let builder = with_auth(gloo_net::http::Request::get(&config.polls_url("my-polls")), AuthHeader::Bearer(token));
        envelope_data(send(builder.build(), FAILED).await?, FAILED)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (config, token, FAILED);
        Err(ApiError::Unavailable)
    }
}

/// Polls the token's owner voted on via `GET /voted-polls`.
///
/// # Errors
///
/// Returns `Unauthenticated` without a token, or the request failure.
pub async fn voted_polls(config: &ApiConfig, token: Option<&str>) -> Result<Vec<Poll>, ApiError> {
    const FAILED: &str = "Failed to fetch polls you have voted on.";
    let token = require_token(token, "view your voted polls")?;
    #[cfg(feature = "hydrate")]
    {
        let builder = with_auth(gloo_net::http::Request::get(&config.polls_url("voted-polls")), AuthHeader::Bearer(token));
        envelope_data(send(builder.build(), FAILED).await?, FAILED)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (config, token, FAILED);
        Err(ApiError::Unavailable)
    }
}
