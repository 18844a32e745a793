//! Wire DTOs for the auth and poll REST APIs.
//!
//! DESIGN
//! ======
//! The backend is document-store shaped: identifiers arrive as `_id`, counts
//! occasionally arrive as floats, and references may or may not be populated.
//! Deserialization absorbs those variations here so state and view code only
//! ever see one canonical shape.
//!
//! Users are normalized on every path into the client: a `User` cannot be
//! deserialized without ending up with a non-empty `id`.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// An authenticated user as stored in the session and returned by auth endpoints.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UserRecord")]
pub struct User {
    /// Canonical identifier. Always non-empty on a normalized user.
    pub id: String,
    /// Identifier under the backend's native field name, kept as received.
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub upstream_id: Option<String>,
    pub username: String,
    pub email: String,
    /// Profile image URL, if the user uploaded one.
    #[serde(rename = "profileImage", skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    /// Every other attribute the backend sent, preserved across storage round-trips.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Raised when a user record carries neither `id` nor `_id`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("user record has no id or _id field")]
pub struct MissingUserId;

#[derive(Deserialize)]
struct UserRecord {
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    id: Option<String>,
    #[serde(rename = "_id", default, deserialize_with = "deserialize_optional_id")]
    upstream_id: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(rename = "profileImage", default, deserialize_with = "deserialize_image_url")]
    profile_image: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl TryFrom<UserRecord> for User {
    type Error = MissingUserId;

    fn try_from(record: UserRecord) -> Result<Self, Self::Error> {
        let user = Self {
            id: record.id.unwrap_or_default(),
            upstream_id: record.upstream_id,
            username: record.username.unwrap_or_default(),
            email: record.email.unwrap_or_default(),
            profile_image: record.profile_image,
            extra: record.extra,
        }
        .normalized();
        if user.id.is_empty() { Err(MissingUserId) } else { Ok(user) }
    }
}

impl User {
    /// Build a user with the given identity and no extra attributes.
    pub fn new(id: impl Into<String>, username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            upstream_id: None,
            username: username.into(),
            email: email.into(),
            profile_image: None,
            extra: Map::new(),
        }
    }

    /// Parse a user from an arbitrary JSON value, normalizing `_id` into `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not an object with `id` or `_id`.
    pub fn from_json(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Fill `id` from `_id` when it is empty. An existing `id` always wins.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if self.id.is_empty() {
            if let Some(upstream) = self.upstream_id.as_ref().filter(|id| !id.is_empty()) {
                self.id = upstream.clone();
            }
        }
        self
    }

    /// Whether this user carries a usable identifier.
    pub fn has_id(&self) -> bool {
        !self.id.is_empty()
    }
}

/// Fields a user may change through the profile endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
}

/// `{ token, user }` body returned by login, registration, and password reset.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct AuthPayload {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

/// `{ success, message, data }` wrapper used by most endpoints.
#[derive(Clone, Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

/// Body of `POST /verify-otp`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct OtpVerification {
    #[serde(rename = "passwordChangeToken")]
    pub password_change_token: String,
}

/// Generic acknowledgement body (`{ success, message }`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A poll with its options and aggregated results.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Poll {
    #[serde(rename = "_id", alias = "id", deserialize_with = "deserialize_id")]
    pub id: String,
    pub question: String,
    #[serde(default)]
    pub options: Vec<PollOption>,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub total_votes: u64,
    /// Ids of users who voted on this poll.
    #[serde(default, deserialize_with = "deserialize_id_list")]
    pub voted_by: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_creator")]
    pub created_by: Option<PollCreator>,
    #[serde(default)]
    pub images: Vec<PollImage>,
    /// Single-image field from older poll documents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<PollImage>,
    /// Option id the current user picked; only present on voted-poll listings.
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "deserialize_optional_id")]
    pub user_vote: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// One selectable answer of a poll.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PollOption {
    #[serde(rename = "_id", alias = "id", deserialize_with = "deserialize_id")]
    pub id: String,
    pub text: String,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub votes: u64,
    #[serde(default, deserialize_with = "deserialize_id_list")]
    pub voters: Vec<String>,
}

/// Author summary attached to a poll.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollCreator {
    #[serde(rename = "_id", alias = "id", default, deserialize_with = "deserialize_id_or_empty")]
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
}

/// Stored poll image reference.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollImage {
    pub url: String,
    #[serde(rename = "fileName", alias = "filename", default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

fn id_from_value(value: Value) -> Result<Option<String>, String> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) if s.is_empty() => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) if n.is_i64() || n.is_u64() => Ok(Some(n.to_string())),
        Value::Object(mut map) => match map.remove("_id").or_else(|| map.remove("id")) {
            Some(inner) => id_from_value(inner),
            None => Err("expected object with _id".to_owned()),
        },
        other => Err(format!("expected string or integer id, got {other}")),
    }
}

fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    id_from_value(value).map_err(D::Error::custom)
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_optional_id(deserializer)?.ok_or_else(|| D::Error::custom("missing id"))
}

fn deserialize_id_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_optional_id(deserializer)?.unwrap_or_default())
}

/// Accept a list of plain ids or populated documents.
fn deserialize_id_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    let mut ids = Vec::with_capacity(values.len());
    for value in values {
        if let Some(id) = id_from_value(value).map_err(D::Error::custom)? {
            ids.push(id);
        }
    }
    Ok(ids)
}

/// `createdBy` is either a populated author document or a bare id.
fn deserialize_creator<'de, D>(deserializer: D) -> Result<Option<PollCreator>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Null => Ok(None),
        Value::Object(_) => serde_json::from_value(value).map(Some).map_err(D::Error::custom),
        other => Ok(id_from_value(other)
            .map_err(D::Error::custom)?
            .map(|id| PollCreator { id, username: None })),
    }
}

/// `profileImage` is either a URL string or an upload document with `url`.
fn deserialize_image_url<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(url) if !url.is_empty() => Some(url),
        Value::Object(map) => map.get("url").and_then(Value::as_str).map(str::to_owned),
        _ => None,
    })
}

fn deserialize_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Null => Ok(0),
        Value::Number(number) => {
            if let Some(int) = number.as_u64() {
                return Ok(int);
            }
            #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            if let Some(float) = number.as_f64()
                && float.is_finite()
                && float.fract() == 0.0
                && float >= 0.0
                && float <= u64::MAX as f64
            {
                return Ok(float as u64);
            }
            Err(D::Error::custom("expected non-negative integer count"))
        }
        _ => Err(D::Error::custom("expected number")),
    }
}
