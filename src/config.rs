//! Base URLs for the remote auth and poll APIs.
//!
//! Values are baked in at compile time from `POLLHUB_AUTH_API_URL` and
//! `POLLHUB_POLLS_API_URL` so the WASM bundle and the SSR render agree on
//! them; both fall back to the hosted defaults.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_AUTH_API_URL: &str = "https://connecthearpolling.vercel.app/api/auth";
pub const DEFAULT_POLLS_API_URL: &str = "http://localhost:5000/api/polls";

/// Endpoint roots for the REST clients.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    pub auth_base: String,
    pub polls_base: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::from_values(option_env!("POLLHUB_AUTH_API_URL"), option_env!("POLLHUB_POLLS_API_URL"))
    }
}

impl ApiConfig {
    /// Build from optional overrides; blank values fall back to the defaults.
    pub fn from_values(auth_base: Option<&str>, polls_base: Option<&str>) -> Self {
        Self {
            auth_base: normalize_base(auth_base, DEFAULT_AUTH_API_URL),
            polls_base: normalize_base(polls_base, DEFAULT_POLLS_API_URL),
        }
    }

    /// `{auth_base}/{path}`.
    pub fn auth_url(&self, path: &str) -> String {
        join(&self.auth_base, path)
    }

    /// `{polls_base}/{path}`; an empty path addresses the collection root.
    pub fn polls_url(&self, path: &str) -> String {
        join(&self.polls_base, path)
    }
}

fn normalize_base(raw: Option<&str>, default: &str) -> String {
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
        .trim_end_matches('/')
        .to_owned()
}

fn join(base: &str, path: &str) -> String {
    let path = path.trim_start_matches('/');
    if path.is_empty() { base.to_owned() } else { format!("{base}/{path}") }
}
