//! Networking modules for the auth and poll REST APIs.
//!
//! SYSTEM CONTEXT
//! ==============
//! `auth_api` and `poll_api` wrap the two backends, `http` holds the shared
//! request plumbing, `error` the user-facing failure type, and `types` the
//! wire schema.

pub mod auth_api;
pub mod error;
pub mod http;
pub mod poll_api;
pub mod types;
