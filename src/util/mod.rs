//! Utility helpers shared across client UI modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser concerns (storage, file inputs) from page
//! and component logic so they stay testable natively.

pub mod auth;
pub mod password;
pub mod storage;
pub mod upload;
