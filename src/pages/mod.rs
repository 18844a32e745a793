//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration (fetching, session transitions,
//! list reconciliation) and delegates rendering details to `components`.

pub mod create_poll;
pub mod home;
pub mod login;
pub mod my_polls;
pub mod poll_detail;
pub mod profile;
pub mod voted_polls;
