//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! `session` is the persisted credential container; `polls` holds the
//! per-view poll lists and the helpers that reconcile them.

pub mod polls;
pub mod session;
