//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render poll and navigation chrome, reading the session from
//! Leptos context and reporting user intents back to their page.

pub mod password_reset;
pub mod poll_card;
pub mod sidebar;
