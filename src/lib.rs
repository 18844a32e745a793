//! # pollhub
//!
//! Leptos + WASM client for a polling application: sign in, create polls with
//! images, vote, and manage your own polls against a remote REST backend.
//!
//! The core is `state::session`, a persisted credential container that the
//! app root hands to every page through `util::auth::SessionContext`. The
//! REST clients in `net` are stateless; poll lists in `state::polls` are
//! reconciled locally from the backend's responses.

pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: mount the app over the server-rendered markup.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    leptos::mount::hydrate_body(app::App);
}
