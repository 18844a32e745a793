//! Shared auth UI helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Pages reach the session through one `SessionContext` provided at the app
//! root. It pairs the store (the source of truth, also persisted) with a
//! signal mirror fed by the store's subscription, so views re-render on
//! every session change without polling.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;

use crate::net::types::User;
use crate::state::session::{Session, SessionStore};

/// Session store plus a reactive mirror of its snapshot.
#[derive(Clone, Copy)]
pub struct SessionContext {
    store: StoredValue<SessionStore>,
    state: RwSignal<Session>,
}

impl SessionContext {
    pub fn new(store: SessionStore) -> Self {
        let state = RwSignal::new(store.snapshot());
        let id = store.subscribe(move |session| state.set(session.clone()));
        let listener_owner = store.clone();
        on_cleanup(move || {
            listener_owner.unsubscribe(id);
        });
        Self { store: StoredValue::new(store), state }
    }

    /// Tracked read of the current snapshot.
    pub fn get(&self) -> Session {
        self.state.get()
    }

    pub fn state(&self) -> RwSignal<Session> {
        self.state
    }

    /// Token for an API call, read without subscribing.
    pub fn token(&self) -> Option<String> {
        self.store.get_value().token()
    }

    /// Whether the current session was issued `token`, read without subscribing.
    pub fn holds_token(&self, token: &str) -> bool {
        self.state.with_untracked(|s| holds_token(s, token))
    }

    /// Id of the signed-in user, read without subscribing.
    pub fn user_id(&self) -> Option<String> {
        self.state.with_untracked(|s| s.user().map(|u| u.id.clone()))
    }

    /// Signed-in user, read without subscribing.
    pub fn current_user(&self) -> Option<User> {
        self.state.with_untracked(|s| s.user().cloned())
    }

    pub fn initialize_auth(&self) {
        self.store.get_value().initialize_auth();
    }

    pub fn set_auth(&self, token: impl Into<String>, user: User) {
        self.store.get_value().set_auth(token, user);
    }

    pub fn logout(&self) {
        self.store.get_value().logout();
    }

    pub fn set_loading(&self, loading: bool) {
        self.store.get_value().set_loading(loading);
    }
}

/// Wrap `store` and provide it to the component tree.
pub fn provide_session_context(store: SessionStore) -> SessionContext {
    let ctx = SessionContext::new(store);
    provide_context(ctx);
    ctx
}

pub fn use_session() -> SessionContext {
    expect_context::<SessionContext>()
}

/// True once the session has resolved and nobody is signed in.
pub fn should_redirect_unauth(session: &Session) -> bool {
    !session.is_loading() && !session.is_authenticated()
}

/// True while `session` still carries `token`. Responses to requests made
/// with an older token must not write back into the session.
pub fn holds_token(session: &Session, token: &str) -> bool {
    session.token() == Some(token)
}

/// Redirect to the login route whenever the session resolves to anonymous.
pub fn install_unauth_redirect<F>(session: SessionContext, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        if should_redirect_unauth(&session.get()) {
            navigate("/", NavigateOptions::default());
        }
    });
}
