//! Authenticated-session container for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Owned by the application root and handed to pages through Leptos context.
//! Login, registration, password reset, and profile updates feed it through
//! `set_auth`; the sidebar feeds it through `logout`; the app shell hydrates
//! it once from `localStorage` with `initialize_auth`.
//!
//! DESIGN
//! ======
//! The token and user are one `Credentials` value, so a session can never hold
//! one without the other. Every transition builds a complete `Session` and
//! swaps it in under a single lock; readers see the old snapshot or the new
//! one, never a mix. Subscribers run after the lock is released and only when
//! the snapshot actually changed.
//!
//! ERROR HANDLING
//! ==============
//! No operation fails. Corrupt storage resolves to the anonymous state and
//! clears both keys.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use serde::Serialize;

use crate::net::types::User;
use crate::util::storage::KeyValueStore;

/// Storage key holding the bearer token.
pub const TOKEN_KEY: &str = "token";
/// Storage key holding the JSON-encoded user.
pub const USER_KEY: &str = "user";

/// Token and user, always set and cleared together.
#[derive(Clone, Debug, PartialEq)]
pub struct Credentials {
    pub token: String,
    pub user: User,
}

/// Lifecycle position of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    /// Created but never resolved against storage.
    Uninitialized,
    /// Resolved at least once; a caller flagged work in progress.
    Loading,
    Authenticated,
    Anonymous,
}

/// Immutable snapshot of the session.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    credentials: Option<Credentials>,
    loading: bool,
    resolved: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self { credentials: None, loading: true, resolved: false }
    }
}

impl Session {
    fn authenticated(credentials: Credentials) -> Self {
        Self { credentials: Some(credentials), loading: false, resolved: true }
    }

    fn anonymous() -> Self {
        Self { credentials: None, loading: false, resolved: true }
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.credentials.as_ref().map(|c| c.token.as_str())
    }

    pub fn user(&self) -> Option<&User> {
        self.credentials.as_ref().map(|c| &c.user)
    }

    /// True iff a token is present.
    pub fn is_authenticated(&self) -> bool {
        self.credentials.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn phase(&self) -> SessionPhase {
        if !self.resolved {
            SessionPhase::Uninitialized
        } else if self.loading {
            SessionPhase::Loading
        } else if self.credentials.is_some() {
            SessionPhase::Authenticated
        } else {
            SessionPhase::Anonymous
        }
    }
}

/// Serializes as `{ token, user, isAuthenticated, loading }`.
impl Serialize for Session {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct View<'a> {
            token: Option<&'a str>,
            user: Option<&'a User>,
            is_authenticated: bool,
            loading: bool,
        }
        View {
            token: self.token(),
            user: self.user(),
            is_authenticated: self.is_authenticated(),
            loading: self.loading,
        }
        .serialize(serializer)
    }
}

/// Handle returned by [`SessionStore::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn(&Session) + Send + Sync>;

struct Shared {
    session: RwLock<Session>,
    listeners: Mutex<Vec<(SubscriptionId, Listener)>>,
    next_id: AtomicU64,
}

/// Session state container. Clones share the same session.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
    shared: Arc<Shared>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").field("session", &self.snapshot()).finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Create an uninitialized container persisting through `storage`.
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            storage,
            shared: Arc::new(Shared {
                session: RwLock::new(Session::default()),
                listeners: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> Session {
        self.shared.session.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Current bearer token, if authenticated.
    pub fn token(&self) -> Option<String> {
        self.snapshot().token().map(str::to_owned)
    }

    /// Hydrate from storage. Safe to call repeatedly.
    pub fn initialize_auth(&self) {
        leptos::logging::log!("[session] initializing from storage");
        let next = match self.read_credentials() {
            Some(credentials) => Session::authenticated(credentials),
            None => {
                self.clear_storage();
                Session::anonymous()
            }
        };
        self.replace(next);
    }

    /// Store a freshly issued token and user, replacing any previous session.
    ///
    /// A user that still has no id after normalization is refused: the session
    /// resolves to anonymous rather than holding an unidentifiable user.
    pub fn set_auth(&self, token: impl Into<String>, user: User) {
        let user = user.normalized();
        if !user.has_id() {
            leptos::logging::warn!("[session] refusing credentials for user without id");
            self.logout();
            return;
        }
        let token = token.into();
        self.storage.write(TOKEN_KEY, &token);
        match serde_json::to_string(&user) {
            Ok(raw) => self.storage.write(USER_KEY, &raw),
            Err(e) => leptos::logging::warn!("[session] failed to encode user: {e}"),
        }
        self.replace(Session::authenticated(Credentials { token, user }));
    }

    /// Forget the credentials in memory and in storage.
    pub fn logout(&self) {
        self.clear_storage();
        self.replace(Session::anonymous());
        leptos::logging::log!("[session] logged out");
    }

    /// Toggle the loading flag without touching credentials.
    pub fn set_loading(&self, loading: bool) {
        self.transition(|current| Session { loading, ..current.clone() });
    }

    /// Register `listener` to receive every changed snapshot.
    pub fn subscribe(&self, listener: impl Fn(&Session) + Send + Sync + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.shared.next_id.fetch_add(1, Ordering::Relaxed));
        self.shared
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.shared.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    #[cfg(test)]
    pub(crate) fn listener_count(&self) -> usize {
        self.shared.listeners.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn read_credentials(&self) -> Option<Credentials> {
        let token = self.storage.read(TOKEN_KEY).filter(|t| !t.is_empty());
        let raw_user = self.storage.read(USER_KEY).filter(|u| !u.is_empty());
        let (Some(token), Some(raw_user)) = (token, raw_user) else {
            leptos::logging::log!("[session] no stored credentials");
            return None;
        };
        match serde_json::from_str::<Option<User>>(&raw_user) {
            Ok(Some(user)) => Some(Credentials { token, user }),
            Ok(None) => None,
            Err(e) => {
                leptos::logging::warn!("[session] discarding corrupt stored user: {e}");
                None
            }
        }
    }

    fn clear_storage(&self) {
        self.storage.remove(TOKEN_KEY);
        self.storage.remove(USER_KEY);
    }

    fn replace(&self, next: Session) {
        self.transition(move |_| next);
    }

    fn transition(&self, f: impl FnOnce(&Session) -> Session) {
        let next = {
            let mut guard = self.shared.session.write().unwrap_or_else(PoisonError::into_inner);
            let next = f(&guard);
            if *guard == next {
                return;
            }
            *guard = next.clone();
            next
        };
        self.notify(&next);
    }

    fn notify(&self, session: &Session) {
        let listeners: Vec<Listener> = self
            .shared
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener(session);
        }
    }
}
