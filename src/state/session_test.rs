use std::sync::atomic::AtomicUsize;

use serde_json::json;

use super::*;
use crate::util::storage::MemoryStorage;

// =============================================================
// Helpers
// =============================================================

fn store_with(storage: &MemoryStorage) -> SessionStore {
    SessionStore::new(Arc::new(storage.clone()))
}

fn user(value: serde_json::Value) -> User {
    User::from_json(value).unwrap()
}

fn seed(storage: &MemoryStorage, token: &str, user: &str) {
    storage.write(TOKEN_KEY, token);
    storage.write(USER_KEY, user);
}

// =============================================================
// Initial state
// =============================================================

#[test]
fn new_store_is_uninitialized_and_loading() {
    let store = store_with(&MemoryStorage::new());
    let session = store.snapshot();
    assert_eq!(session.phase(), SessionPhase::Uninitialized);
    assert!(session.is_loading());
    assert!(!session.is_authenticated());
    assert!(session.token().is_none());
    assert!(session.user().is_none());
}

// =============================================================
// initialize_auth
// =============================================================

#[test]
fn initialize_with_stored_credentials_authenticates() {
    let storage = MemoryStorage::new();
    seed(&storage, "t1", r#"{"id":"u1","username":"a","email":"a@x.com"}"#);
    let store = store_with(&storage);

    store.initialize_auth();

    let session = store.snapshot();
    assert_eq!(session.phase(), SessionPhase::Authenticated);
    assert_eq!(session.token(), Some("t1"));
    assert_eq!(session.user().map(|u| u.id.as_str()), Some("u1"));
    assert!(!session.is_loading());
}

#[test]
fn initialize_normalizes_stored_upstream_id() {
    let storage = MemoryStorage::new();
    seed(&storage, "t1", r#"{"_id":"u1","username":"a"}"#);
    let store = store_with(&storage);

    store.initialize_auth();

    assert_eq!(store.snapshot().user().map(|u| u.id.as_str()), Some("u1"));
}

#[test]
fn initialize_is_idempotent() {
    let storage = MemoryStorage::new();
    seed(&storage, "t1", r#"{"_id":"u1","username":"a"}"#);
    let store = store_with(&storage);

    store.initialize_auth();
    let first = store.snapshot();
    store.initialize_auth();
    let second = store.snapshot();

    assert_eq!(first, second);
    assert_eq!(storage.len(), 2);
}

#[test]
fn initialize_without_token_is_anonymous_and_clears_user() {
    let storage = MemoryStorage::new();
    storage.write(USER_KEY, r#"{"id":"u1"}"#);
    let store = store_with(&storage);

    store.initialize_auth();

    let session = store.snapshot();
    assert_eq!(session.phase(), SessionPhase::Anonymous);
    assert!(!session.is_loading());
    assert!(storage.is_empty());
}

#[test]
fn initialize_without_user_is_anonymous_and_clears_token() {
    let storage = MemoryStorage::new();
    storage.write(TOKEN_KEY, "t1");
    let store = store_with(&storage);

    store.initialize_auth();

    assert!(!store.snapshot().is_authenticated());
    assert!(storage.read(TOKEN_KEY).is_none());
}

#[test]
fn initialize_with_empty_storage_is_anonymous() {
    let store = store_with(&MemoryStorage::new());
    store.initialize_auth();
    assert_eq!(store.snapshot().phase(), SessionPhase::Anonymous);
}

#[test]
fn initialize_recovers_from_corrupt_user() {
    let storage = MemoryStorage::new();
    seed(&storage, "t1", "{not json");
    let store = store_with(&storage);

    store.initialize_auth();

    assert_eq!(
        serde_json::to_value(store.snapshot()).unwrap(),
        json!({"token": null, "user": null, "isAuthenticated": false, "loading": false})
    );
    assert!(storage.read(TOKEN_KEY).is_none());
    assert!(storage.read(USER_KEY).is_none());
}

#[test]
fn initialize_rejects_stored_user_without_id() {
    let storage = MemoryStorage::new();
    seed(&storage, "t1", r#"{"username":"ghost"}"#);
    let store = store_with(&storage);

    store.initialize_auth();

    assert!(!store.snapshot().is_authenticated());
    assert!(storage.is_empty());
}

#[test]
fn initialize_treats_null_user_as_missing() {
    let storage = MemoryStorage::new();
    seed(&storage, "t1", "null");
    let store = store_with(&storage);

    store.initialize_auth();

    assert!(!store.snapshot().is_authenticated());
    assert!(storage.is_empty());
}

// =============================================================
// set_auth
// =============================================================

#[test]
fn set_auth_scenario_matches_expected_state() {
    let store = store_with(&MemoryStorage::new());

    store.set_auth("abc123", user(json!({"_id": "42", "username": "alice", "email": "a@x.com"})));

    assert_eq!(
        serde_json::to_value(store.snapshot()).unwrap(),
        json!({
            "token": "abc123",
            "user": {"id": "42", "username": "alice", "email": "a@x.com", "_id": "42"},
            "isAuthenticated": true,
            "loading": false
        })
    );
}

#[test]
fn set_auth_sets_token_and_user_together() {
    let store = store_with(&MemoryStorage::new());
    store.set_auth("t1", user(json!({"id": "u1"})));
    let session = store.snapshot();
    assert_eq!(session.token(), Some("t1"));
    assert_eq!(session.user().map(|u| u.id.as_str()), Some("u1"));
    assert_eq!(session.phase(), SessionPhase::Authenticated);
}

#[test]
fn set_auth_persists_both_keys() {
    let storage = MemoryStorage::new();
    let store = store_with(&storage);

    store.set_auth("t1", user(json!({"_id": "u1", "username": "a"})));

    assert_eq!(storage.read(TOKEN_KEY).as_deref(), Some("t1"));
    let stored: serde_json::Value = serde_json::from_str(&storage.read(USER_KEY).unwrap()).unwrap();
    assert_eq!(stored["id"], json!("u1"));
    assert_eq!(stored["_id"], json!("u1"));
}

#[test]
fn set_auth_normalizes_manually_built_user() {
    let store = store_with(&MemoryStorage::new());
    let mut raw = User::new("", "bob", "b@x.com");
    raw.upstream_id = Some("u5".to_owned());

    store.set_auth("t1", raw);

    assert_eq!(store.snapshot().user().map(|u| u.id.as_str()), Some("u5"));
}

#[test]
fn set_auth_refuses_user_without_any_id() {
    let storage = MemoryStorage::new();
    let store = store_with(&storage);

    store.set_auth("t1", User::new("", "nobody", ""));

    assert_eq!(store.snapshot().phase(), SessionPhase::Anonymous);
    assert!(storage.is_empty());
}

#[test]
fn set_auth_replaces_previous_session() {
    let store = store_with(&MemoryStorage::new());
    store.set_auth("t1", user(json!({"id": "u1"})));
    store.set_auth("t2", user(json!({"id": "u2"})));
    let session = store.snapshot();
    assert_eq!(session.token(), Some("t2"));
    assert_eq!(session.user().map(|u| u.id.as_str()), Some("u2"));
}

#[test]
fn set_auth_survives_reload() {
    let storage = MemoryStorage::new();
    let original = user(json!({"_id": "u1", "username": "a", "theme": "dark"}));
    store_with(&storage).set_auth("t1", original.clone());

    let reloaded = store_with(&storage);
    reloaded.initialize_auth();

    let session = reloaded.snapshot();
    assert_eq!(session.token(), Some("t1"));
    assert_eq!(session.user(), Some(&original.normalized()));
}

// =============================================================
// logout / set_loading
// =============================================================

#[test]
fn logout_clears_storage_and_state() {
    let storage = MemoryStorage::new();
    let store = store_with(&storage);
    store.set_auth("t1", user(json!({"id": "u1"})));

    store.logout();

    let session = store.snapshot();
    assert!(!session.is_authenticated());
    assert!(session.user().is_none());
    assert!(!session.is_loading());
    assert!(storage.read(TOKEN_KEY).is_none());
    assert!(storage.read(USER_KEY).is_none());
}

#[test]
fn logout_from_uninitialized_resolves_anonymous() {
    let store = store_with(&MemoryStorage::new());
    store.logout();
    assert_eq!(store.snapshot().phase(), SessionPhase::Anonymous);
}

#[test]
fn set_loading_keeps_credentials() {
    let store = store_with(&MemoryStorage::new());
    store.set_auth("t1", user(json!({"id": "u1"})));

    store.set_loading(true);
    let loading = store.snapshot();
    assert!(loading.is_loading());
    assert_eq!(loading.phase(), SessionPhase::Loading);
    assert_eq!(loading.token(), Some("t1"));

    store.set_loading(false);
    assert_eq!(store.snapshot().phase(), SessionPhase::Authenticated);
}

#[test]
fn authenticated_flag_tracks_token_after_every_operation() {
    let storage = MemoryStorage::new();
    seed(&storage, "t0", r#"{"id":"u0"}"#);
    let store = store_with(&storage);

    let check = |store: &SessionStore| {
        let s = store.snapshot();
        assert_eq!(s.is_authenticated(), s.token().is_some());
        if let Some(u) = s.user() {
            assert!(!u.id.is_empty());
        }
    };

    store.initialize_auth();
    check(&store);
    store.set_loading(true);
    check(&store);
    store.logout();
    check(&store);
    store.set_auth("t1", user(json!({"_id": "u1"})));
    check(&store);
}

// =============================================================
// Subscriptions
// =============================================================

#[test]
fn subscribers_receive_new_snapshots() {
    let store = store_with(&MemoryStorage::new());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    store.subscribe(move |s| sink.lock().unwrap().push(s.token().map(str::to_owned)));

    store.set_auth("t1", user(json!({"id": "u1"})));
    store.logout();

    assert_eq!(*seen.lock().unwrap(), vec![Some("t1".to_owned()), None]);
}

#[test]
fn unchanged_state_does_not_notify() {
    let store = store_with(&MemoryStorage::new());
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    store.subscribe(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    store.initialize_auth();
    store.initialize_auth();
    store.set_loading(false);

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn unsubscribe_stops_notifications() {
    let store = store_with(&MemoryStorage::new());
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let id = store.subscribe(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    assert!(store.unsubscribe(id));
    assert!(!store.unsubscribe(id));
    store.set_auth("t1", user(json!({"id": "u1"})));

    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn subscriber_may_read_store_during_notification() {
    let store = store_with(&MemoryStorage::new());
    let observed = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&observed);
    let reader = store.clone();
    store.subscribe(move |_| {
        *sink.lock().unwrap() = reader.token();
    });

    store.set_auth("t9", user(json!({"id": "u9"})));

    assert_eq!(observed.lock().unwrap().as_deref(), Some("t9"));
}

#[test]
fn clones_share_state() {
    let store = store_with(&MemoryStorage::new());
    let other = store.clone();
    store.set_auth("t1", user(json!({"id": "u1"})));
    assert_eq!(other.token().as_deref(), Some("t1"));
}
