use std::sync::Arc;

use super::*;
use crate::util::storage::MemoryStorage;

fn store() -> SessionStore {
    SessionStore::new(Arc::new(MemoryStorage::new()))
}

#[test]
fn should_not_redirect_before_initialization() {
    assert!(!should_redirect_unauth(&Session::default()));
}

#[test]
fn should_redirect_once_resolved_anonymous() {
    let store = store();
    store.initialize_auth();
    assert!(should_redirect_unauth(&store.snapshot()));
}

#[test]
fn should_not_redirect_when_signed_in() {
    let store = store();
    store.set_auth("t1", User::new("u1", "alice", "a@x.com"));
    assert!(!should_redirect_unauth(&store.snapshot()));
}

#[test]
fn should_not_redirect_while_loading_again() {
    let store = store();
    store.initialize_auth();
    store.set_loading(true);
    assert!(!should_redirect_unauth(&store.snapshot()));
}

#[test]
fn context_mirrors_store_transitions() {
    let owner = Owner::new();
    owner.with(|| {
        let ctx = SessionContext::new(store());
        assert!(ctx.state().get_untracked().is_loading());

        ctx.set_auth("t1", User::new("u1", "alice", "a@x.com"));
        assert_eq!(ctx.token().as_deref(), Some("t1"));
        assert_eq!(ctx.user_id().as_deref(), Some("u1"));
        assert!(ctx.state().get_untracked().is_authenticated());

        ctx.logout();
        assert!(ctx.token().is_none());
        assert!(!ctx.state().get_untracked().is_authenticated());
    });
}

// =============================================================
// Token ownership
// =============================================================

#[test]
fn holds_token_matches_current_token_only() {
    let store = store();
    store.set_auth("t1", User::new("u1", "alice", "a@x.com"));
    assert!(holds_token(&store.snapshot(), "t1"));
    assert!(!holds_token(&store.snapshot(), "t0"));
}

#[test]
fn late_response_after_logout_is_not_applied() {
    let owner = Owner::new();
    owner.with(|| {
        let ctx = SessionContext::new(store());
        ctx.set_auth("t1", User::new("u1", "alice", "a@x.com"));
        let token = ctx.token().unwrap();

        ctx.logout();
        assert!(!ctx.holds_token(&token));

        // Mirrors the guard the profile page runs before writing back.
        if ctx.holds_token(&token) {
            ctx.set_auth(token, User::new("u1", "alice2", "a@x.com"));
        }
        assert!(!ctx.state().get_untracked().is_authenticated());
        assert!(ctx.token().is_none());
    });
}

#[test]
fn holds_token_is_false_when_anonymous() {
    let store = store();
    store.initialize_auth();
    assert!(!holds_token(&store.snapshot(), "t1"));
}

// =============================================================
// Subscription lifetime
// =============================================================

#[test]
fn context_unsubscribes_when_owner_is_cleaned_up() {
    let store = store();
    let owner = Owner::new();
    owner.with(|| {
        let _ctx = SessionContext::new(store.clone());
    });
    assert_eq!(store.listener_count(), 1);

    owner.cleanup();
    assert_eq!(store.listener_count(), 0);
    store.set_auth("t1", User::new("u1", "alice", "a@x.com"));
    assert!(store.snapshot().is_authenticated());
}
