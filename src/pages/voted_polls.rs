//! Polls the signed-in user has voted on, with their choice highlighted.

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::components::poll_card::PollCard;
use crate::components::sidebar::Sidebar;
use crate::config::ApiConfig;
use crate::state::polls::PollsState;
use crate::util::auth::{install_unauth_redirect, use_session};

#[component]
pub fn VotedPollsPage() -> impl IntoView {
    let session = use_session();
    let config = expect_context::<ApiConfig>();
    install_unauth_redirect(session, use_navigate());

    let polls = RwSignal::new(PollsState::loading());
    let requested = RwSignal::new(false);

    Effect::new(move || {
        if requested.get_untracked() {
            return;
        }
        let state = session.get();
        if state.is_loading() || !state.is_authenticated() {
            return;
        }
        requested.set(true);
        let token = session.token();
        let config = config.clone();

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            match crate::net::poll_api::voted_polls(&config, token.as_deref()).await {
                Ok(items) => polls.set(PollsState { items, ..PollsState::default() }),
                Err(e) => polls.set(PollsState { error: Some(e.to_string()), ..PollsState::default() }),
            }
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = (token, config);
    });

    view! {
        <div class="page page--voted">
            <Sidebar/>
            <main class="page__content">
                <h1>"Polls You Voted On"</h1>
                <Show when=move || polls.get().error.is_some()>
                    <p class="page__error">{move || polls.get().error.unwrap_or_default()}</p>
                </Show>
                <Show when=move || !polls.get().loading fallback=|| view! { <p>"Loading your votes..."</p> }>
                    <div class="poll-grid">
                        {move || {
                            let viewer = session.get().user().map(|u| u.id.clone()).unwrap_or_default();
                            let items = polls.get().items;
                            if items.is_empty() {
                                return view! { <p>"You have not voted on any polls yet."</p> }.into_any();
                            }
                            items
                                .into_iter()
                                .map(|poll| {
                                    let choice = poll
                                        .voted_option(&viewer)
                                        .map(|o| format!("Your vote: {}", o.text))
                                        .unwrap_or_default();
                                    view! {
                                        <PollCard poll=poll viewer_id=viewer.clone()>
                                            <p class="poll-card__choice">{choice}</p>
                                        </PollCard>
                                    }
                                })
                                .collect_view()
                                .into_any()
                        }}
                    </div>
                </Show>
            </main>
        </div>
    }
}
