//! Home page listing every poll with inline voting.
//!
//! SYSTEM CONTEXT
//! ==============
//! Open to anonymous visitors; votes carry the session token when present.
//! A successful vote swaps the returned poll into the list in place.

use leptos::prelude::*;

use crate::components::poll_card::PollCard;
use crate::components::sidebar::Sidebar;
use crate::config::ApiConfig;
use crate::state::polls::PollsState;
use crate::util::auth::use_session;

#[component]
pub fn HomePage() -> impl IntoView {
    let session = use_session();
    let config = expect_context::<ApiConfig>();
    let polls = RwSignal::new(PollsState::loading());
    let voting = RwSignal::new(false);

    #[cfg(feature = "hydrate")]
    {
        let config = config.clone();
        leptos::task::spawn_local(async move {
            match crate::net::poll_api::all_polls(&config).await {
                Ok(items) => polls.set(PollsState { items, ..PollsState::default() }),
                Err(e) => polls.set(PollsState { error: Some(e.to_string()), ..PollsState::default() }),
            }
        });
    }

    let on_vote = Callback::new(move |(poll_id, option_id): (String, String)| {
        if voting.get_untracked() {
            return;
        }
        voting.set(true);
        let token = session.token();
        let config = config.clone();

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            match crate::net::poll_api::vote(&config, token.as_deref(), &poll_id, &option_id).await {
                Ok(updated) => polls.update(|s| {
                    crate::state::polls::replace_poll(&mut s.items, updated);
                    s.error = None;
                }),
                Err(e) => polls.update(|s| s.error = Some(e.to_string())),
            }
            voting.set(false);
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = (token, config, poll_id, option_id);
    });

    view! {
        <div class="page page--home">
            <Sidebar/>
            <main class="page__content">
                <h1>"All Polls"</h1>
                <Show when=move || polls.get().error.is_some()>
                    <p class="page__error">{move || polls.get().error.unwrap_or_default()}</p>
                </Show>
                <Show when=move || !polls.get().loading fallback=|| view! { <p>"Loading polls..."</p> }>
                    <div class="poll-grid">
                        {move || {
                            let viewer = session.get().user().map(|u| u.id.clone());
                            let items = polls.get().items;
                            if items.is_empty() {
                                return view! { <p>"No polls yet."</p> }.into_any();
                            }
                            items
                                .into_iter()
                                .map(|poll| {
                                    view! {
                                        <PollCard
                                            poll=poll
                                            viewer_id=viewer.clone().unwrap_or_default()
                                            on_vote=on_vote
                                            busy=voting
                                        />
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
