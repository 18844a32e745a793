//! Single-poll page with voting, vote removal, and full results.
//!
//! SYSTEM CONTEXT
//! ==============
//! Reached from any poll card via `/polls/:id`. The page re-reads the user's
//! vote from the poll itself after every round-trip rather than tracking it
//! separately, so the displayed choice always matches the server's copy.

use leptos::prelude::*;
use leptos_router::hooks::use_params_map;

use crate::components::sidebar::Sidebar;
use crate::config::ApiConfig;
use crate::net::types::Poll;
use crate::util::auth::use_session;

#[component]
pub fn PollDetailPage() -> impl IntoView {
    let session = use_session();
    let config = expect_context::<ApiConfig>();
    let params = use_params_map();
    let poll = RwSignal::new(None::<Poll>);
    let loading = RwSignal::new(true);
    let busy = RwSignal::new(false);
    let selected = RwSignal::new(None::<String>);
    let info = RwSignal::new(String::new());
    let show_voters = RwSignal::new(false);

    let poll_id = move || params.read().get("id").unwrap_or_default();
    let viewer_id = move || session.get().user().map(|u| u.id.clone()).unwrap_or_default();
    let my_vote = move || {
        let viewer = viewer_id();
        poll.get().and_then(|p| p.voted_option(&viewer).map(|o| o.id.clone()))
    };

    {
        let config = config.clone();
        Effect::new(move || {
            let id = poll_id();
            if id.is_empty() {
                return;
            }
            loading.set(true);
            let config = config.clone();

            #[cfg(feature = "hydrate")]
            leptos::task::spawn_local(async move {
                match crate::net::poll_api::poll_by_id(&config, &id).await {
                    Ok(fetched) => {
                        poll.set(Some(fetched));
                        info.set(String::new());
                    }
                    Err(e) => info.set(e.to_string()),
                }
                loading.set(false);
            });
            #[cfg(not(feature = "hydrate"))]
            let _ = (config, id);
        });
    }

    let on_vote = {
        let config = config.clone();
        move |_| {
            if busy.get() {
                return;
            }
            let Some(option_id) = selected.get() else {
                info.set("Please select an option to vote.".to_owned());
                return;
            };
            if my_vote().is_some() {
                info.set("You have already voted on this poll.".to_owned());
                return;
            }
            busy.set(true);
            let id = poll_id();
            let token = session.token();
            let config = config.clone();

            #[cfg(feature = "hydrate")]
            leptos::task::spawn_local(async move {
                match crate::net::poll_api::vote(&config, token.as_deref(), &id, &option_id).await {
                    Ok(updated) => {
                        poll.set(Some(updated));
                        selected.set(None);
                        info.set("Your vote has been cast successfully!".to_owned());
                    }
                    Err(e) => info.set(e.to_string()),
                }
                busy.set(false);
            });
            #[cfg(not(feature = "hydrate"))]
            let _ = (config, id, token, option_id);
        }
    };

    let on_remove_vote = move |_| {
        if busy.get() {
            return;
        }
        let Some(option_id) = my_vote() else {
            info.set("You have not voted on this poll yet.".to_owned());
            return;
        };
        busy.set(true);
        let id = poll_id();
        let token = session.token();
        let config = config.clone();

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            match crate::net::poll_api::remove_vote(&config, token.as_deref(), &id, &option_id).await {
                Ok(updated) => {
                    poll.set(Some(updated));
                    info.set("Your vote has been removed successfully!".to_owned());
                }
                Err(e) => info.set(e.to_string()),
            }
            busy.set(false);
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = (config, id, token, option_id);
    };

    view! {
        <div class="page page--poll">
            <Sidebar/>
            <main class="page__content">
                <a class="page__back" href="/home">"Back to polls"</a>
                <Show when=move || !info.get().is_empty()>
                    <p class="page__message">{move || info.get()}</p>
                </Show>
                <Show when=move || !loading.get() fallback=|| view! { <p>"Loading poll..."</p> }>
                    {
                        let on_vote = on_vote.clone();
                        let on_remove_vote = on_remove_vote.clone();
                        move || match poll.get() {
                        None => view! { <p>"Poll not found."</p> }.into_any(),
                        Some(p) => {
                            let on_vote = on_vote.clone();
                            let on_remove_vote = on_remove_vote.clone();
                            let voted = my_vote();
                            let can_vote = voted.is_none();
                            let images = p
                                .images
                                .iter()
                                .map(|img| view! { <img class="poll-detail__image" src=img.url.clone() alt="Poll visual"/> })
                                .collect_view();
                            let legacy = p
                                .images
                                .is_empty()
                                .then(|| p.primary_image_url().map(str::to_owned))
                                .flatten()
                                .map(|url| view! { <img class="poll-detail__image" src=url alt="Poll visual"/> });
                            let rows = p
                                .options
                                .iter()
                                .map(|option| {
                                    let pct = p.option_percentage(option);
                                    let mine = voted.as_deref() == Some(option.id.as_str());
                                    let option_id = option.id.clone();
                                    let radio_id = option.id.clone();
                                    let voters = option.voters.len();
                                    view! {
                                        <li class="poll-detail__option" class:poll-detail__option--mine=mine>
                                            <label>
                                                <input
                                                    type="radio"
                                                    name="poll-option"
                                                    disabled=!can_vote
                                                    prop:checked=move || selected.get().as_deref() == Some(radio_id.as_str())
                                                    on:change=move |_| selected.set(Some(option_id.clone()))
                                                />
                                                {option.text.clone()}
                                            </label>
                                            <span>{format!("{} votes ({pct:.1}%)", option.votes)}</span>
                                            <div class="poll-card__bar">
                                                <div class="poll-card__bar-fill" style=format!("width: {pct}%")></div>
                                            </div>
                                            <Show when=move || show_voters.get()>
                                                <span class="poll-detail__voters">{format!("{voters} voters")}</span>
                                            </Show>
                                        </li>
                                    }
                                })
                                .collect_view();
                            view! {
                                <article class="poll-detail">
                                    {images}
                                    {legacy}
                                    <h1>{p.question.clone()}</h1>
                                    <p class="poll-detail__author">"By: " {p.author_name().to_owned()}</p>
                                    <p class="poll-detail__total">{format!("Total votes: {}", p.total_votes)}</p>
                                    <ul class="poll-detail__options">{rows}</ul>
                                    <div class="poll-detail__actions">
                                        <Show
                                            when=move || can_vote
                                            fallback=move || {
                                                view! {
                                                    <button
                                                        class="btn"
                                                        on:click=on_remove_vote.clone()
                                                        disabled=move || busy.get() || !session.get().is_authenticated()
                                                    >
                                                        "Remove my vote"
                                                    </button>
                                                }
                                            }
                                        >
                                            <button class="btn" on:click=on_vote.clone() disabled=move || busy.get()>
                                                "Vote"
                                            </button>
                                        </Show>
                                        <button class="btn" on:click=move |_| show_voters.update(|v| *v = !*v)>
                                            {move || if show_voters.get() { "Hide voters" } else { "Show voters" }}
                                        </button>
                                    </div>
                                </article>
                            }
                                .into_any()
                        }
                    }
                    }
                </Show>
            </main>
        </div>
    }
}
