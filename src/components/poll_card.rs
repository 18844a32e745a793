//! Poll summary card used by the home, my-polls, and voted-polls lists.
//!
//! DESIGN
//! ======
//! The card only renders. Voting is reported upward through `on_vote` so the
//! owning page can reconcile its list with the server's updated poll.

use leptos::prelude::*;

use crate::net::types::Poll;

const PLACEHOLDER_IMAGE: &str = "https://placehold.co/400x200/E0E7FF/5C6BC0?text=No+Image";

/// A poll with its image, options, and result bars.
///
/// `on_vote` receives `(poll_id, option_id)`; without it the card is read-only.
#[component]
pub fn PollCard(
    poll: Poll,
    #[prop(optional)] viewer_id: Option<String>,
    #[prop(optional)] on_vote: Option<Callback<(String, String)>>,
    #[prop(optional)] busy: Option<RwSignal<bool>>,
    #[prop(optional)] children: Option<Children>,
) -> impl IntoView {
    let viewer = viewer_id.unwrap_or_default();
    let voted_id = poll.voted_option(&viewer).map(|o| o.id.clone());
    let has_voted = poll.has_voted(&viewer);
    let show_results = has_voted || poll.total_votes > 0;
    let can_vote = on_vote.is_some() && !has_voted;
    let selected = RwSignal::new(None::<String>);
    let is_busy = move || busy.is_some_and(|b| b.get());

    let href = format!("/polls/{}", poll.id);
    let image = poll.primary_image_url().unwrap_or(PLACEHOLDER_IMAGE).to_owned();
    let author = poll.author_name().to_owned();
    let total = poll.total_votes;
    let poll_id = poll.id.as_str();

    let rows = poll
        .options
        .iter()
        .map(|option| {
            let pct = poll.option_percentage(option);
            let votes = option.votes;
            let mine = voted_id.as_deref() == Some(option.id.as_str());
            let group = format!("vote-{poll_id}");
            let option_id = option.id.clone();
            view! {
                <li class="poll-card__option" class:poll-card__option--mine=mine>
                    <Show when=move || can_vote>
                        <input
                            type="radio"
                            name=group.clone()
                            prop:checked={
                                let option_id = option_id.clone();
                                move || selected.get().as_deref() == Some(option_id.as_str())
                            }
                            on:change={
                                let option_id = option_id.clone();
                                move |_| selected.set(Some(option_id.clone()))
                            }
                        />
                    </Show>
                    <span class="poll-card__option-text">{option.text.clone()}</span>
                    <Show when=move || show_results>
                        <span class="poll-card__option-votes">{format!("{votes} votes ({pct:.1}%)")}</span>
                        <div class="poll-card__bar">
                            <div class="poll-card__bar-fill" style=format!("width: {pct}%")></div>
                        </div>
                    </Show>
                </li>
            }
        })
        .collect_view();

    let vote_poll_id = poll.id.clone();
    let submit_vote = move |_| {
        let Some(on_vote) = on_vote else {
            return;
        };
        match selected.get() {
            Some(option_id) => on_vote.run((vote_poll_id.clone(), option_id)),
            None => leptos::logging::warn!("vote submitted without a selected option"),
        }
    };

    view! {
        <article class="poll-card">
            <img class="poll-card__image" src=image alt="Poll visual"/>
            <a class="poll-card__question" href=href>{poll.question.clone()}</a>
            <p class="poll-card__author">"By: " {author}</p>
            <p class="poll-card__total">{format!("Total votes: {total}")}</p>
            <ul class="poll-card__options">{rows}</ul>
            <Show when=move || can_vote>
                <button
                    class="btn poll-card__vote"
                    on:click=submit_vote.clone()
                    disabled=move || is_busy() || selected.get().is_none()
                >
                    "Vote"
                </button>
            </Show>
            <Show when=move || has_voted>
                <p class="poll-card__voted">"You voted on this poll."</p>
            </Show>
            {children.map(|c| view! { <footer class="poll-card__actions">{c()}</footer> })}
        </article>
    }
}
