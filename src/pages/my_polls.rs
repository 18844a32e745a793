//! Polls created by the signed-in user, with inline edit and delete.
//!
//! SYSTEM CONTEXT
//! ==============
//! The list is fetched once the session resolves to a signed-in user. Edits
//! and deletes reconcile the local list from the server's answer instead of
//! re-fetching. Images chosen while editing replace the poll's current set.

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::components::poll_card::PollCard;
use crate::components::sidebar::Sidebar;
use crate::config::ApiConfig;
use crate::state::polls::{PollDraft, PollsState};
use crate::util::auth::{install_unauth_redirect, use_session};
use crate::util::upload::ImageUpload;

#[component]
pub fn MyPollsPage() -> impl IntoView {
    let session = use_session();
    let config = expect_context::<ApiConfig>();
    install_unauth_redirect(session, use_navigate());

    let polls = RwSignal::new(PollsState::loading());
    let requested = RwSignal::new(false);
    let editing = RwSignal::new(None::<(String, PollDraft)>);
    let edit_images = RwSignal::new(Vec::<ImageUpload>::new());
    let confirm_delete = RwSignal::new(None::<String>);
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    {
        let config = config.clone();
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
                match crate::net::poll_api::my_polls(&config, token.as_deref()).await {
                    Ok(items) => polls.set(PollsState { items, ..PollsState::default() }),
                    Err(e) => polls.set(PollsState { error: Some(e.to_string()), ..PollsState::default() }),
                }
            });
            #[cfg(not(feature = "hydrate"))]
            let _ = (token, config);
        });
    }

    let on_edit = Callback::new(move |poll_id: String| {
        let draft = polls.with_untracked(|s| s.items.iter().find(|p| p.id == poll_id).map(PollDraft::from_poll));
        if let Some(draft) = draft {
            editing.set(Some((poll_id, draft)));
            edit_images.set(Vec::new());
            info.set(String::new());
        }
    });

    let on_save = {
        let config = config.clone();
        Callback::new(move |()| {
            if busy.get_untracked() {
                return;
            }
            let Some((poll_id, draft)) = editing.get_untracked() else {
                return;
            };
            let clean = match draft.validated() {
                Ok(clean) => clean,
                Err(e) => {
                    info.set(e.to_string());
                    return;
                }
            };
            busy.set(true);
            let uploads = edit_images.get_untracked();
            let token = session.token();
            let config = config.clone();

            #[cfg(feature = "hydrate")]
            leptos::task::spawn_local(async move {
                match crate::net::poll_api::update_poll(&config, token.as_deref(), &poll_id, &clean, &uploads).await {
                    Ok(updated) => {
                        polls.update(|s| {
                            crate::state::polls::replace_poll(&mut s.items, updated);
                        });
                        editing.set(None);
                        edit_images.set(Vec::new());
                        info.set("Poll updated successfully!".to_owned());
                    }
                    Err(e) => info.set(e.to_string()),
                }
                busy.set(false);
            });
            #[cfg(not(feature = "hydrate"))]
            let _ = (poll_id, clean, uploads, token, config);
        })
    };

    let on_delete = Callback::new(move |()| {
        if busy.get_untracked() {
            return;
        }
        let Some(poll_id) = confirm_delete.get_untracked() else {
            return;
        };
        busy.set(true);
        let token = session.token();
        let config = config.clone();

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            match crate::net::poll_api::delete_poll(&config, token.as_deref(), &poll_id).await {
                Ok(ack) => {
                    polls.update(|s| {
                        crate::state::polls::remove_poll(&mut s.items, &poll_id);
                    });
                    info.set(ack.message.unwrap_or_else(|| "Poll deleted.".to_owned()));
                }
                Err(e) => info.set(e.to_string()),
            }
            confirm_delete.set(None);
            busy.set(false);
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = (poll_id, token, config);
    });

    view! {
        <div class="page page--my-polls">
            <Sidebar/>
            <main class="page__content">
                <h1>"My Polls"</h1>
                <Show when=move || !info.get().is_empty()>
                    <p class="page__message">{move || info.get()}</p>
                </Show>
                <Show when=move || polls.get().error.is_some()>
                    <p class="page__error">{move || polls.get().error.unwrap_or_default()}</p>
                </Show>
                <Show when=move || !polls.get().loading fallback=|| view! { <p>"Loading your polls..."</p> }>
                    <div class="poll-grid">
                        {move || {
                            let items = polls.get().items;
                            if items.is_empty() {
                                return view! { <p>"You have not created any polls yet."</p> }.into_any();
                            }
                            items
                                .into_iter()
                                .map(|poll| {
                                    let edit_id = poll.id.clone();
                                    let delete_id = poll.id.clone();
                                    view! {
                                        <PollCard poll=poll>
                                            <button class="btn" on:click=move |_| on_edit.run(edit_id.clone())>
                                                "Edit"
                                            </button>
                                            <button
                                                class="btn btn--danger"
                                                on:click=move |_| confirm_delete.set(Some(delete_id.clone()))
                                            >
                                                "Delete"
                                            </button>
                                        </PollCard>
                                    }
                                })
                                .collect_view()
                                .into_any()
                        }}
                    </div>
                </Show>
                <Show when=move || editing.get().is_some()>
                    <EditPollDialog editing=editing images=edit_images info=info busy=busy on_save=on_save/>
                </Show>
                <Show when=move || confirm_delete.get().is_some()>
                    <div class="dialog-backdrop" on:click=move |_| confirm_delete.set(None)>
                        <div class="dialog" on:click=move |ev| ev.stop_propagation()>
                            <h2>"Delete poll?"</h2>
                            <p>"This cannot be undone."</p>
                            <div class="dialog__actions">
                                <button class="btn" on:click=move |_| confirm_delete.set(None)>
                                    "Cancel"
                                </button>
                                <button
                                    class="btn btn--danger"
                                    on:click=move |_| on_delete.run(())
                                    disabled=move || busy.get()
                                >
                                    "Delete"
                                </button>
                            </div>
                        </div>
                    </div>
                </Show>
            </main>
        </div>
    }
}

/// Modal editor for a poll's question, options, and replacement images.
#[component]
fn EditPollDialog(
    editing: RwSignal<Option<(String, PollDraft)>>,
    images: RwSignal<Vec<ImageUpload>>,
    info: RwSignal<String>,
    busy: RwSignal<bool>,
    on_save: Callback<()>,
) -> impl IntoView {
    let update_draft = move |f: &dyn Fn(&mut PollDraft) -> Result<(), crate::state::polls::PollFormError>| {
        let mut result = Ok(());
        editing.update(|e| {
            if let Some((_, draft)) = e.as_mut() {
                result = f(draft);
            }
        });
        if let Err(e) = result {
            info.set(e.to_string());
        }
    };

    #[cfg(feature = "hydrate")]
    let on_images = move |ev: leptos::ev::Event| {
        let files = crate::util::upload::selected_files(&ev);
        leptos::task::spawn_local(async move {
            let max = crate::util::upload::POLL_IMAGE_MAX_BYTES;
            match crate::util::upload::read_images(files, 0, max).await {
                Ok(added) => images.set(added),
                Err(message) => info.set(message),
            }
        });
    };
    #[cfg(not(feature = "hydrate"))]
    let on_images = move |_: leptos::ev::Event| {};

    let question = move || editing.with(|e| e.as_ref().map(|(_, d)| d.question.clone()).unwrap_or_default());
    let option_count = move || editing.with(|e| e.as_ref().map_or(0, |(_, d)| d.options.len()));

    view! {
        <div class="dialog-backdrop" on:click=move |_| editing.set(None)>
            <div class="dialog" on:click=move |ev| ev.stop_propagation()>
                <h2>"Edit Poll"</h2>
                <input
                    class="dialog__input"
                    type="text"
                    prop:value=question
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        update_draft(&|d| {
                            d.question.clone_from(&value);
                            Ok(())
                        });
                    }
                />
                <ol class="poll-form__options">
                    {move || {
                        (0..option_count())
                            .map(|index| {
                                view! {
                                    <li>
                                        <input
                                            type="text"
                                            prop:value=move || {
                                                editing
                                                    .with(|e| {
                                                        e.as_ref().and_then(|(_, d)| d.options.get(index).cloned())
                                                    })
                                                    .unwrap_or_default()
                                            }
                                            on:input=move |ev| {
                                                let value = event_target_value(&ev);
                                                update_draft(&|d| {
                                                    if let Some(slot) = d.options.get_mut(index) {
                                                        slot.clone_from(&value);
                                                    }
                                                    Ok(())
                                                });
                                            }
                                        />
                                        <button
                                            type="button"
                                            class="btn"
                                            on:click=move |_| update_draft(&|d| d.remove_option(index))
                                        >
                                            "Remove"
                                        </button>
                                    </li>
                                }
                            })
                            .collect_view()
                    }}
                </ol>
                <button type="button" class="btn" on:click=move |_| update_draft(&PollDraft::add_option)>
                    "+ Add option"
                </button>
                <label class="poll-form__images">
                    "Replace images (optional)"
                    <input type="file" multiple=true accept="image/jpeg,image/png,image/gif" on:change=on_images/>
                </label>
                <p>{move || format!("{} new image(s) selected", images.with(Vec::len))}</p>
                <div class="dialog__actions">
                    <button class="btn" on:click=move |_| editing.set(None)>
                        "Cancel"
                    </button>
                    <button class="btn" on:click=move |_| on_save.run(()) disabled=move || busy.get()>
                        "Save"
                    </button>
                </div>
            </div>
        </div>
    }
}
