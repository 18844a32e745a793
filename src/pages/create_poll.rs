//! Create-poll page with option rows, image uploads, and a saved draft.
//!
//! SYSTEM CONTEXT
//! ==============
//! Requires a session. The page always renders a blank draft first so the
//! server markup and the hydrated DOM agree; a draft saved in `localStorage`
//! is restored after mount and mirrored on every edit. It is discarded once
//! the backend accepts the poll. Images are read into memory
//! and sent base64-encoded in the JSON body.

#[cfg(test)]
#[path = "create_poll_test.rs"]
mod create_poll_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::components::sidebar::Sidebar;
use crate::config::ApiConfig;
use crate::state::polls::{PollDraft, clear_draft, load_draft, save_draft};
use crate::util::auth::{install_unauth_redirect, use_session};
use crate::util::storage::LocalStorage;
use crate::util::upload::{ImageUpload, POLL_IMAGE_LIMIT, POLL_IMAGE_MAX_BYTES, check_image_count};

/// Final gate before submit: a valid draft plus at least one image.
///
/// # Errors
///
/// Returns the user-facing message for the first failed rule.
pub fn submission(draft: &PollDraft, images: &[ImageUpload]) -> Result<PollDraft, String> {
    let clean = draft.validated().map_err(|e| e.to_string())?;
    if images.is_empty() {
        return Err("Please upload at least one image for the poll.".to_owned());
    }
    check_image_count(0, images.len()).map_err(|e| e.to_string())?;
    for image in images {
        image.check(POLL_IMAGE_MAX_BYTES).map_err(|e| e.to_string())?;
    }
    Ok(clean)
}

#[component]
pub fn CreatePollPage() -> impl IntoView {
    let session = use_session();
    let config = expect_context::<ApiConfig>();
    let navigate = use_navigate();
    install_unauth_redirect(session, navigate.clone());

    let draft = RwSignal::new(PollDraft::default());
    let images = RwSignal::new(Vec::<ImageUpload>::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    // Effects only run in the browser: restore once, then mirror edits.
    let restored = StoredValue::new(false);
    Effect::new(move || {
        draft.track();
        if restored.get_value() {
            draft.with_untracked(|d| save_draft(&LocalStorage, d));
        } else {
            restored.set_value(true);
            if let Some(saved) = load_draft(&LocalStorage) {
                draft.set(saved);
            }
        }
    });

    let on_add_option = move |_| {
        let mut result = Ok(());
        draft.update(|d| result = d.add_option());
        if let Err(e) = result {
            info.set(e.to_string());
        }
    };

    #[cfg(feature = "hydrate")]
    let on_images = move |ev: leptos::ev::Event| {
        let files = crate::util::upload::selected_files(&ev);
        let existing = images.with_untracked(Vec::len);
        leptos::task::spawn_local(async move {
            match crate::util::upload::read_images(files, existing, POLL_IMAGE_MAX_BYTES).await {
                Ok(mut added) => images.update(|list| list.append(&mut added)),
                Err(message) => info.set(message),
            }
        });
    };
    #[cfg(not(feature = "hydrate"))]
    let on_images = move |_: leptos::ev::Event| {};

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let uploads = images.get();
        let clean = match submission(&draft.get(), &uploads) {
            Ok(clean) => clean,
            Err(message) => {
                info.set(message);
                return;
            }
        };
        busy.set(true);
        info.set("Creating poll...".to_owned());
        let token = session.token();
        let config = config.clone();
        let navigate = navigate.clone();

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            match crate::net::poll_api::create_poll(&config, token.as_deref(), &clean, &uploads).await {
                Ok(poll) => {
                    leptos::logging::log!("created poll {}", poll.id);
                    clear_draft(&LocalStorage);
                    draft.set(PollDraft::default());
                    images.set(Vec::new());
                    navigate("/home", NavigateOptions::default());
                }
                Err(e) => info.set(e.to_string()),
            }
            busy.set(false);
        });
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (token, config, clean, uploads);
            clear_draft(&LocalStorage);
            navigate("/home", NavigateOptions::default());
        }
    };

    view! {
        <div class="page page--create">
            <Sidebar/>
            <main class="page__content">
                <h1>"Create a Poll"</h1>
                <form class="poll-form" on:submit=on_submit>
                    <input
                        class="poll-form__question"
                        type="text"
                        placeholder="What do you want to ask?"
                        prop:value=move || draft.with(|d| d.question.clone())
                        on:input=move |ev| draft.update(|d| d.question = event_target_value(&ev))
                    />
                    <ol class="poll-form__options">
                        {move || {
                            (0..draft.with(|d| d.options.len()))
                                .map(|index| {
                                    view! {
                                        <li>
                                            <input
                                                type="text"
                                                placeholder=format!("Option {}", index + 1)
                                                prop:value=move || {
                                                    draft.with(|d| d.options.get(index).cloned().unwrap_or_default())
                                                }
                                                on:input=move |ev| {
                                                    let value = event_target_value(&ev);
                                                    draft.update(|d| {
                                                        if let Some(slot) = d.options.get_mut(index) {
                                                            *slot = value;
                                                        }
                                                    });
                                                }
                                            />
                                            <button
                                                type="button"
                                                class="btn poll-form__remove"
                                                on:click=move |_| {
                                                    let mut result = Ok(());
                                                    draft.update(|d| result = d.remove_option(index));
                                                    if let Err(e) = result {
                                                        info.set(e.to_string());
                                                    }
                                                }
                                            >
                                                "Remove"
                                            </button>
                                        </li>
                                    }
                                })
                                .collect_view()
                        }}
                    </ol>
                    <button type="button" class="btn poll-form__add" on:click=on_add_option>
                        "+ Add option"
                    </button>
                    <label class="poll-form__images">
                        {format!("Images (up to {POLL_IMAGE_LIMIT}, JPEG/PNG/GIF, 5MB each)")}
                        <input type="file" multiple=true accept="image/jpeg,image/png,image/gif" on:change=on_images/>
                    </label>
                    <ul class="poll-form__image-list">
                        {move || {
                            images
                                .get()
                                .into_iter()
                                .enumerate()
                                .map(|(index, image)| {
                                    view! {
                                        <li>
                                            {image.file_name}
                                            <button
                                                type="button"
                                                class="btn"
                                                on:click=move |_| {
                                                    images.update(|list| {
                                                        if index < list.len() {
                                                            list.remove(index);
                                                        }
                                                    });
                                                }
                                            >
                                                "Remove"
                                            </button>
                                        </li>
                                    }
                                })
                                .collect_view()
                        }}
                    </ul>
                    <button class="btn poll-form__submit" type="submit" disabled=move || busy.get()>
                        "Create Poll"
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="page__message">{move || info.get()}</p>
                </Show>
            </main>
        </div>
    }
}
