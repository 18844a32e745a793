//! Profile settings: username, email, profile image, and password change.
//!
//! SYSTEM CONTEXT
//! ==============
//! On entry the stored user is refreshed from `GET /user`; a rejected token
//! ends the session. Saved edits return the updated user, which goes back
//! through `set_auth` with the unchanged token so storage stays in step.

#[cfg(test)]
#[path = "profile_test.rs"]
mod profile_test;

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::components::password_reset::PasswordResetFlow;
use crate::components::sidebar::Sidebar;
use crate::config::ApiConfig;
use crate::net::types::{ProfileUpdate, User};
use crate::util::auth::{install_unauth_redirect, use_session};
use crate::util::upload::ImageUpload;

/// Fields that differ from the stored user, trimmed. Unchanged fields are `None`.
pub fn profile_changes(current: &User, username: &str, email: &str) -> ProfileUpdate {
    let changed = |input: &str, stored: &str| {
        let input = input.trim();
        (input != stored).then(|| input.to_owned())
    };
    ProfileUpdate { username: changed(username, &current.username), email: changed(email, &current.email) }
}

/// Whether saving would send anything.
pub fn has_pending_changes(update: &ProfileUpdate, new_image: bool, clear_image: bool) -> bool {
    update.username.is_some() || update.email.is_some() || new_image || clear_image
}

#[component]
pub fn ProfilePage() -> impl IntoView {
    let session = use_session();
    let config = expect_context::<ApiConfig>();
    install_unauth_redirect(session, use_navigate());

    let username = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let new_image = RwSignal::new(None::<ImageUpload>);
    let clear_image = RwSignal::new(false);
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);
    let refreshed = RwSignal::new(false);
    let show_password = RwSignal::new(false);

    // Seed the form whenever the stored user changes.
    Effect::new(move || {
        if let Some(user) = session.get().user() {
            username.set(user.username.clone());
            email.set(user.email.clone());
        }
    });

    {
        let config = config.clone();
        Effect::new(move || {
            if refreshed.get_untracked() || !session.get().is_authenticated() {
                return;
            }
            refreshed.set(true);
            let Some(token) = session.token() else {
                return;
            };
            let config = config.clone();

            #[cfg(feature = "hydrate")]
            leptos::task::spawn_local(async move {
                let result = crate::net::auth_api::current_user(&config, &token).await;
                if !session.holds_token(&token) {
                    return;
                }
                match result {
                    Ok(user) => session.set_auth(token, user),
                    Err(e) if e.status() == Some(401) => {
                        leptos::logging::warn!("stored token rejected: {e}");
                        session.logout();
                    }
                    Err(e) => leptos::logging::warn!("profile refresh failed: {e}"),
                }
            });
            #[cfg(not(feature = "hydrate"))]
            let _ = (config, token);
        });
    }

    let pending = move || {
        let update = session.get().user().map(|u| profile_changes(u, &username.get(), &email.get())).unwrap_or_default();
        has_pending_changes(&update, new_image.with(Option::is_some), clear_image.get())
    };

    #[cfg(feature = "hydrate")]
    let on_image = move |ev: leptos::ev::Event| {
        let Some(file) = crate::util::upload::selected_files(&ev).into_iter().next() else {
            return;
        };
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let size = file.size() as u64;
        let max = crate::util::upload::PROFILE_IMAGE_MAX_BYTES;
        if let Err(e) = crate::util::upload::check_image(&file.name(), &file.type_(), size, max) {
            info.set(e.to_string());
            return;
        }
        leptos::task::spawn_local(async move {
            match crate::util::upload::read_file(&file).await {
                Ok(upload) => {
                    new_image.set(Some(upload));
                    clear_image.set(false);
                }
                Err(e) => info.set(format!("Could not read image: {e}")),
            }
        });
    };
    #[cfg(not(feature = "hydrate"))]
    let on_image = move |_: leptos::ev::Event| {};

    let on_cancel = move |_| {
        if let Some(user) = session.current_user() {
            username.set(user.username);
            email.set(user.email);
        }
        new_image.set(None);
        clear_image.set(false);
    };

    let on_save = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let Some(token) = session.token() else {
            info.set("Authentication required. Please log in again.".to_owned());
            return;
        };
        let Some(user) = session.current_user() else {
            return;
        };
        let update = profile_changes(&user, &username.get(), &email.get());
        let image = new_image.get();
        let clear = clear_image.get();
        if !has_pending_changes(&update, image.is_some(), clear) {
            info.set("Nothing to save.".to_owned());
            return;
        }
        busy.set(true);
        let config = config.clone();

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            let result = crate::net::auth_api::update_profile(&config, &token, &update, image, clear).await;
            busy.set(false);
            if !session.holds_token(&token) {
                return;
            }
            match result {
                Ok(updated) => {
                    session.set_auth(token, updated);
                    new_image.set(None);
                    clear_image.set(false);
                    info.set("Profile updated successfully!".to_owned());
                }
                Err(e) => info.set(e.to_string()),
            }
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = (config, token, update, image, clear);
    };

    let on_password_done = Callback::new(move |()| show_password.set(false));
    let on_password_cancel = Callback::new(move |()| show_password.set(false));

    view! {
        <div class="page page--profile">
            <Sidebar/>
            <main class="page__content">
                <h1>"Profile Settings"</h1>
                <Show when=move || session.get().is_authenticated() fallback=|| view! { <p>"Loading..."</p> }>
                    <form class="profile-form" on:submit=on_save.clone()>
                        {move || {
                            let current = session.get().user().and_then(|u| u.profile_image.clone());
                            let preview = if clear_image.get() { None } else { current };
                            preview.map(|url| view! { <img class="profile-form__avatar" src=url alt="Profile"/> })
                        }}
                        <label>
                            "Username"
                            <input
                                type="text"
                                prop:value=move || username.get()
                                on:input=move |ev| username.set(event_target_value(&ev))
                            />
                        </label>
                        <label>
                            "Email"
                            <input
                                type="email"
                                prop:value=move || email.get()
                                on:input=move |ev| email.set(event_target_value(&ev))
                            />
                        </label>
                        <label>
                            "Profile image (max 2MB)"
                            <input type="file" accept="image/jpeg,image/png,image/gif" on:change=on_image/>
                        </label>
                        <button
                            type="button"
                            class="btn"
                            on:click=move |_| {
                                new_image.set(None);
                                clear_image.set(true);
                            }
                        >
                            "Remove image"
                        </button>
                        <Show when=pending>
                            <button type="button" class="btn" on:click=on_cancel>
                                "Cancel"
                            </button>
                        </Show>
                        <button class="btn" type="submit" disabled=move || busy.get() || !pending()>
                            "Save Changes"
                        </button>
                    </form>
                    <button class="btn" on:click=move |_| show_password.set(true)>
                        "Change Password"
                    </button>
                    <Show when=move || show_password.get()>
                        <PasswordResetFlow
                            initial_email=session.current_user().map(|u| u.email).unwrap_or_default()
                            on_done=on_password_done
                            on_cancel=on_password_cancel
                        />
                    </Show>
                </Show>
                <Show when=move || !info.get().is_empty()>
                    <p class="page__message">{move || info.get()}</p>
                </Show>
            </main>
        </div>
    }
}
