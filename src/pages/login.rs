//! Landing page with login, registration, and password reset.
//!
//! SYSTEM CONTEXT
//! ==============
//! Entry route for anonymous visitors. Successful login or registration feeds
//! the session via `set_auth`; an authenticated session redirects to `/home`.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::components::password_reset::PasswordResetFlow;
use crate::config::ApiConfig;
use crate::util::auth::use_session;
use crate::util::password::check_registration_password;
#[cfg(feature = "hydrate")]
use crate::util::upload::{PROFILE_IMAGE_MAX_BYTES, check_image, read_file, selected_files};

/// Which form the landing card shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
    ResetPassword,
}

impl AuthMode {
    pub fn heading(self) -> &'static str {
        match self {
            Self::Login => "Welcome back",
            Self::Register => "Create an account",
            Self::ResetPassword => "Reset your password",
        }
    }
}

/// Trimmed registration fields, or the message to show instead.
///
/// # Errors
///
/// Returns a user-facing message when a field is blank or the passwords differ.
pub fn registration_input(
    username: &str,
    email: &str,
    password: &str,
    confirm: &str,
) -> Result<(String, String), String> {
    let username = username.trim();
    let email = email.trim();
    if username.is_empty() || email.is_empty() || password.is_empty() {
        return Err("Username, email, and password are required.".to_owned());
    }
    check_registration_password(password, confirm).map_err(|e| e.to_string())?;
    Ok((username.to_owned(), email.to_owned()))
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let session = use_session();
    let config = expect_context::<ApiConfig>();
    let navigate = use_navigate();

    let mode = RwSignal::new(AuthMode::Login);
    let username = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);
    #[cfg(feature = "hydrate")]
    let profile_image = RwSignal::new(None::<crate::util::upload::ImageUpload>);

    Effect::new(move || {
        let state = session.get();
        if !state.is_loading() && state.is_authenticated() {
            navigate("/home", NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });

    let switch_to = move |next: AuthMode| {
        mode.set(next);
        info.set(String::new());
        password.set(String::new());
        confirm.set(String::new());
    };

    let on_login = {
        let config = config.clone();
        move |ev: leptos::ev::SubmitEvent| {
            ev.prevent_default();
            if busy.get() {
                return;
            }
            let email_value = email.get().trim().to_owned();
            let password_value = password.get();
            if email_value.is_empty() || password_value.is_empty() {
                info.set("Enter your email and password.".to_owned());
                return;
            }
            busy.set(true);
            info.set("Signing in...".to_owned());
            let config = config.clone();

            #[cfg(feature = "hydrate")]
            leptos::task::spawn_local(async move {
                session.set_loading(true);
                match crate::net::auth_api::login(&config, &email_value, &password_value).await {
                    Ok((token, user)) => {
                        info.set("Login successful! Redirecting to home...".to_owned());
                        session.set_auth(token, user);
                    }
                    Err(e) => {
                        session.set_loading(false);
                        info.set(e.to_string());
                    }
                }
                busy.set(false);
            });
            #[cfg(not(feature = "hydrate"))]
            let _ = (config, email_value, password_value);
        }
    };

    let on_register = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let (username_value, email_value) =
            match registration_input(&username.get(), &email.get(), &password.get(), &confirm.get()) {
                Ok(fields) => fields,
                Err(message) => {
                    info.set(message);
                    return;
                }
            };
        let password_value = password.get();
        busy.set(true);
        info.set("Creating account...".to_owned());
        let config = config.clone();

        #[cfg(feature = "hydrate")]
        {
            let image = profile_image.get_untracked();
            leptos::task::spawn_local(async move {
                session.set_loading(true);
                let result =
                    crate::net::auth_api::register(&config, &username_value, &email_value, &password_value, image)
                        .await;
                match result {
                    Ok((token, user)) => {
                        info.set("Registration successful! Redirecting to home...".to_owned());
                        profile_image.set(None);
                        session.set_auth(token, user);
                    }
                    Err(e) => {
                        session.set_loading(false);
                        info.set(e.to_string());
                    }
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = (config, username_value, email_value, password_value);
    };

    #[cfg(feature = "hydrate")]
    let on_image = move |ev: leptos::ev::Event| {
        let Some(file) = selected_files(&ev).into_iter().next() else {
            profile_image.set(None);
            return;
        };
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let size = file.size() as u64;
        if let Err(e) = check_image(&file.name(), &file.type_(), size, PROFILE_IMAGE_MAX_BYTES) {
            info.set(e.to_string());
            return;
        }
        leptos::task::spawn_local(async move {
            match read_file(&file).await {
                Ok(upload) => profile_image.set(Some(upload)),
                Err(e) => info.set(format!("Could not read image: {e}")),
            }
        });
    };
    #[cfg(not(feature = "hydrate"))]
    let on_image = move |_: leptos::ev::Event| {};

    let on_reset_done = Callback::new(move |()| {
        switch_to(AuthMode::Login);
        info.set("Password reset successfully! Please log in with your new password.".to_owned());
    });
    let on_reset_cancel = Callback::new(move |()| switch_to(AuthMode::Login));

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Pollhub"</h1>
                <p class="login-card__subtitle">{move || mode.get().heading()}</p>
                <Show when=move || mode.get() == AuthMode::Login>
                    <form class="login-form" on:submit=on_login.clone()>
                        <input
                            class="login-input"
                            type="email"
                            placeholder="you@example.com"
                            prop:value=move || email.get()
                            on:input=move |ev| email.set(event_target_value(&ev))
                        />
                        <input
                            class="login-input"
                            type="password"
                            placeholder="Password"
                            prop:value=move || password.get()
                            on:input=move |ev| password.set(event_target_value(&ev))
                        />
                        <button class="login-button" type="submit" disabled=move || busy.get()>
                            "Login"
                        </button>
                    </form>
                    <button class="login-link" on:click=move |_| switch_to(AuthMode::ResetPassword)>
                        "Forgot password?"
                    </button>
                    <button class="login-link" on:click=move |_| switch_to(AuthMode::Register)>
                        "Need an account? Register"
                    </button>
                </Show>
                <Show when=move || mode.get() == AuthMode::Register>
                    <form class="login-form" on:submit=on_register.clone()>
                        <input
                            class="login-input"
                            type="text"
                            placeholder="Username"
                            prop:value=move || username.get()
                            on:input=move |ev| username.set(event_target_value(&ev))
                        />
                        <input
                            class="login-input"
                            type="email"
                            placeholder="you@example.com"
                            prop:value=move || email.get()
                            on:input=move |ev| email.set(event_target_value(&ev))
                        />
                        <input
                            class="login-input"
                            type="password"
                            placeholder="Password"
                            prop:value=move || password.get()
                            on:input=move |ev| password.set(event_target_value(&ev))
                        />
                        <input
                            class="login-input"
                            type="password"
                            placeholder="Confirm password"
                            prop:value=move || confirm.get()
                            on:input=move |ev| confirm.set(event_target_value(&ev))
                        />
                        <label class="login-label">
                            "Profile image (optional)"
                            <input type="file" accept="image/jpeg,image/png,image/gif" on:change=on_image/>
                        </label>
                        <button class="login-button" type="submit" disabled=move || busy.get()>
                            "Register"
                        </button>
                    </form>
                    <button class="login-link" on:click=move |_| switch_to(AuthMode::Login)>
                        "Already registered? Login"
                    </button>
                </Show>
                <Show when=move || mode.get() == AuthMode::ResetPassword>
                    <PasswordResetFlow
                        initial_email=email.get_untracked()
                        on_done=on_reset_done
                        on_cancel=on_reset_cancel
                    />
                </Show>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
            </div>
        </div>
    }
}
