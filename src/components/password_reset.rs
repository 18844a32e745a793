//! Email OTP password-reset flow shared by the login and profile pages.
//!
//! SYSTEM CONTEXT
//! ==============
//! Three backend calls in sequence: request an OTP by email, trade the OTP
//! for a one-time password-change token, then set the new password. When the
//! final response carries fresh credentials they go straight into the session.

#[cfg(test)]
#[path = "password_reset_test.rs"]
mod password_reset_test;

use leptos::prelude::*;

use crate::config::ApiConfig;
use crate::util::auth::use_session;
use crate::util::password::check_reset_password;

/// Position in the reset flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResetStep {
    RequestOtp,
    VerifyOtp,
    SetPassword,
    Done,
}

impl ResetStep {
    pub fn title(self) -> &'static str {
        match self {
            Self::RequestOtp => "Request Password Reset",
            Self::VerifyOtp => "Verify Your Identity",
            Self::SetPassword => "Set New Password",
            Self::Done => "Password Changed!",
        }
    }

    /// Step reached after the current one succeeds.
    pub fn next(self) -> Self {
        match self {
            Self::RequestOtp => Self::VerifyOtp,
            Self::VerifyOtp => Self::SetPassword,
            Self::SetPassword | Self::Done => Self::Done,
        }
    }
}

#[component]
pub fn PasswordResetFlow(
    #[prop(optional)] initial_email: String,
    on_done: Callback<()>,
    #[prop(optional)] on_cancel: Option<Callback<()>>,
) -> impl IntoView {
    let session = use_session();
    let config = expect_context::<ApiConfig>();
    let step = RwSignal::new(ResetStep::RequestOtp);
    let email = RwSignal::new(initial_email);
    let otp = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let change_token = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_request = {
        let config = config.clone();
        move |ev: leptos::ev::SubmitEvent| {
            ev.prevent_default();
            if busy.get() {
                return;
            }
            let email_value = email.get().trim().to_owned();
            if email_value.is_empty() {
                info.set("Enter your email first.".to_owned());
                return;
            }
            busy.set(true);
            let config = config.clone();

            #[cfg(feature = "hydrate")]
            leptos::task::spawn_local(async move {
                match crate::net::auth_api::forgot_password(&config, &email_value).await {
                    Ok(_) => {
                        info.set("OTP sent to your email!".to_owned());
                        step.update(|s| *s = s.next());
                    }
                    Err(e) => info.set(e.to_string()),
                }
                busy.set(false);
            });
            #[cfg(not(feature = "hydrate"))]
            let _ = (config, email_value);
        }
    };

    let on_verify = {
        let config = config.clone();
        move |ev: leptos::ev::SubmitEvent| {
            ev.prevent_default();
            if busy.get() {
                return;
            }
            let email_value = email.get().trim().to_owned();
            let otp_value = otp.get().trim().to_owned();
            if otp_value.is_empty() {
                info.set("Enter the code from your email.".to_owned());
                return;
            }
            busy.set(true);
            let config = config.clone();

            #[cfg(feature = "hydrate")]
            leptos::task::spawn_local(async move {
                match crate::net::auth_api::verify_otp(&config, &email_value, &otp_value).await {
                    Ok(verified) => {
                        change_token.set(verified.password_change_token);
                        info.set("OTP verified. You can now set your new password.".to_owned());
                        step.update(|s| *s = s.next());
                    }
                    Err(e) => info.set(e.to_string()),
                }
                busy.set(false);
            });
            #[cfg(not(feature = "hydrate"))]
            let _ = (config, email_value, otp_value);
        }
    };

    let on_reset = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let password_value = password.get();
        if let Err(e) = check_reset_password(&password_value, &confirm.get()) {
            info.set(e.to_string());
            return;
        }
        busy.set(true);
        let token_value = change_token.get();
        let config = config.clone();

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            match crate::net::auth_api::reset_password(&config, &password_value, &token_value).await {
                Ok(payload) => {
                    if let Ok((token, user)) = crate::net::auth_api::credentials_from(payload, "") {
                        session.set_auth(token, user);
                    }
                    info.set("Password changed successfully!".to_owned());
                    step.set(ResetStep::Done);
                    on_done.run(());
                }
                Err(e) => info.set(e.to_string()),
            }
            busy.set(false);
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = (config, password_value, token_value, session, on_done);
    };

    view! {
        <section class="reset-flow">
            <h2>{move || step.get().title()}</h2>
            <Show when=move || step.get() == ResetStep::RequestOtp>
                <form class="reset-flow__form" on:submit=on_request.clone()>
                    <input
                        class="login-input"
                        type="email"
                        placeholder="your.email@example.com"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        "Send Verification Code"
                    </button>
                </form>
            </Show>
            <Show when=move || step.get() == ResetStep::VerifyOtp>
                <form class="reset-flow__form" on:submit=on_verify.clone()>
                    <p>"We sent a code to " {move || email.get()}</p>
                    <input
                        class="login-input"
                        type="text"
                        placeholder="123456"
                        prop:value=move || otp.get()
                        on:input=move |ev| otp.set(event_target_value(&ev))
                    />
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        "Verify Code"
                    </button>
                </form>
            </Show>
            <Show when=move || step.get() == ResetStep::SetPassword>
                <form class="reset-flow__form" on:submit=on_reset.clone()>
                    <input
                        class="login-input"
                        type="password"
                        placeholder="New password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        placeholder="Confirm new password"
                        prop:value=move || confirm.get()
                        on:input=move |ev| confirm.set(event_target_value(&ev))
                    />
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        "Reset Password"
                    </button>
                </form>
            </Show>
            <Show when=move || !info.get().is_empty()>
                <p class="login-message">{move || info.get()}</p>
            </Show>
            {on_cancel.map(|cancel| {
                view! {
                    <button class="btn reset-flow__cancel" on:click=move |_| cancel.run(())>
                        "Cancel"
                    </button>
                }
            })}
        </section>
    }
}
