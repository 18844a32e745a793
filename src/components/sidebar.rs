//! Navigation sidebar shared by the poll pages.
//!
//! SYSTEM CONTEXT
//! ==============
//! Logout is the only session transition triggered from here. The backend call
//! is best-effort; the local session is cleared even when it fails.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_location, use_navigate};

use crate::config::ApiConfig;
use crate::util::auth::use_session;

const NAV_ITEMS: [(&str, &str); 5] = [
    ("/home", "Home"),
    ("/create-poll", "Create Poll"),
    ("/my-polls", "My Polls"),
    ("/my-voted-polls", "Voted Polls"),
    ("/profile", "Profile"),
];

#[component]
pub fn Sidebar() -> impl IntoView {
    let session = use_session();
    let config = expect_context::<ApiConfig>();
    let navigate = use_navigate();
    let location = use_location();
    let busy = RwSignal::new(false);

    let display_name = move || {
        session
            .get()
            .user()
            .map(|u| if u.username.is_empty() { u.email.clone() } else { u.username.clone() })
            .unwrap_or_else(|| "Guest".to_owned())
    };
    let avatar = move || session.get().user().and_then(|u| u.profile_image.clone());

    let on_logout = move |_| {
        if busy.get() {
            return;
        }
        busy.set(true);
        let token = session.token();
        let config = config.clone();
        let navigate = navigate.clone();

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            if let Some(token) = token {
                if let Err(e) = crate::net::auth_api::logout(&config, &token).await {
                    leptos::logging::warn!("logout request failed: {e}");
                }
            }
            session.logout();
            busy.set(false);
            navigate("/", NavigateOptions::default());
        });
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (token, config);
            session.logout();
            busy.set(false);
            navigate("/", NavigateOptions::default());
        }
    };

    view! {
        <nav class="sidebar">
            <div class="sidebar__profile">
                {move || avatar().map(|url| view! { <img class="sidebar__avatar" src=url alt="Profile"/> })}
                <span class="sidebar__name">{display_name}</span>
            </div>
            <ul class="sidebar__links">
                {NAV_ITEMS
                    .into_iter()
                    .map(|(href, label)| {
                        view! {
                            <li>
                                <a
                                    class="sidebar__link"
                                    class:sidebar__link--active=move || location.pathname.get() == href
                                    href=href
                                >
                                    {label}
                                </a>
                            </li>
                        }
                    })
                    .collect_view()}
            </ul>
            <Show when=move || session.get().is_authenticated()>
                <button class="btn sidebar__logout" on:click=on_logout.clone() disabled=move || busy.get()>
                    "Logout"
                </button>
            </Show>
        </nav>
    }
}
