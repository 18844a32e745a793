//! Root application component with routing and context providers.

use std::sync::Arc;

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    ParamSegment, StaticSegment,
    components::{Route, Router, Routes},
};

use crate::config::ApiConfig;
use crate::pages::{
    create_poll::CreatePollPage, home::HomePage, login::LoginPage, my_polls::MyPollsPage,
    poll_detail::PollDetailPage, profile::ProfilePage, voted_polls::VotedPollsPage,
};
use crate::state::session::SessionStore;
use crate::util::auth::provide_session_context;
use crate::util::storage::LocalStorage;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Owns the session store, restores it from `localStorage` once mounted, and
/// sets up client-side routing.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();
    provide_context(ApiConfig::default());

    let session = provide_session_context(SessionStore::new(Arc::new(LocalStorage)));

    // Effects only run in the browser, so SSR renders the loading state.
    Effect::new(move || session.initialize_auth());

    view! {
        <Stylesheet id="leptos" href="/pkg/pollhub.css"/>
        <Title text="Pollhub"/>

        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment("") view=LoginPage/>
                <Route path=StaticSegment("home") view=HomePage/>
                <Route path=(StaticSegment("polls"), ParamSegment("id")) view=PollDetailPage/>
                <Route path=StaticSegment("create-poll") view=CreatePollPage/>
                <Route path=StaticSegment("my-polls") view=MyPollsPage/>
                <Route path=StaticSegment("my-voted-polls") view=VotedPollsPage/>
                <Route path=StaticSegment("profile") view=ProfilePage/>
            </Routes>
        </Router>
    }
}
