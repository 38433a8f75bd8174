mod api;
mod components;
mod state;

use leptos::ev;
use leptos::mount::mount_to_body;
use leptos::prelude::*;
use leptos::task::spawn_local;
use nutri_assistant_core::{SessionInfo, View, assistant_allowed};

use components::assistant::AssistantWidget;
use components::toast::ToastHost;
use state::ToastState;

fn current_path() -> String {
    window().location().pathname().unwrap_or_default()
}

/// Root application component.
#[component]
fn App() -> impl IntoView {
    ToastState::provide();

    let (path, set_path) = signal(current_path());
    let (session, set_session) = signal(SessionInfo::default());

    // Re-evaluate on back/forward navigation
    let _ = window_event_listener(ev::popstate, move |_| set_path.set(current_path()));

    // Load session on mount
    spawn_local(async move {
        match api::fetch_session().await {
            Ok(info) => set_session.set(info),
            Err(e) => log::warn!("Failed to fetch session: {e}"),
        }
    });

    let allowed = move || assistant_allowed(&session.get(), &View::from_path(&path.get()));

    view! {
        <Show when=allowed>
            <AssistantWidget />
        </Show>
        <ToastHost />
    }
}

fn main() {
    console_log::init_with_level(log::Level::Debug).expect("Failed to init logger");
    mount_to_body(App);
}
