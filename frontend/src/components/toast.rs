use leptos::prelude::*;

use crate::state::ToastState;

/// Stack of transient notifications in the corner of the screen.
#[component]
pub fn ToastHost() -> impl IntoView {
    let toasts = expect_context::<ToastState>();

    view! {
        <div class="toast-host" aria-live="polite">
            <For
                each=move || toasts.toasts.get()
                key=|(id, _)| *id
                let:entry
            >
                {
                    let (id, toast) = entry;
                    view! {
                        <div class="toast error" on:click=move |_| toasts.dismiss(id)>
                            <div class="toast-title">{toast.title}</div>
                            <div>{toast.description}</div>
                        </div>
                    }
                }
            </For>
        </div>
    }
}
