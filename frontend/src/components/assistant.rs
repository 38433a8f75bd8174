use leptos::ev;
use leptos::html;
use leptos::prelude::*;
use nutri_assistant_core::{Role, Visibility};

use crate::state::{AssistantState, ToastState};

/// Floating nutrition assistant: launcher button plus chat panel.
#[component]
pub fn AssistantWidget() -> impl IntoView {
    let toasts = expect_context::<ToastState>();
    let state = AssistantState::provide(toasts);

    let panel_class = move || match state.visibility.get() {
        Visibility::Closed => "assistant-panel hidden",
        Visibility::Opening => "assistant-panel opening",
        Visibility::Open => "assistant-panel open",
    };

    view! {
        <div class="assistant">
            <div class=panel_class>
                <div class="assistant-header">
                    <span>"Nutrition Assistant"</span>
                    <button class="close-btn" on:click=move |_| state.toggle()>"×"</button>
                </div>
                <MessageList />
                <AssistantInput />
            </div>
            <button
                class="assistant-launcher"
                aria-label="Toggle nutrition assistant"
                on:click=move |_| state.toggle()
            >
                {move || if state.visibility.get().is_visible() { "Close" } else { "Ask AI" }}
            </button>
        </div>
    }
}

/// Message history; keeps the newest entry in view.
#[component]
fn MessageList() -> impl IntoView {
    let state = expect_context::<AssistantState>();
    let list_ref = NodeRef::<html::Div>::new();

    Effect::new(move |_| {
        state.messages.track();
        if let Some(el) = list_ref.get() {
            el.set_scroll_top(el.scroll_height());
        }
    });

    view! {
        <div class="messages-container" node_ref=list_ref>
            <For
                each=move || state.messages.get().into_iter().enumerate()
                key=|(index, _)| *index
                let:entry
            >
                <MessageBubble role=entry.1.role content=entry.1.content.clone() />
            </For>
            <Show when=move || state.in_flight.get()>
                <div class="message assistant typing">"…"</div>
            </Show>
        </div>
    }
}

/// A single chat message bubble.
#[component]
fn MessageBubble(role: Role, content: String) -> impl IntoView {
    let css_class = match role {
        Role::User => "message user",
        Role::Assistant => "message assistant",
    };

    view! {
        <div class=css_class>
            <div class="role-label">{role.as_str()}</div>
            <div>{content}</div>
        </div>
    }
}

/// Chat input form with textarea and send button.
#[component]
fn AssistantInput() -> impl IntoView {
    let state = expect_context::<AssistantState>();
    let is_sending = move || state.in_flight.get();
    let textarea_ref = NodeRef::<html::Textarea>::new();

    let on_keydown = move |ev: ev::KeyboardEvent| {
        let textarea = textarea_ref.get_untracked();
        let selection = textarea.as_ref().and_then(|el| {
            let start = el.selection_start().ok().flatten()?;
            let end = el.selection_end().ok().flatten()?;
            Some((start as usize, end as usize))
        });

        let handled = state.handle_key(&ev.key(), ev.shift_key(), selection);
        if handled.consumed {
            ev.prevent_default();
        }
        // write the text now so the caret can be placed before the next paint
        if let (Some(el), Some(caret)) = (textarea, handled.caret) {
            el.set_value(&state.input.get_untracked());
            let caret = caret as u32;
            if el.set_selection_range(caret, caret).is_err() {
                log::warn!("Could not restore caret in assistant input");
            }
        }
    };

    view! {
        <div class="input-area">
            <div class="input-row">
                <textarea
                    node_ref=textarea_ref
                    rows="1"
                    placeholder="Ask about your meals… (Enter to send, Shift+Enter for newline)"
                    prop:value=move || state.input.get()
                    on:input=move |ev| state.set_input(event_target_value(&ev))
                    on:keydown=on_keydown
                    disabled=is_sending
                />
                <button
                    class="send-btn"
                    on:click=move |_| state.submit()
                    disabled=move || is_sending() || state.input.get().trim().is_empty()
                >
                    {move || if is_sending() { "Sending…" } else { "Send" }}
                </button>
            </div>
        </div>
    }
}
