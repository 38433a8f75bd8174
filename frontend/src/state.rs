use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use leptos::task::spawn_local;
use nutri_assistant_core::{
    ChatMessage, ChatWidget, KeyOutcome, Notifier, OPEN_TRANSITION, PendingTurn, Toast,
    TurnOutcome, Visibility,
};

use crate::api::HttpTransport;

const TOAST_LIFETIME_MS: u32 = 4_000;

/// Transient notifications, provided at the app root.
#[derive(Clone, Copy)]
pub struct ToastState {
    pub toasts: RwSignal<Vec<(u64, Toast)>>,
    next_id: StoredValue<u64>,
}

impl ToastState {
    pub fn provide() -> Self {
        let state = Self {
            toasts: RwSignal::new(Vec::new()),
            next_id: StoredValue::new(0),
        };
        provide_context(state);
        state
    }

    pub fn push(&self, toast: Toast) {
        let id = self.next_id.get_value();
        self.next_id.set_value(id + 1);
        self.toasts.update(|list| list.push((id, toast)));

        let toasts = self.toasts;
        Timeout::new(TOAST_LIFETIME_MS, move || {
            toasts.try_update(|list| list.retain(|(other, _)| *other != id));
        })
        .forget();
    }

    pub fn dismiss(&self, id: u64) {
        self.toasts.update(|list| list.retain(|(other, _)| *other != id));
    }
}

impl Notifier for ToastState {
    fn notify(&self, toast: Toast) {
        self.push(toast);
    }
}

type Widget = ChatWidget<HttpTransport, ToastState>;

/// What the input box should do after a key press.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyHandled {
    /// Suppress the browser's default handling of the key.
    pub consumed: bool,
    /// Move the caret here (UTF-16 units) once the new text is in place.
    pub caret: Option<usize>,
}

/// Reactive mirror of the assistant widget, provided via Leptos context.
///
/// The widget itself lives in local storage owned by the component that
/// created this state; when that component unmounts the widget is dropped and
/// any request still in flight discards its result.
#[derive(Clone, Copy)]
pub struct AssistantState {
    widget: StoredValue<Widget, LocalStorage>,

    // --- Read side (for components to subscribe to) ---
    pub messages: RwSignal<Vec<ChatMessage>>,
    pub visibility: RwSignal<Visibility>,
    pub input: RwSignal<String>,
    pub in_flight: RwSignal<bool>,
}

impl AssistantState {
    /// Create a new `AssistantState` and provide it in the current Leptos context.
    pub fn provide(toasts: ToastState) -> Self {
        let state = Self {
            widget: StoredValue::new_local(ChatWidget::new(HttpTransport, toasts)),
            messages: RwSignal::new(Vec::new()),
            visibility: RwSignal::new(Visibility::Closed),
            input: RwSignal::new(String::new()),
            in_flight: RwSignal::new(false),
        };
        provide_context(state);
        state
    }

    /// Copies the widget's state into the signals. A no-op once unmounted.
    fn sync(&self) {
        let Some((messages, visibility, input, in_flight)) = self.widget.try_with_value(|w| {
            (w.messages(), w.visibility(), w.input(), w.is_in_flight())
        }) else {
            return;
        };
        self.messages.try_set(messages);
        self.visibility.try_set(visibility);
        self.input.try_set(input);
        self.in_flight.try_set(in_flight);
    }

    pub fn toggle(&self) {
        let Some(next) = self.widget.try_with_value(|w| w.toggle()) else {
            return;
        };
        self.sync();

        if next == Visibility::Opening {
            let state = *self;
            Timeout::new(OPEN_TRANSITION.as_millis() as u32, move || {
                state.widget.try_with_value(|w| w.settle_open());
                state.sync();
            })
            .forget();
        }
    }

    pub fn set_input(&self, text: String) {
        self.widget.try_with_value(|w| w.set_input(text.clone()));
        self.input.try_set(text);
    }

    /// Sends the current input, if the widget will take it.
    pub fn submit(&self) {
        let result = self.widget.try_with_value(|w| w.submit_input());
        match result {
            Some(Ok(pending)) => self.drive(pending),
            Some(Err(reason)) => log::debug!("Submission ignored: {reason}"),
            None => {}
        }
    }

    /// Applies the Enter / Shift+Enter contract against the textarea selection.
    pub fn handle_key(
        &self,
        key: &str,
        shift: bool,
        selection: Option<(usize, usize)>,
    ) -> KeyHandled {
        let Some(outcome) = self
            .widget
            .try_with_value(|w| w.handle_key(key, shift, selection))
        else {
            return KeyHandled::default();
        };
        let mut handled = KeyHandled {
            consumed: outcome.consumes_key(),
            caret: None,
        };
        match outcome {
            KeyOutcome::Submitted(pending) => self.drive(pending),
            KeyOutcome::NewlineInserted { caret } => {
                handled.caret = Some(caret);
                self.sync();
            }
            _ => self.sync(),
        }
        handled
    }

    fn drive(&self, pending: PendingTurn<HttpTransport, ToastState>) {
        self.sync();
        let state = *self;
        spawn_local(async move {
            let turn = pending.id();
            let outcome = pending.resolve().await;
            if outcome == TurnOutcome::Discarded {
                log::debug!("Dropped reply for {turn}: assistant unmounted");
            }
            state.sync();
        });
    }
}
