use std::cell::RefCell;
use std::rc::{Rc, Weak};

use log::{debug, warn};

use crate::errors::SubmitRejected;
use crate::input::{KeyAction, KeyOutcome, insert_newline};
use crate::message::{ChatMessage, FALLBACK_REPLY, MessageLog};
use crate::notify::{Notifier, Toast};
use crate::transport::{AssistantRequest, ChatTransport};
use crate::visibility::Visibility;

/// Identifies one submission within a widget instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TurnId(u64);

impl std::fmt::Display for TurnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "turn-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    InFlight(TurnId),
}

/// How a [`PendingTurn`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The server reply was appended.
    Replied,
    /// The request failed; a toast was raised and the fallback reply appended.
    FellBack,
    /// The widget was gone by the time the request completed. Nothing changed.
    Discarded,
}

#[derive(Debug, Default)]
struct WidgetState {
    log: MessageLog,
    visibility: Visibility,
    input: String,
    request: RequestState,
    turns_started: u64,
}

impl WidgetState {
    fn begin_turn(&mut self, text: &str) -> Result<TurnId, SubmitRejected> {
        if text.trim().is_empty() {
            return Err(SubmitRejected::Empty);
        }
        if let RequestState::InFlight(_) = self.request {
            return Err(SubmitRejected::InFlight);
        }

        self.turns_started += 1;
        let turn = TurnId(self.turns_started);
        self.log.push_user(text);
        self.input.clear();
        self.request = RequestState::InFlight(turn);
        Ok(turn)
    }

    /// Closes out `turn` with the fallback reply if it is still in flight.
    fn abandon_turn(&mut self, turn: TurnId) -> bool {
        self.request == RequestState::InFlight(turn) && self.finish_turn(turn, FALLBACK_REPLY)
    }

    /// Appends the assistant side of `turn` and releases the in-flight slot.
    fn finish_turn(&mut self, turn: TurnId, content: &str) -> bool {
        if self.request != RequestState::InFlight(turn) {
            warn!("Ignoring completion of {turn}: not the in-flight request");
            return false;
        }
        self.log.push_assistant(content);
        self.request = RequestState::Idle;
        true
    }
}

/// The conversational assistant widget.
///
/// Owns the history and the request slot for as long as it is mounted.
/// Dropping it is the unmount: any [`PendingTurn`] still out there only holds
/// a weak handle and will discard its result.
pub struct ChatWidget<T, N> {
    state: Rc<RefCell<WidgetState>>,
    transport: Rc<T>,
    notifier: Rc<N>,
}

impl<T, N> ChatWidget<T, N>
where
    T: ChatTransport,
    N: Notifier,
{
    pub fn new(transport: T, notifier: N) -> Self {
        Self {
            state: Rc::new(RefCell::new(WidgetState::default())),
            transport: Rc::new(transport),
            notifier: Rc::new(notifier),
        }
    }

    /// Opens or closes the panel. Opening an empty conversation seeds the greeting.
    pub fn toggle(&self) -> Visibility {
        let mut state = self.state.borrow_mut();
        let next = state.visibility.toggled();
        if next == Visibility::Opening && state.log.seed_greeting() {
            debug!("Seeded assistant greeting");
        }
        state.visibility = next;
        next
    }

    /// Called when the opening transition timer fires.
    pub fn settle_open(&self) -> Visibility {
        let mut state = self.state.borrow_mut();
        state.visibility = state.visibility.settled();
        state.visibility
    }

    /// Starts a chat turn with `text`.
    ///
    /// On success the user message is already in the history and the input
    /// buffer is cleared; the caller must drive the returned [`PendingTurn`] to
    /// issue the request. Empty text and concurrent submissions are rejected
    /// without touching any state.
    pub fn submit(&self, text: &str) -> Result<PendingTurn<T, N>, SubmitRejected> {
        let turn = self.state.borrow_mut().begin_turn(text).inspect_err(|reason| {
            debug!("Submission rejected: {reason}");
        })?;
        debug!("Started {turn}");

        Ok(PendingTurn {
            turn,
            resolved: false,
            message: text.to_string(),
            state: Rc::downgrade(&self.state),
            transport: Rc::clone(&self.transport),
            notifier: Rc::clone(&self.notifier),
        })
    }

    /// Submits whatever is in the input buffer.
    pub fn submit_input(&self) -> Result<PendingTurn<T, N>, SubmitRejected> {
        let text = self.state.borrow().input.clone();
        self.submit(&text)
    }

    /// Applies the Enter / Shift+Enter contract to a key press.
    ///
    /// `selection` is the textarea selection in UTF-16 units; a line break
    /// replaces it, or goes at the end of the buffer when there is none.
    pub fn handle_key(
        &self,
        key: &str,
        shift: bool,
        selection: Option<(usize, usize)>,
    ) -> KeyOutcome<PendingTurn<T, N>> {
        match KeyAction::classify(key, shift) {
            KeyAction::Submit => match self.submit_input() {
                Ok(pending) => KeyOutcome::Submitted(pending),
                Err(reason) => KeyOutcome::Rejected(reason),
            },
            KeyAction::InsertNewline => {
                let caret = insert_newline(&mut self.state.borrow_mut().input, selection);
                KeyOutcome::NewlineInserted { caret }
            }
            KeyAction::Ignore => KeyOutcome::Ignored,
        }
    }

    pub fn set_input(&self, text: impl Into<String>) {
        self.state.borrow_mut().input = text.into();
    }

    pub fn input(&self) -> String {
        self.state.borrow().input.clone()
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.state.borrow().log.as_slice().to_vec()
    }

    pub fn message_count(&self) -> usize {
        self.state.borrow().log.len()
    }

    pub fn visibility(&self) -> Visibility {
        self.state.borrow().visibility
    }

    pub fn request_state(&self) -> RequestState {
        self.state.borrow().request
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self.request_state(), RequestState::InFlight(_))
    }
}

/// The asynchronous half of a submission.
///
/// Holds only a weak reference to the widget state so an unmounted widget is
/// never written to. Dropping it unresolved, or dropping the `resolve` future
/// part way, still closes the turn with the fallback reply.
#[must_use = "a pending turn does nothing until resolved"]
pub struct PendingTurn<T, N> {
    turn: TurnId,
    resolved: bool,
    message: String,
    state: Weak<RefCell<WidgetState>>,
    transport: Rc<T>,
    notifier: Rc<N>,
}

impl<T, N> PendingTurn<T, N>
where
    T: ChatTransport,
    N: Notifier,
{
    pub fn id(&self) -> TurnId {
        self.turn
    }

    /// Sends the request and reconciles the outcome into the history.
    pub async fn resolve(mut self) -> TurnOutcome {
        let request = AssistantRequest {
            message: self.message.clone(),
        };
        let result = self.transport.send(request).await;

        let Some(state) = self.state.upgrade() else {
            debug!("Widget unmounted before {} completed; dropping result", self.turn);
            self.resolved = true;
            return TurnOutcome::Discarded;
        };

        let (content, outcome) = match result {
            Ok(reply) => (reply.response, TurnOutcome::Replied),
            Err(e) => {
                if e.is_unauthorized() {
                    warn!("Assistant request for {} refused: session not accepted", self.turn);
                } else {
                    warn!("Assistant request for {} failed: {e}", self.turn);
                }
                self.notifier.notify(Toast::request_failed());
                (FALLBACK_REPLY.to_string(), TurnOutcome::FellBack)
            }
        };

        self.resolved = true;
        if state.borrow_mut().finish_turn(self.turn, &content) {
            outcome
        } else {
            TurnOutcome::Discarded
        }
    }
}

impl<T, N> Drop for PendingTurn<T, N> {
    fn drop(&mut self) {
        if self.resolved {
            return;
        }
        let Some(state) = self.state.upgrade() else {
            return;
        };
        let Ok(mut state) = state.try_borrow_mut() else {
            warn!("Could not release {}: widget state is borrowed", self.turn);
            return;
        };
        if state.abandon_turn(self.turn) {
            debug!("{} dropped before completing; closed with fallback reply", self.turn);
        }
    }
}
