//! Conversational assistant widget for the nutrition tracker.
//!
//! Holds the message history, the open/closed visibility machine and the
//! single-flight request controller. Rendering and the HTTP transport live in
//! the frontend crate; everything here is runtime-agnostic so it can be driven
//! from wasm or from native tests.

pub mod errors;
pub mod input;
pub mod message;
pub mod notify;
pub mod transport;
pub mod visibility;
pub mod widget;

pub use errors::{RequestError, SubmitRejected};
pub use input::{KeyAction, KeyOutcome};
pub use message::{ChatMessage, FALLBACK_REPLY, GREETING, MessageLog, Role};
pub use notify::{Notifier, Toast};
pub use transport::{AssistantReply, AssistantRequest, ChatTransport, decode_reply};
pub use visibility::{OPEN_TRANSITION, SessionInfo, View, Visibility, assistant_allowed};
pub use widget::{ChatWidget, PendingTurn, RequestState, TurnId, TurnOutcome};
