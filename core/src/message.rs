use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// First message shown when the assistant is opened with an empty history.
pub const GREETING: &str = "Hi! I'm your nutrition assistant. \
                            Ask me about calories, macros, meal ideas or workouts.";

/// Substituted for the assistant reply whenever a request fails.
pub const FALLBACK_REPLY: &str =
    "I'm sorry, I'm having trouble connecting right now. Please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Role {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            other => Err(format!("Unknown role: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Builds a message stamped with the current time.
    pub fn now(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Append-only conversation history, ordered by insertion.
/// Entries cannot be removed or edited once pushed.
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    entries: Vec<ChatMessage>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_user(&mut self, content: impl Into<String>) -> &ChatMessage {
        self.push(ChatMessage::now(Role::User, content))
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) -> &ChatMessage {
        self.push(ChatMessage::now(Role::Assistant, content))
    }

    /// Appends the greeting if nothing has been said yet. Returns whether it did.
    pub fn seed_greeting(&mut self) -> bool {
        if !self.entries.is_empty() {
            return false;
        }
        self.push_assistant(GREETING);
        true
    }

    fn push(&mut self, message: ChatMessage) -> &ChatMessage {
        let index = self.entries.len();
        self.entries.push(message);
        &self.entries[index]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.entries.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChatMessage> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[ChatMessage] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_str() {
        assert_eq!(Role::try_from("ASSISTANT"), Ok(Role::Assistant));
        assert_eq!(Role::User.to_string(), "user");
        assert!(Role::try_from("system").is_err());
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&Role::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
    }

    #[test]
    fn test_log_preserves_insertion_order() {
        let mut log = MessageLog::new();
        log.push_user("first");
        log.push_assistant("second");
        log.push_user("third");

        let contents: Vec<&str> = log.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, ["first", "second", "third"]);
        assert_eq!(log.last().map(|m| m.role), Some(Role::User));
    }

    #[test]
    fn test_timestamps_are_non_decreasing() {
        let mut log = MessageLog::new();
        for i in 0..5 {
            log.push_user(format!("m{i}"));
        }
        let stamps: Vec<_> = log.iter().map(|m| m.timestamp).collect();
        assert!(stamps.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_seed_greeting_only_when_empty() {
        let mut log = MessageLog::new();
        assert!(log.seed_greeting());
        assert!(!log.seed_greeting());
        assert_eq!(log.len(), 1);
        assert_eq!(log.as_slice()[0].role, Role::Assistant);
        assert_eq!(log.as_slice()[0].content, GREETING);

        let mut busy = MessageLog::new();
        busy.push_user("hello");
        assert!(!busy.seed_greeting());
        assert_eq!(busy.len(), 1);
    }
}
