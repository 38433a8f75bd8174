use thiserror::Error;

/// Why a submission was turned away before anything was appended.
///
/// Both variants are silent at the UI level: the send control is simply
/// disabled or nothing happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitRejected {
    #[error("message is empty")]
    Empty,

    #[error("a request is already in flight")]
    InFlight,
}

/// Failure of the outbound assistant request.
///
/// Every variant is recovered the same way (toast plus fallback reply); the
/// distinction only matters for logging.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("Network error: {0}")]
    Transport(String),

    #[error("Server error: {0}")]
    Status(u16),

    #[error("Parse error: {0}")]
    Malformed(String),
}

impl RequestError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, RequestError::Status(401 | 403))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_unauthorized() {
        assert!(RequestError::Status(401).is_unauthorized());
        assert!(RequestError::Status(403).is_unauthorized());
        assert!(!RequestError::Status(500).is_unauthorized());
        assert!(!RequestError::Transport("offline".into()).is_unauthorized());
    }

    #[test]
    fn test_messages() {
        assert_eq!(RequestError::Status(502).to_string(), "Server error: 502");
        assert_eq!(SubmitRejected::InFlight.to_string(), "a request is already in flight");
    }
}
