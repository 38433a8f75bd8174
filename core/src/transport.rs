use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::errors::RequestError;

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantRequest {
    pub message: String,
}

/// Successful reply from `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantReply {
    pub response: String,
}

/// Carries one chat turn to the remote assistant endpoint.
///
/// Implementations must send the caller's session credentials and report any
/// non-success status as [`RequestError::Status`]. The returned future is not
/// required to be `Send`; the widget runs on a single-threaded UI executor.
pub trait ChatTransport {
    fn send(
        &self,
        request: AssistantRequest,
    ) -> impl Future<Output = Result<AssistantReply, RequestError>>;
}

/// Parses a success body, rejecting anything without a string `response`.
pub fn decode_reply(body: &str) -> Result<AssistantReply, RequestError> {
    serde_json::from_str::<AssistantReply>(body).map_err(|e| RequestError::Malformed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_shape() {
        let body = serde_json::to_value(AssistantRequest {
            message: "How much protein in tofu?".to_string(),
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "message": "How much protein in tofu?" }));
    }

    #[test]
    fn test_decode_reply_accepts_extra_fields() {
        let reply = decode_reply(r#"{"response":"About 95 kcal.","model":"llama3.2"}"#).unwrap();
        assert_eq!(reply.response, "About 95 kcal.");
    }

    #[test]
    fn test_decode_reply_rejects_missing_field() {
        let err = decode_reply(r#"{"reply":"About 95 kcal."}"#).unwrap_err();
        assert!(matches!(err, RequestError::Malformed(_)));
    }

    #[test]
    fn test_decode_reply_rejects_non_string_response() {
        assert!(matches!(
            decode_reply(r#"{"response":null}"#),
            Err(RequestError::Malformed(_))
        ));
        assert!(matches!(decode_reply("not json"), Err(RequestError::Malformed(_))));
    }
}
