//! Chat Request Payload
//!
//! Wire shape of `POST /api/chat`:
//!
//! ```json
//! {
//!   "message": "Find me a dentist in Tunis",
//!   "context": {
//!     "conversationHistory": [{"role": "user", "content": "..."}],
//!     "timestamp": "2024-05-01T10:00:00.000Z"
//!   }
//! }
//! ```

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Message, Role};

/// Body sent to the chat endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub context: ChatContext,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatContext {
    /// Messages exchanged before this one, oldest first
    pub conversation_history: Vec<HistoryEntry>,
    /// ISO-8601 send time
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: Role,
    pub content: String,
}

impl ChatRequest {
    /// Build a request for `message` with the prior `history` as context
    pub fn new(message: impl Into<String>, history: &[Message]) -> Self {
        Self {
            message: message.into(),
            context: ChatContext {
                conversation_history: history
                    .iter()
                    .map(|m| HistoryEntry {
                        role: m.role,
                        content: m.content.clone(),
                    })
                    .collect(),
                timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape() {
        let history = vec![Message::user("bonjour"), Message::assistant("Bonjour !")];
        let request = ChatRequest::new("Find me a dentist", &history);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["message"], "Find me a dentist");
        let entries = json["context"]["conversationHistory"].as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["role"], "user");
        assert_eq!(entries[1]["role"], "assistant");
        assert_eq!(entries[1]["content"], "Bonjour !");
        assert!(json["context"]["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn test_empty_history() {
        let request = ChatRequest::new("hi", &[]);
        assert!(request.context.conversation_history.is_empty());
    }
}
