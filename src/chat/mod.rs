//! Troubleshooting assistant: request shape and reply extraction.

#[cfg(feature = "chat")]
mod client;

#[cfg(feature = "chat")]
pub use client::{ChatClient, ChatError};

use serde::Serialize;
use serde_json::Value;

pub const DEFAULT_ENDPOINT: &str = "https://solar-master-ai.onrender.com/chat";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Shown to the user whenever the assistant cannot be reached.
pub const APOLOGY: &str = "Sorry, something went wrong while processing your message.";

/// Shown when the assistant answers without any recognisable reply text.
pub const FALLBACK_REPLY: &str = "This is default message";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest<'a> {
    pub question: &'a str,
}

/// Pulls the reply text out of an assistant response body.
///
/// Tries a non-empty `response` string, then `response.tasks_output[0].raw`,
/// then falls back to [`FALLBACK_REPLY`].
pub fn extract_reply(body: &Value) -> String {
    let response = &body["response"];
    if let Some(text) = response.as_str().filter(|s| !s.is_empty()) {
        return text.to_string();
    }
    response["tasks_output"][0]["raw"]
        .as_str()
        .filter(|s| !s.is_empty())
        .unwrap_or(FALLBACK_REPLY)
        .to_string()
}
