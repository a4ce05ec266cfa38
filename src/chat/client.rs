use std::time::Duration;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use super::{APOLOGY, ChatRequest, extract_reply};

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("chat request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("chat request failed: {status} - {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// Blocking client for the troubleshooting assistant.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: reqwest::blocking::Client,
    endpoint: String,
}

impl ChatClient {
    /// # Errors
    ///
    /// Returns a `ChatError` if the HTTP client cannot be built.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ChatError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends one question and returns the extracted reply.
    ///
    /// # Errors
    ///
    /// Returns a `ChatError` on transport failure, a non-success status, or
    /// a body that is not JSON.
    pub fn try_ask(&self, question: &str) -> Result<String, ChatError> {
        let res = self
            .http
            .post(&self.endpoint)
            .json(&ChatRequest { question })
            .send()?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().unwrap_or_default();
            return Err(ChatError::Status { status, body });
        }

        let body: Value = res.json()?;
        debug!(endpoint = %self.endpoint, "chat reply received");
        Ok(extract_reply(&body))
    }

    /// Like [`ChatClient::try_ask`], but any failure becomes the apology text.
    pub fn ask(&self, question: &str) -> String {
        self.try_ask(question).unwrap_or_else(|e| {
            warn!(error = %e, "chat request failed");
            APOLOGY.to_string()
        })
    }
}
