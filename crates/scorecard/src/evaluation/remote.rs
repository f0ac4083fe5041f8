use async_trait::async_trait;
use serde_json::Value;

use super::domain::{EvaluationId, EvaluationRecord, StoredEvaluation};

/// Fixed text shown when the evaluations resource cannot be reached at all.
pub const UNREACHABLE_MESSAGE: &str =
    "cannot connect to the evaluation server; check that it is running";

/// Result type for calls against the evaluations resource.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Access to the remote `evaluations` resource.
///
/// The HTTP client implements it for production; tests substitute in-memory fakes.
#[async_trait]
pub trait EvaluationStore: Send + Sync {
    /// `POST /evaluations`. The response body is returned untouched.
    async fn create(&self, record: &EvaluationRecord) -> RemoteResult<Value>;

    /// `GET /evaluations`.
    async fn list(&self) -> RemoteResult<Vec<StoredEvaluation>>;

    /// `GET /evaluations/{id}`.
    async fn fetch(&self, id: &EvaluationId) -> RemoteResult<StoredEvaluation>;

    /// `PUT /evaluations/{id}`. The response body is returned untouched, `Null` when empty.
    async fn update(&self, id: &EvaluationId, record: &EvaluationRecord) -> RemoteResult<Value>;

    /// `DELETE /evaluations/{id}`. Returns the confirmation body.
    async fn delete(&self, id: &EvaluationId) -> RemoteResult<Value>;
}

/// Failure talking to the evaluations resource.
///
/// `Display` yields the description shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    #[error("{}", UNREACHABLE_MESSAGE)]
    Unreachable,
    #[error("the evaluation server did not respond in time")]
    Timeout,
    #[error("{}", server_message(.status, .message))]
    Server { status: u16, message: Option<String> },
    #[error("'{0}' cannot be used as an evaluation id")]
    InvalidId(String),
    #[error("request failed: {0}")]
    Transport(String),
    #[error("unexpected response from the evaluation server: {0}")]
    Decode(String),
}

impl RemoteError {
    /// Builds a server error from a non-success status and its raw body.
    ///
    /// A JSON body with a non-empty string `message` supplies the text; anything else
    /// falls back to the status code.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|value| {
                value
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .filter(|message| !message.trim().is_empty());

        RemoteError::Server { status, message }
    }
}

fn server_message(status: &u16, message: &Option<String>) -> String {
    match message {
        Some(message) => message.clone(),
        None => format!("server error: {status}"),
    }
}
