use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::domain::{EvaluationId, EvaluationRecord, StoredEvaluation};
use super::remote::{EvaluationStore, RemoteError, RemoteResult};
use crate::config::RemoteConfig;

/// HTTP client for the `evaluations` resource.
#[derive(Debug, Clone)]
pub struct RestEvaluationClient {
    config: RemoteConfig,
    client: Client,
}

impl RestEvaluationClient {
    pub fn new(config: RemoteConfig) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| RemoteError::Transport(err.to_string()))?;

        Ok(Self { config, client })
    }

    /// Appends the id as a single percent-encoded path segment.
    ///
    /// Empty and dot-segment ids are refused since they would address another resource.
    fn item_url(&self, id: &EvaluationId) -> RemoteResult<Url> {
        if matches!(id.0.as_str(), "" | "." | "..") {
            return Err(RemoteError::InvalidId(id.0.clone()));
        }

        let mut url = Url::parse(&self.config.evaluations_url())
            .map_err(|err| RemoteError::Transport(err.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| RemoteError::Transport("base url cannot take a path".to_string()))?
            .push(&id.0);
        Ok(url)
    }

    /// Sends the request and returns the body of a successful response.
    async fn send(&self, label: &str, request: RequestBuilder) -> RemoteResult<String> {
        debug!(operation = label, "calling evaluation server");

        let response = request
            .send()
            .await
            .map_err(classify)
            .inspect_err(|err| warn!(operation = label, error = %err, "request failed"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = RemoteError::from_response(status.as_u16(), &body);
            warn!(operation = label, status = status.as_u16(), error = %err, "server rejected request");
            return Err(err);
        }

        response.text().await.map_err(classify)
    }
}

/// Body of a write acknowledgement. Only the status decides success, so any body is kept:
/// empty reads as `Null` and non-JSON text as a string.
fn confirmation(body: &str) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}

fn decode<T>(body: &str) -> RemoteResult<T>
where
    T: DeserializeOwned,
{
    serde_json::from_str(body).map_err(|err| RemoteError::Decode(err.to_string()))
}

/// Maps transport failures onto the user-facing taxonomy.
fn classify(err: reqwest::Error) -> RemoteError {
    if err.is_connect() {
        RemoteError::Unreachable
    } else if err.is_timeout() {
        RemoteError::Timeout
    } else {
        RemoteError::Transport(err.to_string())
    }
}

#[async_trait]
impl EvaluationStore for RestEvaluationClient {
    async fn create(&self, record: &EvaluationRecord) -> RemoteResult<Value> {
        let request = self.client.post(self.config.evaluations_url()).json(record);
        Ok(confirmation(&self.send("create", request).await?))
    }

    async fn list(&self) -> RemoteResult<Vec<StoredEvaluation>> {
        let request = self.client.get(self.config.evaluations_url());
        decode(&self.send("list", request).await?)
    }

    async fn fetch(&self, id: &EvaluationId) -> RemoteResult<StoredEvaluation> {
        let request = self.client.get(self.item_url(id)?);
        decode(&self.send("fetch", request).await?)
    }

    async fn update(&self, id: &EvaluationId, record: &EvaluationRecord) -> RemoteResult<Value> {
        let request = self.client.put(self.item_url(id)?).json(record);
        Ok(confirmation(&self.send("update", request).await?))
    }

    async fn delete(&self, id: &EvaluationId) -> RemoteResult<Value> {
        let request = self.client.delete(self.item_url(id)?);
        Ok(confirmation(&self.send("delete", request).await?))
    }
}
