use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::evaluation::domain::{
    EvaluationId, EvaluationItem, EvaluationRecord, EvaluationSet, ItemId, StoredEvaluation,
};
use crate::evaluation::remote::{EvaluationStore, RemoteError, RemoteResult};
use crate::evaluation::repository::{
    EvaluationRepository, InMemoryEvaluationRepository, RepositoryError,
};
use crate::evaluation::{evaluation_router, EvaluationSession};

pub(super) fn item(id: u32, ratio: f64, score: f64, bonus: f64) -> EvaluationItem {
    EvaluationItem {
        id: ItemId(id),
        name: format!("criterion {id}"),
        ratio,
        score,
        bonus,
    }
}

/// Two criteria weighted 30/70 scoring 80 (+2 bonus) and 50.
pub(super) fn scenario_items() -> Vec<EvaluationItem> {
    vec![item(1, 30.0, 80.0, 2.0), item(2, 70.0, 50.0, 0.0)]
}

pub(super) fn scenario_session() -> EvaluationSession {
    EvaluationSession::new(EvaluationSet::new(scenario_items()))
}

pub(super) fn record(total_score: f64) -> EvaluationRecord {
    EvaluationRecord {
        items: scenario_items(),
        total_score,
        evaluated_at: "2025-05-20T08:30:00Z".parse().expect("valid timestamp"),
    }
}

/// Store that accepts every call and remembers what was sent.
#[derive(Default)]
pub(super) struct RecordingStore {
    created: Mutex<Vec<EvaluationRecord>>,
    updated: Mutex<Vec<(EvaluationId, EvaluationRecord)>>,
}

impl RecordingStore {
    pub(super) fn created(&self) -> Vec<EvaluationRecord> {
        self.created.lock().expect("store mutex poisoned").clone()
    }

    pub(super) fn updated(&self) -> Vec<(EvaluationId, EvaluationRecord)> {
        self.updated.lock().expect("store mutex poisoned").clone()
    }

    pub(super) fn calls(&self) -> usize {
        self.created().len() + self.updated().len()
    }
}

#[async_trait]
impl EvaluationStore for RecordingStore {
    async fn create(&self, record: &EvaluationRecord) -> RemoteResult<Value> {
        self.created
            .lock()
            .expect("store mutex poisoned")
            .push(record.clone());
        Ok(json!({ "id": "1" }))
    }

    async fn list(&self) -> RemoteResult<Vec<StoredEvaluation>> {
        Ok(Vec::new())
    }

    async fn fetch(&self, id: &EvaluationId) -> RemoteResult<StoredEvaluation> {
        Err(RemoteError::Server {
            status: 404,
            message: Some(format!("evaluation {id} not found")),
        })
    }

    async fn update(&self, id: &EvaluationId, record: &EvaluationRecord) -> RemoteResult<Value> {
        self.updated
            .lock()
            .expect("store mutex poisoned")
            .push((id.clone(), record.clone()));
        Ok(Value::Null)
    }

    async fn delete(&self, id: &EvaluationId) -> RemoteResult<Value> {
        Ok(json!({ "id": id }))
    }
}

/// Store whose every call fails with the same error.
pub(super) struct FailingStore {
    error: RemoteError,
    calls: Mutex<usize>,
}

impl FailingStore {
    pub(super) fn new(error: RemoteError) -> Self {
        Self {
            error,
            calls: Mutex::new(0),
        }
    }

    pub(super) fn calls(&self) -> usize {
        *self.calls.lock().expect("store mutex poisoned")
    }

    fn fail<T>(&self) -> RemoteResult<T> {
        *self.calls.lock().expect("store mutex poisoned") += 1;
        Err(self.error.clone())
    }
}

#[async_trait]
impl EvaluationStore for FailingStore {
    async fn create(&self, _record: &EvaluationRecord) -> RemoteResult<Value> {
        self.fail()
    }

    async fn list(&self) -> RemoteResult<Vec<StoredEvaluation>> {
        self.fail()
    }

    async fn fetch(&self, _id: &EvaluationId) -> RemoteResult<StoredEvaluation> {
        self.fail()
    }

    async fn update(&self, _id: &EvaluationId, _record: &EvaluationRecord) -> RemoteResult<Value> {
        self.fail()
    }

    async fn delete(&self, _id: &EvaluationId) -> RemoteResult<Value> {
        self.fail()
    }
}

/// Repository that is always down, for 500 paths.
pub(super) struct UnavailableRepository;

impl EvaluationRepository for UnavailableRepository {
    fn insert(&self, _record: EvaluationRecord) -> Result<StoredEvaluation, RepositoryError> {
        Err(RepositoryError::Unavailable("disk offline".to_string()))
    }

    fn list(&self) -> Result<Vec<StoredEvaluation>, RepositoryError> {
        Err(RepositoryError::Unavailable("disk offline".to_string()))
    }

    fn fetch(&self, _id: &EvaluationId) -> Result<Option<StoredEvaluation>, RepositoryError> {
        Err(RepositoryError::Unavailable("disk offline".to_string()))
    }

    fn replace(
        &self,
        _id: &EvaluationId,
        _record: EvaluationRecord,
    ) -> Result<StoredEvaluation, RepositoryError> {
        Err(RepositoryError::Unavailable("disk offline".to_string()))
    }

    fn remove(&self, _id: &EvaluationId) -> Result<StoredEvaluation, RepositoryError> {
        Err(RepositoryError::Unavailable("disk offline".to_string()))
    }
}

pub(super) fn memory_router() -> (axum::Router, Arc<InMemoryEvaluationRepository>) {
    let repository = Arc::new(InMemoryEvaluationRepository::new());
    (evaluation_router(repository.clone()), repository)
}

pub(super) async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json body")
}
