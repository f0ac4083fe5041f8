use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use super::domain::{EvaluationId, EvaluationRecord, StoredEvaluation};

/// Storage behind the development evaluations endpoint.
pub trait EvaluationRepository: Send + Sync {
    fn insert(&self, record: EvaluationRecord) -> Result<StoredEvaluation, RepositoryError>;
    fn list(&self) -> Result<Vec<StoredEvaluation>, RepositoryError>;
    fn fetch(&self, id: &EvaluationId) -> Result<Option<StoredEvaluation>, RepositoryError>;
    fn replace(
        &self,
        id: &EvaluationId,
        record: EvaluationRecord,
    ) -> Result<StoredEvaluation, RepositoryError>;
    fn remove(&self, id: &EvaluationId) -> Result<StoredEvaluation, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("evaluation {0} not found")]
    NotFound(EvaluationId),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Process-local repository keeping records in insertion order.
#[derive(Debug)]
pub struct InMemoryEvaluationRepository {
    records: Mutex<Vec<StoredEvaluation>>,
    sequence: AtomicU64,
}

impl InMemoryEvaluationRepository {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            sequence: AtomicU64::new(1),
        }
    }

    fn next_id(&self) -> EvaluationId {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        EvaluationId(id.to_string())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<StoredEvaluation>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))
    }
}

impl Default for InMemoryEvaluationRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl EvaluationRepository for InMemoryEvaluationRepository {
    fn insert(&self, record: EvaluationRecord) -> Result<StoredEvaluation, RepositoryError> {
        let stored = StoredEvaluation {
            id: Some(self.next_id()),
            record,
        };
        self.lock()?.push(stored.clone());
        Ok(stored)
    }

    fn list(&self) -> Result<Vec<StoredEvaluation>, RepositoryError> {
        Ok(self.lock()?.clone())
    }

    fn fetch(&self, id: &EvaluationId) -> Result<Option<StoredEvaluation>, RepositoryError> {
        Ok(self
            .lock()?
            .iter()
            .find(|stored| stored.id.as_ref() == Some(id))
            .cloned())
    }

    fn replace(
        &self,
        id: &EvaluationId,
        record: EvaluationRecord,
    ) -> Result<StoredEvaluation, RepositoryError> {
        let mut guard = self.lock()?;
        let stored = guard
            .iter_mut()
            .find(|stored| stored.id.as_ref() == Some(id))
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))?;
        stored.record = record;
        Ok(stored.clone())
    }

    fn remove(&self, id: &EvaluationId) -> Result<StoredEvaluation, RepositoryError> {
        let mut guard = self.lock()?;
        let position = guard
            .iter()
            .position(|stored| stored.id.as_ref() == Some(id))
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))?;
        Ok(guard.remove(position))
    }
}
