//! Weighted-scoring evaluations: the criteria model, the scoring arithmetic, the editing
//! session that guards saves, and both sides of the `evaluations` REST resource.

pub mod client;
pub mod domain;
pub mod remote;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod session;

#[cfg(test)]
mod tests;

pub use client::RestEvaluationClient;
pub use domain::{
    EvaluationField, EvaluationId, EvaluationItem, EvaluationRecord, EvaluationSet, ItemId,
    StoredEvaluation,
};
pub use remote::{EvaluationStore, RemoteError, RemoteResult, UNREACHABLE_MESSAGE};
pub use repository::{EvaluationRepository, InMemoryEvaluationRepository, RepositoryError};
pub use router::evaluation_router;
pub use scoring::{EvaluationSummary, ItemView};
pub use session::{EvaluationSession, SaveStatus};
