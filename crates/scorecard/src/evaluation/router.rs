use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::json;
use tracing::info;

use super::domain::{EvaluationId, EvaluationRecord};
use super::repository::{EvaluationRepository, RepositoryError};
use super::scoring::{is_ratio_valid, total_ratio};

/// Router builder exposing the `evaluations` resource under `/api`.
pub fn evaluation_router<R>(repository: Arc<R>) -> Router
where
    R: EvaluationRepository + 'static,
{
    Router::new()
        .route(
            "/api/evaluations",
            get(list_handler::<R>).post(create_handler::<R>),
        )
        .route(
            "/api/evaluations/:evaluation_id",
            get(fetch_handler::<R>)
                .put(update_handler::<R>)
                .delete(delete_handler::<R>),
        )
        .with_state(repository)
}

fn message(status: StatusCode, text: impl Into<String>) -> Response {
    let payload = json!({ "message": text.into() });
    (status, axum::Json(payload)).into_response()
}

fn repository_failure(error: RepositoryError) -> Response {
    match error {
        RepositoryError::NotFound(_) => message(StatusCode::NOT_FOUND, error.to_string()),
        RepositoryError::Unavailable(_) => {
            message(StatusCode::INTERNAL_SERVER_ERROR, error.to_string())
        }
    }
}

/// Body rejections get the same `{message}` shape as every other failure.
fn read_record(
    payload: Result<axum::Json<EvaluationRecord>, JsonRejection>,
) -> Result<EvaluationRecord, Response> {
    payload
        .map(|axum::Json(record)| record)
        .map_err(|rejection| message(rejection.status(), rejection.body_text()))
}

fn reject_invalid_ratio(record: &EvaluationRecord) -> Option<Response> {
    if is_ratio_valid(&record.items) {
        return None;
    }
    Some(message(
        StatusCode::UNPROCESSABLE_ENTITY,
        format!(
            "ratios must add up to 100 (current: {})",
            total_ratio(&record.items)
        ),
    ))
}

pub(crate) async fn create_handler<R>(
    State(repository): State<Arc<R>>,
    payload: Result<axum::Json<EvaluationRecord>, JsonRejection>,
) -> Response
where
    R: EvaluationRepository + 'static,
{
    let record = match read_record(payload) {
        Ok(record) => record,
        Err(response) => return response,
    };
    if let Some(rejection) = reject_invalid_ratio(&record) {
        return rejection;
    }

    match repository.insert(record) {
        Ok(stored) => {
            info!(
                id = stored.id_label(),
                total_score = stored.record.total_score,
                "evaluation stored"
            );
            (StatusCode::CREATED, axum::Json(stored)).into_response()
        }
        Err(error) => repository_failure(error),
    }
}

pub(crate) async fn list_handler<R>(State(repository): State<Arc<R>>) -> Response
where
    R: EvaluationRepository + 'static,
{
    match repository.list() {
        Ok(records) => (StatusCode::OK, axum::Json(records)).into_response(),
        Err(error) => repository_failure(error),
    }
}

pub(crate) async fn fetch_handler<R>(
    State(repository): State<Arc<R>>,
    Path(evaluation_id): Path<String>,
) -> Response
where
    R: EvaluationRepository + 'static,
{
    let id = EvaluationId(evaluation_id);
    match repository.fetch(&id) {
        Ok(Some(stored)) => (StatusCode::OK, axum::Json(stored)).into_response(),
        Ok(None) => repository_failure(RepositoryError::NotFound(id)),
        Err(error) => repository_failure(error),
    }
}

pub(crate) async fn update_handler<R>(
    State(repository): State<Arc<R>>,
    Path(evaluation_id): Path<String>,
    payload: Result<axum::Json<EvaluationRecord>, JsonRejection>,
) -> Response
where
    R: EvaluationRepository + 'static,
{
    let record = match read_record(payload) {
        Ok(record) => record,
        Err(response) => return response,
    };
    if let Some(rejection) = reject_invalid_ratio(&record) {
        return rejection;
    }

    let id = EvaluationId(evaluation_id);
    match repository.replace(&id, record) {
        Ok(stored) => {
            info!(id = %id, "evaluation updated");
            (StatusCode::OK, axum::Json(stored)).into_response()
        }
        Err(error) => repository_failure(error),
    }
}

pub(crate) async fn delete_handler<R>(
    State(repository): State<Arc<R>>,
    Path(evaluation_id): Path<String>,
) -> Response
where
    R: EvaluationRepository + 'static,
{
    let id = EvaluationId(evaluation_id);
    match repository.remove(&id) {
        Ok(_) => {
            info!(id = %id, "evaluation deleted");
            let payload = json!({
                "id": id,
                "message": format!("evaluation {id} deleted"),
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => repository_failure(error),
    }
}
