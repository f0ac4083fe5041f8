use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::domain::{
    EvaluationField, EvaluationId, EvaluationItem, EvaluationRecord, EvaluationSet, ItemId,
};
use super::remote::{EvaluationStore, RemoteResult};
use super::scoring::{is_ratio_valid, total_ratio, total_score, EvaluationSummary};

pub const VALIDATION_MARKER: &str = "⚠️";
pub const SUCCESS_MARKER: &str = "✅";
pub const FAILURE_MARKER: &str = "❌";

/// Save progress of an editing session.
///
/// `Saving` carries no message, so a stale message can never be shown while a save is in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveStatus {
    Idle,
    Saving,
    Succeeded(String),
    Failed(String),
}

impl SaveStatus {
    pub fn message(&self) -> Option<&str> {
        match self {
            SaveStatus::Idle | SaveStatus::Saving => None,
            SaveStatus::Succeeded(message) | SaveStatus::Failed(message) => Some(message),
        }
    }

    pub fn is_saving(&self) -> bool {
        matches!(self, SaveStatus::Saving)
    }
}

/// Single-user editing session over one evaluation set.
#[derive(Debug, Clone)]
pub struct EvaluationSession {
    set: EvaluationSet,
    status: SaveStatus,
}

impl EvaluationSession {
    pub fn new(set: EvaluationSet) -> Self {
        Self {
            set,
            status: SaveStatus::Idle,
        }
    }

    pub fn items(&self) -> &[EvaluationItem] {
        self.set.items()
    }

    pub fn status(&self) -> &SaveStatus {
        &self.status
    }

    pub fn summary(&self) -> EvaluationSummary {
        EvaluationSummary::from_items(self.items())
    }

    /// The save trigger is disabled while a save is in flight.
    pub fn can_save(&self) -> bool {
        !self.status.is_saving()
    }

    /// Applies a raw text edit to one field of one item.
    ///
    /// Text that does not parse to a finite number is stored as 0. Returns `false` and
    /// leaves the set untouched when no item has `item_id`.
    pub fn edit_field(&mut self, item_id: ItemId, field: EvaluationField, raw_value: &str) -> bool {
        let value = parse_numeric(raw_value);
        match self.set.get_mut(item_id) {
            Some(item) => {
                item.set(field, value);
                true
            }
            None => {
                debug!(item = %item_id, field = field.label(), "ignoring edit for unknown item");
                false
            }
        }
    }

    /// Validates and snapshots the set, moving to `Saving`.
    ///
    /// Returns `None` when a save is already in flight (the status is left alone) or when
    /// the ratios do not add up to 100 (the status becomes a validation failure).
    pub fn begin_save(&mut self, evaluated_at: DateTime<Utc>) -> Option<EvaluationRecord> {
        if self.status.is_saving() {
            debug!("save already in flight");
            return None;
        }

        let items = self.items();
        if !is_ratio_valid(items) {
            let current = total_ratio(items);
            warn!(total_ratio = current, "ratio total must be 100 before saving");
            self.status = SaveStatus::Failed(validation_message(current));
            return None;
        }

        let record = EvaluationRecord {
            items: items.to_vec(),
            total_score: total_score(items),
            evaluated_at,
        };
        self.status = SaveStatus::Saving;
        Some(record)
    }

    /// Settles an in-flight save with the remote outcome.
    pub fn finish_save<T>(&mut self, result: RemoteResult<T>) {
        if !self.status.is_saving() {
            debug!("no save in flight; discarding result");
            return;
        }

        self.status = match result {
            Ok(_) => {
                info!("evaluation saved");
                SaveStatus::Succeeded(format!("{SUCCESS_MARKER} evaluation saved successfully"))
            }
            Err(err) => {
                warn!(error = %err, "evaluation save failed");
                SaveStatus::Failed(format!("{FAILURE_MARKER} save failed: {err}"))
            }
        };
    }

    /// Creates a new record from the current set.
    pub async fn request_save<S>(&mut self, store: &S) -> &SaveStatus
    where
        S: EvaluationStore + ?Sized,
    {
        if let Some(record) = self.begin_save(Utc::now()) {
            let result = store.create(&record).await;
            self.finish_save(result);
        }
        &self.status
    }

    /// Overwrites an existing record with the current set, under the same rules as a save.
    pub async fn request_update<S>(&mut self, store: &S, id: &EvaluationId) -> &SaveStatus
    where
        S: EvaluationStore + ?Sized,
    {
        if let Some(record) = self.begin_save(Utc::now()) {
            let result = store.update(id, &record).await;
            self.finish_save(result);
        }
        &self.status
    }
}

impl Default for EvaluationSession {
    fn default() -> Self {
        Self::new(EvaluationSet::standard())
    }
}

fn validation_message(current: f64) -> String {
    format!("{VALIDATION_MARKER} ratios must add up to 100% (current: {current}%)")
}

fn parse_numeric(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}
