//! Weighted-sum arithmetic over evaluation criteria.
//!
//! Every function is pure and total: inputs are taken as already-normalized numbers and
//! nothing is clamped, so out-of-range or negative values flow straight through the formula.

use super::domain::{EvaluationItem, ItemId};

/// Allowed drift between the ratio sum and 100.
pub const RATIO_TOLERANCE: f64 = 1e-9;

/// Ratio sum every saved evaluation must reach.
pub const REQUIRED_RATIO_TOTAL: f64 = 100.0;

pub fn total_ratio(items: &[EvaluationItem]) -> f64 {
    items.iter().map(|item| item.ratio).sum()
}

/// `score * ratio / 100`.
pub fn weighted_score(item: &EvaluationItem) -> f64 {
    (item.score * item.ratio) / 100.0
}

pub fn item_final_score(item: &EvaluationItem) -> f64 {
    weighted_score(item) + item.bonus
}

pub fn total_score(items: &[EvaluationItem]) -> f64 {
    items.iter().map(item_final_score).sum()
}

/// True when the ratios add up to 100 within [`RATIO_TOLERANCE`].
///
/// Integer percentages keep an exact boundary: 99 and 101 fail, 100 passes.
pub fn is_ratio_valid(items: &[EvaluationItem]) -> bool {
    (total_ratio(items) - REQUIRED_RATIO_TOTAL).abs() <= RATIO_TOLERANCE
}

/// Per-row figures shown next to each criterion.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemView {
    pub id: ItemId,
    pub name: String,
    pub ratio: f64,
    pub score: f64,
    pub bonus: f64,
    pub weighted_score: f64,
    pub final_score: f64,
}

impl From<&EvaluationItem> for ItemView {
    fn from(item: &EvaluationItem) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            ratio: item.ratio,
            score: item.score,
            bonus: item.bonus,
            weighted_score: weighted_score(item),
            final_score: item_final_score(item),
        }
    }
}

/// Totals shown above the table.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationSummary {
    pub total_ratio: f64,
    pub ratio_valid: bool,
    pub total_score: f64,
    pub items: Vec<ItemView>,
}

impl EvaluationSummary {
    pub fn from_items(items: &[EvaluationItem]) -> Self {
        Self {
            total_ratio: total_ratio(items),
            ratio_valid: is_ratio_valid(items),
            total_score: total_score(items),
            items: items.iter().map(ItemView::from).collect(),
        }
    }

    /// Total score as displayed, two decimals.
    pub fn display_total(&self) -> String {
        format!("{:.2}", self.total_score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: u32, ratio: f64, score: f64, bonus: f64) -> EvaluationItem {
        EvaluationItem {
            id: ItemId(id),
            name: format!("criterion {id}"),
            ratio,
            score,
            bonus,
        }
    }

    #[test]
    fn empty_items_sum_to_zero() {
        assert_eq!(total_ratio(&[]), 0.0);
        assert_eq!(total_score(&[]), 0.0);
        assert!(!is_ratio_valid(&[]));
    }

    #[test]
    fn weighted_score_does_not_clamp() {
        assert_eq!(weighted_score(&item(1, 50.0, 150.0, 0.0)), 75.0);
        assert_eq!(weighted_score(&item(1, 50.0, -20.0, 0.0)), -10.0);
        assert_eq!(item_final_score(&item(1, 50.0, -20.0, -5.0)), -15.0);
    }

    #[test]
    fn summary_rounds_display_total_to_two_decimals() {
        let items = vec![item(1, 30.0, 80.0, 2.0), item(2, 70.0, 50.0, 0.0)];
        let summary = EvaluationSummary::from_items(&items);

        assert_eq!(summary.total_ratio, 100.0);
        assert!(summary.ratio_valid);
        assert_eq!(summary.display_total(), "61.00");
        assert_eq!(summary.items[0].weighted_score, 24.0);
        assert_eq!(summary.items[0].final_score, 26.0);
    }
}
