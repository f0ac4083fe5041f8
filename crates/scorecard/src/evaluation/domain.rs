use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};

/// Stable identifier of a criterion within one editing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u32);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One scoring criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationItem {
    pub id: ItemId,
    pub name: String,
    pub ratio: f64,
    pub score: f64,
    pub bonus: f64,
}

impl EvaluationItem {
    pub fn new(id: u32, name: impl Into<String>, ratio: f64) -> Self {
        Self {
            id: ItemId(id),
            name: name.into(),
            ratio,
            score: 0.0,
            bonus: 0.0,
        }
    }

    pub(crate) fn set(&mut self, field: EvaluationField, value: f64) {
        match field {
            EvaluationField::Ratio => self.ratio = value,
            EvaluationField::Score => self.score = value,
            EvaluationField::Bonus => self.bonus = value,
        }
    }
}

/// The editable numeric fields of a criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvaluationField {
    Ratio,
    Score,
    Bonus,
}

impl EvaluationField {
    pub fn label(&self) -> &'static str {
        match self {
            EvaluationField::Ratio => "ratio",
            EvaluationField::Score => "score",
            EvaluationField::Bonus => "bonus",
        }
    }
}

impl FromStr for EvaluationField {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ratio" => Ok(Self::Ratio),
            "score" => Ok(Self::Score),
            "bonus" => Ok(Self::Bonus),
            other => Err(format!(
                "unknown field '{other}' (expected ratio, score, or bonus)"
            )),
        }
    }
}

/// Ordered criteria edited during one session. Order is display order.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationSet {
    items: Vec<EvaluationItem>,
}

impl EvaluationSet {
    pub fn new(items: Vec<EvaluationItem>) -> Self {
        Self { items }
    }

    /// Seed criteria every session starts from. Ratios sum to 100.
    pub fn standard() -> Self {
        Self::new(vec![
            EvaluationItem::new(1, "Code quality", 30.0),
            EvaluationItem::new(2, "Feature completeness", 25.0),
            EvaluationItem::new(3, "User experience", 20.0),
            EvaluationItem::new(4, "Performance optimization", 15.0),
            EvaluationItem::new(5, "Documentation", 10.0),
        ])
    }

    pub fn items(&self) -> &[EvaluationItem] {
        &self.items
    }

    pub(crate) fn get_mut(&mut self, id: ItemId) -> Option<&mut EvaluationItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }
}

impl Default for EvaluationSet {
    fn default() -> Self {
        Self::standard()
    }
}

/// Persisted snapshot sent to and returned by the evaluations resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationRecord {
    pub items: Vec<EvaluationItem>,
    pub total_score: f64,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub evaluated_at: DateTime<Utc>,
}

/// Accepts RFC 3339 timestamps and, from servers that drop the offset, naive ones read as UTC.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(parsed.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(|err| de::Error::custom(format!("invalid timestamp '{raw}': {err}")))
}

/// Opaque identifier assigned by the evaluations resource.
///
/// Servers may hand out numeric or string ids; both are carried as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EvaluationId(pub String);

impl fmt::Display for EvaluationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for EvaluationId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl<'de> Deserialize<'de> for EvaluationId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => EvaluationId(text),
            RawId::Number(number) => EvaluationId(number.to_string()),
        })
    }
}

/// A record together with the id the resource stored it under.
///
/// Servers are not required to echo the id, so it may be absent on records read back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEvaluation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EvaluationId>,
    #[serde(flatten)]
    pub record: EvaluationRecord,
}

impl StoredEvaluation {
    /// Id for display; `-` when the server did not send one.
    pub fn id_label(&self) -> &str {
        self.id.as_ref().map_or("-", |id| id.0.as_str())
    }
}
