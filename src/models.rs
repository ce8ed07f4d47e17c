use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::EnrichmentError;

// ============ Raw Records ============

/// Leaf fields counted by the completeness checklist, in checklist order.
pub const CHECKLIST_FIELDS: [&[&str]; 17] = [
    &["user", "name"],
    &["user", "email"],
    &["user", "gender"],
    &["user", "location"],
    &["user", "picture"],
    &["phone_number"],
    &["iban"],
    &["credit_card", "card_number"],
    &["credit_card", "card_type"],
    &["credit_card", "expiration_date"],
    &["credit_card", "cvv"],
    &["random_name"],
    &["pet"],
    &["quote", "content"],
    &["quote", "author"],
    &["joke", "type"],
    &["joke", "content"],
];

/// An identity record as it arrives from the ingestion boundary.
///
/// The record is kept as a raw JSON object so unknown or oddly-typed fields
/// survive enrichment untouched. Typed accessors return `None` for anything
/// missing or not a string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(Map<String, Value>);

impl RawRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.0
    }

    /// Walks a path of object keys and returns the value at its end.
    pub fn lookup(&self, path: &[&str]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        rest.iter()
            .try_fold(self.0.get(*first)?, |value, key| value.get(*key))
    }

    /// String value at `path`, if present and a JSON string.
    pub fn text(&self, path: &[&str]) -> Option<&str> {
        self.lookup(path).and_then(Value::as_str)
    }

    pub fn user_name(&self) -> Option<&str> {
        self.text(&["user", "name"])
    }

    pub fn user_email(&self) -> Option<&str> {
        self.text(&["user", "email"])
    }

    pub fn user_location(&self) -> Option<&str> {
        self.text(&["user", "location"])
    }

    pub fn phone_number(&self) -> Option<&str> {
        self.text(&["phone_number"])
    }

    pub fn iban(&self) -> Option<&str> {
        self.text(&["iban"])
    }

    pub fn card_number(&self) -> Option<&str> {
        self.text(&["credit_card", "card_number"])
    }

    pub fn card_expiration(&self) -> Option<&str> {
        self.text(&["credit_card", "expiration_date"])
    }

    pub fn random_name(&self) -> Option<&str> {
        self.text(&["random_name"])
    }

    /// Whether the leaf at `path` carries a non-blank value.
    ///
    /// Strings are trimmed; numbers and booleans count by their JSON text;
    /// arrays and objects count when non-empty.
    pub fn is_filled(&self, path: &[&str]) -> bool {
        match self.lookup(path) {
            None | Some(Value::Null) => false,
            Some(Value::String(s)) => !s.trim().is_empty(),
            Some(Value::Array(items)) => !items.is_empty(),
            Some(Value::Object(map)) => !map.is_empty(),
            Some(Value::Number(_)) | Some(Value::Bool(_)) => true,
        }
    }
}

impl TryFrom<Value> for RawRecord {
    type Error = EnrichmentError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Err(EnrichmentError::InvalidInput(
                "record is missing".to_string(),
            )),
            other => Err(EnrichmentError::InvalidInput(format!(
                "record must be a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ============ Dark Data ============

/// Dominant writing system detected in a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamePattern {
    Latin,
    Arabic,
    Cyrillic,
    Cjk,
    Mixed,
    Unknown,
}

impl NamePattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            NamePattern::Latin => "latin",
            NamePattern::Arabic => "arabic",
            NamePattern::Cyrillic => "cyrillic",
            NamePattern::Cjk => "cjk",
            NamePattern::Mixed => "mixed",
            NamePattern::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for NamePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehavioralProfile {
    /// True when `random_name` does not match `user.name`.
    pub is_synthetic: bool,
    /// Agreement between the name's script and the stated location (0-1).
    pub cultural_coherence: f64,
    pub name_pattern: NamePattern,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataEnrichment {
    /// Percentage of the 17-field checklist that is filled (0-100).
    pub completeness_score: u8,
    pub ingestion_timestamp: DateTime<Utc>,
    pub data_quality_flags: Vec<String>,
    pub source: String,
}

/// The four derived signals attached to every enriched record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DarkData {
    pub financial_risk_score: u8,
    pub behavioral_profile: BehavioralProfile,
    pub cultural_diversity_index: f64,
    pub metadata_enrichment: MetadataEnrichment,
}

/// A raw record with its `dark_data` group attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    #[serde(flatten)]
    pub record: Map<String, Value>,
    pub dark_data: DarkData,
}

impl EnrichedRecord {
    /// Attaches `dark_data` to a raw record, replacing any `dark_data` key the
    /// record already carried.
    pub fn new(record: RawRecord, dark_data: DarkData) -> Self {
        let mut record = record.into_fields();
        record.remove("dark_data");
        Self { record, dark_data }
    }
}

// ============ Stored Records ============

/// Row shape of `aggregated_records`.
#[derive(Debug, Clone, FromRow)]
pub struct AggregatedRow {
    pub id: Uuid,
    pub payload: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An enriched record as handed back by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub id: Uuid,
    #[serde(flatten)]
    pub record: Map<String, Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AggregatedRow> for StoredRecord {
    fn from(row: AggregatedRow) -> Self {
        let mut record = match row.payload {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        // Store-owned keys win over same-named payload keys.
        for key in ["id", "created_at", "updated_at"] {
            record.remove(key);
        }

        Self {
            id: row.id,
            record,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Pagination for `GET /api/v1/aggregated`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListParams {
    pub const DEFAULT_LIMIT: i64 = 100;
    pub const MAX_LIMIT: i64 = 1000;

    /// Effective `(limit, offset)` after defaults and clamping.
    pub fn resolve(&self) -> (i64, i64) {
        let limit = self
            .limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT);
        let offset = self.offset.unwrap_or(0).max(0);
        (limit, offset)
    }
}
