use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Number of membership-type slots collected per member.
pub const MEMBERSHIP_SLOTS: usize = 5;

/// One raw row from the source feed, keyed by source-schema field names.
/// Absent fields read as the empty string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRow {
    pub fields: HashMap<String, String>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> &str {
        self.fields.get(field).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, field: &str, value: &str) -> &mut Self {
        self.fields.insert(field.to_string(), value.to_string());
        self
    }
}

impl<const N: usize> From<[(&str, &str); N]> for RawRow {
    fn from(pairs: [(&str, &str); N]) -> Self {
        let mut row = RawRow::new();
        for (k, v) in pairs {
            row.set(k, v);
        }
        row
    }
}

/// All rows sharing one identity key, consolidated: the first-seen row
/// snapshot plus the membership types collected across every row.
#[derive(Debug, Clone)]
pub struct AggregateRecord {
    pub row: RawRow,
    pub membership_types: [String; MEMBERSHIP_SLOTS],
}

impl AggregateRecord {
    pub fn new(row: RawRow) -> Self {
        Self {
            row,
            membership_types: Default::default(),
        }
    }
}

/// A record in the destination schema. Key order is insertion order and the
/// CSV writer derives its column order from it, so it must stay deterministic.
/// `None` marks a field cleaned down to nothing (blank email/phone).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransformedRecord {
    pub fields: IndexMap<String, Option<String>>,
}

impl TransformedRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, value: Option<String>) {
        self.fields.insert(key.to_string(), value);
    }

    /// Field value as a plain string; `None` and missing keys both read empty.
    pub fn get_str(&self, key: &str) -> &str {
        self.fields
            .get(key)
            .and_then(|v| v.as_deref())
            .unwrap_or("")
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.fields.keys()
    }
}

/// Valid/invalid split produced by the transformation engine, in the order
/// identity keys were first encountered.
#[derive(Debug, Clone, Default)]
pub struct Partition {
    pub valid: Vec<TransformedRecord>,
    pub invalid: Vec<TransformedRecord>,
}

/// Outcome of the CRM push step.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct UpdateStats {
    pub updated: usize,
    pub failed: usize,
}

/// Structured run report handed to the reporting side.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub fetched: usize,
    pub valid: usize,
    pub invalid: usize,
    pub update: UpdateStats,
    pub files: Vec<String>,
}
