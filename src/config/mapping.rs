use crate::utils::error::{Result, SyncError};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// A destination field paired with the constant identifier the CRM uses for
/// that custom field. The identifier is configuration, never row data.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PairedTarget {
    pub field: String,
    pub id: String,
}

/// One item of a Multi entry: a plain destination name (fan-out of the same
/// source value) or a paired target that also emits its `_id` companion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MultiTarget {
    Plain(String),
    Paired(PairedTarget),
}

/// The three supported mapping shapes. Anything else in a mapping file is
/// rejected at load time as a configuration defect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingEntry {
    Simple(String),
    Multi(Vec<MultiTarget>),
    Paired(PairedTarget),
}

/// One source field and the destination representation(s) it expands into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingRule {
    pub source: String,
    pub entry: MappingEntry,
}

/// The full field-mapping table, in declaration order. Order is load-bearing:
/// the mapper applies rules in table order, which fixes the key insertion
/// order of transformed records and therefore the CSV column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingTable {
    rules: Vec<MappingRule>,
}

#[derive(Debug, Deserialize)]
struct RawMappingFile {
    mapping: Vec<RawMappingRule>,
}

#[derive(Debug, Deserialize)]
struct RawMappingRule {
    source: String,
    dest: toml::Value,
}

impl MappingTable {
    pub fn new(rules: Vec<MappingRule>) -> Self {
        Self { rules }
    }

    /// Load a mapping table from a TOML file of `[[mapping]]` entries:
    ///
    /// ```toml
    /// [[mapping]]
    /// source = "FirstName"
    /// dest = "first_name"
    ///
    /// [[mapping]]
    /// source = "Gender"
    /// dest = { field = "gender", id = "JqYcrfdOxHtE3BbV6mAs" }
    ///
    /// [[mapping]]
    /// source = "OptOutStatus"
    /// dest = ["opt_out_status", { field = "sms_opt_out", id = "j4fPzXoqKSyWbT1cDmE8" }]
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SyncError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let raw: RawMappingFile =
            toml::from_str(content).map_err(|e| SyncError::ConfigError {
                message: format!("Mapping file parse error: {}", e),
            })?;

        let mut rules = Vec::with_capacity(raw.mapping.len());
        for rule in raw.mapping {
            let entry = parse_entry(&rule.source, rule.dest)?;
            rules.push(MappingRule {
                source: rule.source,
                entry,
            });
        }
        Ok(Self { rules })
    }

    /// Built-in table for the member feed, used when no mapping file is given.
    pub fn member_defaults() -> Self {
        let paired = |source: &str, field: &str, id: &str| MappingRule {
            source: source.to_string(),
            entry: MappingEntry::Paired(PairedTarget {
                field: field.to_string(),
                id: id.to_string(),
            }),
        };
        let simple = |source: &str, field: &str| MappingRule {
            source: source.to_string(),
            entry: MappingEntry::Simple(field.to_string()),
        };

        Self::new(vec![
            simple("SystemId", "member_number"),
            simple("FirstName", "first_name"),
            simple("LastName", "last_name"),
            simple("Email", "email"),
            simple("PhoneCell", "phone"),
            paired("Gender", "gender", "JqYcrfdOxHtE3BbV6mAs"),
            paired("Status", "membership_status", "Q0eXvUw7RgyLapN2ZkHd"),
            MappingRule {
                source: "OptOutStatus".to_string(),
                entry: MappingEntry::Multi(vec![
                    MultiTarget::Plain("opt_out_status".to_string()),
                    MultiTarget::Paired(PairedTarget {
                        field: "sms_opt_out".to_string(),
                        id: "j4fPzXoqKSyWbT1cDmE8".to_string(),
                    }),
                ]),
            },
        ])
    }

    pub fn rules(&self) -> &[MappingRule] {
        &self.rules
    }

    /// Destination field name -> source field name, for the CSV crosswalk row.
    pub fn reverse_mapping(&self) -> HashMap<String, String> {
        let mut reverse = HashMap::new();
        for rule in &self.rules {
            match &rule.entry {
                MappingEntry::Simple(dest) => {
                    reverse.insert(dest.clone(), rule.source.clone());
                }
                MappingEntry::Multi(targets) => {
                    for target in targets {
                        let dest = match target {
                            MultiTarget::Plain(d) => d,
                            MultiTarget::Paired(p) => &p.field,
                        };
                        reverse.insert(dest.clone(), rule.source.clone());
                    }
                }
                MappingEntry::Paired(p) => {
                    reverse.insert(p.field.clone(), rule.source.clone());
                }
            }
        }
        reverse
    }
}

impl Default for MappingTable {
    fn default() -> Self {
        Self::member_defaults()
    }
}

fn parse_entry(source: &str, dest: toml::Value) -> Result<MappingEntry> {
    match dest {
        toml::Value::String(field) => Ok(MappingEntry::Simple(field)),
        table @ toml::Value::Table(_) => Ok(MappingEntry::Paired(parse_paired(source, table)?)),
        toml::Value::Array(items) => {
            let mut targets = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    toml::Value::String(field) => targets.push(MultiTarget::Plain(field)),
                    table @ toml::Value::Table(_) => {
                        targets.push(MultiTarget::Paired(parse_paired(source, table)?));
                    }
                    _ => {
                        return Err(SyncError::MappingShapeError {
                            source_field: source.to_string(),
                            reason: "list items must be strings or field/id tables".to_string(),
                        });
                    }
                }
            }
            Ok(MappingEntry::Multi(targets))
        }
        _ => Err(SyncError::MappingShapeError {
            source_field: source.to_string(),
            reason: "expected a string, a field/id table, or a list".to_string(),
        }),
    }
}

fn parse_paired(source: &str, value: toml::Value) -> Result<PairedTarget> {
    value
        .try_into()
        .map_err(|e| SyncError::MappingShapeError {
            source_field: source.to_string(),
            reason: format!("field/id table is malformed: {}", e),
        })
}
