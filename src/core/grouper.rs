use crate::domain::model::{AggregateRecord, RawRow};
use indexmap::IndexMap;

pub const IDENTITY_FIELD: &str = "SystemId";
pub const MEMBERSHIP_FIELD: &str = "UserGroupName";

/// Consolidates raw feed rows into one aggregate per member. The feed emits
/// one row per membership, so a member with three memberships arrives as
/// three near-identical rows.
pub struct RecordGrouper {
    identity_field: String,
    membership_field: String,
}

impl RecordGrouper {
    pub fn new() -> Self {
        Self::with_fields(IDENTITY_FIELD, MEMBERSHIP_FIELD)
    }

    pub fn with_fields(identity_field: &str, membership_field: &str) -> Self {
        Self {
            identity_field: identity_field.to_string(),
            membership_field: membership_field.to_string(),
        }
    }

    /// Group rows by identity key, preserving first-seen key order.
    ///
    /// Rows without an identity value are dropped outright. The first row for
    /// a key becomes the stored snapshot; later rows for the same key only
    /// contribute their membership value. Membership values fill the first
    /// empty slot, and anything beyond the five slots is discarded.
    pub fn group(&self, rows: &[RawRow]) -> IndexMap<String, AggregateRecord> {
        let mut grouped: IndexMap<String, AggregateRecord> = IndexMap::new();

        for row in rows {
            let member_id = row.get(&self.identity_field);
            if member_id.is_empty() {
                tracing::debug!("Dropping row without {}", self.identity_field);
                continue;
            }

            let aggregate = grouped
                .entry(member_id.to_string())
                .or_insert_with(|| AggregateRecord::new(row.clone()));

            let membership = row.get(&self.membership_field);
            if !membership.is_empty() {
                if let Some(slot) = aggregate.membership_types.iter_mut().find(|s| s.is_empty())
                {
                    *slot = membership.to_string();
                }
            }
        }

        grouped
    }
}

impl Default for RecordGrouper {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_without_identity_are_dropped() {
        let rows = vec![
            RawRow::from([("SystemId", "1"), ("FirstName", "Ann")]),
            RawRow::from([("SystemId", ""), ("FirstName", "Ghost")]),
            RawRow::from([("FirstName", "NoId")]),
            RawRow::from([("SystemId", "2"), ("FirstName", "Bea")]),
        ];

        let grouped = RecordGrouper::new().group(&rows);

        assert_eq!(grouped.len(), 2);
        assert!(grouped.contains_key("1"));
        assert!(grouped.contains_key("2"));
    }

    #[test]
    fn test_first_row_snapshot_wins() {
        let rows = vec![
            RawRow::from([("SystemId", "1"), ("FirstName", "Ann")]),
            RawRow::from([("SystemId", "1"), ("FirstName", "Overwritten?")]),
        ];

        let grouped = RecordGrouper::new().group(&rows);

        assert_eq!(grouped["1"].row.get("FirstName"), "Ann");
    }

    #[test]
    fn test_membership_slots_fill_in_arrival_order() {
        let rows = vec![
            RawRow::from([("SystemId", "1"), ("UserGroupName", "Gold")]),
            RawRow::from([("SystemId", "1"), ("UserGroupName", "Swim")]),
            RawRow::from([("SystemId", "1"), ("UserGroupName", "")]),
            RawRow::from([("SystemId", "1"), ("UserGroupName", "Yoga")]),
        ];

        let grouped = RecordGrouper::new().group(&rows);
        let slots = &grouped["1"].membership_types;

        assert_eq!(slots[0], "Gold");
        assert_eq!(slots[1], "Swim");
        assert_eq!(slots[2], "Yoga");
        assert_eq!(slots[3], "");
        assert_eq!(slots[4], "");
    }

    #[test]
    fn test_membership_overflow_is_discarded() {
        let rows: Vec<RawRow> = (1..=7)
            .map(|i| {
                let group = format!("Group{}", i);
                let mut row = RawRow::new();
                row.set("SystemId", "1").set("UserGroupName", &group);
                row
            })
            .collect();

        let grouped = RecordGrouper::new().group(&rows);
        let slots = &grouped["1"].membership_types;

        assert_eq!(slots.len(), 5);
        for (i, slot) in slots.iter().enumerate() {
            assert_eq!(slot, &format!("Group{}", i + 1));
        }
    }

    #[test]
    fn test_duplicate_memberships_fill_multiple_slots() {
        let rows = vec![
            RawRow::from([("SystemId", "1"), ("UserGroupName", "Gold")]),
            RawRow::from([("SystemId", "1"), ("UserGroupName", "Gold")]),
        ];

        let grouped = RecordGrouper::new().group(&rows);
        let slots = &grouped["1"].membership_types;

        assert_eq!(slots[0], "Gold");
        assert_eq!(slots[1], "Gold");
        assert_eq!(slots[2], "");
    }

    #[test]
    fn test_key_order_follows_first_occurrence() {
        let rows = vec![
            RawRow::from([("SystemId", "3")]),
            RawRow::from([("SystemId", "1")]),
            RawRow::from([("SystemId", "3")]),
            RawRow::from([("SystemId", "2")]),
        ];

        let grouped = RecordGrouper::new().group(&rows);
        let keys: Vec<&str> = grouped.keys().map(String::as_str).collect();

        assert_eq!(keys, vec!["3", "1", "2"]);
    }
}
