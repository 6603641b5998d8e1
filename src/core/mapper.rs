use crate::config::mapping::{MappingEntry, MappingTable, MultiTarget, PairedTarget};
use crate::domain::model::{AggregateRecord, TransformedRecord, MEMBERSHIP_SLOTS};

/// Expands an aggregate record into the destination schema by applying the
/// mapping table rule by rule.
pub struct FieldMapper {
    table: MappingTable,
}

impl FieldMapper {
    pub fn new(table: MappingTable) -> Self {
        Self { table }
    }

    /// Build the transformed record. Rules apply in table order; membership
    /// slots are written after every rule, overwriting on collision; the
    /// email/phone cleanup runs last and only touches keys that exist.
    pub fn apply(&self, aggregate: &AggregateRecord) -> TransformedRecord {
        let mut record = TransformedRecord::new();

        for rule in self.table.rules() {
            let value = aggregate.row.get(&rule.source);
            match &rule.entry {
                MappingEntry::Simple(dest) => {
                    record.insert(dest, Some(value.to_string()));
                }
                MappingEntry::Multi(targets) => {
                    for target in targets {
                        match target {
                            MultiTarget::Plain(dest) => {
                                record.insert(dest, Some(value.to_string()));
                            }
                            MultiTarget::Paired(paired) => {
                                insert_paired(&mut record, paired, value);
                            }
                        }
                    }
                }
                MappingEntry::Paired(paired) => {
                    insert_paired(&mut record, paired, value);
                }
            }
        }

        for i in 0..MEMBERSHIP_SLOTS {
            record.insert(
                &format!("membership_type_{}", i + 1),
                Some(aggregate.membership_types[i].clone()),
            );
        }

        clean_contact_fields(&mut record);
        record
    }
}

fn insert_paired(record: &mut TransformedRecord, paired: &PairedTarget, value: &str) {
    record.insert(&paired.field, Some(value.to_string()));
    record.insert(&format!("{}_id", paired.field), Some(paired.id.clone()));
}

/// Normalize the two contact fields the validator keys on. Email is trimmed
/// and lower-cased, phone stripped to digits; either one that comes out empty
/// becomes `None` rather than the empty string.
pub fn clean_contact_fields(record: &mut TransformedRecord) {
    if record.contains_key("email") {
        let cleaned = record.get_str("email").trim().to_lowercase();
        record.insert("email", if cleaned.is_empty() { None } else { Some(cleaned) });
    }

    if record.contains_key("phone") {
        let digits: String = record
            .get_str("phone")
            .chars()
            .filter(char::is_ascii_digit)
            .collect();
        record.insert("phone", if digits.is_empty() { None } else { Some(digits) });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::mapping::MappingRule;
    use crate::domain::model::RawRow;

    fn simple(source: &str, dest: &str) -> MappingRule {
        MappingRule {
            source: source.to_string(),
            entry: MappingEntry::Simple(dest.to_string()),
        }
    }

    fn mapper(rules: Vec<MappingRule>) -> FieldMapper {
        FieldMapper::new(MappingTable::new(rules))
    }

    #[test]
    fn test_simple_mapping_copies_value_verbatim() {
        let mapper = mapper(vec![simple("FirstName", "first_name")]);
        let aggregate = AggregateRecord::new(RawRow::from([("FirstName", " Jo ")]));

        let record = mapper.apply(&aggregate);

        assert_eq!(record.get_str("first_name"), " Jo ");
    }

    #[test]
    fn test_absent_source_field_defaults_to_empty() {
        let mapper = mapper(vec![simple("MiddleName", "middle_name")]);
        let aggregate = AggregateRecord::new(RawRow::new());

        let record = mapper.apply(&aggregate);

        assert_eq!(record.get_str("middle_name"), "");
    }

    #[test]
    fn test_paired_mapping_emits_companion_id() {
        let mapper = mapper(vec![MappingRule {
            source: "Gender".to_string(),
            entry: MappingEntry::Paired(PairedTarget {
                field: "gender".to_string(),
                id: "X1".to_string(),
            }),
        }]);
        let aggregate = AggregateRecord::new(RawRow::from([("Gender", "F")]));

        let record = mapper.apply(&aggregate);

        assert_eq!(record.get_str("gender"), "F");
        assert_eq!(record.get_str("gender_id"), "X1");
    }

    #[test]
    fn test_multi_mapping_fans_out_same_value() {
        let mapper = mapper(vec![MappingRule {
            source: "OptOutStatus".to_string(),
            entry: MappingEntry::Multi(vec![
                MultiTarget::Plain("opt_out_status".to_string()),
                MultiTarget::Paired(PairedTarget {
                    field: "sms_opt_out".to_string(),
                    id: "X2".to_string(),
                }),
            ]),
        }]);
        let aggregate = AggregateRecord::new(RawRow::from([("OptOutStatus", "yes")]));

        let record = mapper.apply(&aggregate);

        assert_eq!(record.get_str("opt_out_status"), "yes");
        assert_eq!(record.get_str("sms_opt_out"), "yes");
        assert_eq!(record.get_str("sms_opt_out_id"), "X2");
    }

    #[test]
    fn test_membership_slots_are_written_last() {
        let mapper = mapper(vec![simple("FirstName", "first_name")]);
        let mut aggregate = AggregateRecord::new(RawRow::from([("FirstName", "Jo")]));
        aggregate.membership_types[0] = "Gold".to_string();
        aggregate.membership_types[1] = "Swim".to_string();

        let record = mapper.apply(&aggregate);

        assert_eq!(record.get_str("membership_type_1"), "Gold");
        assert_eq!(record.get_str("membership_type_2"), "Swim");
        assert_eq!(record.get_str("membership_type_3"), "");
        assert_eq!(record.get_str("membership_type_5"), "");
    }

    #[test]
    fn test_email_cleanup_trims_and_lowercases() {
        let mapper = mapper(vec![simple("Email", "email")]);
        let aggregate = AggregateRecord::new(RawRow::from([("Email", "  Jo@Example.COM ")]));

        let record = mapper.apply(&aggregate);

        assert_eq!(record.get_str("email"), "jo@example.com");
    }

    #[test]
    fn test_empty_email_becomes_null_marker() {
        let mapper = mapper(vec![simple("Email", "email")]);
        let aggregate = AggregateRecord::new(RawRow::from([("Email", "")]));

        let record = mapper.apply(&aggregate);

        assert_eq!(record.fields.get("email"), Some(&None));
    }

    #[test]
    fn test_phone_cleanup_strips_to_digits() {
        let mapper = mapper(vec![simple("PhoneCell", "phone")]);
        let aggregate = AggregateRecord::new(RawRow::from([("PhoneCell", "(555) 123-4567")]));

        let record = mapper.apply(&aggregate);

        assert_eq!(record.get_str("phone"), "5551234567");
    }

    #[test]
    fn test_cleanup_does_not_touch_absent_keys() {
        let mapper = mapper(vec![simple("FirstName", "first_name")]);
        let aggregate = AggregateRecord::new(RawRow::from([("FirstName", "Jo")]));

        let record = mapper.apply(&aggregate);

        assert!(!record.contains_key("email"));
        assert!(!record.contains_key("phone"));
    }

    #[test]
    fn test_cleanup_is_idempotent() {
        let mapper = mapper(vec![simple("Email", "email"), simple("PhoneCell", "phone")]);
        let aggregate = AggregateRecord::new(RawRow::from([
            ("Email", " Jo@Example.COM"),
            ("PhoneCell", "555-123-4567"),
        ]));

        let mut record = mapper.apply(&aggregate);
        let once = record.clone();
        clean_contact_fields(&mut record);

        assert_eq!(record, once);
    }

    #[test]
    fn test_key_order_follows_table_order() {
        let mapper = mapper(vec![
            simple("LastName", "last_name"),
            simple("FirstName", "first_name"),
        ]);
        let aggregate = AggregateRecord::new(RawRow::new());

        let record = mapper.apply(&aggregate);
        let keys: Vec<&str> = record.keys().map(String::as_str).collect();

        assert_eq!(keys[0], "last_name");
        assert_eq!(keys[1], "first_name");
        assert_eq!(keys[2], "membership_type_1");
    }
}
