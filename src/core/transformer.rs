use crate::config::mapping::MappingTable;
use crate::core::grouper::RecordGrouper;
use crate::core::mapper::FieldMapper;
use crate::core::validator::RecordValidator;
use crate::domain::model::{Partition, RawRow};

/// The transformation core: group raw rows per member, map each aggregate
/// into the destination schema, then split on contact validity.
pub struct MemberTransformer {
    grouper: RecordGrouper,
    mapper: FieldMapper,
    validator: RecordValidator,
}

impl MemberTransformer {
    pub fn new(table: MappingTable) -> Self {
        Self {
            grouper: RecordGrouper::new(),
            mapper: FieldMapper::new(table),
            validator: RecordValidator::new(),
        }
    }

    /// Records come out in the order their identity keys first appeared.
    /// Malformed rows never fail here: missing fields read as empty strings
    /// and land in the invalid partition at worst.
    pub fn transform(&self, rows: &[RawRow]) -> Partition {
        let grouped = self.grouper.group(rows);
        tracing::debug!("Grouped {} rows into {} members", rows.len(), grouped.len());

        let mut partition = Partition::default();
        for aggregate in grouped.values() {
            let record = self.mapper.apply(aggregate);
            if self.validator.is_valid_record(&record) {
                partition.valid.push(record);
            } else {
                partition.invalid.push(record);
            }
        }

        tracing::info!(
            "Transformed {} members: {} valid, {} invalid",
            grouped.len(),
            partition.valid.len(),
            partition.invalid.len()
        );
        partition
    }
}
