use crate::config::mapping::MappingTable;
use crate::domain::model::{Partition, TransformedRecord};
use crate::utils::error::{Result, SyncError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Writes a partition to dual-header CSV files: row 1 carries the destination
/// field names, row 2 the crosswalk back to the source field names, then the
/// data rows. Internal `_id` companion columns never reach the file.
pub struct DualHeaderCsvWriter {
    output_dir: PathBuf,
    reverse_mapping: HashMap<String, String>,
}

impl DualHeaderCsvWriter {
    pub fn new<P: AsRef<Path>>(output_dir: P, table: &MappingTable) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            reverse_mapping: table.reverse_mapping(),
        }
    }

    /// Write the valid and invalid record lists, skipping empty lists, and
    /// return the paths actually written.
    pub fn write_partition(&self, partition: &Partition, timestamp: &str) -> Result<Vec<String>> {
        let mut files = Vec::new();

        if !partition.valid.is_empty() {
            let filename = format!("transformed_data_{}.csv", timestamp);
            files.push(self.write_records(&partition.valid, &filename)?);
        }

        if !partition.invalid.is_empty() {
            let filename = format!("invalid_data_{}.csv", timestamp);
            files.push(self.write_records(&partition.invalid, &filename)?);
        }

        Ok(files)
    }

    fn write_records(&self, records: &[TransformedRecord], filename: &str) -> Result<String> {
        // Column set comes from the first record. The literal key
        // "membership_type" is excluded alongside the `_id` companions; the
        // numbered membership_type_N columns stay.
        let columns: Vec<String> = records[0]
            .keys()
            .filter(|k| !k.ends_with("_id") && k.as_str() != "membership_type")
            .cloned()
            .collect();

        // Fail before the file is opened rather than mid-write: any record
        // missing a header column means the upstream mapping drifted.
        for (record_index, record) in records.iter().enumerate() {
            for column in &columns {
                if !record.contains_key(column) {
                    return Err(SyncError::SchemaDriftError {
                        column: column.clone(),
                        record_index,
                    });
                }
            }
        }

        std::fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(filename);
        let mut writer = csv::Writer::from_path(&path)?;

        writer.write_record(&columns)?;

        let crosswalk: Vec<&str> = columns
            .iter()
            .map(|column| {
                self.reverse_mapping
                    .get(column)
                    .map(String::as_str)
                    .unwrap_or(column)
            })
            .collect();
        writer.write_record(&crosswalk)?;

        for record in records {
            let row: Vec<&str> = columns
                .iter()
                .map(|column| record.get_str(column))
                .collect();
            writer.write_record(&row)?;
        }

        writer.flush()?;
        tracing::info!("Wrote {} records to {}", records.len(), path.display());
        Ok(path.to_string_lossy().into_owned())
    }
}
