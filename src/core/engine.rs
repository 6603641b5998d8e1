use crate::adapters::csv_writer::DualHeaderCsvWriter;
use crate::core::transformer::MemberTransformer;
use crate::domain::model::{RunSummary, UpdateStats};
use crate::domain::ports::{CrmSink, MemberSource};
use crate::utils::error::Result;

/// Drives one sync run: fetch, transform, serialize, then push the valid
/// partition into the CRM when a sink is configured.
pub struct SyncEngine<S: MemberSource> {
    source: S,
    transformer: MemberTransformer,
    writer: DualHeaderCsvWriter,
    sink: Option<Box<dyn CrmSink>>,
}

impl<S: MemberSource> SyncEngine<S> {
    pub fn new(source: S, transformer: MemberTransformer, writer: DualHeaderCsvWriter) -> Self {
        Self {
            source,
            transformer,
            writer,
            sink: None,
        }
    }

    pub fn with_sink(mut self, sink: Box<dyn CrmSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub async fn run(&self) -> Result<RunSummary> {
        tracing::info!("Starting member sync");

        let rows = self.source.fetch().await?;
        tracing::info!("Fetched {} raw rows", rows.len());

        let partition = self.transformer.transform(&rows);

        let timestamp = chrono::Local::now().format("%Y-%m-%d_%H%M%S").to_string();
        let files = self.writer.write_partition(&partition, &timestamp)?;

        let update = match &self.sink {
            Some(sink) if !partition.valid.is_empty() => sink.push(&partition.valid).await?,
            Some(_) => {
                tracing::info!("No valid records; skipping CRM push");
                UpdateStats::default()
            }
            None => UpdateStats::default(),
        };

        Ok(RunSummary {
            fetched: rows.len(),
            valid: partition.valid.len(),
            invalid: partition.invalid.len(),
            update,
            files,
        })
    }
}
