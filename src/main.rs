use clap::Parser;
use member_sync::utils::{logger, validation::Validate};
use member_sync::{
    CliConfig, DualHeaderCsvWriter, HttpCrmSink, HttpMemberSource, MappingTable,
    MemberTransformer, SyncEngine,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting member-sync CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let table = match &config.mapping_file {
        Some(path) => match MappingTable::from_file(path) {
            Ok(table) => table,
            Err(e) => {
                tracing::error!("Failed to load mapping file {}: {}", path, e);
                eprintln!("❌ {}", e);
                std::process::exit(1);
            }
        },
        None => MappingTable::member_defaults(),
    };

    let writer = DualHeaderCsvWriter::new(&config.output_path, &table);
    let transformer = MemberTransformer::new(table);
    let sink = config
        .crm_endpoint
        .clone()
        .map(|endpoint| HttpCrmSink::new(endpoint, config.crm_api_key.clone()));
    let source = HttpMemberSource::new(config);

    let mut engine = SyncEngine::new(source, transformer, writer);
    if let Some(sink) = sink {
        engine = engine.with_sink(Box::new(sink));
    }

    match engine.run().await {
        Ok(summary) => {
            tracing::info!("Sync completed successfully");
            println!("✅ Sync completed: {} valid, {} invalid", summary.valid, summary.invalid);
            for file in &summary.files {
                println!("📁 {}", file);
            }
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Sync failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }
}
