use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::error;

mod blobs;
mod config;
mod constants;
mod domain;
mod engine;
mod error;
mod logging;
mod server;
mod storage;

use crate::blobs::{BlobStore, HttpBlobStore, InMemoryBlobStore};
use crate::config::Config;
use crate::server::AppState;
use crate::storage::{HttpDocumentStore, InMemoryStore, RecordStore};

#[derive(Parser)]
#[command(name = "waretrack")]
#[command(about = "Warehouse shipment tracking and aggregation engine")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the shipment API and report endpoints
    Serve {
        /// Port to listen on (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print the dashboard summary for the current collection snapshot
    Report,
    /// Print the flat export projection of the collection as JSON
    Export,
}

fn build_store(config: &Config) -> anyhow::Result<Arc<dyn RecordStore>> {
    match config.store.backend.as_str() {
        "memory" => Ok(Arc::new(InMemoryStore::new())),
        "http" => {
            let base_url = config.store.base_url.as_deref().ok_or_else(|| {
                anyhow::anyhow!("store.base_url is required for the http backend")
            })?;
            let api_key = config.store_api_key()?;
            Ok(Arc::new(HttpDocumentStore::new(
                base_url,
                &config.store.collection,
                api_key,
            )))
        }
        other => anyhow::bail!("unknown store backend '{}'", other),
    }
}

fn build_blobs(config: &Config) -> anyhow::Result<Arc<dyn BlobStore>> {
    match &config.blobs {
        Some(blob_config) => {
            let api_key = match &blob_config.api_key_env {
                Some(var) => Some(std::env::var(var)?),
                None => None,
            };
            Ok(Arc::new(HttpBlobStore::new(
                &blob_config.base_url,
                &blob_config.bucket,
                api_key,
            )))
        }
        None => Ok(Arc::new(InMemoryBlobStore::new())),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();
    let config = Config::load()?;
    let store = build_store(&config)?;

    match cli.command {
        Commands::Serve { port } => {
            let state = AppState {
                store,
                blobs: build_blobs(&config)?,
                reports: config.reports.clone(),
            };
            let port = port.unwrap_or(config.server.port);
            if let Err(e) = server::start_server(state, port).await {
                error!("Server failed: {}", e);
                anyhow::bail!("server failed: {}", e);
            }
        }
        Commands::Report => {
            let documents = store.fetch_all().await?;
            let records: Vec<_> = documents.iter().map(engine::normalize).collect();

            let summary = engine::summarize(&records);
            println!("\n📊 Shipment Report:");
            println!("   Total entries: {}", summary.total_entries);
            println!("   Total weight:  {} kg", summary.total_weight_kg);
            println!(
                "   Delivered:     {} ({}%)",
                summary.delivered_count, summary.delivered_pct
            );
            println!(
                "   Avg transit:   {:.1} days",
                summary.average_transit_days
            );

            println!("\n   Status distribution:");
            for slice in engine::status_distribution(&records) {
                println!(
                    "   - {:<11} {:>4} ({}%)",
                    slice.status, slice.count, slice.percentage
                );
            }

            println!("\n   Top destinations:");
            for slice in
                engine::top_destinations(&records, config.reports.top_destinations)
            {
                println!(
                    "   - {:<16} {:>4} ({}%)",
                    slice.destination, slice.count, slice.percentage
                );
            }
        }
        Commands::Export => {
            let documents = store.fetch_all().await?;
            let records: Vec<_> = documents.iter().map(engine::normalize).collect();
            let rows = engine::flatten(&records);
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
    }
    Ok(())
}
