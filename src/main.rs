//! Sicuti - employee roster import CLI
//!
//! Imports civil-servant employee rosters from Excel workbooks for leave
//! (cuti) tracking, caching the decoded records so an unchanged source file
//! loads without a re-parse.

use std::error::Error;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use sicuti::cli::{Cli, Command};
use sicuti::ingest::ExcelIngestor;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let ingestor = ExcelIngestor::new();

    match cli.command {
        Command::Load { file, json } => {
            let result = ingestor.get_parsed_data(&file).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result.data)?);
            } else {
                let modified = chrono::DateTime::from_timestamp_millis(result.last_modified)
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_else(|| result.last_modified.to_string());
                println!(
                    "{} records imported (source modified {})",
                    result.data.len(),
                    modified
                );
            }
        }
        Command::Parse { file, json } => {
            let employees = ingestor.parse_excel(&file).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&employees)?);
            } else {
                println!("{} records imported", employees.len());
            }
        }
        Command::ClearCache => {
            ingestor.clear_cache().await?;
            println!("Cache cleared");
        }
    }

    Ok(())
}
