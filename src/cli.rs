//! Command-line interface parsing for the roster importer
//!
//! This module handles parsing of CLI arguments using clap. The subcommands
//! mirror the three ingestion entry points: cache-aware load, forced fresh
//! parse, and cache clearing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Sicuti - import and cache civil-servant employee rosters
#[derive(Parser, Debug)]
#[command(name = "sicuti")]
#[command(about = "Import employee rosters from Excel and cache the result")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Cache-aware import: serves from cache while the source is unchanged
    Load {
        /// Path to the roster spreadsheet (.xlsx or .xls)
        file: PathBuf,
        /// Print the decoded records as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Forced fresh parse, bypassing the cache entirely
    Parse {
        /// Path to the roster spreadsheet (.xlsx or .xls)
        file: PathBuf,
        /// Print the decoded records as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Delete the cached roster and its metadata
    ClearCache,
}
