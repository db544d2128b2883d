use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ovalguide")]
#[command(about = "The Oval Guide - professor and class search", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override search.api_url
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Override search.min_chars
    #[arg(long, global = true)]
    pub min_chars: Option<usize>,

    /// Override search.debounce_ms
    #[arg(long, global = true)]
    pub debounce_ms: Option<u64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new config file
    Init {
        /// Path for new config file
        #[arg(default_value = "ovalguide.toml")]
        path: PathBuf,
    },
    /// Type a query, wait for results, press Enter; prints the resulting route
    Lookup {
        /// Raw search text
        query: String,
    },
    /// Show the full result list for a query
    Results {
        /// Raw search text
        query: String,
    },
    /// Type-ahead search in the terminal
    Interactive,
}
