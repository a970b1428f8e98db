pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "flatfeed")]
#[command(about = "Browse the items collected by a flat feed API", long_about = None)]
pub struct Cli {
    /// Items per page (defaults to the configured page size)
    #[arg(short, long, global = true)]
    pub page_size: Option<u32>,

    /// Base URL of the API, overriding the config file
    #[arg(long, global = true)]
    pub api: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List items, newest first
    List {
        /// Search query
        #[arg(short, long)]
        query: Option<String>,

        /// Number of pages to load
        #[arg(long, default_value_t = 1)]
        pages: u32,

        /// Print items as JSON lines (normalized view model and preview)
        #[arg(long)]
        json: bool,
    },
    /// Configuration helpers
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the config file location
    Path,
}
