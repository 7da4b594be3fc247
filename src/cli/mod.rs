//! CLI module for Care Price
//!
//! Provides subcommands for exercising the data-access core from a terminal:
//! - `search`: one immediate aggregated search
//! - `watch`: feed stdin lines through the debounced aggregator
//! - `token`: fetch a credential through the cache
//! - `stats`: run a search and print API call statistics

pub mod search;
pub mod stats;
pub mod token;
pub mod watch;

use clap::{Args, Parser, Subcommand};

use crate::config::AppConfig;
use crate::domain::{AggregatedResultSet, Category};
use crate::infrastructure::logging;

/// Care Price - healthcare price search client
#[derive(Parser)]
#[command(name = "care-price")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Backend base URL (overrides APP__GATEWAY__BASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run one search immediately and print the merged results
    Search(QueryArgs),

    /// Read queries from stdin as keystrokes and print each resolved result set
    Watch,

    /// Fetch a credential and print its masked value and expiry
    Token,

    /// Run a search and print API call statistics
    Stats(QueryArgs),
}

#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// Search text
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

impl QueryArgs {
    pub fn text(&self) -> String {
        self.query.join(" ")
    }
}

/// Load `.env`, layered configuration and logging
pub fn bootstrap(base_url: Option<String>) -> AppConfig {
    dotenvy::dotenv().ok();

    let mut config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration, using defaults: {}", e);
        AppConfig::default()
    });

    if let Some(base_url) = base_url {
        config.gateway = config.gateway.with_base_url(base_url);
    }

    logging::init_logging(&config.logging);
    config
}

/// Print a result set grouped by category heading
pub fn print_result_set(set: &AggregatedResultSet) {
    if set.is_empty() {
        println!("No results for \"{}\"", set.query.text);
        return;
    }

    if set.is_degraded() {
        println!("(offline data: live search unavailable)");
    }

    for category in set.categories() {
        println!("{}", category_heading(category));
        for item in set.in_category(category) {
            match &item.secondary_text {
                Some(secondary) => println!("  {}  ({})", item.primary_text, secondary),
                None => println!("  {}", item.primary_text),
            }
        }
    }
}

fn category_heading(category: Category) -> String {
    format!("{}:", category.label())
}
