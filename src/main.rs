use clap::Parser;
use care_price_core::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli::bootstrap(cli.base_url);

    match cli.command {
        Command::Search(args) => cli::search::run(&config, args).await,
        Command::Watch => cli::watch::run(&config).await,
        Command::Token => cli::token::run(&config).await,
        Command::Stats(args) => cli::stats::run(&config, args).await,
    }
}
