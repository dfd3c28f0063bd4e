mod cli;
mod commands;
mod config;
mod errors;
mod logging;
mod scanner;

use clap::Parser;
use vetter_insights::Cancellation;

use cli::{Cli, Commands};
use config::ResolvedConfig;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let cancellation = Cancellation::new();
    tokio::spawn({
        let cancellation = cancellation.clone();
        async move {
            if let Err(error) = tokio::signal::ctrl_c().await {
                tracing::error!(%error, "failed to install SIGINT handler");
                return;
            }
            tracing::warn!("received interrupt, draining in-flight work before exiting");
            cancellation.cancel();
        }
    });

    let cwd = std::env::current_dir().unwrap_or_else(|_| ".".into());
    let result: anyhow::Result<bool> = async {
        let config = ResolvedConfig::load(cli.config.as_deref(), &cwd)?;
        match cli.command {
            Commands::Scan(args) => commands::scan::run(args, &config, cancellation).await,
            Commands::Query(args) => commands::query::run(args, &config, cancellation).await,
        }
    }
    .await;

    if let Err(error) = &result {
        tracing::error!("{error:#}");
    }

    std::process::exit(errors::exit_code(&result));
}
