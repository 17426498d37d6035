mod cli;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "repo_indexer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Detect { path, format } => {
            let root = cli::resolve_root(&path);
            cli::detect(&root, &format)?;
        }
        Commands::Validate { path } => {
            let root = cli::resolve_root(&path);
            if !cli::validate_budgets(&root) {
                std::process::exit(1);
            }
        }
        Commands::MemoryUpdate { json } => {
            cli::memory_update(json.as_deref());
        }
        Commands::Sync { path } => {
            cli::sync(&path);
        }
    }

    Ok(())
}
