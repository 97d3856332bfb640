//! CLI entry point - the composition root.

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use clipspeak_cli::{Cli, CliConfig, Commands, bootstrap, exit_code_for, handlers};

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Cancel `cancel` on the first Ctrl+C.
fn cancel_on_ctrl_c(cancel: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::debug!("Ctrl+C received, shutting down");
                cancel.cancel();
            }
            Err(e) => tracing::warn!(error = %e, "Failed to listen for Ctrl+C"),
        }
    });
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let cancel = CancellationToken::new();
    cancel_on_ctrl_c(cancel.clone());

    // Bootstrap the CLI context (composition root)
    let config = CliConfig {
        config_dir: cli.config_dir,
        speech: cli.speech,
    };
    let ctx = bootstrap(config, cancel)?;

    match cli.command.unwrap_or(Commands::Listen) {
        Commands::Listen => handlers::listen::execute(&ctx).await,
        Commands::Speak { text } => handlers::speak::execute(&ctx, &text).await,
        Commands::Install { force } => handlers::install::execute(&ctx, force).await,
        Commands::Paths => handlers::paths::execute(&ctx),
    }
}

#[tokio::main]
async fn main() {
    // Load environment variables before clap reads them
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        tracing::error!(error = %e, "clipspeak failed");
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code_for(&e));
    }
}
