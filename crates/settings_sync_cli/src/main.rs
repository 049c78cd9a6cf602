use std::io;

use clap::{Parser, Subcommand, ValueEnum};
use settings_sync_cli::commands::{self, ConfigArgs, SyncArgs};
use settings_sync_cli::errors::Error;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;

/// Environment variable holding the log filter directives.
const LOG_FILTER_VARIABLE: &str = "SETTINGS_SYNC_LOG";

/// settings-sync: keep GitHub repository settings in line with a YAML document
#[derive(Parser, Debug)]
#[command(name = "settings-sync", version)]
#[command(about = "Synchronize GitHub repository settings from a YAML document", long_about = None)]
struct Cli {
    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Apply the configuration to every selected repository
    Sync(SyncArgs),

    /// Check the configuration without calling GitHub
    Validate(ConfigArgs),

    /// Print the JSON schema of the configuration document
    Schema,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

fn init_logging(format: LogFormat) {
    let filter =
        EnvFilter::try_from_env(LOG_FILTER_VARIABLE).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Pretty => registry.with(fmt::layer().pretty()).init(),
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
    }
}

async fn execute(command: &Commands) -> Result<(), Error> {
    match command {
        Commands::Sync(args) => commands::sync(args).await.map(|_| ()),
        Commands::Validate(args) => commands::validate(args).map(|_| ()),
        Commands::Schema => commands::schema(&mut io::stdout().lock()),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format);

    if let Err(e) = execute(&cli.command).await {
        error!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}
