//! Xyber account inspector
//!
//! Scans the Xyber program's accounts, decodes them and evaluates the
//! bonding curve they describe.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::EnvFilter;

use xyber_inspect::cli::commands::{self, QuoteKind};
use xyber_inspect::cli::DEFAULT_LOG_FILTER;
use xyber_inspect::config::Config;

/// Xyber account inspector
#[derive(Parser)]
#[command(name = "xyber")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "xyber.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enumerate and decode every account owned by the program
    Scan {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,

        /// Keep pool states whose mint is still the placeholder
        #[arg(long)]
        include_placeholder: bool,
    },

    /// Decode one account from base64 data or a raw file
    Decode {
        /// Base64-encoded account data
        #[arg(required_unless_present = "file", conflicts_with = "file")]
        data: Option<String>,

        /// File holding the raw account bytes
        #[arg(long)]
        file: Option<PathBuf>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Render the bonding curve chart as SVG
    Plot {
        /// Take the curve constants from this XyberCore account
        #[arg(long)]
        account: Option<String>,

        /// Output path (overrides chart.output_path)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Quote a trade against a XyberCore account's curve
    Quote {
        /// XyberCore account address
        account: String,

        /// Trade direction
        #[arg(value_enum)]
        kind: QuoteKind,

        /// Amount in base units or raw tokens, depending on direction
        amount: u64,

        /// Deposit to quote at (default: the account's current deposit)
        #[arg(long)]
        x: Option<u64>,
    },

    /// Show current configuration (secrets masked)
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match Config::load(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Scan {
            json,
            include_placeholder,
        } => commands::scan(&config, json, include_placeholder).await,
        Commands::Decode { data, file, json } => {
            commands::decode(data.as_deref(), file.as_deref(), json)
        }
        Commands::Plot { account, output } => {
            commands::plot(&config, account.as_deref(), output).await
        }
        Commands::Quote {
            account,
            kind,
            amount,
            x,
        } => commands::quote(&config, &account, kind, amount, x).await,
        Commands::Config => commands::show_config(&config),
    };

    if let Err(e) = result {
        error!("Command failed: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
