use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use ratewatch::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for ratewatch::AppCommand {
    fn from(cmd: Commands) -> ratewatch::AppCommand {
        match cmd {
            Commands::Rate { currency } => ratewatch::AppCommand::Rate { currency },
            Commands::Best { currency, count } => ratewatch::AppCommand::Best { currency, count },
            Commands::Sources { currency } => ratewatch::AppCommand::Sources { currency },
            Commands::Check { currency } => ratewatch::AppCommand::Check { currency },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Show the canonical rate for a currency
    Rate { currency: String },
    /// Show the cheapest sell rates across all sources
    Best {
        currency: String,
        /// Number of quotes to show
        #[arg(short = 'n', long, default_value_t = 3)]
        count: usize,
    },
    /// List one rate per source
    Sources { currency: String },
    /// Compare the current rate against the stored baseline
    Check { currency: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => ratewatch::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

fn setup() -> anyhow::Result<()> {
    use anyhow::Context;

    let path = ratewatch::config::AppConfig::default_config_path()?;

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let default_config = r#"---
providers:
  privat:
    base_url: "https://api.privatbank.ua"
  minfin:
    base_url: "https://api.minfin.com.ua"
    # api_key: "your-minfin-api-key"
  binance:
    base_url: "https://api.binance.com"
  monobank:
    base_url: "https://api.monobank.ua"

local_currency: "UAH"
spike_threshold_pct: 1.5
provider_timeout_secs: 10
"#;

    std::fs::write(&path, default_config)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    tracing::info!("Created default configuration at {}", path.display());
    Ok(())
}
