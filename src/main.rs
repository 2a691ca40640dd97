use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use rateconv::core::log::init_logging;

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

impl From<Commands> for rateconv::AppCommand {
    fn from(cmd: Commands) -> rateconv::AppCommand {
        match cmd {
            Commands::Convert { amount, from, to } => {
                rateconv::AppCommand::Convert { amount, from, to }
            }
            Commands::Units => rateconv::AppCommand::Units,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Convert an amount between two units, e.g. `convert 10 USD bitcoin`
    Convert {
        /// Amount in the source unit
        #[arg(allow_hyphen_values = true)]
        amount: String,
        /// Fiat code, coin id or basket item to convert from
        from: String,
        /// Fiat code, coin id or basket item to convert to
        to: String,
    },
    /// List supported units
    Units,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => rateconv::cli::setup::setup(),
        Some(cmd) => rateconv::run_command(cmd.into(), cli.config_path.as_deref()).await,
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
