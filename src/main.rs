use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use cmx::core::log::init_logging;
use std::path::PathBuf;

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

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display all commodity quotes
    Quotes {
        /// Export the quote table as CSV to this path
        #[arg(short, long)]
        export: Option<PathBuf>,
    },
    /// Display top performers for a metric
    Top {
        /// Metric to rank by: daily, weekly, monthly, yearly or 3y
        #[arg(short, long, default_value = "daily")]
        metric: String,
        /// Number of entries per category (or overall with --global)
        #[arg(short = 'n', long, default_value_t = 5)]
        count: usize,
        /// Rank across all categories instead of per category
        #[arg(short, long)]
        global: bool,
    },
    /// Display the strong-leads consensus ranking
    Leads {
        /// Also show rank changes against the previous day's run
        #[arg(long)]
        changes: bool,
    },
    /// Display investment opportunities per timeframe
    Opportunities,
    /// Evaluate price alerts against the previous day's snapshot
    Alerts {
        /// Print fired alerts without sending notifications
        #[arg(long)]
        dry_run: bool,
    },
}

fn to_app_command(cmd: Commands) -> Result<cmx::AppCommand> {
    Ok(match cmd {
        Commands::Quotes { export } => cmx::AppCommand::Quotes { export },
        Commands::Top {
            metric,
            count,
            global,
        } => cmx::AppCommand::Top {
            metric: metric.parse()?,
            count,
            global,
        },
        Commands::Leads { changes } => cmx::AppCommand::Leads { changes },
        Commands::Opportunities => cmx::AppCommand::Opportunities,
        Commands::Alerts { dry_run } => cmx::AppCommand::Alerts { dry_run },
        Commands::Setup => unreachable!("Setup command should be handled separately"),
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => cmx::cli::setup::setup(),
        Some(cmd) => match to_app_command(cmd) {
            Ok(command) => cmx::run_command(command, cli.config_path.as_deref()).await,
            Err(e) => Err(e),
        },
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
