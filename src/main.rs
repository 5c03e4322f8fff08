use anyhow::Result;
use capwise::core::actions::DashboardAction;
use capwise::core::log::init_logging;
use clap::{CommandFactory, Parser, Subcommand};

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
    /// Display the individual dashboard
    Dashboard {
        /// Print the dashboard view-model as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run a dashboard action (switch-view, create-budget, export-transactions, connect-account)
    Action {
        action: DashboardAction,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => capwise::cli::setup::setup(),
        Some(Commands::Dashboard { json }) => {
            capwise::run_command(
                capwise::AppCommand::Dashboard { json },
                cli.config_path.as_deref(),
            )
            .await
        }
        Some(Commands::Action { action }) => {
            capwise::run_command(
                capwise::AppCommand::Action(action),
                cli.config_path.as_deref(),
            )
            .await
        }
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
