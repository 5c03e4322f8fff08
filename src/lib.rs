pub mod cli;
pub mod core;
pub mod providers;

use crate::core::actions::DashboardAction;
use crate::core::config::AppConfig;
use anyhow::Result;
use tracing::{debug, info};

/// Commands that run against a loaded configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    Dashboard { json: bool },
    Action(DashboardAction),
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("CapWise starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Dashboard { json } => {
            let source = providers::from_config(&config.source)?;
            cli::dashboard::run(source, config.view_model_builder(), json).await
        }
        AppCommand::Action(action) => cli::action::run(action),
    }
}
