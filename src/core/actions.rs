//! Dashboard actions that have no backing implementation yet.
//!
//! Each action reports explicitly that it is unavailable rather than doing
//! nothing, so callers and tests can tell an unwired action from a working one.

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DashboardAction {
    SwitchToStartupView,
    CreateBudget,
    ExportTransactions,
    ConnectAccount,
}

impl DashboardAction {
    /// Actions listed in the dashboard's actions panel, in display order.
    pub const PANEL: [DashboardAction; 3] = [
        DashboardAction::CreateBudget,
        DashboardAction::ExportTransactions,
        DashboardAction::ConnectAccount,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DashboardAction::SwitchToStartupView => "Startup",
            DashboardAction::CreateBudget => "Create Budget",
            DashboardAction::ExportTransactions => "Export Transactions (CSV)",
            DashboardAction::ConnectAccount => "Connect Bank / Upload Statement",
        }
    }

    /// Name accepted on the command line.
    pub fn command_name(&self) -> &'static str {
        match self {
            DashboardAction::SwitchToStartupView => "switch-view",
            DashboardAction::CreateBudget => "create-budget",
            DashboardAction::ExportTransactions => "export-transactions",
            DashboardAction::ConnectAccount => "connect-account",
        }
    }

    fn notice(&self) -> &'static str {
        match self {
            DashboardAction::SwitchToStartupView => {
                "Switch to Startup view later; it will be implemented next."
            }
            DashboardAction::CreateBudget => "Budgets are not available yet.",
            DashboardAction::ExportTransactions => "Exporting transactions is not available yet.",
            DashboardAction::ConnectAccount => {
                "Connecting a bank or uploading a statement is not available yet."
            }
        }
    }
}

impl Display for DashboardAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DashboardAction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "switch-view" | "startup" => Ok(DashboardAction::SwitchToStartupView),
            "create-budget" | "budget" => Ok(DashboardAction::CreateBudget),
            "export-transactions" | "export" => Ok(DashboardAction::ExportTransactions),
            "connect-account" | "connect" => Ok(DashboardAction::ConnectAccount),
            _ => Err(anyhow::anyhow!("Invalid dashboard action: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    NotImplemented {
        action: DashboardAction,
        notice: String,
    },
}

pub fn perform(action: DashboardAction) -> ActionOutcome {
    info!(action = action.command_name(), "Dashboard action requested");
    ActionOutcome::NotImplemented {
        action,
        notice: action.notice().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_action_reports_not_implemented() {
        for action in [
            DashboardAction::SwitchToStartupView,
            DashboardAction::CreateBudget,
            DashboardAction::ExportTransactions,
            DashboardAction::ConnectAccount,
        ] {
            match perform(action) {
                ActionOutcome::NotImplemented { action: a, notice } => {
                    assert_eq!(a, action);
                    assert!(!notice.is_empty());
                }
            }
        }
    }

    #[test]
    fn test_parse_command_names() {
        for action in DashboardAction::PANEL {
            assert_eq!(action.command_name().parse::<DashboardAction>().unwrap(), action);
        }
        assert_eq!(
            "Startup".parse::<DashboardAction>().unwrap(),
            DashboardAction::SwitchToStartupView
        );
        assert!("delete-account".parse::<DashboardAction>().is_err());
    }
}
