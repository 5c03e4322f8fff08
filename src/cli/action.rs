use super::ui;
use crate::core::actions::{self, ActionOutcome, DashboardAction};
use anyhow::Result;

/// Runs a dashboard action and reports what happened.
pub fn run(action: DashboardAction) -> Result<()> {
    match actions::perform(action) {
        ActionOutcome::NotImplemented { action, notice } => {
            println!(
                "{} {}",
                ui::style_text(action.label(), ui::StyleType::Emphasis),
                ui::style_text("is not available yet.", ui::StyleType::Warning)
            );
            println!("{}", ui::style_text(&notice, ui::StyleType::Subtle));
        }
    }
    Ok(())
}
