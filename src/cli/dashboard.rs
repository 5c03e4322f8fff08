use super::ui;
use crate::core::actions::DashboardAction;
use crate::core::builder::{DashboardViewModel, ViewModelBuilder};
use crate::core::error::LoadError;
use crate::core::money::Money;
use crate::core::source::SnapshotSource;
use crate::core::view::{MountedDashboard, ViewState};
use anyhow::{Result, anyhow};
use comfy_table::{Attribute, Cell, CellAlignment};
use console::Term;
use std::sync::Arc;
use tracing::debug;

const TITLE: &str = "CapWise - Individual Dashboard";
const SUBTITLE: &str = "Summary of personal & professional finances";
const BAR_WIDTH: usize = 24;

const QUICK_WINS: [&str; 2] = [
    "Reduce recurring subscriptions, potential savings ₹899 / mo",
    "Delay non-critical purchases until paycheck (1st week)",
];

/// Renders whatever the view currently holds.
pub fn render(state: &ViewState) -> String {
    match state {
        ViewState::Loading => render_skeleton(),
        ViewState::Ready(view_model) => render_dashboard(view_model),
        ViewState::Failed(error) => render_failure(error),
    }
}

/// Fixed placeholder shapes; touches no data.
fn render_skeleton() -> String {
    let title = ui::skeleton_block(32);
    let cards = [ui::skeleton_block(18), ui::skeleton_block(18), ui::skeleton_block(18)].join("  ");
    let chart = ui::skeleton_block(58);

    let mut lines = vec![title, String::new()];
    lines.extend(std::iter::repeat_n(cards, 3));
    lines.push(String::new());
    lines.extend(std::iter::repeat_n(chart, 6));
    lines.join("\n")
}

fn render_dashboard(vm: &DashboardViewModel) -> String {
    [
        header(),
        summary_cards(vm),
        category_chart(vm),
        weekly_chart(vm),
        transactions_table(vm),
        income_cycle_panel(vm),
        insights_panel(vm),
        actions_panel(),
    ]
    .join("\n\n")
}

fn render_failure(error: &LoadError) -> String {
    format!(
        "{}\n\n{}\n{}\n\n{}",
        ui::style_text(TITLE, ui::StyleType::Title),
        ui::style_text(error.class(), ui::StyleType::Error),
        error,
        ui::style_text(
            "Retry: press `r` in an interactive terminal, or run `capwise dashboard` again.",
            ui::StyleType::Subtle
        )
    )
}

fn header() -> String {
    let switch = DashboardAction::SwitchToStartupView;
    format!(
        "{}\n{}\n{}  {} {}",
        ui::style_text(TITLE, ui::StyleType::Title),
        ui::style_text(SUBTITLE, ui::StyleType::Subtle),
        ui::style_text("[Individual]", ui::StyleType::Emphasis),
        switch.label(),
        ui::style_text(
            &format!("(not yet available: capwise action {})", switch.command_name()),
            ui::StyleType::Subtle
        ),
    )
}

fn summary_cards(vm: &DashboardViewModel) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Current Balance"),
        ui::header_cell("Monthly Income"),
        ui::header_cell("Monthly Expenses"),
    ]);
    table.add_row(
        [vm.balance, vm.income, vm.expenses]
            .iter()
            .map(|m| Cell::new(m.to_string()).add_attribute(Attribute::Bold))
            .collect::<Vec<_>>(),
    );
    table.add_row(vec![
        ui::subtle_cell(&format!("Income: {} • Expenses: {}", vm.income, vm.expenses)),
        ui::subtle_cell(&format!("Savings: {}", vm.savings)),
        ui::subtle_cell(&format!("{}% of income", vm.expenses_ratio_percent)),
    ]);
    table.to_string()
}

fn category_chart(vm: &DashboardViewModel) -> String {
    let total: Money = vm.category_split.iter().map(|s| s.total).sum();
    let max = vm
        .category_split
        .iter()
        .map(|s| s.total)
        .max()
        .unwrap_or(Money::ZERO);

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Category"),
        ui::header_cell("Amount"),
        ui::header_cell("Share"),
        ui::header_cell(""),
    ]);
    for (i, split) in vm.category_split.iter().enumerate() {
        let color = ui::PALETTE[i % ui::PALETTE.len()];
        table.add_row(vec![
            Cell::new(&split.label).fg(color),
            ui::money_cell(split.total, None),
            Cell::new(format!("{}%", ui::share_percent(split.total, total)))
                .set_alignment(CellAlignment::Right),
            Cell::new(ui::bar(split.total, max, BAR_WIDTH)).fg(color),
        ]);
    }

    format!(
        "{}\n{}",
        ui::section_title("Spending: Personal vs Professional", Some("Last 30 days")),
        table
    )
}

fn weekly_chart(vm: &DashboardViewModel) -> String {
    let max = vm
        .weekly_trend
        .iter()
        .flat_map(|p| [p.income, p.expense])
        .max()
        .unwrap_or(Money::ZERO);

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Day"),
        ui::header_cell("Income"),
        ui::header_cell(""),
        ui::header_cell("Expense"),
        ui::header_cell(""),
    ]);
    for point in &vm.weekly_trend {
        table.add_row(vec![
            Cell::new(point.day.to_string()),
            ui::money_cell(point.income, Some(ui::INCOME_COLOR)),
            Cell::new(ui::bar(point.income, max, BAR_WIDTH / 2)).fg(ui::INCOME_COLOR),
            ui::money_cell(point.expense, Some(ui::EXPENSE_COLOR)),
            Cell::new(ui::bar(point.expense, max, BAR_WIDTH / 2)).fg(ui::EXPENSE_COLOR),
        ]);
    }

    format!(
        "{}\n{}",
        ui::section_title("Weekly Income & Expenses", Some("This week")),
        table
    )
}

fn transactions_table(vm: &DashboardViewModel) -> String {
    let title = ui::section_title("Recent Transactions", None);
    if vm.transactions.is_empty() {
        return format!(
            "{}\n{}",
            title,
            ui::style_text("No transactions in this period.", ui::StyleType::Subtle)
        );
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Date"),
        ui::header_cell("Description"),
        ui::header_cell("Category"),
        ui::header_cell("Amount"),
    ]);
    for t in &vm.transactions {
        table.add_row(vec![
            Cell::new(t.date.format("%Y-%m-%d")),
            Cell::new(&t.description),
            Cell::new(&t.category),
            ui::tone_cell(t.display_amount(), t.tone()),
        ]);
    }
    format!("{title}\n{table}")
}

fn income_cycle_panel(vm: &DashboardViewModel) -> String {
    let cycle = &vm.income_cycle;
    let mut lines = vec![
        ui::section_title("Income Cycle Tracker", None),
        format!(
            "Typical arrival: {}",
            ui::style_text(&cycle.usual_arrival_window, ui::StyleType::Emphasis)
        ),
        format!(
            "On-time arrival rate: {}",
            ui::style_text(&format!("{}%", cycle.on_time_rate), ui::StyleType::Emphasis)
        ),
        ui::style_text("Suggestions:", ui::StyleType::Subtle),
    ];
    lines.extend(cycle.suggestions.iter().map(|s| format!("  • {s}")));
    lines.join("\n")
}

fn insights_panel(vm: &DashboardViewModel) -> String {
    let runway = vm
        .runway_days
        .map_or("n/a".to_string(), |days| format!("~{days} days"));
    let mut lines = vec![
        ui::section_title("Insights", Some("placeholders")),
        format!(
            "Runway estimate: {}",
            ui::style_text(&runway, ui::StyleType::Emphasis)
        ),
        "Quick wins:".to_string(),
    ];
    lines.extend(QUICK_WINS.iter().map(|s| format!("  • {s}")));
    lines.join("\n")
}

fn actions_panel() -> String {
    let mut lines = vec![ui::section_title("Actions", None)];
    lines.extend(DashboardAction::PANEL.iter().map(|action| {
        format!(
            "  • {} {}",
            action.label(),
            ui::style_text(
                &format!("(not yet available: capwise action {})", action.command_name()),
                ui::StyleType::Subtle
            )
        )
    }));
    lines.join("\n")
}

/// Asks whether to retry a failed load. Only called on an interactive terminal.
fn prompt_retry(term: &Term) -> Result<bool> {
    term.write_line(&ui::style_text(
        "Press r to retry, any other key to quit.",
        ui::StyleType::Warning,
    ))?;
    let key = term.read_char()?;
    Ok(key.eq_ignore_ascii_case(&'r'))
}

/// Mounts the dashboard on `source`, waits for it to resolve and prints it.
pub async fn run(
    source: Arc<dyn SnapshotSource>,
    builder: ViewModelBuilder,
    json: bool,
) -> Result<()> {
    let term = Term::stdout();
    let interactive = term.is_term() && !json;
    let mut mounted = MountedDashboard::mount(source, builder).await;

    loop {
        let skeleton_lines = if interactive {
            let skeleton = render(&ViewState::Loading);
            term.write_line(&skeleton)?;
            skeleton.lines().count()
        } else {
            0
        };
        let spinner = ui::new_spinner("Loading dashboard...");
        mounted.settled().await;
        spinner.finish_and_clear();
        if skeleton_lines > 0 {
            term.clear_last_lines(skeleton_lines)?;
        }

        let view = mounted.view();
        let view = view.lock().await;
        debug!(state = view.state().name(), "Dashboard settled");

        match view.state() {
            ViewState::Ready(vm) if json => {
                println!("{}", serde_json::to_string_pretty(vm.as_ref())?);
                return Ok(());
            }
            ViewState::Ready(_) => {
                println!("{}", render(view.state()));
                return Ok(());
            }
            ViewState::Failed(error) => {
                // Keep stdout parseable when JSON was asked for.
                if json {
                    eprintln!("{}", render(view.state()));
                } else {
                    println!("{}", render(view.state()));
                }
                let message = error.to_string();
                drop(view);
                if interactive && prompt_retry(&term)? {
                    println!("{}", ui::separator());
                    mounted.retry().await;
                    continue;
                }
                return Err(anyhow!("Dashboard failed to load: {message}"));
            }
            ViewState::Loading => {
                return Err(anyhow!("Dashboard fetch settled without a result"));
            }
        }
    }
}
