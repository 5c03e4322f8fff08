use crate::core::model::AmountTone;
use crate::core::money::Money;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::time::Duration;

/// Series colours for chart slices, cycled by index.
pub const PALETTE: [Color; 5] = [
    Color::Blue,
    Color::Cyan,
    Color::Yellow,
    Color::Green,
    Color::Red,
];

pub const INCOME_COLOR: Color = Color::Cyan;
pub const EXPENSE_COLOR: Color = Color::Red;

const BAR_GLYPH: &str = "█";
const SKELETON_GLYPH: &str = "░";

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Caption,
    Emphasis,
    Error,
    Warning,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Caption => style(text).dim().italic(),
        StyleType::Emphasis => style(text).bold(),
        StyleType::Error => style(text).red().bold(),
        StyleType::Warning => style(text).yellow(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// A section heading with an optional dimmed caption on the right.
pub fn section_title(title: &str, caption: Option<&str>) -> String {
    match caption {
        Some(caption) => format!(
            "{}  {}",
            style_text(title, StyleType::Title),
            style_text(caption, StyleType::Caption)
        ),
        None => style_text(title, StyleType::Title),
    }
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// A right-aligned money cell, optionally coloured.
pub fn money_cell(amount: Money, color: Option<Color>) -> Cell {
    let cell = Cell::new(amount.to_string()).set_alignment(CellAlignment::Right);
    match color {
        Some(color) => cell.fg(color),
        None => cell,
    }
}

/// Cell for a transaction amount: absolute value, coloured by tone.
pub fn tone_cell(text: String, tone: AmountTone) -> Cell {
    let color = match tone {
        AmountTone::Positive => Color::Green,
        AmountTone::Warning => Color::Red,
    };
    Cell::new(text)
        .fg(color)
        .add_attribute(Attribute::Bold)
        .set_alignment(CellAlignment::Right)
}

/// A muted cell for secondary text such as card subtitles.
pub fn subtle_cell(text: &str) -> Cell {
    Cell::new(text).fg(Color::DarkGrey)
}

/// `part / whole` as a percentage with one decimal, zero when `whole` is zero.
pub fn share_percent(part: Money, whole: Money) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    (part.amount() / whole.amount() * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

/// A horizontal bar scaled so that `max` fills `width` glyphs.
pub fn bar(value: Money, max: Money, width: usize) -> String {
    if max.is_zero() || value.is_negative() {
        return String::new();
    }
    let cells = (value.amount() / max.amount() * Decimal::from(width))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_usize()
        .unwrap_or(0)
        .min(width);
    BAR_GLYPH.repeat(cells)
}

/// A placeholder block used while content is loading.
pub fn skeleton_block(width: usize) -> String {
    style_text(&SKELETON_GLYPH.repeat(width), StyleType::Subtle)
}

/// Creates a spinner shown while the dashboard is loading.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}")
    {
        pb.set_style(spinner_style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// A separator line matching the terminal width.
pub fn separator() -> String {
    let term_width = console::Term::stdout()
        .size_checked()
        .map(|(_, w)| w as usize)
        .unwrap_or(80);
    style_text(&"─".repeat(term_width), StyleType::Subtle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_scales_to_width() {
        assert_eq!(bar(Money::from(50), Money::from(100), 10), "█████");
        assert_eq!(bar(Money::from(100), Money::from(100), 10), "██████████");
        assert_eq!(bar(Money::ZERO, Money::from(100), 10), "");
        assert_eq!(bar(Money::from(5), Money::ZERO, 10), "");
    }

    #[test]
    fn test_share_percent() {
        assert_eq!(
            share_percent(Money::from(18500), Money::from(30550)),
            Decimal::new(606, 1)
        );
        assert_eq!(share_percent(Money::from(1), Money::ZERO), Decimal::ZERO);
    }
}
