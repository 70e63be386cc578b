use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Attribute, Cell, Color, Table};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use pawflix_core::Card;
use std::io::IsTerminal;
use std::time::Duration;

pub fn is_interactive() -> bool {
    std::io::stdout().is_terminal() && std::io::stderr().is_terminal()
}

pub fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.apply_modifier(UTF8_ROUND_CORNERS);
    table
}

pub fn header(title: &str) -> String {
    format!("\n{}", title.bright_cyan().bold())
}

pub fn card_table(cards: &[Card]) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new("ID").add_attribute(Attribute::Bold),
        Cell::new("Title").add_attribute(Attribute::Bold),
        Cell::new("Year").add_attribute(Attribute::Bold),
        Cell::new("Rating").add_attribute(Attribute::Bold),
        Cell::new("Category").add_attribute(Attribute::Bold),
        Cell::new("Genres").add_attribute(Attribute::Bold),
    ]);
    for card in cards {
        let rating = if card.rating == "N/A" {
            Cell::new(&card.rating).fg(Color::DarkGrey)
        } else {
            Cell::new(format!("★ {}", card.rating)).fg(Color::Yellow)
        };
        table.add_row(vec![
            Cell::new(card.id),
            Cell::new(&card.title),
            Cell::new(card.year),
            rating,
            Cell::new(card.category.label()).fg(Color::Cyan),
            Cell::new(&card.genres),
        ]);
    }
    table
}

/// Spinner for a single request; hidden when not attached to a terminal.
pub fn spinner(msg: impl Into<String>) -> ProgressBar {
    if !is_interactive() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg}")
        .map(|s| s.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"))
    {
        pb.set_style(style);
    }
    pb.set_message(msg.into());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Bar over `len` steps; hidden when not attached to a terminal, in which
/// case progress goes to the log instead.
pub fn progress_bar(len: u64, msg: impl Into<String>) -> ProgressBar {
    if !is_interactive() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}")
        .map(|s| s.progress_chars("█▉▊▋▌▍▎▏  "))
    {
        pb.set_style(style);
    }
    pb.set_message(msg.into());
    pb
}
