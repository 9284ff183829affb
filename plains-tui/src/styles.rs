//! Palette for the article browser.
use ratatui::style::{Color, Modifier, Style};

pub const HEADER: Style = Style::new().fg(Color::LightGreen).add_modifier(Modifier::BOLD);
pub const TITLE: Style = Style::new().fg(Color::White).add_modifier(Modifier::BOLD);
pub const TAG: Style = Style::new().fg(Color::Cyan);
/// Chip for the tag currently filtering the list.
pub const TAG_SELECTED: Style = Style::new()
    .fg(Color::Black)
    .bg(Color::Cyan)
    .add_modifier(Modifier::BOLD);
pub const LABEL: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);
pub const VALUE: Style = Style::new().fg(Color::White);
pub const DIM: Style = Style::new().fg(Color::DarkGray);
pub const SYSTEM: Style = Style::new().fg(Color::Gray);
pub const BUSY: Style = Style::new().fg(Color::Yellow);
pub const ERROR: Style = Style::new().fg(Color::Red).add_modifier(Modifier::BOLD);
