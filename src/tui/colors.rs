//! Color constants for the terminal user interface.

use ratatui::style::Color;

/// Background of the main view.
pub const SLATE: Color = Color::Rgb(44, 62, 80);
/// Total card.
pub const BLUE: Color = Color::Rgb(52, 152, 219);
/// Completed card and completed rows.
pub const GREEN: Color = Color::Rgb(39, 174, 96);
/// Pending card.
pub const ORANGE: Color = Color::Rgb(230, 126, 34);
/// Removal prompt and error status.
pub const RED: Color = Color::Rgb(231, 76, 60);
/// Secondary text.
pub const SILVER: Color = Color::Rgb(189, 195, 199);
/// Primary text on dark backgrounds.
pub const CLOUD: Color = Color::Rgb(236, 240, 241);
