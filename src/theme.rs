use ratatui::style::Color;

use crate::timeline::palette::hex_to_rgb;

// Backgrounds
pub const BG_DARK: Color = Color::Rgb(13, 13, 23);
pub const BG_BAR: Color = Color::Rgb(17, 17, 30);
pub const BG_SURFACE: Color = Color::Rgb(22, 22, 38);

// Primary accent (dashboard blue)
pub const ACCENT_BRIGHT: Color = Color::Rgb(96, 165, 250);

// Text
pub const TEXT: Color = Color::Rgb(220, 220, 230);
pub const TEXT_DIM: Color = Color::Rgb(130, 130, 155);
pub const TEXT_MUTED: Color = Color::Rgb(75, 75, 100);

// Semantic
pub const RED: Color = Color::Rgb(248, 113, 113);
pub const YELLOW: Color = Color::Rgb(251, 191, 36);

/// Terminal colour for a `#rrggbb[aa]` string.
pub fn hex(value: &str) -> Color {
    match hex_to_rgb(value) {
        Some((r, g, b)) => Color::Rgb(r, g, b),
        None => Color::Gray,
    }
}
