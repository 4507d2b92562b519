use serde::Serialize;

use crate::domain::Team;

/// Translucent fills, indexed by team position.
pub const TEAM_COLORS: &[&str] = &[
    "#255c99cc",
    "#74776bcc",
    "#00c6a5cc",
    "#ff4b64cc",
    "#ef798acc",
    "#a066ffcc",
    "#00e6d6cc",
    "#124660cc",
    "#ff4f38cc",
    "#1b9476cc",
    "#4dbac7cc",
    "#ffa500cc",
    "#e392dbcc",
    "#28A428cc",
    "#f5c000cc",
];

/// Opaque borders matching [`TEAM_COLORS`].
pub const BORDER_COLORS: &[&str] = &[
    "#255c99",
    "#74776b",
    "#00c6a5",
    "#ff4b64",
    "#ef798a",
    "#a066ff",
    "#00e6d6",
    "#124660",
    "#ff4f38",
    "#1b9476",
    "#4dbac7",
    "#ffa500",
    "#e392db",
    "#28a428",
    "#f5d000",
];

pub const UNKNOWN_TEAM_COLOR: &str = "#bbbbbb";
pub const UNKNOWN_TEAM_BORDER: &str = "#aaaaaa";

#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub background: &'static [&'static str],
    pub border: &'static [&'static str],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: TEAM_COLORS,
            border: BORDER_COLORS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SliceColors {
    pub color: String,
    pub border_color: String,
}

fn pick(entries: &[&'static str], i: usize) -> Option<&'static str> {
    entries.get(i % entries.len().max(1)).copied()
}

/// Picks palette entries for the team at `team_index`. `None` (a team that
/// is no longer in the directory) gets the neutral placeholder.
pub fn color_for(team_index: Option<usize>, palette: &Palette) -> SliceColors {
    match team_index {
        Some(i) => SliceColors {
            color: pick(palette.background, i)
                .unwrap_or(UNKNOWN_TEAM_COLOR)
                .to_string(),
            border_color: pick(palette.border, i)
                .unwrap_or(UNKNOWN_TEAM_BORDER)
                .to_string(),
        },
        None => SliceColors {
            color: UNKNOWN_TEAM_COLOR.to_string(),
            border_color: UNKNOWN_TEAM_BORDER.to_string(),
        },
    }
}

/// Colours for a directory team: its own `color` when set, the palette
/// otherwise.
pub fn team_colors(team: Option<&Team>, team_index: Option<usize>, palette: &Palette) -> SliceColors {
    match team.and_then(|t| t.color.as_deref()).filter(|c| !c.is_empty()) {
        Some(color) => SliceColors {
            color: format!("{}cc", color),
            border_color: color.to_string(),
        },
        None => color_for(team_index, palette),
    }
}

/// Parses `#rgb`, `#rrggbb` or `#rrggbbaa` into RGB, ignoring alpha.
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match digits.len() {
        3 => {
            let mut it = digits.chars().map(|c| c.to_digit(16).map(|d| (d * 17) as u8));
            Some((it.next()??, it.next()??, it.next()??))
        }
        6 | 8 => Some((
            channel(digits.get(0..2)?)?,
            channel(digits.get(2..4)?)?,
            channel(digits.get(4..6)?)?,
        )),
        _ => None,
    }
}
