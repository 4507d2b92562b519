pub mod layout;
pub mod palette;
pub mod reconstruct;

use chrono::{DateTime, Utc};
use serde::Serialize;

pub use layout::{layout, team_label, LayoutSlice, TimelineLayout, UNKNOWN_TEAM_LABEL};
pub use palette::{color_for, Palette, SliceColors};
pub use reconstruct::reconstruct;

use crate::domain::{HistoryEvent, TeamAssignmentInterval, TeamDirectory};

pub const DEFAULT_PIXEL_WIDTH: f64 = 800.0;
pub const DEFAULT_MIN_RENDER_WIDTH: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineOptions {
    pub pixel_width: f64,
    pub min_render_width: f64,
}

impl Default for TimelineOptions {
    fn default() -> Self {
        Self {
            pixel_width: DEFAULT_PIXEL_WIDTH,
            min_render_width: DEFAULT_MIN_RENDER_WIDTH,
        }
    }
}

/// Reconstructed intervals together with their layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TeamTimeline {
    pub intervals: Vec<TeamAssignmentInterval>,
    pub layout: TimelineLayout,
}

impl TeamTimeline {
    pub fn build(
        history: &[HistoryEvent],
        creation_date: DateTime<Utc>,
        now: DateTime<Utc>,
        teams: &TeamDirectory,
        options: TimelineOptions,
    ) -> Self {
        let intervals = reconstruct(history, creation_date, now);
        let layout = layout(&intervals, teams, options.pixel_width, options.min_render_width);
        Self { intervals, layout }
    }
}
