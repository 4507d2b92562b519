use chrono::{DateTime, Utc};
use serde::Serialize;

use super::palette::{team_colors, Palette};
use crate::domain::{TeamAssignmentInterval, TeamDirectory, TeamId};

/// Label used for intervals whose team is no longer in the directory.
pub const UNKNOWN_TEAM_LABEL: &str = "Deleted or merged team";

/// An interval placed on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSlice {
    #[serde(flatten)]
    pub interval: TeamAssignmentInterval,
    pub position: f64,
    pub width: f64,
    pub lane: usize,
    pub label: String,
    pub color: String,
    pub border_color: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineLayout {
    pub slices: Vec<LayoutSlice>,
    /// Intervals too narrow to draw, to be listed as text instead.
    pub skipped: Vec<TeamAssignmentInterval>,
    pub lane_count: usize,
    pub global_start: Option<DateTime<Utc>>,
    pub global_end: Option<DateTime<Utc>>,
}

impl TimelineLayout {
    pub fn height(&self, lane_height: u16) -> u32 {
        self.lane_count as u32 * lane_height as u32
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty() && self.skipped.is_empty()
    }

    pub fn lane(&self, lane: usize) -> impl Iterator<Item = &LayoutSlice> {
        self.slices.iter().filter(move |s| s.lane == lane)
    }
}

/// Display name for a team id, or the placeholder when it is unknown.
pub fn team_label(teams: &TeamDirectory, team: &str) -> String {
    teams
        .name_of(team)
        .unwrap_or(UNKNOWN_TEAM_LABEL)
        .to_string()
}

/// Lays intervals out on a timeline `pixel_width` wide.
///
/// Intervals narrower than `min_render_width` end up in `skipped`. The rest
/// are grouped by team, one lane per team, lanes ordered by the team's
/// earliest start.
pub fn layout(
    intervals: &[TeamAssignmentInterval],
    teams: &TeamDirectory,
    pixel_width: f64,
    min_render_width: f64,
) -> TimelineLayout {
    layout_with_palette(intervals, teams, pixel_width, min_render_width, &Palette::default())
}

pub fn layout_with_palette(
    intervals: &[TeamAssignmentInterval],
    teams: &TeamDirectory,
    pixel_width: f64,
    min_render_width: f64,
    palette: &Palette,
) -> TimelineLayout {
    let (Some(global_start), Some(global_end)) = (
        intervals.iter().map(|i| i.start_date).min(),
        intervals.iter().map(|i| i.end_date).max(),
    ) else {
        return TimelineLayout::default();
    };

    let total = (global_end - global_start).num_milliseconds();
    if total <= 0 {
        tracing::debug!("timeline spans a single instant, nothing to draw");
        return TimelineLayout {
            skipped: intervals.to_vec(),
            global_start: Some(global_start),
            global_end: Some(global_end),
            ..Default::default()
        };
    }
    let scale = pixel_width / total as f64;

    let mut skipped = vec![];
    // (team, earliest start, slices) in first-appearance order
    let mut groups: Vec<(TeamId, DateTime<Utc>, Vec<LayoutSlice>)> = vec![];

    for interval in intervals {
        let position = (interval.start_date - global_start).num_milliseconds() as f64 * scale;
        let width = interval.duration_millis() as f64 * scale;
        if width < min_render_width {
            skipped.push(interval.clone());
            continue;
        }

        let team_index = teams.index_of(&interval.team);
        let colors = team_colors(teams.get(&interval.team), team_index, palette);
        let slice = LayoutSlice {
            interval: interval.clone(),
            position,
            width,
            lane: 0,
            label: team_label(teams, &interval.team),
            color: colors.color,
            border_color: colors.border_color,
        };

        match groups.iter_mut().find(|(team, _, _)| *team == interval.team) {
            Some((_, earliest, slices)) => {
                *earliest = (*earliest).min(interval.start_date);
                slices.push(slice);
            }
            None => groups.push((interval.team.clone(), interval.start_date, vec![slice])),
        }
    }

    groups.sort_by_key(|(_, earliest, _)| *earliest);

    let lane_count = groups.len();
    let slices = groups
        .into_iter()
        .enumerate()
        .flat_map(|(lane, (_, _, slices))| {
            slices.into_iter().map(move |mut s| {
                s.lane = lane;
                s
            })
        })
        .collect();

    TimelineLayout {
        slices,
        skipped,
        lane_count,
        global_start: Some(global_start),
        global_end: Some(global_end),
    }
}
