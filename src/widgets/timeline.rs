use chrono::{DateTime, Utc};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::App;
use crate::domain::TeamAssignmentInterval;
use crate::theme;
use crate::timeline::{team_label, LayoutSlice};

pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let layout = &app.timeline.layout;
    let (Some(start), Some(end)) = (layout.global_start, layout.global_end) else {
        frame.render_widget(
            Paragraph::new(" No team movements recorded for this person")
                .style(Style::default().fg(theme::TEXT_MUTED)),
            area,
        );
        return;
    };

    let heading = Line::from(Span::styled(
        format!(
            " Team movements from {} to {}",
            full_date(&start),
            full_date(&end)
        ),
        Style::default().fg(theme::TEXT).add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(Paragraph::new(heading), Rect { height: 1, ..area });

    let lane_height = app.settings.lane_height;
    let body = Rect {
        x: area.x + 1,
        y: area.y + 2,
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    };
    let scroll = app.scroll.min(max_scroll(app));

    for slice in &layout.slices {
        let top = slice.lane as u32 * lane_height as u32;
        let Some(y) = visible_row(top, scroll, lane_height, body) else {
            continue;
        };
        let (x, width) = columns(slice.position, slice.width, app.settings.timeline.pixel_width, body.width);
        let rect = Rect {
            x: body.x + x,
            y,
            width,
            height: lane_height.min(body.y + body.height - y),
        };
        frame.render_widget(bar(slice), rect);
    }

    let list_top = layout.height(lane_height) + 1;
    if layout.skipped.is_empty() {
        return;
    }
    let mut lines = vec![Line::from(Span::styled(
        "Movements too short to display:",
        Style::default().fg(theme::TEXT_DIM).add_modifier(Modifier::BOLD),
    ))];
    lines.extend(layout.skipped.iter().map(|i| skipped_line(app, i)));

    let list_scroll = scroll as u32;
    let skip = list_scroll.saturating_sub(list_top) as u16;
    let offset = list_top.saturating_sub(list_scroll);
    if offset >= body.height as u32 {
        return;
    }
    let rect = Rect {
        y: body.y + offset as u16,
        height: body.height - offset as u16,
        ..body
    };
    frame.render_widget(Paragraph::new(lines).scroll((skip, 0)), rect);
}

/// Rows the timeline tab occupies below its heading.
pub fn content_height(app: &App) -> u32 {
    let layout = &app.timeline.layout;
    let list = if layout.skipped.is_empty() {
        0
    } else {
        layout.skipped.len() as u32 + 2
    };
    layout.height(app.settings.lane_height) + list
}

fn max_scroll(app: &App) -> u16 {
    content_height(app).min(u16::MAX as u32) as u16
}

fn visible_row(top: u32, scroll: u16, lane_height: u16, body: Rect) -> Option<u16> {
    let scroll = scroll as u32;
    if top + lane_height as u32 <= scroll {
        return None;
    }
    let offset = top.checked_sub(scroll)?;
    if offset >= body.height as u32 {
        return None;
    }
    Some(body.y + offset as u16)
}

/// Maps a slice's pixel geometry onto `cols` terminal columns. Every drawn
/// slice gets at least one column.
pub fn columns(position: f64, width: f64, pixel_width: f64, cols: u16) -> (u16, u16) {
    if cols == 0 || pixel_width <= 0.0 {
        return (0, 0);
    }
    let scale = cols as f64 / pixel_width;
    let x = ((position * scale).round() as u16).min(cols - 1);
    let right = (((position + width) * scale).round() as u16).clamp(x + 1, cols);
    (x, right - x)
}

fn bar(slice: &LayoutSlice) -> Paragraph<'static> {
    let bg = theme::hex(&slice.color);
    let border = theme::hex(&slice.border_color);
    let lines = vec![
        Line::from(Span::styled(
            slice.label.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!(
            "{} to {}",
            short_date(&slice.interval.start_date),
            short_date(&slice.interval.end_date)
        )),
    ];
    Paragraph::new(lines)
        .style(Style::default().fg(theme::TEXT).bg(bg))
        .block(
            Block::default()
                .borders(Borders::LEFT)
                .border_style(Style::default().fg(border).bg(bg)),
        )
}

fn skipped_line(app: &App, interval: &TeamAssignmentInterval) -> Line<'static> {
    Line::from(vec![
        Span::styled("  • ", Style::default().fg(theme::TEXT_MUTED)),
        Span::styled(
            team_label(&app.record.teams, &interval.team),
            Style::default().fg(theme::TEXT),
        ),
        Span::styled(
            format!(
                " from {} to {}",
                short_date_time(&interval.start_date),
                short_date_time(&interval.end_date)
            ),
            Style::default().fg(theme::TEXT_DIM),
        ),
    ])
}

fn local(dt: &DateTime<Utc>) -> DateTime<chrono::Local> {
    dt.with_timezone(&chrono::Local)
}

fn full_date(dt: &DateTime<Utc>) -> String {
    local(dt).format("%-d %B %Y").to_string()
}

fn short_date(dt: &DateTime<Utc>) -> String {
    local(dt).format("%d/%m/%y").to_string()
}

fn short_date_time(dt: &DateTime<Utc>) -> String {
    local(dt).format("%d/%m/%y %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_scale_to_terminal_width() {
        assert_eq!(columns(0.0, 400.0, 800.0, 80), (0, 40));
        assert_eq!(columns(400.0, 400.0, 800.0, 80), (40, 40));
        assert_eq!(columns(799.0, 1.0, 800.0, 80), (79, 1));
        assert_eq!(columns(0.0, 10.0, 800.0, 0), (0, 0));
    }

    #[test]
    fn visible_rows_respect_scroll() {
        let body = Rect::new(0, 2, 80, 10);
        assert_eq!(visible_row(0, 0, 2, body), Some(2));
        assert_eq!(visible_row(4, 2, 2, body), Some(4));
        assert_eq!(visible_row(0, 2, 2, body), None);
        assert_eq!(visible_row(20, 0, 2, body), None);
    }
}
