use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::App;
use crate::history::HistoryRow;
use crate::theme;

pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let mut lines = vec![Line::from(vec![
        Span::styled(format!(" {:<18}", "Date"), header_style()),
        Span::styled(format!("{:<24}", "User"), header_style()),
        Span::styled("Change", header_style()),
    ])];
    for row in &app.rows {
        lines.extend(row_lines(row));
    }

    let max_scroll = (lines.len() as u16).saturating_sub(1);
    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::NONE))
        .wrap(Wrap { trim: false })
        .scroll((app.scroll.min(max_scroll), 0));
    frame.render_widget(paragraph, area);
}

fn header_style() -> Style {
    Style::default()
        .fg(theme::TEXT_DIM)
        .add_modifier(Modifier::BOLD)
}

fn row_lines(row: &HistoryRow) -> Vec<Line<'static>> {
    let date = row
        .date
        .with_timezone(&chrono::Local)
        .format("%d/%m/%Y %H:%M")
        .to_string();
    let mut changes = row.changes.iter();
    let first = changes.next().cloned().unwrap_or_default();

    let mut lines = vec![Line::from(vec![
        Span::styled(format!(" {:<18}", date), Style::default().fg(theme::TEXT_DIM)),
        Span::styled(format!("{:<24}", row.author), Style::default().fg(theme::ACCENT_BRIGHT)),
        Span::styled(first, Style::default().fg(theme::TEXT)),
    ])];
    lines.extend(changes.map(|change| {
        Line::from(vec![
            Span::raw(format!(" {:<18}{:<24}", "", "")),
            Span::styled(change.clone(), Style::default().fg(theme::TEXT)),
        ])
    }));
    lines
}
