use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::action::Tab;
use crate::app::App;
use crate::theme;

pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let person = &app.record.person;
    let mut left_spans: Vec<Span> = vec![
        Span::styled(
            " teamline ",
            Style::default()
                .fg(theme::ACCENT_BRIGHT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("| ", Style::default().fg(theme::TEXT_MUTED)),
        Span::styled(
            if person.name.is_empty() { person.id.clone() } else { person.name.clone() },
            Style::default().fg(theme::TEXT).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
    ];

    for tab in Tab::ALL {
        let style = if tab == app.tab {
            Style::default()
                .fg(theme::ACCENT_BRIGHT)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(theme::TEXT_MUTED)
        };
        left_spans.push(Span::styled(format!(" {} ", tab.label()), style));
    }

    // Build right-aligned status spans
    let layout = &app.timeline.layout;
    let mut right_spans: Vec<Span> = vec![Span::styled(
        format!(
            "{} intervals · {} lanes · {} too short",
            app.timeline.intervals.len(),
            layout.lane_count,
            layout.skipped.len()
        ),
        Style::default().fg(theme::TEXT_DIM),
    )];
    if app.reloading {
        right_spans.push(Span::styled("  ◌ reloading", Style::default().fg(theme::YELLOW)));
    }
    right_spans.push(Span::styled(
        format!(
            "  as of {}",
            app.now.with_timezone(&chrono::Local).format("%d/%m/%Y %H:%M")
        ),
        Style::default().fg(theme::TEXT_MUTED),
    ));
    right_spans.push(Span::raw(" "));

    // Calculate widths and fill gap with spaces
    let left_width: usize = left_spans.iter().map(|s| s.width()).sum();
    let right_width: usize = right_spans.iter().map(|s| s.width()).sum();
    let total_width = area.width as usize;
    let gap = total_width.saturating_sub(left_width + right_width);

    let mut spans = left_spans;
    spans.push(Span::raw(" ".repeat(gap)));
    spans.extend(right_spans);

    let line = Line::from(spans);
    let widget = Paragraph::new(line).style(Style::default().bg(theme::BG_BAR));
    frame.render_widget(widget, area);
}
