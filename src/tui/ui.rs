//! TUI layout: history table, detail flyout overlay, status bar.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::app::App;
use super::widgets;

/// Render the complete TUI layout.
pub fn render(f: &mut Frame, app: &App) {
    let size = f.area();

    // Main split: content area + status bar (1 line)
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // content
            Constraint::Length(1), // status bar
        ])
        .split(size);

    let content_area = main_chunks[0];
    let status_area = main_chunks[1];

    widgets::history::render(f, content_area, app);

    // Detail flyout overlays the right half of the content area.
    if app.detail_visible || app.detail_loading {
        widgets::detail::render(f, flyout_area(content_area), app);
    }

    render_status_bar(f, status_area, app);
}

/// Right half of the content area, the terminal's stand-in for a flyout.
fn flyout_area(content: Rect) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(content);
    chunks[1]
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![
        Span::styled(
            format!(" {} ", app.server_url),
            Style::default().fg(Color::White),
        ),
        Span::styled("\u{2502} ", Style::default().fg(Color::DarkGray)),
    ];

    let hints: &[(&str, &str)] = if app.detail_visible || app.detail_loading {
        &[("j/k", ": scroll "), ("Esc", ": close "), ("q", ": quit")]
    } else {
        &[
            ("j/k", ": select "),
            ("Enter", ": detail "),
            ("s", ": sort "),
            ("o", ": order "),
            ("z", ": page size "),
            ("h/l", ": page "),
            ("q", ": quit"),
        ]
    };

    for (i, (key, action)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("\u{2502} ", Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::styled(
            *key,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(*action, Style::default().fg(Color::DarkGray)));
    }

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    f.render_widget(status, area);
}
