//! History table: trigger time, state with icon, comment.

use chrono::Local;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::api::WatchState;
use crate::tui::app::App;

/// Shown when the fetched history is empty, and in the detail flyout when an
/// entry has no action statuses.
pub const EMPTY_MESSAGE: &str = "No current status to show";

/// Icon and color for a watch state. An unrecognized state gets no icon.
pub fn state_icon(state: WatchState) -> Option<(&'static str, Color)> {
    match state {
        WatchState::Ok => Some(("\u{2713}", Color::Green)),
        WatchState::Disabled => Some(("\u{2296}", Color::DarkGray)),
        WatchState::Firing => Some(("\u{25B6}", Color::Blue)),
        WatchState::Error | WatchState::ConfigError => Some(("\u{2297}", Color::Red)),
        WatchState::Unknown => None,
    }
}

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let title = match app.watch.as_ref().and_then(|w| w.name.as_deref()) {
        Some(name) => format!(" Watch History: {} ", name),
        None => format!(" Watch History: {} ", app.watch_id),
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if let Some(failure) = &app.load_error {
        let content = Paragraph::new(vec![
            Line::from(Span::styled(
                format!("  \u{2297} {}", failure),
                Style::default().fg(Color::Red),
            )),
            Line::from(Span::styled(
                format!("  Server: {}", app.server_url),
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .block(block);
        f.render_widget(content, area);
        return;
    }

    if app.loading {
        let content = Paragraph::new(Line::from(vec![
            Span::styled(
                format!("  {} ", app.spinner_frame()),
                Style::default().fg(Color::Cyan),
            ),
            Span::styled("Loading watch history...", Style::default().fg(Color::White)),
        ]))
        .block(block);
        f.render_widget(content, area);
        return;
    }

    if app.history.is_empty() {
        let content = Paragraph::new(Line::from(Span::styled(
            format!("  {}", EMPTY_MESSAGE),
            Style::default().fg(Color::DarkGray),
        )))
        .block(block);
        f.render_widget(content, area);
        return;
    }

    let mut lines = Vec::new();

    // Header
    lines.push(Line::from(Span::styled(
        format!("  {:<21} {:<16} {}", "TRIGGER TIME", "STATE", "COMMENT"),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )));

    let comment_width = (area.width as usize).saturating_sub(44);
    let page_start = app.page() * app.page_size;

    for (offset, &idx) in app.page_rows().iter().enumerate() {
        let entry = &app.history[idx];
        let is_selected = app.selected == Some(page_start + offset);

        let bg_style = if is_selected {
            Style::default().bg(Color::DarkGray)
        } else {
            Style::default()
        };

        let time_str = entry
            .start_time
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();

        let state = entry.watch_status.state;
        let (icon, state_color) = match state_icon(state) {
            Some((icon, color)) => (icon, color),
            None => (" ", Color::White),
        };

        let comment = entry.watch_status.comment.as_deref().unwrap_or("");
        let comment = truncate(comment, comment_width);

        lines.push(Line::from(vec![
            Span::styled("  ", bg_style),
            Span::styled(format!("{:<21} ", time_str), bg_style.fg(Color::Blue)),
            Span::styled(format!("{} ", icon), bg_style.fg(state_color)),
            Span::styled(format!("{:<14} ", state.as_str()), bg_style.fg(state_color)),
            Span::styled(comment, bg_style.fg(Color::White)),
        ]));
    }

    // Footer: pagination and sort status
    let sort_label = match app.sort {
        Some(column) => format!(
            "sort: {} {}",
            column.label(),
            if app.sort_desc { "desc" } else { "asc" }
        ),
        None => "unsorted".to_string(),
    };
    lines.push(Line::from(Span::styled(
        format!(
            "  Page {}/{} \u{2502} {}/page \u{2502} {} entries \u{2502} {}",
            app.page() + 1,
            app.page_count(),
            app.page_size,
            app.history.len(),
            sort_label
        ),
        Style::default().fg(Color::DarkGray),
    )));

    let content = Paragraph::new(lines).block(block);
    f.render_widget(content, area);
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
