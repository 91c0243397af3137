//! Detail flyout: per-action statuses and the raw execution payload.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::tui::app::App;

use super::history::{state_icon, EMPTY_MESSAGE};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Watch History Detail ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    // Flyout overlays the table; clear what's underneath first.
    f.render_widget(Clear, area);

    if app.detail_loading {
        let content = Paragraph::new(Line::from(vec![
            Span::styled(
                format!("  {} ", app.spinner_frame()),
                Style::default().fg(Color::Cyan),
            ),
            Span::styled("Loading detail...", Style::default().fg(Color::White)),
        ]))
        .block(block);
        f.render_widget(content, area);
        return;
    }

    if let Some(failure) = &app.detail_error {
        let content = Paragraph::new(vec![
            Line::from(Span::styled(
                format!("  \u{2297} {}", failure),
                Style::default().fg(Color::Red),
            )),
            Line::from(Span::styled(
                "  Esc: close",
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .block(block);
        f.render_widget(content, area);
        return;
    }

    let Some(detail) = &app.detail else {
        return;
    };

    let mut lines = Vec::new();

    // Action status sub-table
    lines.push(Line::from(Span::styled(
        format!("  {:<24} {}", "NAME", "STATE"),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )));

    if detail.watch_status.action_statuses.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("  {}", EMPTY_MESSAGE),
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        for action in &detail.watch_status.action_statuses {
            let (icon, color) = match state_icon(action.state) {
                Some((icon, color)) => (icon, color),
                None => (" ", Color::White),
            };
            lines.push(Line::from(vec![
                Span::styled("  ", Style::default()),
                Span::styled(format!("{:<24} ", action.id), Style::default().fg(Color::White)),
                Span::styled(format!("{} ", icon), Style::default().fg(color)),
                Span::styled(action.state.as_str(), Style::default().fg(color)),
            ]));
        }
    }

    lines.push(Line::from(""));

    // Raw execution payload, 2-space indented
    let payload =
        serde_json::to_string_pretty(&detail.details).unwrap_or_else(|_| "null".to_string());
    for payload_line in payload.lines() {
        lines.push(Line::from(Span::styled(
            format!("  {}", payload_line),
            Style::default().fg(Color::White),
        )));
    }

    // Scroll window over all lines
    let inner_height = area.height.saturating_sub(2) as usize;
    let total = lines.len();
    let offset = app.detail_scroll.min(total.saturating_sub(inner_height));
    let visible: Vec<Line> = lines.into_iter().skip(offset).take(inner_height).collect();

    let content = Paragraph::new(visible).block(block);
    f.render_widget(content, area);
}
