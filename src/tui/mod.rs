//! Terminal history view for a single watch.
//!
//! Provides a ratatui-based UI that fetches a watch's metadata and its
//! trailing hour of execution history from the watcher REST API, renders
//! them as a sortable paginated table, and loads per-entry detail into a
//! flyout on activation.

mod app;
mod event;
mod rest_client;
mod ui;
mod widgets;

use std::io;

use crossterm::{
    event::{self as crossterm_event, Event as CrosstermEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tokio::time::{interval, Duration};

use app::App;
use event::TuiEvent;

/// Run the history view for one watch against the given server URL.
pub async fn run_history(base_url: &str, token: Option<&str>, watch_id: &str) -> anyhow::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_app(&mut terminal, base_url, token, watch_id).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    base_url: &str,
    token: Option<&str>,
    watch_id: &str,
) -> anyhow::Result<()> {
    let mut app = App::new(watch_id.to_string(), base_url.to_string());

    let (tx, mut rx) = mpsc::channel::<TuiEvent>(256);

    // 1. Terminal event reader (blocking crossterm reads on a dedicated thread)
    let term_tx = tx.clone();
    std::thread::spawn(move || {
        loop {
            match crossterm_event::read() {
                Ok(CrosstermEvent::Key(key)) => {
                    if term_tx.blocking_send(TuiEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(_) => {} // Ignore mouse/resize events
                Err(_) => break,
            }
        }
    });

    // 2. Tick timer (250ms for spinner animation)
    let tick_tx = tx.clone();
    tokio::spawn(async move {
        let mut tick_interval = interval(Duration::from_millis(250));
        loop {
            tick_interval.tick().await;
            if tick_tx.send(TuiEvent::Tick).await.is_err() {
                break;
            }
        }
    });

    // 3. One-shot history loader. Spawned exactly once; nothing re-triggers it.
    let load_tx = tx.clone();
    tokio::spawn(rest_client::load_history(
        base_url.to_string(),
        token.map(|t| t.to_string()),
        watch_id.to_string(),
        load_tx,
    ));

    // Initial draw
    terminal.draw(|f| ui::render(f, &app))?;

    // Main event loop. Once it returns, `rx` drops and any late fetch
    // completion has nowhere to land.
    while let Some(tui_event) = rx.recv().await {
        let needs_redraw = app.handle_event(tui_event);
        if app.should_quit {
            break;
        }
        if let Some(request) = app.take_detail_request() {
            tokio::spawn(rest_client::load_detail(
                base_url.to_string(),
                token.map(|t| t.to_string()),
                request.entry_id,
                request.seq,
                tx.clone(),
            ));
        }
        if needs_redraw {
            terminal.draw(|f| ui::render(f, &app))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::app::App;
    use super::event::{HistoryData, TuiEvent};
    use super::ui;
    use crate::api::{
        ActionStatus, DetailStatus, HistoryDetail, HistoryEntry, Watch, WatchState, WatchStatus,
    };
    use chrono::{TimeZone, Utc};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{backend::TestBackend, Terminal};

    fn sample_app() -> App {
        let mut app = App::new(
            "cluster-health".to_string(),
            "http://localhost:8080".to_string(),
        );
        app.handle_event(TuiEvent::HistoryLoaded(Ok(HistoryData {
            watch: Watch {
                id: "cluster-health".to_string(),
                name: Some("Cluster Health".to_string()),
            },
            entries: vec![
                HistoryEntry {
                    id: "h1".to_string(),
                    start_time: Utc.with_ymd_and_hms(2026, 8, 30, 12, 5, 0).unwrap(),
                    watch_status: WatchStatus {
                        state: WatchState::Error,
                        comment: Some("threshold breached".to_string()),
                    },
                },
                HistoryEntry {
                    id: "h2".to_string(),
                    start_time: Utc.with_ymd_and_hms(2026, 8, 30, 12, 10, 0).unwrap(),
                    watch_status: WatchStatus {
                        state: WatchState::Ok,
                        comment: None,
                    },
                },
            ],
        })));
        app
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer().clone();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_render_history_table() {
        let app = sample_app();
        let backend = TestBackend::new(100, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| ui::render(f, &app)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Watch History: Cluster Health"));
        assert!(text.contains("TRIGGER TIME"));
        assert!(text.contains("\u{2297} error"));
        assert!(text.contains("threshold breached"));
        assert!(text.contains("\u{2713} ok"));
        assert!(text.contains("Page 1/1"));
    }

    #[test]
    fn test_render_empty_state() {
        let mut app = App::new("w1".to_string(), "http://localhost:8080".to_string());
        app.handle_event(TuiEvent::HistoryLoaded(Ok(HistoryData {
            watch: Watch {
                id: "w1".to_string(),
                name: None,
            },
            entries: Vec::new(),
        })));

        let backend = TestBackend::new(80, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| ui::render(f, &app)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("No current status to show"));
    }

    #[test]
    fn test_render_detail_flyout() {
        let mut app = sample_app();
        app.handle_event(TuiEvent::Key(KeyEvent::new(
            KeyCode::Enter,
            KeyModifiers::NONE,
        )));
        let request = app.take_detail_request().unwrap();
        app.handle_event(TuiEvent::DetailLoaded {
            seq: request.seq,
            result: Ok(HistoryDetail {
                id: "h1".to_string(),
                details: serde_json::json!({ "foo": 1 }),
                watch_status: DetailStatus {
                    action_statuses: vec![ActionStatus {
                        id: "notify-slack".to_string(),
                        state: WatchState::Firing,
                    }],
                },
            }),
        });

        let backend = TestBackend::new(100, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| ui::render(f, &app)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Watch History Detail"));
        assert!(text.contains("notify-slack"));
        assert!(text.contains("\"foo\": 1"));
    }
}
