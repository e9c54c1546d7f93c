//! Terminal host for the custom matrix editor
//!
//! Renders the editor's layout as key caps and forwards key presses to it.
//! Everything runs on one task: terminal events and the notice timer are
//! multiplexed with `tokio::select!`.

pub mod app;
pub mod matrix_view;
pub mod render;

pub use app::{App, InputMode, Move};

use std::io::stdout;
use std::time::{Duration, Instant};

use crossterm::{
    event::{Event, EventStream},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use futures::StreamExt;
use genie_matrix::CustomEditor;
use ratatui::prelude::*;
use tracing::{info, warn};

/// Restores the terminal on every exit path
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> std::io::Result<Self> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = disable_raw_mode() {
            warn!("Failed to leave raw mode: {}", e);
        }
        if let Err(e) = stdout().execute(LeaveAlternateScreen) {
            warn!("Failed to leave alternate screen: {}", e);
        }
    }
}

/// Run the editor until the user quits
pub async fn run(editor: CustomEditor) -> anyhow::Result<()> {
    let _guard = TerminalGuard::enter()?;
    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(editor);
    let mut events = EventStream::new();
    let tick_rate = Duration::from_millis(500);

    info!("Editor running");
    loop {
        terminal.draw(|f| render::render(f, &app))?;

        tokio::select! {
            event = events.next() => {
                match event {
                    Some(Ok(Event::Key(key))) => app.handle_key(key).await,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                    None => break,
                }
            }

            _ = tokio::time::sleep(tick_rate) => {
                app.expire_status(Instant::now());
            }
        }

        if app.should_quit {
            break;
        }
    }

    info!("Editor closed");
    Ok(())
}
