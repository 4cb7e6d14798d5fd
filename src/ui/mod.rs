//! Terminal UI module
//!
//! The presentation layer: a view model recomputed from every broadcast
//! state, key handling mapped onto controller operations, and rendering.

pub mod input;
pub mod render;
pub mod view;

use std::{
    io::{self, Stdout},
    sync::Arc,
};
use chrono::Local;
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::stream::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info};

use crate::state::{ChainController, ChainState};
pub use input::{App, InputMode};
pub use view::{ChainView, StageRow};

/// Raw-mode alternate screen, restored on drop
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl Tui {
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

fn to_io(e: crate::error::ChainError) -> io::Error {
    io::Error::other(e.to_string())
}

/// Run the terminal UI until the user quits
pub async fn run_ui(controller: Arc<ChainController>) -> io::Result<()> {
    let mut tui = Tui::enter()?;
    info!("Terminal UI started");

    let mut app = App::new();
    let mut events = EventStream::new();
    let mut state_rx = controller.subscribe();
    let mut state: ChainState = controller.snapshot().map_err(to_io)?;

    loop {
        let view = ChainView::from(&state);
        app.clamp_selection(view.rows.len());
        app.last_action = match controller.get_last_action() {
            (Some(action), Some(at)) => Some(format!(
                "{} at {}",
                action,
                at.with_timezone(&Local).format("%H:%M:%S")
            )),
            _ => None,
        };
        tui.terminal.draw(|f| render::draw(f, &app, &view))?;

        tokio::select! {
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    app.handle_key(key, &controller);
                    if app.should_quit {
                        info!("Quit requested");
                        return Ok(());
                    }
                }
                // Resize and other events just redraw
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e),
                None => return Ok(()),
            },

            received = state_rx.recv() => match received {
                Ok(new_state) => state = new_state,
                Err(RecvError::Lagged(skipped)) => {
                    debug!("View lagged by {} updates", skipped);
                    state = controller.snapshot().map_err(to_io)?;
                }
                Err(RecvError::Closed) => return Ok(()),
            },
        }
    }
}
