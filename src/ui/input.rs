//! Key handling: each control invokes exactly one controller operation

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, warn};

use crate::{error::ChainError, state::ChainController};

/// What the keyboard is currently editing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    EditTitle { index: usize, buffer: String },
    EditDuration { index: usize, buffer: String },
}

/// UI-only state: selection, edit buffer and the status line
#[derive(Debug, Clone)]
pub struct App {
    pub selected: usize,
    pub mode: InputMode,
    pub status: Option<String>,
    /// Most recent control and when it happened, e.g. "reset at 14:02:11"
    pub last_action: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new() -> Self {
        Self {
            selected: 0,
            mode: InputMode::Normal,
            status: None,
            last_action: None,
            should_quit: false,
        }
    }

    /// Keep the selection on an existing row
    pub fn clamp_selection(&mut self, len: usize) {
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    pub fn handle_key(&mut self, key: KeyEvent, controller: &ChainController) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }
        match self.mode {
            InputMode::Normal => self.handle_normal(key, controller),
            _ => self.handle_edit(key, controller),
        }
    }

    fn handle_normal(&mut self, key: KeyEvent, controller: &ChainController) {
        let len = controller.snapshot().map(|s| s.len()).unwrap_or(0);
        self.clamp_selection(len);
        self.status = None;

        let result = match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                Ok(())
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = (self.selected + 1).min(len.saturating_sub(1));
                Ok(())
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
                Ok(())
            }
            KeyCode::Char('a') => controller.add_timer().map(|index| {
                self.selected = index;
            }),
            KeyCode::Char('d') | KeyCode::Delete => controller.remove_timer(self.selected),
            KeyCode::Char(' ') => controller.toggle_running().map(|_| ()),
            KeyCode::Char('s') => controller.start_from(self.selected),
            KeyCode::Char('r') => controller.reset(),
            KeyCode::Char('e') | KeyCode::Enter => self.begin_edit(controller, false),
            KeyCode::Char('t') => self.begin_edit(controller, true),
            _ => Ok(()),
        };

        if let Err(e) = result {
            self.report(e);
        }
    }

    fn begin_edit(
        &mut self,
        controller: &ChainController,
        duration: bool,
    ) -> Result<(), ChainError> {
        let state = controller.snapshot()?;
        let timer = state.timers.get(self.selected).ok_or(ChainError::IndexOutOfRange {
            index: self.selected,
            len: state.len(),
        })?;
        let index = self.selected;
        self.mode = if duration {
            InputMode::EditDuration { index, buffer: timer.duration.to_string() }
        } else {
            InputMode::EditTitle { index, buffer: timer.title.clone() }
        };
        Ok(())
    }

    fn handle_edit(&mut self, key: KeyEvent, controller: &ChainController) {
        let buffer = match &mut self.mode {
            InputMode::EditTitle { buffer, .. } | InputMode::EditDuration { buffer, .. } => buffer,
            InputMode::Normal => return,
        };

        match key.code {
            KeyCode::Char(c) => buffer.push(c),
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Esc => {
                debug!("Edit cancelled");
                self.mode = InputMode::Normal;
            }
            KeyCode::Enter => {
                let mode = std::mem::replace(&mut self.mode, InputMode::Normal);
                let result = match mode {
                    InputMode::EditTitle { index, buffer } => {
                        controller.update_title(index, &buffer)
                    }
                    InputMode::EditDuration { index, buffer } => {
                        controller.set_duration_input(index, &buffer).map(|_| ())
                    }
                    InputMode::Normal => Ok(()),
                };
                if let Err(e) = result {
                    self.report(e);
                }
            }
            _ => {}
        }
    }

    fn report(&mut self, error: ChainError) {
        warn!("Control rejected: {}", error);
        self.status = Some(error.to_string());
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use super::*;
    use crate::{
        services::SilentCue,
        state::{ChainState, TimerRecord},
    };

    fn press(app: &mut App, controller: &ChainController, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE), controller);
    }

    fn type_text(app: &mut App, controller: &ChainController, text: &str) {
        for c in text.chars() {
            press(app, controller, KeyCode::Char(c));
        }
    }

    fn controller() -> ChainController {
        ChainController::new(
            ChainState::new(vec![TimerRecord::new("A", 5), TimerRecord::new("B", 3)]),
            Arc::new(SilentCue),
            Duration::from_millis(100),
        )
    }

    #[test]
    fn add_selects_new_timer() {
        let controller = controller();
        let mut app = App::new();
        press(&mut app, &controller, KeyCode::Char('a'));
        assert_eq!(app.selected, 2);
        assert_eq!(controller.snapshot().unwrap().timers[2].title, "Timer 3");
    }

    #[test]
    fn start_from_selected_and_toggle() {
        let controller = controller();
        let mut app = App::new();
        press(&mut app, &controller, KeyCode::Down);
        press(&mut app, &controller, KeyCode::Char('s'));
        let state = controller.snapshot().unwrap();
        assert_eq!(state.active_index, 1);
        assert!(state.is_running);

        press(&mut app, &controller, KeyCode::Char(' '));
        assert!(!controller.snapshot().unwrap().is_running);
    }

    #[test]
    fn edit_title_commits_on_enter() {
        let controller = controller();
        let mut app = App::new();
        press(&mut app, &controller, KeyCode::Char('e'));
        press(&mut app, &controller, KeyCode::Backspace);
        type_text(&mut app, &controller, "Plank");
        assert_eq!(controller.snapshot().unwrap().timers[0].title, "A");
        press(&mut app, &controller, KeyCode::Enter);
        assert_eq!(controller.snapshot().unwrap().timers[0].title, "Plank");
        assert_eq!(app.mode, InputMode::Normal);
    }

    #[test]
    fn rejected_duration_reports_and_keeps_stage() {
        let controller = controller();
        let mut app = App::new();
        press(&mut app, &controller, KeyCode::Char('t'));
        type_text(&mut app, &controller, "x");
        press(&mut app, &controller, KeyCode::Enter);
        assert_eq!(controller.snapshot().unwrap().timers[0].duration, 5);
        assert!(app.status.as_deref().unwrap_or_default().contains("Invalid duration"));

        press(&mut app, &controller, KeyCode::Char('t'));
        press(&mut app, &controller, KeyCode::Backspace);
        type_text(&mut app, &controller, "2m");
        press(&mut app, &controller, KeyCode::Enter);
        let timer = &controller.snapshot().unwrap().timers[0];
        assert_eq!((timer.duration, timer.remaining), (120, 120));
    }

    #[test]
    fn escape_cancels_edit_then_quits() {
        let controller = controller();
        let mut app = App::new();
        press(&mut app, &controller, KeyCode::Char('e'));
        type_text(&mut app, &controller, "zzz");
        press(&mut app, &controller, KeyCode::Esc);
        assert_eq!(app.mode, InputMode::Normal);
        assert!(!app.should_quit);
        assert_eq!(controller.snapshot().unwrap().timers[0].title, "A");

        press(&mut app, &controller, KeyCode::Esc);
        assert!(app.should_quit);
    }

    #[test]
    fn remove_on_empty_chain_is_reported() {
        let controller = controller();
        let mut app = App::new();
        press(&mut app, &controller, KeyCode::Char('d'));
        press(&mut app, &controller, KeyCode::Char('d'));
        assert!(controller.snapshot().unwrap().is_empty());
        press(&mut app, &controller, KeyCode::Char('d'));
        assert!(app.status.is_some());
    }
}
