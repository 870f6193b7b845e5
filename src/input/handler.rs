use crossterm::event::{Event, KeyEventKind};
use tracing::debug;

use crate::command::Command;
use crate::error::AppResult;

use crate::app::App;
use crate::app::terminal_session::TerminalSurface;

pub(crate) struct InputEventOutcome {
    pub(crate) quit_requested: bool,
    pub(crate) command: Option<Command>,
}

impl InputEventOutcome {
    fn idle() -> Self {
        Self {
            quit_requested: false,
            command: None,
        }
    }
}

impl App {
    pub(crate) fn handle_input_event(
        &mut self,
        event: Event,
        session: &mut impl TerminalSurface,
        needs_redraw: &mut bool,
    ) -> AppResult<InputEventOutcome> {
        match event {
            Event::Key(key) if matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) => {
                let outcome = self.interaction.handle_key_event(
                    &mut self.state,
                    key,
                    &self.config.keymap.preset,
                )?;
                if outcome.clear_terminal {
                    session.clear()?;
                }
                if outcome.redraw {
                    *needs_redraw = true;
                }
                Ok(InputEventOutcome {
                    quit_requested: outcome.quit_requested,
                    command: outcome.command,
                })
            }
            Event::Resize(_, _) => {
                let size = session.size()?;
                debug!(width = size.width, height = size.height, "terminal resized");
                session.clear()?;
                *needs_redraw = true;
                Ok(InputEventOutcome::idle())
            }
            _ => Ok(InputEventOutcome::idle()),
        }
    }
}
