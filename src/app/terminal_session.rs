use std::io::{self, Stdout};

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode, enable_raw_mode,
};
use ratatui::Frame;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Size;
use tracing::debug;

use crate::error::AppResult;

/// Drawing target for the shell. Tests substitute a `TestBackend` terminal.
pub(crate) trait TerminalSurface {
    fn size(&self) -> io::Result<Size>;

    fn clear(&mut self) -> io::Result<()>;

    fn draw<F>(&mut self, render: F) -> io::Result<()>
    where
        F: FnOnce(&mut Frame<'_>);

    /// Mirrors the document title into the window title.
    fn set_title(&mut self, title: &str) -> io::Result<()>;
}

type CrosstermTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Raw-mode alternate screen owned by the shell. Restored on drop.
pub(crate) struct TerminalSession {
    terminal: CrosstermTerminal,
    title: Option<String>,
    active: bool,
}

impl TerminalSession {
    pub(crate) fn enter() -> AppResult<Self> {
        enable_raw_mode()?;
        if let Err(err) = execute!(io::stdout(), EnterAlternateScreen) {
            rollback_enter(None);
            return Err(err.into());
        }

        let mut terminal = match Terminal::new(CrosstermBackend::new(io::stdout())) {
            Ok(terminal) => terminal,
            Err(err) => {
                rollback_enter(None);
                return Err(err.into());
            }
        };
        if let Err(err) = terminal.clear().and_then(|()| terminal.hide_cursor()) {
            rollback_enter(Some(&mut terminal));
            return Err(err.into());
        }
        debug!("terminal session entered");

        Ok(Self {
            terminal,
            title: None,
            active: true,
        })
    }

    pub(crate) fn restore(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        debug!("terminal session restored");
        Ok(())
    }
}

impl TerminalSurface for TerminalSession {
    fn size(&self) -> io::Result<Size> {
        self.terminal.size()
    }

    fn clear(&mut self) -> io::Result<()> {
        self.terminal.clear()
    }

    fn draw<F>(&mut self, render: F) -> io::Result<()>
    where
        F: FnOnce(&mut Frame<'_>),
    {
        self.terminal.draw(render).map(|_| ())
    }

    fn set_title(&mut self, title: &str) -> io::Result<()> {
        if self.title.as_deref() == Some(title) {
            return Ok(());
        }
        execute!(self.terminal.backend_mut(), SetTitle(title))?;
        self.title = Some(title.to_string());
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

/// Undoes a partially entered session. Errors here are dropped.
fn rollback_enter(terminal: Option<&mut CrosstermTerminal>) {
    let _ = match terminal {
        Some(terminal) => execute!(terminal.backend_mut(), LeaveAlternateScreen),
        None => execute!(io::stdout(), LeaveAlternateScreen),
    };
    let _ = disable_raw_mode();
}
