use std::convert::Infallible;
use std::io;

use ratatui::Frame;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::{Rect, Size};
use ratatui::widgets::Paragraph;

use super::super::terminal_session::TerminalSurface;
use super::test_app;
use crate::command::Command;
use crate::config::Config;

struct TestTerminalSurface {
    terminal: Terminal<TestBackend>,
    title: Option<String>,
}

impl TestTerminalSurface {
    fn new(width: u16, height: u16) -> io::Result<Self> {
        let terminal = infallible_to_io(Terminal::new(TestBackend::new(width, height)))?;
        Ok(Self {
            terminal,
            title: None,
        })
    }

    fn screen_text(&self) -> String {
        let buffer = self.terminal.backend().buffer();
        let width = usize::from(buffer.area.width);
        buffer
            .content
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl TerminalSurface for TestTerminalSurface {
    fn size(&self) -> io::Result<Size> {
        infallible_to_io(self.terminal.size())
    }

    fn clear(&mut self) -> io::Result<()> {
        infallible_to_io(self.terminal.clear())
    }

    fn draw<F>(&mut self, render: F) -> io::Result<()>
    where
        F: FnOnce(&mut Frame<'_>),
    {
        infallible_to_io(self.terminal.draw(render)).map(|_| ())
    }

    fn set_title(&mut self, title: &str) -> io::Result<()> {
        self.title = Some(title.to_string());
        Ok(())
    }
}

fn infallible_to_io<T>(result: Result<T, Infallible>) -> io::Result<T> {
    match result {
        Ok(value) => Ok(value),
        Err(err) => match err {},
    }
}

#[test]
fn terminal_surface_supports_size_clear_and_draw() {
    let mut session = TestTerminalSurface::new(80, 24).expect("test terminal should initialize");
    let size = session.size().expect("size should resolve");
    assert_eq!(size, Size::new(80, 24));

    session.clear().expect("clear should succeed");
    session
        .draw(|frame| {
            frame.render_widget(Paragraph::new("ok"), Rect::new(0, 0, 2, 1));
        })
        .expect("draw should succeed");
}

#[test]
fn render_frame_shows_nav_status_and_page() {
    let (mut app, _) = test_app(Config::default(), Some("#library"));
    app.start();

    let mut session = TestTerminalSurface::new(160, 30).expect("test terminal should initialize");
    app.render_frame(&mut session).expect("frame should render");

    let text = session.screen_text();
    assert!(text.contains("BiTS Connect"));
    assert!(text.contains("NORMAL"));
    assert!(text.contains("#library"));
    assert!(text.contains("guest"));
    assert_eq!(
        session.title.as_deref(),
        Some("Digital Library - BiTS Connect")
    );
}

#[test]
fn login_overlay_renders_only_in_login_mode() {
    let (mut app, _) = test_app(Config::default(), None);
    app.start();

    let mut session = TestTerminalSurface::new(160, 30).expect("test terminal should initialize");
    app.render_frame(&mut session).expect("frame should render");
    assert!(!session.screen_text().contains("LOGIN"));

    app.execute(Command::Login);
    app.render_frame(&mut session).expect("frame should render");
    let text = session.screen_text();
    assert!(text.contains("LOGIN"));
    assert!(text.contains("Email"));
}
