use ratatui::style::{Color, Modifier, Style};

use crate::notify::ToastKind;
use crate::portal::theme::Theme;

/// Colors for the active theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeStyle {
    pub fg: Color,
    pub bg: Color,
    pub accent: Color,
    pub muted: Color,
    pub selected_bg: Color,
}

impl ThemeStyle {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                fg: Color::White,
                bg: Color::Reset,
                accent: Color::Cyan,
                muted: Color::DarkGray,
                selected_bg: Color::Rgb(45, 45, 50),
            },
            Theme::Light => Self {
                fg: Color::Black,
                bg: Color::Rgb(245, 245, 240),
                accent: Color::Blue,
                muted: Color::Gray,
                selected_bg: Color::Rgb(215, 220, 235),
            },
        }
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn accent(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn heading(&self) -> Style {
        self.accent().add_modifier(Modifier::BOLD)
    }

    pub fn selected(&self) -> Style {
        Style::default().bg(self.selected_bg)
    }

    pub fn toast(&self, kind: ToastKind) -> Style {
        let color = match kind {
            ToastKind::Success => Color::Green,
            ToastKind::Error => Color::Red,
            ToastKind::Warning => Color::Yellow,
            ToastKind::Info => self.accent,
        };
        Style::default().fg(color)
    }
}
