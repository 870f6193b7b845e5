use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::Mode;
use crate::command::Command;
use crate::palette::PaletteKind;
use crate::router::PageId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeymapPreset {
    Default,
    Emacs,
}

impl KeymapPreset {
    pub fn parse(value: &str) -> Self {
        match value {
            "default" => Self::Default,
            "emacs" => Self::Emacs,
            _ => Self::Default,
        }
    }
}

pub fn map_key_to_command(key: KeyEvent, mode: Mode) -> Option<Command> {
    map_key_to_command_with_preset(key, mode, KeymapPreset::Default)
}

/// Palette and login keys are handled by their own widgets; only normal mode maps here.
pub fn map_key_to_command_with_preset(
    key: KeyEvent,
    mode: Mode,
    preset: KeymapPreset,
) -> Option<Command> {
    match mode {
        Mode::Normal => match preset {
            KeymapPreset::Default => map_normal_mode_key_default(key),
            KeymapPreset::Emacs => map_normal_mode_key_emacs(key),
        },
        Mode::Palette | Mode::Login => None,
    }
}

fn palette(kind: PaletteKind) -> Command {
    Command::OpenPalette { kind, seed: None }
}

fn goto_digit(digit: char) -> Option<Command> {
    let index = digit.to_digit(10)?.checked_sub(1)? as usize;
    PageId::ALL.get(index).map(|page| Command::Goto {
        name: page.id().to_string(),
    })
}

fn map_normal_mode_key_default(key: KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('o') => Some(Command::HistoryBack),
            KeyCode::Char('i') => Some(Command::HistoryForward),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char(digit @ '1'..='7') => goto_digit(digit),
        KeyCode::Char(':') => Some(palette(PaletteKind::Command)),
        KeyCode::Char('/') => Some(Command::OpenSearch),
        KeyCode::Char('h') => Some(Command::OpenHistory),
        // most terminals report Ctrl-I as Tab
        KeyCode::Tab => Some(Command::HistoryForward),
        KeyCode::Char('j') | KeyCode::Down => Some(Command::SelectNext),
        KeyCode::Char('k') | KeyCode::Up => Some(Command::SelectPrev),
        KeyCode::Enter => Some(Command::Activate),
        KeyCode::Char('L') => Some(Command::Login),
        KeyCode::Char('t') => Some(Command::ThemeToggle),
        KeyCode::Char('m') => Some(Command::MenuToggle),
        KeyCode::Char('q') => Some(Command::Quit),
        KeyCode::Esc => Some(Command::Cancel),
        _ => None,
    }
}

fn map_normal_mode_key_emacs(key: KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::ALT) {
        return match key.code {
            KeyCode::Char('x') => Some(palette(PaletteKind::Command)),
            _ => None,
        };
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('n') => Some(Command::SelectNext),
            KeyCode::Char('p') => Some(Command::SelectPrev),
            KeyCode::Char('s') => Some(Command::OpenSearch),
            KeyCode::Char('g') => Some(Command::Cancel),
            KeyCode::Char('o') => Some(Command::HistoryBack),
            KeyCode::Char('i') => Some(Command::HistoryForward),
            KeyCode::Char('q') => Some(Command::Quit),
            _ => None,
        };
    }

    map_normal_mode_key_default(key)
}
