use crate::command::ActionId;
use crate::palette::PaletteKind;
use crate::router::{HistoryRow, PageId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Palette,
    /// The login/register form has focus.
    Login,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteRequest {
    Open {
        kind: PaletteKind,
        seed: Option<String>,
    },
    Close,
}

#[derive(Debug, Clone, Default)]
pub struct StatusState {
    pub message: String,
    pub last_action_id: Option<ActionId>,
}

/// Shell-side view of the session, refreshed after every command and portal event.
#[derive(Debug, Clone)]
pub struct AppState {
    pub mode: Mode,
    pub status: StatusState,
    pub current_page: PageId,
    pub fragment: Option<String>,
    pub history_rows: Vec<HistoryRow>,
    /// Cursor within the current page's selectable list.
    pub selection: usize,
    pub authenticated: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            mode: Mode::Normal,
            status: StatusState::default(),
            current_page: PageId::Home,
            fragment: None,
            history_rows: Vec::new(),
            selection: 0,
            authenticated: false,
        }
    }
}
