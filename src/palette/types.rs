use super::kind::PaletteKind;
use crate::app::AppState;
use crate::command::{Command, SearchScope};
use crate::error::AppResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteInputMode {
    /// The matcher narrows the candidate list as the user types.
    FilterCandidates,
    /// Input is free text; candidates act as options for it.
    FreeText,
    /// The provider ranks candidates itself.
    Custom,
}

/// Typed data a provider attaches to a candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PalettePayload {
    CommandId(&'static str),
    Scope(SearchScope),
    /// Relative offset into the session history.
    HistoryDelta(isize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteCandidate {
    pub id: String,
    pub label: String,
    pub detail: Option<String>,
    pub payload: PalettePayload,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaletteSubmitEffect {
    Close,
    Reopen {
        kind: PaletteKind,
        seed: Option<String>,
    },
    /// Closes the palette and runs the command.
    Dispatch(Command),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteTabEffect {
    Noop,
    SetInput(String),
}

pub struct PaletteContext<'a> {
    pub app: &'a AppState,
    pub kind: PaletteKind,
    pub input: &'a str,
}

pub trait PaletteProvider: Send + Sync {
    fn kind(&self) -> PaletteKind;
    fn title(&self, ctx: &PaletteContext<'_>) -> String;
    fn input_mode(&self) -> PaletteInputMode;
    fn list(&self, ctx: &PaletteContext<'_>) -> AppResult<Vec<PaletteCandidate>>;
    fn on_tab(
        &self,
        _ctx: &PaletteContext<'_>,
        _selected: Option<&PaletteCandidate>,
    ) -> AppResult<PaletteTabEffect> {
        Ok(PaletteTabEffect::Noop)
    }
    fn on_submit(
        &self,
        ctx: &PaletteContext<'_>,
        selected: Option<&PaletteCandidate>,
    ) -> AppResult<PaletteSubmitEffect>;
    fn assistive_text(
        &self,
        _ctx: &PaletteContext<'_>,
        _selected: Option<&PaletteCandidate>,
    ) -> Option<String> {
        None
    }
    /// Input text shown when the palette opens; defaults to the seed.
    fn initial_input(&self, seed: Option<&str>) -> String {
        seed.unwrap_or("").to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteItemView {
    pub label: String,
    pub detail: Option<String>,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteView {
    pub title: String,
    pub kind: PaletteKind,
    pub input: String,
    pub cursor: usize,
    pub assistive_text: Option<String>,
    pub items: Vec<PaletteItemView>,
    pub selected_idx: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaletteSubmitAction {
    pub session_id: u64,
    pub effect: PaletteSubmitEffect,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaletteKeyResult {
    Consumed { redraw: bool },
    CloseRequested { session_id: u64 },
    Submit(PaletteSubmitAction),
}
