use crate::command::Command;
use crate::error::AppResult;
use crate::palette::{
    PaletteCandidate, PaletteContext, PaletteInputMode, PaletteKind, PalettePayload,
    PaletteProvider, PaletteSubmitEffect,
};
use crate::router::HistoryRow;

/// Session history, newest first. Enter traverses to the selected entry.
#[derive(Debug, Default)]
pub struct HistoryPaletteProvider;

impl PaletteProvider for HistoryPaletteProvider {
    fn kind(&self) -> PaletteKind {
        PaletteKind::History
    }

    fn title(&self, ctx: &PaletteContext<'_>) -> String {
        format!("History ({})", ctx.app.history_rows.len())
    }

    fn input_mode(&self) -> PaletteInputMode {
        PaletteInputMode::FilterCandidates
    }

    fn list(&self, ctx: &PaletteContext<'_>) -> AppResult<Vec<PaletteCandidate>> {
        Ok(ctx.app.history_rows.iter().map(row_candidate).collect())
    }

    fn on_submit(
        &self,
        _ctx: &PaletteContext<'_>,
        selected: Option<&PaletteCandidate>,
    ) -> AppResult<PaletteSubmitEffect> {
        match selected.map(|candidate| &candidate.payload) {
            Some(PalettePayload::HistoryDelta(delta)) if *delta != 0 => {
                Ok(PaletteSubmitEffect::Dispatch(Command::HistoryGo { delta: *delta }))
            }
            _ => Ok(PaletteSubmitEffect::Close),
        }
    }

    fn assistive_text(
        &self,
        _ctx: &PaletteContext<'_>,
        selected: Option<&PaletteCandidate>,
    ) -> Option<String> {
        match selected.map(|candidate| &candidate.payload) {
            Some(PalettePayload::HistoryDelta(0)) => Some("current entry".to_string()),
            Some(PalettePayload::HistoryDelta(delta)) if *delta < 0 => {
                Some(format!("Enter: go back {}", delta.unsigned_abs()))
            }
            Some(PalettePayload::HistoryDelta(delta)) => Some(format!("Enter: go forward {delta}")),
            _ => None,
        }
    }

    fn initial_input(&self, _seed: Option<&str>) -> String {
        String::new()
    }
}

fn row_candidate(row: &HistoryRow) -> PaletteCandidate {
    let marker = if row.offset == 0 { "> " } else { "  " };
    let location = row
        .fragment
        .clone()
        .unwrap_or_else(|| "(initial)".to_string());
    let detail = row.page.map_or("unrouted entry", |page| page.title());
    PaletteCandidate {
        id: row.offset.to_string(),
        label: format!("{marker}{location}"),
        detail: Some(format!("{:+} {detail}", row.offset)),
        payload: PalettePayload::HistoryDelta(row.offset),
    }
}
