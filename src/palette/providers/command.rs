use crate::command::{ArgSpec, CommandSpec, command_registry, parse_command_text};
use crate::error::AppResult;
use crate::palette::{
    PaletteCandidate, PaletteContext, PaletteInputMode, PaletteKind, PalettePayload,
    PaletteProvider, PaletteSubmitEffect, PaletteTabEffect,
};

const DEFAULT_HINT: &str = "Enter: run  Tab: complete";

#[derive(Debug, Default)]
pub struct CommandPaletteProvider;

impl PaletteProvider for CommandPaletteProvider {
    fn kind(&self) -> PaletteKind {
        PaletteKind::Command
    }

    fn title(&self, _ctx: &PaletteContext<'_>) -> String {
        "Command".to_string()
    }

    fn input_mode(&self) -> PaletteInputMode {
        PaletteInputMode::Custom
    }

    fn list(&self, ctx: &PaletteContext<'_>) -> AppResult<Vec<PaletteCandidate>> {
        if has_argument_phase(ctx.input) {
            return Ok(Vec::new());
        }

        let mut candidates = command_registry()
            .iter()
            .filter(|spec| is_available(spec.id, ctx))
            .map(|spec| PaletteCandidate {
                id: spec.id.to_string(),
                label: spec.id.to_string(),
                detail: Some(format_detail(spec)),
                payload: PalettePayload::CommandId(spec.id),
            })
            .collect::<Vec<_>>();
        rank_command_candidates(ctx.input, &mut candidates);
        Ok(candidates)
    }

    fn on_submit(
        &self,
        ctx: &PaletteContext<'_>,
        selected: Option<&PaletteCandidate>,
    ) -> AppResult<PaletteSubmitEffect> {
        let input = ctx.input.trim();

        if !input.is_empty()
            && let Ok(command) = parse_command_text(input)
        {
            return Ok(PaletteSubmitEffect::Dispatch(command));
        }

        if let Some(spec) = selected_spec(selected) {
            if spec.args.iter().any(|arg| arg.required) {
                return Ok(PaletteSubmitEffect::Reopen {
                    kind: self.kind(),
                    seed: Some(format!("{} ", spec.id)),
                });
            }
            if let Ok(command) = parse_command_text(spec.id) {
                return Ok(PaletteSubmitEffect::Dispatch(command));
            }
        }

        Ok(PaletteSubmitEffect::Reopen {
            kind: self.kind(),
            seed: Some(ctx.input.to_string()),
        })
    }

    fn on_tab(
        &self,
        _ctx: &PaletteContext<'_>,
        selected: Option<&PaletteCandidate>,
    ) -> AppResult<PaletteTabEffect> {
        let Some(spec) = selected_spec(selected) else {
            return Ok(PaletteTabEffect::Noop);
        };
        let value = if spec.args.is_empty() {
            spec.id.to_string()
        } else {
            format!("{} ", spec.id)
        };
        Ok(PaletteTabEffect::SetInput(value))
    }

    fn assistive_text(
        &self,
        ctx: &PaletteContext<'_>,
        _selected: Option<&PaletteCandidate>,
    ) -> Option<String> {
        let trimmed = ctx.input.trim();
        let spec = find_spec(first_token(trimmed));
        Some(match spec {
            Some(spec) if !trimmed.is_empty() => usage_line(&spec),
            _ => DEFAULT_HINT.to_string(),
        })
    }
}

fn selected_spec(selected: Option<&PaletteCandidate>) -> Option<CommandSpec> {
    match selected?.payload {
        PalettePayload::CommandId(id) => find_spec(id),
        _ => None,
    }
}

fn usage_line(spec: &CommandSpec) -> String {
    let usage = usage_text(spec.args);
    if usage.is_empty() {
        format!("{} | {}", spec.id, spec.title)
    } else {
        format!("{} {usage} | {}", spec.id, spec.title)
    }
}

fn format_detail(spec: &CommandSpec) -> String {
    let usage = usage_text(spec.args);
    if usage.is_empty() {
        format!("| {}", spec.title)
    } else {
        format!("{usage} | {}", spec.title)
    }
}

fn usage_text(args: &[ArgSpec]) -> String {
    args.iter()
        .map(|arg| {
            if arg.required {
                format!("<{}>", arg.name)
            } else {
                format!("[{}]", arg.name)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn has_argument_phase(input: &str) -> bool {
    input.trim_start().contains(char::is_whitespace)
}

fn first_token(input: &str) -> &str {
    input.split_whitespace().next().unwrap_or("")
}

fn find_spec(id: &str) -> Option<CommandSpec> {
    command_registry().iter().find(|spec| spec.id == id).copied()
}

/// Session-dependent commands are listed only when they can do something.
fn is_available(id: &str, ctx: &PaletteContext<'_>) -> bool {
    match id {
        "login" => !ctx.app.authenticated,
        "logout" => ctx.app.authenticated,
        "close-palette" => false,
        _ => true,
    }
}

const SCORE_ID_EXACT: i32 = 10_000;
const SCORE_ID_PREFIX: i32 = 9_000;
const SCORE_ID_TOKEN_PREFIX: i32 = 8_000;
const SCORE_ID_ACRONYM: i32 = 7_000;
const SCORE_ID_CONTAINS: i32 = 6_000;
const SCORE_ID_SUBSEQUENCE: i32 = 5_000;
const SCORE_TITLE_PREFIX: i32 = 800;
const SCORE_TITLE_CONTAINS: i32 = 700;

fn rank_command_candidates(input: &str, candidates: &mut Vec<PaletteCandidate>) {
    let query = input.trim().to_ascii_lowercase();
    if query.is_empty() {
        return;
    }

    let mut scored = candidates
        .drain(..)
        .filter_map(|candidate| {
            let score = score_id(&query, &candidate.id).max(score_title(&query, &candidate));
            (score > 0).then_some((score, candidate))
        })
        .collect::<Vec<_>>();

    scored.sort_by(|(left_score, left), (right_score, right)| {
        right_score
            .cmp(left_score)
            .then_with(|| left.id.len().cmp(&right.id.len()))
            .then_with(|| left.id.cmp(&right.id))
    });

    *candidates = scored.into_iter().map(|(_, candidate)| candidate).collect();
}

fn score_id(query: &str, id: &str) -> i32 {
    if id == query {
        SCORE_ID_EXACT
    } else if id.starts_with(query) {
        SCORE_ID_PREFIX
    } else if id.split('-').any(|token| token.starts_with(query)) {
        SCORE_ID_TOKEN_PREFIX
    } else if acronym(id).starts_with(query) {
        SCORE_ID_ACRONYM
    } else if id.contains(query) {
        SCORE_ID_CONTAINS
    } else if is_subsequence(query, id) {
        SCORE_ID_SUBSEQUENCE
    } else {
        0
    }
}

fn score_title(query: &str, candidate: &PaletteCandidate) -> i32 {
    let title = candidate
        .detail
        .as_deref()
        .and_then(|detail| detail.split_once('|'))
        .map(|(_, title)| title.trim().to_ascii_lowercase())
        .unwrap_or_default();
    if title.is_empty() {
        0
    } else if title.starts_with(query) {
        SCORE_TITLE_PREFIX
    } else if title.contains(query) {
        SCORE_TITLE_CONTAINS
    } else {
        0
    }
}

fn acronym(id: &str) -> String {
    id.split('-').filter_map(|token| token.chars().next()).collect()
}

fn is_subsequence(query: &str, text: &str) -> bool {
    let mut remaining = text.chars();
    query
        .chars()
        .all(|wanted| remaining.by_ref().any(|ch| ch == wanted))
}
