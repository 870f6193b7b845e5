use crate::command::{Command, SearchScope};
use crate::error::AppResult;
use crate::palette::{
    PaletteCandidate, PaletteContext, PaletteInputMode, PaletteKind, PalettePayload,
    PaletteProvider, PaletteSubmitEffect,
};

/// Free-text query; the selected row picks the collaborator it is applied to.
#[derive(Debug, Default)]
pub struct SearchPaletteProvider;

impl PaletteProvider for SearchPaletteProvider {
    fn kind(&self) -> PaletteKind {
        PaletteKind::Search
    }

    fn title(&self, _ctx: &PaletteContext<'_>) -> String {
        "Search".to_string()
    }

    fn input_mode(&self) -> PaletteInputMode {
        PaletteInputMode::FreeText
    }

    fn list(&self, ctx: &PaletteContext<'_>) -> AppResult<Vec<PaletteCandidate>> {
        let preferred = SearchScope::for_page(ctx.app.current_page);
        let mut scopes = SearchScope::ALL.to_vec();
        if let Some(preferred) = preferred {
            scopes.retain(|scope| *scope != preferred);
            scopes.insert(0, preferred);
        }

        Ok(scopes
            .into_iter()
            .map(|scope| PaletteCandidate {
                id: scope.id().to_string(),
                label: format!("in {}", scope.page().label()),
                detail: Some(scope.page().fragment()),
                payload: PalettePayload::Scope(scope),
            })
            .collect())
    }

    fn on_submit(
        &self,
        ctx: &PaletteContext<'_>,
        selected: Option<&PaletteCandidate>,
    ) -> AppResult<PaletteSubmitEffect> {
        let query = ctx.input.trim();
        if query.is_empty() {
            return Ok(PaletteSubmitEffect::Reopen {
                kind: self.kind(),
                seed: None,
            });
        }

        let scope = selected.and_then(|candidate| match candidate.payload {
            PalettePayload::Scope(scope) => Some(scope),
            _ => None,
        });
        Ok(PaletteSubmitEffect::Dispatch(Command::SubmitSearch {
            query: query.to_string(),
            scope,
        }))
    }

    fn assistive_text(
        &self,
        _ctx: &PaletteContext<'_>,
        selected: Option<&PaletteCandidate>,
    ) -> Option<String> {
        let target = selected.map_or("library", |candidate| candidate.id.as_str());
        Some(format!("Enter: search {target}  Up/Down: change scope"))
    }
}

#[cfg(test)]
mod tests {
    use crate::app::AppState;
    use crate::command::{Command, SearchScope};
    use crate::palette::{PaletteContext, PaletteKind, PaletteProvider, PaletteSubmitEffect};
    use crate::router::PageId;

    use super::SearchPaletteProvider;

    #[test]
    fn current_searchable_page_is_listed_first() {
        let app = AppState {
            current_page: PageId::Blog,
            ..AppState::default()
        };
        let ctx = PaletteContext {
            app: &app,
            kind: PaletteKind::Search,
            input: "",
        };
        let list = SearchPaletteProvider.list(&ctx).expect("scopes listed");
        assert_eq!(list.len(), 3);
        assert_eq!(list[0].id, "blog");
    }

    #[test]
    fn submit_dispatches_query_for_selected_scope() {
        let app = AppState::default();
        let ctx = PaletteContext {
            app: &app,
            kind: PaletteKind::Search,
            input: "  physics ",
        };
        let list = SearchPaletteProvider.list(&ctx).expect("scopes listed");
        let chat = list.iter().find(|candidate| candidate.id == "chat");

        assert_eq!(
            SearchPaletteProvider.on_submit(&ctx, chat).expect("submit"),
            PaletteSubmitEffect::Dispatch(Command::SubmitSearch {
                query: "physics".to_string(),
                scope: Some(SearchScope::Chat),
            })
        );
    }

    #[test]
    fn blank_query_keeps_palette_open() {
        let app = AppState::default();
        let ctx = PaletteContext {
            app: &app,
            kind: PaletteKind::Search,
            input: "   ",
        };
        assert_eq!(
            SearchPaletteProvider.on_submit(&ctx, None).expect("submit"),
            PaletteSubmitEffect::Reopen {
                kind: PaletteKind::Search,
                seed: None,
            }
        );
    }
}
