use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use crate::app::AppState;
use crate::error::AppResult;

use super::kind::PaletteKind;
use super::matcher::{CandidateMatcher, ContainsMatcher};
use super::registry::PaletteRegistry;
use super::types::{
    PaletteCandidate, PaletteContext, PaletteInputMode, PaletteItemView, PaletteKeyResult,
    PaletteSubmitAction, PaletteTabEffect, PaletteView,
};

#[derive(Debug)]
struct PaletteSession {
    id: u64,
    kind: PaletteKind,
    title: String,
    input_mode: PaletteInputMode,
    input: Input,
    candidates: Vec<PaletteCandidate>,
    visible: Vec<usize>,
    selected: usize,
    assistive_text: Option<String>,
}

impl PaletteSession {
    fn context<'a>(&'a self, app: &'a AppState) -> PaletteContext<'a> {
        PaletteContext {
            app,
            kind: self.kind,
            input: self.input.value(),
        }
    }

    fn selected_candidate(&self) -> Option<&PaletteCandidate> {
        self.visible
            .get(self.selected)
            .and_then(|idx| self.candidates.get(*idx))
    }

    /// Moves the cursor by one row, wrapping at both ends.
    fn step(&mut self, forward: bool) {
        let len = self.visible.len();
        if len == 0 {
            self.selected = 0;
            return;
        }
        self.selected = if forward {
            (self.selected + 1) % len
        } else {
            (self.selected + len - 1) % len
        };
    }
}

/// Owns at most one open palette session and routes keys into it.
pub struct PaletteManager {
    next_session_id: u64,
    active: Option<PaletteSession>,
    matcher: Box<dyn CandidateMatcher>,
}

impl Default for PaletteManager {
    fn default() -> Self {
        Self {
            next_session_id: 1,
            active: None,
            matcher: Box::new(ContainsMatcher),
        }
    }
}

impl PaletteManager {
    pub fn open(
        &mut self,
        registry: &PaletteRegistry,
        app: &AppState,
        kind: PaletteKind,
        seed: Option<String>,
    ) -> AppResult<()> {
        let provider = registry.get(kind);
        let session = PaletteSession {
            id: self.take_session_id(),
            kind,
            input: Input::new(provider.initial_input(seed.as_deref())),
            title: String::new(),
            input_mode: provider.input_mode(),
            candidates: Vec::new(),
            visible: Vec::new(),
            selected: 0,
            assistive_text: None,
        };
        self.active = Some(session);
        self.refresh(registry, app)
    }

    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_kind(&self) -> Option<PaletteKind> {
        self.active.as_ref().map(|session| session.kind)
    }

    pub fn close(&mut self) -> bool {
        self.active.take().is_some()
    }

    pub fn close_if_matches(&mut self, session_id: u64) -> bool {
        if self
            .active
            .as_ref()
            .is_some_and(|session| session.id == session_id)
        {
            self.active = None;
            return true;
        }
        false
    }

    pub fn handle_key(
        &mut self,
        registry: &PaletteRegistry,
        app: &AppState,
        key: KeyEvent,
    ) -> AppResult<PaletteKeyResult> {
        let Some(session) = self.active.as_mut() else {
            return Ok(PaletteKeyResult::Consumed { redraw: false });
        };
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc => {
                return Ok(PaletteKeyResult::CloseRequested {
                    session_id: session.id,
                });
            }
            KeyCode::Up | KeyCode::BackTab => {
                session.step(false);
            }
            KeyCode::Down => {
                session.step(true);
            }
            KeyCode::Char('p') if ctrl => {
                session.step(false);
            }
            KeyCode::Char('n') if ctrl => {
                session.step(true);
            }
            KeyCode::Tab => {
                let provider = registry.get(session.kind);
                let effect = provider.on_tab(&session.context(app), session.selected_candidate())?;
                if let PaletteTabEffect::SetInput(value) = effect {
                    session.input = Input::new(value);
                }
                return self.refreshed(registry, app);
            }
            KeyCode::Enter => {
                let provider = registry.get(session.kind);
                let effect =
                    provider.on_submit(&session.context(app), session.selected_candidate())?;
                return Ok(PaletteKeyResult::Submit(PaletteSubmitAction {
                    session_id: session.id,
                    effect,
                }));
            }
            _ => {
                session.input.handle_event(&Event::Key(key));
                return self.refreshed(registry, app);
            }
        }

        // selection moved: only the assistive text depends on it
        let provider = registry.get(session.kind);
        session.assistive_text =
            provider.assistive_text(&session.context(app), session.selected_candidate());
        Ok(PaletteKeyResult::Consumed { redraw: true })
    }

    /// Rebuilds candidates after the input or the app state changed.
    pub fn refresh(&mut self, registry: &PaletteRegistry, app: &AppState) -> AppResult<()> {
        let Some(session) = self.active.as_mut() else {
            return Ok(());
        };
        let provider = registry.get(session.kind);
        let ctx = session.context(app);

        let title = provider.title(&ctx);
        let candidates = provider.list(&ctx)?;
        let visible = match session.input_mode {
            PaletteInputMode::FilterCandidates => self.matcher.select(ctx.input, &candidates),
            PaletteInputMode::FreeText | PaletteInputMode::Custom => {
                (0..candidates.len()).collect()
            }
        };

        session.title = title;
        session.candidates = candidates;
        session.visible = visible;
        session.selected = session.selected.min(session.visible.len().saturating_sub(1));
        session.assistive_text =
            provider.assistive_text(&session.context(app), session.selected_candidate());
        Ok(())
    }

    pub fn view(&self) -> Option<PaletteView> {
        let session = self.active.as_ref()?;
        let items = session
            .visible
            .iter()
            .enumerate()
            .filter_map(|(row, idx)| {
                session.candidates.get(*idx).map(|candidate| PaletteItemView {
                    label: candidate.label.clone(),
                    detail: candidate.detail.clone(),
                    selected: row == session.selected,
                })
            })
            .collect();
        Some(PaletteView {
            title: session.title.clone(),
            kind: session.kind,
            input: session.input.value().to_string(),
            cursor: session.input.visual_cursor(),
            assistive_text: session.assistive_text.clone(),
            selected_idx: session.selected,
            items,
        })
    }

    fn refreshed(&mut self, registry: &PaletteRegistry, app: &AppState) -> AppResult<PaletteKeyResult> {
        self.refresh(registry, app)?;
        Ok(PaletteKeyResult::Consumed { redraw: true })
    }

    fn take_session_id(&mut self) -> u64 {
        let id = self.next_session_id;
        self.next_session_id = self.next_session_id.saturating_add(1);
        id
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use super::PaletteManager;
    use crate::app::AppState;
    use crate::command::Command;
    use crate::palette::{PaletteKeyResult, PaletteKind, PaletteRegistry, PaletteSubmitEffect};
    use crate::router::{HistoryRow, PageId};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(manager: &mut PaletteManager, registry: &PaletteRegistry, app: &AppState, text: &str) {
        for ch in text.chars() {
            manager
                .handle_key(registry, app, key(KeyCode::Char(ch)))
                .expect("typing should succeed");
        }
    }

    #[test]
    fn typed_command_submits_dispatch() {
        let registry = PaletteRegistry::default();
        let app = AppState::default();
        let mut manager = PaletteManager::default();
        manager
            .open(&registry, &app, PaletteKind::Command, None)
            .expect("palette opens");
        type_text(&mut manager, &registry, &app, "goto blog");

        let result = manager
            .handle_key(&registry, &app, key(KeyCode::Enter))
            .expect("submit succeeds");
        let PaletteKeyResult::Submit(action) = result else {
            panic!("expected submit");
        };
        assert_eq!(
            action.effect,
            PaletteSubmitEffect::Dispatch(Command::Goto {
                name: "blog".to_string()
            })
        );
        assert!(manager.close_if_matches(action.session_id));
        assert!(!manager.is_open());
    }

    #[test]
    fn history_selection_wraps_and_tracks_rows() {
        let registry = PaletteRegistry::default();
        let mut app = AppState::default();
        app.history_rows = vec![
            HistoryRow {
                offset: 0,
                page: Some(PageId::Blog),
                fragment: Some("#blog".to_string()),
            },
            HistoryRow {
                offset: -1,
                page: Some(PageId::Library),
                fragment: Some("#library".to_string()),
            },
        ];
        let mut manager = PaletteManager::default();
        manager
            .open(&registry, &app, PaletteKind::History, None)
            .expect("palette opens");
        assert_eq!(manager.active_kind(), Some(PaletteKind::History));

        manager
            .handle_key(&registry, &app, key(KeyCode::Up))
            .expect("selection moves");
        let view = manager.view().expect("palette is open");
        assert_eq!(view.items.len(), 2);
        assert_eq!(view.selected_idx, 1);

        app.history_rows.truncate(1);
        manager.refresh(&registry, &app).expect("refresh succeeds");
        assert_eq!(manager.view().map(|view| view.selected_idx), Some(0));
    }

    #[test]
    fn escape_requests_close_of_current_session() {
        let registry = PaletteRegistry::default();
        let app = AppState::default();
        let mut manager = PaletteManager::default();
        manager
            .open(&registry, &app, PaletteKind::Search, Some("quantum".to_string()))
            .expect("palette opens");
        assert_eq!(manager.view().map(|view| view.input), Some("quantum".to_string()));

        let result = manager
            .handle_key(&registry, &app, key(KeyCode::Esc))
            .expect("escape handled");
        let PaletteKeyResult::CloseRequested { session_id } = result else {
            panic!("expected close request");
        };
        assert!(!manager.close_if_matches(session_id + 1));
        assert!(manager.close_if_matches(session_id));
    }
}
