use super::providers::{CommandPaletteProvider, HistoryPaletteProvider, SearchPaletteProvider};
use super::{PaletteKind, PaletteProvider};

/// One provider per palette kind.
#[derive(Default)]
pub struct PaletteRegistry {
    command: CommandPaletteProvider,
    search: SearchPaletteProvider,
    history: HistoryPaletteProvider,
}

impl PaletteRegistry {
    pub fn get(&self, kind: PaletteKind) -> &dyn PaletteProvider {
        match kind {
            PaletteKind::Command => &self.command,
            PaletteKind::Search => &self.search,
            PaletteKind::History => &self.history,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::app::AppState;
    use crate::palette::{PaletteContext, PaletteKind};

    use super::PaletteRegistry;

    #[test]
    fn get_returns_provider_for_all_palette_kinds() {
        let registry = PaletteRegistry::default();
        let app = AppState::default();

        for kind in PaletteKind::ALL {
            let ctx = PaletteContext {
                app: &app,
                kind,
                input: "",
            };
            let provider = registry.get(kind);
            assert_eq!(provider.kind(), kind);
            assert!(!provider.title(&ctx).is_empty());
        }
    }
}
