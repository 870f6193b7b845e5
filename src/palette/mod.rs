//! Modal pickers over commands, search scopes and the session history.

mod kind;
mod manager;
mod matcher;
pub mod providers;
mod registry;
mod types;

pub use kind::PaletteKind;
pub use manager::PaletteManager;
pub use registry::PaletteRegistry;
pub use types::{
    PaletteCandidate, PaletteContext, PaletteInputMode, PaletteItemView, PaletteKeyResult,
    PalettePayload, PaletteProvider, PaletteSubmitEffect, PaletteTabEffect, PaletteView,
};
