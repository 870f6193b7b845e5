mod core;
mod dispatch;
mod parse;
mod spec;
mod types;

pub(crate) use core::sync_app_state;
pub use dispatch::{CommandDispatchResult, dispatch, drain_portal_effects};
pub use parse::parse_command_text;
pub use spec::{all_command_specs, command_registry};
pub use types::{ActionId, ArgKind, ArgSpec, Command, CommandOutcome, CommandSpec, SearchScope};
