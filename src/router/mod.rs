mod controller;
mod history;
mod lifecycle;
mod page;
mod views;

pub use controller::{NavOutcome, Router, RouterSettings};
pub use history::{DEFAULT_HISTORY_CAPACITY, HistoryEntry, HistoryRow, PopState, SessionHistory};
pub use lifecycle::{AuthGate, InitializerRegistry, PageInitializer};
pub use page::PageId;
pub use views::{DocumentChrome, ViewRegistry, ViewSlot};
