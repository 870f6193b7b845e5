mod command;
mod history;
mod search;

pub use command::CommandPaletteProvider;
pub use history::HistoryPaletteProvider;
pub use search::SearchPaletteProvider;
