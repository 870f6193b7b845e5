#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaletteKind {
    Command,
    Search,
    History,
}

impl PaletteKind {
    pub const ALL: [Self; 3] = [Self::Command, Self::Search, Self::History];

    pub fn id(self) -> &'static str {
        match self {
            Self::Command => "command",
            Self::Search => "search",
            Self::History => "history",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == value)
    }
}
