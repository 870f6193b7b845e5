use crate::palette::PaletteKind;
use crate::portal::auth::AuthSubmission;
use crate::portal::gpa::Grade;
use crate::router::PageId;

/// Collaborator a submitted search applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchScope {
    Library,
    Blog,
    Chat,
}

impl SearchScope {
    pub const ALL: [Self; 3] = [Self::Library, Self::Blog, Self::Chat];

    pub fn id(self) -> &'static str {
        match self {
            Self::Library => "library",
            Self::Blog => "blog",
            Self::Chat => "chat",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "library" => Some(Self::Library),
            "blog" => Some(Self::Blog),
            "chat" => Some(Self::Chat),
            _ => None,
        }
    }

    pub fn page(self) -> PageId {
        match self {
            Self::Library => PageId::Library,
            Self::Blog => PageId::Blog,
            Self::Chat => PageId::Chat,
        }
    }

    pub fn for_page(page: PageId) -> Option<Self> {
        Self::ALL.into_iter().find(|scope| scope.page() == page)
    }
}

/// Text arguments use 1-based positions; `index` fields here are 0-based.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Goto {
        name: String,
    },
    HistoryBack,
    HistoryForward,
    HistoryGo {
        delta: isize,
    },
    OpenHistory,
    OpenSearch,
    SubmitSearch {
        query: String,
        scope: Option<SearchScope>,
    },
    ClearSearch,
    FilterDepartment {
        department: String,
    },
    FilterCategory {
        category: String,
    },
    Login,
    Logout,
    SubmitAuth(AuthSubmission),
    ThemeToggle,
    MenuToggle,
    AddCourse {
        name: Option<String>,
    },
    RenameCourse {
        index: usize,
        name: String,
    },
    SetCredits {
        index: usize,
        credits: u8,
    },
    SetGrade {
        index: usize,
        grade: Grade,
    },
    RemoveCourse {
        index: usize,
    },
    SemesterName {
        name: String,
    },
    SaveSemester,
    ExportGpa,
    ViewResource {
        id: u32,
    },
    DownloadResource {
        id: u32,
    },
    Bookmark {
        id: u32,
    },
    UploadFile {
        path: String,
    },
    ConvertUrl {
        url: String,
    },
    RemoveFile {
        index: usize,
    },
    PreviewFile {
        index: usize,
    },
    DownloadFile {
        index: usize,
    },
    OpenChat {
        id: u32,
    },
    Send {
        message: String,
    },
    DownloadRecent {
        id: u32,
    },
    SelectNext,
    SelectPrev,
    Activate,
    OpenPalette {
        kind: PaletteKind,
        seed: Option<String>,
    },
    ClosePalette,
    Cancel,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionId {
    Goto,
    HistoryBack,
    HistoryForward,
    HistoryGo,
    History,
    Search,
    SubmitSearch,
    ClearSearch,
    FilterDepartment,
    FilterCategory,
    Login,
    Logout,
    SubmitAuth,
    ThemeToggle,
    MenuToggle,
    AddCourse,
    RenameCourse,
    SetCredits,
    SetGrade,
    RemoveCourse,
    SemesterName,
    SaveSemester,
    ExportGpa,
    ViewResource,
    DownloadResource,
    Bookmark,
    UploadFile,
    ConvertUrl,
    RemoveFile,
    PreviewFile,
    DownloadFile,
    OpenChat,
    Send,
    DownloadRecent,
    SelectNext,
    SelectPrev,
    Activate,
    OpenPalette,
    ClosePalette,
    Cancel,
    Quit,
    Input,
    Portal,
}

impl ActionId {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Goto => "goto",
            Self::HistoryBack => "history-back",
            Self::HistoryForward => "history-forward",
            Self::HistoryGo => "history-go",
            Self::History => "history",
            Self::Search => "search",
            Self::SubmitSearch => "submit-search",
            Self::ClearSearch => "clear-search",
            Self::FilterDepartment => "filter-department",
            Self::FilterCategory => "filter-category",
            Self::Login => "login",
            Self::Logout => "logout",
            Self::SubmitAuth => "submit-auth",
            Self::ThemeToggle => "theme-toggle",
            Self::MenuToggle => "menu-toggle",
            Self::AddCourse => "add-course",
            Self::RenameCourse => "rename-course",
            Self::SetCredits => "set-credits",
            Self::SetGrade => "set-grade",
            Self::RemoveCourse => "remove-course",
            Self::SemesterName => "semester-name",
            Self::SaveSemester => "save-semester",
            Self::ExportGpa => "export-gpa",
            Self::ViewResource => "view-resource",
            Self::DownloadResource => "download-resource",
            Self::Bookmark => "bookmark",
            Self::UploadFile => "upload-file",
            Self::ConvertUrl => "convert-url",
            Self::RemoveFile => "remove-file",
            Self::PreviewFile => "preview-file",
            Self::DownloadFile => "download-file",
            Self::OpenChat => "open-chat",
            Self::Send => "send",
            Self::DownloadRecent => "download-recent",
            Self::SelectNext => "select-next",
            Self::SelectPrev => "select-prev",
            Self::Activate => "activate",
            Self::OpenPalette => "open-palette",
            Self::ClosePalette => "close-palette",
            Self::Cancel => "cancel",
            Self::Quit => "quit",
            Self::Input => "input",
            Self::Portal => "portal",
        }
    }
}

impl Command {
    pub fn action_id(&self) -> ActionId {
        match self {
            Self::Goto { .. } => ActionId::Goto,
            Self::HistoryBack => ActionId::HistoryBack,
            Self::HistoryForward => ActionId::HistoryForward,
            Self::HistoryGo { .. } => ActionId::HistoryGo,
            Self::OpenHistory => ActionId::History,
            Self::OpenSearch => ActionId::Search,
            Self::SubmitSearch { .. } => ActionId::SubmitSearch,
            Self::ClearSearch => ActionId::ClearSearch,
            Self::FilterDepartment { .. } => ActionId::FilterDepartment,
            Self::FilterCategory { .. } => ActionId::FilterCategory,
            Self::Login => ActionId::Login,
            Self::Logout => ActionId::Logout,
            Self::SubmitAuth(_) => ActionId::SubmitAuth,
            Self::ThemeToggle => ActionId::ThemeToggle,
            Self::MenuToggle => ActionId::MenuToggle,
            Self::AddCourse { .. } => ActionId::AddCourse,
            Self::RenameCourse { .. } => ActionId::RenameCourse,
            Self::SetCredits { .. } => ActionId::SetCredits,
            Self::SetGrade { .. } => ActionId::SetGrade,
            Self::RemoveCourse { .. } => ActionId::RemoveCourse,
            Self::SemesterName { .. } => ActionId::SemesterName,
            Self::SaveSemester => ActionId::SaveSemester,
            Self::ExportGpa => ActionId::ExportGpa,
            Self::ViewResource { .. } => ActionId::ViewResource,
            Self::DownloadResource { .. } => ActionId::DownloadResource,
            Self::Bookmark { .. } => ActionId::Bookmark,
            Self::UploadFile { .. } => ActionId::UploadFile,
            Self::ConvertUrl { .. } => ActionId::ConvertUrl,
            Self::RemoveFile { .. } => ActionId::RemoveFile,
            Self::PreviewFile { .. } => ActionId::PreviewFile,
            Self::DownloadFile { .. } => ActionId::DownloadFile,
            Self::OpenChat { .. } => ActionId::OpenChat,
            Self::Send { .. } => ActionId::Send,
            Self::DownloadRecent { .. } => ActionId::DownloadRecent,
            Self::SelectNext => ActionId::SelectNext,
            Self::SelectPrev => ActionId::SelectPrev,
            Self::Activate => ActionId::Activate,
            Self::OpenPalette { .. } => ActionId::OpenPalette,
            Self::ClosePalette => ActionId::ClosePalette,
            Self::Cancel => ActionId::Cancel,
            Self::Quit => ActionId::Quit,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::palette::PaletteKind;
    use crate::router::PageId;

    use super::{ActionId, Command, SearchScope};

    #[test]
    fn command_action_id_maps_navigation_variants() {
        assert_eq!(
            Command::Goto {
                name: "blog".to_string()
            }
            .action_id(),
            ActionId::Goto
        );
        assert_eq!(Command::HistoryGo { delta: -2 }.action_id(), ActionId::HistoryGo);
        assert_eq!(Command::OpenHistory.action_id(), ActionId::History);
        assert_eq!(
            Command::OpenPalette {
                kind: PaletteKind::Command,
                seed: None,
            }
            .action_id(),
            ActionId::OpenPalette
        );
        assert_eq!(ActionId::HistoryGo.as_str(), "history-go");
    }

    #[test]
    fn search_scope_maps_to_pages() {
        assert_eq!(SearchScope::for_page(PageId::Blog), Some(SearchScope::Blog));
        assert_eq!(SearchScope::for_page(PageId::Gpa), None);
        assert_eq!(SearchScope::parse("chat").map(SearchScope::page), Some(PageId::Chat));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    Integer,
    Page,
    String,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgSpec {
    pub name: &'static str,
    pub kind: ArgKind,
    pub required: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    pub id: &'static str,
    pub title: &'static str,
    pub args: &'static [ArgSpec],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Applied,
    Noop,
    QuitRequested,
}
