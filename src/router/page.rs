use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageId {
    Home,
    Library,
    Upload,
    Gpa,
    Chat,
    Blog,
    Dashboard,
}

impl PageId {
    /// Every known page, in navigation-bar order.
    pub const ALL: [PageId; 7] = [
        Self::Home,
        Self::Library,
        Self::Upload,
        Self::Gpa,
        Self::Chat,
        Self::Blog,
        Self::Dashboard,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Library => "library",
            Self::Upload => "upload",
            Self::Gpa => "gpa",
            Self::Chat => "chat",
            Self::Blog => "blog",
            Self::Dashboard => "dashboard",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "home" => Some(Self::Home),
            "library" => Some(Self::Library),
            "upload" => Some(Self::Upload),
            "gpa" => Some(Self::Gpa),
            "chat" => Some(Self::Chat),
            "blog" => Some(Self::Blog),
            "dashboard" => Some(Self::Dashboard),
            _ => None,
        }
    }

    /// Parses a fragment such as `#gpa`; the leading `#` is optional.
    pub fn from_fragment(fragment: &str) -> Option<Self> {
        let name = fragment.strip_prefix('#').unwrap_or(fragment);
        if name.is_empty() {
            return None;
        }
        Self::parse(name)
    }

    pub fn fragment(self) -> String {
        format!("#{}", self.id())
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Home => "BiTS Connect - Educational Platform",
            Self::Library => "Digital Library - BiTS Connect",
            Self::Upload => "Upload & Convert - BiTS Connect",
            Self::Gpa => "GPA Calculator - BiTS Connect",
            Self::Chat => "Student Chat - BiTS Connect",
            Self::Blog => "Tech Blog - BiTS Connect",
            Self::Dashboard => "Dashboard - BiTS Connect",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Library => "Library",
            Self::Upload => "Upload",
            Self::Gpa => "GPA",
            Self::Chat => "Chat",
            Self::Blog => "Blog",
            Self::Dashboard => "Dashboard",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::Home => 0,
            Self::Library => 1,
            Self::Upload => 2,
            Self::Gpa => 3,
            Self::Chat => 4,
            Self::Blog => 5,
            Self::Dashboard => 6,
        }
    }
}

impl std::fmt::Display for PageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::PageId;

    #[test]
    fn parse_roundtrips_every_page_id() {
        for page in PageId::ALL {
            assert_eq!(PageId::parse(page.id()), Some(page));
            assert_eq!(PageId::ALL[page.index()], page);
        }
        assert_eq!(PageId::parse("Library"), None);
        assert_eq!(PageId::parse("bogus"), None);
    }

    #[test]
    fn from_fragment_accepts_optional_hash() {
        assert_eq!(PageId::from_fragment("#gpa"), Some(PageId::Gpa));
        assert_eq!(PageId::from_fragment("chat"), Some(PageId::Chat));
        assert_eq!(PageId::from_fragment("#"), None);
        assert_eq!(PageId::from_fragment(""), None);
        assert_eq!(PageId::from_fragment("#bogus"), None);
    }

    #[test]
    fn serde_uses_lowercase_ids() {
        let json = serde_json::to_string(&PageId::Dashboard).expect("serialize");
        assert_eq!(json, "\"dashboard\"");
        let parsed: PageId = serde_json::from_str("\"blog\"").expect("deserialize");
        assert_eq!(parsed, PageId::Blog);
    }
}
