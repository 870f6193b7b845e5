use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::storage::{KeyValueStore, KeyValueStoreExt};

pub const BOOKMARKS_KEY: &str = "bookmarks";
pub const ALL: &str = "all";

pub const DEPARTMENTS: [(&str, &str); 5] = [
    ("computer-science", "Computer Science"),
    ("mathematics", "Mathematics"),
    ("physics", "Physics"),
    ("chemistry", "Chemistry"),
    ("biology", "Biology"),
];

pub const CATEGORIES: [&str; 2] = ["lectures", "videos"];

pub fn department_name(id: &str) -> &str {
    DEPARTMENTS
        .iter()
        .find(|(key, _)| *key == id)
        .map_or(id, |(_, name)| name)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub author: String,
    pub department: String,
    pub category: String,
    pub rating: f32,
    pub downloads: u32,
    pub file_type: &'static str,
    pub size: u64,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: u32,
    pub title: String,
    pub author: String,
    pub category: String,
    pub rating: f32,
    pub bookmarked_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryFilters {
    pub search: String,
    pub department: String,
    pub category: String,
}

impl Default for LibraryFilters {
    fn default() -> Self {
        Self {
            search: String::new(),
            department: ALL.to_string(),
            category: ALL.to_string(),
        }
    }
}

#[derive(Debug)]
pub struct Library {
    resources: Vec<Resource>,
    filters: LibraryFilters,
    visible: Vec<usize>,
    bookmarks: Vec<Bookmark>,
}

impl Library {
    pub fn restore(store: &dyn KeyValueStore, now: DateTime<Utc>) -> Self {
        let mut library = Self {
            resources: seed_resources(now),
            filters: LibraryFilters::default(),
            visible: Vec::new(),
            bookmarks: store.load(BOOKMARKS_KEY, Vec::new()),
        };
        library.apply_filters();
        library
    }

    pub fn filters(&self) -> &LibraryFilters {
        &self.filters
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.filters.search = term.into();
        self.apply_filters();
    }

    pub fn set_department(&mut self, department: &str) -> AppResult<()> {
        if department != ALL && !DEPARTMENTS.iter().any(|(id, _)| *id == department) {
            return Err(AppError::invalid_argument(format!(
                "unknown department: {department}"
            )));
        }
        self.filters.department = department.to_string();
        self.apply_filters();
        Ok(())
    }

    pub fn set_category(&mut self, category: &str) -> AppResult<()> {
        if category != ALL && !CATEGORIES.contains(&category) {
            return Err(AppError::invalid_argument(format!(
                "unknown category: {category}"
            )));
        }
        self.filters.category = category.to_string();
        self.apply_filters();
        Ok(())
    }

    pub fn apply_filters(&mut self) {
        let term = self.filters.search.trim().to_lowercase();
        let filters = &self.filters;
        self.visible = self
            .resources
            .iter()
            .enumerate()
            .filter(|(_, resource)| {
                let matches_search = term.is_empty()
                    || resource.title.to_lowercase().contains(&term)
                    || resource.description.to_lowercase().contains(&term)
                    || resource.author.to_lowercase().contains(&term);
                let matches_department =
                    filters.department == ALL || resource.department == filters.department;
                let matches_category =
                    filters.category == ALL || resource.category == filters.category;
                matches_search && matches_department && matches_category
            })
            .map(|(index, _)| index)
            .collect();
    }

    pub fn visible(&self) -> impl Iterator<Item = &Resource> {
        self.visible.iter().filter_map(|index| self.resources.get(*index))
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    pub fn visible_at(&self, position: usize) -> Option<&Resource> {
        self.visible
            .get(position)
            .and_then(|index| self.resources.get(*index))
    }

    pub fn resource(&self, id: u32) -> Option<&Resource> {
        self.resources.iter().find(|resource| resource.id == id)
    }

    pub fn bookmarks(&self) -> &[Bookmark] {
        &self.bookmarks
    }

    pub fn is_bookmarked(&self, id: u32) -> bool {
        self.bookmarks.iter().any(|bookmark| bookmark.id == id)
    }

    pub fn view(&self, id: u32) -> AppResult<String> {
        let resource = self.require(id)?;
        Ok(format!("Opening {}...", resource.title))
    }

    pub fn download(&mut self, id: u32) -> AppResult<String> {
        let resource = self
            .resources
            .iter_mut()
            .find(|resource| resource.id == id)
            .ok_or_else(|| unknown_resource(id))?;
        resource.downloads = resource.downloads.saturating_add(1);
        Ok(format!("Downloading {}...", resource.title))
    }

    /// Toggles the bookmark for `id` and persists the list. Returns the new state.
    pub fn toggle_bookmark(
        &mut self,
        id: u32,
        store: &mut dyn KeyValueStore,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let bookmarked = if let Some(pos) = self.bookmarks.iter().position(|b| b.id == id) {
            self.bookmarks.remove(pos);
            false
        } else {
            let resource = self.require(id)?;
            let bookmark = Bookmark {
                id,
                title: resource.title.clone(),
                author: resource.author.clone(),
                category: department_name(&resource.department).to_string(),
                rating: resource.rating,
                bookmarked_at: now,
            };
            self.bookmarks.push(bookmark);
            true
        };
        store.save(BOOKMARKS_KEY, &self.bookmarks)?;
        Ok(bookmarked)
    }

    fn require(&self, id: u32) -> AppResult<&Resource> {
        self.resource(id).ok_or_else(|| unknown_resource(id))
    }
}

fn unknown_resource(id: u32) -> AppError {
    AppError::invalid_argument(format!("unknown resource: {id}"))
}

#[allow(clippy::too_many_arguments)]
fn resource(
    id: u32,
    title: &str,
    description: &str,
    author: &str,
    department: &str,
    category: &str,
    rating: f32,
    downloads: u32,
    file_type: &'static str,
    size: u64,
    uploaded_at: DateTime<Utc>,
) -> Resource {
    Resource {
        id,
        title: title.to_string(),
        description: description.to_string(),
        author: author.to_string(),
        department: department.to_string(),
        category: category.to_string(),
        rating,
        downloads,
        file_type,
        size,
        uploaded_at,
    }
}

fn seed_resources(now: DateTime<Utc>) -> Vec<Resource> {
    let days = |n| now - TimeDelta::days(n);
    vec![
        resource(
            1,
            "Advanced Algorithms & Data Structures",
            "Comprehensive guide covering sorting, searching, and optimization algorithms",
            "Dr. Sarah Johnson",
            "computer-science",
            "lectures",
            4.8,
            1250,
            "PDF",
            12_400_000,
            days(2),
        ),
        resource(
            2,
            "Quantum Mechanics Fundamentals",
            "Introduction to quantum theory and its applications in modern physics",
            "Prof. Michael Chen",
            "physics",
            "videos",
            4.9,
            892,
            "MP4",
            245_000_000,
            days(5),
        ),
        resource(
            3,
            "Organic Chemistry Reactions",
            "Complete reference for organic synthesis and reaction mechanisms",
            "Dr. Emily Rodriguez",
            "chemistry",
            "lectures",
            4.7,
            756,
            "PDF",
            18_700_000,
            days(7),
        ),
        resource(
            4,
            "Machine Learning Foundations",
            "Essential concepts in ML including supervised and unsupervised learning",
            "Dr. Alex Kumar",
            "computer-science",
            "lectures",
            4.6,
            1680,
            "PDF",
            25_300_000,
            days(10),
        ),
        resource(
            5,
            "Calculus III Video Series",
            "Complete video course on multivariable calculus and vector analysis",
            "Prof. Lisa Wang",
            "mathematics",
            "videos",
            4.9,
            2100,
            "MP4",
            1_200_000_000,
            days(12),
        ),
        resource(
            6,
            "Cell Biology Illustrated",
            "Visual guide to cellular structures and biological processes",
            "Dr. Robert Smith",
            "biology",
            "lectures",
            4.5,
            934,
            "PDF",
            45_200_000,
            days(15),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::{BOOKMARKS_KEY, Library, department_name};
    use crate::storage::{KeyValueStore, MemoryStore};

    fn visible_ids(library: &Library) -> Vec<u32> {
        library.visible().map(|resource| resource.id).collect()
    }

    #[test]
    fn filters_combine_search_department_and_category() {
        let store = MemoryStore::default();
        let mut library = Library::restore(&store, Utc::now());
        assert_eq!(library.visible_len(), 6);

        library.set_search("LEARNING");
        assert_eq!(visible_ids(&library), vec![4]);

        library.set_search("");
        library
            .set_department("computer-science")
            .expect("known department");
        assert_eq!(visible_ids(&library), vec![1, 4]);

        library.set_department("all").expect("all is accepted");
        library.set_category("videos").expect("known category");
        assert_eq!(visible_ids(&library), vec![2, 5]);

        assert!(library.set_category("podcasts").is_err());
        assert_eq!(library.filters().category, "videos");
    }

    #[test]
    fn download_increments_count() {
        let store = MemoryStore::default();
        let mut library = Library::restore(&store, Utc::now());
        let message = library.download(3).expect("resource exists");
        assert_eq!(message, "Downloading Organic Chemistry Reactions...");
        assert_eq!(library.resource(3).map(|r| r.downloads), Some(757));
        assert!(library.download(42).is_err());
    }

    #[test]
    fn bookmark_toggle_persists_department_name() {
        let mut store = MemoryStore::default();
        let mut library = Library::restore(&store, Utc::now());

        assert!(
            library
                .toggle_bookmark(2, &mut store, Utc::now())
                .expect("bookmark should save")
        );
        assert_eq!(library.bookmarks()[0].category, "Physics");
        assert!(store.get_raw(BOOKMARKS_KEY).is_some());

        let restored = Library::restore(&store, Utc::now());
        assert!(restored.is_bookmarked(2));

        assert!(
            !library
                .toggle_bookmark(2, &mut store, Utc::now())
                .expect("unbookmark should save")
        );
        assert!(library.bookmarks().is_empty());
        assert_eq!(department_name("unknown"), "unknown");
    }
}
