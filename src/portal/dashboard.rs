use chrono::{DateTime, TimeDelta, Utc};

use crate::error::{AppError, AppResult};

use super::chat::ChatHub;
use super::library::Bookmark;

const SUMMARY_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentFile {
    pub id: u32,
    pub name: &'static str,
    pub file_type: &'static str,
    pub size: u64,
    pub opened_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSummary {
    pub id: u32,
    pub name: String,
    pub last_message: String,
    pub unread: u32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardSnapshot {
    pub greeting: String,
    pub bookmarks: Vec<Bookmark>,
    pub chats: Vec<ChatSummary>,
}

#[derive(Debug)]
pub struct Dashboard {
    recent_files: Vec<RecentFile>,
    snapshot: DashboardSnapshot,
}

impl Dashboard {
    pub fn seeded(now: DateTime<Utc>) -> Self {
        Self {
            recent_files: vec![
                RecentFile {
                    id: 1,
                    name: "Advanced Algorithms Notes",
                    file_type: "PDF",
                    size: 2_400_000,
                    opened_at: now - TimeDelta::hours(2),
                },
                RecentFile {
                    id: 2,
                    name: "Quantum Physics Lecture",
                    file_type: "MP4",
                    size: 145_000_000,
                    opened_at: now - TimeDelta::hours(5),
                },
                RecentFile {
                    id: 3,
                    name: "Chemistry Lab Report",
                    file_type: "DOCX",
                    size: 1_800_000,
                    opened_at: now - TimeDelta::days(1),
                },
            ],
            snapshot: DashboardSnapshot::default(),
        }
    }

    pub fn recent_files(&self) -> &[RecentFile] {
        &self.recent_files
    }

    pub fn snapshot(&self) -> &DashboardSnapshot {
        &self.snapshot
    }

    pub fn refresh(&mut self, user_name: Option<&str>, bookmarks: &[Bookmark], chats: &ChatHub) {
        self.snapshot = DashboardSnapshot {
            greeting: format!("Welcome back, {}!", user_name.unwrap_or("Student")),
            bookmarks: bookmarks.iter().take(SUMMARY_LIMIT).cloned().collect(),
            chats: chats
                .recent(SUMMARY_LIMIT)
                .into_iter()
                .map(|chat| ChatSummary {
                    id: chat.id,
                    name: chat.name.clone(),
                    last_message: chat.last_message.clone(),
                    unread: chat.unread,
                })
                .collect(),
        };
    }

    pub fn download(&self, id: u32) -> AppResult<String> {
        let file = self
            .recent_files
            .iter()
            .find(|file| file.id == id)
            .ok_or_else(|| AppError::invalid_argument(format!("unknown recent file: {id}")))?;
        Ok(format!("Downloading {}...", file.name))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::Dashboard;
    use crate::portal::chat::ChatHub;
    use crate::portal::library::Bookmark;

    #[test]
    fn refresh_builds_greeting_and_caps_summaries() {
        let now = Utc::now();
        let mut dashboard = Dashboard::seeded(now);
        let bookmarks: Vec<Bookmark> = (1..=5)
            .map(|id| Bookmark {
                id,
                title: format!("Resource {id}"),
                author: "Someone".to_string(),
                category: "Physics".to_string(),
                rating: 4.0,
                bookmarked_at: now,
            })
            .collect();

        dashboard.refresh(Some("ana"), &bookmarks, &ChatHub::seeded(now));
        let snapshot = dashboard.snapshot();
        assert_eq!(snapshot.greeting, "Welcome back, ana!");
        assert_eq!(snapshot.bookmarks.len(), 3);
        assert_eq!(snapshot.chats.len(), 3);
        assert_eq!(snapshot.chats[0].name, "CS Study Group");
    }

    #[test]
    fn download_names_recent_file() {
        let dashboard = Dashboard::seeded(Utc::now());
        assert_eq!(
            dashboard.download(3).expect("file exists"),
            "Downloading Chemistry Lab Report..."
        );
        assert!(dashboard.download(0).is_err());
    }
}
