use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::page::PageId;

pub const DEFAULT_HISTORY_CAPACITY: usize = 64;

/// State object attached to a pushed history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub page: PageId,
}

/// Delivered when traversal lands on an entry. `state` is `None` for the
/// initial document entry, which was never pushed by the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopState {
    pub state: Option<HistoryEntry>,
    pub fragment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SessionEntry {
    state: Option<HistoryEntry>,
    fragment: Option<String>,
}

/// In-process stand-in for the browser session history.
#[derive(Debug, Clone)]
pub struct SessionHistory {
    entries: VecDeque<SessionEntry>,
    cursor: usize,
    capacity: usize,
}

/// One row of [`SessionHistory::snapshot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    pub offset: isize,
    pub page: Option<PageId>,
    pub fragment: Option<String>,
}

impl Default for SessionHistory {
    fn default() -> Self {
        Self::new(None, DEFAULT_HISTORY_CAPACITY)
    }
}

impl SessionHistory {
    pub fn new(initial_fragment: Option<String>, capacity: usize) -> Self {
        let mut entries = VecDeque::new();
        entries.push_back(SessionEntry {
            state: None,
            fragment: initial_fragment.filter(|fragment| !fragment.is_empty()),
        });
        Self {
            entries,
            cursor: 0,
            capacity: capacity.max(1),
        }
    }

    /// Appends an entry after the cursor, discarding any forward entries.
    pub fn push_state(&mut self, entry: HistoryEntry, fragment: String) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push_back(SessionEntry {
            state: Some(entry),
            fragment: Some(fragment),
        });
        self.cursor = self.entries.len() - 1;

        while self.entries.len() > self.capacity {
            self.entries.pop_front();
            self.cursor = self.cursor.saturating_sub(1);
        }
    }

    pub fn back(&mut self) -> Option<PopState> {
        self.go(-1)
    }

    pub fn forward(&mut self) -> Option<PopState> {
        self.go(1)
    }

    /// Moves the cursor by `delta`; out-of-range traversal is a no-op.
    pub fn go(&mut self, delta: isize) -> Option<PopState> {
        if delta == 0 {
            return None;
        }
        let target = self.cursor.checked_add_signed(delta)?;
        let entry = self.entries.get(target)?;
        let pop = PopState {
            state: entry.state,
            fragment: entry.fragment.clone(),
        };
        self.cursor = target;
        Some(pop)
    }

    pub fn fragment(&self) -> Option<&str> {
        self.entries
            .get(self.cursor)
            .and_then(|entry| entry.fragment.as_deref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn can_go_back(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Entries newest first, each tagged with its offset from the cursor.
    pub fn snapshot(&self) -> Vec<HistoryRow> {
        self.entries
            .iter()
            .enumerate()
            .rev()
            .map(|(idx, entry)| HistoryRow {
                offset: idx as isize - self.cursor as isize,
                page: entry.state.map(|state| state.page),
                fragment: entry.fragment.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{HistoryEntry, SessionHistory};
    use crate::router::PageId;

    fn push(history: &mut SessionHistory, page: PageId) {
        history.push_state(HistoryEntry { page }, page.fragment());
    }

    #[test]
    fn back_and_forward_walk_pushed_entries() {
        let mut history = SessionHistory::new(None, 8);
        push(&mut history, PageId::Library);
        push(&mut history, PageId::Gpa);
        assert_eq!(history.len(), 3);
        assert_eq!(history.fragment(), Some("#gpa"));

        let back = history.back().expect("back should land on library");
        assert_eq!(back.state, Some(HistoryEntry { page: PageId::Library }));
        assert_eq!(history.fragment(), Some("#library"));

        let initial = history.back().expect("back should land on initial entry");
        assert_eq!(initial.state, None);
        assert!(history.back().is_none());

        let forward = history.forward().expect("forward should land on library");
        assert_eq!(forward.state.map(|state| state.page), Some(PageId::Library));
    }

    #[test]
    fn push_after_back_discards_forward_entries() {
        let mut history = SessionHistory::new(Some("#home".to_string()), 8);
        push(&mut history, PageId::Library);
        push(&mut history, PageId::Gpa);
        history.back();
        push(&mut history, PageId::Blog);

        assert_eq!(history.len(), 3);
        assert!(!history.can_go_forward());
        let pages: Vec<_> = history.snapshot().iter().map(|row| row.page).collect();
        assert_eq!(pages, vec![Some(PageId::Blog), Some(PageId::Library), None]);
    }

    #[test]
    fn capacity_drops_oldest_entries() {
        let mut history = SessionHistory::new(None, 2);
        push(&mut history, PageId::Library);
        push(&mut history, PageId::Gpa);
        push(&mut history, PageId::Chat);

        assert_eq!(history.len(), 2);
        assert_eq!(history.cursor(), 1);
        let back = history.back().expect("one entry behind cursor");
        assert_eq!(back.state.map(|state| state.page), Some(PageId::Gpa));
        assert!(history.back().is_none());
    }

    #[test]
    fn go_out_of_range_keeps_cursor() {
        let mut history = SessionHistory::default();
        push(&mut history, PageId::Chat);
        assert!(history.go(5).is_none());
        assert!(history.go(-5).is_none());
        assert!(history.go(0).is_none());
        assert_eq!(history.cursor(), 1);

        let rows = history.snapshot();
        assert_eq!(rows[0].offset, 0);
        assert_eq!(rows[1].offset, -1);
    }
}
