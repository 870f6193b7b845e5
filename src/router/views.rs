use std::collections::BTreeMap;

use super::page::PageId;

/// A mounted page container. Only the router toggles `active`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewSlot {
    active: bool,
    activations: u64,
}

impl ViewSlot {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn activations(&self) -> u64 {
        self.activations
    }
}

/// Registry of mounted page views. A page without a slot simply cannot be shown.
#[derive(Debug, Clone, Default)]
pub struct ViewRegistry {
    slots: BTreeMap<PageId, ViewSlot>,
}

impl ViewRegistry {
    pub fn with_pages(pages: impl IntoIterator<Item = PageId>) -> Self {
        let slots = pages
            .into_iter()
            .map(|page| (page, ViewSlot::default()))
            .collect();
        Self { slots }
    }

    pub fn all_pages() -> Self {
        Self::with_pages(PageId::ALL)
    }

    pub fn lookup(&self, page: PageId) -> Option<&ViewSlot> {
        self.slots.get(&page)
    }

    pub fn is_mounted(&self, page: PageId) -> bool {
        self.slots.contains_key(&page)
    }

    pub fn mounted(&self) -> impl Iterator<Item = PageId> + '_ {
        self.slots.keys().copied()
    }

    /// Marks `page` as the single active view. Returns `false` when it is not mounted.
    pub(crate) fn activate(&mut self, page: PageId) -> bool {
        if !self.slots.contains_key(&page) {
            return false;
        }
        for (id, slot) in &mut self.slots {
            if *id == page {
                slot.active = true;
                slot.activations = slot.activations.saturating_add(1);
            } else {
                slot.active = false;
            }
        }
        true
    }

    pub fn active_page(&self) -> Option<PageId> {
        self.slots
            .iter()
            .find(|(_, slot)| slot.active)
            .map(|(page, _)| *page)
    }

    pub fn active_count(&self) -> usize {
        self.slots.values().filter(|slot| slot.active).count()
    }
}

/// Document-level presentation state owned by the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentChrome {
    pub title: &'static str,
    pub highlighted: Option<PageId>,
    /// Set only while `home` is shown; drives the hero styling.
    pub home_presentation: bool,
    pub menu_open: bool,
}

impl Default for DocumentChrome {
    fn default() -> Self {
        Self {
            title: "BiTS Connect",
            highlighted: None,
            home_presentation: false,
            menu_open: false,
        }
    }
}

impl DocumentChrome {
    pub(crate) fn show(&mut self, page: PageId) {
        self.highlighted = Some(page);
        self.title = page.title();
        self.home_presentation = page == PageId::Home;
        self.menu_open = false;
    }

    pub fn toggle_menu(&mut self) -> bool {
        self.menu_open = !self.menu_open;
        self.menu_open
    }
}

#[cfg(test)]
mod tests {
    use super::{DocumentChrome, ViewRegistry};
    use crate::router::PageId;

    #[test]
    fn activate_keeps_exactly_one_active_view() {
        let mut views = ViewRegistry::all_pages();
        assert_eq!(views.active_count(), 0);

        assert!(views.activate(PageId::Library));
        assert!(views.activate(PageId::Chat));
        assert_eq!(views.active_count(), 1);
        assert_eq!(views.active_page(), Some(PageId::Chat));
        assert_eq!(
            views.lookup(PageId::Library).map(|slot| slot.activations()),
            Some(1)
        );
    }

    #[test]
    fn activate_unmounted_page_leaves_views_untouched() {
        let mut views = ViewRegistry::with_pages([PageId::Home, PageId::Blog]);
        assert!(views.activate(PageId::Home));
        assert!(!views.activate(PageId::Gpa));
        assert_eq!(views.active_page(), Some(PageId::Home));
        assert!(views.lookup(PageId::Gpa).is_none());
    }

    #[test]
    fn chrome_sets_home_flag_only_for_home() {
        let mut chrome = DocumentChrome::default();
        chrome.menu_open = true;
        chrome.show(PageId::Home);
        assert!(chrome.home_presentation);
        assert!(!chrome.menu_open);
        assert_eq!(chrome.title, "BiTS Connect - Educational Platform");

        chrome.show(PageId::Blog);
        assert!(!chrome.home_presentation);
        assert_eq!(chrome.highlighted, Some(PageId::Blog));
        assert_eq!(chrome.title, "Tech Blog - BiTS Connect");
    }
}
