use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::config::RouterConfig;

use super::history::{HistoryEntry, PopState, SessionHistory};
use super::lifecycle::{AuthGate, InitializerRegistry};
use super::page::PageId;
use super::views::{DocumentChrome, ViewRegistry};

/// Result of a navigation attempt. None of these are errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    Applied { from: PageId, to: PageId },
    /// Target is protected and the session is anonymous; a login prompt was requested.
    LoginRequired(PageId),
    /// Target has no mounted view.
    ViewMissing(PageId),
    /// The name did not match any known page.
    UnknownPage,
    /// A history traversal landed on an entry without router state.
    Ignored,
}

impl NavOutcome {
    pub fn is_applied(self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

pub struct RouterSettings {
    pub protected: BTreeSet<PageId>,
    pub views: ViewRegistry,
    pub history: SessionHistory,
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            protected: [PageId::Dashboard, PageId::Upload].into_iter().collect(),
            views: ViewRegistry::all_pages(),
            history: SessionHistory::default(),
        }
    }
}

impl RouterSettings {
    /// Builds settings from the `[router]` config section. The initial fragment
    /// seeds the first history entry, as a freshly loaded document would.
    pub fn from_config(config: &RouterConfig, initial_fragment: Option<String>) -> Self {
        Self {
            protected: config.protected_pages.iter().copied().collect(),
            views: ViewRegistry::with_pages(config.mounted_pages.iter().copied()),
            history: SessionHistory::new(initial_fragment, config.history_capacity),
        }
    }
}

/// Hash-style page router and view-lifecycle controller.
///
/// `S` is the service bundle handed to page initializers; it also answers the
/// authorization question for protected pages.
pub struct Router<S> {
    current: PageId,
    protected: BTreeSet<PageId>,
    views: ViewRegistry,
    history: SessionHistory,
    chrome: DocumentChrome,
    initializers: InitializerRegistry<S>,
}

impl<S: AuthGate> Router<S> {
    pub fn new(settings: RouterSettings, initializers: InitializerRegistry<S>) -> Self {
        Self {
            current: PageId::Home,
            protected: settings.protected,
            views: settings.views,
            history: settings.history,
            chrome: DocumentChrome::default(),
            initializers,
        }
    }

    pub fn current(&self) -> PageId {
        self.current
    }

    pub fn views(&self) -> &ViewRegistry {
        &self.views
    }

    pub fn history(&self) -> &SessionHistory {
        &self.history
    }

    pub fn chrome(&self) -> &DocumentChrome {
        &self.chrome
    }

    pub fn chrome_mut(&mut self) -> &mut DocumentChrome {
        &mut self.chrome
    }

    pub fn initializers(&self) -> &InitializerRegistry<S> {
        &self.initializers
    }

    pub fn is_protected(&self, page: PageId) -> bool {
        self.protected.contains(&page)
    }

    /// Shows `target`, optionally recording a history entry for it.
    pub fn navigate(&mut self, target: PageId, record_history: bool, services: &mut S) -> NavOutcome {
        if self.is_protected(target) && !services.is_authenticated() {
            debug!(page = %target, "navigation blocked: login required");
            services.request_login();
            return NavOutcome::LoginRequired(target);
        }

        if !self.views.activate(target) {
            warn!(page = %target, "navigation ignored: no mounted view");
            return NavOutcome::ViewMissing(target);
        }

        let from = self.current;
        self.current = target;
        self.chrome.show(target);

        if record_history {
            self.history
                .push_state(HistoryEntry { page: target }, target.fragment());
        }

        let initialized = self.initializers.run(target, services);
        debug!(
            from = %from,
            to = %target,
            record_history,
            initialized,
            "navigated"
        );
        NavOutcome::Applied { from, to: target }
    }

    /// Name-based entry point for link-style intents; unknown names are ignored.
    pub fn navigate_to_name(
        &mut self,
        name: &str,
        record_history: bool,
        services: &mut S,
    ) -> NavOutcome {
        let Some(page) = PageId::parse(name.trim()) else {
            debug!(name, "navigation ignored: unknown page");
            return NavOutcome::UnknownPage;
        };
        self.navigate(page, record_history, services)
    }

    /// Applies a history traversal without pushing a new entry.
    pub fn handle_pop_state(&mut self, event: PopState, services: &mut S) -> NavOutcome {
        match event.state {
            Some(HistoryEntry { page }) => self.navigate(page, false, services),
            None => NavOutcome::Ignored,
        }
    }

    /// Resolves the startup page from the initial fragment. Falls back to home
    /// when the fragment is unknown or its page cannot be shown.
    pub fn resolve_initial_route(&mut self, fragment: Option<&str>, services: &mut S) -> NavOutcome {
        if let Some(page) = fragment.and_then(PageId::from_fragment) {
            let outcome = self.navigate(page, false, services);
            if outcome.is_applied() || page == PageId::Home {
                return outcome;
            }
        }
        self.navigate(PageId::Home, false, services)
    }

    pub fn go_back(&mut self, services: &mut S) -> Option<NavOutcome> {
        let event = self.history.back()?;
        Some(self.handle_pop_state(event, services))
    }

    pub fn go_forward(&mut self, services: &mut S) -> Option<NavOutcome> {
        let event = self.history.forward()?;
        Some(self.handle_pop_state(event, services))
    }

    pub fn go(&mut self, delta: isize, services: &mut S) -> Option<NavOutcome> {
        let event = self.history.go(delta)?;
        Some(self.handle_pop_state(event, services))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::{NavOutcome, Router, RouterSettings};
    use crate::router::{
        AuthGate, InitializerRegistry, PageId, PageInitializer, PopState, SessionHistory,
        ViewRegistry,
    };

    #[derive(Default)]
    struct Services {
        authenticated: bool,
        login_prompts: usize,
        initialized: BTreeMap<PageId, usize>,
    }

    impl AuthGate for Services {
        fn is_authenticated(&self) -> bool {
            self.authenticated
        }

        fn request_login(&mut self) {
            self.login_prompts += 1;
        }
    }

    struct CountingInit(PageId);

    impl PageInitializer<Services> for CountingInit {
        fn initialize(&mut self, services: &mut Services) {
            *services.initialized.entry(self.0).or_default() += 1;
        }
    }

    fn router_with(settings: RouterSettings) -> Router<Services> {
        let mut registry = InitializerRegistry::default();
        for page in PageId::ALL {
            if page != PageId::Home {
                registry.register(page, CountingInit(page));
            }
        }
        Router::new(settings, registry)
    }

    fn router() -> Router<Services> {
        router_with(RouterSettings::default())
    }

    fn signed_in() -> Services {
        Services {
            authenticated: true,
            ..Services::default()
        }
    }

    #[test]
    fn every_page_is_reachable_when_authenticated() {
        let mut router = router();
        let mut services = signed_in();
        router.resolve_initial_route(None, &mut services);

        for page in PageId::ALL {
            let outcome = router.navigate(page, true, &mut services);
            assert!(outcome.is_applied(), "{page} should be shown");
            assert_eq!(router.current(), page);
            assert_eq!(router.views().active_count(), 1);
            assert_eq!(router.views().active_page(), Some(page));
            assert_eq!(router.chrome().title, page.title());
            assert_eq!(router.chrome().highlighted, Some(page));
            assert_eq!(router.history().fragment(), Some(page.fragment().as_str()));
        }
    }

    #[test]
    fn protected_pages_prompt_login_once_and_keep_current() {
        for page in [PageId::Dashboard, PageId::Upload] {
            let mut router = router();
            let mut services = Services::default();
            router.resolve_initial_route(Some("#library"), &mut services);
            let history_len = router.history().len();

            let outcome = router.navigate(page, true, &mut services);
            assert_eq!(outcome, NavOutcome::LoginRequired(page));
            assert_eq!(router.current(), PageId::Library);
            assert_eq!(services.login_prompts, 1);
            assert_eq!(router.history().len(), history_len);
            assert_eq!(services.initialized.get(&page), None);
        }
    }

    #[test]
    fn unknown_names_are_ignored() {
        let mut router = router();
        let mut services = signed_in();
        router.resolve_initial_route(Some("#chat"), &mut services);

        let outcome = router.navigate_to_name("settings", true, &mut services);
        assert_eq!(outcome, NavOutcome::UnknownPage);
        assert_eq!(router.current(), PageId::Chat);
        assert_eq!(router.history().len(), 1);

        let outcome = router.navigate_to_name("blog", true, &mut services);
        assert!(outcome.is_applied());
        assert_eq!(router.current(), PageId::Blog);
    }

    #[test]
    fn initial_fragment_selects_page_without_history() {
        let mut router = router();
        let mut services = Services::default();
        let outcome = router.resolve_initial_route(Some("#gpa"), &mut services);

        assert_eq!(
            outcome,
            NavOutcome::Applied {
                from: PageId::Home,
                to: PageId::Gpa
            }
        );
        assert_eq!(router.current(), PageId::Gpa);
        assert_eq!(router.history().len(), 1);
        assert_eq!(services.initialized.get(&PageId::Gpa), Some(&1));
    }

    #[test]
    fn bogus_or_missing_fragment_defaults_to_home() {
        for fragment in [Some("#bogus"), None, Some("")] {
            let mut router = router();
            let mut services = Services::default();
            router.resolve_initial_route(fragment, &mut services);
            assert_eq!(router.current(), PageId::Home);
            assert_eq!(router.views().active_page(), Some(PageId::Home));
            assert!(router.chrome().home_presentation);
            assert_eq!(router.history().len(), 1);
        }
    }

    #[test]
    fn protected_initial_fragment_falls_back_to_home_with_prompt() {
        let mut router = router();
        let mut services = Services::default();
        let outcome = router.resolve_initial_route(Some("#dashboard"), &mut services);

        assert!(outcome.is_applied());
        assert_eq!(router.current(), PageId::Home);
        assert_eq!(router.views().active_count(), 1);
        assert_eq!(services.login_prompts, 1);
    }

    #[test]
    fn back_event_restores_previous_page_without_pushing() {
        let mut router = router();
        let mut services = signed_in();
        router.resolve_initial_route(None, &mut services);
        router.navigate(PageId::Home, true, &mut services);
        router.navigate(PageId::Library, true, &mut services);
        router.navigate(PageId::Gpa, true, &mut services);
        let history_len = router.history().len();

        let outcome = router.go_back(&mut services).expect("an entry behind gpa");
        assert_eq!(
            outcome,
            NavOutcome::Applied {
                from: PageId::Gpa,
                to: PageId::Library
            }
        );
        assert_eq!(router.current(), PageId::Library);
        assert_eq!(router.history().len(), history_len);

        let forward = router.go_forward(&mut services).expect("gpa is ahead");
        assert!(forward.is_applied());
        assert_eq!(router.current(), PageId::Gpa);
        assert_eq!(router.history().len(), history_len);
    }

    #[test]
    fn explicit_pop_state_event_navigates_without_recording() {
        let mut router = router();
        let mut services = signed_in();
        router.resolve_initial_route(None, &mut services);
        router.navigate(PageId::Library, true, &mut services);
        router.navigate(PageId::Gpa, true, &mut services);
        let history_len = router.history().len();

        let outcome = router.handle_pop_state(
            PopState {
                state: Some(crate::router::HistoryEntry {
                    page: PageId::Library,
                }),
                fragment: Some("#library".to_string()),
            },
            &mut services,
        );
        assert!(outcome.is_applied());
        assert_eq!(router.current(), PageId::Library);
        assert_eq!(router.history().len(), history_len);
    }

    #[test]
    fn stateless_pop_event_is_ignored() {
        let mut router = router();
        let mut services = signed_in();
        router.resolve_initial_route(None, &mut services);
        router.navigate(PageId::Chat, true, &mut services);

        let outcome = router.go_back(&mut services).expect("initial entry is behind");
        assert_eq!(outcome, NavOutcome::Ignored);
        assert_eq!(router.current(), PageId::Chat);
    }

    #[test]
    fn repeated_navigation_reruns_initializer() {
        let mut router = router();
        let mut services = Services::default();
        router.resolve_initial_route(None, &mut services);

        assert!(router.navigate(PageId::Blog, true, &mut services).is_applied());
        assert!(router.navigate(PageId::Blog, true, &mut services).is_applied());
        assert_eq!(services.initialized.get(&PageId::Blog), Some(&2));
        assert_eq!(router.views().active_count(), 1);
    }

    #[test]
    fn missing_view_leaves_state_unchanged() {
        let mut router = router_with(RouterSettings {
            views: ViewRegistry::with_pages([PageId::Home, PageId::Library]),
            history: SessionHistory::new(None, 16),
            ..RouterSettings::default()
        });
        let mut services = signed_in();
        router.resolve_initial_route(None, &mut services);

        let outcome = router.navigate(PageId::Blog, true, &mut services);
        assert_eq!(outcome, NavOutcome::ViewMissing(PageId::Blog));
        assert_eq!(router.current(), PageId::Home);
        assert_eq!(router.views().active_page(), Some(PageId::Home));
        assert_eq!(router.history().len(), 1);
        assert_eq!(services.initialized.get(&PageId::Blog), None);
    }

    #[test]
    fn home_has_no_initializer_and_sets_presentation_flag() {
        let mut router = router();
        let mut services = Services::default();
        router.resolve_initial_route(Some("#blog"), &mut services);
        assert!(!router.chrome().home_presentation);

        router.navigate(PageId::Home, true, &mut services);
        assert!(router.chrome().home_presentation);
        assert!(!router.initializers().has_initializer(PageId::Home));
        assert_eq!(services.initialized.get(&PageId::Home), None);
    }
}
