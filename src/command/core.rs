use crate::app::{AppState, Mode};
use crate::portal::{FEATURED_PAGES, Portal, PortalEffect};
use crate::router::{AuthGate, NavOutcome, PageId, Router};

use super::types::CommandOutcome;

/// Records a navigation result on the status line. Navigation never fails;
/// anything other than an applied move is reported as a no-op.
pub(crate) fn report_nav(app: &mut AppState, outcome: NavOutcome) -> CommandOutcome {
    match outcome {
        NavOutcome::Applied { from, to } if from == to => {
            app.status.message = format!("{} (reloaded)", to.label());
            CommandOutcome::Applied
        }
        NavOutcome::Applied { to, .. } => {
            app.status.message = to.label().to_string();
            CommandOutcome::Applied
        }
        NavOutcome::LoginRequired(page) => {
            app.status.message = format!("log in to open {}", page.label());
            CommandOutcome::Noop
        }
        NavOutcome::ViewMissing(page) => {
            app.status.message = format!("{} is not available", page.label());
            CommandOutcome::Noop
        }
        NavOutcome::UnknownPage => {
            app.status.message = "unknown page".to_string();
            CommandOutcome::Noop
        }
        NavOutcome::Ignored => {
            app.status.message = "history entry has no page".to_string();
            CommandOutcome::Noop
        }
    }
}

pub(crate) fn report_history_step(app: &mut AppState, outcome: Option<NavOutcome>) -> CommandOutcome {
    match outcome {
        Some(outcome) => report_nav(app, outcome),
        None => {
            app.status.message = "no history entry in that direction".to_string();
            CommandOutcome::Noop
        }
    }
}

/// Applies redirects requested by the portal. Returns `true` when one moved the page.
pub(crate) fn apply_portal_effects(router: &mut Router<Portal>, portal: &mut Portal) -> bool {
    let mut navigated = false;
    for effect in portal.take_effects() {
        match effect {
            PortalEffect::Navigate(page) => {
                navigated |= router.navigate(page, true, portal).is_applied();
            }
        }
    }
    navigated
}

/// Number of selectable rows the given page currently shows.
pub(crate) fn selection_len(page: PageId, portal: &Portal) -> usize {
    match page {
        PageId::Home => FEATURED_PAGES.len(),
        PageId::Library => portal.library.visible_len(),
        PageId::Upload => portal.upload.files().len(),
        PageId::Gpa => portal.gpa.courses().len(),
        PageId::Chat => portal.chat.visible().len(),
        PageId::Blog => portal.blog.visible_len(),
        PageId::Dashboard => portal.dashboard.recent_files().len(),
    }
}

/// Copies router and portal state into the shell view.
pub(crate) fn sync_app_state(app: &mut AppState, router: &Router<Portal>, portal: &Portal) {
    if app.current_page != router.current() {
        app.selection = 0;
    }
    app.current_page = router.current();
    app.fragment = router.history().fragment().map(str::to_string);
    app.history_rows = router.history().snapshot();
    app.authenticated = portal.is_authenticated();

    let len = selection_len(app.current_page, portal);
    app.selection = app.selection.min(len.saturating_sub(1));

    match (app.mode, portal.auth.prompt_visible()) {
        (Mode::Normal, true) => app.mode = Mode::Login,
        (Mode::Login, false) => app.mode = Mode::Normal,
        _ => {}
    }
}

pub(crate) fn move_selection(app: &mut AppState, portal: &Portal, forward: bool) -> CommandOutcome {
    let len = selection_len(app.current_page, portal);
    if len == 0 {
        app.status.message = "nothing to select".to_string();
        return CommandOutcome::Noop;
    }
    let next = if forward {
        (app.selection + 1) % len
    } else {
        (app.selection + len - 1) % len
    };
    app.selection = next;
    app.status.message = format!("{}/{len}", next + 1);
    CommandOutcome::Applied
}

#[cfg(test)]
mod tests {
    use super::{move_selection, report_nav};
    use crate::app::AppState;
    use crate::command::CommandOutcome;
    use crate::config::TimingConfig;
    use crate::portal::{ManualScheduler, Portal};
    use crate::router::{NavOutcome, PageId};
    use crate::storage::MemoryStore;

    #[test]
    fn blocked_navigation_reports_noop() {
        let mut app = AppState::default();
        let outcome = report_nav(&mut app, NavOutcome::LoginRequired(PageId::Upload));
        assert_eq!(outcome, CommandOutcome::Noop);
        assert_eq!(app.status.message, "log in to open Upload");
    }

    #[test]
    fn selection_wraps_in_both_directions() {
        let portal = Portal::new(
            Box::new(MemoryStore::default()),
            Box::new(ManualScheduler::default()),
            TimingConfig::default(),
        );
        let mut app = AppState::default();

        assert_eq!(move_selection(&mut app, &portal, false), CommandOutcome::Applied);
        assert_eq!(app.selection, 5);
        move_selection(&mut app, &portal, true);
        assert_eq!(app.selection, 0);

        app.current_page = PageId::Gpa;
        assert_eq!(move_selection(&mut app, &portal, true), CommandOutcome::Noop);
    }
}
