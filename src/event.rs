use crossterm::event::Event;

use crate::app::Mode;
use crate::command::{ActionId, Command, CommandOutcome};
use crate::portal::PortalEvent;
use crate::router::PageId;

/// Describes *why* the visible page changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavReason {
    /// Navigation-link style intent (goto, digit keys, home cards).
    Link,
    /// Back/forward traversal of the session history.
    History,
    /// A submitted search moved to the page it targets.
    Search,
    /// Sign-in or sign-out redirected the session.
    Auth,
    Initial,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    CommandExecuted {
        id: ActionId,
        outcome: CommandOutcome,
    },
    PageChanged {
        from: PageId,
        to: PageId,
        reason: NavReason,
    },
    ModeChanged {
        from: Mode,
        to: Mode,
    },
    LoginRequested(PageId),
}

#[derive(Debug)]
pub(crate) enum DomainEvent {
    Input(Event),
    InputError(String),
    Command(Command),
    App(AppEvent),
    Portal(PortalEvent),
    RedrawTick,
}
