use std::collections::VecDeque;
use std::time::Instant;

use tracing::{debug, warn};

use crate::command::{
    ActionId, Command, CommandDispatchResult, CommandOutcome, drain_portal_effects, sync_app_state,
};
use crate::config::Config;
use crate::event::{AppEvent, NavReason};
use crate::input::LoginForm;
use crate::palette::{PaletteManager, PaletteRegistry};
use crate::portal::scheduler::Scheduler;
use crate::portal::{ManualScheduler, Portal, PortalEvent};
use crate::router::{Router, RouterSettings};
use crate::storage::KeyValueStore;

use super::state::{AppState, Mode, PaletteRequest};

#[derive(Default)]
pub struct PaletteSubsystem {
    pub registry: PaletteRegistry,
    pub manager: PaletteManager,
    pub pending_requests: VecDeque<PaletteRequest>,
}

#[derive(Default)]
pub struct InteractionSubsystem {
    pub palette: PaletteSubsystem,
    pub login_form: LoginForm,
}

pub struct App {
    pub state: AppState,
    pub router: Router<Portal>,
    pub portal: Portal,
    pub interaction: InteractionSubsystem,
    pub config: Config,
    initial_fragment: Option<String>,
}

impl App {
    /// Builds the shell around `store`. Timers are recorded by a manual
    /// scheduler until [`App::run`] installs the runtime one.
    pub fn new_with_config(
        config: Config,
        store: Box<dyn KeyValueStore>,
        initial_fragment: Option<String>,
    ) -> Self {
        Self::with_scheduler(
            config,
            store,
            Box::new(ManualScheduler::default()),
            initial_fragment,
        )
    }

    pub fn with_scheduler(
        config: Config,
        store: Box<dyn KeyValueStore>,
        scheduler: Box<dyn Scheduler>,
        initial_fragment: Option<String>,
    ) -> Self {
        let initial_fragment = initial_fragment
            .map(|fragment| fragment.trim().to_string())
            .filter(|fragment| !fragment.is_empty());
        let portal = Portal::new(store, scheduler, config.timing.clone());
        let router = Router::new(
            RouterSettings::from_config(&config.router, initial_fragment.clone()),
            Portal::initializers(),
        );
        Self {
            state: AppState::default(),
            router,
            portal,
            interaction: InteractionSubsystem::default(),
            config,
            initial_fragment,
        }
    }

    /// Resolves the startup route from the initial fragment.
    pub fn start(&mut self) -> Vec<AppEvent> {
        let previous_mode = self.state.mode;
        let outcome = self
            .router
            .resolve_initial_route(self.initial_fragment.as_deref(), &mut self.portal);
        debug!(?outcome, fragment = ?self.initial_fragment, "initial route resolved");
        sync_app_state(&mut self.state, &self.router, &self.portal);
        self.state.status.message = format!(
            "{} | press : for commands",
            self.state.current_page.label()
        );

        let mut events = vec![AppEvent::PageChanged {
            from: self.state.current_page,
            to: self.state.current_page,
            reason: NavReason::Initial,
        }];
        if self.state.mode != previous_mode {
            events.push(AppEvent::ModeChanged {
                from: previous_mode,
                to: self.state.mode,
            });
        }
        events
    }

    /// Runs one command. Errors are surfaced as error toasts rather than
    /// aborting the session.
    pub fn execute(&mut self, command: Command) -> CommandDispatchResult {
        let action_id = command.action_id();
        let result = self.interaction.dispatch_command(
            &mut self.state,
            command,
            &mut self.router,
            &mut self.portal,
        );
        match result {
            Ok(result) => result,
            Err(err) => {
                warn!(action = action_id.as_str(), error = %err, "command failed");
                let message = err.to_string();
                self.portal.toasts.error(message.clone());
                self.state.status.last_action_id = Some(action_id);
                self.state.status.message = message;
                sync_app_state(&mut self.state, &self.router, &self.portal);
                CommandDispatchResult {
                    outcome: CommandOutcome::Noop,
                    emitted_events: vec![AppEvent::CommandExecuted {
                        id: action_id,
                        outcome: CommandOutcome::Noop,
                    }],
                }
            }
        }
    }

    /// Delivers a timer completion to the portal and applies any redirect it asked for.
    pub fn handle_portal_event(&mut self, event: PortalEvent) -> Vec<AppEvent> {
        if !self.portal.handle_event(event) {
            return Vec::new();
        }
        self.state.status.last_action_id = Some(ActionId::Portal);
        drain_portal_effects(&mut self.state, &mut self.router, &mut self.portal)
    }

    pub fn handle_app_event(&mut self, event: &AppEvent) {
        debug!(?event, "app event");
        if let AppEvent::ModeChanged { from, to } = event
            && (*from == Mode::Login || *to == Mode::Login)
        {
            self.interaction.login_form.reset();
        }
    }

    /// Drops expired toasts. Returns `true` when something disappeared.
    pub fn prune_toasts(&mut self, now: Instant) -> bool {
        self.portal.toasts.prune(now)
    }

    pub fn replace_scheduler(&mut self, scheduler: Box<dyn Scheduler>) {
        self.portal.set_scheduler(scheduler);
    }
}
