use std::time::Instant;

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{info, warn};

use crate::command::{ActionId, CommandOutcome};
use crate::error::AppResult;
use crate::event::{AppEvent, DomainEvent};
use crate::portal::scheduler::TokioScheduler;

use super::actors::UiActor;
use super::core::App;
use super::event_bus::EventBusRuntime;
use super::terminal_session::TerminalSession;

struct LoopRuntime {
    ui_actor: UiActor,
    session: TerminalSession,
    loop_event_tx: UnboundedSender<DomainEvent>,
    loop_event_rx: UnboundedReceiver<DomainEvent>,
    loop_event_runtime: EventBusRuntime,
}

enum WaitEvent {
    Event(DomainEvent),
    Closed,
}

enum LoopControl {
    Continue,
    Break,
}

impl App {
    /// Owns the terminal until the user quits. The terminal is restored on
    /// every exit path, including errors.
    pub async fn run(&mut self) -> AppResult<()> {
        let mut runtime = self.initialize_loop_runtime()?;
        let result = self.drive(&mut runtime).await;

        runtime.loop_event_runtime.shutdown();
        runtime.session.restore()?;
        info!("session ended");
        result
    }

    fn initialize_loop_runtime(&mut self) -> AppResult<LoopRuntime> {
        let (loop_event_tx, loop_event_rx, mut loop_event_runtime) =
            EventBusRuntime::spawn(self.config.timing.redraw_interval());
        self.replace_scheduler(Box::new(TokioScheduler::new(loop_event_tx.clone())));

        let session = match TerminalSession::enter() {
            Ok(session) => session,
            Err(err) => {
                loop_event_runtime.shutdown();
                return Err(err);
            }
        };

        for event in self.start() {
            let _ = loop_event_tx.send(DomainEvent::App(event));
        }
        info!(page = %self.state.current_page, "session started");

        Ok(LoopRuntime {
            ui_actor: UiActor::default(),
            session,
            loop_event_tx,
            loop_event_rx,
            loop_event_runtime,
        })
    }

    async fn drive(&mut self, runtime: &mut LoopRuntime) -> AppResult<()> {
        loop {
            if self.interaction.apply_palette_requests(&mut self.state) {
                runtime.ui_actor.mark_redraw();
            }
            if runtime.ui_actor.needs_redraw() {
                self.render_frame(&mut runtime.session)?;
                runtime.ui_actor.clear_redraw();
            }

            let waited = wait_next_event(&mut runtime.loop_event_rx).await;
            if matches!(
                self.handle_waited_event(waited, runtime)?,
                LoopControl::Break
            ) {
                return Ok(());
            }
        }
    }

    fn handle_waited_event(
        &mut self,
        waited: WaitEvent,
        runtime: &mut LoopRuntime,
    ) -> AppResult<LoopControl> {
        match waited {
            WaitEvent::Event(DomainEvent::Input(event)) => {
                let input_outcome = self.handle_input_event(
                    event,
                    &mut runtime.session,
                    runtime.ui_actor.needs_redraw_mut(),
                )?;
                if input_outcome.quit_requested {
                    return Ok(LoopControl::Break);
                }
                if let Some(command) = input_outcome.command {
                    let _ = runtime.loop_event_tx.send(DomainEvent::Command(command));
                }
            }
            WaitEvent::Event(DomainEvent::InputError(message)) => {
                warn!(%message, "terminal input error");
                self.state.status.last_action_id = Some(ActionId::Input);
                self.state.status.message = format!("input error: {message}");
                runtime.ui_actor.mark_redraw();
            }
            WaitEvent::Event(DomainEvent::Command(command)) => {
                let dispatch = self.execute(command);
                forward_app_events(&runtime.loop_event_tx, dispatch.emitted_events);
                self.interaction.apply_palette_requests(&mut self.state);
                self.interaction.refresh_palette(&self.state)?;
                if dispatch.outcome == CommandOutcome::QuitRequested {
                    return Ok(LoopControl::Break);
                }
                runtime.ui_actor.mark_redraw();
            }
            WaitEvent::Event(DomainEvent::App(event)) => {
                self.handle_app_event(&event);
                runtime.ui_actor.mark_redraw();
            }
            WaitEvent::Event(DomainEvent::Portal(event)) => {
                let events = self.handle_portal_event(event);
                forward_app_events(&runtime.loop_event_tx, events);
                self.interaction.refresh_palette(&self.state)?;
                runtime.ui_actor.mark_redraw();
            }
            WaitEvent::Event(DomainEvent::RedrawTick) => {
                if self.prune_toasts(Instant::now()) {
                    runtime.ui_actor.mark_redraw();
                }
            }
            WaitEvent::Closed => return Ok(LoopControl::Break),
        }
        Ok(LoopControl::Continue)
    }
}

fn forward_app_events(tx: &UnboundedSender<DomainEvent>, events: Vec<AppEvent>) {
    for event in events {
        let _ = tx.send(DomainEvent::App(event));
    }
}

async fn wait_next_event(loop_event_rx: &mut UnboundedReceiver<DomainEvent>) -> WaitEvent {
    match loop_event_rx.recv().await {
        Some(event) => WaitEvent::Event(event),
        None => WaitEvent::Closed,
    }
}
