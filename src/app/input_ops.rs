use crossterm::event::KeyEvent;

use crate::command::{ActionId, Command, CommandDispatchResult, dispatch};
use crate::error::AppResult;
use crate::input::InputHookResult;
use crate::input::keymap::{KeymapPreset, map_key_to_command_with_preset};
use crate::palette::PaletteKeyResult;
use crate::palette::{PaletteSubmitEffect, PaletteView};
use crate::portal::Portal;
use crate::router::Router;

use super::core::InteractionSubsystem;
use super::state::{AppState, Mode, PaletteRequest};

#[derive(Debug, Clone, Default)]
pub(crate) struct KeyEventOutcome {
    pub redraw: bool,
    pub clear_terminal: bool,
    pub quit_requested: bool,
    pub command: Option<Command>,
}

impl InteractionSubsystem {
    pub(crate) fn handle_key_event(
        &mut self,
        state: &mut AppState,
        key: KeyEvent,
        keymap_preset: &str,
    ) -> AppResult<KeyEventOutcome> {
        if state.mode == Mode::Palette {
            return match self.handle_palette_key(state, key)? {
                PaletteKeyResult::Consumed { redraw } => Ok(KeyEventOutcome {
                    redraw,
                    ..KeyEventOutcome::default()
                }),
                PaletteKeyResult::CloseRequested { session_id } => {
                    let closed = self.close_palette_session(state, session_id);
                    Ok(KeyEventOutcome {
                        redraw: closed,
                        clear_terminal: closed,
                        ..KeyEventOutcome::default()
                    })
                }
                PaletteKeyResult::Submit(action) => {
                    let (changed_by_palette, command) =
                        self.handle_palette_submit_effect(state, action.session_id, action.effect)?;
                    Ok(KeyEventOutcome {
                        redraw: changed_by_palette,
                        clear_terminal: changed_by_palette,
                        quit_requested: false,
                        command,
                    })
                }
            };
        }

        let command = if state.mode == Mode::Login {
            match self.login_form.handle_key(key) {
                InputHookResult::Ignored => None,
                InputHookResult::Consumed => {
                    return Ok(KeyEventOutcome {
                        redraw: true,
                        ..KeyEventOutcome::default()
                    });
                }
                InputHookResult::EmitCommand(command) => Some(command),
            }
        } else {
            let preset = KeymapPreset::parse(keymap_preset);
            map_key_to_command_with_preset(key, state.mode, preset)
        };

        let Some(command) = command else {
            return Ok(KeyEventOutcome::default());
        };

        if matches!(command, Command::Quit) {
            return Ok(KeyEventOutcome {
                quit_requested: true,
                ..KeyEventOutcome::default()
            });
        }

        Ok(KeyEventOutcome {
            command: Some(command),
            ..KeyEventOutcome::default()
        })
    }

    pub(crate) fn palette_view(&self) -> Option<PaletteView> {
        self.palette.manager.view()
    }

    pub(crate) fn handle_palette_key(
        &mut self,
        state: &mut AppState,
        key: KeyEvent,
    ) -> AppResult<PaletteKeyResult> {
        self.palette
            .manager
            .handle_key(&self.palette.registry, state, key)
    }

    pub(crate) fn close_palette_session(&mut self, state: &mut AppState, session_id: u64) -> bool {
        if !self.palette.manager.close_if_matches(session_id) {
            return false;
        }
        state.mode = Mode::Normal;
        true
    }

    pub(crate) fn apply_palette_requests(&mut self, state: &mut AppState) -> bool {
        let mut changed = false;
        while let Some(request) = self.palette.pending_requests.pop_front() {
            match request {
                PaletteRequest::Open { kind, seed } => {
                    match self
                        .palette
                        .manager
                        .open(&self.palette.registry, state, kind, seed)
                    {
                        Ok(()) => {
                            state.mode = Mode::Palette;
                            state.status.last_action_id = Some(ActionId::OpenPalette);
                            state.status.message = format!("palette opened: {}", kind.id());
                            changed = true;
                        }
                        Err(err) => {
                            state.status.last_action_id = Some(ActionId::OpenPalette);
                            state.status.message = format!("failed to open palette: {err}");
                        }
                    }
                }
                PaletteRequest::Close => {
                    if self.palette.manager.close() {
                        state.mode = Mode::Normal;
                        state.status.last_action_id = Some(ActionId::ClosePalette);
                        state.status.message = "palette closed".to_string();
                        changed = true;
                    }
                }
            }
        }

        if !self.palette.manager.is_open() && state.mode == Mode::Palette {
            state.mode = Mode::Normal;
            changed = true;
        }
        changed
    }

    /// Keeps an open palette in step with state changed by commands or timers.
    pub(crate) fn refresh_palette(&mut self, state: &AppState) -> AppResult<()> {
        self.palette.manager.refresh(&self.palette.registry, state)
    }

    pub(crate) fn dispatch_command(
        &mut self,
        state: &mut AppState,
        command: Command,
        router: &mut Router<Portal>,
        portal: &mut Portal,
    ) -> AppResult<CommandDispatchResult> {
        dispatch(
            state,
            command,
            router,
            portal,
            &mut self.palette.pending_requests,
        )
    }

    pub(crate) fn handle_palette_submit_effect(
        &mut self,
        state: &mut AppState,
        session_id: u64,
        effect: PaletteSubmitEffect,
    ) -> AppResult<(bool, Option<Command>)> {
        if !self.palette.manager.close_if_matches(session_id) {
            return Ok((false, None));
        }
        state.mode = Mode::Normal;
        let mut changed = true;
        let mut pending_command = None;

        match effect {
            PaletteSubmitEffect::Close => {}
            PaletteSubmitEffect::Reopen { kind, seed } => {
                self.palette
                    .pending_requests
                    .push_back(PaletteRequest::Open { kind, seed });
            }
            PaletteSubmitEffect::Dispatch(command) => pending_command = Some(command),
        }

        if self.apply_palette_requests(state) {
            changed = true;
        }
        Ok((changed, pending_command))
    }
}
