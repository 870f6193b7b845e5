use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use crate::command::Command;
use crate::portal::auth::{AuthMode, AuthSubmission};

use super::events::InputHookResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Name,
    Email,
    Password,
    Confirm,
}

impl LoginField {
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Full name",
            Self::Email => "Email",
            Self::Password => "Password",
            Self::Confirm => "Confirm password",
        }
    }

    fn is_secret(self) -> bool {
        matches!(self, Self::Password | Self::Confirm)
    }
}

const LOGIN_FIELDS: [LoginField; 2] = [LoginField::Email, LoginField::Password];
const REGISTER_FIELDS: [LoginField; 4] = [
    LoginField::Name,
    LoginField::Email,
    LoginField::Password,
    LoginField::Confirm,
];

/// Login/register form shown while the auth prompt is visible.
///
/// Keys: Tab/Down and BackTab/Up move focus, Ctrl-R switches between login
/// and register, Ctrl-V toggles password visibility, Enter submits, Esc cancels.
#[derive(Debug, Default)]
pub struct LoginForm {
    mode: AuthMode,
    focus: usize,
    name: Input,
    email: Input,
    password: Input,
    confirm: Input,
    show_password: bool,
}

impl LoginForm {
    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    pub fn fields(&self) -> &'static [LoginField] {
        match self.mode {
            AuthMode::Login => &LOGIN_FIELDS,
            AuthMode::Register => &REGISTER_FIELDS,
        }
    }

    pub fn focused(&self) -> LoginField {
        let fields = self.fields();
        fields[self.focus.min(fields.len() - 1)]
    }

    pub fn password_visible(&self) -> bool {
        self.show_password
    }

    pub fn value(&self, field: LoginField) -> &str {
        self.input(field).value()
    }

    /// Field text as it should be drawn; secrets are masked unless revealed.
    pub fn display_value(&self, field: LoginField) -> String {
        let value = self.value(field);
        if field.is_secret() && !self.show_password {
            "*".repeat(value.chars().count())
        } else {
            value.to_string()
        }
    }

    pub fn cursor(&self, field: LoginField) -> usize {
        self.input(field).visual_cursor()
    }

    pub fn toggle_mode(&mut self) {
        let focused = self.focused();
        self.mode = self.mode.toggled();
        self.focus = self
            .fields()
            .iter()
            .position(|field| *field == focused)
            .unwrap_or(0);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn submission(&self) -> AuthSubmission {
        match self.mode {
            AuthMode::Login => AuthSubmission::login(self.email.value(), self.password.value()),
            AuthMode::Register => AuthSubmission::register(
                self.name.value(),
                self.email.value(),
                self.password.value(),
                self.confirm.value(),
            ),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> InputHookResult {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => InputHookResult::EmitCommand(Command::Cancel),
            KeyCode::Enter => InputHookResult::EmitCommand(Command::SubmitAuth(self.submission())),
            KeyCode::Tab | KeyCode::Down => {
                self.step_focus(true);
                InputHookResult::Consumed
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.step_focus(false);
                InputHookResult::Consumed
            }
            KeyCode::Char('r') if ctrl => {
                self.toggle_mode();
                InputHookResult::Consumed
            }
            KeyCode::Char('v') if ctrl => {
                self.show_password = !self.show_password;
                InputHookResult::Consumed
            }
            _ if ctrl => InputHookResult::Ignored,
            _ => {
                let field = self.focused();
                match self.input_mut(field).handle_event(&Event::Key(key)) {
                    Some(_) => InputHookResult::Consumed,
                    None => InputHookResult::Ignored,
                }
            }
        }
    }

    fn step_focus(&mut self, forward: bool) {
        let len = self.fields().len();
        self.focus = if forward {
            (self.focus + 1) % len
        } else {
            (self.focus + len - 1) % len
        };
    }

    fn input(&self, field: LoginField) -> &Input {
        match field {
            LoginField::Name => &self.name,
            LoginField::Email => &self.email,
            LoginField::Password => &self.password,
            LoginField::Confirm => &self.confirm,
        }
    }

    fn input_mut(&mut self, field: LoginField) -> &mut Input {
        match field {
            LoginField::Name => &mut self.name,
            LoginField::Email => &mut self.email,
            LoginField::Password => &mut self.password,
            LoginField::Confirm => &mut self.confirm,
        }
    }
}
