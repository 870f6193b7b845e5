mod events;
pub mod handler;
pub mod keymap;
mod login_form;

pub use events::InputHookResult;
pub use login_form::{LoginField, LoginForm};
