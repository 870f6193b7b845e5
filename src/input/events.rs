use crate::command::Command;

/// What a focused input widget did with a key.
#[derive(Debug, Clone, PartialEq)]
pub enum InputHookResult {
    Ignored,
    Consumed,
    EmitCommand(Command),
}
