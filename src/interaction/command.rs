//! Parsing of `!pd` commands out of raw message text.

use crate::base::types::Command;

/// The raw shape of a command: an action token and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub action: String,
    pub args: Vec<String>,
}

impl ParsedCommand {
    /// The arguments joined back together with single spaces.
    pub fn arg_text(&self) -> String {
        self.args.join(" ")
    }

    /// Map the action token to a command; anything unrecognized is a request for help.
    pub fn into_command(self) -> Command {
        match self.action.as_str() {
            "status" => Command::Status,
            "trigger" => Command::Trigger { message: self.arg_text() },
            _ => Command::Help,
        }
    }
}

/// Parse message text into a command.
///
/// Returns `None` unless the text starts with `prefix` at its very first character.
/// Whatever follows the prefix is split on whitespace, so `!pdstatus` reads as
/// `!pd status`. A bare prefix yields an empty action.
pub fn parse_command(text: &str, prefix: &str) -> Option<ParsedCommand> {
    let rest = text.strip_prefix(prefix)?;

    let mut tokens = rest.split_whitespace().map(str::to_string);
    let action = tokens.next().unwrap_or_default();
    let args = tokens.collect();

    Some(ParsedCommand { action, args })
}
