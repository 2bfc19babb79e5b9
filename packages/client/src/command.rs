//! Parsing of lines typed at the prompt.

use std::path::PathBuf;

use thiserror::Error;

/// A command typed at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Join(String),
    Leave,
    Send(PathBuf),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Plain text; the relay only carries audio
    #[error("only audio can be sent; use /send <file> (type /help for commands)")]
    NotACommand,
    #[error("usage: {0}")]
    MissingArgument(&'static str),
    #[error("unknown command '{0}' (type /help for commands)")]
    Unknown(String),
}

pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let Some(body) = line.strip_prefix('/') else {
        return Err(CommandError::NotACommand);
    };
    let (name, argument) = match body.split_once(char::is_whitespace) {
        Some((name, argument)) => (name, argument.trim()),
        None => (body, ""),
    };

    match name {
        "join" | "j" if argument.is_empty() => Err(CommandError::MissingArgument("/join <room>")),
        "join" | "j" => Ok(Command::Join(argument.to_string())),
        "leave" | "l" => Ok(Command::Leave),
        "send" | "s" if argument.is_empty() => Err(CommandError::MissingArgument("/send <file>")),
        "send" | "s" => Ok(Command::Send(PathBuf::from(argument))),
        "help" | "h" | "?" => Ok(Command::Help),
        "quit" | "q" | "exit" => Ok(Command::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}
