//! Parsing of prompt input into client commands.

use thiserror::Error;

/// One line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/join <room>`
    Join(String),
    /// Plain text (a leading `//` sends a literal `/`)
    Say(String),
    /// `/edit <n> <text>`: edit my n-th message (1-based)
    Edit { index: usize, text: String },
    /// `/delete <n>`
    Delete(usize),
    List,
    History,
    Leave,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("unknown command '/{0}' (try /help)")]
    Unknown(String),
}

const JOIN_USAGE: &str = "/join <room>";
const EDIT_USAGE: &str = "/edit <n> <text>";
const DELETE_USAGE: &str = "/delete <n>";

pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();

    if let Some(literal) = line.strip_prefix("//") {
        return Ok(Command::Say(format!("/{}", literal)));
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(Command::Say(line.to_string()));
    };

    let (name, args) = match rest.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim()),
        None => (rest, ""),
    };

    match name {
        "join" => {
            if args.is_empty() || args.contains(char::is_whitespace) {
                return Err(CommandError::Usage(JOIN_USAGE));
            }
            Ok(Command::Join(args.to_string()))
        }
        "edit" => {
            let (index, text) = args
                .split_once(char::is_whitespace)
                .ok_or(CommandError::Usage(EDIT_USAGE))?;
            let text = text.trim();
            if text.is_empty() {
                return Err(CommandError::Usage(EDIT_USAGE));
            }
            Ok(Command::Edit {
                index: parse_index(index, EDIT_USAGE)?,
                text: text.to_string(),
            })
        }
        "delete" => Ok(Command::Delete(parse_index(args, DELETE_USAGE)?)),
        "list" => Ok(Command::List),
        "history" => Ok(Command::History),
        "leave" => Ok(Command::Leave),
        "help" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

fn parse_index(value: &str, usage: &'static str) -> Result<usize, CommandError> {
    match value.parse::<usize>() {
        Ok(index) if index >= 1 => Ok(index),
        _ => Err(CommandError::Usage(usage)),
    }
}
