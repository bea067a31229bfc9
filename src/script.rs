//! Line-oriented command scripts for driving a session without a UI.
//!
//! One command per line; blank lines and `#` comments are skipped:
//!
//! ```text
//! tick 5      # advance five ticks (`tick` alone advances one)
//! up          # same as `key 38`
//! key 39      # raw key code
//! upgrade     # move up a level if allowed
//! reset       # start a new run
//! show        # print the board
//! ```

use thiserror::Error;

use crate::input::Direction;

/// One parsed script command.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ScriptCommand {
    Tick(u32),
    Key(i32),
    Upgrade,
    Reset,
    Show,
}

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum ScriptError {
    #[error("line {line}: unknown command `{command}`")]
    UnknownCommand { line: usize, command: String },
    #[error("line {line}: `{value}` is not a valid number")]
    InvalidNumber { line: usize, value: String },
    #[error("line {line}: `{command}` needs an argument")]
    MissingArgument { line: usize, command: String },
}

/// Parses a whole script, reporting the first bad line.
pub fn parse_script(text: &str) -> Result<Vec<ScriptCommand>, ScriptError> {
    let mut commands = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        if let Some(command) = parse_line(index + 1, raw)? {
            commands.push(command);
        }
    }
    Ok(commands)
}

/// Parses one line. Returns `Ok(None)` for blank and comment lines.
pub fn parse_line(line: usize, raw: &str) -> Result<Option<ScriptCommand>, ScriptError> {
    let text = raw.split('#').next().unwrap_or_default().trim();
    let mut words = text.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(None);
    };
    let argument = words.next();

    let parsed = match command.to_ascii_lowercase().as_str() {
        "tick" => ScriptCommand::Tick(match argument {
            Some(value) => parse_number(line, value)?,
            None => 1,
        }),
        "key" => {
            let value = argument.ok_or_else(|| ScriptError::MissingArgument {
                line,
                command: command.to_string(),
            })?;
            ScriptCommand::Key(parse_number(line, value)?)
        }
        "up" => ScriptCommand::Key(Direction::Up.key_code()),
        "down" => ScriptCommand::Key(Direction::Down.key_code()),
        "left" => ScriptCommand::Key(Direction::Left.key_code()),
        "right" => ScriptCommand::Key(Direction::Right.key_code()),
        "upgrade" => ScriptCommand::Upgrade,
        "reset" => ScriptCommand::Reset,
        "show" => ScriptCommand::Show,
        _ => {
            return Err(ScriptError::UnknownCommand {
                line,
                command: command.to_string(),
            });
        }
    };

    Ok(Some(parsed))
}

fn parse_number<T: std::str::FromStr>(line: usize, value: &str) -> Result<T, ScriptError> {
    value.parse().map_err(|_| ScriptError::InvalidNumber {
        line,
        value: value.to_string(),
    })
}
