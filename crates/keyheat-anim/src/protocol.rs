#![forbid(unsafe_code)]

//! Line protocol spoken with the host in `--ckb-run` mode.
//!
//! Each input line is one whitespace-separated command. Parsing is
//! stateless: [`Command::parse`] turns a line into a [`Command`] and leaves
//! block tracking to the [`Session`](crate::Session).
//!
//! | Line | Command |
//! |------|---------|
//! | `begin keymap` / `end keymap` | [`Command::Begin`] / [`Command::End`] |
//! | `keycount N` | [`Command::KeyCount`] |
//! | `key <name> <x> <y>` | [`Command::KeyDef`] |
//! | `param <name> <value>` | [`Command::Param`] (value percent-decoded) |
//! | `start` / `stop` | [`Command::Start`] / [`Command::Stop`] |
//! | `key <name> down\|up` | [`Command::Key`] |
//! | `time <seconds>` | [`Command::Time`] |
//! | `frame` | [`Command::Frame`] |

use std::fmt;
use std::io;

use keyheat_core::{KeyAction, KeyPosition};

// ---------------------------------------------------------------------------
// ProtocolError
// ---------------------------------------------------------------------------

/// Errors from reading, parsing, or answering protocol lines.
#[derive(Debug)]
pub enum ProtocolError {
    /// The first word is not a known command, or a block name is unknown.
    UnknownCommand(String),
    /// A command was missing one of its arguments.
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
    /// A numeric argument did not parse.
    InvalidNumber {
        command: &'static str,
        value: String,
    },
    /// A percent-encoded argument did not decode to UTF-8.
    InvalidEncoding {
        command: &'static str,
        value: String,
    },
    /// Reading stdin or writing stdout failed.
    Io(io::Error),
}

impl ProtocolError {
    /// Whether the session can skip the offending line and continue.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Io(_))
    }
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCommand(line) => write!(f, "unknown command: {line}"),
            Self::MissingArgument { command, argument } => {
                write!(f, "'{command}' is missing its {argument} argument")
            }
            Self::InvalidNumber { command, value } => {
                write!(f, "'{command}' expects a number, got {value:?}")
            }
            Self::InvalidEncoding { command, value } => {
                write!(
                    f,
                    "'{command}' argument is not valid percent-encoded UTF-8: {value:?}"
                )
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for ProtocolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ProtocolError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// Block bracketed by `begin <block>` / `end <block>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Block {
    Keymap,
    Params,
    Run,
}

impl Block {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Keymap => "keymap",
            Self::Params => "params",
            Self::Run => "run",
        }
    }

    fn parse(word: &str) -> Option<Self> {
        match word {
            "keymap" => Some(Self::Keymap),
            "params" => Some(Self::Params),
            "run" => Some(Self::Run),
            _ => None,
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One parsed protocol line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Begin(Block),
    End(Block),
    KeyCount(usize),
    /// Key declaration inside a keymap block.
    KeyDef {
        name: String,
        position: KeyPosition,
    },
    Param {
        name: String,
        value: String,
    },
    Start,
    Stop,
    /// Key press or release by name.
    Key {
        name: String,
        action: KeyAction,
    },
    /// Absolute timestamp in seconds.
    Time(f64),
    Frame,
}

impl Command {
    /// Parse one line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, ProtocolError> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(None);
        };
        let command = match head {
            "begin" | "end" => {
                let command = if head == "begin" { "begin" } else { "end" };
                let word = words.next().ok_or(ProtocolError::MissingArgument {
                    command,
                    argument: "block",
                })?;
                let block = Block::parse(word)
                    .ok_or_else(|| ProtocolError::UnknownCommand(line.trim().to_string()))?;
                if head == "begin" {
                    Self::Begin(block)
                } else {
                    Self::End(block)
                }
            }
            "keycount" => {
                let value = required(&mut words, "keycount", "count")?;
                Self::KeyCount(parse_number("keycount", value)?)
            }
            "key" => {
                let name = required(&mut words, "key", "name")?.to_string();
                let second = required(&mut words, "key", "state")?;
                match (second, words.next()) {
                    ("down", None) => Self::Key {
                        name,
                        action: KeyAction::Press,
                    },
                    ("up", None) => Self::Key {
                        name,
                        action: KeyAction::Release,
                    },
                    (x, Some(y)) => Self::KeyDef {
                        name,
                        position: KeyPosition::new(
                            parse_number("key", x)?,
                            parse_number("key", y)?,
                        ),
                    },
                    (other, None) => {
                        return Err(ProtocolError::InvalidNumber {
                            command: "key",
                            value: other.to_string(),
                        });
                    }
                }
            }
            "param" => {
                let name = required(&mut words, "param", "name")?.to_string();
                let raw = required(&mut words, "param", "value")?;
                let value = urlencoding::decode(raw)
                    .map_err(|_| ProtocolError::InvalidEncoding {
                        command: "param",
                        value: raw.to_string(),
                    })?
                    .into_owned();
                Self::Param { name, value }
            }
            "start" => Self::Start,
            "stop" => Self::Stop,
            "time" => {
                let value = required(&mut words, "time", "seconds")?;
                let seconds: f64 = parse_number("time", value)?;
                if !seconds.is_finite() {
                    return Err(ProtocolError::InvalidNumber {
                        command: "time",
                        value: value.to_string(),
                    });
                }
                Self::Time(seconds)
            }
            "frame" => Self::Frame,
            _ => return Err(ProtocolError::UnknownCommand(line.trim().to_string())),
        };
        Ok(Some(command))
    }
}

fn required<'a>(
    words: &mut std::str::SplitWhitespace<'a>,
    command: &'static str,
    argument: &'static str,
) -> Result<&'a str, ProtocolError> {
    words
        .next()
        .ok_or(ProtocolError::MissingArgument { command, argument })
}

fn parse_number<T: std::str::FromStr>(
    command: &'static str,
    value: &str,
) -> Result<T, ProtocolError> {
    value.parse().map_err(|_| ProtocolError::InvalidNumber {
        command,
        value: value.to_string(),
    })
}
