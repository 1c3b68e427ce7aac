//! Typed control commands exchanged with the upstream automation host.
//!
//! The raw OSC layer accepts any address and any argument list.  This module
//! narrows that down to the three commands the bridge understands and
//! validates their arguments, so nothing downstream ever sees an untyped
//! message.
//!
//! | address     | direction | argument          |
//! |-------------|-----------|-------------------|
//! | `/path`     | inbound   | string            |
//! | `/play-pos` | inbound   | number (seconds)  |
//! | `/refresh`  | outbound  | none              |

use thiserror::Error;

use crate::protocol::messages::{OscArg, OscMessage};

/// Address carrying a proposed media file path.
pub const PATH_ADDRESS: &str = "/path";

/// Address carrying a proposed playback position in seconds.
pub const PLAY_POS_ADDRESS: &str = "/play-pos";

/// Address asking the upstream host to resend its current state.
pub const REFRESH_ADDRESS: &str = "/refresh";

/// A known address arrived with arguments that do not fit its contract.
#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    /// Wrong number of arguments.
    #[error("{address}: expected {expected} argument(s), got {actual}")]
    Arity {
        address: &'static str,
        expected: usize,
        actual: usize,
    },

    /// An argument has the wrong OSC type.
    #[error("{address}: expected {expected} argument, got type tag '{actual}'")]
    ArgumentType {
        address: &'static str,
        expected: &'static str,
        actual: char,
    },

    /// A position that is negative, NaN or infinite.
    #[error("{address}: position {value} is not a finite, non-negative number")]
    InvalidPosition { address: &'static str, value: f64 },
}

/// A validated control command.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlCommand {
    /// Proposes a new media file.  The path is still raw: it may be quoted or
    /// use another OS's separators, and it has not been checked for existence.
    SetFilePath(String),
    /// Reports the upstream playback position in seconds.
    SetPlayPos(f64),
    /// Asks the upstream host to re-emit its current path and position.
    Refresh,
}

impl ControlCommand {
    /// Returns the OSC address this command travels on.
    pub fn address(&self) -> &'static str {
        match self {
            ControlCommand::SetFilePath(_) => PATH_ADDRESS,
            ControlCommand::SetPlayPos(_) => PLAY_POS_ADDRESS,
            ControlCommand::Refresh => REFRESH_ADDRESS,
        }
    }

    /// Interprets an OSC message as a control command.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(cmd))` for a known address with valid arguments.
    /// - `Ok(None)` for an address this bridge does not handle; such messages
    ///   are ignored rather than treated as errors.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError`] when a known address carries the wrong number
    /// or type of arguments, or an out-of-range position.
    pub fn from_message(msg: &OscMessage) -> Result<Option<Self>, CommandError> {
        match msg.address.as_str() {
            PATH_ADDRESS => {
                let arg = single_arg(PATH_ADDRESS, &msg.args)?;
                let path = arg.as_str().ok_or(CommandError::ArgumentType {
                    address: PATH_ADDRESS,
                    expected: "string",
                    actual: arg.type_tag(),
                })?;
                Ok(Some(ControlCommand::SetFilePath(path.to_string())))
            }
            PLAY_POS_ADDRESS => {
                let arg = single_arg(PLAY_POS_ADDRESS, &msg.args)?;
                let value = arg.as_f64().ok_or(CommandError::ArgumentType {
                    address: PLAY_POS_ADDRESS,
                    expected: "numeric",
                    actual: arg.type_tag(),
                })?;
                if !value.is_finite() || value < 0.0 {
                    return Err(CommandError::InvalidPosition {
                        address: PLAY_POS_ADDRESS,
                        value,
                    });
                }
                Ok(Some(ControlCommand::SetPlayPos(value)))
            }
            REFRESH_ADDRESS => {
                if !msg.args.is_empty() {
                    return Err(CommandError::Arity {
                        address: REFRESH_ADDRESS,
                        expected: 0,
                        actual: msg.args.len(),
                    });
                }
                Ok(Some(ControlCommand::Refresh))
            }
            _ => Ok(None),
        }
    }

    /// Builds the OSC message for this command.
    ///
    /// Positions go out as `d` (double) so no precision is lost on the way.
    pub fn to_message(&self) -> OscMessage {
        let args = match self {
            ControlCommand::SetFilePath(path) => vec![OscArg::String(path.clone())],
            ControlCommand::SetPlayPos(pos) => vec![OscArg::Double(*pos)],
            ControlCommand::Refresh => Vec::new(),
        };
        OscMessage::new(self.address(), args)
    }
}

fn single_arg<'a>(address: &'static str, args: &'a [OscArg]) -> Result<&'a OscArg, CommandError> {
    match args {
        [arg] => Ok(arg),
        _ => Err(CommandError::Arity {
            address,
            expected: 1,
            actual: args.len(),
        }),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
