//! Protocol module containing OSC message types, the binary codec and the
//! typed control commands.

pub mod codec;
pub mod commands;
pub mod messages;

pub use codec::{decode_packet, encode_message, ProtocolError};
pub use commands::{CommandError, ControlCommand};
pub use messages::*;
