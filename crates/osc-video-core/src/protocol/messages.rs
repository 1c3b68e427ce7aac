//! OSC 1.0 data model.
//!
//! An OSC datagram carries either a single message or a bundle of messages.
//! A message is an address pattern (`/play-pos`) plus an ordered list of typed
//! arguments.

// ── Protocol constants ────────────────────────────────────────────────────────

/// The string that opens every OSC bundle (`#bundle` + NUL terminator).
pub const BUNDLE_TAG: &[u8; 8] = b"#bundle\0";

/// The special time tag meaning "apply immediately".
pub const IMMEDIATE_TIME_TAG: u64 = 1;

// ── Arguments ─────────────────────────────────────────────────────────────────

/// A single typed OSC argument.
///
/// The variant names follow the OSC 1.0 type tags; the tag character each one
/// is encoded with is returned by [`OscArg::type_tag`].
#[derive(Debug, Clone, PartialEq)]
pub enum OscArg {
    /// `i` – 32-bit big-endian two's complement integer.
    Int(i32),
    /// `f` – 32-bit big-endian IEEE 754 float.
    Float(f32),
    /// `s` – NUL-terminated, 4-byte padded string.
    String(String),
    /// `b` – size-prefixed binary blob, padded to 4 bytes.
    Blob(Vec<u8>),
    /// `h` – 64-bit big-endian two's complement integer.
    Long(i64),
    /// `d` – 64-bit big-endian IEEE 754 double.
    Double(f64),
    /// `T` – true, no payload bytes.
    True,
    /// `F` – false, no payload bytes.
    False,
    /// `N` – nil, no payload bytes.
    Nil,
    /// `I` – impulse / infinitum, no payload bytes.
    Impulse,
}

impl OscArg {
    /// Returns the type-tag character used to encode this argument.
    pub fn type_tag(&self) -> char {
        match self {
            OscArg::Int(_) => 'i',
            OscArg::Float(_) => 'f',
            OscArg::String(_) => 's',
            OscArg::Blob(_) => 'b',
            OscArg::Long(_) => 'h',
            OscArg::Double(_) => 'd',
            OscArg::True => 'T',
            OscArg::False => 'F',
            OscArg::Nil => 'N',
            OscArg::Impulse => 'I',
        }
    }

    /// Returns the argument as a number if it carries one.
    ///
    /// Integer and floating-point tags are all accepted because senders are
    /// free to pick any numeric encoding for the same logical value.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            OscArg::Int(v) => Some(f64::from(*v)),
            OscArg::Float(v) => Some(f64::from(*v)),
            OscArg::Long(v) => Some(*v as f64),
            OscArg::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the argument as a string slice if it is an `s` argument.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            OscArg::String(s) => Some(s),
            _ => None,
        }
    }
}

// ── Messages and packets ──────────────────────────────────────────────────────

/// A single OSC message: address pattern plus arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct OscMessage {
    /// The address pattern, always starting with `/`.
    pub address: String,
    /// Positional arguments in wire order.
    pub args: Vec<OscArg>,
}

impl OscMessage {
    /// Creates a message with the given address and arguments.
    pub fn new(address: impl Into<String>, args: Vec<OscArg>) -> Self {
        Self {
            address: address.into(),
            args,
        }
    }
}

/// The content of one OSC datagram.
#[derive(Debug, Clone, PartialEq)]
pub enum OscPacket {
    /// A lone message.
    Message(OscMessage),
    /// A bundle of elements sharing one time tag.  Elements may themselves be
    /// bundles.
    Bundle {
        /// NTP-format time tag.  The bridge applies everything immediately and
        /// does not schedule on this value.
        time_tag: u64,
        /// Bundle elements in wire order.
        content: Vec<OscPacket>,
    },
}

impl OscPacket {
    /// Flattens the packet into its messages, depth-first in wire order.
    pub fn into_messages(self) -> Vec<OscMessage> {
        let mut out = Vec::new();
        self.collect_into(&mut out);
        out
    }

    fn collect_into(self, out: &mut Vec<OscMessage>) {
        match self {
            OscPacket::Message(m) => out.push(m),
            OscPacket::Bundle { content, .. } => {
                for element in content {
                    element.collect_into(out);
                }
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
