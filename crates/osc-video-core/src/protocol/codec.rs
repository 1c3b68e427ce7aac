//! Binary codec for OSC 1.0 packets.
//!
//! Wire format of a message:
//! ```text
//! [address: OSC-string][",tags": OSC-string][arg 0][arg 1]...
//! ```
//! Wire format of a bundle:
//! ```text
//! ["#bundle\0": 8][time_tag: 8][size: 4][element]...[size: 4][element]
//! ```
//! An OSC-string is UTF-8 text followed by 1 to 4 NUL bytes so that its total
//! length is a multiple of 4.  All numbers are big-endian.

use crate::protocol::messages::{OscArg, OscMessage, OscPacket, BUNDLE_TAG};
use thiserror::Error;

/// Bundles nested deeper than this are rejected rather than recursed into.
const MAX_BUNDLE_DEPTH: usize = 8;

/// Errors that can occur during packet encoding or decoding.
#[derive(Debug, Error, PartialEq)]
pub enum ProtocolError {
    /// The byte slice ended before a fixed-size field was complete.
    #[error("insufficient data: need at least {needed} bytes, got {available}")]
    InsufficientData { needed: usize, available: usize },

    /// An OSC-string starting at `offset` has no NUL terminator.
    #[error("unterminated string at offset {offset}")]
    MissingTerminator { offset: usize },

    /// The address pattern is empty or does not start with `/`.
    #[error("invalid address pattern: {0:?}")]
    InvalidAddress(String),

    /// Bytes follow the address but they are not a `,`-prefixed type-tag string.
    #[error("type tag string must start with ','")]
    MissingTypeTags,

    /// The type-tag string names a type this codec does not handle.
    #[error("unsupported type tag: {0:?}")]
    UnsupportedTypeTag(char),

    /// A string field is not valid UTF-8.
    #[error("invalid UTF-8: {0}")]
    InvalidUtf8(String),

    /// A bundle header or element size is inconsistent.
    #[error("malformed bundle: {0}")]
    MalformedBundle(String),

    /// A string to encode contains a NUL byte, which OSC cannot represent.
    #[error("string contains an embedded NUL byte")]
    EmbeddedNul,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Encodes an [`OscMessage`] into a datagram payload.
///
/// # Errors
///
/// Returns [`ProtocolError::InvalidAddress`] if the address does not start with
/// `/`, or [`ProtocolError::EmbeddedNul`] if any string contains a NUL byte.
///
/// # Examples
///
/// ```rust
/// use osc_video_core::protocol::{decode_packet, encode_message, OscArg, OscMessage, OscPacket};
///
/// let msg = OscMessage::new("/play-pos", vec![OscArg::Float(12.5)]);
/// let bytes = encode_message(&msg).unwrap();
/// assert_eq!(bytes.len() % 4, 0);
/// assert_eq!(decode_packet(&bytes).unwrap(), OscPacket::Message(msg));
/// ```
pub fn encode_message(msg: &OscMessage) -> Result<Vec<u8>, ProtocolError> {
    if !msg.address.starts_with('/') {
        return Err(ProtocolError::InvalidAddress(msg.address.clone()));
    }

    let mut buf = Vec::with_capacity(msg.address.len() + 8 + msg.args.len() * 8);
    write_osc_string(&mut buf, &msg.address)?;

    let mut tags = String::with_capacity(msg.args.len() + 1);
    tags.push(',');
    tags.extend(msg.args.iter().map(OscArg::type_tag));
    write_osc_string(&mut buf, &tags)?;

    for arg in &msg.args {
        encode_arg(&mut buf, arg)?;
    }
    Ok(buf)
}

/// Decodes one UDP datagram into an [`OscPacket`].
///
/// # Errors
///
/// Returns [`ProtocolError`] if the bytes are not a well-formed OSC packet.
/// Untrusted input never panics; every length is bounds-checked.
pub fn decode_packet(bytes: &[u8]) -> Result<OscPacket, ProtocolError> {
    decode_packet_at_depth(bytes, 0)
}

// ── Packet decoding ───────────────────────────────────────────────────────────

fn decode_packet_at_depth(bytes: &[u8], depth: usize) -> Result<OscPacket, ProtocolError> {
    if bytes.starts_with(BUNDLE_TAG) {
        decode_bundle(bytes, depth)
    } else {
        decode_message(bytes).map(OscPacket::Message)
    }
}

fn decode_message(p: &[u8]) -> Result<OscMessage, ProtocolError> {
    let (address, tags_off) = read_osc_string(p, 0)?;
    if !address.starts_with('/') {
        return Err(ProtocolError::InvalidAddress(address));
    }

    // Legacy senders may omit the type-tag string entirely.
    if tags_off >= p.len() {
        return Ok(OscMessage::new(address, Vec::new()));
    }
    if p[tags_off] != b',' {
        return Err(ProtocolError::MissingTypeTags);
    }

    let (tags, mut off) = read_osc_string(p, tags_off)?;
    let mut args = Vec::with_capacity(tags.len().saturating_sub(1));
    for tag in tags.chars().skip(1) {
        let (arg, next) = decode_arg(tag, p, off)?;
        args.push(arg);
        off = next;
    }
    Ok(OscMessage::new(address, args))
}

fn decode_bundle(p: &[u8], depth: usize) -> Result<OscPacket, ProtocolError> {
    if depth >= MAX_BUNDLE_DEPTH {
        return Err(ProtocolError::MalformedBundle(format!(
            "nesting deeper than {MAX_BUNDLE_DEPTH} levels"
        )));
    }
    require_len(p, 16)?;
    let time_tag = read_u64(p, 8)?;

    let mut content = Vec::new();
    let mut off = 16;
    while off < p.len() {
        let size = read_i32(p, off)?;
        if size < 0 || size % 4 != 0 {
            return Err(ProtocolError::MalformedBundle(format!(
                "element size {size} at offset {off} is not a non-negative multiple of 4"
            )));
        }
        let start = off + 4;
        let end = start + size as usize;
        if end > p.len() {
            return Err(ProtocolError::MalformedBundle(format!(
                "element of {size} bytes at offset {start} exceeds packet of {} bytes",
                p.len()
            )));
        }
        content.push(decode_packet_at_depth(&p[start..end], depth + 1)?);
        off = end;
    }
    Ok(OscPacket::Bundle { time_tag, content })
}

// ── Argument encode / decode ──────────────────────────────────────────────────

fn encode_arg(buf: &mut Vec<u8>, arg: &OscArg) -> Result<(), ProtocolError> {
    match arg {
        OscArg::Int(v) => buf.extend_from_slice(&v.to_be_bytes()),
        OscArg::Float(v) => buf.extend_from_slice(&v.to_be_bytes()),
        OscArg::String(s) => write_osc_string(buf, s)?,
        OscArg::Blob(data) => {
            buf.extend_from_slice(&(data.len() as i32).to_be_bytes());
            buf.extend_from_slice(data);
            pad_to_four(buf);
        }
        OscArg::Long(v) => buf.extend_from_slice(&v.to_be_bytes()),
        OscArg::Double(v) => buf.extend_from_slice(&v.to_be_bytes()),
        OscArg::True | OscArg::False | OscArg::Nil | OscArg::Impulse => {} // no payload
    }
    Ok(())
}

fn decode_arg(tag: char, p: &[u8], off: usize) -> Result<(OscArg, usize), ProtocolError> {
    match tag {
        'i' => Ok((OscArg::Int(read_i32(p, off)?), off + 4)),
        'f' => Ok((OscArg::Float(f32::from_bits(read_i32(p, off)? as u32)), off + 4)),
        's' => {
            let (s, next) = read_osc_string(p, off)?;
            Ok((OscArg::String(s), next))
        }
        'b' => {
            let size = read_i32(p, off)?;
            if size < 0 {
                return Err(ProtocolError::InsufficientData {
                    needed: off + 4,
                    available: p.len(),
                });
            }
            let start = off + 4;
            let end = start + size as usize;
            require_len(p, end)?;
            Ok((OscArg::Blob(p[start..end].to_vec()), padded(end)))
        }
        'h' => Ok((OscArg::Long(read_u64(p, off)? as i64), off + 8)),
        'd' => Ok((OscArg::Double(f64::from_bits(read_u64(p, off)?)), off + 8)),
        'T' => Ok((OscArg::True, off)),
        'F' => Ok((OscArg::False, off)),
        'N' => Ok((OscArg::Nil, off)),
        'I' => Ok((OscArg::Impulse, off)),
        other => Err(ProtocolError::UnsupportedTypeTag(other)),
    }
}

// ── Utility helpers ───────────────────────────────────────────────────────────

/// Rounds `len` up to the next multiple of 4.
fn padded(len: usize) -> usize {
    (len + 3) & !3
}

fn pad_to_four(buf: &mut Vec<u8>) {
    let target = padded(buf.len());
    buf.resize(target, 0);
}

/// Writes `s` followed by 1..=4 NUL bytes so the total length is 4-aligned.
fn write_osc_string(buf: &mut Vec<u8>, s: &str) -> Result<(), ProtocolError> {
    if s.as_bytes().contains(&0) {
        return Err(ProtocolError::EmbeddedNul);
    }
    buf.extend_from_slice(s.as_bytes());
    buf.push(0);
    pad_to_four(buf);
    Ok(())
}

/// Reads a NUL-terminated OSC-string at `offset`.
/// Returns the string and the 4-aligned offset of the byte after its padding.
fn read_osc_string(buf: &[u8], offset: usize) -> Result<(String, usize), ProtocolError> {
    if offset >= buf.len() {
        return Err(ProtocolError::InsufficientData {
            needed: offset + 1,
            available: buf.len(),
        });
    }
    let nul = buf[offset..]
        .iter()
        .position(|b| *b == 0)
        .ok_or(ProtocolError::MissingTerminator { offset })?;
    let end = offset + nul;
    let s = std::str::from_utf8(&buf[offset..end])
        .map_err(|e| ProtocolError::InvalidUtf8(e.to_string()))?
        .to_string();
    // Padding may be truncated on the last field of a sloppy sender's datagram.
    Ok((s, padded(end + 1).min(buf.len().max(end + 1))))
}

fn require_len(buf: &[u8], needed: usize) -> Result<(), ProtocolError> {
    if buf.len() < needed {
        Err(ProtocolError::InsufficientData {
            needed,
            available: buf.len(),
        })
    } else {
        Ok(())
    }
}

fn read_i32(buf: &[u8], offset: usize) -> Result<i32, ProtocolError> {
    require_len(buf, offset + 4)?;
    Ok(i32::from_be_bytes([
        buf[offset],
        buf[offset + 1],
        buf[offset + 2],
        buf[offset + 3],
    ]))
}

fn read_u64(buf: &[u8], offset: usize) -> Result<u64, ProtocolError> {
    require_len(buf, offset + 8)?;
    Ok(u64::from_be_bytes([
        buf[offset],
        buf[offset + 1],
        buf[offset + 2],
        buf[offset + 3],
        buf[offset + 4],
        buf[offset + 5],
        buf[offset + 6],
        buf[offset + 7],
    ]))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::messages::IMMEDIATE_TIME_TAG;

    fn bundle_bytes(time_tag: u64, elements: &[Vec<u8>]) -> Vec<u8> {
        let mut buf = BUNDLE_TAG.to_vec();
        buf.extend_from_slice(&time_tag.to_be_bytes());
        for e in elements {
            buf.extend_from_slice(&(e.len() as i32).to_be_bytes());
            buf.extend_from_slice(e);
        }
        buf
    }

    // ── Encoding layout ──────────────────────────────────────────────────────

    #[test]
    fn test_encode_refresh_is_address_plus_empty_tags() {
        // Arrange
        let msg = OscMessage::new("/refresh", vec![]);

        // Act
        let bytes = encode_message(&msg).unwrap();

        // Assert: "/refresh" is 8 bytes so it takes a full extra word of NULs.
        assert_eq!(&bytes[..], b"/refresh\0\0\0\0,\0\0\0");
    }

    #[test]
    fn test_encode_play_pos_float_layout() {
        let msg = OscMessage::new("/play-pos", vec![OscArg::Float(1.0)]);
        let bytes = encode_message(&msg).unwrap();
        assert_eq!(&bytes[..12], b"/play-pos\0\0\0");
        assert_eq!(&bytes[12..16], b",f\0\0");
        assert_eq!(&bytes[16..], &1.0f32.to_be_bytes());
    }

    #[test]
    fn test_encode_rejects_address_without_slash() {
        let msg = OscMessage::new("path", vec![]);
        assert_eq!(
            encode_message(&msg),
            Err(ProtocolError::InvalidAddress("path".to_string()))
        );
    }

    #[test]
    fn test_encode_rejects_embedded_nul() {
        let msg = OscMessage::new("/path", vec![OscArg::String("a\0b".into())]);
        assert_eq!(encode_message(&msg), Err(ProtocolError::EmbeddedNul));
    }

    #[test]
    fn test_encoded_length_is_always_multiple_of_four() {
        for len in 0..8 {
            let msg = OscMessage::new(
                "/path",
                vec![OscArg::String("x".repeat(len)), OscArg::Blob(vec![1; len])],
            );
            assert_eq!(encode_message(&msg).unwrap().len() % 4, 0, "len={len}");
        }
    }

    // ── Message decoding ─────────────────────────────────────────────────────

    #[test]
    fn test_decode_mixed_arguments() {
        // Arrange
        let msg = OscMessage::new(
            "/mixed",
            vec![
                OscArg::Int(-3),
                OscArg::String("C:\\videos\\a.mp4".into()),
                OscArg::Blob(vec![1, 2, 3]),
                OscArg::Long(1 << 40),
                OscArg::Double(42.0),
                OscArg::True,
                OscArg::Nil,
            ],
        );
        let bytes = encode_message(&msg).unwrap();

        // Act
        let decoded = decode_packet(&bytes).unwrap();

        // Assert
        assert_eq!(decoded, OscPacket::Message(msg));
    }

    #[test]
    fn test_decode_legacy_message_without_type_tags() {
        let decoded = decode_packet(b"/refresh\0\0\0\0").unwrap();
        assert_eq!(decoded, OscPacket::Message(OscMessage::new("/refresh", vec![])));
    }

    #[test]
    fn test_decode_rejects_missing_comma() {
        let result = decode_packet(b"/path\0\0\0xyz\0");
        assert_eq!(result, Err(ProtocolError::MissingTypeTags));
    }

    #[test]
    fn test_decode_rejects_address_without_slash() {
        let result = decode_packet(b"path\0\0\0\0,\0\0\0");
        assert_eq!(result, Err(ProtocolError::InvalidAddress("path".into())));
    }

    #[test]
    fn test_decode_rejects_unterminated_address() {
        let result = decode_packet(b"/path");
        assert_eq!(result, Err(ProtocolError::MissingTerminator { offset: 0 }));
    }

    #[test]
    fn test_decode_rejects_unknown_type_tag() {
        let result = decode_packet(b"/x\0\0,r\0\0\0\0\0\0");
        assert_eq!(result, Err(ProtocolError::UnsupportedTypeTag('r')));
    }

    #[test]
    fn test_decode_truncated_float_is_insufficient_data() {
        let result = decode_packet(b"/play-pos\0\0\0,f\0\0\x41");
        assert!(matches!(result, Err(ProtocolError::InsufficientData { .. })));
    }

    #[test]
    fn test_decode_blob_with_oversized_length() {
        let mut bytes = b"/b\0\0,b\0\0".to_vec();
        bytes.extend_from_slice(&1000i32.to_be_bytes());
        bytes.extend_from_slice(&[0; 4]);
        assert!(matches!(
            decode_packet(&bytes),
            Err(ProtocolError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_decode_invalid_utf8_string() {
        let result = decode_packet(b"/p\0\0,s\0\0\xff\xfe\0\0");
        assert!(matches!(result, Err(ProtocolError::InvalidUtf8(_))));
    }

    #[test]
    fn test_decode_empty_datagram() {
        assert!(matches!(
            decode_packet(&[]),
            Err(ProtocolError::InsufficientData { .. })
        ));
    }

    // ── Bundles ──────────────────────────────────────────────────────────────

    #[test]
    fn test_decode_bundle_with_two_messages() {
        // Arrange
        let a = OscMessage::new("/path", vec![OscArg::String("/tmp/a.mp4".into())]);
        let b = OscMessage::new("/play-pos", vec![OscArg::Double(3.0)]);
        let bytes = bundle_bytes(
            IMMEDIATE_TIME_TAG,
            &[encode_message(&a).unwrap(), encode_message(&b).unwrap()],
        );

        // Act
        let decoded = decode_packet(&bytes).unwrap();

        // Assert
        assert_eq!(
            decoded,
            OscPacket::Bundle {
                time_tag: IMMEDIATE_TIME_TAG,
                content: vec![OscPacket::Message(a), OscPacket::Message(b)],
            }
        );
    }

    #[test]
    fn test_decode_empty_bundle() {
        let decoded = decode_packet(&bundle_bytes(7, &[])).unwrap();
        assert_eq!(
            decoded,
            OscPacket::Bundle {
                time_tag: 7,
                content: vec![]
            }
        );
    }

    #[test]
    fn test_decode_bundle_rejects_element_overrun() {
        let mut bytes = bundle_bytes(IMMEDIATE_TIME_TAG, &[]);
        bytes.extend_from_slice(&64i32.to_be_bytes());
        bytes.extend_from_slice(b"/x\0\0,\0\0\0");
        assert!(matches!(
            decode_packet(&bytes),
            Err(ProtocolError::MalformedBundle(_))
        ));
    }

    #[test]
    fn test_decode_bundle_rejects_unaligned_element_size() {
        let mut bytes = bundle_bytes(IMMEDIATE_TIME_TAG, &[]);
        bytes.extend_from_slice(&3i32.to_be_bytes());
        bytes.extend_from_slice(b"/x\0");
        assert!(matches!(
            decode_packet(&bytes),
            Err(ProtocolError::MalformedBundle(_))
        ));
    }

    #[test]
    fn test_decode_rejects_excessive_bundle_nesting() {
        // Arrange: wrap an empty bundle MAX_BUNDLE_DEPTH + 1 times.
        let mut bytes = bundle_bytes(IMMEDIATE_TIME_TAG, &[]);
        for _ in 0..MAX_BUNDLE_DEPTH {
            bytes = bundle_bytes(IMMEDIATE_TIME_TAG, &[bytes]);
        }

        // Act / Assert
        assert!(matches!(
            decode_packet(&bytes),
            Err(ProtocolError::MalformedBundle(_))
        ));
    }

    #[test]
    fn test_decode_truncated_bundle_header() {
        assert!(matches!(
            decode_packet(b"#bundle\0\0\0"),
            Err(ProtocolError::InsufficientData { .. })
        ));
    }

    // ── Helpers ──────────────────────────────────────────────────────────────

    #[test]
    fn test_padded_rounds_up_to_four() {
        assert_eq!(padded(0), 0);
        assert_eq!(padded(1), 4);
        assert_eq!(padded(4), 4);
        assert_eq!(padded(5), 8);
    }
}
