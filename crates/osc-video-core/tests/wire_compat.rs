//! Integration tests for the osc-video-core codec and command layer.
//!
//! These tests feed hand-assembled datagrams, byte for byte as an upstream
//! OSC sender puts them on the wire, through the public API and check the
//! resulting typed commands.

use osc_video_core::{
    decode_packet, encode_message,
    protocol::commands::{PATH_ADDRESS, PLAY_POS_ADDRESS},
    CommandError, ControlCommand, OscArg, OscMessage, OscPacket,
};

/// Decodes a datagram and converts every contained message to a command.
fn commands_of(bytes: &[u8]) -> Vec<Result<Option<ControlCommand>, CommandError>> {
    decode_packet(bytes)
        .expect("datagram must decode")
        .into_messages()
        .iter()
        .map(ControlCommand::from_message)
        .collect()
}

#[test]
fn test_path_datagram_from_wire_bytes() {
    // "/path" + 3 NUL, ",s" + 2 NUL, "/tmp/movie.mp4" (14) + 2 NUL
    let mut bytes = b"/path\0\0\0,s\0\0".to_vec();
    bytes.extend_from_slice(b"/tmp/movie.mp4\0\0");

    let commands = commands_of(&bytes);

    assert_eq!(
        commands,
        vec![Ok(Some(ControlCommand::SetFilePath("/tmp/movie.mp4".into())))]
    );
}

#[test]
fn test_quoted_windows_path_survives_the_wire_unchanged() {
    // The codec must not touch quoting or separators; that is the path
    // resolver's job further downstream.
    let raw = "\"C:\\videos\\a.mp4\"";
    let bytes = encode_message(&OscMessage::new(
        PATH_ADDRESS,
        vec![OscArg::String(raw.to_string())],
    ))
    .unwrap();

    assert_eq!(
        commands_of(&bytes),
        vec![Ok(Some(ControlCommand::SetFilePath(raw.to_string())))]
    );
}

#[test]
fn test_play_pos_float_datagram_from_wire_bytes() {
    let mut bytes = b"/play-pos\0\0\0,f\0\0".to_vec();
    bytes.extend_from_slice(&42.0f32.to_be_bytes());

    assert_eq!(
        commands_of(&bytes),
        vec![Ok(Some(ControlCommand::SetPlayPos(42.0)))]
    );
}

#[test]
fn test_play_pos_double_datagram_from_wire_bytes() {
    let mut bytes = b"/play-pos\0\0\0,d\0\0".to_vec();
    bytes.extend_from_slice(&12.5f64.to_be_bytes());

    assert_eq!(
        commands_of(&bytes),
        vec![Ok(Some(ControlCommand::SetPlayPos(12.5)))]
    );
}

#[test]
fn test_bundle_carrying_path_then_position() {
    // Arrange: a bundle with the immediate time tag and two elements.
    let path =
        encode_message(&ControlCommand::SetFilePath("/v/a.mp4".into()).to_message()).unwrap();
    let pos = encode_message(&ControlCommand::SetPlayPos(3.0).to_message()).unwrap();
    let mut bytes = b"#bundle\0".to_vec();
    bytes.extend_from_slice(&1u64.to_be_bytes());
    for element in [&path, &pos] {
        bytes.extend_from_slice(&(element.len() as i32).to_be_bytes());
        bytes.extend_from_slice(element);
    }

    // Act
    let commands = commands_of(&bytes);

    // Assert: order within the bundle is preserved.
    assert_eq!(
        commands,
        vec![
            Ok(Some(ControlCommand::SetFilePath("/v/a.mp4".into()))),
            Ok(Some(ControlCommand::SetPlayPos(3.0))),
        ]
    );
}

#[test]
fn test_malformed_and_unknown_messages_are_distinguished() {
    let wrong_type =
        encode_message(&OscMessage::new(PLAY_POS_ADDRESS, vec![OscArg::True])).unwrap();
    let unknown = encode_message(&OscMessage::new("/track/name", vec![])).unwrap();

    assert!(matches!(
        commands_of(&wrong_type)[0],
        Err(CommandError::ArgumentType { .. })
    ));
    assert_eq!(commands_of(&unknown), vec![Ok(None)]);
}

#[test]
fn test_refresh_encodes_to_canonical_bytes() {
    let bytes = encode_message(&ControlCommand::Refresh.to_message()).unwrap();

    assert_eq!(bytes, b"/refresh\0\0\0\0,\0\0\0".to_vec());
    assert_eq!(
        decode_packet(&bytes).unwrap(),
        OscPacket::Message(OscMessage::new("/refresh", vec![]))
    );
}
