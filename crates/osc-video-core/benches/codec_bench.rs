//! Criterion benchmarks for the OSC codec.
//!
//! Position updates arrive at the host's transport refresh rate, so decoding
//! a `/play-pos` datagram is the hot path of the whole bridge.
//!
//! Run with:
//! ```bash
//! cargo bench --package osc-video-core --bench codec_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use osc_video_core::protocol::codec::{decode_packet, encode_message};
use osc_video_core::protocol::commands::ControlCommand;
use osc_video_core::protocol::messages::OscMessage;

// ── Message fixtures ──────────────────────────────────────────────────────────

fn make_play_pos() -> OscMessage {
    ControlCommand::SetPlayPos(123.456).to_message()
}

fn make_path() -> OscMessage {
    ControlCommand::SetFilePath("C:\\Users\\someone\\Videos\\session-render-final.mp4".into())
        .to_message()
}

fn make_refresh() -> OscMessage {
    ControlCommand::Refresh.to_message()
}

fn fixtures() -> Vec<(&'static str, OscMessage)> {
    vec![
        ("play_pos", make_play_pos()),
        ("path", make_path()),
        ("refresh", make_refresh()),
    ]
}

// ── Benchmarks ────────────────────────────────────────────────────────────────

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    for (name, msg) in fixtures() {
        group.bench_with_input(BenchmarkId::from_parameter(name), &msg, |b, msg| {
            b.iter(|| encode_message(black_box(msg)).unwrap())
        });
    }
    group.finish();
}

fn bench_decode_to_command(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_to_command");
    for (name, msg) in fixtures() {
        let bytes = encode_message(&msg).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(name), &bytes, |b, bytes| {
            b.iter(|| {
                let packet = decode_packet(black_box(bytes)).unwrap();
                packet
                    .into_messages()
                    .iter()
                    .map(ControlCommand::from_message)
                    .count()
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode_to_command);
criterion_main!(benches);
