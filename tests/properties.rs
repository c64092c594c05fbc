//! Property-based checks for the invariants listed in §8.

mod support;

use quickcheck_macros::quickcheck;

use h2_engine::frame::{clamp_max_concurrent_streams, StreamId};
use h2_engine::proto::stream::StreamState;
use h2_engine::proto::{
    Config, Connection, ConnectionRegistry, Role, StreamRegistry, WindowFlowController, WireCodec,
};

/// §8: "`max_concurrent_streams` value > 2^31 - 1 is clamped without
/// error." For every `u32`, the clamp never exceeds `i32::MAX`.
#[quickcheck]
fn max_concurrent_streams_clamp_never_exceeds_signed_32_bit(value: u32) -> bool {
    clamp_max_concurrent_streams(value) <= i32::MAX as u32
}

/// §3: stream IDs are 31-bit; the constructor must mask away any stray high
/// bit rather than silently wrap or panic.
#[quickcheck]
fn stream_id_always_fits_in_31_bits(raw: u32) -> bool {
    StreamId::new(raw).as_u32() <= 0x7fff_ffff
}

/// §3/§8: "`last_stream_created` on each endpoint is monotone
/// non-decreasing," regardless of the order stream-creation events arrive
/// in (a reordering at the registry layer must not regress the watermark).
#[quickcheck]
fn last_stream_created_is_monotone_non_decreasing(ids: Vec<u32>) -> bool {
    let mut registry = StreamRegistry::new(true, true);
    let mut last_seen = 0u32;
    for raw in ids {
        let id = StreamId::new(raw);
        registry.remote_mut().record_stream_created(id);
        let now = registry.remote().last_stream_created().as_u32();
        if now < last_seen {
            return false;
        }
        last_seen = now;
    }
    true
}

/// §8: "For all streams, the state transition graph matches RFC 7540
/// §5.1." From any live (non-`Closed`) starting state reachable via HEADERS
/// or DATA, applying both the remote and local end-of-stream cascades (in
/// either order) always lands on `Closed`, and never on anything else.
#[quickcheck]
fn end_of_stream_cascade_from_open_always_reaches_closed(remote_first: bool) -> bool {
    use h2_engine::proto::stream::Stream;

    let mut s = Stream::new(StreamId::new(1), StreamState::Open);
    if remote_first {
        s.recv_end_stream();
        s.send_end_stream();
    } else {
        s.send_end_stream();
        s.recv_end_stream();
    }
    s.state() == StreamState::Closed
}

/// §8: "After `send_goaway`, no stream with ID greater than
/// `last_known_stream` receives application callbacks." Observed through
/// the public `dispatch`/`Listener` surface rather than the crate-private
/// `should_ignore_frame`: a remote-initiated HEADERS past the announced
/// watermark must produce no listener callback at all.
#[quickcheck]
fn frames_past_the_goaway_watermark_are_ignored(extra: u16) -> bool {
    use h2_engine::frame::{Frame, Headers};
    use support::mock::RecordingListener;

    let mut conn = Connection::new(
        Role::Client,
        WireCodec::new(),
        WindowFlowController::default(),
        StreamRegistry::new(true, true),
        RecordingListener::new(),
        Config::default(),
    );
    // Satisfy the preface-received gate (§4.1/§4.2) before exercising
    // `dispatch` directly: an empty non-ACK SETTINGS is the frame that
    // completes the preface.
    conn.decode(&[0x00, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00])
        .unwrap();

    // The client's remote is the server; server-initiated streams are even.
    // Keep one stream active through the GOAWAY so shutdown stays in
    // `GoAwaySent` (rather than cascading straight to `Closing`) while we
    // probe the watermark rule below.
    let watermark = StreamId::new(100);
    conn.registry_mut().insert(watermark, StreamState::Open);
    conn.registry_mut().remote_mut().record_stream_created(watermark);
    conn.send_goaway(h2_engine::error::Reason::NO_ERROR, None, false);

    let past = StreamId::new(watermark.as_u32() + 2 + (extra as u32) * 2);
    conn.dispatch(Frame::Headers(Headers::new(past, bytes::Bytes::new(), false)))
        .unwrap();

    conn.listener().events.is_empty()
}

#[quickcheck]
fn stream_at_or_before_watermark_is_not_ignored_by_watermark_rule(offset: u8) -> bool {
    use h2_engine::frame::{Frame, Headers};
    use support::mock::RecordingListener;

    let mut conn = Connection::new(
        Role::Client,
        WireCodec::new(),
        WindowFlowController::default(),
        StreamRegistry::new(true, true),
        RecordingListener::new(),
        Config::default(),
    );
    conn.decode(&[0x00, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00])
        .unwrap();

    let watermark = StreamId::new(100);
    conn.registry_mut().insert(watermark, StreamState::Open);
    conn.registry_mut().remote_mut().record_stream_created(watermark);
    conn.send_goaway(h2_engine::error::Reason::NO_ERROR, None, false);

    let step = ((offset as u32) % 49) * 2;
    let at_or_before = StreamId::new((watermark.as_u32() - step).max(2));
    conn.dispatch(Frame::Headers(Headers::new(
        at_or_before,
        bytes::Bytes::new(),
        false,
    )))
    .unwrap();

    conn.listener().events.len() == 1
}
