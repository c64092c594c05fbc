//! §8 concrete scenario 4: an inbound END_STREAM DATA frame, then a local
//! END_STREAM HEADERS write, drains the stream to CLOSED.

mod support;

use bytes::Bytes;
use h2_engine::frame::StreamId;
use h2_engine::listener::NoopListener;
use h2_engine::proto::stream::StreamState;
use h2_engine::proto::{Config, Connection, Role, StreamRegistry, WindowFlowController, WireCodec};

#[test]
fn stream_closes_after_remote_then_local_end_stream() {
    let mut conn = Connection::new(
        Role::Server,
        WireCodec::new(),
        WindowFlowController::default(),
        StreamRegistry::new(true, true),
        NoopListener,
        Config::default(),
    );

    // Complete the handshake (§4.1/§4.2) before dispatching frames directly:
    // the client preface followed by its preface-completing empty SETTINGS.
    let mut preface = h2_engine::frame::CLIENT_PREFACE.to_vec();
    preface.extend_from_slice(&[0x00, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00]);
    conn.decode(&preface).unwrap();

    let stream3 = StreamId::new(3);
    conn.registry_mut().insert(stream3, StreamState::Open);
    conn.registry_mut().remote_mut().record_stream_created(stream3);

    conn.dispatch(h2_engine::frame::Frame::Data(
        h2_engine::frame::Data::new(stream3, Bytes::new(), 0, true),
    ))
    .unwrap();

    assert_eq!(
        conn.registry().get(stream3).map(|s| s.state()),
        Some(StreamState::HalfClosedRemote)
    );

    conn.write_headers(stream3, Bytes::from_static(b"resp"), None, true)
        .unwrap();

    assert!(
        conn.registry().get(stream3).is_none(),
        "both halves closed; the stream is dropped from the registry"
    );
}
