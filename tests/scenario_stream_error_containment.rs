//! §8 concrete scenario 5: a protocol violation on one stream resets only
//! that stream; an unrelated stream keeps working normally.

mod support;

use bytes::Bytes;
use h2_engine::frame::{Data, Frame, Headers, StreamId};
use h2_engine::listener::NoopListener;
use h2_engine::proto::stream::StreamState;
use h2_engine::proto::{Config, Connection, Role, StreamRegistry, WindowFlowController, WireCodec};

#[test]
fn violation_on_one_stream_does_not_affect_another() {
    let mut conn = Connection::new(
        Role::Server,
        WireCodec::new(),
        WindowFlowController::default(),
        StreamRegistry::new(true, true),
        NoopListener,
        Config::default(),
    );

    // Complete the handshake (§4.1/§4.2) before dispatching frames directly.
    let mut preface = h2_engine::frame::CLIENT_PREFACE.to_vec();
    preface.extend_from_slice(&[0x00, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00]);
    conn.decode(&preface).unwrap();

    let stream3 = StreamId::new(3);
    let stream5 = StreamId::new(5);
    conn.registry_mut().insert(stream3, StreamState::Open);
    conn.registry_mut().remote_mut().record_stream_created(stream3);
    conn.registry_mut().insert(stream5, StreamState::HalfClosedRemote);
    conn.registry_mut().remote_mut().record_stream_created(stream5);

    // HEADERS arriving on a stream that's already half-closed (remote) is
    // a state violation: the remote side has nothing left to send.
    let err = conn
        .dispatch(Frame::Headers(Headers::new(stream5, Bytes::new(), false)))
        .unwrap_err();
    conn.handle_error(err);

    assert!(conn.registry().get(stream5).is_none(), "stream 5 reset to CLOSED");
    assert_eq!(
        conn.registry().get(stream3).map(|s| s.state()),
        Some(StreamState::Open),
        "stream 3 is unaffected by stream 5's error"
    );

    // Stream 3 still takes DATA normally afterward.
    conn.dispatch(Frame::Data(Data::new(stream3, Bytes::from_static(b"x"), 0, false)))
        .unwrap();
    assert_eq!(
        conn.registry().get(stream3).map(|s| s.state()),
        Some(StreamState::Open)
    );
    assert!(!conn.is_closed());
}
