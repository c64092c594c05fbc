//! §8 concrete scenario 6: a user-initiated graceful close waits for active
//! streams to drain before the connection actually closes.

mod support;

use h2_engine::frame::StreamId;
use h2_engine::listener::NoopListener;
use h2_engine::proto::stream::StreamState;
use h2_engine::proto::{Config, Connection, Role, StreamRegistry, WindowFlowController, WireCodec};

fn server() -> Connection<WireCodec, WindowFlowController, StreamRegistry, NoopListener> {
    Connection::new(
        Role::Server,
        WireCodec::new(),
        WindowFlowController::default(),
        StreamRegistry::new(true, true),
        NoopListener,
        Config::default(),
    )
}

#[test]
fn close_with_two_active_streams_waits_for_both_to_drain() {
    let mut conn = server();

    let s2 = StreamId::new(2);
    let s4 = StreamId::new(4);
    conn.registry_mut().insert(s2, StreamState::Open);
    conn.registry_mut().remote_mut().record_stream_created(s2);
    conn.registry_mut().insert(s4, StreamState::Open);
    conn.registry_mut().remote_mut().record_stream_created(s4);

    conn.close();

    // The GOAWAY was written, but the connection stays open: two streams
    // are still active.
    let written = conn.codec_mut().take_written();
    assert!(!written.is_empty(), "GOAWAY must be written immediately");
    assert!(!conn.is_closed());

    // First stream closes via RST_STREAM; connection still waits on s4.
    conn.write_rst_stream(s2, h2_engine::error::Reason::CANCEL).unwrap();
    assert!(!conn.is_closed());
    assert!(conn.registry().get(s2).is_none());

    // Second (and last) stream closes; now the cascade fires.
    conn.write_rst_stream(s4, h2_engine::error::Reason::CANCEL).unwrap();
    assert!(conn.is_closed());
}

#[test]
fn close_with_no_active_streams_closes_immediately() {
    let mut conn = server();
    conn.close();
    assert!(conn.is_closed());
}
