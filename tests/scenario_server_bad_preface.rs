//! §8 concrete scenario 2: a server-role engine receiving a non-HTTP/2
//! prefix on the wire rejects it and emits no frames of its own.

mod support;

use h2_engine::listener::NoopListener;
use h2_engine::proto::{Config, Connection, Role, StreamRegistry, WindowFlowController, WireCodec};

#[test]
fn mismatched_preface_is_rejected() {
    let mut conn = Connection::new(
        Role::Server,
        WireCodec::new(),
        WindowFlowController::default(),
        StreamRegistry::new(true, true),
        NoopListener,
        Config::default(),
    );

    conn.on_transport_active().unwrap();
    conn.codec_mut().take_written(); // drain the server's own initial settings

    // "GET /" -- the first byte (0x47) already mismatches the expected
    // preface's first byte (0x50).
    let result = conn.decode(b"GET /");

    assert!(result.is_err());
    assert!(conn.codec_mut().take_written().is_empty());
}

#[test]
fn preface_matches_one_octet_at_a_time() {
    let mut conn = Connection::new(
        Role::Server,
        WireCodec::new(),
        WindowFlowController::default(),
        StreamRegistry::new(true, true),
        NoopListener,
        Config::default(),
    );

    conn.on_transport_active().unwrap();

    let preface = h2_engine::frame::CLIENT_PREFACE;
    for &byte in preface.iter() {
        conn.decode(&[byte]).unwrap();
    }

    // A trailing SETTINGS frame (empty) should now decode cleanly, proving
    // the preface was matched and the codec is live.
    conn.decode(&[0x00, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00])
        .unwrap();
}
