//! §8 concrete scenario 1: a client-role engine signaled active writes the
//! literal 24-octet preface followed by an empty SETTINGS frame when no
//! non-default settings are configured.

mod support;

use h2_engine::listener::NoopListener;
use h2_engine::proto::{Config, Connection, Role, StreamRegistry, WindowFlowController, WireCodec};

#[test]
fn client_preface_then_empty_settings() {
    let mut conn = Connection::new(
        Role::Client,
        WireCodec::new(),
        WindowFlowController::default(),
        StreamRegistry::new(true, true),
        NoopListener,
        Config::default(),
    );

    conn.on_transport_active().unwrap();

    let written = conn.codec_mut().take_written();

    let mut expected = Vec::new();
    expected.extend_from_slice(b"PRI * HTTP/2.0\r\n\r\nSM\r\n\r\n");
    expected.extend_from_slice(&[0x00, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00]);

    assert_eq!(written.as_ref(), expected.as_slice());
}

#[test]
fn double_activation_sends_preface_exactly_once() {
    let mut conn = Connection::new(
        Role::Client,
        WireCodec::new(),
        WindowFlowController::default(),
        StreamRegistry::new(true, true),
        NoopListener,
        Config::default(),
    );

    conn.on_transport_active().unwrap();
    let first = conn.codec_mut().take_written();
    conn.on_attached().unwrap();
    let second = conn.codec_mut().take_written();

    assert!(!first.is_empty());
    assert!(second.is_empty(), "second activation must not re-send the preface");
}
