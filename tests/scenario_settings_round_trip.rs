//! §8 concrete scenario 3: two outstanding local SETTINGS, ACKed one at a
//! time, each applying on its own ACK rather than on send.

mod support;

use h2_engine::frame::Settings;
use h2_engine::listener::NoopListener;
use h2_engine::proto::{Config, Connection, FlowController, Role, StreamRegistry, WindowFlowController, WireCodec};

fn client() -> Connection<WireCodec, WindowFlowController, StreamRegistry, NoopListener> {
    // Deliberately skips `on_transport_active`: the handshake's own initial
    // SETTINGS would otherwise occupy the head of the PendingSettings FIFO
    // and this test wants to reason about exactly the two sends below.
    Connection::new(
        Role::Client,
        WireCodec::new(),
        WindowFlowController::default(),
        StreamRegistry::new(true, true),
        NoopListener,
        Config::default(),
    )
}

fn ack_bytes() -> [u8; 9] {
    [0x00, 0x00, 0x00, 0x04, 0x01, 0x00, 0x00, 0x00, 0x00]
}

/// An empty non-ACK SETTINGS frame: the peer's preface-completing SETTINGS
/// (§4.1/§4.2), which both tests below must feed in first so the
/// `preface_received` frames-before-preface guard doesn't reject the
/// ACKs that follow.
fn peer_settings_bytes() -> [u8; 9] {
    [0x00, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00]
}

#[test]
fn each_ack_applies_its_own_settings_in_order() {
    let mut conn = client();
    conn.decode(&peer_settings_bytes()).unwrap();

    let mut first = Settings::new();
    first.set_initial_window_size(Some(65_535));
    conn.write_settings(first).unwrap();

    let mut second = Settings::new();
    second.set_initial_window_size(Some(131_072));
    conn.write_settings(second).unwrap();

    conn.decode(&ack_bytes()).unwrap();
    assert_eq!(conn.flow().initial_inbound_window_size(), 65_535);

    conn.decode(&ack_bytes()).unwrap();
    assert_eq!(conn.flow().initial_inbound_window_size(), 131_072);
}

#[test]
fn extra_ack_beyond_outstanding_sends_is_a_no_op() {
    let mut conn = client();
    conn.decode(&peer_settings_bytes()).unwrap();

    let mut only = Settings::new();
    only.set_initial_window_size(Some(65_535));
    conn.write_settings(only).unwrap();

    conn.decode(&ack_bytes()).unwrap();
    assert_eq!(conn.flow().initial_inbound_window_size(), 65_535);

    // A second ACK with nothing outstanding must not panic or change state.
    conn.decode(&ack_bytes()).unwrap();
    assert_eq!(conn.flow().initial_inbound_window_size(), 65_535);
}
