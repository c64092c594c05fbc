//! Server-role handshake entry point.
//!
//! A server-role `Connection` does not write a preface; it waits for the
//! client's literal 24 octets (matched incrementally, byte-at-a-time if
//! need be, by [`Connection::decode`]) before anything else is processed,
//! while still sending its own initial SETTINGS eagerly on activation.

use crate::listener::{Listener, NoopListener};
use crate::proto::{Config, Connection, FlowController, FrameCodec, ConnectionRegistry, Role};

/// Builds a server-role [`Connection`]. Call [`Connection::on_transport_active`]
/// once the transport is up, then feed inbound bytes to
/// [`Connection::decode`].
pub fn handshake<C, F, R>(codec: C, flow: F, registry: R, config: Config) -> Connection<C, F, R, NoopListener>
where
    C: FrameCodec,
    F: FlowController,
    R: ConnectionRegistry,
{
    Connection::new(Role::Server, codec, flow, registry, NoopListener, config)
}

/// Same as [`handshake`], with an application-supplied listener attached
/// from the start.
pub fn handshake_with_listener<C, F, R, L>(
    codec: C,
    flow: F,
    registry: R,
    listener: L,
    config: Config,
) -> Connection<C, F, R, L>
where
    C: FrameCodec,
    F: FlowController,
    R: ConnectionRegistry,
    L: Listener,
{
    Connection::new(Role::Server, codec, flow, registry, listener, config)
}
