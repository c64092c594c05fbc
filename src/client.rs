//! Client-role handshake entry point.
//!
//! A client-role `Connection` writes the literal 24-octet preface plus its
//! initial SETTINGS as soon as the transport comes up, and never waits on
//! a preface from the peer: only servers read a client preface, the
//! handshake receive sequence in §4.1 is server-only.

use crate::listener::{Listener, NoopListener};
use crate::proto::{Config, Connection, FlowController, FrameCodec, ConnectionRegistry, Role};

/// Builds a client-role [`Connection`]. Call [`Connection::on_transport_active`]
/// once the transport is up to send the preface and initial SETTINGS.
pub fn handshake<C, F, R>(codec: C, flow: F, registry: R, config: Config) -> Connection<C, F, R, NoopListener>
where
    C: FrameCodec,
    F: FlowController,
    R: ConnectionRegistry,
{
    Connection::new(Role::Client, codec, flow, registry, NoopListener, config)
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
    Connection::new(Role::Client, codec, flow, registry, listener, config)
}
