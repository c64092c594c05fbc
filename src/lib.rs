//! A connection-level HTTP/2 protocol engine: the middleware between a
//! byte-oriented duplex transport and a frame-oriented application
//! handler, implementing the RFC 7540 connection preface handshake,
//! per-stream state machine, SETTINGS negotiation, and flow-controlled
//! frame dispatch.
//!
//! This crate does not implement an HTTP semantic layer, TLS/ALPN, or
//! priority-weighted write scheduling; it is the layer those sit on top
//! of. The frame codec, flow-control algorithm, and stream registry are
//! consumed as traits ([`proto::FrameCodec`], [`proto::FlowController`],
//! [`proto::ConnectionRegistry`]) so an embedder can supply a real HPACK
//! codec and scheduler while reusing the connection-lifecycle engine here.
//!
//! [`proto::Connection`] is the entry point: construct one with
//! [`client::handshake`] or [`server::handshake`], call
//! [`proto::Connection::on_transport_active`] once the transport is up,
//! and feed inbound bytes to [`proto::Connection::decode`].

pub mod client;
pub mod error;
pub mod frame;
pub mod listener;
pub mod proto;
pub mod server;

pub use error::{Error, Reason};
pub use listener::{Listener, NoopListener};
pub use proto::{Config, Connection, ShutdownState};
