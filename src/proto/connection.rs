//! `Connection<C, F, R, L>`: the single cohesive component that drives the
//! whole engine, per §9's Design Note rejecting a nested "inner-class
//! callback" in favor of one component with named methods per inbound
//! frame kind.
//!
//! Owns the codec, the stream registry, and the settings/ping state
//! behind one struct, with the `on_*`/`write_*` behavior split across
//! sibling `impl` blocks in `preface.rs`, `dispatch.rs`, `outbound.rs`,
//! `errors.rs`, and `settings.rs`.

use std::collections::VecDeque;

use crate::frame::{Settings, StreamId};
use crate::listener::Listener;
use crate::proto::codec::FrameCodec;
use crate::proto::config::Config;
use crate::proto::flow::FlowController;
use crate::proto::peer::Role;
use crate::proto::registry::ConnectionRegistry;

/// Deferred-close state (§9's Design Note, replacing a stored callback
/// object with a tagged state machine): once a GOAWAY has gone out, the
/// connection is either waiting on `pending_streams` to drain or has
/// already closed the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownState {
    Open,
    /// A GOAWAY has been sent; `pending_streams` active streams remain to
    /// drain before the transport closes. `last_announced` is the
    /// `last_stream_id` we put on the wire, frozen at send time, used by
    /// `should_ignore_frame` (§4.2) to drop frames for peer streams
    /// created after it.
    GoAwaySent {
        pending_streams: usize,
        last_announced: StreamId,
    },
    /// The last stream drained (or the GOAWAY was error-driven /sent with
    /// zero active streams); the close listener has fired and transport
    /// close has been requested, but `free_resources` has not yet run.
    Closing,
    Closed,
}

/// The engine. Generic over the three external collaborators so an
/// embedder can supply their own `FrameCodec`/`FlowController`/
/// `ConnectionRegistry`, and over the application `Listener`.
pub struct Connection<C, F, R, L = crate::listener::NoopListener> {
    pub(crate) role: Role,
    pub(crate) codec: C,
    pub(crate) flow: F,
    pub(crate) registry: R,
    pub(crate) listener: L,
    pub(crate) config: Config,

    pub(crate) preface_sent: bool,
    pub(crate) preface_received: bool,
    /// Server-only: bytes of `CLIENT_PREFACE` matched so far. `None` once
    /// the preface buffer has been released (full match, or role is
    /// client).
    pub(crate) preface_matched: Option<usize>,
    pub(crate) upgrade_used: bool,

    pub(crate) pending_settings: VecDeque<Settings>,

    pub(crate) shutdown: ShutdownState,

    /// The single outstanding non-ACK ping this endpoint has sent, if any
    /// (§14's PING round-trip accounting supplement).
    pub(crate) outstanding_ping: Option<[u8; 8]>,

    pub(crate) span: Option<tracing::Span>,
}

impl<C, F, R, L> Connection<C, F, R, L>
where
    C: FrameCodec,
    F: FlowController,
    R: ConnectionRegistry,
    L: Listener,
{
    pub fn new(role: Role, codec: C, mut flow: F, registry: R, listener: L, config: Config) -> Self {
        flow.set_initial_inbound_window_size(config.initial_window_size());
        Connection {
            role,
            codec,
            flow,
            registry,
            listener,
            config,
            preface_sent: false,
            preface_received: false,
            preface_matched: if role.is_server() { Some(0) } else { None },
            upgrade_used: false,
            pending_settings: VecDeque::new(),
            shutdown: ShutdownState::Open,
            outstanding_ping: None,
            span: None,
        }
    }

    pub fn with_span(mut self, span: tracing::Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut R {
        &mut self.registry
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub fn codec_mut(&mut self) -> &mut C {
        &mut self.codec
    }

    pub fn flow(&self) -> &F {
        &self.flow
    }

    pub fn flow_mut(&mut self) -> &mut F {
        &mut self.flow
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    pub fn is_go_away(&self) -> bool {
        self.registry.is_go_away()
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.shutdown, ShutdownState::Closed)
    }

    pub fn shutdown_state(&self) -> ShutdownState {
        self.shutdown
    }

    /// §5's `free_resources`: called exactly once, on handler removal or
    /// close-listener fire. Releases the codec and drops any preface
    /// buffer still held.
    pub fn free_resources(&mut self) {
        if self.shutdown == ShutdownState::Closed {
            return;
        }
        self.codec.close();
        self.preface_matched = None;
        self.shutdown = ShutdownState::Closed;
        tracing::debug!(parent: self.span.as_ref(), role = ?self.role, "connection resources released");
    }

    /// §4.6: any path that closes a stream calls this. If a GOAWAY is
    /// pending and this was the last active stream, fires the close
    /// cascade (transport close + `free_resources`).
    pub(crate) fn check_close_cascade(&mut self) {
        if let ShutdownState::GoAwaySent { last_announced, .. } = self.shutdown {
            let active = self.registry.active_count();
            if active == 0 {
                tracing::debug!(parent: self.span.as_ref(), "last draining stream closed, cascading transport close");
                self.shutdown = ShutdownState::Closing;
                self.free_resources();
            } else {
                self.shutdown = ShutdownState::GoAwaySent {
                    pending_streams: active,
                    last_announced,
                };
            }
        }
    }

    /// §4.2 `should_ignore_frame`: true once we've sent GOAWAY (so the
    /// remote endpoint "has received" it, in the §9 Open Question's
    /// naming) and this stream is peer-initiated with an ID past what we
    /// announced, or RST_STREAM has already been sent for it.
    pub(crate) fn should_ignore_frame(&self, id: StreamId) -> bool {
        if let Some(stream) = self.registry.get(id) {
            if stream.terminate_sent() {
                return true;
            }
        }
        if let ShutdownState::GoAwaySent { last_announced, .. } = self.shutdown {
            !self.role.owns_stream_id(id) && id.as_u32() > last_announced.as_u32()
        } else {
            false
        }
    }
}
