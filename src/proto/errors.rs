//! `StateAndErrorEngine` (§4.4): classifies failures into stream- vs
//! connection-level, emits `RST_STREAM`/`GOAWAY`, and manages the
//! close-listener cascade (§4.6, §9).

use crate::error::Error;
use crate::frame::GoAway;
use crate::listener::Listener;
use crate::proto::codec::FrameCodec;
use crate::proto::completion::CompletionHandle;
use crate::proto::connection::ShutdownState;
use crate::proto::flow::FlowController;
use crate::proto::registry::ConnectionRegistry;

use super::connection::Connection;

impl<C, F, R, L> Connection<C, F, R, L>
where
    C: FrameCodec,
    F: FlowController,
    R: ConnectionRegistry,
    L: Listener,
{
    /// Classifies and handles `err`: stream errors get `RST_STREAM` and the
    /// connection survives; everything else is treated as connection-level
    /// and drives a `GOAWAY`.
    pub fn handle_error(&mut self, err: Error) {
        match err {
            Error::Stream { id, reason } => {
                tracing::debug!(parent: self.span.as_ref(), stream = %id, %reason, "stream error");
                let _ = self.write_rst_stream(id, reason);
            }
            Error::Connection(reason) => {
                tracing::debug!(parent: self.span.as_ref(), %reason, "connection error");
                self.send_goaway(reason, None, true);
            }
            Error::FrameSize(reason) => {
                tracing::debug!(parent: self.span.as_ref(), %reason, "frame size error");
                self.send_goaway(reason, None, true);
            }
            Error::Internal(msg) => {
                tracing::debug!(parent: self.span.as_ref(), %msg, "internal error");
                self.send_goaway(crate::error::Reason::INTERNAL_ERROR, None, true);
            }
        }
    }

    /// `exceptionCaught`-style propagation (§4.4, §14): an error surfacing
    /// from a handler adjacent to this engine (e.g. a transport I/O
    /// failure) is routed through the same classification as an
    /// internally-raised one.
    pub fn on_exception(&mut self, err: Error) {
        self.handle_error(err);
    }

    /// Graceful shutdown (§4.4). `error_driven` distinguishes a
    /// failure-triggered GOAWAY (closes immediately after the write
    /// completes) from a user-initiated one (waits for active streams to
    /// drain) — the distinction `foundry-rs/foundry`'s vendored
    /// `h2-0.3.26/src/proto/connection.rs` draws between an abrupt and a
    /// graceful GOAWAY (§14).
    pub fn send_goaway(
        &mut self,
        reason: crate::error::Reason,
        debug_data: Option<bytes::Bytes>,
        error_driven: bool,
    ) -> CompletionHandle {
        let already_sent = !matches!(self.shutdown, ShutdownState::Open);
        let last_announced = self.registry.remote().last_stream_created();

        let handle = if already_sent {
            let (tx, rx) = crate::proto::completion::pair();
            tx.succeed();
            rx
        } else {
            let mut frame = GoAway::new(last_announced, reason);
            if let Some(data) = debug_data {
                frame = frame.with_debug_data(data);
            }
            self.registry.remote_mut().set_go_away_received();
            self.write_goaway_frame(frame)
        };

        let active = self.registry.active_count();
        if !already_sent {
            self.shutdown = ShutdownState::GoAwaySent {
                pending_streams: active,
                last_announced,
            };
        } else if let ShutdownState::GoAwaySent { last_announced, .. } = self.shutdown {
            // §4.4 point 4: repeat invocations just refresh the pending count.
            self.shutdown = ShutdownState::GoAwaySent {
                pending_streams: active,
                last_announced,
            };
        }

        if error_driven || active == 0 {
            self.shutdown = ShutdownState::Closing;
            self.free_resources();
        } else if let ShutdownState::GoAwaySent { .. } = self.shutdown {
            tracing::debug!(parent: self.span.as_ref(), active, "goaway sent, draining active streams");
        }

        handle
    }

    /// User-initiated `close()` (§8 scenario 6): always graceful.
    pub fn close(&mut self) -> CompletionHandle {
        self.send_goaway(crate::error::Reason::NO_ERROR, None, false)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::frame::StreamId;
    use crate::listener::NoopListener;
    use crate::proto::codec::WireCodec;
    use crate::proto::config::Config;
    use crate::proto::flow::WindowFlowController;
    use crate::proto::peer::Role;
    use crate::proto::registry::StreamRegistry;
    use crate::proto::stream::StreamState;

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
    fn graceful_close_with_zero_active_streams_closes_immediately() {
        let mut conn = server();
        conn.close();
        assert!(conn.is_closed());
    }

    #[test]
    fn graceful_close_with_active_streams_waits_for_drain() {
        let mut conn = server();
        conn.registry.insert(StreamId::new(2), StreamState::Open);
        conn.registry.remote_mut().record_stream_created(StreamId::new(2));
        conn.close();
        assert!(!conn.is_closed());

        conn.registry.remove(StreamId::new(2));
        conn.check_close_cascade();
        assert!(conn.is_closed());
    }

    #[test]
    fn error_driven_goaway_closes_immediately_even_with_active_streams() {
        let mut conn = server();
        conn.registry.insert(StreamId::new(2), StreamState::Open);
        conn.handle_error(Error::connection(crate::error::Reason::PROTOCOL_ERROR));
        assert!(conn.is_closed());
    }

    #[test]
    fn stream_error_rst_streams_without_closing_connection() {
        let mut conn = server();
        conn.registry.insert(StreamId::new(2), StreamState::Open);
        conn.handle_error(Error::stream(StreamId::new(2), crate::error::Reason::PROTOCOL_ERROR));
        assert!(!conn.is_closed());
        assert!(conn.registry.get(StreamId::new(2)).is_none());
    }
}
