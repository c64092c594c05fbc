//! `OutboundGate` (§4.3): the application write surface. Writes that would
//! start something new (a fresh stream, PUSH_PROMISE, PING, SETTINGS)
//! refuse once the connection is GOAWAY; writes that drain an
//! already-open stream (DATA, an existing stream's HEADERS, RST_STREAM,
//! PRIORITY, WINDOW_UPDATE) are let through so §8 scenario 6's drain can
//! complete.

use bytes::Bytes;

use crate::error::{Error, Reason};
use crate::frame::{GoAway, Headers, Ping, PingPayload, Priority, PushPromise, RstStream, Settings, StreamId};
use crate::listener::Listener;
use crate::proto::codec::FrameCodec;
use crate::proto::completion::CompletionHandle;
use crate::proto::flow::FlowController;
use crate::proto::registry::ConnectionRegistry;
use crate::proto::stream::StreamState;

use super::connection::Connection;

impl<C, F, R, L> Connection<C, F, R, L>
where
    C: FrameCodec,
    F: FlowController,
    R: ConnectionRegistry,
    L: Listener,
{
    /// Refuses only the creation of *new* locally-initiated streams once
    /// GOAWAY is in play (§4.4/§8 scenario 6: existing streams keep
    /// draining via RST_STREAM or an end-of-stream write after close()).
    fn guard_not_go_away(&self) -> Result<(), Error> {
        if self.is_go_away() {
            Err(Error::internal("write refused: connection is going away"))
        } else {
            Ok(())
        }
    }

    /// Requires `OPEN` or `HALF_CLOSED_REMOTE` (§4.3): the stream may still
    /// send.
    fn require_sendable(&self, id: StreamId) -> Result<(), Error> {
        let stream = self
            .registry
            .get(id)
            .ok_or_else(|| Error::stream(id, Reason::STREAM_CLOSED))?;
        stream.require_state(&[StreamState::Open, StreamState::HalfClosedRemote])
    }

    /// §4.3: "On completion success and `end_stream`, close the local
    /// side... On completion failure, route cause through
    /// StateAndErrorEngine." The reference `FlowController` resolves
    /// synchronously, so the outcome is already known by the time
    /// `write_data` returns to `on_done`'s queue; an async embedder's
    /// controller would instead resolve this later, off the immediate call
    /// stack, so both paths are handled: the synchronous check below covers
    /// the reference controller, and `on_done` covers a real async one.
    pub fn write_data(
        &mut self,
        id: StreamId,
        payload: Bytes,
        padding: u8,
        end_stream: bool,
    ) -> Result<CompletionHandle, Error> {
        self.require_sendable(id)?;

        let handle = self.flow.write_data(id, payload, padding, end_stream);

        match handle.try_result() {
            Some(Ok(())) => {
                if end_stream {
                    self.close_local_and_cascade(id);
                }
            }
            Some(Err(err)) => {
                self.handle_error(err);
            }
            None => {
                // Not yet resolved; caller/embedder is responsible for
                // observing the handle and routing a later failure through
                // `on_exception`, since this engine does not poll futures
                // (§5: "The engine performs no blocking I/O").
            }
        }
        Ok(handle)
    }

    /// Creates the stream locally if absent (new `OPEN`/`HALF_CLOSED_LOCAL`
    /// per `end_stream`); opens it for push if `RESERVED_LOCAL`; otherwise
    /// requires `OPEN`/`HALF_CLOSED_REMOTE`. Priority may only be set when
    /// the headers are not also ending the stream (§4.3).
    pub fn write_headers(
        &mut self,
        id: StreamId,
        header_block: Bytes,
        priority: Option<Priority>,
        end_stream: bool,
    ) -> Result<CompletionHandle, Error> {
        if self.registry.get(id).is_none() {
            self.guard_not_go_away()?;
        }

        match self.registry.get_mut(id) {
            None => {
                let state = if end_stream {
                    StreamState::HalfClosedLocal
                } else {
                    StreamState::Open
                };
                let stream = self.registry.insert(id, state);
                if let (Some(p), false) = (priority, end_stream) {
                    stream.set_priority(p);
                }
                self.registry.local_mut().record_stream_created(id);
            }
            Some(stream) => {
                if stream.state() == StreamState::ReservedLocal {
                    stream.open_for_push();
                } else {
                    stream.require_state(&[StreamState::Open, StreamState::HalfClosedRemote])?;
                }
                if let (Some(p), false) = (priority, end_stream) {
                    stream.set_priority(p);
                }
            }
        }

        let mut frame = Headers::new(id, header_block, end_stream);
        if let (Some(p), false) = (priority, end_stream) {
            frame = frame.with_priority(p);
        }
        let handle = self.codec.write_headers(frame);

        if end_stream {
            self.close_local_and_cascade(id);
        }
        Ok(handle)
    }

    pub fn write_priority(&mut self, id: StreamId, priority: Priority) -> Result<CompletionHandle, Error> {
        if let Some(stream) = self.registry.get_mut(id) {
            stream.set_priority(priority);
        }
        Ok(self.codec.write_priority(id, priority))
    }

    /// Writing RST_STREAM for an unknown stream succeeds silently (§8).
    pub fn write_rst_stream(&mut self, id: StreamId, reason: Reason) -> Result<CompletionHandle, Error> {
        let Some(stream) = self.registry.get_mut(id) else {
            let (tx, rx) = crate::proto::completion::pair();
            tx.succeed();
            return Ok(rx);
        };
        stream.set_reset_sent();
        self.registry.remove(id);
        let handle = self.codec.write_rst_stream(RstStream::new(id, reason));
        self.check_close_cascade();
        Ok(handle)
    }

    /// Appends to PendingSettings *before* emission; a server including
    /// `enable_push` is rejected (§4.3: only clients advertise push
    /// support).
    pub fn write_settings(&mut self, settings: Settings) -> Result<CompletionHandle, Error> {
        self.guard_not_go_away()?;
        if self.role.is_server() && settings.enable_push().is_some() {
            return Err(Error::internal("server may not send enable_push"));
        }
        self.enqueue_local_settings(settings.clone())?;
        Ok(self.codec.write_settings(settings))
    }

    pub fn write_ping(&mut self, payload: PingPayload) -> Result<CompletionHandle, Error> {
        self.guard_not_go_away()?;
        self.outstanding_ping = Some(payload);
        Ok(self.codec.write_ping(Ping::new(payload, false)))
    }

    /// Thin pass-through with a reservation side effect: creates
    /// `promised_id` as `RESERVED_LOCAL`, parented at `id`.
    pub fn write_push_promise(
        &mut self,
        id: StreamId,
        promised_id: StreamId,
        header_block: Bytes,
    ) -> Result<CompletionHandle, Error> {
        self.guard_not_go_away()?;
        if self.registry.get(id).is_none() {
            return Err(Error::stream(id, Reason::PROTOCOL_ERROR));
        }
        if !self.registry.remote().push_allowed() {
            return Err(Error::connection(Reason::PROTOCOL_ERROR));
        }
        self.registry.insert(promised_id, StreamState::ReservedLocal);
        self.registry.local_mut().record_stream_created(promised_id);
        Ok(self
            .codec
            .write_push_promise(PushPromise::new(id, promised_id, header_block)))
    }

    pub fn write_window_update(&mut self, id: StreamId, increment: u32) -> Result<CompletionHandle, Error> {
        self.guard_not_go_away()?;
        Ok(self
            .codec
            .write_window_update(crate::frame::WindowUpdate::new(id, increment)))
    }

    /// `GOAWAY` is emitted by `StateAndErrorEngine::send_goaway`, not here
    /// directly; this thin helper exists for callers that only need the
    /// raw frame write without the shutdown-sequencing side effects (e.g.
    /// retransmitting after a transient failure).
    pub(crate) fn write_goaway_frame(&mut self, frame: GoAway) -> CompletionHandle {
        self.codec.write_goaway(frame)
    }

    fn close_local_and_cascade(&mut self, id: StreamId) {
        if let Some(stream) = self.registry.get_mut(id) {
            stream.send_end_stream();
            if stream.state() == StreamState::Closed {
                self.registry.remove(id);
            }
        }
        self.check_close_cascade();
    }
}
