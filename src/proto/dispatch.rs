//! `InboundDispatcher` (§4.2): consumes frame events from the codec,
//! validates preconditions, drives stream-state transitions, and fans out
//! to the application listener.

use crate::error::{Error, Reason};
use crate::frame::{Frame, StreamId};
use crate::listener::Listener;
use crate::proto::codec::FrameCodec;
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
    /// Entry point for newly-arrived transport bytes: first satisfies the
    /// server-side literal preface match (§4.1), then hands whatever
    /// remains to the frame codec and dispatches every frame it yields, in
    /// wire order (§5's ordering guarantee).
    pub fn decode(&mut self, bytes: &[u8]) -> Result<(), Error> {
        let remainder = match self.recv_preface_bytes(bytes)? {
            Some(rest) => rest,
            None => return Ok(()), // preface not yet fully matched
        };

        let mut frames = Vec::new();
        self.codec.decode(remainder, &mut frames)?;
        for frame in frames {
            // §7: "the dispatch loop catches it and routes through
            // onHttp2Exception" -- a stream error here must not abort
            // processing of frames still queued from this same read.
            if let Err(err) = self.dispatch(frame) {
                self.handle_error(err);
                if self.is_closed() {
                    break;
                }
            }
        }
        Ok(())
    }

    pub fn dispatch(&mut self, frame: Frame) -> Result<(), Error> {
        // Step 1: every frame but the preface-completing SETTINGS requires
        // the handshake to be done.
        let is_preface_settings = matches!(&frame, Frame::Settings(s) if !s.is_ack()) && !self.preface_received;
        if !self.preface_complete() && !is_preface_settings {
            return Err(Error::connection(Reason::PROTOCOL_ERROR));
        }

        let id = frame.stream_id();

        // Step 3/4: drop frames the connection has already decided to
        // disregard (GOAWAY-sent cutoff, or RST_STREAM already sent for
        // this stream) rather than resurrect stream state for them.
        if !id.is_zero() && self.should_ignore_frame(id) {
            tracing::trace!(parent: self.span.as_ref(), stream = %id, "ignoring frame on cut-off stream");
            return Ok(());
        }

        match frame {
            Frame::Data(f) => {
                let stream = self
                    .registry
                    .get_mut(id)
                    .ok_or_else(|| Error::stream(id, Reason::STREAM_CLOSED))?;
                stream.require_state(&[StreamState::Open, StreamState::HalfClosedLocal])?;

                let end_stream = f.is_end_stream();
                self.flow.on_data_read(id, f.flow_len());
                self.listener.on_data_read(id, f.payload(), end_stream);

                if end_stream {
                    self.close_remote_and_cascade(id)?;
                }
                Ok(())
            }
            Frame::Headers(f) => {
                let end_stream = f.is_end_stream();
                let priority = f.priority();

                match self.registry.get_mut(id) {
                    None => {
                        let state = if end_stream {
                            StreamState::HalfClosedRemote
                        } else {
                            StreamState::Open
                        };
                        let stream = self.registry.insert(id, state);
                        if let Some(p) = priority {
                            stream.set_priority(p);
                        }
                        self.registry.remote_mut().record_stream_created(id);
                    }
                    Some(stream) => {
                        if stream.state() == StreamState::ReservedRemote {
                            stream.open_for_push();
                        } else {
                            stream.require_state(&[
                                StreamState::Open,
                                StreamState::HalfClosedLocal,
                            ])?;
                        }
                        if let Some(p) = priority {
                            stream.set_priority(p);
                        }
                    }
                }

                match priority {
                    Some(p) => self.listener.on_headers_read_with_priority(id, p, end_stream),
                    None => self.listener.on_headers_read(id, end_stream),
                }

                if end_stream {
                    self.close_remote_and_cascade(id)?;
                }
                Ok(())
            }
            Frame::Priority(f) => {
                if let Some(stream) = self.registry.get_mut(id) {
                    if stream.state() == StreamState::Closed {
                        return Ok(());
                    }
                    stream.set_priority(f.fields());
                }
                self.listener.on_priority_read(id, f.fields());
                Ok(())
            }
            Frame::RstStream(f) => {
                match self.registry.get_mut(id) {
                    None => return Ok(()),
                    Some(stream) => {
                        if stream.state() == StreamState::Closed {
                            return Ok(()); // §8: no-op on an already-closed stream
                        }
                        stream.set_reset_received();
                    }
                }
                self.registry.remove(id);
                self.listener.on_rst_stream_read(&f);
                self.check_close_cascade();
                Ok(())
            }
            Frame::Settings(f) => {
                if f.is_ack() {
                    self.consume_pending_settings_ack();
                    self.listener.on_settings_ack_read();
                } else {
                    self.apply_remote_settings(&f)?;
                    self.preface_received = true;
                    self.codec.write_settings_ack();
                    self.listener.on_settings_read(&f);
                }
                Ok(())
            }
            Frame::Ping(f) => {
                if f.is_ack() {
                    if self.outstanding_ping == Some(f.payload()) {
                        self.outstanding_ping = None;
                    }
                    self.listener.on_ping_ack_read(f.payload());
                } else {
                    self.codec.write_ping(crate::frame::Ping::pong(f.payload()));
                    self.listener.on_ping_read(f.payload());
                }
                Ok(())
            }
            Frame::GoAway(f) => {
                self.registry.local_mut().set_go_away_received();
                self.listener.on_goaway_read(&f);
                Ok(())
            }
            Frame::PushPromise(f) => {
                let parent = f.stream_id();
                if self.registry.get(parent).is_none() || self.should_ignore_frame(parent) {
                    return Err(Error::stream(parent, Reason::PROTOCOL_ERROR));
                }
                if !self.registry.local().push_allowed() {
                    return Err(Error::connection(Reason::PROTOCOL_ERROR));
                }
                let promised = f.promised_id();
                self.registry.insert(promised, StreamState::ReservedRemote);
                self.registry.remote_mut().record_stream_created(promised);
                self.listener.on_push_promise_read(&f);
                Ok(())
            }
            Frame::WindowUpdate(f) => {
                if let Some(stream) = self.registry.get(id) {
                    if stream.state() == StreamState::Closed {
                        return Ok(());
                    }
                }
                self.flow
                    .update_outbound_window_size(id, f.size_increment() as i64)?;
                self.listener.on_window_update_read(id, f.size_increment());
                Ok(())
            }
            Frame::Unknown(id, kind) => {
                // RFC 7540 §4.1: unknown frame types are ignored, but still
                // surfaced to the listener.
                self.listener.on_unknown_frame(id, kind);
                Ok(())
            }
        }
    }

    fn close_remote_and_cascade(&mut self, id: StreamId) -> Result<(), Error> {
        if let Some(stream) = self.registry.get_mut(id) {
            stream.recv_end_stream();
            if stream.state() == StreamState::Closed {
                self.registry.remove(id);
            }
        }
        self.check_close_cascade();
        Ok(())
    }
}
