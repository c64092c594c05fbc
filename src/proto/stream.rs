//! The per-stream state machine (RFC 7540 §5.1) and the data carried
//! alongside it.
//!
//! Kept as the flat seven-member enum §3 calls for directly, rather than
//! splitting local/remote half-states into nested sub-variants reached
//! through a cause-driven transition API, while keeping the same
//! transition entry-point shape (`send_*`/`recv_*` methods returning a
//! `Result`).

use std::fmt;

use crate::error::{Error, Reason};
use crate::frame::{Priority, StreamId};

/// A stream's position in the RFC 7540 §5.1 lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Idle,
    ReservedLocal,
    ReservedRemote,
    Open,
    HalfClosedLocal,
    HalfClosedRemote,
    Closed,
}

impl StreamState {
    pub fn is_closed(self) -> bool {
        matches!(self, StreamState::Closed)
    }

    pub fn is_open(self) -> bool {
        matches!(self, StreamState::Open)
    }

    /// End-of-stream cascade on the *remote* side (§4.2): an inbound frame
    /// carrying `END_STREAM` closes the stream's receiving half.
    pub fn close_remote(self) -> StreamState {
        match self {
            StreamState::Open => StreamState::HalfClosedRemote,
            StreamState::HalfClosedRemote => StreamState::Closed,
            _ => StreamState::Closed,
        }
    }

    /// End-of-stream cascade on the *local* side (§4.3): an outbound write
    /// carrying `END_STREAM` closes the stream's sending half.
    pub fn close_local(self) -> StreamState {
        match self {
            StreamState::Open => StreamState::HalfClosedLocal,
            StreamState::HalfClosedLocal => StreamState::Closed,
            _ => StreamState::Closed,
        }
    }
}

impl fmt::Display for StreamState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StreamState::Idle => "idle",
            StreamState::ReservedLocal => "reserved (local)",
            StreamState::ReservedRemote => "reserved (remote)",
            StreamState::Open => "open",
            StreamState::HalfClosedLocal => "half-closed (local)",
            StreamState::HalfClosedRemote => "half-closed (remote)",
            StreamState::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// A stream's data-model record (§3): identity, state, priority, and the
/// two reset-observation flags.
#[derive(Debug, Clone)]
pub struct Stream {
    id: StreamId,
    state: StreamState,
    priority: Priority,
    terminate_sent: bool,
    terminate_received: bool,
}

impl Stream {
    pub fn new(id: StreamId, state: StreamState) -> Stream {
        Stream {
            id,
            state,
            priority: Priority::default(),
            terminate_sent: false,
            terminate_received: false,
        }
    }

    pub fn id(&self) -> StreamId {
        self.id
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
    }

    pub fn terminate_sent(&self) -> bool {
        self.terminate_sent
    }

    pub fn terminate_received(&self) -> bool {
        self.terminate_received
    }

    /// Validates that a frame kind allowed in `states` may act on this
    /// stream, per the §4.2 per-frame state gate table. CLOSED is the
    /// universal violation: raises a stream-level error.
    pub fn require_state(&self, allowed: &[StreamState]) -> Result<(), Error> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(Error::stream(self.id, Reason::PROTOCOL_ERROR))
        }
    }

    /// Applies the end-of-stream cascade to the remote (receiving) half.
    pub fn recv_end_stream(&mut self) {
        self.state = self.state.close_remote();
    }

    /// Applies the end-of-stream cascade to the local (sending) half.
    pub fn send_end_stream(&mut self) {
        self.state = self.state.close_local();
    }

    /// A HEADERS frame referencing a RESERVED_REMOTE stream opens it for
    /// push (§4.2's "then opens for push").
    pub fn open_for_push(&mut self) {
        if self.state == StreamState::ReservedRemote {
            self.state = StreamState::HalfClosedLocal;
        }
    }

    /// RST_STREAM was emitted for this stream: mark `terminate_sent` and
    /// transition to CLOSED (§4.4).
    pub fn set_reset_sent(&mut self) {
        self.terminate_sent = true;
        self.state = StreamState::Closed;
    }

    /// RST_STREAM was observed for this stream (§4.2/§8: a no-op when
    /// already CLOSED).
    pub fn set_reset_received(&mut self) {
        self.terminate_received = true;
        self.state = StreamState::Closed;
    }

    pub fn set_state(&mut self, state: StreamState) {
        self.state = state;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn end_of_stream_cascades_open_to_half_closed_then_closed() {
        let mut s = Stream::new(StreamId::new(3), StreamState::Open);
        s.recv_end_stream();
        assert_eq!(s.state(), StreamState::HalfClosedRemote);
        s.send_end_stream();
        assert_eq!(s.state(), StreamState::Closed);
    }

    #[test]
    fn reserved_remote_opens_for_push_into_half_closed_local() {
        let mut s = Stream::new(StreamId::new(2), StreamState::ReservedRemote);
        s.open_for_push();
        assert_eq!(s.state(), StreamState::HalfClosedLocal);
    }

    #[test]
    fn state_gate_rejects_disallowed_state() {
        let s = Stream::new(StreamId::new(5), StreamState::Idle);
        assert!(s
            .require_state(&[StreamState::Open, StreamState::HalfClosedLocal])
            .is_err());
    }
}
