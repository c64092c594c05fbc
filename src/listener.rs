//! The application-facing listener interface (§6, §9): one callback per
//! inbound frame kind, each with a no-op default so implementations
//! override only what they care about. A plain capability-set trait with
//! a default-impl adapter, the same shape public write-side types
//! elsewhere in this crate take for selectively-overridden behavior.

use bytes::Bytes;

use crate::frame::{GoAway, Kind, Priority, PushPromise, RstStream, Settings, StreamId, WindowUpdate};

#[allow(unused_variables)]
pub trait Listener {
    fn on_data_read(&mut self, stream_id: StreamId, payload: &Bytes, end_stream: bool) {}

    /// HEADERS without an associated PRIORITY block.
    fn on_headers_read(&mut self, stream_id: StreamId, end_stream: bool) {}

    /// HEADERS carrying a PRIORITY block (the "two arities" §6 calls for).
    fn on_headers_read_with_priority(
        &mut self,
        stream_id: StreamId,
        priority: Priority,
        end_stream: bool,
    ) {
    }

    fn on_priority_read(&mut self, stream_id: StreamId, priority: Priority) {}

    fn on_rst_stream_read(&mut self, frame: &RstStream) {}

    fn on_settings_read(&mut self, settings: &Settings) {}

    fn on_settings_ack_read(&mut self) {}

    fn on_ping_read(&mut self, payload: [u8; 8]) {}

    fn on_ping_ack_read(&mut self, payload: [u8; 8]) {}

    fn on_push_promise_read(&mut self, frame: &PushPromise) {}

    fn on_goaway_read(&mut self, frame: &GoAway) {}

    fn on_window_update_read(&mut self, stream_id: StreamId, increment: u32) {}

    fn on_unknown_frame(&mut self, stream_id: StreamId, kind: Kind) {}
}

/// A listener that ignores every callback. Useful for tests and for
/// embedders that drive the engine purely through its return values.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopListener;

impl Listener for NoopListener {}
