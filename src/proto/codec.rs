//! The `FrameCodec` external collaborator (§2, §6): parses inbound bytes
//! into frame events and serialises outbound frames, each write returning a
//! completion handle.
//!
//! §6 separately names a "Transport" and a "FrameCodec" role; here
//! `FrameCodec` owns byte egress directly as well as frame encoding,
//! rather than keeping a distinct transport abstraction the writer
//! delegates to.

use bytes::{Bytes, BytesMut};

use crate::error::Error;
use crate::frame::{Frame, GoAway, Headers, Ping, Priority, PushPromise, RstStream, Settings, StreamId, WindowUpdate};
use crate::proto::completion::CompletionHandle;

/// Everything the engine needs from the wire layer: decoding inbound bytes
/// into `Frame`s and encoding outbound frames as bytes.
///
/// A production embedder supplies an implementation backed by a real HPACK
/// codec; see `WireCodec` below for a reference implementation sufficient
/// to drive this crate's own test suite (header blocks pass through
/// opaquely, matching the Non-goal that HPACK itself is out of scope).
pub trait FrameCodec {
    /// Feeds newly-arrived bytes in; any frames fully decoded are appended
    /// to `out` in wire order. Returns a connection error if the byte
    /// stream is malformed at the framing layer.
    fn decode(&mut self, bytes: &[u8], out: &mut Vec<Frame>) -> Result<(), Error>;

    fn max_header_table_size(&self) -> u32;
    fn set_max_header_table_size(&mut self, size: u32);

    fn max_frame_size(&self) -> u32;
    fn set_max_frame_size(&mut self, size: u32);

    fn max_header_list_size(&self) -> Option<u32>;
    fn set_max_header_list_size(&mut self, size: Option<u32>);

    /// Writes the literal 24-octet client preface.
    fn write_preface(&mut self) -> CompletionHandle;

    fn write_data(
        &mut self,
        id: StreamId,
        payload: Bytes,
        padding: u8,
        end_stream: bool,
    ) -> CompletionHandle;
    fn write_headers(&mut self, frame: Headers) -> CompletionHandle;
    fn write_priority(&mut self, id: StreamId, priority: Priority) -> CompletionHandle;
    fn write_rst_stream(&mut self, frame: RstStream) -> CompletionHandle;
    fn write_settings(&mut self, frame: Settings) -> CompletionHandle;
    fn write_settings_ack(&mut self) -> CompletionHandle;
    fn write_ping(&mut self, frame: Ping) -> CompletionHandle;
    fn write_push_promise(&mut self, frame: PushPromise) -> CompletionHandle;
    fn write_goaway(&mut self, frame: GoAway) -> CompletionHandle;
    fn write_window_update(&mut self, frame: WindowUpdate) -> CompletionHandle;

    /// Releases any codec-owned resources (RFC-mandated shutdown per §5
    /// `free_resources`).
    fn close(&mut self);
}

/// A reference `FrameCodec`: encodes real RFC 7540 wire bytes into an
/// in-memory buffer and decodes them back, with header blocks carried as
/// opaque bytes (no HPACK). Sufficient to reproduce the exact byte
/// sequences in §8's concrete scenarios and to drive the engine end to end
/// in tests.
pub struct WireCodec {
    out: BytesMut,
    max_header_table_size: u32,
    max_frame_size: u32,
    max_header_list_size: Option<u32>,
}

impl WireCodec {
    pub fn new() -> WireCodec {
        WireCodec {
            out: BytesMut::new(),
            max_header_table_size: crate::frame::DEFAULT_SETTINGS_HEADER_TABLE_SIZE,
            max_frame_size: crate::frame::DEFAULT_MAX_FRAME_SIZE,
            max_header_list_size: None,
        }
    }

    /// Drains and returns everything written to the wire so far. Tests use
    /// this to assert on exact byte sequences (§8 scenarios 1-2).
    pub fn take_written(&mut self) -> Bytes {
        std::mem::take(&mut self.out).freeze()
    }

    fn completed(&mut self, encoded: ()) -> CompletionHandle {
        let _ = encoded;
        let (tx, rx) = crate::proto::completion::pair();
        tx.succeed();
        rx
    }
}

impl Default for WireCodec {
    fn default() -> WireCodec {
        WireCodec::new()
    }
}

impl FrameCodec for WireCodec {
    fn decode(&mut self, bytes: &[u8], out: &mut Vec<Frame>) -> Result<(), Error> {
        crate::proto::wire::decode_frames(bytes, out)
    }

    fn max_header_table_size(&self) -> u32 {
        self.max_header_table_size
    }

    fn set_max_header_table_size(&mut self, size: u32) {
        self.max_header_table_size = size;
    }

    fn max_frame_size(&self) -> u32 {
        self.max_frame_size
    }

    fn set_max_frame_size(&mut self, size: u32) {
        self.max_frame_size = size;
    }

    fn max_header_list_size(&self) -> Option<u32> {
        self.max_header_list_size
    }

    fn set_max_header_list_size(&mut self, size: Option<u32>) {
        self.max_header_list_size = size;
    }

    fn write_preface(&mut self) -> CompletionHandle {
        self.out.extend_from_slice(crate::frame::CLIENT_PREFACE);
        self.completed(())
    }

    fn write_data(
        &mut self,
        id: StreamId,
        payload: Bytes,
        padding: u8,
        end_stream: bool,
    ) -> CompletionHandle {
        crate::frame::Data::new(id, payload, padding, end_stream).encode(&mut self.out);
        self.completed(())
    }

    fn write_headers(&mut self, frame: Headers) -> CompletionHandle {
        frame.encode(&mut self.out);
        self.completed(())
    }

    fn write_priority(&mut self, id: StreamId, priority: Priority) -> CompletionHandle {
        crate::frame::PriorityFrame::new(id, priority).encode(&mut self.out);
        self.completed(())
    }

    fn write_rst_stream(&mut self, frame: RstStream) -> CompletionHandle {
        frame.encode(&mut self.out);
        self.completed(())
    }

    fn write_settings(&mut self, frame: Settings) -> CompletionHandle {
        frame.encode(&mut self.out);
        self.completed(())
    }

    fn write_settings_ack(&mut self) -> CompletionHandle {
        Settings::ack().encode(&mut self.out);
        self.completed(())
    }

    fn write_ping(&mut self, frame: Ping) -> CompletionHandle {
        frame.encode(&mut self.out);
        self.completed(())
    }

    fn write_push_promise(&mut self, frame: PushPromise) -> CompletionHandle {
        frame.encode(&mut self.out);
        self.completed(())
    }

    fn write_goaway(&mut self, frame: GoAway) -> CompletionHandle {
        frame.encode(&mut self.out);
        self.completed(())
    }

    fn write_window_update(&mut self, frame: WindowUpdate) -> CompletionHandle {
        frame.encode(&mut self.out);
        self.completed(())
    }

    fn close(&mut self) {
        self.out.clear();
    }
}
