//! Frame types for the subset of RFC 7540 this engine dispatches.
//!
//! Wire parsing of HPACK-encoded header blocks is out of scope (§1); a
//! `HEADERS`/`PUSH_PROMISE` header block is carried as an opaque `Bytes`
//! fragment that a real embedder's HPACK codec would have already
//! produced or would decode independently.

mod data;
mod goaway;
mod head;
mod headers;
mod ping;
mod priority;
mod reset;
mod settings;
mod window_update;

pub use self::data::Data;
pub use self::goaway::GoAway;
pub use self::head::{Kind, Priority, StreamId, DEFAULT_WEIGHT};
pub use self::headers::{Headers, PushPromise};
pub use self::ping::{Ping, PingPayload};
pub use self::priority::Priority as PriorityFrame;
pub use self::reset::RstStream;
pub use self::settings::{
    clamp_max_concurrent_streams, Settings, DEFAULT_INITIAL_WINDOW_SIZE,
    DEFAULT_MAX_FRAME_SIZE, DEFAULT_SETTINGS_HEADER_TABLE_SIZE, MAX_INITIAL_WINDOW_SIZE,
    MAX_MAX_FRAME_SIZE,
};
pub use self::window_update::WindowUpdate;

/// The 9-octet frame header length shared by every frame kind.
pub const HEADER_LEN: usize = 9;

/// The literal 24-octet HTTP/2 connection preface every client must send
/// first (RFC 7540 §3.5).
pub const CLIENT_PREFACE: &[u8; 24] = b"PRI * HTTP/2.0\r\n\r\nSM\r\n\r\n";

/// A decoded inbound frame, as produced by a `FrameCodec`.
#[derive(Debug, Clone)]
pub enum Frame {
    Data(Data),
    Headers(Headers),
    Priority(PriorityFrame),
    RstStream(RstStream),
    Settings(Settings),
    PushPromise(PushPromise),
    Ping(Ping),
    GoAway(GoAway),
    WindowUpdate(WindowUpdate),
    /// An unrecognized frame kind, passed through to
    /// `Listener::on_unknown_frame` per RFC 7540 §4.1 ("implementations
    /// MUST ignore and discard frames of unknown types").
    Unknown(StreamId, Kind),
}

impl Frame {
    pub fn stream_id(&self) -> StreamId {
        match self {
            Frame::Data(f) => f.stream_id(),
            Frame::Headers(f) => f.stream_id(),
            Frame::Priority(f) => f.stream_id(),
            Frame::RstStream(f) => f.stream_id(),
            Frame::Settings(_) => StreamId::CONNECTION,
            Frame::PushPromise(f) => f.stream_id(),
            Frame::Ping(_) => StreamId::CONNECTION,
            Frame::GoAway(_) => StreamId::CONNECTION,
            Frame::WindowUpdate(f) => f.stream_id(),
            Frame::Unknown(id, _) => *id,
        }
    }
}
