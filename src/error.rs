//! The error taxonomy for the engine: connection-level vs. stream-level
//! failures, plus the special-cased `FRAME_SIZE_ERROR` and internal-error
//! wrapping described in the handshake/dispatch design.

use std::fmt;

use crate::frame::StreamId;

/// An HTTP/2 error code (RFC 7540 §7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Reason(u32);

impl Reason {
    pub const NO_ERROR: Reason = Reason(0x0);
    pub const PROTOCOL_ERROR: Reason = Reason(0x1);
    pub const INTERNAL_ERROR: Reason = Reason(0x2);
    pub const FLOW_CONTROL_ERROR: Reason = Reason(0x3);
    pub const SETTINGS_TIMEOUT: Reason = Reason(0x4);
    pub const STREAM_CLOSED: Reason = Reason(0x5);
    pub const FRAME_SIZE_ERROR: Reason = Reason(0x6);
    pub const REFUSED_STREAM: Reason = Reason(0x7);
    pub const CANCEL: Reason = Reason(0x8);
    pub const COMPRESSION_ERROR: Reason = Reason(0x9);
    pub const CONNECT_ERROR: Reason = Reason(0xa);
    pub const ENHANCE_YOUR_CALM: Reason = Reason(0xb);
    pub const INADEQUATE_SECURITY: Reason = Reason(0xc);
    pub const HTTP_1_1_REQUIRED: Reason = Reason(0xd);

    pub fn new(code: u32) -> Reason {
        Reason(code)
    }

    pub fn into_wire(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match *self {
            Reason::NO_ERROR => "NO_ERROR",
            Reason::PROTOCOL_ERROR => "PROTOCOL_ERROR",
            Reason::INTERNAL_ERROR => "INTERNAL_ERROR",
            Reason::FLOW_CONTROL_ERROR => "FLOW_CONTROL_ERROR",
            Reason::SETTINGS_TIMEOUT => "SETTINGS_TIMEOUT",
            Reason::STREAM_CLOSED => "STREAM_CLOSED",
            Reason::FRAME_SIZE_ERROR => "FRAME_SIZE_ERROR",
            Reason::REFUSED_STREAM => "REFUSED_STREAM",
            Reason::CANCEL => "CANCEL",
            Reason::COMPRESSION_ERROR => "COMPRESSION_ERROR",
            Reason::CONNECT_ERROR => "CONNECT_ERROR",
            Reason::ENHANCE_YOUR_CALM => "ENHANCE_YOUR_CALM",
            Reason::INADEQUATE_SECURITY => "INADEQUATE_SECURITY",
            Reason::HTTP_1_1_REQUIRED => "HTTP_1_1_REQUIRED",
            Reason(other) => return write!(f, "UNKNOWN({})", other),
        };
        f.write_str(name)
    }
}

/// Taxonomy of failures the engine can raise while driving a connection.
///
/// `Connection` and `FrameSize` are both handled by emitting `GOAWAY` and
/// latching the connection into shutdown; `FrameSize` is kept as its own
/// variant for an out-of-range `max_frame_size` in a peer's SETTINGS, so
/// callers can distinguish it from a general protocol violation.
#[derive(Debug, Clone)]
pub enum Error {
    /// A condition that affects the whole connection. Responded to with
    /// `GOAWAY` and a graceful drain.
    Connection(Reason),
    /// A condition local to one stream. Responded to with `RST_STREAM`;
    /// the connection survives.
    Stream { id: StreamId, reason: Reason },
    /// Peer's SETTINGS carried an out-of-range `max_frame_size`.
    FrameSize(Reason),
    /// Any non-protocol failure escaping the dispatch loop (e.g. a
    /// transport I/O error). Treated as connection-level with
    /// `INTERNAL_ERROR`.
    Internal(String),
}

impl Error {
    pub fn stream(id: StreamId, reason: Reason) -> Error {
        Error::Stream { id, reason }
    }

    pub fn connection(reason: Reason) -> Error {
        Error::Connection(reason)
    }

    pub fn frame_size() -> Error {
        Error::FrameSize(Reason::FRAME_SIZE_ERROR)
    }

    pub fn internal<S: Into<String>>(msg: S) -> Error {
        Error::Internal(msg.into())
    }

    /// True if this error terminates only a single stream.
    pub fn is_stream_level(&self) -> bool {
        matches!(self, Error::Stream { .. })
    }

    /// The `Reason` to report on the wire for this error (the code carried
    /// by `RST_STREAM` or `GOAWAY`).
    pub fn reason(&self) -> Reason {
        match *self {
            Error::Connection(reason) => reason,
            Error::Stream { reason, .. } => reason,
            Error::FrameSize(reason) => reason,
            Error::Internal(_) => Reason::INTERNAL_ERROR,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Connection(reason) => write!(f, "connection error: {}", reason),
            Error::Stream { id, reason } => {
                write!(f, "stream error on {:?}: {}", id, reason)
            }
            Error::FrameSize(reason) => write!(f, "frame size error: {}", reason),
            Error::Internal(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}
