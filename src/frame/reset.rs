use bytes::{BufMut, BytesMut};

use crate::error::Reason;
use crate::frame::head::{Kind, StreamId};

/// A RST_STREAM frame: abruptly terminates a single stream
/// (RFC 7540 §6.4).
#[derive(Debug, Clone, Copy)]
pub struct RstStream {
    id: StreamId,
    reason: Reason,
}

impl RstStream {
    pub fn new(id: StreamId, reason: Reason) -> RstStream {
        RstStream { id, reason }
    }

    pub fn stream_id(&self) -> StreamId {
        self.id
    }

    pub fn reason(&self) -> Reason {
        self.reason
    }

    pub fn encode(&self, dst: &mut BytesMut) {
        dst.put_uint(4, 3);
        dst.put_u8(Kind::RstStream.wire_value());
        dst.put_u8(0);
        dst.put_u32(self.id.as_u32());
        dst.put_u32(self.reason.into_wire());
    }
}
