use bytes::{Bytes, BufMut, BytesMut};

use crate::error::Reason;
use crate::frame::head::{Kind, StreamId};

/// A GOAWAY frame: the last stream ID the sender processed, the reason, and
/// an optional opaque debug payload (RFC 7540 §6.8).
#[derive(Debug, Clone)]
pub struct GoAway {
    last_stream_id: StreamId,
    reason: Reason,
    debug_data: Bytes,
}

impl GoAway {
    pub fn new(last_stream_id: StreamId, reason: Reason) -> GoAway {
        GoAway {
            last_stream_id,
            reason,
            debug_data: Bytes::new(),
        }
    }

    pub fn with_debug_data(mut self, data: Bytes) -> GoAway {
        self.debug_data = data;
        self
    }

    pub fn last_stream_id(&self) -> StreamId {
        self.last_stream_id
    }

    pub fn reason(&self) -> Reason {
        self.reason
    }

    pub fn debug_data(&self) -> &Bytes {
        &self.debug_data
    }

    pub fn encode(&self, dst: &mut BytesMut) {
        let len = 8 + self.debug_data.len();
        dst.put_uint(len as u64, 3);
        dst.put_u8(Kind::GoAway.wire_value());
        dst.put_u8(0);
        dst.put_u32(0);
        dst.put_u32(self.last_stream_id.as_u32());
        dst.put_u32(self.reason.into_wire());
        dst.put_slice(&self.debug_data);
    }
}
