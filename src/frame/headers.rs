use bytes::{Bytes, BufMut, BytesMut};

use crate::frame::head::{Kind, Priority, StreamId};

/// A HEADERS frame.
///
/// The header block itself is treated as an opaque, already-HPACK-encoded
/// fragment (`Bytes`): HPACK encoding/decoding is the frame codec's
/// concern, external to this engine (see `proto::codec::FrameCodec`).
#[derive(Debug, Clone)]
pub struct Headers {
    id: StreamId,
    header_block: Bytes,
    priority: Option<Priority>,
    end_stream: bool,
}

impl Headers {
    pub fn new(id: StreamId, header_block: Bytes, end_stream: bool) -> Headers {
        Headers {
            id,
            header_block,
            priority: None,
            end_stream,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Headers {
        self.priority = Some(priority);
        self
    }

    pub fn stream_id(&self) -> StreamId {
        self.id
    }

    pub fn header_block(&self) -> &Bytes {
        &self.header_block
    }

    pub fn priority(&self) -> Option<Priority> {
        self.priority
    }

    pub fn is_end_stream(&self) -> bool {
        self.end_stream
    }

    pub fn encode(&self, dst: &mut BytesMut) {
        let priority_len = if self.priority.is_some() { 5 } else { 0 };
        let len = priority_len + self.header_block.len();

        dst.put_uint(len as u64, 3);
        dst.put_u8(Kind::Headers.wire_value());

        let mut flags = 0x4; // END_HEADERS; CONTINUATION is out of scope
        if self.end_stream {
            flags |= 0x1;
        }
        if self.priority.is_some() {
            flags |= 0x20;
        }
        dst.put_u8(flags);
        dst.put_u32(self.id.as_u32());

        if let Some(p) = self.priority {
            let mut dep = p.dependency.as_u32();
            if p.exclusive {
                dep |= 0x8000_0000;
            }
            dst.put_u32(dep);
            dst.put_u8(p.weight.clamp(1, 256).wrapping_sub(1) as u8);
        }

        dst.put_slice(&self.header_block);
    }
}

/// A PUSH_PROMISE frame: reserves `promised_id` on behalf of `id`
/// (RFC 7540 §6.6).
#[derive(Debug, Clone)]
pub struct PushPromise {
    id: StreamId,
    promised_id: StreamId,
    header_block: Bytes,
}

impl PushPromise {
    pub fn new(id: StreamId, promised_id: StreamId, header_block: Bytes) -> PushPromise {
        PushPromise {
            id,
            promised_id,
            header_block,
        }
    }

    pub fn stream_id(&self) -> StreamId {
        self.id
    }

    pub fn promised_id(&self) -> StreamId {
        self.promised_id
    }

    pub fn header_block(&self) -> &Bytes {
        &self.header_block
    }

    pub fn encode(&self, dst: &mut BytesMut) {
        let len = 4 + self.header_block.len();
        dst.put_uint(len as u64, 3);
        dst.put_u8(Kind::PushPromise.wire_value());
        dst.put_u8(0x4); // END_HEADERS
        dst.put_u32(self.id.as_u32());
        dst.put_u32(self.promised_id.as_u32());
        dst.put_slice(&self.header_block);
    }
}
