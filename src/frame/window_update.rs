use bytes::{BufMut, BytesMut};

use crate::frame::head::{Kind, StreamId};

/// A WINDOW_UPDATE frame, targeting either a stream or the connection
/// (`StreamId::CONNECTION`) (RFC 7540 §6.9).
#[derive(Debug, Clone, Copy)]
pub struct WindowUpdate {
    id: StreamId,
    increment: u32,
}

impl WindowUpdate {
    pub fn new(id: StreamId, increment: u32) -> WindowUpdate {
        WindowUpdate { id, increment }
    }

    pub fn stream_id(&self) -> StreamId {
        self.id
    }

    pub fn size_increment(&self) -> u32 {
        self.increment
    }

    pub fn encode(&self, dst: &mut BytesMut) {
        dst.put_uint(4, 3);
        dst.put_u8(Kind::WindowUpdate.wire_value());
        dst.put_u8(0);
        dst.put_u32(self.id.as_u32());
        dst.put_u32(self.increment & 0x7fff_ffff);
    }
}
