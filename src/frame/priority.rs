use bytes::{BufMut, BytesMut};

use crate::frame::head::{Kind, Priority as PriorityFields, StreamId};

/// A standalone PRIORITY frame (RFC 7540 §6.3). Carries the same fields as
/// a HEADERS frame's optional priority block.
#[derive(Debug, Clone, Copy)]
pub struct Priority {
    id: StreamId,
    fields: PriorityFields,
}

impl Priority {
    pub fn new(id: StreamId, fields: PriorityFields) -> Priority {
        Priority { id, fields }
    }

    pub fn stream_id(&self) -> StreamId {
        self.id
    }

    pub fn fields(&self) -> PriorityFields {
        self.fields
    }

    pub fn encode(&self, dst: &mut BytesMut) {
        dst.put_uint(5, 3);
        dst.put_u8(Kind::Priority.wire_value());
        dst.put_u8(0);
        dst.put_u32(self.id.as_u32());

        let mut dep = self.fields.dependency.as_u32();
        if self.fields.exclusive {
            dep |= 0x8000_0000;
        }
        dst.put_u32(dep);
        dst.put_u8(self.fields.weight.clamp(1, 256).wrapping_sub(1) as u8);
    }
}
