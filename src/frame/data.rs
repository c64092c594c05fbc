use bytes::{Bytes, BufMut, BytesMut};

use crate::frame::head::{Kind, StreamId};

/// A DATA frame (RFC 7540 §6.1).
#[derive(Debug, Clone)]
pub struct Data {
    id: StreamId,
    payload: Bytes,
    padding: u8,
    end_stream: bool,
}

impl Data {
    pub fn new(id: StreamId, payload: Bytes, padding: u8, end_stream: bool) -> Data {
        Data {
            id,
            payload,
            padding,
            end_stream,
        }
    }

    pub fn stream_id(&self) -> StreamId {
        self.id
    }

    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    pub fn into_payload(self) -> Bytes {
        self.payload
    }

    pub fn is_end_stream(&self) -> bool {
        self.end_stream
    }

    pub fn padding(&self) -> u8 {
        self.padding
    }

    /// Total flow-controlled size: payload + padding + the 1-byte pad
    /// length field when padding is present (RFC 7540 §6.1).
    pub fn flow_len(&self) -> usize {
        self.payload.len() + self.padding as usize + if self.padding > 0 { 1 } else { 0 }
    }

    pub fn encode(&self, dst: &mut BytesMut) {
        let pad_len = if self.padding > 0 { 1 } else { 0 };
        let len = pad_len + self.payload.len() + self.padding as usize;

        dst.put_uint(len as u64, 3);
        dst.put_u8(Kind::Data.wire_value());

        let mut flags = 0;
        if self.end_stream {
            flags |= 0x1;
        }
        if self.padding > 0 {
            flags |= 0x8;
        }
        dst.put_u8(flags);
        dst.put_u32(self.id.as_u32());

        if self.padding > 0 {
            dst.put_u8(self.padding);
        }
        dst.put_slice(&self.payload);
        for _ in 0..self.padding {
            dst.put_u8(0);
        }
    }
}
