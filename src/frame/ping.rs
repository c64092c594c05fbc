use bytes::{BufMut, BytesMut};

use crate::frame::head::Kind;

pub type PingPayload = [u8; 8];

/// A PING frame. Receivers of a non-ACK PING must echo the identical
/// payload with the ACK flag set (RFC 7540 §6.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ping {
    ack: bool,
    payload: PingPayload,
}

impl Ping {
    pub fn new(payload: PingPayload, ack: bool) -> Ping {
        Ping { ack, payload }
    }

    pub fn is_ack(&self) -> bool {
        self.ack
    }

    pub fn payload(&self) -> PingPayload {
        self.payload
    }

    pub fn pong(payload: PingPayload) -> Ping {
        Ping::new(payload, true)
    }

    pub fn encode(&self, dst: &mut BytesMut) {
        dst.put_uint(8, 3);
        dst.put_u8(Kind::Ping.wire_value());
        dst.put_u8(if self.ack { 0x1 } else { 0x0 });
        dst.put_u32(0);
        dst.put_slice(&self.payload);
    }
}
