//! Minimal frame-header parsing backing `WireCodec::decode`.
//!
//! This only frames and type-dispatches payloads; it does not attempt
//! partial-read buffering across multiple `decode` calls split mid-frame
//! (the reference codec exists to drive this crate's own tests, which feed
//! complete frames; the preface byte-at-a-time boundary case in §8 is
//! handled earlier, by `PrefaceManager`, before any byte reaches here).

use crate::error::{Error, Reason};
use crate::frame::{
    Data, Frame, GoAway, Headers, Kind, Ping, Priority as PriorityFields, PriorityFrame,
    PushPromise, RstStream, Settings, StreamId, WindowUpdate,
};

pub fn decode_frames(mut bytes: &[u8], out: &mut Vec<Frame>) -> Result<(), Error> {
    while !bytes.is_empty() {
        if bytes.len() < 9 {
            return Err(Error::connection(Reason::FRAME_SIZE_ERROR));
        }
        let len = u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]]) as usize;
        let kind = Kind::from_wire(bytes[3]);
        let flags = bytes[4];
        let id = StreamId::new(u32::from_be_bytes([bytes[5], bytes[6], bytes[7], bytes[8]]));

        if bytes.len() < 9 + len {
            return Err(Error::connection(Reason::FRAME_SIZE_ERROR));
        }
        let payload = &bytes[9..9 + len];
        let frame = decode_one(kind, flags, id, payload)?;
        out.push(frame);
        bytes = &bytes[9 + len..];
    }
    Ok(())
}

fn decode_one(kind: Kind, flags: u8, id: StreamId, payload: &[u8]) -> Result<Frame, Error> {
    const END_STREAM: u8 = 0x1;
    const PADDED: u8 = 0x8;
    const PRIORITY_FLAG: u8 = 0x20;
    const ACK: u8 = 0x1;

    match kind {
        Kind::Data => {
            let end_stream = flags & END_STREAM != 0;
            let (padding, body) = if flags & PADDED != 0 {
                if payload.is_empty() {
                    return Err(Error::connection(Reason::FRAME_SIZE_ERROR));
                }
                (payload[0], &payload[1..])
            } else {
                (0, payload)
            };
            Ok(Frame::Data(Data::new(
                id,
                bytes::Bytes::copy_from_slice(body),
                padding,
                end_stream,
            )))
        }
        Kind::Headers => {
            let end_stream = flags & END_STREAM != 0;
            let mut rest = payload;
            let mut priority = None;
            if flags & PRIORITY_FLAG != 0 {
                if rest.len() < 5 {
                    return Err(Error::stream(id, Reason::FRAME_SIZE_ERROR));
                }
                let raw = u32::from_be_bytes([rest[0], rest[1], rest[2], rest[3]]);
                priority = Some(PriorityFields {
                    dependency: StreamId::new(raw & 0x7fff_ffff),
                    exclusive: raw & 0x8000_0000 != 0,
                    weight: rest[4] as u16 + 1,
                });
                rest = &rest[5..];
            }
            let mut h = Headers::new(id, bytes::Bytes::copy_from_slice(rest), end_stream);
            if let Some(p) = priority {
                h = h.with_priority(p);
            }
            Ok(Frame::Headers(h))
        }
        Kind::Priority => {
            if payload.len() < 5 {
                return Err(Error::stream(id, Reason::FRAME_SIZE_ERROR));
            }
            let raw = u32::from_be_bytes([payload[0], payload[1], payload[2], payload[3]]);
            let fields = PriorityFields {
                dependency: StreamId::new(raw & 0x7fff_ffff),
                exclusive: raw & 0x8000_0000 != 0,
                weight: payload[4] as u16 + 1,
            };
            Ok(Frame::Priority(PriorityFrame::new(id, fields)))
        }
        Kind::RstStream => {
            if payload.len() != 4 {
                return Err(Error::connection(Reason::FRAME_SIZE_ERROR));
            }
            let code = u32::from_be_bytes([payload[0], payload[1], payload[2], payload[3]]);
            Ok(Frame::RstStream(RstStream::new(id, Reason::new(code))))
        }
        Kind::Settings => {
            let settings = Settings::decode_payload(flags & ACK != 0, payload)
                .map_err(Error::connection)?;
            Ok(Frame::Settings(settings))
        }
        Kind::PushPromise => {
            if payload.len() < 4 {
                return Err(Error::stream(id, Reason::FRAME_SIZE_ERROR));
            }
            let promised = StreamId::new(u32::from_be_bytes([
                payload[0], payload[1], payload[2], payload[3],
            ]));
            Ok(Frame::PushPromise(PushPromise::new(
                id,
                promised,
                bytes::Bytes::copy_from_slice(&payload[4..]),
            )))
        }
        Kind::Ping => {
            if payload.len() != 8 {
                return Err(Error::connection(Reason::FRAME_SIZE_ERROR));
            }
            let mut buf = [0u8; 8];
            buf.copy_from_slice(payload);
            Ok(Frame::Ping(Ping::new(buf, flags & ACK != 0)))
        }
        Kind::GoAway => {
            if payload.len() < 8 {
                return Err(Error::connection(Reason::FRAME_SIZE_ERROR));
            }
            let last = StreamId::new(u32::from_be_bytes([
                payload[0], payload[1], payload[2], payload[3],
            ]));
            let code = u32::from_be_bytes([payload[4], payload[5], payload[6], payload[7]]);
            let goaway = GoAway::new(last, Reason::new(code))
                .with_debug_data(bytes::Bytes::copy_from_slice(&payload[8..]));
            Ok(Frame::GoAway(goaway))
        }
        Kind::WindowUpdate => {
            if payload.len() != 4 {
                return Err(Error::connection(Reason::FRAME_SIZE_ERROR));
            }
            let raw = u32::from_be_bytes([payload[0], payload[1], payload[2], payload[3]]);
            Ok(Frame::WindowUpdate(WindowUpdate::new(id, raw & 0x7fff_ffff)))
        }
        Kind::Continuation => Err(Error::connection(Reason::PROTOCOL_ERROR)),
        Kind::Unknown(byte) => Ok(Frame::Unknown(id, Kind::Unknown(byte))),
    }
}
