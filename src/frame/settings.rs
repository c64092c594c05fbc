use bytes::{BufMut, BytesMut};

use crate::error::Reason;
use crate::frame::head::Kind;

/// Identifiers for the six SETTINGS parameters (RFC 7540 §6.5.2).
const SETTINGS_HEADER_TABLE_SIZE: u16 = 0x1;
const SETTINGS_ENABLE_PUSH: u16 = 0x2;
const SETTINGS_MAX_CONCURRENT_STREAMS: u16 = 0x3;
const SETTINGS_INITIAL_WINDOW_SIZE: u16 = 0x4;
const SETTINGS_MAX_FRAME_SIZE: u16 = 0x5;
const SETTINGS_MAX_HEADER_LIST_SIZE: u16 = 0x6;

pub const DEFAULT_SETTINGS_HEADER_TABLE_SIZE: u32 = 4_096;
pub const DEFAULT_INITIAL_WINDOW_SIZE: u32 = 65_535;
pub const DEFAULT_MAX_FRAME_SIZE: u32 = 16_384;
pub const MAX_MAX_FRAME_SIZE: u32 = (1 << 24) - 1;
pub const MAX_INITIAL_WINDOW_SIZE: u32 = (1 << 31) - 1;

/// A SETTINGS frame: an optional-valued record. Absent fields mean
/// "unchanged" (§3). The ACK flag is tracked separately since an ACK
/// frame always carries an empty payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    ack: bool,
    header_table_size: Option<u32>,
    enable_push: Option<bool>,
    max_concurrent_streams: Option<u32>,
    initial_window_size: Option<u32>,
    max_frame_size: Option<u32>,
    max_header_list_size: Option<u32>,
}

impl Settings {
    pub fn new() -> Settings {
        Settings::default()
    }

    pub fn ack() -> Settings {
        Settings {
            ack: true,
            ..Settings::default()
        }
    }

    pub fn is_ack(&self) -> bool {
        self.ack
    }

    pub fn header_table_size(&self) -> Option<u32> {
        self.header_table_size
    }

    pub fn set_header_table_size(&mut self, v: Option<u32>) {
        self.header_table_size = v;
    }

    pub fn enable_push(&self) -> Option<bool> {
        self.enable_push
    }

    pub fn set_enable_push(&mut self, v: Option<bool>) {
        self.enable_push = v;
    }

    pub fn max_concurrent_streams(&self) -> Option<u32> {
        self.max_concurrent_streams
    }

    pub fn set_max_concurrent_streams(&mut self, v: Option<u32>) {
        self.max_concurrent_streams = v;
    }

    pub fn initial_window_size(&self) -> Option<u32> {
        self.initial_window_size
    }

    pub fn set_initial_window_size(&mut self, v: Option<u32>) {
        self.initial_window_size = v;
    }

    pub fn max_frame_size(&self) -> Option<u32> {
        self.max_frame_size
    }

    /// Sets `max_frame_size`, validating the RFC 7540 §6.5.2 bound
    /// `[2^14, 2^24 - 1]`. Returns `FRAME_SIZE_ERROR` if out of range.
    pub fn set_max_frame_size(&mut self, v: Option<u32>) -> Result<(), Reason> {
        if let Some(size) = v {
            if size < DEFAULT_MAX_FRAME_SIZE || size > MAX_MAX_FRAME_SIZE {
                return Err(Reason::FRAME_SIZE_ERROR);
            }
        }
        self.max_frame_size = v;
        Ok(())
    }

    pub fn max_header_list_size(&self) -> Option<u32> {
        self.max_header_list_size
    }

    pub fn set_max_header_list_size(&mut self, v: Option<u32>) {
        self.max_header_list_size = v;
    }

    /// Encodes this frame's 9-octet header plus payload onto `dst`.
    pub fn encode(&self, dst: &mut BytesMut) {
        let mut fields: Vec<(u16, u32)> = Vec::with_capacity(6);

        if let Some(v) = self.header_table_size {
            fields.push((SETTINGS_HEADER_TABLE_SIZE, v));
        }
        if let Some(v) = self.enable_push {
            fields.push((SETTINGS_ENABLE_PUSH, v as u32));
        }
        if let Some(v) = self.max_concurrent_streams {
            fields.push((SETTINGS_MAX_CONCURRENT_STREAMS, v));
        }
        if let Some(v) = self.initial_window_size {
            fields.push((SETTINGS_INITIAL_WINDOW_SIZE, v));
        }
        if let Some(v) = self.max_frame_size {
            fields.push((SETTINGS_MAX_FRAME_SIZE, v));
        }
        if let Some(v) = self.max_header_list_size {
            fields.push((SETTINGS_MAX_HEADER_LIST_SIZE, v));
        }

        let len = fields.len() * 6;
        dst.put_uint(len as u64, 3);
        dst.put_u8(Kind::Settings.wire_value());
        dst.put_u8(if self.ack { 0x1 } else { 0x0 });
        dst.put_u32(0); // stream id is always 0 for SETTINGS

        for (id, value) in fields {
            dst.put_u16(id);
            dst.put_u32(value);
        }
    }

    /// Decodes a SETTINGS payload (the 9-octet frame header has already
    /// been consumed by the caller). `ack` is taken from the frame header's
    /// flags byte.
    pub fn decode_payload(ack: bool, payload: &[u8]) -> Result<Settings, Reason> {
        if ack {
            if !payload.is_empty() {
                return Err(Reason::FRAME_SIZE_ERROR);
            }
            return Ok(Settings::ack());
        }

        if payload.len() % 6 != 0 {
            return Err(Reason::FRAME_SIZE_ERROR);
        }

        let mut settings = Settings::new();

        for chunk in payload.chunks_exact(6) {
            let id = u16::from_be_bytes([chunk[0], chunk[1]]);
            let value = u32::from_be_bytes([chunk[2], chunk[3], chunk[4], chunk[5]]);

            match id {
                SETTINGS_HEADER_TABLE_SIZE => settings.header_table_size = Some(value),
                SETTINGS_ENABLE_PUSH => match value {
                    0 => settings.enable_push = Some(false),
                    1 => settings.enable_push = Some(true),
                    _ => return Err(Reason::PROTOCOL_ERROR),
                },
                SETTINGS_MAX_CONCURRENT_STREAMS => settings.max_concurrent_streams = Some(value),
                SETTINGS_INITIAL_WINDOW_SIZE => {
                    if value > MAX_INITIAL_WINDOW_SIZE {
                        return Err(Reason::FLOW_CONTROL_ERROR);
                    }
                    settings.initial_window_size = Some(value);
                }
                SETTINGS_MAX_FRAME_SIZE => {
                    settings.set_max_frame_size(Some(value))?;
                }
                SETTINGS_MAX_HEADER_LIST_SIZE => settings.max_header_list_size = Some(value),
                // Unknown settings identifiers are ignored (RFC 7540 §6.5.2).
                _ => {}
            }
        }

        Ok(settings)
    }
}

/// Clamps an incoming `max_concurrent_streams` value to signed-32-bit range
/// without raising an error, per the boundary test in §8.
pub fn clamp_max_concurrent_streams(value: u32) -> u32 {
    value.min(i32::MAX as u32)
}
