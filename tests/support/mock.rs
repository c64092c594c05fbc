//! Shared test support: a listener that records every callback it
//! receives, a hand-rolled recording stand-in rather than a mock
//! framework.

use bytes::Bytes;
use h2_engine::frame::{GoAway, Kind, Priority, PushPromise, RstStream, Settings, StreamId};
use h2_engine::listener::Listener;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Data {
        stream_id: StreamId,
        len: usize,
        end_stream: bool,
    },
    Headers {
        stream_id: StreamId,
        end_stream: bool,
    },
    HeadersWithPriority {
        stream_id: StreamId,
        end_stream: bool,
    },
    Priority {
        stream_id: StreamId,
    },
    RstStream {
        stream_id: StreamId,
    },
    Settings,
    SettingsAck,
    Ping,
    PingAck,
    PushPromise {
        stream_id: StreamId,
        promised_id: StreamId,
    },
    GoAway {
        last_stream_id: StreamId,
    },
    WindowUpdate {
        stream_id: StreamId,
    },
    Unknown {
        stream_id: StreamId,
    },
}

#[derive(Debug, Default)]
pub struct RecordingListener {
    pub events: Vec<Event>,
}

impl RecordingListener {
    pub fn new() -> RecordingListener {
        RecordingListener::default()
    }
}

impl Listener for RecordingListener {
    fn on_data_read(&mut self, stream_id: StreamId, payload: &Bytes, end_stream: bool) {
        self.events.push(Event::Data {
            stream_id,
            len: payload.len(),
            end_stream,
        });
    }

    fn on_headers_read(&mut self, stream_id: StreamId, end_stream: bool) {
        self.events.push(Event::Headers { stream_id, end_stream });
    }

    fn on_headers_read_with_priority(
        &mut self,
        stream_id: StreamId,
        _priority: Priority,
        end_stream: bool,
    ) {
        self.events.push(Event::HeadersWithPriority { stream_id, end_stream });
    }

    fn on_priority_read(&mut self, stream_id: StreamId, _priority: Priority) {
        self.events.push(Event::Priority { stream_id });
    }

    fn on_rst_stream_read(&mut self, frame: &RstStream) {
        self.events.push(Event::RstStream {
            stream_id: frame.stream_id(),
        });
    }

    fn on_settings_read(&mut self, _settings: &Settings) {
        self.events.push(Event::Settings);
    }

    fn on_settings_ack_read(&mut self) {
        self.events.push(Event::SettingsAck);
    }

    fn on_ping_read(&mut self, _payload: [u8; 8]) {
        self.events.push(Event::Ping);
    }

    fn on_ping_ack_read(&mut self, _payload: [u8; 8]) {
        self.events.push(Event::PingAck);
    }

    fn on_push_promise_read(&mut self, frame: &PushPromise) {
        self.events.push(Event::PushPromise {
            stream_id: frame.stream_id(),
            promised_id: frame.promised_id(),
        });
    }

    fn on_goaway_read(&mut self, frame: &GoAway) {
        self.events.push(Event::GoAway {
            last_stream_id: frame.last_stream_id(),
        });
    }

    fn on_window_update_read(&mut self, stream_id: StreamId, _increment: u32) {
        self.events.push(Event::WindowUpdate { stream_id });
    }

    fn on_unknown_frame(&mut self, stream_id: StreamId, _kind: Kind) {
        self.events.push(Event::Unknown { stream_id });
    }
}
