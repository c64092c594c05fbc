//! The `FlowController` external collaborator (§2, §6): paces DATA against
//! the peer's advertised window and credits inbound window as the
//! application consumes bytes.
//!
//! Tracks each window as a signed delta, separately for inbound and
//! outbound, without a low-water-mark for batching WINDOW_UPDATE
//! emission — that batching policy is the controller's own concern
//! (§6), not part of this engine's contract.

use std::collections::HashMap;

use bytes::Bytes;

use crate::error::Error;
use crate::frame::StreamId;
use crate::proto::completion::CompletionHandle;

/// Inbound/outbound window accounting, consumed through this seam so the
/// engine never picks a pacing algorithm itself.
pub trait FlowController {
    fn initial_inbound_window_size(&self) -> u32;
    fn set_initial_inbound_window_size(&mut self, size: u32);

    fn initial_outbound_window_size(&self) -> u32;
    fn set_initial_outbound_window_size(&mut self, size: u32);

    /// Credits the inbound window after the application has consumed
    /// `len` bytes of DATA payload on `stream_id`.
    fn on_data_read(&mut self, stream_id: StreamId, len: usize);

    /// Applies a WINDOW_UPDATE increment (signed so `SETTINGS
    /// initial_window_size` changes can be expressed as deltas across all
    /// open streams, per RFC 7540 §6.9.2).
    fn update_outbound_window_size(&mut self, stream_id: StreamId, delta: i64) -> Result<(), Error>;

    /// Admits a DATA write, paced against the current outbound window.
    /// Returns the completion the write resolves through.
    fn write_data(
        &mut self,
        stream_id: StreamId,
        payload: Bytes,
        padding: u8,
        end_stream: bool,
    ) -> CompletionHandle;
}

/// A reference flow controller: an unbounded, unpaced pass-through that
/// still performs correct window bookkeeping, sufficient to drive §8's
/// settings/round-trip scenarios. Actual DATA pacing is a Non-goal —
/// "flow-controller algorithms" are explicitly external (§2, §6).
pub struct WindowFlowController {
    initial_inbound: u32,
    initial_outbound: u32,
    outbound_windows: HashMap<StreamId, i64>,
}

impl WindowFlowController {
    pub fn new(initial_inbound: u32, initial_outbound: u32) -> WindowFlowController {
        WindowFlowController {
            initial_inbound,
            initial_outbound,
            outbound_windows: HashMap::new(),
        }
    }

    pub fn outbound_window(&self, stream_id: StreamId) -> i64 {
        *self
            .outbound_windows
            .get(&stream_id)
            .unwrap_or(&(self.initial_outbound as i64))
    }
}

impl Default for WindowFlowController {
    fn default() -> WindowFlowController {
        WindowFlowController::new(
            crate::frame::DEFAULT_INITIAL_WINDOW_SIZE,
            crate::frame::DEFAULT_INITIAL_WINDOW_SIZE,
        )
    }
}

impl FlowController for WindowFlowController {
    fn initial_inbound_window_size(&self) -> u32 {
        self.initial_inbound
    }

    fn set_initial_inbound_window_size(&mut self, size: u32) {
        self.initial_inbound = size;
    }

    fn initial_outbound_window_size(&self) -> u32 {
        self.initial_outbound
    }

    fn set_initial_outbound_window_size(&mut self, size: u32) {
        let delta = size as i64 - self.initial_outbound as i64;
        self.initial_outbound = size;
        for window in self.outbound_windows.values_mut() {
            *window += delta;
        }
    }

    fn on_data_read(&mut self, _stream_id: StreamId, _len: usize) {
        // A real controller would emit WINDOW_UPDATE here; left to the
        // embedder's implementation of this trait.
    }

    fn update_outbound_window_size(&mut self, stream_id: StreamId, delta: i64) -> Result<(), Error> {
        let window = self
            .outbound_windows
            .entry(stream_id)
            .or_insert(self.initial_outbound as i64);
        *window += delta;
        if *window < i32::MIN as i64 {
            return Err(Error::stream(stream_id, crate::error::Reason::FLOW_CONTROL_ERROR));
        }
        Ok(())
    }

    fn write_data(
        &mut self,
        stream_id: StreamId,
        payload: Bytes,
        _padding: u8,
        _end_stream: bool,
    ) -> CompletionHandle {
        let window = self
            .outbound_windows
            .entry(stream_id)
            .or_insert(self.initial_outbound as i64);
        *window -= payload.len() as i64;

        let (tx, rx) = crate::proto::completion::pair();
        tx.succeed();
        rx
    }
}
