//! `SettingsCoordinator` (§4.5): two asymmetric flows, synchronized through
//! the `PendingSettings` FIFO.
//!
//! Each queued entry passes through the same three-phase life a single
//! outstanding local SETTINGS would: appended while waiting to be written,
//! sitting as "waiting ack" once written, and consumed/applied once its
//! ACK arrives, generalized into a capped `VecDeque` so multiple sends can
//! be outstanding at once (§3's `PendingSettings` queue).

use std::collections::VecDeque;

use crate::error::{Error, Reason};
use crate::frame::{Settings, StreamId};
use crate::listener::Listener;
use crate::proto::codec::FrameCodec;
use crate::proto::flow::FlowController;
use crate::proto::registry::ConnectionRegistry;

use super::connection::Connection;

impl<C, F, R, L> Connection<C, F, R, L>
where
    C: FrameCodec,
    F: FlowController,
    R: ConnectionRegistry,
    L: Listener,
{
    /// Appends `settings` to the PendingSettings queue and returns it ready
    /// for the caller to hand to the codec. Used both by the preface's
    /// initial SETTINGS and by `OutboundGate::write_settings`.
    ///
    /// Rejects once the queue hits `Config::pending_settings_cap` (§9
    /// Design Note: an un-ACKed backlog this large means the peer isn't
    /// acknowledging, which is itself a protocol error).
    pub(crate) fn enqueue_local_settings(&mut self, settings: Settings) -> Result<(), Error> {
        if self.pending_settings.len() >= self.config.pending_settings_cap() {
            return Err(Error::connection(Reason::SETTINGS_TIMEOUT));
        }
        self.pending_settings.push_back(settings);
        Ok(())
    }

    /// Remote → local (§4.5): applied on receipt of the peer's non-ACK
    /// SETTINGS frame, before the ACK is written back.
    pub(crate) fn apply_remote_settings(&mut self, settings: &Settings) -> Result<(), Error> {
        if let Some(enable_push) = settings.enable_push() {
            if self.role.is_client() {
                return Err(Error::connection(Reason::PROTOCOL_ERROR));
            }
            self.registry.remote_mut().set_push_allowed(enable_push);
        }

        if let Some(max) = settings.max_concurrent_streams() {
            let clamped = crate::frame::clamp_max_concurrent_streams(max);
            self.registry.local_mut().set_max_concurrent_streams(Some(clamped));
        }

        if let Some(size) = settings.header_table_size() {
            self.codec.set_max_header_table_size(size);
        }
        if let Some(size) = settings.max_header_list_size() {
            self.codec.set_max_header_list_size(Some(size));
        }
        if let Some(size) = settings.max_frame_size() {
            if !(crate::frame::DEFAULT_MAX_FRAME_SIZE..=crate::frame::MAX_MAX_FRAME_SIZE)
                .contains(&size)
            {
                return Err(Error::FrameSize(Reason::FRAME_SIZE_ERROR));
            }
            self.codec.set_max_frame_size(size);
        }

        if let Some(size) = settings.initial_window_size() {
            self.flow.set_initial_outbound_window_size(size);
        }

        tracing::trace!(parent: self.span.as_ref(), ?settings, "applied remote settings");
        Ok(())
    }

    /// Local → remote (§4.5): applied when our own SETTINGS' ACK arrives
    /// from the peer. Mirrors `apply_remote_settings`, but targets the
    /// reader, the inbound flow controller, and the remote endpoint's
    /// stream cap / push-allowance.
    pub(crate) fn apply_local_settings(&mut self, settings: &Settings) {
        if let Some(enable_push) = settings.enable_push() {
            self.registry.local_mut().set_push_allowed(enable_push);
        }
        if let Some(max) = settings.max_concurrent_streams() {
            self.registry.remote_mut().set_max_concurrent_streams(Some(max));
        }
        if let Some(size) = settings.initial_window_size() {
            self.flow.set_initial_inbound_window_size(size);
        }
        tracing::trace!(parent: self.span.as_ref(), ?settings, "applied local settings on ack");
    }

    /// Consumes the oldest entry of the PendingSettings FIFO on SETTINGS-ACK
    /// receipt. A spurious extra ACK (more ACKs than sends outstanding) is
    /// a documented no-op (§8 round trips).
    pub(crate) fn consume_pending_settings_ack(&mut self) {
        if let Some(settings) = self.pending_settings.pop_front() {
            self.apply_local_settings(&settings);
        }
    }

    /// Builds the initial local `Settings` the `PrefaceManager` sends: from
    /// the flow controller's initial window, the registry's outbound
    /// stream cap, and the codec's own limits. `enable_push` is included
    /// only for clients (§4.1). Fields equal to the RFC 7540 default are
    /// left absent so an unconfigured connection emits an empty SETTINGS
    /// payload (§8 scenario 1).
    pub(crate) fn initial_local_settings(&self) -> Settings {
        use crate::frame::{
            DEFAULT_INITIAL_WINDOW_SIZE, DEFAULT_MAX_FRAME_SIZE,
            DEFAULT_SETTINGS_HEADER_TABLE_SIZE,
        };

        let mut settings = Settings::new();

        let window = self.flow.initial_inbound_window_size();
        if window != DEFAULT_INITIAL_WINDOW_SIZE {
            settings.set_initial_window_size(Some(window));
        }

        let table_size = self.config.header_table_size();
        if table_size != DEFAULT_SETTINGS_HEADER_TABLE_SIZE {
            settings.set_header_table_size(Some(table_size));
        }

        let frame_size = self.config.max_frame_size();
        if frame_size != DEFAULT_MAX_FRAME_SIZE {
            let _ = settings.set_max_frame_size(Some(frame_size));
        }

        if let Some(max) = self.config.max_header_list_size() {
            settings.set_max_header_list_size(Some(max));
        }
        if let Some(max) = self.config.max_concurrent_streams() {
            settings.set_max_concurrent_streams(Some(max));
        }
        if self.role.is_client() && !self.config.enable_push() {
            settings.set_enable_push(Some(false));
        }
        settings
    }

    pub(crate) fn pending_settings_queue(&self) -> &VecDeque<Settings> {
        &self.pending_settings
    }

    pub(crate) fn reserve_upgrade_stream(&mut self, id: StreamId) {
        self.registry.local_mut().record_stream_created(id);
        self.registry.remote_mut().record_stream_created(id);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::proto::codec::WireCodec;
    use crate::proto::config::Config;
    use crate::proto::flow::WindowFlowController;
    use crate::proto::registry::StreamRegistry;
    use crate::proto::peer::Role;
    use crate::listener::NoopListener;

    fn client() -> Connection<WireCodec, WindowFlowController, StreamRegistry, NoopListener> {
        Connection::new(
            Role::Client,
            WireCodec::new(),
            WindowFlowController::default(),
            StreamRegistry::new(true, true),
            NoopListener,
            Config::default(),
        )
    }

    #[test]
    fn remote_initial_window_size_updates_outbound_controller() {
        let mut conn = client();
        let mut settings = Settings::new();
        settings.set_initial_window_size(Some(131_072));
        conn.apply_remote_settings(&settings).unwrap();
        assert_eq!(conn.flow.initial_outbound_window_size(), 131_072);
    }

    #[test]
    fn client_rejects_enable_push_from_remote() {
        let mut conn = client();
        let mut settings = Settings::new();
        settings.set_enable_push(Some(false));
        assert!(conn.apply_remote_settings(&settings).is_err());
    }

    #[test]
    fn pending_settings_ack_applied_in_fifo_order() {
        let mut conn = client();
        let mut first = Settings::new();
        first.set_initial_window_size(Some(65_535));
        let mut second = Settings::new();
        second.set_initial_window_size(Some(131_072));

        conn.enqueue_local_settings(first).unwrap();
        conn.enqueue_local_settings(second).unwrap();

        conn.consume_pending_settings_ack();
        assert_eq!(conn.flow.initial_inbound_window_size(), 65_535);
        conn.consume_pending_settings_ack();
        assert_eq!(conn.flow.initial_inbound_window_size(), 131_072);

        // extra ack beyond what's outstanding is a no-op
        conn.consume_pending_settings_ack();
        assert_eq!(conn.flow.initial_inbound_window_size(), 131_072);
    }

    #[test]
    fn pending_settings_cap_rejects_overflow() {
        let mut conn = client();
        conn.config.pending_settings_cap = 1;
        conn.enqueue_local_settings(Settings::new()).unwrap();
        assert!(conn.enqueue_local_settings(Settings::new()).is_err());
    }
}
