//! `PrefaceManager` (§4.1): the mandatory handshake both roles must
//! complete before any other frame is valid.

use crate::error::{Error, Reason};
use crate::frame::{StreamId, CLIENT_PREFACE};
use crate::listener::Listener;
use crate::proto::codec::FrameCodec;
use crate::proto::flow::FlowController;
use crate::proto::registry::ConnectionRegistry;
use crate::proto::stream::StreamState;

use super::connection::Connection;

/// Stream ID 1, reserved for the cleartext-upgrade seam (§4.1, §9's
/// "Upgrade reservation").
const UPGRADE_STREAM_ID: u32 = 1;

impl<C, F, R, L> Connection<C, F, R, L>
where
    C: FrameCodec,
    F: FlowController,
    R: ConnectionRegistry,
    L: Listener,
{
    /// Both `on_transport_active` and `on_attached` call this; idempotent
    /// via `preface_sent` (§8: "double invocation... produces exactly one
    /// preface-send").
    pub fn on_transport_active(&mut self) -> Result<(), Error> {
        self.send_preface_once()
    }

    pub fn on_attached(&mut self) -> Result<(), Error> {
        self.send_preface_once()
    }

    fn send_preface_once(&mut self) -> Result<(), Error> {
        if self.preface_sent {
            return Ok(());
        }
        self.preface_sent = true;

        if self.role.is_client() {
            tracing::debug!(parent: self.span.as_ref(), "sending client preface");
            self.codec.write_preface();
        }

        let settings = self.initial_local_settings();
        self.enqueue_local_settings(settings.clone())?;
        self.codec.write_settings(settings);

        tracing::trace!(parent: self.span.as_ref(), "initial settings flushed");
        Ok(())
    }

    /// Server-only. Consumes as much of `bytes` as is still needed to
    /// match the remaining expected preface, byte-exactly. On mismatch,
    /// the caller should close the transport; on full match, returns the
    /// unconsumed remainder to hand to the frame codec.
    ///
    /// §8: "Preface sent byte-by-byte (1 octet at a time) still completes
    /// handshake" — this is why matching is incremental against
    /// `preface_matched` rather than requiring the whole preface in one
    /// call.
    pub fn recv_preface_bytes<'a>(&mut self, bytes: &'a [u8]) -> Result<Option<&'a [u8]>, Error> {
        let matched = match self.preface_matched {
            Some(m) => m,
            None => return Ok(Some(bytes)), // already matched, or not a server
        };

        let remaining_expected = &CLIENT_PREFACE[matched..];
        let take = remaining_expected.len().min(bytes.len());

        if bytes[..take] != remaining_expected[..take] {
            tracing::debug!(parent: self.span.as_ref(), "client preface mismatch, closing transport");
            return Err(Error::connection(Reason::PROTOCOL_ERROR));
        }

        let new_matched = matched + take;
        if new_matched == CLIENT_PREFACE.len() {
            self.preface_matched = None;
            tracing::debug!(parent: self.span.as_ref(), "client preface fully matched");
            Ok(Some(&bytes[take..]))
        } else {
            self.preface_matched = Some(new_matched);
            Ok(None)
        }
    }

    /// `true` once the connection may process frames other than the
    /// SETTINGS that completes the preface (§4.2 step 1).
    pub(crate) fn preface_complete(&self) -> bool {
        // A client's `preface_matched` is always `None` (only servers read a
        // client preface), so this reduces to "we've seen the peer's
        // non-ACK SETTINGS" for both roles alike -- §4.1/§4.2 require it of
        // clients too, not just servers.
        self.preface_matched.is_none() && self.preface_received
    }

    /// Client-only, one-shot, before handshake starts: reserves stream 1
    /// as a locally-created half-closed stream for the `h2c` cleartext
    /// upgrade.
    pub fn on_client_upgrade(&mut self) -> Result<(), Error> {
        self.guard_upgrade_preconditions()?;
        if self.role.is_server() {
            return Err(Error::connection(Reason::PROTOCOL_ERROR));
        }
        self.upgrade_used = true;
        let id = StreamId::new(UPGRADE_STREAM_ID);
        self.registry.insert(id, StreamState::HalfClosedLocal);
        self.reserve_upgrade_stream(id);
        tracing::debug!(parent: self.span.as_ref(), "reserved stream 1 for client upgrade");
        Ok(())
    }

    /// Server-only, one-shot, before handshake starts: applies the
    /// upgrade's `Http2-Settings` header value directly (no ACK — the ACK
    /// is folded into the normal preface handshake) and creates stream 1
    /// remote/half-closed.
    pub fn on_server_upgrade(&mut self, settings: &crate::frame::Settings) -> Result<(), Error> {
        self.guard_upgrade_preconditions()?;
        if self.role.is_client() {
            return Err(Error::connection(Reason::PROTOCOL_ERROR));
        }
        self.upgrade_used = true;
        self.apply_remote_settings(settings)?;
        let id = StreamId::new(UPGRADE_STREAM_ID);
        self.registry.insert(id, StreamState::HalfClosedRemote);
        self.reserve_upgrade_stream(id);
        tracing::debug!(parent: self.span.as_ref(), "reserved stream 1 for server upgrade");
        Ok(())
    }

    fn guard_upgrade_preconditions(&self) -> Result<(), Error> {
        if self.upgrade_used || self.preface_sent || self.preface_received {
            return Err(Error::connection(Reason::PROTOCOL_ERROR));
        }
        Ok(())
    }
}
