//! Which side of the connection this engine is driving.
//!
//! Modeled as a plain runtime enum rather than a type-level marker threaded
//! through `Connection`'s generics: without call sites that pick the wrong
//! marker for a compiler to reject, that indirection adds ceremony without
//! catching anything a runtime `match` wouldn't. See `DESIGN.md` for the
//! trade-off.

/// Which endpoint of the connection this engine instance is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Client,
    Server,
}

impl Role {
    pub fn is_client(self) -> bool {
        matches!(self, Role::Client)
    }

    pub fn is_server(self) -> bool {
        matches!(self, Role::Server)
    }

    /// Whether a stream ID with this parity was initiated by `self`.
    pub fn owns_stream_id(self, id: crate::frame::StreamId) -> bool {
        match self {
            Role::Client => id.is_client_initiated(),
            Role::Server => id.is_server_initiated(),
        }
    }
}
