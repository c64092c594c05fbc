//! The protocol engine. `Connection` is the cohesive component; each
//! sibling module contributes an `impl` block implementing one of its
//! cooperating roles (handshake, inbound dispatch, outbound writes,
//! error/shutdown sequencing, settings negotiation) rather than nesting
//! them as private sub-objects.

pub mod codec;
pub mod completion;
pub mod config;
pub mod connection;
pub mod dispatch;
pub mod errors;
pub mod flow;
pub mod outbound;
pub mod peer;
pub mod preface;
pub mod registry;
pub mod settings;
pub mod stream;
mod wire;

pub use codec::{FrameCodec, WireCodec};
pub use completion::{pair as completion_pair, Completion, CompletionHandle};
pub use config::{Builder as ConfigBuilder, Config};
pub use connection::{Connection, ShutdownState};
pub use flow::{FlowController, WindowFlowController};
pub use peer::Role;
pub use registry::{ConnectionRegistry, Endpoint, StreamRegistry};
pub use stream::{Stream, StreamState};
