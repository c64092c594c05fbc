//! The `ConnectionRegistry` external collaborator (§2, §6): holds streams,
//! per-endpoint counters, GOAWAY flags, and allocates stream IDs.
//!
//! `StreamRegistry` below stores streams in a `slab::Slab`-backed arena
//! indexed by a `StreamId -> usize` map, so lookup is a hash step followed
//! by a slab index rather than a linear scan.

use fnv::FnvHashMap;
use slab::Slab;

use crate::frame::StreamId;
use crate::proto::stream::{Stream, StreamState};

/// One side of the connection's bookkeeping (§3's `Endpoint`): the other
/// peer's view is a second `Endpoint`, held by the registry per-role.
#[derive(Debug, Clone)]
pub struct Endpoint {
    max_concurrent_streams: Option<u32>,
    push_allowed: bool,
    go_away_received: bool,
    last_stream_created: StreamId,
}

impl Endpoint {
    pub fn new(push_allowed: bool) -> Endpoint {
        Endpoint {
            max_concurrent_streams: None,
            push_allowed,
            go_away_received: false,
            last_stream_created: StreamId::CONNECTION,
        }
    }

    pub fn max_concurrent_streams(&self) -> Option<u32> {
        self.max_concurrent_streams
    }

    pub fn set_max_concurrent_streams(&mut self, max: Option<u32>) {
        self.max_concurrent_streams = max;
    }

    pub fn push_allowed(&self) -> bool {
        self.push_allowed
    }

    pub fn set_push_allowed(&mut self, allowed: bool) {
        self.push_allowed = allowed;
    }

    pub fn go_away_received(&self) -> bool {
        self.go_away_received
    }

    /// Latches `go_away_received`; §3 says this is set once and never
    /// cleared.
    pub fn set_go_away_received(&mut self) {
        self.go_away_received = true;
    }

    pub fn last_stream_created(&self) -> StreamId {
        self.last_stream_created
    }

    /// Records a newly created stream ID, enforcing monotonicity (§3, §8).
    pub fn record_stream_created(&mut self, id: StreamId) {
        if id.as_u32() > self.last_stream_created.as_u32() {
            self.last_stream_created = id;
        }
    }
}

/// Holds streams, endpoint bookkeeping, and allocates IDs. The engine never
/// reaches into stream storage directly; it always goes through this trait
/// so an embedder can swap in their own priority-tree-aware registry.
pub trait ConnectionRegistry {
    fn get(&self, id: StreamId) -> Option<&Stream>;
    fn get_mut(&mut self, id: StreamId) -> Option<&mut Stream>;

    /// Inserts a newly created stream. Panics (a programmer error, not a
    /// protocol error) if `id` is already present.
    fn insert(&mut self, id: StreamId, state: StreamState) -> &mut Stream;

    fn remove(&mut self, id: StreamId);

    fn active_count(&self) -> usize;

    fn local(&self) -> &Endpoint;
    fn local_mut(&mut self) -> &mut Endpoint;

    fn remote(&self) -> &Endpoint;
    fn remote_mut(&mut self) -> &mut Endpoint;

    /// True once either endpoint has latched `go_away_received` (§3: "The
    /// connection is GOAWAY iff either endpoint has `go_away_received`
    /// set").
    fn is_go_away(&self) -> bool {
        self.local().go_away_received() || self.remote().go_away_received()
    }
}

/// A reference registry: a `slab`-backed arena indexed by a
/// `StreamId -> usize` map.
pub struct StreamRegistry {
    slab: Slab<Stream>,
    index: FnvHashMap<StreamId, usize>,
    local: Endpoint,
    remote: Endpoint,
}

impl StreamRegistry {
    pub fn new(local_push_allowed: bool, remote_push_allowed: bool) -> StreamRegistry {
        StreamRegistry {
            slab: Slab::new(),
            index: FnvHashMap::default(),
            local: Endpoint::new(local_push_allowed),
            remote: Endpoint::new(remote_push_allowed),
        }
    }
}

impl ConnectionRegistry for StreamRegistry {
    fn get(&self, id: StreamId) -> Option<&Stream> {
        self.index.get(&id).map(|&slot| &self.slab[slot])
    }

    fn get_mut(&mut self, id: StreamId) -> Option<&mut Stream> {
        let slot = *self.index.get(&id)?;
        Some(&mut self.slab[slot])
    }

    fn insert(&mut self, id: StreamId, state: StreamState) -> &mut Stream {
        assert!(
            !self.index.contains_key(&id),
            "stream {} inserted twice",
            id
        );
        let slot = self.slab.insert(Stream::new(id, state));
        self.index.insert(id, slot);
        &mut self.slab[slot]
    }

    fn remove(&mut self, id: StreamId) {
        if let Some(slot) = self.index.remove(&id) {
            self.slab.remove(slot);
        }
    }

    fn active_count(&self) -> usize {
        self.slab.len()
    }

    fn local(&self) -> &Endpoint {
        &self.local
    }

    fn local_mut(&mut self) -> &mut Endpoint {
        &mut self.local
    }

    fn remote(&self) -> &Endpoint {
        &self.remote
    }

    fn remote_mut(&mut self) -> &mut Endpoint {
        &mut self.remote
    }
}
