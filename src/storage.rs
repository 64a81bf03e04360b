//! Arena storage for heap nodes
//!
//! Nodes live in [`slotmap::SlotMap`]s and refer to each other by [`NodeId`]
//! instead of by pointer. This keeps the cyclic sibling/parent/child graph of
//! a Fibonacci heap free of `unsafe` while leaving every splice O(1).
//!
//! # Segments
//!
//! An arena is a set of *segments*, each a slot map tagged with a
//! process-unique [`SegmentId`]. A [`NodeId`] names a segment and a slot key
//! inside it. New nodes are always placed in the arena's home segment.
//!
//! Absorbing another arena moves its segments over wholesale. No node is
//! moved or re-keyed, so ids handed out by the absorbed arena keep resolving
//! in the receiving one. Whichever side holds fewer segments is the one
//! drained, so the cost never depends on the number of nodes and merging
//! two arenas back and forth stays O(1).
//!
//! # Generations
//!
//! Slot keys are generational: once a node is removed its id never resolves
//! again, even if the slot is reused. This is what lets heap handles report
//! staleness instead of aliasing a newer node.

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use std::fmt;
use std::ops::{Index, IndexMut};
use std::sync::atomic::{AtomicU64, Ordering};

new_key_type! {
    /// Generational slot key within one arena segment
    pub struct SlotKey;
}

/// Process-unique identifier of an arena segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentId(u64);

impl SegmentId {
    fn fresh() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        SegmentId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Identifier of a node stored in a [`NodeArena`]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    segment: SegmentId,
    key: SlotKey,
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({}:{:?})", self.segment.0, self.key)
    }
}

/// Segmented, generational node storage
pub struct NodeArena<N> {
    home: SegmentId,
    segments: FxHashMap<SegmentId, SlotMap<SlotKey, N>>,
    len: usize,
}

impl<N> NodeArena<N> {
    /// Creates an empty arena
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty arena whose home segment can hold `capacity` nodes
    /// without reallocating
    pub fn with_capacity(capacity: usize) -> Self {
        let home = SegmentId::fresh();
        let mut segments = FxHashMap::default();
        segments.insert(home, SlotMap::with_capacity_and_key(capacity));
        Self {
            home,
            segments,
            len: 0,
        }
    }

    /// Number of live nodes across all segments
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of segments currently held (the home segment included)
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Inserts a node built from its own id, so it can link to itself
    pub fn insert_with(&mut self, build: impl FnOnce(NodeId) -> N) -> NodeId {
        let segment = self.home;
        let key = self
            .segments
            .entry(segment)
            .or_default()
            .insert_with_key(|key| build(NodeId { segment, key }));
        self.len += 1;
        NodeId { segment, key }
    }

    /// Inserts a node, returning its id
    pub fn insert(&mut self, node: N) -> NodeId {
        self.insert_with(|_| node)
    }

    /// Removes a node, returning it if the id was live
    ///
    /// A segment other than home is dropped once it runs empty.
    pub fn remove(&mut self, id: NodeId) -> Option<N> {
        let segment = self.segments.get_mut(&id.segment)?;
        let node = segment.remove(id.key)?;
        if segment.is_empty() && id.segment != self.home {
            self.segments.remove(&id.segment);
        }
        self.len -= 1;
        Some(node)
    }

    /// Removes a node that is known to be live
    ///
    /// # Panics
    /// Panics if `id` is stale. Use [`NodeArena::remove`] for ids that
    /// come from outside the structure.
    pub fn take(&mut self, id: NodeId) -> N {
        match self.remove(id) {
            Some(node) => node,
            None => panic!("{id:?} is not live in this arena"),
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&N> {
        self.segments.get(&id.segment)?.get(id.key)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut N> {
        self.segments.get_mut(&id.segment)?.get_mut(id.key)
    }

    /// Returns true if `id` refers to a live node
    pub fn contains(&self, id: NodeId) -> bool {
        self.segments
            .get(&id.segment)
            .is_some_and(|segment| segment.contains_key(id.key))
    }

    /// Moves every segment of `other` into this arena
    ///
    /// The smaller segment table is always drained into the larger one, so
    /// merging two arenas back and forth is O(1) and a segment is moved at
    /// most O(log k) times over any sequence of `k` merges.
    ///
    /// `other` is left empty with a fresh home segment, so nodes it creates
    /// afterwards can never collide with the ids that moved here.
    pub fn absorb(&mut self, other: &mut Self) {
        if other.segments.len() > self.segments.len() {
            std::mem::swap(&mut self.segments, &mut other.segments);
            if self.segments.get(&other.home).is_some_and(|segment| segment.is_empty()) {
                self.segments.remove(&other.home);
            }
        }

        let home = self.home;
        for (segment_id, segment) in other.segments.drain() {
            if !segment.is_empty() || segment_id == home {
                self.segments.insert(segment_id, segment);
            }
        }
        self.len += other.len;
        other.len = 0;
        other.home = SegmentId::fresh();
        other.segments.insert(other.home, SlotMap::with_key());
    }

    /// Drops every node; all previously issued ids become stale
    pub fn clear(&mut self) {
        self.segments.clear();
        self.home = SegmentId::fresh();
        self.segments.insert(self.home, SlotMap::with_key());
        self.len = 0;
    }

    /// Iterates over all live nodes in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &N)> + '_ {
        self.segments.iter().flat_map(|(&segment, slots)| {
            slots
                .iter()
                .map(move |(key, node)| (NodeId { segment, key }, node))
        })
    }

    /// Iterates over all live nodes' payloads in unspecified order
    pub fn values(&self) -> impl Iterator<Item = &N> + '_ {
        self.segments.values().flat_map(|slots| slots.values())
    }
}

impl<N> Default for NodeArena<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> fmt::Debug for NodeArena<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeArena")
            .field("len", &self.len)
            .field("segments", &self.segments.len())
            .finish()
    }
}

impl<N> Index<NodeId> for NodeArena<N> {
    type Output = N;

    fn index(&self, id: NodeId) -> &N {
        match self.get(id) {
            Some(node) => node,
            None => panic!("{id:?} is not live in this arena"),
        }
    }
}

impl<N> IndexMut<NodeId> for NodeArena<N> {
    fn index_mut(&mut self, id: NodeId) -> &mut N {
        match self.get_mut(id) {
            Some(node) => node,
            None => panic!("{id:?} is not live in this arena"),
        }
    }
}
