//! Fibonacci Heap implementation
//!
//! A Fibonacci heap is a data structure for priority queue operations with:
//! - O(1) amortized insert, decrease_key, and merge
//! - O(log n) amortized remove_minimum
//!
//! The structure consists of a collection of heap-ordered trees. Roots are
//! linked in a circular doubly linked list, and so is every node's set of
//! children. Trees are only combined lazily, by the consolidation pass that
//! runs when the minimum is removed.
//!
//! Nodes live in a [`NodeArena`] and link to each other by id, so handles are
//! plain generation-tagged ids: using a handle after its element was removed
//! is reported as [`HeapError::InvalidHandle`] rather than being undefined.

use crate::ring;
use crate::storage::{NodeArena, NodeId};
use crate::traits::{DecreaseKeyHeap, Handle, Heap, HeapError};
use smallvec::{smallvec, SmallVec};
use std::fmt;
use tracing::{debug, trace};

/// Golden ratio; the degree of any node in an n-node heap is at most log_φ(n)
const PHI: f64 = 1.618_033_988_749_895;

/// Handle to an element in a Fibonacci heap
///
/// Handles stay valid until their element is removed or the heap is cleared.
/// After [`FibonacciHeap::append`] they address the receiving heap.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct FibonacciHandle {
    id: NodeId,
}

impl FibonacciHandle {
    /// The arena id of the element
    pub fn id(&self) -> NodeId {
        self.id
    }
}

impl Handle for FibonacciHandle {}

pub(crate) struct Node<T> {
    pub(crate) value: T,
    pub(crate) parent: Option<NodeId>,
    pub(crate) child: Option<NodeId>,
    pub(crate) prev: NodeId,
    pub(crate) next: NodeId,
    pub(crate) degree: usize,
    pub(crate) marked: bool,
}

impl<T> Node<T> {
    /// A parentless, childless node whose sibling ring is just itself
    pub(crate) fn singleton(id: NodeId, value: T) -> Self {
        Node {
            value,
            parent: None,
            child: None,
            prev: id,
            next: id,
            degree: 0,
            marked: false,
        }
    }
}

/// Fibonacci Heap
///
/// # Example
///
/// ```rust
/// use arena_fibonacci_heap::fibonacci::FibonacciHeap;
///
/// let mut heap = FibonacciHeap::new();
/// let handle = heap.insert(5);
/// heap.insert(3);
/// heap.decrease_key(&handle, 1).unwrap();
/// assert_eq!(heap.get_minimum(), Ok(&1));
/// assert_eq!(heap.remove_minimum(), Ok(1));
/// ```
pub struct FibonacciHeap<T> {
    pub(crate) min: Option<NodeId>,
    pub(crate) nodes: NodeArena<Node<T>>,
}

impl<T: Ord> FibonacciHeap<T> {
    /// Creates an empty heap
    pub fn new() -> Self {
        Self {
            min: None,
            nodes: NodeArena::new(),
        }
    }

    /// Creates an empty heap with room for `capacity` elements
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            min: None,
            nodes: NodeArena::with_capacity(capacity),
        }
    }

    /// Returns true if the heap holds no elements
    pub fn is_empty(&self) -> bool {
        self.min.is_none()
    }

    /// Returns the number of elements, counted by the arena
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Inserts a value as a new single-node tree in the root list
    ///
    /// # Time Complexity
    /// O(1)
    pub fn insert(&mut self, value: T) -> FibonacciHandle {
        let id = self.nodes.insert_with(|id| Node::singleton(id, value));
        self.min = ring::merge(&mut self.nodes, self.min, Some(id));
        FibonacciHandle { id }
    }

    /// Moves every element of `other` into this heap, leaving `other` empty
    ///
    /// Handles issued by `other` remain valid and now refer to this heap.
    ///
    /// # Time Complexity
    /// O(1) in the number of elements
    pub fn append(&mut self, other: &mut Self) {
        self.nodes.absorb(&mut other.nodes);
        self.min = ring::merge(&mut self.nodes, self.min, other.min.take());
        debug!(
            len = self.nodes.len(),
            segments = self.nodes.segment_count(),
            "merged heaps"
        );
    }

    /// Returns the minimum value without removing it
    ///
    /// # Errors
    /// [`HeapError::EmptyHeap`] if the heap has no elements
    pub fn get_minimum(&self) -> Result<&T, HeapError> {
        let min = self.min.ok_or(HeapError::EmptyHeap)?;
        Ok(&self.nodes[min].value)
    }

    /// Removes and returns the minimum value
    ///
    /// # Errors
    /// [`HeapError::EmptyHeap`] if the heap has no elements
    ///
    /// # Time Complexity
    /// O(log n) amortized
    pub fn remove_minimum(&mut self) -> Result<T, HeapError> {
        let min = self.min.ok_or(HeapError::EmptyHeap)?;

        // Children become roots: no parent, no mark
        let child = self.nodes[min].child.take();
        if let Some(child) = child {
            let children: SmallVec<[NodeId; 16]> = ring::siblings(&self.nodes, child).collect();
            for id in children {
                let node = &mut self.nodes[id];
                node.parent = None;
                node.marked = false;
            }
        }

        let next = self.nodes[min].next;
        let roots = if next == min {
            child
        } else {
            ring::unlink(&mut self.nodes, min);
            ring::merge(&mut self.nodes, Some(next), child)
        };

        let removed = self.nodes.take(min);
        match roots {
            Some(start) => self.consolidate(start),
            None => self.min = None,
        }

        Ok(removed.value)
    }

    /// Lowers the value of the element behind `handle`
    ///
    /// A value equal to the current one is accepted and changes nothing
    /// structurally. If the node now violates heap order it is cut from its
    /// parent, followed by a cascading cut up the marked ancestors.
    ///
    /// # Errors
    /// - [`HeapError::InvalidHandle`] if the element was already removed
    /// - [`HeapError::ValueNotDecreased`] if `value` is greater than the
    ///   current value
    ///
    /// Either error leaves the heap unchanged.
    ///
    /// # Time Complexity
    /// O(1) amortized
    pub fn decrease_key(&mut self, handle: &FibonacciHandle, value: T) -> Result<(), HeapError> {
        let id = handle.id;
        let node = self.nodes.get_mut(id).ok_or(HeapError::InvalidHandle)?;
        if value > node.value {
            return Err(HeapError::ValueNotDecreased);
        }
        node.value = value;

        match self.nodes[id].parent {
            None => {
                if let Some(min) = self.min {
                    if self.nodes[id].value < self.nodes[min].value {
                        self.min = Some(id);
                    }
                }
            }
            Some(parent) => {
                if self.nodes[id].value < self.nodes[parent].value {
                    self.cut(id, parent);
                    self.cascading_cut(parent);
                }
            }
        }

        Ok(())
    }

    /// Finds an element equal to `value`
    ///
    /// Searches every tree depth-first, starting at the minimum root.
    ///
    /// # Time Complexity
    /// O(n)
    pub fn find(&self, value: &T) -> Option<FibonacciHandle> {
        let mut stack: Vec<NodeId> = Vec::new();
        push_ring(&mut stack, &self.nodes, self.min?);

        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            if node.value == *value {
                return Some(FibonacciHandle { id });
            }
            if let Some(child) = node.child {
                push_ring(&mut stack, &self.nodes, child);
            }
        }

        None
    }

    /// Returns the value behind `handle`
    ///
    /// # Errors
    /// [`HeapError::InvalidHandle`] if the element was already removed
    pub fn get(&self, handle: &FibonacciHandle) -> Result<&T, HeapError> {
        self.nodes
            .get(handle.id)
            .map(|node| &node.value)
            .ok_or(HeapError::InvalidHandle)
    }

    /// Returns true if the element behind `handle` is still in the heap
    pub fn contains(&self, handle: &FibonacciHandle) -> bool {
        self.nodes.contains(handle.id)
    }

    /// Removes every element; all issued handles become invalid
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.min = None;
    }

    /// Iterates over the values in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.nodes.values().map(|node| &node.value)
    }

    /// Consumes the heap, returning its values in non-decreasing order
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut sorted = Vec::with_capacity(self.len());
        while let Ok(value) = self.remove_minimum() {
            sorted.push(value);
        }
        sorted
    }

    /// Links roots of equal degree until every degree is unique, then
    /// rescans the root list for the minimum
    fn consolidate(&mut self, start: NodeId) {
        let roots: Vec<NodeId> = ring::siblings(&self.nodes, start).collect();
        let root_count = roots.len();
        let mut by_degree: SmallVec<[Option<NodeId>; 64]> =
            smallvec![None; max_degree(self.len()) + 1];
        let mut links = 0usize;
        let mut last = start;

        for root in roots {
            let mut x = root;
            let mut degree = self.nodes[x].degree;
            loop {
                if degree >= by_degree.len() {
                    by_degree.resize(degree + 1, None);
                }
                match by_degree[degree].take() {
                    Some(mut y) => {
                        if self.nodes[y].value < self.nodes[x].value {
                            std::mem::swap(&mut x, &mut y);
                        }
                        self.link(y, x);
                        links += 1;
                        degree += 1;
                    }
                    None => {
                        by_degree[degree] = Some(x);
                        break;
                    }
                }
            }
            last = x;
        }

        self.min = Some(ring::min_of(&self.nodes, last));
        trace!(
            roots_before = root_count,
            roots_after = root_count - links,
            links,
            "consolidated root list"
        );
    }

    /// Makes root `child` a child of root `parent`
    fn link(&mut self, child: NodeId, parent: NodeId) {
        ring::unlink(&mut self.nodes, child);
        let node = &mut self.nodes[child];
        node.parent = Some(parent);
        node.marked = false;

        let siblings = self.nodes[parent].child;
        let merged = ring::merge(&mut self.nodes, siblings, Some(child));
        let parent = &mut self.nodes[parent];
        parent.child = merged;
        parent.degree += 1;
    }

    /// Cuts `id` from `parent` and adds it to the root list
    fn cut(&mut self, id: NodeId, parent: NodeId) {
        let next = self.nodes[id].next;
        if self.nodes[parent].child == Some(id) {
            self.nodes[parent].child = (next != id).then_some(next);
        }
        ring::unlink(&mut self.nodes, id);
        self.nodes[parent].degree -= 1;

        let node = &mut self.nodes[id];
        node.parent = None;
        node.marked = false;

        // Merging returns the smaller head, which keeps `min` current
        self.min = ring::merge(&mut self.nodes, self.min, Some(id));
    }

    /// Walks up from `start`, cutting marked ancestors; the first unmarked
    /// non-root ancestor gets marked
    fn cascading_cut(&mut self, start: NodeId) {
        let mut current = start;
        let mut chain = 0usize;

        while let Some(parent) = self.nodes[current].parent {
            if !self.nodes[current].marked {
                self.nodes[current].marked = true;
                break;
            }
            self.cut(current, parent);
            chain += 1;
            current = parent;
        }

        if chain > 0 {
            trace!(chain, "cascading cut");
        }
    }
}

/// Pushes the members of a ring so that they pop in ring order
fn push_ring<T>(stack: &mut Vec<NodeId>, nodes: &NodeArena<Node<T>>, start: NodeId) {
    let base = stack.len();
    stack.extend(ring::siblings(nodes, start));
    stack[base..].reverse();
}

/// Upper bound on root degrees during consolidation of an `n`-node heap
fn max_degree(n: usize) -> usize {
    if n < 2 {
        1
    } else {
        ((n as f64).ln() / PHI.ln()) as usize + 1
    }
}

impl<T: Ord> Default for FibonacciHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord + fmt::Debug> fmt::Debug for FibonacciHeap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FibonacciHeap")
            .field("len", &self.len())
            .field("min", &self.get_minimum().ok())
            .finish()
    }
}

impl<T: Ord> FromIterator<T> for FibonacciHeap<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut heap = Self::with_capacity(iter.size_hint().0);
        heap.extend(iter);
        heap
    }
}

impl<T: Ord> Extend<T> for FibonacciHeap<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T: Ord> Heap<T> for FibonacciHeap<T> {
    fn new() -> Self {
        FibonacciHeap::new()
    }

    fn is_empty(&self) -> bool {
        FibonacciHeap::is_empty(self)
    }

    fn len(&self) -> usize {
        FibonacciHeap::len(self)
    }

    fn push(&mut self, value: T) {
        self.insert(value);
    }

    fn peek(&self) -> Option<&T> {
        self.get_minimum().ok()
    }

    fn pop(&mut self) -> Option<T> {
        self.remove_minimum().ok()
    }

    fn merge(&mut self, mut other: Self) {
        self.append(&mut other);
    }
}

impl<T: Ord> DecreaseKeyHeap<T> for FibonacciHeap<T> {
    type Handle = FibonacciHandle;

    fn push_with_handle(&mut self, value: T) -> FibonacciHandle {
        self.insert(value)
    }

    fn decrease_key(&mut self, handle: &FibonacciHandle, new_value: T) -> Result<(), HeapError> {
        FibonacciHeap::decrease_key(self, handle, new_value)
    }
}
