//! Circular doubly-linked sibling lists over arena ids
//!
//! Every level of a Fibonacci heap (the root list and each node's children)
//! is a ring: a single node points to itself, there is no head or tail, and
//! splicing two rings together is O(1). A ring is named by any one of its
//! members; `None` is the empty ring.

use crate::fibonacci::Node;
use crate::storage::{NodeArena, NodeId};

/// Splices ring `b` into ring `a` and returns the member with the smaller
/// value (ties keep `a`)
///
/// The rings must be disjoint.
pub(crate) fn merge<T: Ord>(
    nodes: &mut NodeArena<Node<T>>,
    a: Option<NodeId>,
    b: Option<NodeId>,
) -> Option<NodeId> {
    let (mut a, mut b) = match (a, b) {
        (None, b) => return b,
        (a, None) => return a,
        (Some(a), Some(b)) => (a, b),
    };
    if nodes[a].value > nodes[b].value {
        std::mem::swap(&mut a, &mut b);
    }

    let a_next = nodes[a].next;
    let b_prev = nodes[b].prev;
    nodes[a].next = b;
    nodes[b].prev = a;
    nodes[a_next].prev = b_prev;
    nodes[b_prev].next = a_next;

    Some(a)
}

/// Removes `id` from its ring and leaves it as a singleton
pub(crate) fn unlink<T>(nodes: &mut NodeArena<Node<T>>, id: NodeId) {
    let prev = nodes[id].prev;
    let next = nodes[id].next;
    nodes[prev].next = next;
    nodes[next].prev = prev;

    let node = &mut nodes[id];
    node.prev = id;
    node.next = id;
}

/// Walks a ring once, starting at `start`
pub(crate) fn siblings<T>(nodes: &NodeArena<Node<T>>, start: NodeId) -> Siblings<'_, T> {
    Siblings {
        nodes,
        start,
        next: Some(start),
    }
}

/// Returns the ring member with the smallest value, scanning the ring exactly
/// once (ties keep the earliest member after `start`)
pub(crate) fn min_of<T: Ord>(nodes: &NodeArena<Node<T>>, start: NodeId) -> NodeId {
    siblings(nodes, start).fold(start, |best, id| {
        if nodes[id].value < nodes[best].value {
            id
        } else {
            best
        }
    })
}

pub(crate) struct Siblings<'a, T> {
    nodes: &'a NodeArena<Node<T>>,
    start: NodeId,
    next: Option<NodeId>,
}

impl<T> Iterator for Siblings<'_, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        let after = self.nodes[current].next;
        self.next = (after != self.start).then_some(after);
        Some(current)
    }
}
