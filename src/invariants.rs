//! Structural invariant checking for [`FibonacciHeap`]
//!
//! [`FibonacciHeap::check_invariants`] walks the whole forest and reports the
//! first violated invariant:
//! - every sibling ring is consistent (`next(prev(x)) == x`)
//! - parent links match the list a node sits in
//! - roots are unmarked
//! - `degree` matches the number of children
//! - heap order: parent <= child
//! - the minimum pointer names the smallest root
//! - every live node is reachable exactly once
//!
//! The walk never trusts the links it is checking, so a corrupted structure
//! yields an error rather than an endless loop. Cost is O(n).

use crate::fibonacci::FibonacciHeap;
use crate::storage::NodeId;
use rustc_hash::FxHashSet;
use std::fmt;

/// A violated structural invariant
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A link points at a node that is not live
    DanglingLink { from: NodeId, to: NodeId },
    /// `next`/`prev` of neighboring nodes disagree
    BrokenRing(NodeId),
    /// A node's parent link does not name the owner of its sibling list
    WrongParent {
        node: NodeId,
        expected: Option<NodeId>,
        found: Option<NodeId>,
    },
    /// A root carries a mark
    MarkedRoot(NodeId),
    /// `degree` differs from the length of the child list
    DegreeMismatch {
        node: NodeId,
        degree: usize,
        children: usize,
    },
    /// A child is smaller than its parent
    HeapOrder { parent: NodeId, child: NodeId },
    /// The minimum pointer is missing, not a root, or not the smallest root
    StaleMinimum,
    /// A node is reachable along more than one path
    Cycle(NodeId),
    /// The reachable node count differs from the stored element count
    LengthMismatch { reachable: usize, len: usize },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvariantViolation::DanglingLink { from, to } => {
                write!(f, "{from:?} links to {to:?}, which is not live")
            }
            InvariantViolation::BrokenRing(id) => {
                write!(f, "sibling ring is inconsistent at {id:?}")
            }
            InvariantViolation::WrongParent {
                node,
                expected,
                found,
            } => write!(
                f,
                "{node:?} has parent {found:?} but sits in the list of {expected:?}"
            ),
            InvariantViolation::MarkedRoot(id) => write!(f, "root {id:?} is marked"),
            InvariantViolation::DegreeMismatch {
                node,
                degree,
                children,
            } => write!(
                f,
                "{node:?} has degree {degree} but {children} children"
            ),
            InvariantViolation::HeapOrder { parent, child } => {
                write!(f, "child {child:?} is smaller than its parent {parent:?}")
            }
            InvariantViolation::StaleMinimum => {
                write!(f, "minimum pointer does not name the smallest root")
            }
            InvariantViolation::Cycle(id) => write!(f, "{id:?} is reachable twice"),
            InvariantViolation::LengthMismatch { reachable, len } => {
                write!(f, "{reachable} nodes reachable but len is {len}")
            }
        }
    }
}

impl std::error::Error for InvariantViolation {}

impl<T: Ord> FibonacciHeap<T> {
    /// Verifies every structural invariant of the heap
    ///
    /// Intended for tests and debugging; runs in O(n).
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let Some(min) = self.min else {
            return match self.len() {
                0 => Ok(()),
                len => Err(InvariantViolation::LengthMismatch { reachable: 0, len }),
            };
        };
        let min_node = self
            .nodes
            .get(min)
            .ok_or(InvariantViolation::StaleMinimum)?;
        if min_node.parent.is_some() {
            return Err(InvariantViolation::StaleMinimum);
        }

        let mut visited: FxHashSet<NodeId> = FxHashSet::default();
        // (first member of a sibling list, owner of that list)
        let mut pending: Vec<(NodeId, Option<NodeId>)> = vec![(min, None)];

        while let Some((start, owner)) = pending.pop() {
            let members = self.check_ring(start, owner, &mut visited)?;

            if let Some(owner) = owner {
                let degree = self.nodes[owner].degree;
                if degree != members.len() {
                    return Err(InvariantViolation::DegreeMismatch {
                        node: owner,
                        degree,
                        children: members.len(),
                    });
                }
            }

            for id in members {
                let node = &self.nodes[id];
                if owner.is_none() && node.value < min_node.value {
                    return Err(InvariantViolation::StaleMinimum);
                }
                match node.child {
                    Some(child) => {
                        if !self.nodes.contains(child) {
                            return Err(InvariantViolation::DanglingLink { from: id, to: child });
                        }
                        pending.push((child, Some(id)));
                    }
                    None if node.degree != 0 => {
                        return Err(InvariantViolation::DegreeMismatch {
                            node: id,
                            degree: node.degree,
                            children: 0,
                        });
                    }
                    None => {}
                }
            }
        }

        if visited.len() != self.len() {
            return Err(InvariantViolation::LengthMismatch {
                reachable: visited.len(),
                len: self.len(),
            });
        }
        Ok(())
    }

    /// Walks one sibling ring, checking links, parents, marks and heap order
    fn check_ring(
        &self,
        start: NodeId,
        owner: Option<NodeId>,
        visited: &mut FxHashSet<NodeId>,
    ) -> Result<Vec<NodeId>, InvariantViolation> {
        let mut members = Vec::new();
        let mut current = start;

        loop {
            if !visited.insert(current) {
                return Err(InvariantViolation::Cycle(current));
            }
            let node = &self.nodes[current];

            for neighbor in [node.next, node.prev] {
                if !self.nodes.contains(neighbor) {
                    return Err(InvariantViolation::DanglingLink {
                        from: current,
                        to: neighbor,
                    });
                }
            }
            if self.nodes[node.next].prev != current || self.nodes[node.prev].next != current {
                return Err(InvariantViolation::BrokenRing(current));
            }

            if node.parent != owner {
                return Err(InvariantViolation::WrongParent {
                    node: current,
                    expected: owner,
                    found: node.parent,
                });
            }
            match owner {
                None if node.marked => return Err(InvariantViolation::MarkedRoot(current)),
                Some(parent) if node.value < self.nodes[parent].value => {
                    return Err(InvariantViolation::HeapOrder {
                        parent,
                        child: current,
                    });
                }
                _ => {}
            }

            members.push(current);
            current = node.next;
            if current == start {
                return Ok(members);
            }
        }
    }
}
