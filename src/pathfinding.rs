//! Graph algorithms built on `decrease_key`
//!
//! Dijkstra's shortest path, A* search, cost-bounded reachability and Prim's
//! minimum spanning tree, generic over any [`DecreaseKeyHeap`].
//!
//! # Design
//!
//! Only lightweight [`PriorityCost`] entries go into the heap: the ordering
//! key plus a dense index into the search table. A fast hash map (FxHash)
//! maps node states to those indices. When a cheaper route to a queued node
//! is found its entry is lowered in place with `decrease_key` rather than
//! pushed a second time.
//!
//! Dijkstra is A* with h(n) = 0.
//!
//! # Example
//!
//! ```rust
//! use arena_fibonacci_heap::pathfinding::{SearchNode, dijkstra};
//! use arena_fibonacci_heap::fibonacci::FibonacciHeap;
//!
//! #[derive(Clone, PartialEq, Eq, Hash, Debug)]
//! struct GridPos { x: i32, y: i32, goal_x: i32, goal_y: i32 }
//!
//! impl SearchNode for GridPos {
//!     type Cost = u32;
//!
//!     fn successors(&self) -> Vec<(Self, Self::Cost)> {
//!         [(1, 0), (-1, 0), (0, 1), (0, -1)]
//!             .into_iter()
//!             .map(|(dx, dy)| (GridPos { x: self.x + dx, y: self.y + dy, ..*self }, 1))
//!             .collect()
//!     }
//!
//!     fn is_goal(&self) -> bool {
//!         self.x == self.goal_x && self.y == self.goal_y
//!     }
//! }
//!
//! let start = GridPos { x: 0, y: 0, goal_x: 2, goal_y: 2 };
//! let (path, cost) = dijkstra::<_, FibonacciHeap<_>>(&start).unwrap();
//! assert_eq!(cost, 4);
//! assert_eq!(path.len(), 5);
//! ```

use crate::traits::DecreaseKeyHeap;
use rustc_hash::FxHashMap;
use std::hash::Hash;
use std::ops::Add;

/// Trait for types that can be used as costs in graph algorithms.
///
/// `Default` must be the zero cost.
pub trait Cost: Ord + Copy + Add<Output = Self> + Default {}

impl<T> Cost for T where T: Ord + Copy + Add<Output = Self> + Default {}

/// Trait for nodes in a search graph.
///
/// The node carries all context needed to generate its successors and to
/// recognize a goal.
pub trait SearchNode: Clone + Eq + Hash {
    /// The cost type for edge weights
    type Cost: Cost;

    /// Returns all successor nodes along with the cost to reach them.
    fn successors(&self) -> Vec<(Self, Self::Cost)>;

    /// Returns true if this node is a goal state.
    fn is_goal(&self) -> bool;
}

/// Trait for nodes that can provide a heuristic estimate for A* search.
///
/// The heuristic must be admissible (never overestimate the true cost)
/// for A* to find optimal paths.
pub trait AStarNode: SearchNode {
    fn heuristic(&self) -> Self::Cost;
}

/// Index of a node in the search table
pub type NodeIndex = usize;

/// Heap entry: ordered by f-score, then g-score, then index
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PriorityCost<C> {
    /// The f-score: g + h (where h=0 for Dijkstra)
    pub f_score: C,
    /// The actual cost from start (g-score)
    pub g_score: C,
    pub index: NodeIndex,
}

struct NodeEntry<N: SearchNode, H> {
    node: N,
    g_score: N::Cost,
    /// Handle into the heap while the node is still queued
    handle: Option<H>,
    came_from: Option<NodeIndex>,
    closed: bool,
}

/// Search table: node states, their best known costs and heap handles
struct PathFinder<N: SearchNode, H> {
    entries: Vec<NodeEntry<N, H>>,
    state_to_index: FxHashMap<N, NodeIndex>,
}

impl<N: SearchNode, H: Copy> PathFinder<N, H> {
    fn new() -> Self {
        PathFinder {
            entries: Vec::new(),
            state_to_index: FxHashMap::default(),
        }
    }

    /// Gets or creates an index for a node state; the flag is true when the
    /// state was not seen before
    fn index_of(&mut self, node: &N, g_score: N::Cost) -> (NodeIndex, bool) {
        if let Some(&index) = self.state_to_index.get(node) {
            return (index, false);
        }
        let index = self.entries.len();
        self.state_to_index.insert(node.clone(), index);
        self.entries.push(NodeEntry {
            node: node.clone(),
            g_score,
            handle: None,
            came_from: None,
            closed: false,
        });
        (index, true)
    }

    fn reconstruct_path(&self, mut current: NodeIndex) -> Vec<N> {
        let mut path = vec![self.entries[current].node.clone()];
        while let Some(prev) = self.entries[current].came_from {
            path.push(self.entries[prev].node.clone());
            current = prev;
        }
        path.reverse();
        path
    }

    /// Offers a route of cost `g_score` (heap key `f_score`) to `neighbor`
    /// via `from`, queueing it or lowering its queued key when cheaper
    fn relax<Q>(
        &mut self,
        heap: &mut Q,
        neighbor: &N,
        from: NodeIndex,
        g_score: N::Cost,
        f_score: N::Cost,
    ) where
        Q: DecreaseKeyHeap<PriorityCost<N::Cost>, Handle = H>,
    {
        let (index, is_new) = self.index_of(neighbor, g_score);
        let entry = &mut self.entries[index];
        if entry.closed || (!is_new && g_score >= entry.g_score) {
            return;
        }

        entry.g_score = g_score;
        entry.came_from = Some(from);
        let priority = PriorityCost {
            f_score,
            g_score,
            index,
        };
        match entry.handle {
            Some(handle) => {
                // The key only ever shrinks here, so this cannot be rejected
                let lowered = heap.decrease_key(&handle, priority);
                debug_assert!(lowered.is_ok(), "queued entry rejected a lower key");
            }
            None => entry.handle = Some(heap.push_with_handle(priority)),
        }
    }
}

/// Runs Dijkstra's algorithm from `start` until `is_goal()` returns true.
///
/// Returns the path (start and goal inclusive) and its cost, or `None` if
/// no goal is reachable.
pub fn dijkstra<N, H>(start: &N) -> Option<(Vec<N>, N::Cost)>
where
    N: SearchNode,
    H: DecreaseKeyHeap<PriorityCost<N::Cost>>,
{
    search_impl::<N, H>(start, |_| N::Cost::default())
}

/// Runs A* search from `start`, guided by the node's `heuristic()`.
pub fn astar<N, H>(start: &N) -> Option<(Vec<N>, N::Cost)>
where
    N: AStarNode,
    H: DecreaseKeyHeap<PriorityCost<N::Cost>>,
{
    search_impl::<N, H>(start, |n| n.heuristic())
}

fn search_impl<N, H>(start: &N, heuristic: impl Fn(&N) -> N::Cost) -> Option<(Vec<N>, N::Cost)>
where
    N: SearchNode,
    H: DecreaseKeyHeap<PriorityCost<N::Cost>>,
{
    let zero = N::Cost::default();
    let mut heap = H::new();
    let mut finder: PathFinder<N, H::Handle> = PathFinder::new();

    let (start_index, _) = finder.index_of(start, zero);
    let handle = heap.push_with_handle(PriorityCost {
        f_score: heuristic(start),
        g_score: zero,
        index: start_index,
    });
    finder.entries[start_index].handle = Some(handle);

    while let Some(priority) = heap.pop() {
        let current_index = priority.index;
        let entry = &mut finder.entries[current_index];
        if entry.closed {
            continue;
        }
        entry.closed = true;
        entry.handle = None;

        let current = entry.node.clone();
        let current_g = priority.g_score;
        if current.is_goal() {
            return Some((finder.reconstruct_path(current_index), current_g));
        }

        for (neighbor, edge_cost) in current.successors() {
            let tentative_g = current_g + edge_cost;
            let f = tentative_g + heuristic(&neighbor);
            finder.relax(&mut heap, &neighbor, current_index, tentative_g, f);
        }
    }

    None
}

/// Returns every node reachable from `start` at total cost `<= max_cost`,
/// with its cheapest cost, in non-decreasing cost order.
pub fn reachable_within<N, H>(start: &N, max_cost: N::Cost) -> Vec<(N, N::Cost)>
where
    N: SearchNode,
    H: DecreaseKeyHeap<PriorityCost<N::Cost>>,
{
    let zero = N::Cost::default();
    let mut heap = H::new();
    let mut finder: PathFinder<N, H::Handle> = PathFinder::new();
    let mut result = Vec::new();

    if zero > max_cost {
        return result;
    }

    let (start_index, _) = finder.index_of(start, zero);
    let handle = heap.push_with_handle(PriorityCost {
        f_score: zero,
        g_score: zero,
        index: start_index,
    });
    finder.entries[start_index].handle = Some(handle);

    while let Some(priority) = heap.pop() {
        let current_index = priority.index;
        let entry = &mut finder.entries[current_index];
        if entry.closed {
            continue;
        }
        entry.closed = true;
        entry.handle = None;

        let current = entry.node.clone();
        let current_g = priority.g_score;
        result.push((current.clone(), current_g));

        for (neighbor, edge_cost) in current.successors() {
            let tentative_g = current_g + edge_cost;
            if tentative_g <= max_cost {
                finder.relax(&mut heap, &neighbor, current_index, tentative_g, tentative_g);
            }
        }
    }

    result
}

/// A spanning tree found by [`minimum_spanning_tree`]
#[derive(Debug, Clone)]
pub struct SpanningTree<N: SearchNode> {
    /// Tree edges as `(parent, child, weight)`, in the order they were added
    pub edges: Vec<(N, N, N::Cost)>,
    /// Sum of all edge weights
    pub total_cost: N::Cost,
}

/// Runs Prim's algorithm over the component reachable from `start`.
///
/// `successors()` is read as an undirected edge list, so it should be
/// symmetric: if `b` is a successor of `a` with weight `w`, then `a` should
/// be a successor of `b` with the same weight.
pub fn minimum_spanning_tree<N, H>(start: &N) -> SpanningTree<N>
where
    N: SearchNode,
    H: DecreaseKeyHeap<PriorityCost<N::Cost>>,
{
    let zero = N::Cost::default();
    let mut heap = H::new();
    let mut finder: PathFinder<N, H::Handle> = PathFinder::new();
    let mut tree = SpanningTree {
        edges: Vec::new(),
        total_cost: zero,
    };

    let (start_index, _) = finder.index_of(start, zero);
    let handle = heap.push_with_handle(PriorityCost {
        f_score: zero,
        g_score: zero,
        index: start_index,
    });
    finder.entries[start_index].handle = Some(handle);

    while let Some(priority) = heap.pop() {
        let current_index = priority.index;
        let entry = &mut finder.entries[current_index];
        if entry.closed {
            continue;
        }
        entry.closed = true;
        entry.handle = None;

        let current = entry.node.clone();
        if let Some(parent) = entry.came_from {
            let weight = priority.g_score;
            tree.edges
                .push((finder.entries[parent].node.clone(), current.clone(), weight));
            tree.total_cost = tree.total_cost + weight;
        }

        // Keyed by the single connecting edge, not the distance from start
        for (neighbor, weight) in current.successors() {
            finder.relax(&mut heap, &neighbor, current_index, weight, weight);
        }
    }

    tree
}
