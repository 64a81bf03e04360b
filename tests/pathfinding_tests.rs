//! Tests for the graph algorithms built on the Fibonacci heap
//!
//! Tests cover:
//! - Dijkstra and A* on lines, grids and weighted graphs
//! - Edge cases (start is goal, unreachable goals, cycles)
//! - Paths that are only optimal if decrease_key is applied correctly
//! - Cost-bounded reachability
//! - Prim's minimum spanning tree

use arena_fibonacci_heap::fibonacci::FibonacciHeap;
use arena_fibonacci_heap::pathfinding::{
    astar, dijkstra, minimum_spanning_tree, reachable_within, AStarNode, SearchNode,
};
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

type Fib<C> = FibonacciHeap<arena_fibonacci_heap::pathfinding::PriorityCost<C>>;

// ============================================================================
// Test Node Types
// ============================================================================

/// Position on a square grid, carrying its goal
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
struct GridPos {
    x: i32,
    y: i32,
    size: i32,
    goal_x: i32,
    goal_y: i32,
}

impl GridPos {
    fn new(x: i32, y: i32, size: i32, goal_x: i32, goal_y: i32) -> Self {
        GridPos {
            x,
            y,
            size,
            goal_x,
            goal_y,
        }
    }
}

impl SearchNode for GridPos {
    type Cost = u32;

    fn successors(&self) -> Vec<(Self, u32)> {
        [(1, 0), (-1, 0), (0, 1), (0, -1)]
            .into_iter()
            .map(|(dx, dy)| (self.x + dx, self.y + dy))
            .filter(|&(x, y)| x >= 0 && y >= 0 && x < self.size && y < self.size)
            .map(|(x, y)| (GridPos { x, y, ..self.clone() }, 1))
            .collect()
    }

    fn is_goal(&self) -> bool {
        self.x == self.goal_x && self.y == self.goal_y
    }
}

impl AStarNode for GridPos {
    fn heuristic(&self) -> u32 {
        self.x.abs_diff(self.goal_x) + self.y.abs_diff(self.goal_y)
    }
}

/// Explicit weighted graph
struct TestGraph {
    edges: HashMap<char, Vec<(char, u32)>>,
}

impl TestGraph {
    fn new() -> Self {
        TestGraph {
            edges: HashMap::new(),
        }
    }

    fn add_edge(&mut self, from: char, to: char, weight: u32) {
        self.edges.entry(from).or_default().push((to, weight));
    }

    fn add_undirected_edge(&mut self, a: char, b: char, weight: u32) {
        self.add_edge(a, b, weight);
        self.add_edge(b, a, weight);
    }

    fn node(&self, id: char, goal: char) -> GraphNode<'_> {
        GraphNode {
            graph: self,
            id,
            goal,
        }
    }
}

#[derive(Clone)]
struct GraphNode<'a> {
    graph: &'a TestGraph,
    id: char,
    goal: char,
}

impl PartialEq for GraphNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for GraphNode<'_> {}

impl Hash for GraphNode<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl SearchNode for GraphNode<'_> {
    type Cost = u32;

    fn successors(&self) -> Vec<(Self, u32)> {
        self.graph
            .edges
            .get(&self.id)
            .map(|edges| {
                edges
                    .iter()
                    .map(|&(to, w)| (self.graph.node(to, self.goal), w))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn is_goal(&self) -> bool {
        self.id == self.goal
    }
}

fn ids(path: &[GraphNode<'_>]) -> String {
    path.iter().map(|n| n.id).collect()
}

// ============================================================================
// Dijkstra / A*
// ============================================================================

#[test]
fn test_grid_corner_to_corner() {
    let start = GridPos::new(0, 0, 10, 9, 9);
    let (path, cost) = dijkstra::<_, Fib<u32>>(&start).unwrap();
    assert_eq!(cost, 18);
    assert_eq!(path.len(), 19);
    assert!(path.last().unwrap().is_goal());

    let (astar_path, astar_cost) = astar::<_, Fib<u32>>(&start).unwrap();
    assert_eq!(astar_cost, 18);
    assert_eq!(astar_path.len(), 19);
}

#[test]
fn test_start_equals_goal() {
    let start = GridPos::new(3, 3, 10, 3, 3);
    let (path, cost) = dijkstra::<_, Fib<u32>>(&start).unwrap();
    assert_eq!(cost, 0);
    assert_eq!(path, vec![start]);
}

#[test]
fn test_unreachable_goal() {
    let start = GridPos::new(0, 0, 5, 7, 7);
    assert!(dijkstra::<_, Fib<u32>>(&start).is_none());
    assert!(astar::<_, Fib<u32>>(&start).is_none());
}

#[test]
fn test_decrease_key_optimal_path() {
    // The direct edge to D is queued first but is more expensive than the
    // detour, so D's entry must be lowered with decrease_key
    let mut graph = TestGraph::new();
    graph.add_edge('A', 'D', 10);
    graph.add_edge('A', 'B', 1);
    graph.add_edge('B', 'C', 1);
    graph.add_edge('C', 'D', 1);
    graph.add_edge('D', 'E', 1);

    let (path, cost) = dijkstra::<_, Fib<u32>>(&graph.node('A', 'E')).unwrap();
    assert_eq!(cost, 4);
    assert_eq!(ids(&path), "ABCDE");
}

#[test]
fn test_weighted_graph_with_multiple_paths() {
    let mut graph = TestGraph::new();
    graph.add_edge('S', 'A', 7);
    graph.add_edge('S', 'B', 2);
    graph.add_edge('B', 'A', 3);
    graph.add_edge('A', 'T', 1);
    graph.add_edge('B', 'C', 8);
    graph.add_edge('C', 'T', 1);

    let (path, cost) = dijkstra::<_, Fib<u32>>(&graph.node('S', 'T')).unwrap();
    assert_eq!(cost, 6);
    assert_eq!(ids(&path), "SBAT");
}

#[test]
fn test_graph_with_cycles() {
    let mut graph = TestGraph::new();
    graph.add_edge('A', 'B', 1);
    graph.add_edge('B', 'C', 1);
    graph.add_edge('C', 'A', 1);
    graph.add_edge('C', 'D', 5);

    let (path, cost) = dijkstra::<_, Fib<u32>>(&graph.node('A', 'D')).unwrap();
    assert_eq!(cost, 7);
    assert_eq!(ids(&path), "ABCD");
}

// ============================================================================
// Reachability
// ============================================================================

#[test]
fn test_reachable_within_grid() {
    let start = GridPos::new(5, 5, 11, -1, -1);
    let reached = reachable_within::<_, Fib<u32>>(&start, 2);

    // Diamond of radius 2: 1 + 4 + 8
    assert_eq!(reached.len(), 13);
    assert!(reached.iter().all(|(_, c)| *c <= 2));
    assert!(reached.windows(2).all(|w| w[0].1 <= w[1].1));
    assert_eq!(reached[0], (start, 0));
}

#[test]
fn test_reachable_within_uses_cheapest_cost() {
    let mut graph = TestGraph::new();
    graph.add_edge('A', 'C', 9);
    graph.add_edge('A', 'B', 1);
    graph.add_edge('B', 'C', 1);

    let reached = reachable_within::<_, Fib<u32>>(&graph.node('A', '-'), 5);
    let costs: HashMap<char, u32> = reached.iter().map(|(n, c)| (n.id, *c)).collect();
    assert_eq!(costs.len(), 3);
    assert_eq!(costs[&'C'], 2);
}

// ============================================================================
// Minimum spanning tree
// ============================================================================

#[test]
fn test_minimum_spanning_tree() {
    let mut graph = TestGraph::new();
    graph.add_undirected_edge('A', 'B', 4);
    graph.add_undirected_edge('A', 'H', 8);
    graph.add_undirected_edge('B', 'C', 8);
    graph.add_undirected_edge('B', 'H', 11);
    graph.add_undirected_edge('C', 'D', 7);
    graph.add_undirected_edge('C', 'F', 4);
    graph.add_undirected_edge('C', 'I', 2);
    graph.add_undirected_edge('D', 'E', 9);
    graph.add_undirected_edge('D', 'F', 14);
    graph.add_undirected_edge('E', 'F', 10);
    graph.add_undirected_edge('F', 'G', 2);
    graph.add_undirected_edge('G', 'H', 1);
    graph.add_undirected_edge('G', 'I', 6);
    graph.add_undirected_edge('H', 'I', 7);

    let tree = minimum_spanning_tree::<_, Fib<u32>>(&graph.node('A', '-'));
    assert_eq!(tree.edges.len(), 8);
    assert_eq!(tree.total_cost, 37);
    let weight_sum: u32 = tree.edges.iter().map(|(_, _, w)| *w).sum();
    assert_eq!(weight_sum, 37);
}

#[test]
fn test_minimum_spanning_tree_single_node() {
    let graph = TestGraph::new();
    let tree = minimum_spanning_tree::<_, Fib<u32>>(&graph.node('A', '-'));
    assert!(tree.edges.is_empty());
    assert_eq!(tree.total_cost, 0);
}

#[test]
fn test_minimum_spanning_tree_prefers_cheaper_later_edge() {
    // C is first reached through the heavy edge from A, then lowered via B
    let mut graph = TestGraph::new();
    graph.add_undirected_edge('A', 'C', 10);
    graph.add_undirected_edge('A', 'B', 1);
    graph.add_undirected_edge('B', 'C', 2);

    let tree = minimum_spanning_tree::<_, Fib<u32>>(&graph.node('A', '-'));
    assert_eq!(tree.total_cost, 3);
    let edges: Vec<(char, char, u32)> = tree.edges.iter().map(|(a, b, w)| (a.id, b.id, *w)).collect();
    assert_eq!(edges, vec![('A', 'B', 1), ('B', 'C', 2)]);
}
