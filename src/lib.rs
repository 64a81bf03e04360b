//! A mergeable Fibonacci heap with arena storage
//!
//! This crate provides a Fibonacci heap over any totally ordered value type,
//! together with the graph algorithms its `decrease_key` exists for.
//!
//! # Features
//!
//! - **Fibonacci Heap**: O(1) amortized insert, decrease_key, and merge;
//!   O(log n) amortized remove_minimum
//! - **Checked handles**: nodes live in a generational arena, so a handle to
//!   a removed element is reported as an error instead of dangling
//! - **O(1) merge that keeps handles**: merging moves whole arena segments,
//!   so handles from the absorbed heap keep working on the receiving heap
//! - **Pathfinding**: Dijkstra, A*, bounded reachability and Prim's minimum
//!   spanning tree on top of any [`DecreaseKeyHeap`]
//!
//! # Example
//!
//! ```rust
//! use arena_fibonacci_heap::fibonacci::FibonacciHeap;
//! use arena_fibonacci_heap::HeapError;
//!
//! let mut heap = FibonacciHeap::new();
//! let handle1 = heap.insert(5);
//! heap.insert(3);
//! heap.decrease_key(&handle1, 1).unwrap();
//! assert_eq!(heap.get_minimum(), Ok(&1));
//!
//! assert_eq!(heap.remove_minimum(), Ok(1));
//! assert_eq!(heap.decrease_key(&handle1, 0), Err(HeapError::InvalidHandle));
//! ```

pub mod fibonacci;
pub mod invariants;
pub mod pathfinding;
mod ring;
pub mod storage;
pub mod traits;

// Re-export the main traits for convenience
pub use fibonacci::{FibonacciHandle, FibonacciHeap};
pub use invariants::InvariantViolation;
pub use traits::{DecreaseKeyHeap, Handle, Heap, HeapError};
