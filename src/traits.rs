//! Common traits for heap data structures
//!
//! This module provides a two-tier trait hierarchy:
//!
//! - [`Heap`]: Base trait for a min-heap of totally ordered values
//! - [`DecreaseKeyHeap`]: Extended trait adding handles and `decrease_key`
//!
//! The base [`Heap`] trait mirrors the shape of `std::collections::BinaryHeap`
//! (but as a min-heap), while [`DecreaseKeyHeap`] adds the operations needed
//! by algorithms like Dijkstra's shortest path and Prim's spanning tree.

use std::fmt;

/// Error type for heap operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapError {
    /// The minimum was requested from a heap with no elements
    EmptyHeap,
    /// The handle is no longer valid (element was removed or the heap cleared)
    InvalidHandle,
    /// The new value is greater than the current value
    ValueNotDecreased,
}

impl fmt::Display for HeapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeapError::EmptyHeap => write!(f, "heap is empty"),
            HeapError::InvalidHandle => {
                write!(f, "handle is no longer valid (element was removed)")
            }
            HeapError::ValueNotDecreased => {
                write!(f, "new value is greater than the current value")
            }
        }
    }
}

impl std::error::Error for HeapError {}

/// A handle to an element in the heap, used for decrease_key operations
///
/// Handles are cheap `Copy` identifiers. They never borrow the heap, so a
/// handle can outlive its element; operations on such a stale handle return
/// [`HeapError::InvalidHandle`].
pub trait Handle: Copy + PartialEq + Eq {}

/// Base trait for min-heaps over totally ordered values
///
/// # Example
///
/// ```rust
/// use arena_fibonacci_heap::Heap;
/// use arena_fibonacci_heap::fibonacci::FibonacciHeap;
///
/// let mut heap: FibonacciHeap<i32> = Heap::new();
/// heap.push(3);
/// heap.push(1);
/// heap.push(2);
///
/// assert_eq!(heap.peek(), Some(&1));
/// assert_eq!(heap.pop(), Some(1));
/// ```
pub trait Heap<T: Ord> {
    /// Creates a new empty heap
    fn new() -> Self;

    /// Returns true if the heap is empty
    fn is_empty(&self) -> bool;

    /// Returns the number of elements in the heap
    fn len(&self) -> usize;

    /// Inserts a value
    fn push(&mut self, value: T);

    /// Returns the minimum value without removing it
    fn peek(&self) -> Option<&T>;

    /// Removes and returns the minimum value
    fn pop(&mut self) -> Option<T>;

    /// Merges another heap into this one, consuming the other heap
    fn merge(&mut self, other: Self);
}

/// Extended heap trait with `decrease_key` support
///
/// # Example
///
/// ```rust
/// use arena_fibonacci_heap::{DecreaseKeyHeap, Heap};
/// use arena_fibonacci_heap::fibonacci::FibonacciHeap;
///
/// let mut heap: FibonacciHeap<u32> = Heap::new();
/// let handle = heap.push_with_handle(10);
/// heap.decrease_key(&handle, 5).unwrap();
/// assert_eq!(heap.peek(), Some(&5));
/// ```
pub trait DecreaseKeyHeap<T: Ord>: Heap<T> {
    /// The handle type for this heap, used to reference elements for decrease_key
    type Handle: Handle;

    /// Inserts a value, returning a handle to it
    fn push_with_handle(&mut self, value: T) -> Self::Handle;

    /// Lowers the value of the element identified by the handle
    ///
    /// # Errors
    /// - [`HeapError::InvalidHandle`] if the element was already removed
    /// - [`HeapError::ValueNotDecreased`] if `new_value` is greater than the
    ///   current value
    fn decrease_key(&mut self, handle: &Self::Handle, new_value: T) -> Result<(), HeapError>;
}
