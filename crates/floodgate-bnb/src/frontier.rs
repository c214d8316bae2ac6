// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Open list of the best-first search
//!
//! The frontier hands out the pending node with the smallest `FrontierKey`.
//! Keys are compared on `primary`, then on `secondary`; nodes with equal
//! keys leave in insertion order, so a search is reproducible run to run.

use crate::node::SearchNode;
use floodgate_model::num::SolverNumeric;
use std::{cmp::Ordering, collections::BinaryHeap};

/// A min-ordered priority for frontier entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrontierKey<T> {
    pub primary: T,
    pub secondary: T,
}

impl<T> FrontierKey<T>
where
    T: SolverNumeric,
{
    #[inline(always)]
    pub fn new(primary: T, secondary: T) -> Self {
        Self { primary, secondary }
    }
}

impl<T> std::fmt::Display for FrontierKey<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.primary, self.secondary)
    }
}

/// A min-priority queue of search nodes.
pub trait Frontier<T>
where
    T: SolverNumeric,
{
    /// Returns the name of the frontier.
    fn name(&self) -> &str;
    /// Adds `node` with priority `key`.
    fn push(&mut self, key: FrontierKey<T>, node: SearchNode<T>);
    /// Removes the node with the smallest key, oldest first among equals.
    fn pop(&mut self) -> Option<(FrontierKey<T>, SearchNode<T>)>;
    /// Returns the number of pending nodes.
    fn len(&self) -> usize;
    /// Removes all pending nodes, keeping allocated capacity.
    fn clear(&mut self);
    /// Returns `true` if no node is pending.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

struct Entry<T> {
    key: FrontierKey<T>,
    sequence: u64,
    node: SearchNode<T>,
}

impl<T> PartialEq for Entry<T>
where
    T: SolverNumeric,
{
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.sequence == other.sequence
    }
}

impl<T> Eq for Entry<T> where T: SolverNumeric {}

impl<T> PartialOrd for Entry<T>
where
    T: SolverNumeric,
{
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T>
where
    T: SolverNumeric,
{
    // Reversed: `BinaryHeap` is a max-heap.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .key
            .cmp(&self.key)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// The default frontier, backed by `std::collections::BinaryHeap`.
pub struct BinaryHeapFrontier<T> {
    heap: BinaryHeap<Entry<T>>,
    sequence: u64,
}

impl<T> Default for BinaryHeapFrontier<T>
where
    T: SolverNumeric,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> BinaryHeapFrontier<T>
where
    T: SolverNumeric,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            sequence: 0,
        }
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
            sequence: 0,
        }
    }

    /// Returns the number of nodes the frontier can hold without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.heap.capacity()
    }
}

impl<T> Frontier<T> for BinaryHeapFrontier<T>
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "BinaryHeapFrontier"
    }

    #[inline]
    fn push(&mut self, key: FrontierKey<T>, node: SearchNode<T>) {
        let sequence = self.sequence;
        self.sequence = self.sequence.wrapping_add(1);
        self.heap.push(Entry {
            key,
            sequence,
            node,
        });
    }

    #[inline]
    fn pop(&mut self) -> Option<(FrontierKey<T>, SearchNode<T>)> {
        self.heap.pop().map(|entry| (entry.key, entry.node))
    }

    #[inline]
    fn len(&self) -> usize {
        self.heap.len()
    }

    #[inline]
    fn clear(&mut self) {
        self.heap.clear();
        self.sequence = 0;
    }
}

impl<T> std::fmt::Debug for BinaryHeapFrontier<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinaryHeapFrontier")
            .field("len", &self.heap.len())
            .field("sequence", &self.sequence)
            .finish()
    }
}
