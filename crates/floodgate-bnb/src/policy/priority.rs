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

//! Frontier priorities
//!
//! A `PriorityPolicy` turns a node into a `FrontierKey`; the frontier serves
//! the smallest key first.
//!
//! Provided policies:
//! - `BestBoundFirst` (default): highest upper bound first, then highest value.
//!   Expands the fewest nodes once the incumbent is tight.
//! - `GreatestValueFirst`: highest value first, then highest upper bound.
//!   Dives quickly toward good complete schedules.
//! - `CumulativePromise`: accumulates, along the path, the gain of every move
//!   and the upper bound of every node. Favors deep paths whose nodes all
//!   looked promising.

use crate::{frontier::FrontierKey, node::SearchNode};
use floodgate_model::num::SolverNumeric;

/// A strategy for ordering the frontier.
pub trait PriorityPolicy<T>
where
    T: SolverNumeric,
{
    /// Returns the name of the policy.
    fn name(&self) -> &str;

    /// Returns the key of the root node.
    fn root_key(&self, root: &SearchNode<T>) -> FrontierKey<T>;

    /// Returns the key of `child`, derived from `parent` whose key is `parent_key`.
    fn child_key(
        &self,
        parent_key: &FrontierKey<T>,
        parent: &SearchNode<T>,
        child: &SearchNode<T>,
    ) -> FrontierKey<T>;
}

impl<T> std::fmt::Debug for dyn PriorityPolicy<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PriorityPolicy({})", self.name())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BestBoundFirst;

impl<T> PriorityPolicy<T> for BestBoundFirst
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "BestBoundFirst"
    }

    #[inline]
    fn root_key(&self, root: &SearchNode<T>) -> FrontierKey<T> {
        FrontierKey::new(-root.upper_bound(), -root.value())
    }

    #[inline]
    fn child_key(
        &self,
        _parent_key: &FrontierKey<T>,
        _parent: &SearchNode<T>,
        child: &SearchNode<T>,
    ) -> FrontierKey<T> {
        FrontierKey::new(-child.upper_bound(), -child.value())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GreatestValueFirst;

impl<T> PriorityPolicy<T> for GreatestValueFirst
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "GreatestValueFirst"
    }

    #[inline]
    fn root_key(&self, root: &SearchNode<T>) -> FrontierKey<T> {
        FrontierKey::new(-root.value(), -root.upper_bound())
    }

    #[inline]
    fn child_key(
        &self,
        _parent_key: &FrontierKey<T>,
        _parent: &SearchNode<T>,
        child: &SearchNode<T>,
    ) -> FrontierKey<T> {
        FrontierKey::new(-child.value(), -child.upper_bound())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CumulativePromise;

impl<T> PriorityPolicy<T> for CumulativePromise
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "CumulativePromise"
    }

    #[inline]
    fn root_key(&self, _root: &SearchNode<T>) -> FrontierKey<T> {
        FrontierKey::new(T::zero(), T::zero())
    }

    #[inline]
    fn child_key(
        &self,
        parent_key: &FrontierKey<T>,
        parent: &SearchNode<T>,
        child: &SearchNode<T>,
    ) -> FrontierKey<T> {
        let gain = child.value() - parent.value();
        let primary = parent_key
            .primary
            .saturating_sub(gain)
            .saturating_sub(child.upper_bound());
        FrontierKey::new(primary, -child.value())
    }
}
