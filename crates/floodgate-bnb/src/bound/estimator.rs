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

use crate::agent::Agent;
use fixedbitset::FixedBitSet;
use floodgate_model::{num::SolverNumeric, reduce::ReducedGraph};

/// A strategy for bounding the value still obtainable from a state.
///
/// The solver adds the estimate to the value already released and prunes a
/// node once that sum cannot beat the best known schedule. The estimate must
/// therefore be admissible: never smaller than the most additional value any
/// continuation of the state can release.
///
/// Estimates should also be monotone along tree paths (a child never bounds
/// higher than its parent); the search stays correct without this, but the
/// frontier order of best-bound policies degrades.
pub trait BoundEstimator<T>
where
    T: SolverNumeric,
{
    /// Returns the name of the estimator.
    fn name(&self) -> &str;

    /// Returns an upper bound on the additional value the `agents` can
    /// release given the set of `opened` valves.
    fn estimate(&mut self, graph: &ReducedGraph<T>, agents: &[Agent<T>], opened: &FixedBitSet)
    -> T;
}

impl<T> std::fmt::Debug for dyn BoundEstimator<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BoundEstimator({})", self.name())
    }
}

impl<T> std::fmt::Display for dyn BoundEstimator<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BoundEstimator({})", self.name())
    }
}
