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

use num_traits::Zero;
use std::time::Duration;

/// Statistics collected during a Floodgate-BnB search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BnbSolverStatistics<T> {
    /// Nodes popped from the frontier and expanded (terminal nodes included).
    pub nodes_explored: u64,
    /// Nodes created, root included.
    pub nodes_generated: u64,
    /// Popped nodes discarded because their bound no longer beat the incumbent.
    pub prunings_bound: u64,
    /// Children discarded before entering the frontier.
    pub prunings_early: u64,
    /// Expanded nodes in which no agent could move.
    pub terminals_reached: u64,
    /// Improving schedules found (warm start included).
    pub solutions_found: u64,
    /// The deepest node expanded.
    pub max_depth: u64,
    /// The largest frontier size observed.
    pub max_frontier_len: u64,
    /// Total time spent in the solver.
    pub time_total: Duration,
    /// The upper bound of the root node.
    pub root_upper_bound: T,
}

impl<T> Default for BnbSolverStatistics<T>
where
    T: Zero,
{
    fn default() -> Self {
        Self {
            nodes_explored: 0,
            nodes_generated: 0,
            prunings_bound: 0,
            prunings_early: 0,
            terminals_reached: 0,
            solutions_found: 0,
            max_depth: 0,
            max_frontier_len: 0,
            time_total: Duration::ZERO,
            root_upper_bound: T::zero(),
        }
    }
}

impl<T> BnbSolverStatistics<T> {
    #[inline]
    pub fn on_node_explored(&mut self) {
        self.nodes_explored = self.nodes_explored.saturating_add(1);
    }

    #[inline]
    pub fn on_node_generated(&mut self) {
        self.nodes_generated = self.nodes_generated.saturating_add(1);
    }

    #[inline]
    pub fn on_pruning_bound(&mut self) {
        self.prunings_bound = self.prunings_bound.saturating_add(1);
    }

    #[inline]
    pub fn on_pruning_early(&mut self) {
        self.prunings_early = self.prunings_early.saturating_add(1);
    }

    #[inline]
    pub fn on_terminal_reached(&mut self) {
        self.terminals_reached = self.terminals_reached.saturating_add(1);
    }

    #[inline]
    pub fn on_solution_found(&mut self) {
        self.solutions_found = self.solutions_found.saturating_add(1);
    }

    #[inline]
    pub fn on_depth_update(&mut self, depth: u64) {
        self.max_depth = self.max_depth.max(depth);
    }

    #[inline]
    pub fn on_frontier_len(&mut self, len: u64) {
        self.max_frontier_len = self.max_frontier_len.max(len);
    }

    #[inline]
    pub fn set_total_time(&mut self, duration: Duration) {
        self.time_total = duration;
    }

    #[inline]
    pub fn set_root_upper_bound(&mut self, bound: T) {
        self.root_upper_bound = bound;
    }

    /// Total number of pruned nodes.
    #[inline]
    pub fn prunings_total(&self) -> u64 {
        self.prunings_bound.saturating_add(self.prunings_early)
    }
}

impl<T> std::fmt::Display for BnbSolverStatistics<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Floodgate-BnB Solver Statistics:")?;
        writeln!(f, "  Nodes explored:       {}", self.nodes_explored)?;
        writeln!(f, "  Nodes generated:      {}", self.nodes_generated)?;
        writeln!(f, "  Max depth reached:    {}", self.max_depth)?;
        writeln!(f, "  Max frontier size:    {}", self.max_frontier_len)?;
        writeln!(f, "  Prunings (bound):     {}", self.prunings_bound)?;
        writeln!(f, "  Prunings (early):     {}", self.prunings_early)?;
        writeln!(f, "  Terminals reached:    {}", self.terminals_reached)?;
        writeln!(f, "  Solutions found:      {}", self.solutions_found)?;
        writeln!(f, "  Root Upper Bound:     {}", self.root_upper_bound)?;
        writeln!(f, "  Total time:           {:.2?}", self.time_total)?;
        Ok(())
    }
}
