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

//! Tree search monitoring interface
//!
//! Declares the `TreeSearchMonitor` trait, `SearchCommand` and `PruneReason`
//! for observing and controlling the best-first search. Callbacks track the
//! solver lifecycle, and a monitor can stop the search via `SearchCommand`
//! (default: Continue).
//!
//! Lifecycle highlights
//! - enter → {command → pop → prune | expand → enqueue | solution} → exit
//! - `BnbSolverStatistics` is provided to every callback for telemetry.
//!
//! Design notes
//! - Methods take `&mut self`; monitors are assumed single-threaded.
//! - `search_command` runs once before every expansion; keep it cheap.

use crate::{config::SearchConfig, node::SearchNode, stats::BnbSolverStatistics};
use floodgate_model::{num::SolverNumeric, reduce::ReducedGraph, schedule::Schedule};

/// What the search should do next.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SearchCommand {
    #[default]
    Continue,
    /// Stop the search; the string says why.
    Terminate(String),
}

impl std::fmt::Display for SearchCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchCommand::Continue => write!(f, "Continue"),
            SearchCommand::Terminate(reason) => write!(f, "Terminate: {}", reason),
        }
    }
}

/// Reasons for pruning a search node.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PruneReason {
    /// A popped node whose bound no longer beats the incumbent.
    StaleBound,
    /// A child whose bound does not beat the incumbent; never enqueued.
    ChildBound,
}

impl std::fmt::Display for PruneReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PruneReason::StaleBound => write!(f, "StaleBound"),
            PruneReason::ChildBound => write!(f, "ChildBound"),
        }
    }
}

/// Trait for monitoring and controlling the search process of the solver.
pub trait TreeSearchMonitor<T>
where
    T: SolverNumeric,
{
    /// Returns the name of the monitor.
    fn name(&self) -> &str;
    /// Called when the search starts.
    fn on_enter_search(
        &mut self,
        graph: &ReducedGraph<T>,
        config: &SearchConfig<T>,
        statistics: &BnbSolverStatistics<T>,
    );
    /// Called when the search ends.
    fn on_exit_search(&mut self, statistics: &BnbSolverStatistics<T>);
    /// Called before every pop to determine the next action of the search.
    fn search_command(&mut self, _statistics: &BnbSolverStatistics<T>) -> SearchCommand {
        SearchCommand::Continue
    }
    /// Called when a popped node survives the bound check and is expanded.
    fn on_node_expanded(&mut self, node: &SearchNode<T>, statistics: &BnbSolverStatistics<T>);
    /// Called when a node is pruned.
    fn on_prune(
        &mut self,
        node: &SearchNode<T>,
        reason: PruneReason,
        statistics: &BnbSolverStatistics<T>,
    );
    /// Called after the children of `node` were offered to the frontier.
    /// `count` is the number actually enqueued.
    fn on_children_enqueued(
        &mut self,
        node: &SearchNode<T>,
        count: usize,
        statistics: &BnbSolverStatistics<T>,
    );
    /// Called when a new best schedule is found.
    fn on_solution_found(&mut self, schedule: &Schedule<T>, statistics: &BnbSolverStatistics<T>);
}

impl<T, M> TreeSearchMonitor<T> for &mut M
where
    T: SolverNumeric,
    M: TreeSearchMonitor<T> + ?Sized,
{
    #[inline]
    fn name(&self) -> &str {
        (**self).name()
    }

    #[inline]
    fn on_enter_search(
        &mut self,
        graph: &ReducedGraph<T>,
        config: &SearchConfig<T>,
        statistics: &BnbSolverStatistics<T>,
    ) {
        (**self).on_enter_search(graph, config, statistics)
    }

    #[inline]
    fn on_exit_search(&mut self, statistics: &BnbSolverStatistics<T>) {
        (**self).on_exit_search(statistics)
    }

    #[inline]
    fn search_command(&mut self, statistics: &BnbSolverStatistics<T>) -> SearchCommand {
        (**self).search_command(statistics)
    }

    #[inline]
    fn on_node_expanded(&mut self, node: &SearchNode<T>, statistics: &BnbSolverStatistics<T>) {
        (**self).on_node_expanded(node, statistics)
    }

    #[inline]
    fn on_prune(
        &mut self,
        node: &SearchNode<T>,
        reason: PruneReason,
        statistics: &BnbSolverStatistics<T>,
    ) {
        (**self).on_prune(node, reason, statistics)
    }

    #[inline]
    fn on_children_enqueued(
        &mut self,
        node: &SearchNode<T>,
        count: usize,
        statistics: &BnbSolverStatistics<T>,
    ) {
        (**self).on_children_enqueued(node, count, statistics)
    }

    #[inline]
    fn on_solution_found(&mut self, schedule: &Schedule<T>, statistics: &BnbSolverStatistics<T>) {
        (**self).on_solution_found(schedule, statistics)
    }
}

impl<T> std::fmt::Debug for dyn TreeSearchMonitor<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TreeSearchMonitor({})", self.name())
    }
}

impl<T> std::fmt::Display for dyn TreeSearchMonitor<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TreeSearchMonitor({})", self.name())
    }
}
