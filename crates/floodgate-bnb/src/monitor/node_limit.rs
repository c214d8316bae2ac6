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

//! Node budget
//!
//! `NodeLimitMonitor` stops the search once a given number of nodes has been
//! expanded. The best schedule found so far is returned, flagged as not
//! proven optimal.

use crate::{
    config::SearchConfig,
    monitor::tree_search_monitor::{PruneReason, SearchCommand, TreeSearchMonitor},
    node::SearchNode,
    stats::BnbSolverStatistics,
};
use floodgate_model::{num::SolverNumeric, reduce::ReducedGraph, schedule::Schedule};

/// A monitor that terminates the search after `node_limit` expansions.
#[derive(Debug, Clone, Copy)]
pub struct NodeLimitMonitor<T> {
    node_limit: u64,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> NodeLimitMonitor<T> {
    #[inline]
    pub fn new(node_limit: u64) -> Self {
        Self {
            node_limit,
            _phantom: std::marker::PhantomData,
        }
    }

    #[inline]
    pub fn node_limit(&self) -> u64 {
        self.node_limit
    }
}

impl<T> TreeSearchMonitor<T> for NodeLimitMonitor<T>
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "NodeLimitMonitor"
    }

    fn on_enter_search(
        &mut self,
        _graph: &ReducedGraph<T>,
        _config: &SearchConfig<T>,
        _statistics: &BnbSolverStatistics<T>,
    ) {
    }

    fn on_exit_search(&mut self, _statistics: &BnbSolverStatistics<T>) {}

    fn search_command(&mut self, statistics: &BnbSolverStatistics<T>) -> SearchCommand {
        if statistics.nodes_explored >= self.node_limit {
            SearchCommand::Terminate(format!("node limit of {} reached", self.node_limit))
        } else {
            SearchCommand::Continue
        }
    }

    fn on_node_expanded(&mut self, _node: &SearchNode<T>, _statistics: &BnbSolverStatistics<T>) {}

    fn on_prune(
        &mut self,
        _node: &SearchNode<T>,
        _reason: PruneReason,
        _statistics: &BnbSolverStatistics<T>,
    ) {
    }

    fn on_children_enqueued(
        &mut self,
        _node: &SearchNode<T>,
        _count: usize,
        _statistics: &BnbSolverStatistics<T>,
    ) {
    }

    fn on_solution_found(
        &mut self,
        _schedule: &Schedule<T>,
        _statistics: &BnbSolverStatistics<T>,
    ) {
    }
}
