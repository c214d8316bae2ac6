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

use crate::{
    config::SearchConfig,
    monitor::tree_search_monitor::{PruneReason, SearchCommand, TreeSearchMonitor},
    node::SearchNode,
    stats::BnbSolverStatistics,
};
use floodgate_model::{num::SolverNumeric, reduce::ReducedGraph, schedule::Schedule};
use std::sync::atomic::{AtomicU64, Ordering};

/// A monitor that terminates the search once a number of improving schedules
/// has been found.
///
/// The counter is shared, so several portfolio members can count against one
/// global limit.
#[derive(Debug)]
pub struct SolutionLimitMonitor<'a, T> {
    solutions_found: &'a AtomicU64,
    solution_limit: u64,
    _phantom: std::marker::PhantomData<T>,
}

impl<'a, T> SolutionLimitMonitor<'a, T> {
    #[inline]
    pub fn new(solutions_found: &'a AtomicU64, solution_limit: u64) -> Self {
        Self {
            solutions_found,
            solution_limit,
            _phantom: std::marker::PhantomData,
        }
    }

    #[inline]
    fn reached_limit(&self) -> bool {
        self.solutions_found.load(Ordering::Relaxed) >= self.solution_limit
    }
}

impl<'a, T> TreeSearchMonitor<T> for SolutionLimitMonitor<'a, T>
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "SolutionLimitMonitor"
    }

    fn on_enter_search(
        &mut self,
        _graph: &ReducedGraph<T>,
        _config: &SearchConfig<T>,
        _statistics: &BnbSolverStatistics<T>,
    ) {
    }

    fn on_exit_search(&mut self, _statistics: &BnbSolverStatistics<T>) {}

    fn search_command(&mut self, _statistics: &BnbSolverStatistics<T>) -> SearchCommand {
        if self.reached_limit() {
            SearchCommand::Terminate("solution limit reached".to_string())
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
        self.solutions_found.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type IntegerType = i64;

    #[test]
    fn test_continue_before_limit_and_terminate_at_limit() {
        let counter = AtomicU64::new(0);
        let stats = BnbSolverStatistics::<IntegerType>::default();
        let mut monitor = SolutionLimitMonitor::<IntegerType>::new(&counter, 2);

        assert_eq!(monitor.search_command(&stats), SearchCommand::Continue);
        monitor.on_solution_found(&Schedule::new(10, Vec::new()), &stats);
        assert_eq!(monitor.search_command(&stats), SearchCommand::Continue);
        monitor.on_solution_found(&Schedule::new(20, Vec::new()), &stats);
        assert_eq!(
            monitor.search_command(&stats),
            SearchCommand::Terminate("solution limit reached".to_string())
        );
    }

    #[test]
    fn test_monitors_share_the_counter() {
        let counter = AtomicU64::new(0);
        let stats = BnbSolverStatistics::<IntegerType>::default();
        let mut first = SolutionLimitMonitor::<IntegerType>::new(&counter, 2);
        let mut second = SolutionLimitMonitor::<IntegerType>::new(&counter, 2);

        first.on_solution_found(&Schedule::empty(), &stats);
        assert_eq!(second.search_command(&stats), SearchCommand::Continue);
        second.on_solution_found(&Schedule::empty(), &stats);
        assert!(matches!(
            first.search_command(&stats),
            SearchCommand::Terminate(_)
        ));
        assert_eq!(counter.load(Ordering::Relaxed), 2);
    }
}
