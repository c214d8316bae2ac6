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
use std::{
    marker::PhantomData,
    time::{Duration, Instant},
};

/// A monitor that terminates the search after a specified duration.
///
/// Checks the clock only every `check_interval` commands to minimize overhead.
pub struct TimeLimitMonitor<T> {
    time_limit: Duration,
    start_time: Option<Instant>,
    check_interval: u64,
    ops_since_last_check: u64,
    _marker: PhantomData<T>,
}

impl<T> TimeLimitMonitor<T> {
    /// Creates a new `TimeLimitMonitor` with the specified duration and check interval.
    /// A higher interval reduces overhead but may overshoot the limit slightly.
    pub fn new(duration: Duration, check_interval: u64) -> Self {
        Self {
            time_limit: duration,
            start_time: None,
            check_interval: check_interval.max(1),
            ops_since_last_check: 0,
            _marker: PhantomData,
        }
    }

    /// Creates a new `TimeLimitMonitor` checking the clock every 16,384 pops.
    pub fn with_default_check_interval(duration: Duration) -> Self {
        Self::new(duration, 0x4000)
    }

    #[inline]
    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }
}

impl<T> std::fmt::Debug for TimeLimitMonitor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimeLimitMonitor")
            .field("time_limit", &self.time_limit)
            .field("check_interval", &self.check_interval)
            .finish()
    }
}

impl<T> TreeSearchMonitor<T> for TimeLimitMonitor<T>
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "TimeLimitMonitor"
    }

    fn on_enter_search(
        &mut self,
        _graph: &ReducedGraph<T>,
        _config: &SearchConfig<T>,
        _statistics: &BnbSolverStatistics<T>,
    ) {
        self.start_time = Some(Instant::now());
        self.ops_since_last_check = 0;
    }

    fn on_exit_search(&mut self, _statistics: &BnbSolverStatistics<T>) {
        self.start_time = None;
    }

    fn search_command(&mut self, _statistics: &BnbSolverStatistics<T>) -> SearchCommand {
        self.ops_since_last_check = self.ops_since_last_check.saturating_add(1);

        if self.ops_since_last_check >= self.check_interval {
            self.ops_since_last_check = 0;

            if let Some(start) = self.start_time
                && start.elapsed() > self.time_limit
            {
                return SearchCommand::Terminate(format!(
                    "time limit of {:?} exceeded",
                    self.time_limit
                ));
            }
        }

        SearchCommand::Continue
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    type IntegerType = i64;

    #[test]
    fn test_zero_limit_terminates_on_first_check() {
        let graph = testing::scenario_graph();
        let config = SearchConfig::single_agent(6).unwrap();
        let stats = BnbSolverStatistics::<IntegerType>::default();
        let mut monitor = TimeLimitMonitor::new(Duration::ZERO, 1);

        monitor.on_enter_search(&graph, &config, &stats);
        std::thread::sleep(Duration::from_millis(2));
        assert!(matches!(
            monitor.search_command(&stats),
            SearchCommand::Terminate(_)
        ));
    }

    #[test]
    fn test_continues_before_enter_and_within_limit() {
        let graph = testing::scenario_graph();
        let config = SearchConfig::single_agent(6).unwrap();
        let stats = BnbSolverStatistics::<IntegerType>::default();
        let mut monitor = TimeLimitMonitor::new(Duration::from_secs(3600), 1);

        assert_eq!(monitor.search_command(&stats), SearchCommand::Continue);
        monitor.on_enter_search(&graph, &config, &stats);
        assert_eq!(monitor.search_command(&stats), SearchCommand::Continue);
    }

    #[test]
    fn test_clock_is_only_read_every_interval() {
        let graph = testing::scenario_graph();
        let config = SearchConfig::single_agent(6).unwrap();
        let stats = BnbSolverStatistics::<IntegerType>::default();
        let mut monitor = TimeLimitMonitor::new(Duration::ZERO, 3);

        monitor.on_enter_search(&graph, &config, &stats);
        std::thread::sleep(Duration::from_millis(2));
        assert_eq!(monitor.search_command(&stats), SearchCommand::Continue);
        assert_eq!(monitor.search_command(&stats), SearchCommand::Continue);
        assert!(matches!(
            monitor.search_command(&stats),
            SearchCommand::Terminate(_)
        ));
    }
}
