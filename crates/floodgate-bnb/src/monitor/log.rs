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

//! Periodic progress logging
//!
//! `LogTreeSearchMonitor` emits a `tracing` event at most once per
//! `log_interval`. Reading the clock is comparatively expensive, so it is
//! only consulted when `nodes_explored & clock_check_mask == 0`.

use crate::{
    config::SearchConfig,
    monitor::tree_search_monitor::{PruneReason, TreeSearchMonitor},
    node::SearchNode,
    stats::BnbSolverStatistics,
};
use floodgate_model::{num::SolverNumeric, reduce::ReducedGraph, schedule::Schedule};
use std::time::{Duration, Instant};
use tracing::info;

#[derive(Debug, Clone)]
pub struct LogTreeSearchMonitor<T> {
    start_time: Instant,
    last_log_time: Instant,
    log_interval: Duration,
    clock_check_mask: u64,
    best_value: Option<T>,
}

impl<T> LogTreeSearchMonitor<T>
where
    T: SolverNumeric,
{
    pub fn new(log_interval: Duration, clock_check_mask: u64) -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_log_time: now,
            log_interval,
            clock_check_mask,
            best_value: None,
        }
    }

    #[inline]
    pub fn log_interval(&self) -> Duration {
        self.log_interval
    }

    #[inline]
    pub fn best_value(&self) -> Option<T> {
        self.best_value
    }

    fn log_line(&mut self, node: &SearchNode<T>, statistics: &BnbSolverStatistics<T>) {
        let now = Instant::now();
        let best = match self.best_value {
            Some(value) => value.to_string(),
            None => "-".to_string(),
        };

        info!(
            elapsed = ?now.duration_since(self.start_time),
            nodes = statistics.nodes_explored,
            depth = node.depth(),
            best = %best,
            upper_bound = %node.upper_bound(),
            pruned = statistics.prunings_total(),
            "search progress"
        );

        self.last_log_time = now;
    }
}

impl<T> Default for LogTreeSearchMonitor<T>
where
    T: SolverNumeric,
{
    fn default() -> Self {
        Self::new(Duration::from_secs(1), 4095)
    }
}

impl<T> std::fmt::Display for LogTreeSearchMonitor<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LogTreeSearchMonitor(log_interval: {}s, clock_check_mask: {})",
            self.log_interval.as_secs(),
            self.clock_check_mask
        )
    }
}

impl<T> TreeSearchMonitor<T> for LogTreeSearchMonitor<T>
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "LogTreeSearchMonitor"
    }

    fn on_enter_search(
        &mut self,
        graph: &ReducedGraph<T>,
        config: &SearchConfig<T>,
        _statistics: &BnbSolverStatistics<T>,
    ) {
        self.start_time = Instant::now();
        self.last_log_time = self.start_time;
        self.best_value = None;
        info!(valves = graph.num_valves(), %config, "search started");
    }

    fn on_exit_search(&mut self, statistics: &BnbSolverStatistics<T>) {
        info!(
            elapsed = ?self.start_time.elapsed(),
            nodes = statistics.nodes_explored,
            solutions = statistics.solutions_found,
            "search finished"
        );
    }

    fn on_node_expanded(&mut self, node: &SearchNode<T>, statistics: &BnbSolverStatistics<T>) {
        if (statistics.nodes_explored & self.clock_check_mask) == 0
            && self.last_log_time.elapsed() >= self.log_interval
        {
            self.log_line(node, statistics);
        }
    }

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

    fn on_solution_found(&mut self, schedule: &Schedule<T>, _statistics: &BnbSolverStatistics<T>) {
        self.best_value = Some(schedule.value());
    }
}
