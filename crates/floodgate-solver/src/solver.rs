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

//! # Portfolio-Orchestrated Solver
//!
//! Runs multiple `PortfolioSolver`s in parallel on the same reduced graph,
//! lets them compete to install the best schedule in a `SharedIncumbent`,
//! and enforces global limits.
//!
//! ## Highlights
//!
//! - Portfolio execution:
//!   - Spawn each member in a thread using `std::thread::scope`.
//!   - Build a `CompositeTreeSearchMonitor<T>` per thread with the internal
//!     stop signal, an optional external interrupt, and the configured
//!     node, time and solution limits plus optional progress logging.
//! - Shared state:
//!   - `SharedIncumbent<T>` stores the best schedule.
//!   - A global `AtomicU64` counts improving schedules; an `AtomicBool`
//!     stops every member once one of them proves optimality.
//! - Outcome construction:
//!   - The best schedule among all members and the incumbent is reported,
//!     `Optimal` if any member proved optimality.
//!
//! ## Usage
//!
//! ```rust
//! use floodgate_bnb::config::SearchConfig;
//! use floodgate_model::loading::ProblemLoader;
//! use floodgate_solver::solver::SolverBuilder;
//!
//! let input = "\
//! Valve AA has flow rate=0; tunnels lead to valves BB
//! Valve BB has flow rate=5; tunnel leads to valve AA
//! ";
//! let model = ProblemLoader::new().from_str::<i64>(input).unwrap();
//! let config = SearchConfig::single_agent(4).unwrap();
//!
//! let mut solver = SolverBuilder::new(config).build();
//! let outcome = solver.solve(&model);
//! assert!(outcome.is_optimal());
//! assert_eq!(outcome.value(), 10);
//! ```

use floodgate_bnb::{
    config::SearchConfig,
    incumbent::SharedIncumbent,
    monitor::{
        composite::CompositeTreeSearchMonitor, interrupt::InterruptMonitor,
        log::LogTreeSearchMonitor, node_limit::NodeLimitMonitor,
        solution_limit::SolutionLimitMonitor, time_limit::TimeLimitMonitor,
    },
    portfolio::{BnbPortfolioSolver, PortfolioSolver, PortfolioSolverContext},
    result::{BnbSolverOutcome, SolverResult, TerminationReason},
    strategy::DefaultStrategy,
};
use floodgate_model::{
    model::Model, num::SolverNumeric, reduce::ReducedGraph, schedule::Schedule,
};
use std::{
    sync::atomic::{AtomicBool, AtomicU64, Ordering},
    time::{Duration, Instant},
};
use tracing::{debug, info};

/// Aggregated statistics of a portfolio run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolverStatistics {
    /// Number of portfolio members that ran.
    pub used_threads: usize,
    /// Improving schedules installed across all members.
    pub solutions_found: u64,
    /// Nodes expanded, summed over all members.
    pub nodes_explored: u64,
    /// Nodes created, summed over all members.
    pub nodes_generated: u64,
    /// Wall-clock time of the whole run.
    pub solve_duration: Duration,
}

impl std::fmt::Display for SolverStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SolverStatistics(used_threads: {}, solutions_found: {}, nodes_explored: {}, nodes_generated: {}, solve_duration: {:.2?})",
            self.used_threads,
            self.solutions_found,
            self.nodes_explored,
            self.nodes_generated,
            self.solve_duration
        )
    }
}

/// The result of a portfolio run.
#[derive(Debug, Clone)]
pub struct SolverOutcome<T> {
    result: SolverResult<T>,
    termination_reason: TerminationReason,
    statistics: SolverStatistics,
}

impl<T> SolverOutcome<T>
where
    T: SolverNumeric,
{
    #[inline]
    pub fn result(&self) -> &SolverResult<T> {
        &self.result
    }

    #[inline]
    pub fn schedule(&self) -> &Schedule<T> {
        self.result.schedule()
    }

    #[inline]
    pub fn value(&self) -> T {
        self.result.schedule().value()
    }

    #[inline]
    pub fn is_optimal(&self) -> bool {
        self.result.is_optimal()
    }

    #[inline]
    pub fn termination_reason(&self) -> &TerminationReason {
        &self.termination_reason
    }

    #[inline]
    pub fn statistics(&self) -> &SolverStatistics {
        &self.statistics
    }
}

impl<T> std::fmt::Display for SolverOutcome<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SolverOutcome(result: {}, termination_reason: {}, {})",
            self.result, self.termination_reason, self.statistics
        )
    }
}

pub struct Solver<'a, T>
where
    T: SolverNumeric,
{
    config: SearchConfig<T>,
    portfolio_solver: Vec<Box<dyn PortfolioSolver<T> + 'a>>,
    incumbent: SharedIncumbent<T>,
    global_solution_count: AtomicU64,
    /// Signals all members to stop once one proves optimality.
    stop_signal: AtomicBool,
    external_interrupt: Option<&'a AtomicBool>,
    node_limit: Option<u64>,
    time_limit: Option<Duration>,
    solution_limit: Option<u64>,
    log_interval: Option<Duration>,
}

impl<'a, T> Solver<'a, T>
where
    T: SolverNumeric,
{
    #[inline]
    pub fn config(&self) -> &SearchConfig<T> {
        &self.config
    }

    #[inline]
    pub fn num_solvers(&self) -> usize {
        self.portfolio_solver.len()
    }

    #[inline]
    pub fn incumbent(&self) -> &SharedIncumbent<T> {
        &self.incumbent
    }

    #[inline]
    pub fn node_limit(&self) -> Option<u64> {
        self.node_limit
    }

    #[inline]
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    #[inline]
    pub fn solution_limit(&self) -> Option<u64> {
        self.solution_limit
    }

    /// Solves `model`. Every call starts from a fresh incumbent.
    pub fn solve(&mut self, model: &Model<T>) -> SolverOutcome<T> {
        let start_time = Instant::now();

        self.stop_signal.store(false, Ordering::Relaxed);
        self.global_solution_count.store(0, Ordering::Relaxed);
        self.incumbent = SharedIncumbent::new();

        let graph = ReducedGraph::from_model(model);
        debug!(
            rooms = model.num_rooms(),
            valves = graph.num_valves(),
            members = self.portfolio_solver.len(),
            "portfolio search started"
        );

        let results = self.run_portfolio_parallel(&graph);
        self.construct_outcome(start_time, results)
    }

    fn run_portfolio_parallel(&mut self, graph: &ReducedGraph<T>) -> Vec<BnbSolverOutcome<T>> {
        let config = &self.config;
        let incumbent = &self.incumbent;
        let global_solution_count = &self.global_solution_count;
        let stop_signal = &self.stop_signal;
        let external_interrupt = self.external_interrupt;
        let node_limit = self.node_limit;
        let time_limit = self.time_limit;
        let solution_limit = self.solution_limit;
        let log_interval = self.log_interval;

        let members = &mut self.portfolio_solver;
        let mut results = Vec::with_capacity(members.len());

        std::thread::scope(|scope| {
            let mut handles = Vec::with_capacity(members.len());

            for solver in members.iter_mut() {
                let handle = scope.spawn(move || {
                    let mut monitor = CompositeTreeSearchMonitor::<T>::new();
                    monitor.add_monitor(InterruptMonitor::new(stop_signal));
                    if let Some(flag) = external_interrupt {
                        monitor.add_monitor(InterruptMonitor::new(flag));
                    }
                    if let Some(limit) = node_limit {
                        monitor.add_monitor(NodeLimitMonitor::new(limit));
                    }
                    if let Some(limit) = time_limit {
                        monitor.add_monitor(TimeLimitMonitor::with_default_check_interval(limit));
                    }
                    if let Some(limit) = solution_limit {
                        monitor.add_monitor(SolutionLimitMonitor::new(global_solution_count, limit));
                    }
                    if let Some(interval) = log_interval {
                        monitor.add_monitor(LogTreeSearchMonitor::new(interval, 4095));
                    }

                    let context = PortfolioSolverContext::new(graph, config, incumbent, &mut monitor);
                    let outcome = solver.invoke(context);

                    if outcome.is_optimal() {
                        info!(
                            solver = solver.name(),
                            value = %outcome.value(),
                            "portfolio member proved optimality, signaling stop"
                        );
                        stop_signal.store(true, Ordering::Relaxed);
                    }

                    outcome
                });
                handles.push(handle);
            }

            for handle in handles {
                match handle.join() {
                    Ok(outcome) => results.push(outcome),
                    Err(payload) => std::panic::resume_unwind(payload),
                }
            }
        });

        results
    }

    /// The most valuable schedule among the members and the incumbent.
    fn find_best_schedule(&self, results: &[BnbSolverOutcome<T>]) -> Schedule<T> {
        let snapshot = self.incumbent.snapshot();
        results
            .iter()
            .map(|outcome| outcome.schedule())
            .chain(snapshot.as_ref())
            .fold(None::<&Schedule<T>>, |best, candidate| match best {
                Some(best) if best.value() >= candidate.value() => Some(best),
                _ => Some(candidate),
            })
            .cloned()
            .unwrap_or_else(Schedule::empty)
    }

    fn build_statistics(
        &self,
        start_time: Instant,
        results: &[BnbSolverOutcome<T>],
    ) -> SolverStatistics {
        let (nodes_explored, nodes_generated) =
            results.iter().fold((0u64, 0u64), |(explored, generated), outcome| {
                let stats = outcome.statistics();
                (
                    explored.saturating_add(stats.nodes_explored),
                    generated.saturating_add(stats.nodes_generated),
                )
            });

        SolverStatistics {
            used_threads: results.len(),
            solutions_found: results
                .iter()
                .map(|outcome| outcome.statistics().solutions_found)
                .sum(),
            nodes_explored,
            nodes_generated,
            solve_duration: start_time.elapsed(),
        }
    }

    fn construct_outcome(
        &self,
        start_time: Instant,
        results: Vec<BnbSolverOutcome<T>>,
    ) -> SolverOutcome<T> {
        let statistics = self.build_statistics(start_time, &results);
        let schedule = self.find_best_schedule(&results);

        let optimality_proven = results.iter().any(|outcome| outcome.is_optimal());
        let (result, termination_reason) = if optimality_proven {
            (
                SolverResult::Optimal(schedule),
                TerminationReason::OptimalityProven,
            )
        } else {
            (
                SolverResult::Feasible(schedule),
                TerminationReason::Aborted(self.determine_abort_reason(&results)),
            )
        };

        debug!(%termination_reason, %statistics, "portfolio search finished");
        SolverOutcome {
            result,
            termination_reason,
            statistics,
        }
    }

    fn determine_abort_reason(&self, results: &[BnbSolverOutcome<T>]) -> String {
        results
            .iter()
            .find_map(|outcome| match outcome.termination_reason() {
                TerminationReason::Aborted(reason) => Some(reason.clone()),
                TerminationReason::OptimalityProven => None,
            })
            .unwrap_or_else(|| "no portfolio member ran".to_string())
    }
}

impl<'a, T> std::fmt::Debug for Solver<'a, T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Solver")
            .field("config", &self.config)
            .field(
                "portfolio_solver",
                &self
                    .portfolio_solver
                    .iter()
                    .map(|solver| solver.name())
                    .collect::<Vec<_>>(),
            )
            .field("node_limit", &self.node_limit)
            .field("time_limit", &self.time_limit)
            .field("solution_limit", &self.solution_limit)
            .finish()
    }
}

pub struct SolverBuilder<'a, T>
where
    T: SolverNumeric,
{
    config: SearchConfig<T>,
    portfolio_solver: Vec<Box<dyn PortfolioSolver<T> + 'a>>,
    external_interrupt: Option<&'a AtomicBool>,
    node_limit: Option<u64>,
    time_limit: Option<Duration>,
    solution_limit: Option<u64>,
    log_interval: Option<Duration>,
}

impl<'a, T> SolverBuilder<'a, T>
where
    T: SolverNumeric,
{
    #[inline]
    pub fn new(config: SearchConfig<T>) -> Self {
        Self {
            config,
            portfolio_solver: Vec::new(),
            external_interrupt: None,
            node_limit: None,
            time_limit: None,
            solution_limit: None,
            log_interval: None,
        }
    }

    /// Stops every member after it expanded `limit` nodes.
    #[inline]
    pub fn with_node_limit(mut self, limit: u64) -> Self {
        self.node_limit = Some(limit);
        self
    }

    #[inline]
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Stops the portfolio once `limit` improving schedules were found in total.
    #[inline]
    pub fn with_solution_limit(mut self, limit: u64) -> Self {
        self.solution_limit = Some(limit);
        self
    }

    /// Emits a progress event at most every `interval` from each member.
    #[inline]
    pub fn with_progress_log(mut self, interval: Duration) -> Self {
        self.log_interval = Some(interval);
        self
    }

    /// Stops every member once `flag` is set.
    #[inline]
    pub fn with_interrupt(mut self, flag: &'a AtomicBool) -> Self {
        self.external_interrupt = Some(flag);
        self
    }

    #[inline]
    pub fn add_solver<S>(mut self, solver: S) -> Self
    where
        S: PortfolioSolver<T> + 'a,
    {
        self.portfolio_solver.push(Box::new(solver));
        self
    }

    #[inline]
    pub fn add_solver_boxed(mut self, solver: Box<dyn PortfolioSolver<T> + 'a>) -> Self {
        self.portfolio_solver.push(solver);
        self
    }

    /// Builds the solver. Without any added member the portfolio consists of
    /// one `BnbPortfolioSolver` with the default strategy.
    pub fn build(mut self) -> Solver<'a, T> {
        if self.portfolio_solver.is_empty() {
            self.portfolio_solver
                .push(Box::new(BnbPortfolioSolver::new(DefaultStrategy::<T>::default())));
        }

        Solver {
            config: self.config,
            portfolio_solver: self.portfolio_solver,
            incumbent: SharedIncumbent::new(),
            global_solution_count: AtomicU64::new(0),
            stop_signal: AtomicBool::new(false),
            external_interrupt: self.external_interrupt,
            node_limit: self.node_limit,
            time_limit: self.time_limit,
            solution_limit: self.solution_limit,
            log_interval: self.log_interval,
        }
    }
}
