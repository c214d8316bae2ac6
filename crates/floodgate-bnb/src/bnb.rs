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

//! Best-first branch-and-bound solver for valve scheduling.
//!
//! `BnbSolver` explores schedules in the order given by a `PriorityPolicy`,
//! keeping every pending search node in a min-priority `Frontier`. Each node
//! carries a cached upper bound (released value plus an admissible estimate
//! of what is still obtainable); nodes that cannot beat the incumbent are
//! dropped, both when children are generated and again when they are popped,
//! since the incumbent may have improved in between.
//!
//! One search run is encapsulated by a session object holding the per-run
//! state, statistics and timing. The solver itself only owns the frontier so
//! its allocation can be reused across runs; it is cleared after every run.
//!
//! Termination
//! - Frontier exhausted: the best schedule is optimal, unless two agents
//!   search without retirement (see `SearchConfig::is_exhaustive`).
//! - A monitor requests termination: the best schedule so far is returned,
//!   flagged as not proven optimal. Monitors are consulted once per node
//!   about to be expanded, after stale nodes are dropped, so a search that
//!   finishes within a node limit still proves optimality.

use crate::{
    bound::estimator::BoundEstimator,
    config::SearchConfig,
    frontier::{BinaryHeapFrontier, Frontier, FrontierKey},
    greedy::greedy_schedule,
    incumbent::{IncumbentStore, NoSharedIncumbent, SharedIncumbent, SharedIncumbentAdapter},
    monitor::tree_search_monitor::{PruneReason, SearchCommand, TreeSearchMonitor},
    node::SearchNode,
    policy::{priority::PriorityPolicy, selection::AgentSelector},
    result::{BnbSolverOutcome, TerminationReason},
    stats::BnbSolverStatistics,
    strategy::Strategy,
};
use floodgate_model::{num::SolverNumeric, reduce::ReducedGraph, schedule::Schedule};
use tracing::debug;

/// The abort reason of a two-agent search without retirement that ran out
/// of nodes.
pub const RESTRICTED_SEARCH_EXHAUSTED: &str =
    "restricted two-agent search exhausted without retirement";

/// The search engine. Strategy components, monitors and the incumbent are
/// supplied per call; the solver only keeps the frontier between runs.
#[derive(Debug)]
pub struct BnbSolver<T, F = BinaryHeapFrontier<T>>
where
    T: SolverNumeric,
    F: Frontier<T>,
{
    frontier: F,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for BnbSolver<T, BinaryHeapFrontier<T>>
where
    T: SolverNumeric,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> BnbSolver<T, BinaryHeapFrontier<T>>
where
    T: SolverNumeric,
{
    /// Creates a solver backed by a `BinaryHeapFrontier`.
    #[inline]
    pub fn new() -> Self {
        Self::with_frontier(BinaryHeapFrontier::new())
    }

    /// Creates a solver whose frontier holds `capacity` nodes before it
    /// has to grow.
    #[inline]
    pub fn preallocated(capacity: usize) -> Self {
        Self::with_frontier(BinaryHeapFrontier::with_capacity(capacity))
    }
}

impl<T, F> BnbSolver<T, F>
where
    T: SolverNumeric,
    F: Frontier<T>,
{
    /// Creates a solver backed by the given frontier.
    #[inline]
    pub fn with_frontier(frontier: F) -> Self {
        Self {
            frontier,
            _phantom: std::marker::PhantomData,
        }
    }

    /// Returns the frontier.
    #[inline]
    pub fn frontier(&self) -> &F {
        &self.frontier
    }

    /// Solves `graph` under `config` with the given strategy and monitor.
    /// This variant does not share its incumbent and acts as a standalone,
    /// single-threaded solver.
    #[inline]
    pub fn solve<E, P, A, S>(
        &mut self,
        graph: &ReducedGraph<T>,
        config: &SearchConfig<T>,
        strategy: &mut Strategy<E, P, A>,
        monitor: S,
    ) -> BnbSolverOutcome<T>
    where
        E: BoundEstimator<T>,
        P: PriorityPolicy<T>,
        A: AgentSelector<T>,
        S: TreeSearchMonitor<T>,
    {
        let backing = NoSharedIncumbent::new();
        self.solve_internal(graph, config, strategy, monitor, backing)
    }

    /// Solves `graph` under `config`, synchronizing the best known schedule
    /// with other solvers through `incumbent`. Branches that cannot beat the
    /// shared best are pruned.
    #[inline]
    pub fn solve_with_incumbent<E, P, A, S>(
        &mut self,
        graph: &ReducedGraph<T>,
        config: &SearchConfig<T>,
        strategy: &mut Strategy<E, P, A>,
        monitor: S,
        incumbent: &SharedIncumbent<T>,
    ) -> BnbSolverOutcome<T>
    where
        E: BoundEstimator<T>,
        P: PriorityPolicy<T>,
        A: AgentSelector<T>,
        S: TreeSearchMonitor<T>,
    {
        let backing = SharedIncumbentAdapter::new(incumbent);
        self.solve_internal(graph, config, strategy, monitor, backing)
    }

    #[inline(always)]
    fn solve_internal<E, P, A, S, I>(
        &mut self,
        graph: &ReducedGraph<T>,
        config: &SearchConfig<T>,
        strategy: &mut Strategy<E, P, A>,
        mut monitor: S,
        backing: I,
    ) -> BnbSolverOutcome<T>
    where
        E: BoundEstimator<T>,
        P: PriorityPolicy<T>,
        A: AgentSelector<T>,
        S: TreeSearchMonitor<T>,
        I: IncumbentStore<T>,
    {
        debug_assert!(self.frontier.is_empty());

        let session = BnbSolverSearchSession::new(
            graph,
            config,
            &mut self.frontier,
            &mut strategy.estimator,
            &strategy.priority,
            &strategy.selector,
            &mut monitor,
            backing,
        );
        let outcome = session.run();
        self.frontier.clear();
        outcome
    }
}

/// The state of a single search run.
struct BnbSolverSearchSession<'a, T, F, E, P, A, S, I>
where
    T: SolverNumeric,
{
    graph: &'a ReducedGraph<T>,
    config: &'a SearchConfig<T>,
    frontier: &'a mut F,
    estimator: &'a mut E,
    priority: &'a P,
    selector: &'a A,
    monitor: &'a mut S,
    incumbent: I,
    best_value: T,
    best_schedule: Option<Schedule<T>>,
    stats: BnbSolverStatistics<T>,
    start_time: std::time::Instant,
}

impl<'a, T, F, E, P, A, S, I> std::fmt::Display for BnbSolverSearchSession<'a, T, F, E, P, A, S, I>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let schedule = match &self.best_schedule {
            Some(schedule) => format!("Schedule(value: {})", schedule.value()),
            None => "No schedule found".to_string(),
        };
        write!(
            f,
            "SearchSession(best_value: {}, best_schedule: {}, nodes_explored: {})",
            self.best_value, schedule, self.stats.nodes_explored
        )
    }
}

impl<'a, T, F, E, P, A, S, I> BnbSolverSearchSession<'a, T, F, E, P, A, S, I>
where
    T: SolverNumeric,
    F: Frontier<T>,
    E: BoundEstimator<T>,
    P: PriorityPolicy<T>,
    A: AgentSelector<T>,
    S: TreeSearchMonitor<T>,
    I: IncumbentStore<T>,
{
    #[allow(clippy::too_many_arguments)]
    #[inline]
    fn new(
        graph: &'a ReducedGraph<T>,
        config: &'a SearchConfig<T>,
        frontier: &'a mut F,
        estimator: &'a mut E,
        priority: &'a P,
        selector: &'a A,
        monitor: &'a mut S,
        incumbent: I,
    ) -> Self {
        let best_value = incumbent.initial_best();

        Self {
            graph,
            config,
            frontier,
            estimator,
            priority,
            selector,
            monitor,
            incumbent,
            best_value,
            best_schedule: None,
            stats: BnbSolverStatistics::default(),
            start_time: std::time::Instant::now(),
        }
    }

    fn run(mut self) -> BnbSolverOutcome<T> {
        self.monitor
            .on_enter_search(self.graph, self.config, &self.stats);
        debug!(
            valves = self.graph.num_valves(),
            config = %self.config,
            "branch-and-bound search started"
        );

        if self.config.warm_start() {
            self.install_warm_start();
        }
        self.push_root();

        let termination_reason = loop {
            self.best_value = self.incumbent.tighten(self.best_value);

            let Some((key, node)) = self.frontier.pop() else {
                break self.exhausted_reason();
            };

            if node.upper_bound() <= self.best_value {
                self.stats.on_pruning_bound();
                self.monitor
                    .on_prune(&node, PruneReason::StaleBound, &self.stats);
                continue;
            }

            if let SearchCommand::Terminate(reason) = self.monitor.search_command(&self.stats) {
                break TerminationReason::Aborted(reason);
            }

            self.stats.on_node_explored();
            self.stats.on_depth_update(node.depth() as u64);
            self.monitor.on_node_expanded(&node, &self.stats);
            self.expand(&key, &node);
        };

        self.stats.set_total_time(self.start_time.elapsed());
        self.monitor.on_exit_search(&self.stats);
        debug!(
            reason = %termination_reason,
            best_value = %self.best_value,
            nodes = self.stats.nodes_explored,
            "branch-and-bound search finished"
        );
        self.finalize_result(termination_reason)
    }

    /// The reason reported once the frontier runs dry. Without retirement a
    /// two-agent search skips interleavings, so it proves nothing.
    #[inline]
    fn exhausted_reason(&self) -> TerminationReason {
        if self.config.is_exhaustive() {
            TerminationReason::OptimalityProven
        } else {
            TerminationReason::Aborted(RESTRICTED_SEARCH_EXHAUSTED.to_string())
        }
    }

    /// Builds the outcome from the better of the local and the shared
    /// schedule. On ties the local one is kept.
    fn finalize_result(self, reason: TerminationReason) -> BnbSolverOutcome<T> {
        let schedule = match (self.best_schedule, self.incumbent.best_schedule()) {
            (Some(local), Some(shared)) if shared.value() > local.value() => shared,
            (Some(local), _) => local,
            (None, Some(shared)) => shared,
            (None, None) => Schedule::empty(),
        };

        match reason {
            TerminationReason::OptimalityProven => BnbSolverOutcome::optimal(schedule, self.stats),
            TerminationReason::Aborted(reason) => {
                BnbSolverOutcome::aborted(schedule, reason, self.stats)
            }
        }
    }

    fn install_warm_start(&mut self) {
        let schedule = greedy_schedule(self.graph, self.config, self.selector);
        if schedule.value() > self.best_value {
            debug!(value = %schedule.value(), "greedy warm start installed");
            self.install(schedule);
        }
    }

    fn push_root(&mut self) {
        let root = SearchNode::root(self.graph, self.config, &mut *self.estimator);
        self.stats.on_node_generated();
        self.stats.set_root_upper_bound(root.upper_bound());

        if root.upper_bound() > self.best_value {
            let key = self.priority.root_key(&root);
            self.frontier.push(key, root);
            self.stats.on_frontier_len(self.frontier.len() as u64);
        } else {
            self.stats.on_pruning_early();
            self.monitor
                .on_prune(&root, PruneReason::ChildBound, &self.stats);
        }
    }

    fn expand(&mut self, key: &FrontierKey<T>, node: &SearchNode<T>) {
        let Some(agent) = self.select_agent(node) else {
            self.handle_terminal(node);
            return;
        };

        let graph = self.graph;
        let mut enqueued = 0usize;

        for edge in node.affordable_edges(graph, agent) {
            let child = node.open(graph, agent, edge, &mut *self.estimator);
            if self.offer(key, node, child) {
                enqueued += 1;
            }
        }

        if self.config.retirement() {
            let other_can_move = (0..node.agents().len())
                .any(|other| other != agent && node.can_move(graph, other));
            if other_can_move {
                let child = node.retire(graph, agent, &mut *self.estimator);
                if self.offer(key, node, child) {
                    enqueued += 1;
                }
            }
        }

        self.stats.on_frontier_len(self.frontier.len() as u64);
        self.monitor
            .on_children_enqueued(node, enqueued, &self.stats);
    }

    /// The first agent in the selector's preference that can still move.
    #[inline]
    fn select_agent(&self, node: &SearchNode<T>) -> Option<usize> {
        self.selector
            .preference(node.agents())
            .into_iter()
            .find(|&agent| node.can_move(self.graph, agent))
    }

    /// Enqueues `child` if its bound beats the incumbent. Returns `true` if
    /// it was enqueued.
    fn offer(
        &mut self,
        parent_key: &FrontierKey<T>,
        parent: &SearchNode<T>,
        child: SearchNode<T>,
    ) -> bool {
        self.stats.on_node_generated();

        if child.upper_bound() <= self.best_value {
            self.stats.on_pruning_early();
            self.monitor
                .on_prune(&child, PruneReason::ChildBound, &self.stats);
            return false;
        }

        let key = self.priority.child_key(parent_key, parent, &child);
        self.frontier.push(key, child);
        true
    }

    fn handle_terminal(&mut self, node: &SearchNode<T>) {
        self.stats.on_terminal_reached();
        if node.value() > self.best_value {
            self.install(node.to_schedule(self.graph));
        }
    }

    fn install(&mut self, schedule: Schedule<T>) {
        debug_assert!(schedule.value() > self.best_value);

        self.best_value = schedule.value();
        self.stats.on_solution_found();
        debug!(value = %schedule.value(), openings = schedule.len(), "new incumbent");

        self.incumbent.on_solution_found(&schedule);
        self.monitor.on_solution_found(&schedule, &self.stats);
        self.best_schedule = Some(schedule);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        bound::{relaxed::RelaxedBound, slot::SlotBound},
        monitor::{
            interrupt::InterruptMonitor, no_op::NoOperationMonitor, node_limit::NodeLimitMonitor,
        },
        policy::{
            priority::{BestBoundFirst, CumulativePromise, GreatestValueFirst},
            selection::{InOrder, MostTimeRemaining},
        },
        result::SolverResult,
        strategy::DefaultStrategy,
        testing,
    };
    use std::sync::atomic::AtomicBool;

    type IntegerType = i64;

    fn solve_default(
        graph: &ReducedGraph<IntegerType>,
        config: &SearchConfig<IntegerType>,
    ) -> BnbSolverOutcome<IntegerType> {
        let mut solver = BnbSolver::new();
        let mut strategy = DefaultStrategy::default();
        solver.solve(graph, config, &mut strategy, NoOperationMonitor::new())
    }

    fn assert_replays(
        graph: &ReducedGraph<IntegerType>,
        config: &SearchConfig<IntegerType>,
        outcome: &BnbSolverOutcome<IntegerType>,
    ) {
        assert_eq!(
            outcome
                .schedule()
                .replay(graph, config.time_budget(), config.num_agents()),
            Ok(outcome.value())
        );
    }

    #[test]
    fn test_scenario_single_agent() {
        let graph = testing::scenario_graph();
        let config = SearchConfig::single_agent(6).unwrap();
        let outcome = solve_default(&graph, &config);

        assert!(outcome.is_optimal());
        assert_eq!(outcome.value(), 44);
        assert_eq!(outcome.schedule().opened_labels(), vec!["A", "B"]);
        assert_replays(&graph, &config, &outcome);
    }

    #[test]
    fn test_scenario_two_agents_beats_one() {
        let graph = testing::scenario_graph();
        let config = SearchConfig::two_agents(6).unwrap();
        let outcome = solve_default(&graph, &config);

        assert!(outcome.is_optimal());
        assert_eq!(outcome.value(), 50);
        assert!(outcome.value() >= 44);
        assert_replays(&graph, &config, &outcome);
    }

    #[test]
    fn test_scenario_short_budget() {
        let graph = testing::scenario_graph();

        let config = SearchConfig::single_agent(4).unwrap();
        let outcome = solve_default(&graph, &config);
        assert_eq!(outcome.value(), 20);
        assert_eq!(outcome.schedule().opened_labels(), vec!["A"]);

        let config = SearchConfig::two_agents(4).unwrap();
        let outcome = solve_default(&graph, &config);
        assert_eq!(outcome.value(), 24);
        assert_replays(&graph, &config, &outcome);
    }

    #[test]
    fn test_nothing_affordable_is_optimal_and_empty() {
        let graph = testing::scenario_graph();
        for budget in [0, 1, 2] {
            let config = SearchConfig::single_agent(budget).unwrap();
            let outcome = solve_default(&graph, &config);

            assert!(outcome.is_optimal());
            assert_eq!(outcome.value(), 0);
            assert!(outcome.schedule().is_empty());
            assert_eq!(outcome.statistics().nodes_explored, 0);
            assert_eq!(outcome.statistics().root_upper_bound, 0);
        }
    }

    #[test]
    fn test_classic_single_agent() {
        let graph = testing::classic_graph();
        let config = SearchConfig::single_agent(30).unwrap();
        let outcome = solve_default(&graph, &config);

        assert!(outcome.is_optimal());
        assert_eq!(outcome.value(), 1651);
        assert_replays(&graph, &config, &outcome);

        let stats = outcome.statistics();
        assert!(stats.root_upper_bound >= 1651);
        assert!(stats.nodes_generated >= stats.nodes_explored);
        assert!(stats.terminals_reached >= 1);
        assert!(stats.solutions_found >= 1);
    }

    #[test]
    fn test_classic_two_agents() {
        let graph = testing::classic_graph();
        let config = SearchConfig::two_agents(26).unwrap();
        let outcome = solve_default(&graph, &config);

        assert!(outcome.is_optimal());
        assert_eq!(outcome.value(), 1707);
        assert_replays(&graph, &config, &outcome);
    }

    #[test]
    fn test_two_agents_without_retirement_never_claim_optimality() {
        let graph = testing::classic_graph();
        let config = SearchConfig::two_agents(26)
            .unwrap()
            .with_retirement(false);
        let outcome = solve_default(&graph, &config);

        assert!(!outcome.is_optimal());
        assert!(matches!(outcome.result(), SolverResult::Feasible(_)));
        assert_eq!(
            outcome.termination_reason(),
            &TerminationReason::Aborted(RESTRICTED_SEARCH_EXHAUSTED.to_string())
        );
        assert_eq!(outcome.value(), 1707);
        assert_replays(&graph, &config, &outcome);
    }

    #[test]
    fn test_every_strategy_finds_the_classic_optimum() {
        let graph = testing::classic_graph();
        let config = SearchConfig::single_agent(30).unwrap();
        let mut solver = BnbSolver::new();

        let mut values: Vec<IntegerType> = Vec::new();
        values.push(
            solver
                .solve(
                    &graph,
                    &config,
                    &mut Strategy::new(RelaxedBound, BestBoundFirst, MostTimeRemaining),
                    NoOperationMonitor::new(),
                )
                .value(),
        );
        values.push(
            solver
                .solve(
                    &graph,
                    &config,
                    &mut Strategy::new(SlotBound::new(), GreatestValueFirst, InOrder),
                    NoOperationMonitor::new(),
                )
                .value(),
        );
        values.push(
            solver
                .solve(
                    &graph,
                    &config,
                    &mut Strategy::new(SlotBound::new(), CumulativePromise, MostTimeRemaining),
                    NoOperationMonitor::new(),
                )
                .value(),
        );

        assert_eq!(values, vec![1651, 1651, 1651]);
    }

    #[test]
    fn test_single_agent_matches_brute_force_for_every_policy() {
        for seed in 0..30 {
            let graph = testing::random_graph(seed, 10, 6);
            let config = SearchConfig::single_agent(18).unwrap();
            let expected = testing::brute_force(&graph, 18, 1);
            let mut solver = BnbSolver::new();

            let values = [
                solver
                    .solve(
                        &graph,
                        &config,
                        &mut Strategy::new(SlotBound::new(), BestBoundFirst, MostTimeRemaining),
                        NoOperationMonitor::new(),
                    )
                    .value(),
                solver
                    .solve(
                        &graph,
                        &config,
                        &mut Strategy::new(RelaxedBound, GreatestValueFirst, InOrder),
                        NoOperationMonitor::new(),
                    )
                    .value(),
                solver
                    .solve(
                        &graph,
                        &config,
                        &mut Strategy::new(SlotBound::new(), CumulativePromise, InOrder),
                        NoOperationMonitor::new(),
                    )
                    .value(),
            ];

            assert_eq!(values, [expected; 3], "seed {}", seed);
        }
    }

    #[test]
    fn test_default_two_agents_match_brute_force() {
        for seed in 0..30 {
            let graph = testing::random_graph(seed, 9, 6);
            let config = SearchConfig::two_agents(12).unwrap();
            let expected = testing::brute_force(&graph, 12, 2);

            let outcome = solve_default(&graph, &config);
            assert!(outcome.is_optimal(), "seed {}", seed);
            assert_eq!(outcome.value(), expected, "seed {}", seed);
            assert_replays(&graph, &config, &outcome);

            let restricted = config.with_retirement(false);
            let without = solve_default(&graph, &restricted);
            assert!(!without.is_optimal(), "seed {}", seed);
            assert!(without.value() <= expected, "seed {}", seed);
            assert_replays(&graph, &restricted, &without);
        }
    }

    #[test]
    fn test_two_agents_match_brute_force_on_larger_caves() {
        for seed in 0..60 {
            let graph = testing::random_graph(seed, 8, 5);
            for budget in [8, 10] {
                let config = SearchConfig::two_agents(budget).unwrap();
                let outcome = solve_default(&graph, &config);
                let expected = testing::brute_force(&graph, budget, 2);

                assert!(outcome.is_optimal());
                assert_eq!(
                    outcome.value(),
                    expected,
                    "seed {} budget {}",
                    seed,
                    budget
                );
            }
        }
    }

    #[test]
    fn test_repeated_solves_are_identical() {
        let graph = testing::classic_graph();
        let config = SearchConfig::two_agents(26).unwrap();
        let mut solver = BnbSolver::new();
        let mut strategy = DefaultStrategy::default();

        let first = solver.solve(&graph, &config, &mut strategy, NoOperationMonitor::new());
        assert!(solver.frontier().is_empty());
        let second = solver.solve(&graph, &config, &mut strategy, NoOperationMonitor::new());

        assert_eq!(first.value(), second.value());
        assert_eq!(first.schedule(), second.schedule());
        assert_eq!(
            first.statistics().nodes_explored,
            second.statistics().nodes_explored
        );
    }

    #[test]
    fn test_node_limit_aborts_with_feasible_result() {
        let graph = testing::classic_graph();
        let config = SearchConfig::single_agent(30).unwrap();
        let mut solver = BnbSolver::new();
        let mut strategy = DefaultStrategy::default();

        let outcome = solver.solve(&graph, &config, &mut strategy, NodeLimitMonitor::new(5));

        assert!(!outcome.is_optimal());
        assert!(matches!(outcome.result(), SolverResult::Feasible(_)));
        assert_eq!(
            outcome.termination_reason(),
            &TerminationReason::Aborted("node limit of 5 reached".to_string())
        );
        assert_eq!(outcome.statistics().nodes_explored, 5);
        assert!(outcome.value() <= 1651);
        assert_replays(&graph, &config, &outcome);
        assert!(solver.frontier().is_empty());
    }

    #[test]
    fn test_node_limit_equal_to_search_size_proves_optimality() {
        let graph = testing::classic_graph();
        let config = SearchConfig::single_agent(30).unwrap();
        let full = solve_default(&graph, &config);
        let size = full.statistics().nodes_explored;
        assert!(size > 1);

        let mut solver = BnbSolver::new();
        let mut strategy = DefaultStrategy::default();

        let exact = solver.solve(&graph, &config, &mut strategy, NodeLimitMonitor::new(size));
        assert!(exact.is_optimal());
        assert_eq!(exact.value(), 1651);
        assert_eq!(exact.statistics().nodes_explored, size);

        let short = solver.solve(
            &graph,
            &config,
            &mut strategy,
            NodeLimitMonitor::new(size - 1),
        );
        assert!(!short.is_optimal());
        assert_eq!(short.statistics().nodes_explored, size - 1);
        assert_eq!(
            short.termination_reason(),
            &TerminationReason::Aborted(format!("node limit of {} reached", size - 1))
        );
    }

    #[test]
    fn test_interrupt_keeps_warm_start() {
        let graph = testing::classic_graph();
        let config = SearchConfig::single_agent(30)
            .unwrap()
            .with_warm_start(true);
        let flag = AtomicBool::new(true);
        let mut solver = BnbSolver::new();
        let mut strategy = DefaultStrategy::default();

        let outcome = solver.solve(&graph, &config, &mut strategy, InterruptMonitor::new(&flag));

        assert!(!outcome.is_optimal());
        assert_eq!(
            outcome.termination_reason(),
            &TerminationReason::Aborted("Interrupt signal received".to_string())
        );
        assert_eq!(outcome.statistics().nodes_explored, 0);
        assert!(outcome.value() > 0);
        assert_eq!(outcome.statistics().solutions_found, 1);
        assert_replays(&graph, &config, &outcome);
    }

    #[test]
    fn test_warm_start_matching_root_bound_is_proven_despite_interrupt() {
        // Greedy finds 44, which equals the root bound: nothing is left to expand.
        let graph = testing::scenario_graph();
        let config = SearchConfig::single_agent(6)
            .unwrap()
            .with_warm_start(true);
        let flag = AtomicBool::new(true);
        let mut solver = BnbSolver::new();
        let mut strategy = DefaultStrategy::default();

        let outcome = solver.solve(&graph, &config, &mut strategy, InterruptMonitor::new(&flag));

        assert!(outcome.is_optimal());
        assert_eq!(outcome.value(), 44);
        assert_eq!(outcome.statistics().nodes_explored, 0);
        assert_replays(&graph, &config, &outcome);
    }

    #[test]
    fn test_warm_start_does_not_change_the_optimum() {
        let graph = testing::classic_graph();
        let cold = SearchConfig::single_agent(30).unwrap();
        let warm = cold.with_warm_start(true);

        let cold_outcome = solve_default(&graph, &cold);
        let warm_outcome = solve_default(&graph, &warm);

        assert_eq!(cold_outcome.value(), 1651);
        assert_eq!(warm_outcome.value(), 1651);
        assert!(warm_outcome.is_optimal());
        assert_replays(&graph, &warm, &warm_outcome);
    }

    #[test]
    fn test_shared_incumbent_receives_the_optimum() {
        let graph = testing::classic_graph();
        let config = SearchConfig::single_agent(30).unwrap();
        let incumbent = SharedIncumbent::new();
        let mut solver = BnbSolver::new();
        let mut strategy = DefaultStrategy::default();

        let outcome = solver.solve_with_incumbent(
            &graph,
            &config,
            &mut strategy,
            NoOperationMonitor::new(),
            &incumbent,
        );

        assert_eq!(outcome.value(), 1651);
        assert_eq!(incumbent.best_value(), 1651);
        assert_eq!(incumbent.snapshot().map(|s| s.value()), Some(1651));
    }

    #[test]
    fn test_preinstalled_optimum_is_returned_without_local_solution() {
        let graph = testing::classic_graph();
        let config = SearchConfig::single_agent(30).unwrap();
        let incumbent = SharedIncumbent::new();
        let mut solver = BnbSolver::new();
        let mut strategy = DefaultStrategy::default();

        let first = solver.solve_with_incumbent(
            &graph,
            &config,
            &mut strategy,
            NoOperationMonitor::new(),
            &incumbent,
        );
        let second = solver.solve_with_incumbent(
            &graph,
            &config,
            &mut strategy,
            NoOperationMonitor::new(),
            &incumbent,
        );

        assert!(second.is_optimal());
        assert_eq!(second.value(), 1651);
        assert_eq!(second.schedule(), first.schedule());
        assert_eq!(second.statistics().solutions_found, 0);
        assert!(second.statistics().nodes_explored < first.statistics().nodes_explored);
    }

    #[test]
    fn test_monitor_sees_every_solution() {
        struct Counter {
            solutions: u64,
            expanded: u64,
        }

        impl TreeSearchMonitor<IntegerType> for Counter {
            fn name(&self) -> &str {
                "Counter"
            }
            fn on_enter_search(
                &mut self,
                _graph: &ReducedGraph<IntegerType>,
                _config: &SearchConfig<IntegerType>,
                _statistics: &BnbSolverStatistics<IntegerType>,
            ) {
            }
            fn on_exit_search(&mut self, _statistics: &BnbSolverStatistics<IntegerType>) {}
            fn on_node_expanded(
                &mut self,
                _node: &SearchNode<IntegerType>,
                _statistics: &BnbSolverStatistics<IntegerType>,
            ) {
                self.expanded += 1;
            }
            fn on_prune(
                &mut self,
                _node: &SearchNode<IntegerType>,
                _reason: PruneReason,
                _statistics: &BnbSolverStatistics<IntegerType>,
            ) {
            }
            fn on_children_enqueued(
                &mut self,
                _node: &SearchNode<IntegerType>,
                _count: usize,
                _statistics: &BnbSolverStatistics<IntegerType>,
            ) {
            }
            fn on_solution_found(
                &mut self,
                _schedule: &Schedule<IntegerType>,
                _statistics: &BnbSolverStatistics<IntegerType>,
            ) {
                self.solutions += 1;
            }
        }

        let graph = testing::classic_graph();
        let config = SearchConfig::single_agent(30).unwrap();
        let mut solver = BnbSolver::new();
        let mut strategy = DefaultStrategy::default();
        let mut counter = Counter {
            solutions: 0,
            expanded: 0,
        };

        let outcome = solver.solve(&graph, &config, &mut strategy, &mut counter);

        assert_eq!(counter.solutions, outcome.statistics().solutions_found);
        assert_eq!(counter.expanded, outcome.statistics().nodes_explored);
    }
}
