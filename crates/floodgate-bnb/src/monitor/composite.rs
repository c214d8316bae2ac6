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

//! Monitoring combinators for tree search
//!
//! Provides `CompositeTreeSearchMonitor`, a fan-out monitor that forwards every
//! event to its children. This lets you mix logging, limits and cancellation
//! without coupling them to the solver.
//!
//! Behavior
//! - Events are dispatched to child monitors in insertion order.
//! - `search_command` short-circuits on the first non-`Continue` response;
//!   put stricter stop conditions first.
//! - Other callbacks always fan out to all children.

use crate::{
    config::SearchConfig,
    monitor::tree_search_monitor::{PruneReason, SearchCommand, TreeSearchMonitor},
    node::SearchNode,
    stats::BnbSolverStatistics,
};
use floodgate_model::{num::SolverNumeric, reduce::ReducedGraph, schedule::Schedule};

/// A tree search monitor that aggregates multiple monitors and forwards events to all of them.
pub struct CompositeTreeSearchMonitor<'a, T>
where
    T: SolverNumeric,
{
    monitors: Vec<Box<dyn TreeSearchMonitor<T> + 'a>>,
}

impl<'a, T> Default for CompositeTreeSearchMonitor<'a, T>
where
    T: SolverNumeric,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> CompositeTreeSearchMonitor<'a, T>
where
    T: SolverNumeric,
{
    /// Creates a new empty `CompositeTreeSearchMonitor`.
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            monitors: Vec::new(),
        }
    }

    /// Creates a new `CompositeTreeSearchMonitor` with room for `capacity` monitors.
    #[inline(always)]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            monitors: Vec::with_capacity(capacity),
        }
    }

    /// Adds a new monitor to the composite monitor.
    #[inline(always)]
    pub fn add_monitor<M>(&mut self, monitor: M)
    where
        M: TreeSearchMonitor<T> + 'a,
    {
        self.monitors.push(Box::new(monitor));
    }

    /// Adds a boxed monitor to the composite monitor.
    #[inline(always)]
    pub fn add_monitor_boxed(&mut self, monitor: Box<dyn TreeSearchMonitor<T> + 'a>) {
        self.monitors.push(monitor);
    }

    #[inline(always)]
    pub fn monitors(&self) -> &[Box<dyn TreeSearchMonitor<T> + 'a>] {
        &self.monitors
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }
}

impl<'a, T> FromIterator<Box<dyn TreeSearchMonitor<T> + 'a>> for CompositeTreeSearchMonitor<'a, T>
where
    T: SolverNumeric,
{
    #[inline(always)]
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn TreeSearchMonitor<T> + 'a>>,
    {
        Self {
            monitors: iter.into_iter().collect(),
        }
    }
}

impl<'a, T> TreeSearchMonitor<T> for CompositeTreeSearchMonitor<'a, T>
where
    T: SolverNumeric,
{
    #[inline(always)]
    fn name(&self) -> &str {
        "CompositeTreeSearchMonitor"
    }

    #[inline(always)]
    fn on_enter_search(
        &mut self,
        graph: &ReducedGraph<T>,
        config: &SearchConfig<T>,
        statistics: &BnbSolverStatistics<T>,
    ) {
        for monitor in &mut self.monitors {
            monitor.on_enter_search(graph, config, statistics);
        }
    }

    #[inline(always)]
    fn on_exit_search(&mut self, statistics: &BnbSolverStatistics<T>) {
        for monitor in &mut self.monitors {
            monitor.on_exit_search(statistics);
        }
    }

    #[inline(always)]
    fn search_command(&mut self, statistics: &BnbSolverStatistics<T>) -> SearchCommand {
        for monitor in &mut self.monitors {
            let command = monitor.search_command(statistics);
            if !matches!(command, SearchCommand::Continue) {
                return command;
            }
        }
        SearchCommand::Continue
    }

    #[inline(always)]
    fn on_node_expanded(&mut self, node: &SearchNode<T>, statistics: &BnbSolverStatistics<T>) {
        for monitor in &mut self.monitors {
            monitor.on_node_expanded(node, statistics);
        }
    }

    #[inline(always)]
    fn on_prune(
        &mut self,
        node: &SearchNode<T>,
        reason: PruneReason,
        statistics: &BnbSolverStatistics<T>,
    ) {
        for monitor in &mut self.monitors {
            monitor.on_prune(node, reason, statistics);
        }
    }

    #[inline(always)]
    fn on_children_enqueued(
        &mut self,
        node: &SearchNode<T>,
        count: usize,
        statistics: &BnbSolverStatistics<T>,
    ) {
        for monitor in &mut self.monitors {
            monitor.on_children_enqueued(node, count, statistics);
        }
    }

    #[inline(always)]
    fn on_solution_found(&mut self, schedule: &Schedule<T>, statistics: &BnbSolverStatistics<T>) {
        for monitor in &mut self.monitors {
            monitor.on_solution_found(schedule, statistics);
        }
    }
}

impl<'a, T> std::fmt::Debug for CompositeTreeSearchMonitor<'a, T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.monitors.iter().map(|monitor| monitor.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::Cell, rc::Rc};

    type IntegerType = i64;

    struct Probe {
        name: &'static str,
        command: SearchCommand,
        asked: Rc<Cell<usize>>,
        solutions: Rc<Cell<usize>>,
    }

    impl Probe {
        fn new(name: &'static str, command: SearchCommand) -> (Self, Rc<Cell<usize>>, Rc<Cell<usize>>) {
            let asked = Rc::new(Cell::new(0));
            let solutions = Rc::new(Cell::new(0));
            (
                Self {
                    name,
                    command,
                    asked: asked.clone(),
                    solutions: solutions.clone(),
                },
                asked,
                solutions,
            )
        }
    }

    impl TreeSearchMonitor<IntegerType> for Probe {
        fn name(&self) -> &str {
            self.name
        }

        fn on_enter_search(
            &mut self,
            _graph: &ReducedGraph<IntegerType>,
            _config: &SearchConfig<IntegerType>,
            _statistics: &BnbSolverStatistics<IntegerType>,
        ) {
        }

        fn on_exit_search(&mut self, _statistics: &BnbSolverStatistics<IntegerType>) {}

        fn search_command(&mut self, _statistics: &BnbSolverStatistics<IntegerType>) -> SearchCommand {
            self.asked.set(self.asked.get() + 1);
            self.command.clone()
        }

        fn on_node_expanded(
            &mut self,
            _node: &SearchNode<IntegerType>,
            _statistics: &BnbSolverStatistics<IntegerType>,
        ) {
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
            self.solutions.set(self.solutions.get() + 1);
        }
    }

    #[test]
    fn test_empty_composite_continues() {
        let mut composite = CompositeTreeSearchMonitor::<IntegerType>::new();
        assert!(composite.is_empty());
        assert_eq!(
            composite.search_command(&BnbSolverStatistics::default()),
            SearchCommand::Continue
        );
    }

    #[test]
    fn test_first_terminate_wins_and_short_circuits() {
        let (first, first_asked, _) = Probe::new("first", SearchCommand::Continue);
        let (second, second_asked, _) =
            Probe::new("second", SearchCommand::Terminate("second".to_string()));
        let (third, third_asked, _) =
            Probe::new("third", SearchCommand::Terminate("third".to_string()));

        let mut composite = CompositeTreeSearchMonitor::<IntegerType>::with_capacity(3);
        composite.add_monitor(first);
        composite.add_monitor(second);
        composite.add_monitor_boxed(Box::new(third));
        assert_eq!(composite.len(), 3);

        let command = composite.search_command(&BnbSolverStatistics::default());
        assert_eq!(command, SearchCommand::Terminate("second".to_string()));
        assert_eq!(first_asked.get(), 1);
        assert_eq!(second_asked.get(), 1);
        assert_eq!(third_asked.get(), 0);
    }

    #[test]
    fn test_events_fan_out_to_every_monitor() {
        let (first, _, first_solutions) = Probe::new("first", SearchCommand::Continue);
        let (second, _, second_solutions) = Probe::new("second", SearchCommand::Continue);

        let mut composite: CompositeTreeSearchMonitor<'_, IntegerType> =
            vec![Box::new(first) as Box<dyn TreeSearchMonitor<IntegerType>>, Box::new(second)]
                .into_iter()
                .collect();

        composite.on_solution_found(&Schedule::empty(), &BnbSolverStatistics::default());
        assert_eq!(first_solutions.get(), 1);
        assert_eq!(second_solutions.get(), 1);
        assert_eq!(format!("{:?}", composite), "[\"first\", \"second\"]");
    }
}
