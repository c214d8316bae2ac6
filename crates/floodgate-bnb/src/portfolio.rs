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

//! Portfolio integration
//!
//! A portfolio runs several solvers on the same instance, usually on separate
//! threads, sharing one `SharedIncumbent`. Each member receives a
//! `PortfolioSolverContext` and returns a `BnbSolverOutcome`.
//!
//! `BnbPortfolioSolver` adapts a `BnbSolver` and a `Strategy` to this
//! interface.

use crate::{
    bnb::BnbSolver,
    bound::estimator::BoundEstimator,
    config::SearchConfig,
    incumbent::SharedIncumbent,
    monitor::tree_search_monitor::TreeSearchMonitor,
    policy::{priority::PriorityPolicy, selection::AgentSelector},
    result::BnbSolverOutcome,
    strategy::Strategy,
};
use floodgate_model::{num::SolverNumeric, reduce::ReducedGraph};

/// Everything a portfolio member needs for one run.
pub struct PortfolioSolverContext<'a, T>
where
    T: SolverNumeric,
{
    pub graph: &'a ReducedGraph<T>,
    pub config: &'a SearchConfig<T>,
    pub incumbent: &'a SharedIncumbent<T>,
    pub monitor: &'a mut dyn TreeSearchMonitor<T>,
}

impl<'a, T> PortfolioSolverContext<'a, T>
where
    T: SolverNumeric,
{
    #[inline]
    pub fn new(
        graph: &'a ReducedGraph<T>,
        config: &'a SearchConfig<T>,
        incumbent: &'a SharedIncumbent<T>,
        monitor: &'a mut dyn TreeSearchMonitor<T>,
    ) -> Self {
        Self {
            graph,
            config,
            incumbent,
            monitor,
        }
    }
}

impl<'a, T> std::fmt::Debug for PortfolioSolverContext<'a, T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortfolioSolverContext")
            .field("config", self.config)
            .field("incumbent", &self.incumbent.best_value())
            .field("monitor", &self.monitor.name())
            .finish()
    }
}

/// A solver that can take part in a portfolio.
pub trait PortfolioSolver<T>: Send
where
    T: SolverNumeric,
{
    /// Returns the name of the solver.
    fn name(&self) -> &str;

    /// Runs the solver once. Implementations must publish improving
    /// schedules to `context.incumbent` and honor `context.monitor`.
    fn invoke(&mut self, context: PortfolioSolverContext<'_, T>) -> BnbSolverOutcome<T>;
}

impl<T> std::fmt::Debug for dyn PortfolioSolver<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PortfolioSolver({})", self.name())
    }
}

impl<T> std::fmt::Display for dyn PortfolioSolver<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PortfolioSolver({})", self.name())
    }
}

#[derive(Debug)]
pub struct BnbPortfolioSolver<T, E, P, A>
where
    T: SolverNumeric,
{
    inner: BnbSolver<T>,
    strategy: Strategy<E, P, A>,
    name: String,
}

impl<T, E, P, A> BnbPortfolioSolver<T, E, P, A>
where
    T: SolverNumeric,
    E: BoundEstimator<T>,
    P: PriorityPolicy<T>,
    A: AgentSelector<T>,
{
    #[inline]
    pub fn new(strategy: Strategy<E, P, A>) -> Self {
        let name = format!("BnbPortfolioSolver({})", strategy.describe::<T>());
        Self {
            inner: BnbSolver::new(),
            strategy,
            name,
        }
    }

    #[inline]
    pub fn inner(&self) -> &BnbSolver<T> {
        &self.inner
    }

    #[inline]
    pub fn strategy(&self) -> &Strategy<E, P, A> {
        &self.strategy
    }
}

impl<T, E, P, A> PortfolioSolver<T> for BnbPortfolioSolver<T, E, P, A>
where
    T: SolverNumeric,
    E: BoundEstimator<T> + Send,
    P: PriorityPolicy<T> + Send,
    A: AgentSelector<T> + Send,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn invoke(&mut self, context: PortfolioSolverContext<'_, T>) -> BnbSolverOutcome<T> {
        self.inner.solve_with_incumbent(
            context.graph,
            context.config,
            &mut self.strategy,
            context.monitor,
            context.incumbent,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        bound::relaxed::RelaxedBound,
        monitor::no_op::NoOperationMonitor,
        policy::{priority::GreatestValueFirst, selection::InOrder},
        result::TerminationReason,
        strategy::DefaultStrategy,
        testing,
    };

    type IntegerType = i64;

    #[test]
    fn test_portfolio_bnb_solver_finds_optimum_and_publishes_it() {
        let graph = testing::classic_graph();
        let config = SearchConfig::single_agent(30).unwrap();
        let incumbent = SharedIncumbent::<IntegerType>::new();
        let mut monitor = NoOperationMonitor::new();

        let mut solver = BnbPortfolioSolver::new(DefaultStrategy::default());
        assert_eq!(
            solver.name(),
            "BnbPortfolioSolver(SlotBound/BestBoundFirst/MostTimeRemaining)"
        );

        let context = PortfolioSolverContext::new(&graph, &config, &incumbent, &mut monitor);
        let outcome = solver.invoke(context);

        assert!(outcome.is_optimal());
        assert_eq!(outcome.value(), 1651);
        assert_eq!(
            outcome.termination_reason(),
            &TerminationReason::OptimalityProven
        );
        assert_eq!(incumbent.best_value(), 1651);
    }

    #[test]
    fn test_members_cooperate_through_the_incumbent() {
        let graph = testing::classic_graph();
        let config = SearchConfig::two_agents(26).unwrap();
        let incumbent = SharedIncumbent::<IntegerType>::new();

        let mut members: Vec<Box<dyn PortfolioSolver<IntegerType>>> = vec![
            Box::new(BnbPortfolioSolver::new(DefaultStrategy::default())),
            Box::new(BnbPortfolioSolver::new(Strategy::new(
                RelaxedBound,
                GreatestValueFirst,
                InOrder,
            ))),
        ];

        for member in &mut members {
            let mut monitor = NoOperationMonitor::new();
            let context = PortfolioSolverContext::new(&graph, &config, &incumbent, &mut monitor);
            let outcome = member.invoke(context);
            assert_eq!(outcome.value(), 1707, "{}", member.name());
        }
        assert_eq!(incumbent.best_value(), 1707);
    }
}
