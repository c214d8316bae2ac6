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

//! Relaxed bound
//!
//! Every candidate valve is credited as if each agent walked there directly:
//! its flow rate times the time it would still flow on arrival. Cheaper than
//! `SlotBound` since it needs no sorting. Neither bound dominates the other:
//! this one is tighter when the valuable valves are far away.

use crate::{agent::Agent, bound::estimator::BoundEstimator};
use fixedbitset::FixedBitSet;
use floodgate_model::{
    num::{SolverNumeric, clamped_mul},
    reduce::ReducedGraph,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelaxedBound;

impl RelaxedBound {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl<T> BoundEstimator<T> for RelaxedBound
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "RelaxedBound"
    }

    fn estimate(
        &mut self,
        graph: &ReducedGraph<T>,
        agents: &[Agent<T>],
        opened: &FixedBitSet,
    ) -> T {
        let mut total = T::zero();
        for agent in agents {
            for edge in graph.edges(agent.position()) {
                if !agent.can_afford(edge.distance()) {
                    break;
                }
                if opened.contains(edge.destination().get()) {
                    continue;
                }
                let gain = clamped_mul(edge.flow_rate(), agent.time_after(edge.distance()));
                total = total.saturating_add(gain);
            }
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{bound::slot::SlotBound, config::SearchConfig, node::SearchNode, testing};

    #[test]
    fn test_scenario_sums_every_candidate() {
        let graph = testing::scenario_graph();
        let opened = FixedBitSet::with_capacity(graph.num_valves());
        let agent = Agent::new(6i64, graph.start());
        // (10 + 2 + 1) * 4
        assert_eq!(RelaxedBound::new().estimate(&graph, &[agent], &opened), 52);
    }

    #[test]
    fn test_far_valuable_valve_is_credited_once() {
        // Near A(1) one step away, far B(2) ten steps away: 1 * 28 + 2 * 19.
        let graph = testing::line_graph();
        let opened = FixedBitSet::with_capacity(graph.num_valves());
        let agent = Agent::new(30i64, graph.start());
        assert_eq!(RelaxedBound::new().estimate(&graph, &[agent], &opened), 66);
        assert_eq!(SlotBound::new().estimate(&graph, &[agent], &opened), 82);
    }

    #[test]
    fn test_root_bound_dominates_brute_force() {
        for seed in 0..20 {
            let graph = testing::random_graph(seed, 9, 6);
            for (budget, agents) in [(14i64, 1), (10, 2)] {
                let config = SearchConfig::new(budget, agents).unwrap();
                let root = SearchNode::root(&graph, &config, &mut RelaxedBound::new());
                assert!(root.upper_bound() >= testing::brute_force(&graph, budget, agents));
            }
        }
    }

    #[test]
    fn test_bound_is_monotone_along_every_path() {
        for seed in 0..10 {
            let graph = testing::random_graph(seed, 8, 5);
            let config = SearchConfig::single_agent(12i64).unwrap();
            let mut estimator = RelaxedBound::new();
            let root = SearchNode::root(&graph, &config, &mut estimator);
            testing::assert_monotone(&graph, &root, &mut estimator);
        }
    }
}
