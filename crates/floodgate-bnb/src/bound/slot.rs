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

//! Slot bound
//!
//! For each agent independently, the candidates are the unopened valves it
//! could still reach with at least one minute of flow. Let `M` be the largest
//! such remaining time. Every opening costs at least one step plus one
//! minute, so the k-th valve the agent opens (counting from zero) flows for
//! at most `M - 2k` minutes. Pairing the candidate flow rates, largest first,
//! with the slots `M, M - 2, M - 4, ...` therefore bounds anything the agent
//! can release. The per-agent bounds are summed, ignoring that two agents
//! may compete for the same valve.
//!
//! The bound never increases from a node to its children: a move shrinks
//! every candidate's remaining time by at least two and spends the best slot
//! on the opened valve.

use crate::{agent::Agent, bound::estimator::BoundEstimator};
use fixedbitset::FixedBitSet;
use floodgate_model::{
    num::{SolverNumeric, clamped_mul, two},
    reduce::ReducedGraph,
};

/// The default bound estimator.
#[derive(Debug, Clone, Default)]
pub struct SlotBound<T> {
    rates: Vec<T>,
}

impl<T> SlotBound<T>
where
    T: SolverNumeric,
{
    #[inline]
    pub fn new() -> Self {
        Self { rates: Vec::new() }
    }

    /// Creates an estimator whose scratch buffer fits `num_valves` candidates.
    #[inline]
    pub fn preallocated(num_valves: usize) -> Self {
        Self {
            rates: Vec::with_capacity(num_valves),
        }
    }

    fn estimate_agent(
        &mut self,
        graph: &ReducedGraph<T>,
        agent: &Agent<T>,
        opened: &FixedBitSet,
    ) -> T {
        self.rates.clear();
        let mut best_slot = T::zero();

        for edge in graph.edges(agent.position()) {
            if !agent.can_afford(edge.distance()) {
                break;
            }
            if opened.contains(edge.destination().get()) {
                continue;
            }
            best_slot = best_slot.max(agent.time_after(edge.distance()));
            self.rates.push(edge.flow_rate());
        }

        self.rates.sort_unstable_by(|a, b| b.cmp(a));

        let mut slot = best_slot;
        let mut total = T::zero();
        for &rate in &self.rates {
            if slot <= T::zero() {
                break;
            }
            total = total.saturating_add(clamped_mul(rate, slot));
            slot = slot - two();
        }
        total
    }
}

impl<T> BoundEstimator<T> for SlotBound<T>
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "SlotBound"
    }

    fn estimate(
        &mut self,
        graph: &ReducedGraph<T>,
        agents: &[Agent<T>],
        opened: &FixedBitSet,
    ) -> T {
        agents.iter().fold(T::zero(), |acc, agent| {
            acc.saturating_add(self.estimate_agent(graph, agent, opened))
        })
    }
}
