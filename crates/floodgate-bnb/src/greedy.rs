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

//! Greedy warm start
//!
//! Builds a complete schedule without search: whichever agent the selector
//! picks opens the valve with the largest immediate value (flow rate times
//! the time it would flow), preferring the nearer valve on ties, until no
//! agent can move. The result seeds the incumbent so pruning bites from the
//! first expansion on.

use crate::{agent::Agent, config::SearchConfig, node::Agents, policy::selection::AgentSelector};
use fixedbitset::FixedBitSet;
use floodgate_model::{
    num::{SolverNumeric, clamped_mul},
    reduce::{Edge, ReducedGraph},
    schedule::{Schedule, ScheduledOpen},
};

/// Returns the greedy schedule for `config` on `graph`.
pub fn greedy_schedule<T, A>(
    graph: &ReducedGraph<T>,
    config: &SearchConfig<T>,
    selector: &A,
) -> Schedule<T>
where
    T: SolverNumeric,
    A: AgentSelector<T> + ?Sized,
{
    let mut agents: Agents<T> = (0..config.num_agents())
        .map(|_| Agent::new(config.time_budget(), graph.start()))
        .collect();
    let mut opened = FixedBitSet::with_capacity(graph.num_valves());
    let mut value = T::zero();
    let mut events = Vec::new();

    loop {
        let chosen = selector
            .preference(&agents)
            .into_iter()
            .find_map(|index| best_move(graph, &agents[index], &opened).map(|edge| (index, edge)));

        let Some((index, edge)) = chosen else {
            break;
        };

        let valve = edge.destination();
        agents[index] = agents[index].moved_to(valve, edge.distance());
        let time_left = agents[index].time_left();
        opened.insert(valve.get());
        value = value.saturating_add(clamped_mul(edge.flow_rate(), time_left));
        events.push(ScheduledOpen::new(index, time_left, valve, graph.label(valve)));
    }

    Schedule::new(value, events)
}

// Edges are scanned nearest first, so keeping the first maximum prefers
// the shorter distance on ties.
fn best_move<'g, T>(
    graph: &'g ReducedGraph<T>,
    agent: &Agent<T>,
    opened: &FixedBitSet,
) -> Option<&'g Edge<T>>
where
    T: SolverNumeric,
{
    let mut best: Option<(T, &'g Edge<T>)> = None;
    for edge in graph.edges(agent.position()) {
        if !agent.can_afford(edge.distance()) {
            break;
        }
        if opened.contains(edge.destination().get()) {
            continue;
        }
        let gain = clamped_mul(edge.flow_rate(), agent.time_after(edge.distance()));
        if best.is_none_or(|(best_gain, _)| gain > best_gain) {
            best = Some((gain, edge));
        }
    }
    best.map(|(_, edge)| edge)
}
