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

//! Immutable search nodes
//!
//! A `SearchNode` is one state of the search tree: where every agent stands,
//! how much time each has left, which valves are already open and how much
//! value has been released so far. Nodes are never mutated; every child is a
//! fresh node derived from its parent by a single move.
//!
//! The history of openings is kept as a persistent, `Arc`-linked trace so
//! siblings share their common prefix and a winning schedule can be rebuilt
//! from any node without copying histories along the way.
//!
//! The cached `upper_bound` is `value + estimate` at creation time and is
//! what the frontier orders and prunes by.

use crate::{agent::Agent, bound::estimator::BoundEstimator, config::SearchConfig};
use fixedbitset::FixedBitSet;
use floodgate_model::{
    index::NodeIndex,
    num::{SolverNumeric, clamped_mul},
    reduce::{Edge, ReducedGraph},
    schedule::{Schedule, ScheduledOpen},
};
use smallvec::SmallVec;
use std::sync::Arc;

/// The per-node agent storage. Inline for the supported agent counts.
pub type Agents<T> = SmallVec<[Agent<T>; 2]>;

/// A single valve opening recorded in the trace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OpenEvent<T> {
    agent: usize,
    time_left: T,
    valve: NodeIndex,
}

impl<T> OpenEvent<T>
where
    T: SolverNumeric,
{
    #[inline(always)]
    pub fn agent(&self) -> usize {
        self.agent
    }

    #[inline(always)]
    pub fn time_left(&self) -> T {
        self.time_left
    }

    #[inline(always)]
    pub fn valve(&self) -> NodeIndex {
        self.valve
    }
}

#[derive(Debug)]
struct TraceLink<T> {
    event: OpenEvent<T>,
    parent: Option<Arc<TraceLink<T>>>,
}

/// A state of the search tree.
#[derive(Clone, Debug)]
pub struct SearchNode<T> {
    agents: Agents<T>,
    opened: FixedBitSet,
    value: T,
    upper_bound: T,
    depth: usize,
    trace: Option<Arc<TraceLink<T>>>,
}

impl<T> SearchNode<T>
where
    T: SolverNumeric,
{
    /// Creates the root node: every agent at the start node with the full
    /// time budget, nothing opened.
    pub fn root<E>(graph: &ReducedGraph<T>, config: &SearchConfig<T>, estimator: &mut E) -> Self
    where
        E: BoundEstimator<T> + ?Sized,
    {
        let agents: Agents<T> = (0..config.num_agents())
            .map(|_| Agent::new(config.time_budget(), graph.start()))
            .collect();
        let opened = FixedBitSet::with_capacity(graph.num_valves());
        let upper_bound = estimator.estimate(graph, &agents, &opened);

        Self {
            agents,
            opened,
            value: T::zero(),
            upper_bound,
            depth: 0,
            trace: None,
        }
    }

    /// Derives the child in which `agent` walks along `edge` and opens the
    /// valve at its end.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if the agent cannot afford the move or the
    /// valve is already open.
    pub fn open<E>(
        &self,
        graph: &ReducedGraph<T>,
        agent: usize,
        edge: &Edge<T>,
        estimator: &mut E,
    ) -> Self
    where
        E: BoundEstimator<T> + ?Sized,
    {
        let valve = edge.destination();
        debug_assert!(
            self.agents[agent].can_afford(edge.distance()),
            "called `SearchNode::open` with an unaffordable move"
        );
        debug_assert!(
            !self.opened.contains(valve.get()),
            "called `SearchNode::open` on an already opened valve"
        );

        let mut agents = self.agents.clone();
        agents[agent] = agents[agent].moved_to(valve, edge.distance());
        let time_left = agents[agent].time_left();

        let mut opened = self.opened.clone();
        opened.insert(valve.get());

        let value = self
            .value
            .saturating_add(clamped_mul(edge.flow_rate(), time_left));
        let upper_bound = value.saturating_add(estimator.estimate(graph, &agents, &opened));

        let trace = Some(Arc::new(TraceLink {
            event: OpenEvent {
                agent,
                time_left,
                valve,
            },
            parent: self.trace.clone(),
        }));

        Self {
            agents,
            opened,
            value,
            upper_bound,
            depth: self.depth + 1,
            trace,
        }
    }

    /// Derives the child in which `agent` stops for good.
    pub fn retire<E>(&self, graph: &ReducedGraph<T>, agent: usize, estimator: &mut E) -> Self
    where
        E: BoundEstimator<T> + ?Sized,
    {
        let mut agents = self.agents.clone();
        agents[agent] = agents[agent].retired();
        let upper_bound = self
            .value
            .saturating_add(estimator.estimate(graph, &agents, &self.opened));

        Self {
            agents,
            opened: self.opened.clone(),
            value: self.value,
            upper_bound,
            depth: self.depth + 1,
            trace: self.trace.clone(),
        }
    }

    #[inline]
    pub fn agents(&self) -> &[Agent<T>] {
        &self.agents
    }

    #[inline]
    pub fn opened(&self) -> &FixedBitSet {
        &self.opened
    }

    #[inline]
    pub fn is_opened(&self, valve: NodeIndex) -> bool {
        self.opened.contains(valve.get())
    }

    /// The number of opened valves.
    #[inline]
    pub fn num_opened(&self) -> usize {
        self.opened.count_ones(..)
    }

    /// The value released by the openings on the path to this node.
    #[inline]
    pub fn value(&self) -> T {
        self.value
    }

    /// `value` plus the estimate taken when the node was created.
    #[inline]
    pub fn upper_bound(&self) -> T {
        self.upper_bound
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Iterates over the moves `agent` can afford, nearest first.
    pub fn affordable_edges<'g>(
        &'g self,
        graph: &'g ReducedGraph<T>,
        agent: usize,
    ) -> impl Iterator<Item = &'g Edge<T>> + 'g {
        let walker = self.agents[agent];
        graph
            .edges(walker.position())
            .iter()
            .take_while(move |edge| walker.can_afford(edge.distance()))
            .filter(move |edge| !self.opened.contains(edge.destination().get()))
    }

    /// Returns `true` if `agent` has at least one affordable move.
    #[inline]
    pub fn can_move(&self, graph: &ReducedGraph<T>, agent: usize) -> bool {
        self.affordable_edges(graph, agent).next().is_some()
    }

    /// Returns `true` if no agent has an affordable move.
    pub fn is_terminal(&self, graph: &ReducedGraph<T>) -> bool {
        (0..self.agents.len()).all(|agent| !self.can_move(graph, agent))
    }

    /// Returns the openings on the path to this node, oldest first.
    pub fn trace_events(&self) -> Vec<OpenEvent<T>> {
        let mut events = Vec::with_capacity(self.depth);
        let mut link = self.trace.as_deref();
        while let Some(current) = link {
            events.push(current.event);
            link = current.parent.as_deref();
        }
        events.reverse();
        events
    }

    /// Rebuilds the schedule that leads to this node.
    pub fn to_schedule(&self, graph: &ReducedGraph<T>) -> Schedule<T> {
        let events = self
            .trace_events()
            .into_iter()
            .map(|event| {
                ScheduledOpen::new(
                    event.agent,
                    event.time_left,
                    event.valve,
                    graph.label(event.valve),
                )
            })
            .collect();
        Schedule::new(self.value, events)
    }
}

impl<T> std::fmt::Display for SearchNode<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SearchNode(depth: {}, value: {}, upper_bound: {}, opened: {})",
            self.depth,
            self.value,
            self.upper_bound,
            self.num_opened()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{bound::slot::SlotBound, testing};

    type IntegerType = i64;

    #[test]
    fn test_root_places_agents_at_start() {
        let graph = testing::scenario_graph();
        let config = SearchConfig::two_agents(6).unwrap();
        let mut estimator = SlotBound::new();
        let root = SearchNode::<IntegerType>::root(&graph, &config, &mut estimator);

        assert_eq!(root.agents().len(), 2);
        for agent in root.agents() {
            assert_eq!(agent.position(), graph.start());
            assert_eq!(agent.time_left(), 6);
        }
        assert_eq!(root.value(), 0);
        assert_eq!(root.depth(), 0);
        assert_eq!(root.num_opened(), 0);
        assert!(root.trace_events().is_empty());
        assert!(!root.is_terminal(&graph));
    }

    #[test]
    fn test_open_derives_child_without_touching_parent() {
        let graph = testing::scenario_graph();
        let config = SearchConfig::single_agent(6).unwrap();
        let mut estimator = SlotBound::new();
        let root = SearchNode::<IntegerType>::root(&graph, &config, &mut estimator);

        let edge = *root.affordable_edges(&graph, 0).next().unwrap();
        let child = root.open(&graph, 0, &edge, &mut estimator);

        assert_eq!(graph.label(edge.destination()), "A");
        assert_eq!(child.value(), 40);
        assert_eq!(child.agents()[0].time_left(), 4);
        assert!(child.is_opened(edge.destination()));
        assert!(!root.is_opened(edge.destination()));
        assert_eq!(child.depth(), 1);
        assert!(child.upper_bound() <= root.upper_bound());
    }

    #[test]
    fn test_trace_rebuilds_schedule_in_order() {
        let graph = testing::scenario_graph();
        let config = SearchConfig::single_agent(6).unwrap();
        let mut estimator = SlotBound::new();
        let root = SearchNode::<IntegerType>::root(&graph, &config, &mut estimator);

        let first = *root.affordable_edges(&graph, 0).next().unwrap();
        let child = root.open(&graph, 0, &first, &mut estimator);
        let second = *child.affordable_edges(&graph, 0).next().unwrap();
        let grandchild = child.open(&graph, 0, &second, &mut estimator);

        assert!(grandchild.is_terminal(&graph));
        let schedule = grandchild.to_schedule(&graph);
        assert_eq!(schedule.value(), 44);
        assert_eq!(schedule.opened_labels(), vec!["A", "B"]);
        assert_eq!(schedule.replay(&graph, 6, 1), Ok(44));

        // Sibling shares the prefix but not the tail.
        let third = *child.affordable_edges(&graph, 0).nth(1).unwrap();
        let sibling = child.open(&graph, 0, &third, &mut estimator);
        assert_eq!(sibling.to_schedule(&graph).opened_labels(), vec!["A", "C"]);
        assert_eq!(grandchild.trace_events().len(), 2);
    }

    #[test]
    fn test_retire_keeps_value_and_drops_agent_time() {
        let graph = testing::scenario_graph();
        let config = SearchConfig::two_agents(6).unwrap();
        let mut estimator = SlotBound::new();
        let root = SearchNode::<IntegerType>::root(&graph, &config, &mut estimator);

        let retired = root.retire(&graph, 1, &mut estimator);
        assert_eq!(retired.value(), 0);
        assert_eq!(retired.agents()[1].time_left(), 0);
        assert!(!retired.can_move(&graph, 1));
        assert!(retired.can_move(&graph, 0));
        assert_eq!(retired.upper_bound(), 44);
        assert!(retired.upper_bound() <= root.upper_bound());
    }
}
