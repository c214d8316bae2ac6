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

//! # Reachability Reduction
//!
//! Collapses a `Model` into a `ReducedGraph` that only keeps the rooms worth
//! walking to: the valves with a positive flow rate, plus the start room.
//! Every node gets a list of edges to all reachable valves together with the
//! shortest hop count, so the search never walks through zero-rate rooms.
//!
//! Valves keep their model order and are numbered `0..num_valves`. If the
//! start room has a positive flow rate it is simply its own valve node,
//! otherwise it becomes the extra node `num_valves`.

use crate::{
    index::{NodeIndex, RoomIndex},
    model::Model,
    num::SolverNumeric,
};
use std::collections::VecDeque;

/// A directed, weighted edge from a node to a reachable valve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Edge<T> {
    destination: NodeIndex,
    distance: T,
    flow_rate: T,
}

impl<T> Edge<T>
where
    T: SolverNumeric,
{
    #[inline]
    pub fn new(destination: NodeIndex, distance: T, flow_rate: T) -> Self {
        Self {
            destination,
            distance,
            flow_rate,
        }
    }

    /// The valve this edge leads to.
    #[inline]
    pub fn destination(&self) -> NodeIndex {
        self.destination
    }

    /// The shortest number of steps to reach the destination.
    #[inline]
    pub fn distance(&self) -> T {
        self.distance
    }

    /// The flow rate of the destination valve.
    #[inline]
    pub fn flow_rate(&self) -> T {
        self.flow_rate
    }
}

/// The valve-only view of a `Model` consumed by the search.
///
/// Edges of every node are sorted by distance ascending, then by flow rate
/// descending, then by destination, so iteration is deterministic and a scan
/// for affordable valves may stop at the first edge that is too far away.
#[derive(Clone, Debug)]
pub struct ReducedGraph<T> {
    num_valves: usize,
    start: NodeIndex,
    flow_rates: Vec<T>,
    labels: Vec<String>,
    rooms: Vec<RoomIndex>,
    edges: Vec<Vec<Edge<T>>>,
    distances: Vec<Option<T>>,
}

impl<T> ReducedGraph<T>
where
    T: SolverNumeric,
{
    /// Builds the reduced graph of `model`.
    ///
    /// Reduction cannot fail: rooms that cannot be reached from a node are
    /// simply absent from its edge list, as are hop counts that do not fit
    /// into `T`.
    pub fn from_model(model: &Model<T>) -> Self {
        let num_rooms = model.num_rooms();

        let mut room_to_node: Vec<Option<NodeIndex>> = vec![None; num_rooms];
        let mut rooms = Vec::new();
        for (room_index, room) in model.rooms().iter().enumerate() {
            if room.has_valve() {
                room_to_node[room_index] = Some(NodeIndex::new(rooms.len()));
                rooms.push(RoomIndex::new(room_index));
            }
        }
        let num_valves = rooms.len();

        let start_room = model.start();
        let start = match room_to_node[start_room.get()] {
            Some(node) => node,
            None => {
                rooms.push(start_room);
                NodeIndex::new(num_valves)
            }
        };

        let num_nodes = rooms.len();
        let flow_rates: Vec<T> = rooms
            .iter()
            .map(|&room| model.room(room).flow_rate())
            .collect();
        let labels: Vec<String> = rooms
            .iter()
            .map(|&room| model.room(room).label().to_string())
            .collect();

        let mut edges = Vec::with_capacity(num_nodes);
        let mut distances = vec![None; num_nodes * num_valves];
        let mut visited = vec![false; num_rooms];
        let mut queue = VecDeque::with_capacity(num_rooms);

        for (node, &source) in rooms.iter().enumerate() {
            visited.fill(false);
            queue.clear();

            let mut node_edges = Vec::new();
            visited[source.get()] = true;
            queue.push_back((source, 0usize));

            while let Some((room, hops)) = queue.pop_front() {
                for &exit in model.room(room).exits() {
                    if visited[exit.get()] {
                        continue;
                    }
                    visited[exit.get()] = true;
                    queue.push_back((exit, hops + 1));

                    if let Some(destination) = room_to_node[exit.get()]
                        && let Some(distance) = T::from_usize(hops + 1)
                    {
                        node_edges.push(Edge::new(
                            destination,
                            distance,
                            flow_rates[destination.get()],
                        ));
                        distances[node * num_valves + destination.get()] = Some(distance);
                    }
                }
            }

            node_edges.sort_unstable_by(|a, b| {
                a.distance
                    .cmp(&b.distance)
                    .then_with(|| b.flow_rate.cmp(&a.flow_rate))
                    .then_with(|| a.destination.cmp(&b.destination))
            });
            edges.push(node_edges);
        }

        Self {
            num_valves,
            start,
            flow_rates,
            labels,
            rooms,
            edges,
            distances,
        }
    }

    /// Returns the number of valves with a positive flow rate.
    #[inline]
    pub fn num_valves(&self) -> usize {
        self.num_valves
    }

    /// Returns the number of nodes (valves plus a zero-rate start, if any).
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.rooms.len()
    }

    /// Returns the node every agent starts from.
    #[inline]
    pub fn start(&self) -> NodeIndex {
        self.start
    }

    /// Returns `true` if `node` is a valve node.
    #[inline]
    pub fn is_valve(&self, node: NodeIndex) -> bool {
        node.get() < self.num_valves
    }

    /// Returns the edges leaving `node`, in scan order.
    ///
    /// # Panics
    ///
    /// Panics if `node` is out of bounds.
    #[inline]
    pub fn edges(&self, node: NodeIndex) -> &[Edge<T>] {
        let index = node.get();
        assert!(
            index < self.num_nodes(),
            "called `ReducedGraph::edges` with node index out of bounds: the len is {} but the index is {}",
            self.num_nodes(),
            index
        );

        &self.edges[index]
    }

    /// Returns the shortest distance from `from` to the valve `to`, or
    /// `None` if `to` is unreachable, not a valve, or equal to `from`.
    #[inline]
    pub fn distance(&self, from: NodeIndex, to: NodeIndex) -> Option<T> {
        if from.get() >= self.num_nodes() || !self.is_valve(to) {
            return None;
        }
        self.distances[from.get() * self.num_valves + to.get()]
    }

    /// Returns the flow rate of `node`.
    ///
    /// # Panics
    ///
    /// Panics if `node` is out of bounds.
    #[inline]
    pub fn flow_rate(&self, node: NodeIndex) -> T {
        self.flow_rates[node.get()]
    }

    /// Returns the label of the room behind `node`.
    ///
    /// # Panics
    ///
    /// Panics if `node` is out of bounds.
    #[inline]
    pub fn label(&self, node: NodeIndex) -> &str {
        &self.labels[node.get()]
    }

    /// Returns the model room behind `node`.
    ///
    /// # Panics
    ///
    /// Panics if `node` is out of bounds.
    #[inline]
    pub fn room(&self, node: NodeIndex) -> RoomIndex {
        self.rooms[node.get()]
    }

    /// Returns the node of the room labelled `label`, if it survived reduction.
    pub fn node_by_label(&self, label: &str) -> Option<NodeIndex> {
        self.labels
            .iter()
            .position(|candidate| candidate == label)
            .map(NodeIndex::new)
    }
}
