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

//! Shared fixtures for the unit tests of this crate.

use crate::{bound::estimator::BoundEstimator, node::SearchNode};
use floodgate_model::{
    index::NodeIndex, loading::ProblemLoader, model::ModelBuilder, reduce::ReducedGraph,
};
use rand::{Rng, SeedableRng, seq::SliceRandom};
use rand_chacha::ChaCha8Rng;

pub const CLASSIC: &str = "\
Valve AA has flow rate=0; tunnels lead to valves DD, II, BB
Valve BB has flow rate=13; tunnels lead to valves CC, AA
Valve CC has flow rate=2; tunnels lead to valves DD, BB
Valve DD has flow rate=20; tunnels lead to valves CC, AA, EE
Valve EE has flow rate=3; tunnels lead to valves FF, DD
Valve FF has flow rate=0; tunnels lead to valves EE, GG
Valve GG has flow rate=0; tunnels lead to valves FF, HH
Valve HH has flow rate=22; tunnel leads to valve GG
Valve II has flow rate=0; tunnels lead to valves AA, JJ
Valve JJ has flow rate=21; tunnel leads to valve II
";

/// Start `S` plus valves A(10), B(2), C(1), all pairwise one step apart.
pub fn scenario_graph() -> ReducedGraph<i64> {
    let mut builder = ModelBuilder::new("S");
    builder
        .add_room("A", 10, ["S", "B", "C"])
        .add_room("B", 2, ["S", "A", "C"])
        .add_room("C", 1, ["S", "A", "B"])
        .add_room("S", 0, ["A", "B", "C"]);
    let model = builder.build().expect("scenario model is valid");
    ReducedGraph::from_model(&model)
}

/// `S - A - R1 - ... - R8 - B` with A(1) one step and B(2) ten steps from `S`.
pub fn line_graph() -> ReducedGraph<i64> {
    let mut chain: Vec<String> = vec!["S".to_string(), "A".to_string()];
    chain.extend((1..=8).map(|i| format!("R{}", i)));
    chain.push("B".to_string());

    let mut builder = ModelBuilder::new("S");
    for (position, label) in chain.iter().enumerate() {
        let flow_rate = match label.as_str() {
            "A" => 1,
            "B" => 2,
            _ => 0,
        };
        let mut exits = Vec::new();
        if position > 0 {
            exits.push(chain[position - 1].clone());
        }
        if position + 1 < chain.len() {
            exits.push(chain[position + 1].clone());
        }
        builder.add_room(label.clone(), flow_rate, exits);
    }
    let model = builder.build().expect("line model is valid");
    ReducedGraph::from_model(&model)
}

/// The well-known ten-room example cave.
pub fn classic_graph() -> ReducedGraph<i64> {
    let model = ProblemLoader::new()
        .from_str::<i64>(CLASSIC)
        .expect("classic input is valid");
    ReducedGraph::from_model(&model)
}

/// A connected random cave with `num_rooms` rooms (start `R0`, rate zero)
/// and between one and `max_valves` valves.
pub fn random_graph(seed: u64, num_rooms: usize, max_valves: usize) -> ReducedGraph<i64> {
    assert!(num_rooms >= 2, "a random cave needs at least two rooms");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    fn connect(exits: &mut [Vec<usize>], a: usize, b: usize) {
        if a != b && !exits[a].contains(&b) {
            exits[a].push(b);
            exits[b].push(a);
        }
    }

    let mut exits: Vec<Vec<usize>> = vec![Vec::new(); num_rooms];
    for room in 1..num_rooms {
        let other = rng.gen_range(0..room);
        connect(&mut exits, room, other);
    }
    for _ in 0..num_rooms / 2 {
        let a = rng.gen_range(0..num_rooms);
        let b = rng.gen_range(0..num_rooms);
        connect(&mut exits, a, b);
    }

    let mut rates = vec![0i64; num_rooms];
    let mut candidates: Vec<usize> = (1..num_rooms).collect();
    candidates.shuffle(&mut rng);
    let num_valves = rng.gen_range(1..=max_valves.clamp(1, num_rooms - 1));
    for &room in candidates.iter().take(num_valves) {
        rates[room] = rng.gen_range(1..=25);
    }

    let mut builder = ModelBuilder::with_capacity("R0", num_rooms);
    for room in 0..num_rooms {
        builder.add_room(
            format!("R{}", room),
            rates[room],
            exits[room].iter().map(|exit| format!("R{}", exit)),
        );
    }
    let model = builder.build().expect("random model is valid");
    ReducedGraph::from_model(&model)
}

/// Exhaustive optimum for `num_agents` agents, each with `time_budget`.
///
/// Enumerates every single-agent opening order, keeps the best value per
/// opened set and combines disjoint sets for two agents.
pub fn brute_force(graph: &ReducedGraph<i64>, time_budget: i64, num_agents: usize) -> i64 {
    let num_valves = graph.num_valves();
    assert!(num_valves <= 12, "brute force is exponential in the valve count");

    let mut best = vec![i64::MIN; 1 << num_valves];
    explore(graph, graph.start(), time_budget, 0, 0, &mut best);

    match num_agents {
        1 => best.iter().copied().max().unwrap_or(0),
        2 => {
            let mut total = 0;
            for (first, &a) in best.iter().enumerate() {
                if a == i64::MIN {
                    continue;
                }
                for (second, &b) in best.iter().enumerate() {
                    if b != i64::MIN && first & second == 0 {
                        total = total.max(a + b);
                    }
                }
            }
            total
        }
        _ => panic!("unsupported agent count {}", num_agents),
    }
}

fn explore(
    graph: &ReducedGraph<i64>,
    position: NodeIndex,
    time_left: i64,
    mask: usize,
    value: i64,
    best: &mut [i64],
) {
    best[mask] = best[mask].max(value);
    for valve in NodeIndex::range(graph.num_valves()) {
        if mask & (1 << valve.get()) != 0 {
            continue;
        }
        let Some(distance) = graph.distance(position, valve) else {
            continue;
        };
        if time_left <= distance + 1 {
            continue;
        }
        let remaining = time_left - distance - 1;
        explore(
            graph,
            valve,
            remaining,
            mask | (1 << valve.get()),
            value + graph.flow_rate(valve) * remaining,
            best,
        );
    }
}

/// Walks every child of `node` (every agent, every affordable valve and
/// every retirement) and asserts that no child bounds above its parent.
pub fn assert_monotone<E>(graph: &ReducedGraph<i64>, node: &SearchNode<i64>, estimator: &mut E)
where
    E: BoundEstimator<i64> + ?Sized,
{
    let num_agents = node.agents().len();
    for agent in 0..num_agents {
        if !node.can_move(graph, agent) {
            continue;
        }
        let children: Vec<SearchNode<i64>> = node
            .affordable_edges(graph, agent)
            .map(|edge| node.open(graph, agent, edge, &mut *estimator))
            .collect();
        for child in &children {
            assert!(
                child.upper_bound() <= node.upper_bound(),
                "{} bounds {} above parent {} ({})",
                estimator.name(),
                child.upper_bound(),
                node.upper_bound(),
                child
            );
            assert_monotone(graph, child, estimator);
        }

        let other_can_move =
            (0..num_agents).any(|other| other != agent && node.can_move(graph, other));
        if other_can_move {
            let retired = node.retire(graph, agent, &mut *estimator);
            assert!(retired.upper_bound() <= node.upper_bound());
            assert_monotone(graph, &retired, estimator);
        }
    }
}
