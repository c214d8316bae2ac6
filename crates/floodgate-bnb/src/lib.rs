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

//! Floodgate-BnB: best-first branch-and-bound for valve scheduling
//!
//! Searches for the schedule of valve openings that releases the most value
//! within a shared time budget, for one or two cooperating agents. The engine
//! separates bounding, ordering, agent selection, monitoring and incumbent
//! handling so strategies can be swapped without touching the search loop.
//!
//! Core flow
//! - Build a `floodgate_model::reduce::ReducedGraph<T>` from a model.
//! - Describe the run with a `config::SearchConfig<T>`.
//! - Choose a `strategy::Strategy` (bound estimator, priority policy, agent selector).
//! - Optionally add monitors and a shared incumbent.
//! - Run `bnb::BnbSolver` directly, or integrate via `portfolio`.
//!
//! Assumptions and guarantees
//! - Bound estimators must be admissible (never underestimate the value still
//!   obtainable); pruning relies on this for optimality.
//! - Search nodes are immutable; children share their parent's history.
//! - Deterministic for a fixed strategy: frontier ties resolve first-in, first-out.
//!
//! Module map
//! - `agent`: per-agent cursor (position and remaining time).
//! - `bnb`: the solver engine and session orchestration.
//! - `bound`: admissible upper-bound estimators.
//! - `config`: validated search parameters.
//! - `frontier`: the min-priority open list.
//! - `greedy`: greedy warm-start schedule.
//! - `incumbent`: local and shared best-solution stores.
//! - `monitor`: tree-search monitors (log, limits, interrupt, composite).
//! - `node`: immutable search nodes and their persistent trace.
//! - `policy`: frontier priorities and acting-agent selection.
//! - `portfolio`: adapter for running the engine inside a portfolio.
//! - `result`: solver outcomes with termination reasons.
//! - `stats`: lightweight counters/timing.
//! - `strategy`: bundles the pluggable components of a run.

pub mod agent;
pub mod bnb;
pub mod bound;
pub mod config;
pub mod frontier;
pub mod greedy;
pub mod incumbent;
pub mod monitor;
pub mod node;
pub mod policy;
pub mod portfolio;
pub mod result;
pub mod stats;
pub mod strategy;

#[cfg(test)]
mod testing;
