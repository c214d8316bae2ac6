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

//! Acting-agent selection
//!
//! In every state exactly one agent moves. An `AgentSelector` ranks the
//! agents; the solver lets the first one in that ranking with an affordable
//! move act. A state where nobody can move is terminal.
//!
//! Provided selectors:
//! - `MostTimeRemaining` (default): the agent with the most time left acts,
//!   ties go to the lower index. Keeps the agents' clocks close together.
//! - `InOrder`: agents in index order; the first agent walks until it is
//!   done before the second one starts.

use crate::agent::Agent;
use floodgate_model::num::SolverNumeric;
use smallvec::SmallVec;

/// A ranking of agent indices, most preferred first.
pub type Preference = SmallVec<[usize; 2]>;

/// A strategy for choosing which agent acts next.
pub trait AgentSelector<T>
where
    T: SolverNumeric,
{
    /// Returns the name of the selector.
    fn name(&self) -> &str;

    /// Ranks `agents`, most preferred first. Must be a permutation of
    /// `0..agents.len()`.
    fn preference(&self, agents: &[Agent<T>]) -> Preference;
}

impl<T> std::fmt::Debug for dyn AgentSelector<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AgentSelector({})", self.name())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MostTimeRemaining;

impl<T> AgentSelector<T> for MostTimeRemaining
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "MostTimeRemaining"
    }

    #[inline]
    fn preference(&self, agents: &[Agent<T>]) -> Preference {
        let mut order: Preference = (0..agents.len()).collect();
        // Stable: equal times keep index order.
        order.sort_by(|&a, &b| agents[b].time_left().cmp(&agents[a].time_left()));
        order
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InOrder;

impl<T> AgentSelector<T> for InOrder
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "InOrder"
    }

    #[inline]
    fn preference(&self, agents: &[Agent<T>]) -> Preference {
        (0..agents.len()).collect()
    }
}
