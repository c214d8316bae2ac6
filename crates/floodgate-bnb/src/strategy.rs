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

//! Search strategy
//!
//! A `Strategy` bundles the three pluggable parts of a search: the bound
//! estimator, the frontier priority and the agent selector. The default is
//! `SlotBound` + `BestBoundFirst` + `MostTimeRemaining`.

use crate::{
    bound::{estimator::BoundEstimator, slot::SlotBound},
    policy::{
        priority::{BestBoundFirst, PriorityPolicy},
        selection::{AgentSelector, MostTimeRemaining},
    },
};
use floodgate_model::num::SolverNumeric;

#[derive(Debug, Clone)]
pub struct Strategy<E, P, A> {
    pub estimator: E,
    pub priority: P,
    pub selector: A,
}

/// The strategy used when nothing else is configured.
pub type DefaultStrategy<T> = Strategy<SlotBound<T>, BestBoundFirst, MostTimeRemaining>;

impl<E, P, A> Strategy<E, P, A> {
    #[inline]
    pub fn new(estimator: E, priority: P, selector: A) -> Self {
        Self {
            estimator,
            priority,
            selector,
        }
    }

    /// Replaces the bound estimator.
    #[inline]
    pub fn with_estimator<E2>(self, estimator: E2) -> Strategy<E2, P, A> {
        Strategy {
            estimator,
            priority: self.priority,
            selector: self.selector,
        }
    }

    /// Replaces the priority policy.
    #[inline]
    pub fn with_priority<P2>(self, priority: P2) -> Strategy<E, P2, A> {
        Strategy {
            estimator: self.estimator,
            priority,
            selector: self.selector,
        }
    }

    /// Replaces the agent selector.
    #[inline]
    pub fn with_selector<A2>(self, selector: A2) -> Strategy<E, P, A2> {
        Strategy {
            estimator: self.estimator,
            priority: self.priority,
            selector,
        }
    }

    /// A short human-readable description, e.g. `SlotBound/BestBoundFirst/MostTimeRemaining`.
    pub fn describe<T>(&self) -> String
    where
        T: SolverNumeric,
        E: BoundEstimator<T>,
        P: PriorityPolicy<T>,
        A: AgentSelector<T>,
    {
        format!(
            "{}/{}/{}",
            self.estimator.name(),
            self.priority.name(),
            self.selector.name()
        )
    }
}

impl<T> Default for Strategy<SlotBound<T>, BestBoundFirst, MostTimeRemaining>
where
    T: SolverNumeric,
{
    fn default() -> Self {
        Self::new(SlotBound::new(), BestBoundFirst, MostTimeRemaining)
    }
}
