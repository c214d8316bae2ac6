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

use floodgate_model::{index::NodeIndex, num::SolverNumeric};

/// One walker: where it stands and how many minutes it has left.
///
/// Agents only ever lose time; an agent with zero time left is done.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Agent<T> {
    time_left: T,
    position: NodeIndex,
}

impl<T> Agent<T>
where
    T: SolverNumeric,
{
    #[inline(always)]
    pub fn new(time_left: T, position: NodeIndex) -> Self {
        Self {
            time_left,
            position,
        }
    }

    #[inline(always)]
    pub fn time_left(&self) -> T {
        self.time_left
    }

    #[inline(always)]
    pub fn position(&self) -> NodeIndex {
        self.position
    }

    /// Returns `true` if walking `distance` steps and opening the valve there
    /// still leaves at least one minute of flow.
    #[inline(always)]
    pub fn can_afford(&self, distance: T) -> bool {
        self.time_left > distance.saturating_add(T::one())
    }

    /// Remaining time after walking `distance` steps and opening a valve.
    #[inline(always)]
    pub fn time_after(&self, distance: T) -> T {
        self.time_left - distance - T::one()
    }

    /// Moves to `destination` and opens its valve.
    #[inline(always)]
    pub fn moved_to(&self, destination: NodeIndex, distance: T) -> Self {
        Self {
            time_left: self.time_after(distance),
            position: destination,
        }
    }

    /// The same agent with no time left.
    #[inline(always)]
    pub fn retired(&self) -> Self {
        Self {
            time_left: T::zero(),
            position: self.position,
        }
    }
}

impl<T> std::fmt::Display for Agent<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Agent(at: {}, time_left: {})", self.position, self.time_left)
    }
}
