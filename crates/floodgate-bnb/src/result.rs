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

use crate::stats::BnbSolverStatistics;
use floodgate_model::{num::SolverNumeric, schedule::Schedule};

/// The schedule a search ended with.
///
/// There is always a schedule: in the worst case the empty one, worth zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverResult<T> {
    /// No schedule is worth more than this one.
    Optimal(Schedule<T>),
    /// The best schedule found before the search was stopped.
    Feasible(Schedule<T>),
}

impl<T> SolverResult<T>
where
    T: SolverNumeric,
{
    #[inline]
    pub fn schedule(&self) -> &Schedule<T> {
        match self {
            SolverResult::Optimal(schedule) | SolverResult::Feasible(schedule) => schedule,
        }
    }

    #[inline]
    pub fn into_schedule(self) -> Schedule<T> {
        match self {
            SolverResult::Optimal(schedule) | SolverResult::Feasible(schedule) => schedule,
        }
    }

    #[inline]
    pub fn is_optimal(&self) -> bool {
        matches!(self, SolverResult::Optimal(_))
    }
}

impl<T> std::fmt::Display for SolverResult<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverResult::Optimal(schedule) => write!(f, "Optimal(value={})", schedule.value()),
            SolverResult::Feasible(schedule) => write!(f, "Feasible(value={})", schedule.value()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationReason {
    /// The frontier ran empty: the best schedule is optimal.
    OptimalityProven,
    /// A monitor stopped the search (node budget, time limit, interrupt, ...).
    /// The string describes why.
    Aborted(String),
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::OptimalityProven => write!(f, "Optimality Proven"),
            TerminationReason::Aborted(reason) => write!(f, "Aborted: {}", reason),
        }
    }
}

/// Result of the solver after termination.
#[derive(Debug, Clone)]
pub struct BnbSolverOutcome<T> {
    result: SolverResult<T>,
    termination_reason: TerminationReason,
    statistics: BnbSolverStatistics<T>,
}

impl<T> BnbSolverOutcome<T>
where
    T: SolverNumeric,
{
    #[inline]
    pub fn optimal(schedule: Schedule<T>, statistics: BnbSolverStatistics<T>) -> Self {
        Self {
            result: SolverResult::Optimal(schedule),
            termination_reason: TerminationReason::OptimalityProven,
            statistics,
        }
    }

    #[inline]
    pub fn aborted<R>(schedule: Schedule<T>, reason: R, statistics: BnbSolverStatistics<T>) -> Self
    where
        R: Into<String>,
    {
        Self {
            result: SolverResult::Feasible(schedule),
            termination_reason: TerminationReason::Aborted(reason.into()),
            statistics,
        }
    }

    /// Returns the solver result.
    #[inline]
    pub fn result(&self) -> &SolverResult<T> {
        &self.result
    }

    /// Returns the best schedule found.
    #[inline]
    pub fn schedule(&self) -> &Schedule<T> {
        self.result.schedule()
    }

    /// Returns the value of the best schedule found.
    #[inline]
    pub fn value(&self) -> T {
        self.result.schedule().value()
    }

    #[inline]
    pub fn is_optimal(&self) -> bool {
        self.result.is_optimal()
    }

    /// Returns the termination reason.
    #[inline]
    pub fn termination_reason(&self) -> &TerminationReason {
        &self.termination_reason
    }

    /// Returns the solver statistics.
    #[inline]
    pub fn statistics(&self) -> &BnbSolverStatistics<T> {
        &self.statistics
    }

    /// Splits the outcome into its parts.
    #[inline]
    pub fn into_parts(self) -> (SolverResult<T>, TerminationReason, BnbSolverStatistics<T>) {
        (self.result, self.termination_reason, self.statistics)
    }
}

impl<T> std::fmt::Display for BnbSolverOutcome<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BnbSolverOutcome(result: {}, termination_reason: {})",
            self.result, self.termination_reason
        )
    }
}
