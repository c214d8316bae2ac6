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

//! Search configuration
//!
//! `SearchConfig` fixes the parameters of one search: the time budget every
//! agent starts with, how many agents walk (one or two), and two optional
//! behaviors:
//!
//! - `retirement`: the acting agent may also stop for good, handing the
//!   remaining valves to the other agent. On by default for two agents.
//!   Without it the two-agent search only covers the interleavings the
//!   agent selector produces, so an exhausted frontier proves nothing.
//! - `warm_start`: a greedy schedule seeds the incumbent before the search.
//!   Off by default.

use floodgate_model::num::SolverNumeric;

/// The most agents a search supports.
pub const MAX_AGENTS: usize = 2;

/// The error type for invalid search parameters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unsupported number of agents {0}: expected 1 or 2")]
    UnsupportedAgentCount(usize),
    #[error("time budget must not be negative, got {0}")]
    NegativeTimeBudget(i64),
}

/// Parameters of a single search run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SearchConfig<T> {
    time_budget: T,
    num_agents: usize,
    retirement: bool,
    warm_start: bool,
}

impl<T> SearchConfig<T>
where
    T: SolverNumeric,
{
    /// Creates a configuration for `num_agents` agents with `time_budget`
    /// minutes each.
    pub fn new(time_budget: T, num_agents: usize) -> Result<Self, ConfigError> {
        if num_agents == 0 || num_agents > MAX_AGENTS {
            return Err(ConfigError::UnsupportedAgentCount(num_agents));
        }
        if time_budget < T::zero() {
            return Err(ConfigError::NegativeTimeBudget(time_budget.into()));
        }

        Ok(Self {
            time_budget,
            num_agents,
            retirement: num_agents > 1,
            warm_start: false,
        })
    }

    #[inline]
    pub fn single_agent(time_budget: T) -> Result<Self, ConfigError> {
        Self::new(time_budget, 1)
    }

    #[inline]
    pub fn two_agents(time_budget: T) -> Result<Self, ConfigError> {
        Self::new(time_budget, 2)
    }

    /// Enables or disables retirement moves.
    #[inline]
    pub fn with_retirement(mut self, yes: bool) -> Self {
        self.retirement = yes;
        self
    }

    /// Enables or disables the greedy warm start.
    #[inline]
    pub fn with_warm_start(mut self, yes: bool) -> Self {
        self.warm_start = yes;
        self
    }

    #[inline]
    pub fn time_budget(&self) -> T {
        self.time_budget
    }

    #[inline]
    pub fn num_agents(&self) -> usize {
        self.num_agents
    }

    #[inline]
    pub fn retirement(&self) -> bool {
        self.retirement
    }

    #[inline]
    pub fn warm_start(&self) -> bool {
        self.warm_start
    }

    /// Returns `true` if every schedule is reachable from the root, so an
    /// exhausted frontier proves optimality.
    #[inline]
    pub fn is_exhaustive(&self) -> bool {
        self.num_agents == 1 || self.retirement
    }
}

impl<T> std::fmt::Display for SearchConfig<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SearchConfig(time_budget: {}, num_agents: {}, retirement: {}, warm_start: {})",
            self.time_budget, self.num_agents, self.retirement, self.warm_start
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SearchConfig::single_agent(30i64).unwrap();
        assert_eq!(config.time_budget(), 30);
        assert_eq!(config.num_agents(), 1);
        assert!(!config.retirement());
        assert!(!config.warm_start());
        assert!(config.is_exhaustive());

        let config = SearchConfig::two_agents(26i64)
            .unwrap()
            .with_warm_start(true);
        assert_eq!(config.num_agents(), 2);
        assert!(config.retirement());
        assert!(config.warm_start());
        assert!(config.is_exhaustive());
    }

    #[test]
    fn test_two_agents_without_retirement_are_not_exhaustive() {
        let config = SearchConfig::two_agents(26i64)
            .unwrap()
            .with_retirement(false);
        assert!(!config.retirement());
        assert!(!config.is_exhaustive());

        // Retirement has no effect on a single agent.
        let single = SearchConfig::single_agent(30i64)
            .unwrap()
            .with_retirement(false);
        assert!(single.is_exhaustive());
    }

    #[test]
    fn test_rejects_unsupported_agent_counts() {
        assert_eq!(
            SearchConfig::new(10i64, 0),
            Err(ConfigError::UnsupportedAgentCount(0))
        );
        assert_eq!(
            SearchConfig::new(10i64, 3),
            Err(ConfigError::UnsupportedAgentCount(3))
        );
    }

    #[test]
    fn test_rejects_negative_budget() {
        let err = SearchConfig::single_agent(-1i32).unwrap_err();
        assert_eq!(err, ConfigError::NegativeTimeBudget(-1));
        assert_eq!(err.to_string(), "time budget must not be negative, got -1");
    }

    #[test]
    fn test_zero_budget_is_valid() {
        assert!(SearchConfig::single_agent(0i64).is_ok());
    }
}
