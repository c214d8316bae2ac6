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

//! # Schedules
//!
//! A `Schedule` is the answer of a search: the ordered valve openings of
//! every agent and the total value they release. Each event records the
//! remaining time of the agent right after the valve was opened, which is
//! also the number of minutes the valve contributes its flow rate.
//!
//! `Schedule::replay` re-walks the events against a `ReducedGraph` and checks
//! that they form a legal plan worth exactly the reported value.
//! `Schedule::timeline` renders the plan as one line per agent under a
//! minute ruler.

use crate::{index::NodeIndex, num::SolverNumeric, reduce::ReducedGraph};

/// A single valve opening.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ScheduledOpen<T> {
    agent: usize,
    time_left: T,
    node: NodeIndex,
    label: String,
}

impl<T> ScheduledOpen<T>
where
    T: SolverNumeric,
{
    #[inline]
    pub fn new<S>(agent: usize, time_left: T, node: NodeIndex, label: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            agent,
            time_left,
            node,
            label: label.into(),
        }
    }

    /// The agent that opened the valve.
    #[inline]
    pub fn agent(&self) -> usize {
        self.agent
    }

    /// The agent's remaining time right after opening.
    #[inline]
    pub fn time_left(&self) -> T {
        self.time_left
    }

    /// The opened valve.
    #[inline]
    pub fn node(&self) -> NodeIndex {
        self.node
    }

    /// The label of the opened valve.
    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl<T> std::fmt::Display for ScheduledOpen<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "agent {} opens {} with {} left",
            self.agent, self.label, self.time_left
        )
    }
}

/// The error type for schedule replay.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    #[error("event {event}: agent {agent} is out of range for {num_agents} agents")]
    AgentOutOfRange {
        event: usize,
        agent: usize,
        num_agents: usize,
    },
    #[error("event {event}: {node} is not a valve")]
    NotAValve { event: usize, node: NodeIndex },
    #[error("event {event}: valve '{label}' is opened twice")]
    AlreadyOpened { event: usize, label: String },
    #[error("event {event}: valve '{label}' is unreachable for agent {agent}")]
    Unreachable {
        event: usize,
        agent: usize,
        label: String,
    },
    #[error("event {event}: expected {expected} time left but schedule says {actual}")]
    TimeMismatch {
        event: usize,
        expected: i64,
        actual: i64,
    },
    #[error("schedule reports value {reported} but replays to {replayed}")]
    ValueMismatch { reported: i64, replayed: i64 },
}

/// The winning plan of a search.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Schedule<T> {
    value: T,
    events: Vec<ScheduledOpen<T>>,
}

impl<T> Schedule<T>
where
    T: SolverNumeric,
{
    #[inline]
    pub fn new(value: T, events: Vec<ScheduledOpen<T>>) -> Self {
        Self { value, events }
    }

    /// The plan that opens nothing and is worth zero.
    #[inline]
    pub fn empty() -> Self {
        Self {
            value: T::zero(),
            events: Vec::new(),
        }
    }

    #[inline]
    pub fn value(&self) -> T {
        self.value
    }

    #[inline]
    pub fn events(&self) -> &[ScheduledOpen<T>] {
        &self.events
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Iterates over the openings of a single agent, in order.
    pub fn events_for_agent(&self, agent: usize) -> impl Iterator<Item = &ScheduledOpen<T>> {
        self.events.iter().filter(move |event| event.agent == agent)
    }

    /// Returns a view that renders one timeline per agent, see `Timeline`.
    #[inline]
    pub fn timeline(&self, time_budget: T, num_agents: usize) -> Timeline<'_, T> {
        Timeline {
            schedule: self,
            time_budget,
            num_agents,
        }
    }

    /// Returns the labels of all opened valves, in order.
    pub fn opened_labels(&self) -> Vec<&str> {
        self.events.iter().map(|event| event.label()).collect()
    }

    /// Replays the schedule on `graph` with `num_agents` agents that each
    /// start at the start node with `time_budget` minutes.
    ///
    /// Returns the replayed value, which equals `self.value()` on success.
    pub fn replay(
        &self,
        graph: &ReducedGraph<T>,
        time_budget: T,
        num_agents: usize,
    ) -> Result<T, ScheduleError> {
        let mut positions = vec![graph.start(); num_agents];
        let mut times = vec![time_budget; num_agents];
        let mut opened = vec![false; graph.num_valves()];
        let mut value = T::zero();

        for (index, event) in self.events.iter().enumerate() {
            let agent = event.agent;
            if agent >= num_agents {
                return Err(ScheduleError::AgentOutOfRange {
                    event: index,
                    agent,
                    num_agents,
                });
            }
            if !graph.is_valve(event.node) {
                return Err(ScheduleError::NotAValve {
                    event: index,
                    node: event.node,
                });
            }
            if opened[event.node.get()] {
                return Err(ScheduleError::AlreadyOpened {
                    event: index,
                    label: graph.label(event.node).to_string(),
                });
            }

            let distance = graph.distance(positions[agent], event.node).ok_or_else(|| {
                ScheduleError::Unreachable {
                    event: index,
                    agent,
                    label: graph.label(event.node).to_string(),
                }
            })?;

            let expected = times[agent] - distance - T::one();
            if expected <= T::zero() || expected != event.time_left {
                return Err(ScheduleError::TimeMismatch {
                    event: index,
                    expected: expected.into(),
                    actual: event.time_left.into(),
                });
            }

            opened[event.node.get()] = true;
            positions[agent] = event.node;
            times[agent] = expected;
            value = value.saturating_add(crate::num::clamped_mul(
                graph.flow_rate(event.node),
                expected,
            ));
        }

        if value != self.value {
            return Err(ScheduleError::ValueMismatch {
                reported: self.value.into(),
                replayed: value.into(),
            });
        }

        Ok(value)
    }
}

impl<T> Default for Schedule<T>
where
    T: SolverNumeric,
{
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> std::fmt::Display for Schedule<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Schedule (value {}):", self.value)?;
        for event in &self.events {
            writeln!(f, "  {}", event)?;
        }
        Ok(())
    }
}

/// A per-agent rendering of a `Schedule`.
///
/// Every minute takes two columns. The ruler numbers the minutes modulo ten
/// and marks every tenth minute with `|`. Below it, each agent gets a line on
/// which a valve label starts in the column of the minute the valve was
/// opened; a label that would overlap its predecessor is moved right.
#[derive(Clone, Copy, Debug)]
pub struct Timeline<'a, T> {
    schedule: &'a Schedule<T>,
    time_budget: T,
    num_agents: usize,
}

impl<'a, T> std::fmt::Display for Timeline<'a, T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let budget: i64 = self.time_budget.into();

        let mut ruler = String::from("|");
        for minute in 1..=budget {
            match minute % 10 {
                0 => ruler.push_str(" |"),
                digit => ruler.push_str(&format!(" {}", digit)),
            }
        }
        writeln!(f, "{}", ruler)?;

        for agent in 0..self.num_agents {
            let mut line = String::new();
            for event in self.schedule.events_for_agent(agent) {
                let time_left: i64 = event.time_left().into();
                let minute = budget - time_left;
                let column = usize::try_from(2 * minute - 1).unwrap_or(0);
                let padding = column.saturating_sub(line.chars().count());
                line.push_str(&" ".repeat(padding));
                line.push_str(event.label());
            }
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
