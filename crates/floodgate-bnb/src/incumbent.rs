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

//! Incumbent management for branch-and-bound
//!
//! The incumbent is the most valuable schedule known so far. Its value is the
//! threshold every node must beat to stay in the search.
//!
//! Components
//! - `SharedIncumbent<T>`: a thread-safe holder shared by portfolio members.
//!   The best value lives in an `AtomicI64` for lock-free reads, the schedule
//!   itself behind a `Mutex` as the source of truth. A fresh holder reports
//!   value zero (the empty schedule) and holds no schedule.
//! - `IncumbentStore<T>`: the view the solver uses.
//!   - `NoSharedIncumbent<T>`: local only. `initial_best = 0`,
//!     `tighten(x) = x`, nothing is published.
//!   - `SharedIncumbentAdapter<'a, T>`: wraps a `SharedIncumbent<T>`;
//!     `tighten(x)` returns `max(shared, x)` and found schedules are offered
//!     for installation.
//!
//! Notes
//! - Atomic accesses use `Ordering::Relaxed`: a stale read only costs extra
//!   exploration, and installation re-checks under the lock.
//! - A poisoned lock is recovered; the stored schedule is replaced whole,
//!   so it is never observed half-written.

use floodgate_model::{num::SolverNumeric, schedule::Schedule};
use std::{
    marker::PhantomData,
    sync::{
        Mutex, PoisonError,
        atomic::{AtomicI64, Ordering},
    },
};

/// A concurrent holder for the best schedule found by any search.
#[derive(Debug)]
pub struct SharedIncumbent<T> {
    best_value: AtomicI64,
    schedule: Mutex<Option<Schedule<T>>>,
}

impl<T> Default for SharedIncumbent<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Display for SharedIncumbent<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Incumbent(best_value: {})", self.best_value())
    }
}

impl<T> SharedIncumbent<T> {
    /// Creates a holder with no schedule and best value zero.
    #[inline]
    pub fn new() -> Self {
        Self {
            best_value: AtomicI64::new(0),
            schedule: Mutex::new(None),
        }
    }

    /// Returns the value of the best installed schedule (zero if none).
    #[inline]
    pub fn best_value(&self) -> i64 {
        self.best_value.load(Ordering::Relaxed)
    }

    /// Returns a copy of the best installed schedule, if any.
    #[inline]
    pub fn snapshot(&self) -> Option<Schedule<T>>
    where
        T: Clone,
    {
        self.schedule
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Installs `candidate` if it is strictly more valuable than the current
    /// incumbent. Returns `true` if it was installed.
    pub fn try_install(&self, candidate: &Schedule<T>) -> bool
    where
        T: SolverNumeric,
    {
        let candidate_value: i64 = candidate.value().into();
        if candidate_value <= self.best_value() {
            return false;
        }

        let mut guard = self.schedule.lock().unwrap_or_else(PoisonError::into_inner);
        // Compare against the locked schedule, not the atomic hint read above.
        if let Some(current) = guard.as_ref() {
            let current_value: i64 = current.value().into();
            if candidate_value <= current_value {
                return false;
            }
        }

        *guard = Some(candidate.clone());
        self.best_value.store(candidate_value, Ordering::Relaxed);
        true
    }
}

/// The solver's view of the incumbent.
pub trait IncumbentStore<T>
where
    T: SolverNumeric,
{
    /// Returns the best value known before the search starts.
    fn initial_best(&self) -> T;
    /// Combines the local best value with whatever is known elsewhere.
    fn tighten(&self, current_local_best: T) -> T;
    /// Publishes a newly found schedule.
    fn on_solution_found(&self, schedule: &Schedule<T>);
    /// Returns the best schedule known elsewhere, if any.
    fn best_schedule(&self) -> Option<Schedule<T>>;
}

/// An `IncumbentStore` that keeps everything local to one search.
#[repr(transparent)]
pub struct NoSharedIncumbent<T>(PhantomData<T>);

impl<T> Default for NoSharedIncumbent<T>
where
    T: SolverNumeric,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> NoSharedIncumbent<T>
where
    T: SolverNumeric,
{
    #[inline(always)]
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> IncumbentStore<T> for NoSharedIncumbent<T>
where
    T: SolverNumeric,
{
    #[inline(always)]
    fn initial_best(&self) -> T {
        T::zero()
    }

    #[inline(always)]
    fn tighten(&self, current_local_best: T) -> T {
        current_local_best
    }

    #[inline(always)]
    fn on_solution_found(&self, _: &Schedule<T>) {}

    #[inline(always)]
    fn best_schedule(&self) -> Option<Schedule<T>> {
        None
    }
}

/// An `IncumbentStore` backed by a `SharedIncumbent`.
#[repr(transparent)]
#[derive(Debug, Clone)]
pub struct SharedIncumbentAdapter<'a, T> {
    inner: &'a SharedIncumbent<T>,
}

impl<'a, T> SharedIncumbentAdapter<'a, T> {
    #[inline(always)]
    pub fn new(inner: &'a SharedIncumbent<T>) -> Self {
        Self { inner }
    }

    fn shared_best(&self) -> T
    where
        T: SolverNumeric,
    {
        T::from_i64(self.inner.best_value()).unwrap_or_else(T::zero)
    }
}

impl<'a, T> IncumbentStore<T> for SharedIncumbentAdapter<'a, T>
where
    T: SolverNumeric,
{
    #[inline(always)]
    fn initial_best(&self) -> T {
        self.shared_best()
    }

    #[inline(always)]
    fn tighten(&self, current_local_best: T) -> T {
        self.shared_best().max(current_local_best)
    }

    #[inline(always)]
    fn on_solution_found(&self, schedule: &Schedule<T>) {
        self.inner.try_install(schedule);
    }

    #[inline(always)]
    fn best_schedule(&self) -> Option<Schedule<T>> {
        self.inner.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use floodgate_model::{index::NodeIndex, schedule::ScheduledOpen};
    use std::{sync::Arc, thread};

    type IntegerType = i64;

    fn make_schedule(value: IntegerType) -> Schedule<IntegerType> {
        Schedule::new(
            value,
            vec![ScheduledOpen::new(0, 1, NodeIndex::new(0), "AA")],
        )
    }

    #[test]
    fn test_initial_state() {
        let incumbent = SharedIncumbent::<IntegerType>::new();
        assert_eq!(incumbent.best_value(), 0);
        assert!(incumbent.snapshot().is_none());
        assert_eq!(incumbent.to_string(), "Incumbent(best_value: 0)");
    }

    #[test]
    fn test_install_better_schedule() {
        let incumbent = SharedIncumbent::<IntegerType>::new();
        assert!(incumbent.try_install(&make_schedule(100)));
        assert_eq!(incumbent.best_value(), 100);
        assert_eq!(incumbent.snapshot().unwrap().value(), 100);
    }

    #[test]
    fn test_reject_worse_or_equal_candidates() {
        let incumbent = SharedIncumbent::<IntegerType>::new();
        assert!(incumbent.try_install(&make_schedule(100)));
        assert!(!incumbent.try_install(&make_schedule(60)));
        assert!(!incumbent.try_install(&make_schedule(100)));
        assert_eq!(incumbent.best_value(), 100);
        assert_eq!(incumbent.snapshot().unwrap().value(), 100);
    }

    #[test]
    fn test_zero_value_schedule_is_not_installed() {
        let incumbent = SharedIncumbent::<IntegerType>::new();
        assert!(!incumbent.try_install(&Schedule::empty()));
        assert!(incumbent.snapshot().is_none());
    }

    #[test]
    fn test_concurrent_installs_maximum_wins() {
        let incumbent = Arc::new(SharedIncumbent::<IntegerType>::new());
        let values = vec![300, 200, 400, 50, 1200, 75, 500, 60, 90];

        let handles: Vec<_> = values
            .iter()
            .copied()
            .map(|value| {
                let incumbent = Arc::clone(&incumbent);
                thread::spawn(move || incumbent.try_install(&make_schedule(value)))
            })
            .collect();
        let installed = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .filter(|&installed| installed)
            .count();

        assert!(installed >= 1);
        assert_eq!(incumbent.best_value(), 1200);
        assert_eq!(incumbent.snapshot().unwrap().value(), 1200);
    }

    #[test]
    fn test_no_shared_incumbent_is_local() {
        let store = NoSharedIncumbent::<IntegerType>::new();
        assert_eq!(store.initial_best(), 0);
        for value in [0, 1, 42, IntegerType::MAX] {
            assert_eq!(store.tighten(value), value);
        }
        store.on_solution_found(&make_schedule(10));
        assert!(store.best_schedule().is_none());
    }

    #[test]
    fn test_adapter_tighten_returns_max() {
        let shared = SharedIncumbent::<IntegerType>::new();
        let adapter = SharedIncumbentAdapter::new(&shared);
        assert_eq!(adapter.initial_best(), 0);

        adapter.on_solution_found(&make_schedule(200));
        assert_eq!(shared.best_value(), 200);
        assert_eq!(adapter.initial_best(), 200);
        assert_eq!(adapter.tighten(150), 200);
        assert_eq!(adapter.tighten(350), 350);
        assert_eq!(adapter.best_schedule().unwrap().value(), 200);
    }
}
