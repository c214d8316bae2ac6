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

//! # Solver Numeric Trait
//!
//! Unified numeric bounds for the model and the search. `SolverNumeric`
//! collects the integer capabilities used for flow rates, remaining time,
//! hop distances and accumulated value.
//!
//! ## Highlights
//!
//! - Requires `PrimInt + Signed + FromPrimitive` for arithmetic, checked and
//!   saturating operations, and conversions from hop counts.
//! - Requires `Into<i64>` so values can be published through atomics and
//!   reported in error messages.
//! - `Send + Sync` so reduced graphs can be shared by portfolio threads.
//!
//! Note: `i128` and `isize` are excluded because they do not convert into `i64`.

use num_traits::{FromPrimitive, PrimInt, Signed};
use std::hash::Hash;

/// A trait alias for the signed integer types usable by the solver
/// (`i8`, `i16`, `i32` and `i64`).
pub trait SolverNumeric:
    PrimInt
    + Signed
    + FromPrimitive
    + Into<i64>
    + std::fmt::Debug
    + std::fmt::Display
    + Hash
    + Send
    + Sync
    + 'static
{
}

impl<T> SolverNumeric for T where
    T: PrimInt
        + Signed
        + FromPrimitive
        + Into<i64>
        + std::fmt::Debug
        + std::fmt::Display
        + Hash
        + Send
        + Sync
        + 'static
{
}

/// Multiplies `lhs` by `rhs`, clamping to `T::max_value()` on overflow.
#[inline]
pub fn clamped_mul<T>(lhs: T, rhs: T) -> T
where
    T: SolverNumeric,
{
    lhs.checked_mul(&rhs).unwrap_or_else(T::max_value)
}

/// Returns the constant `2` in `T`.
#[inline(always)]
pub fn two<T>() -> T
where
    T: SolverNumeric,
{
    T::one() + T::one()
}
