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

//! # Floodgate Model
//!
//! **The domain model for the Floodgate valve scheduling search.**
//!
//! This crate turns a cave of rooms and tunnels into the compact, index-based
//! representation consumed by the branch-and-bound engine (`floodgate_bnb`).
//!
//! ## Architecture
//!
//! * **`index`**: Strongly-typed wrappers (`RoomIndex`, `NodeIndex`) so original rooms and
//!   reduced-graph nodes cannot be mixed up.
//! * **`model`**: The immutable `Model` of rooms and exits together with its validating `ModelBuilder`.
//! * **`loading`**: A line-oriented loader for the `Valve AA has flow rate=0; tunnels lead to valves ...` format.
//! * **`reduce`**: The reachability reducer producing a `ReducedGraph` over the valves with positive flow rate.
//! * **`schedule`**: The output format: the winning sequence of valve openings and its value.
//! * **`num`**: The `SolverNumeric` trait alias collecting the integer capabilities the search needs.
//!
//! ## Design Philosophy
//!
//! 1.  **Fail-Fast**: Duplicate labels, dangling exits and a missing start room are rejected by the builder.
//! 2.  **Dense Indices**: Valves are renumbered `0..k` during reduction, so the search can track
//!     opened valves in a bit set instead of string-keyed containers.

pub mod index;
pub mod loading;
pub mod model;
pub mod num;
pub mod reduce;
pub mod schedule;
