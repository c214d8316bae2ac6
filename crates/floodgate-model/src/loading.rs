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

//! # Cave Loader
//!
//! Reads a cave description with one room per line:
//!
//! ```raw
//! Valve AA has flow rate=0; tunnels lead to valves DD, II, BB
//! Valve HH has flow rate=22; tunnel leads to valve GG
//! ```
//!
//! Blank lines and lines starting with `#` are ignored. The start room
//! defaults to `AA` and can be changed with `ProblemLoader::with_start`.

use crate::{
    model::{Model, ModelBuilder, ModelError},
    num::SolverNumeric,
};
use regex::Regex;
use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
    sync::LazyLock,
};

static ROOM_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^Valve (?P<label>\S+) has flow rate=(?P<rate>-?\d+); tunnels? leads? to valves? (?P<exits>.+)$",
    )
    .expect("room line pattern is valid")
});

/// The error type for loading a cave.
#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: cannot parse '{content}'")]
    Syntax { line: usize, content: String },
    #[error("line {line}: flow rate '{token}' is out of range")]
    FlowRate { line: usize, token: String },
    #[error("invalid cave: {0}")]
    Model(#[from] ModelError),
}

/// Loads a `Model` from the line-oriented cave format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemLoader {
    start: String,
}

impl Default for ProblemLoader {
    fn default() -> Self {
        Self {
            start: "AA".to_string(),
        }
    }
}

impl ProblemLoader {
    /// Creates a loader that starts in room `AA`.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the label of the start room.
    #[inline]
    pub fn with_start<S>(mut self, start: S) -> Self
    where
        S: Into<String>,
    {
        self.start = start.into();
        self
    }

    /// Returns the label of the start room.
    #[inline]
    pub fn start(&self) -> &str {
        &self.start
    }

    /// Loads a cave from a type implementing `BufRead`.
    pub fn from_bufread<T, R>(&self, rdr: R) -> Result<Model<T>, LoaderError>
    where
        T: SolverNumeric,
        R: BufRead,
    {
        let mut builder = ModelBuilder::new(self.start.as_str());

        for (index, line) in rdr.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let line_number = index + 1;
            let captures = ROOM_LINE
                .captures(trimmed)
                .ok_or_else(|| LoaderError::Syntax {
                    line: line_number,
                    content: trimmed.to_string(),
                })?;

            let token = &captures["rate"];
            let flow_rate = token
                .parse::<i64>()
                .ok()
                .and_then(T::from_i64)
                .ok_or_else(|| LoaderError::FlowRate {
                    line: line_number,
                    token: token.to_string(),
                })?;

            let exits = captures["exits"]
                .split(',')
                .map(str::trim)
                .filter(|exit| !exit.is_empty());

            builder.add_room(&captures["label"], flow_rate, exits);
        }

        Ok(builder.build()?)
    }

    /// Loads a cave from a file path.
    #[inline]
    pub fn from_path<T, P>(&self, path: P) -> Result<Model<T>, LoaderError>
    where
        T: SolverNumeric,
        P: AsRef<Path>,
    {
        let file = File::open(path)?;
        self.from_bufread(BufReader::new(file))
    }

    /// Loads a cave from a generic reader.
    #[inline]
    pub fn from_reader<T, R>(&self, r: R) -> Result<Model<T>, LoaderError>
    where
        T: SolverNumeric,
        R: Read,
    {
        self.from_bufread(BufReader::new(r))
    }

    /// Loads a cave from a string slice.
    #[inline]
    pub fn from_str<T>(&self, s: &str) -> Result<Model<T>, LoaderError>
    where
        T: SolverNumeric,
    {
        self.from_reader(s.as_bytes())
    }
}
