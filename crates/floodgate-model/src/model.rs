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

use crate::{index::RoomIndex, num::SolverNumeric};
use rustc_hash::FxHashMap;

/// The error type for model construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Two rooms share the same label.
    #[error("duplicate room label '{label}'")]
    DuplicateRoom { label: String },
    /// The designated start room is not part of the model.
    #[error("start room '{label}' is not defined")]
    MissingStart { label: String },
    /// A room has an exit to a room that is not part of the model.
    #[error("room '{room}' has an exit to undefined room '{exit}'")]
    UnknownExit { room: String, exit: String },
    /// A room has a negative flow rate.
    #[error("room '{room}' has negative flow rate {flow_rate}")]
    NegativeFlowRate { room: String, flow_rate: i64 },
}

/// A room of the cave: a label, the flow rate released per remaining
/// minute once its valve is opened, and the rooms reachable in one step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Room<T> {
    label: String,
    flow_rate: T,
    exits: Vec<RoomIndex>,
}

impl<T> Room<T>
where
    T: SolverNumeric,
{
    /// Returns the label of the room.
    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the flow rate of the room's valve.
    #[inline]
    pub fn flow_rate(&self) -> T {
        self.flow_rate
    }

    /// Returns `true` if opening this room's valve releases anything.
    #[inline]
    pub fn has_valve(&self) -> bool {
        self.flow_rate > T::zero()
    }

    /// Returns the rooms directly reachable from this room.
    #[inline]
    pub fn exits(&self) -> &[RoomIndex] {
        &self.exits
    }
}

/// The cave of rooms and tunnels together with the designated start room.
///
/// A `Model` is immutable and always valid: every exit points at an existing
/// room, labels are unique and the start room exists.
#[derive(Clone, Debug)]
pub struct Model<T> {
    rooms: Vec<Room<T>>,
    lookup: FxHashMap<String, RoomIndex>,
    start: RoomIndex,
}

impl<T> Model<T>
where
    T: SolverNumeric,
{
    /// Returns the number of rooms.
    #[inline]
    pub fn num_rooms(&self) -> usize {
        self.rooms.len()
    }

    /// Returns the number of rooms with a positive flow rate.
    #[inline]
    pub fn num_valves(&self) -> usize {
        self.rooms.iter().filter(|room| room.has_valve()).count()
    }

    /// Returns all rooms in insertion order.
    #[inline]
    pub fn rooms(&self) -> &[Room<T>] {
        &self.rooms
    }

    /// Returns the room at `room_index`.
    ///
    /// # Panics
    ///
    /// Panics if `room_index` is out of bounds.
    #[inline]
    pub fn room(&self, room_index: RoomIndex) -> &Room<T> {
        let index = room_index.get();
        assert!(
            index < self.num_rooms(),
            "called `Model::room` with room index out of bounds: the len is {} but the index is {}",
            self.num_rooms(),
            index
        );

        &self.rooms[index]
    }

    /// Returns the index of the room labelled `label`, if any.
    #[inline]
    pub fn room_index(&self, label: &str) -> Option<RoomIndex> {
        self.lookup.get(label).copied()
    }

    /// Returns the designated start room.
    #[inline]
    pub fn start(&self) -> RoomIndex {
        self.start
    }

    /// Returns the sum of all flow rates.
    #[inline]
    pub fn total_flow_rate(&self) -> T {
        self.rooms
            .iter()
            .fold(T::zero(), |acc, room| acc.saturating_add(room.flow_rate))
    }
}

#[derive(Clone, Debug)]
struct PendingRoom<T> {
    label: String,
    flow_rate: T,
    exits: Vec<String>,
}

/// Incremental, label-based construction of a `Model`.
///
/// Exits refer to rooms by label and may name rooms that are added later;
/// everything is resolved and validated in `build`.
///
/// ```rust
/// use floodgate_model::model::ModelBuilder;
///
/// let mut builder = ModelBuilder::<i64>::new("AA");
/// builder
///     .add_room("AA", 0, ["BB"])
///     .add_room("BB", 13, ["AA"]);
/// let model = builder.build().unwrap();
/// assert_eq!(model.num_rooms(), 2);
/// assert_eq!(model.num_valves(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct ModelBuilder<T> {
    rooms: Vec<PendingRoom<T>>,
    start: String,
}

impl<T> ModelBuilder<T>
where
    T: SolverNumeric,
{
    /// Creates an empty builder whose start room is labelled `start`.
    #[inline]
    pub fn new<S>(start: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            rooms: Vec::new(),
            start: start.into(),
        }
    }

    /// Creates an empty builder with room for `capacity` rooms.
    #[inline]
    pub fn with_capacity<S>(start: S, capacity: usize) -> Self
    where
        S: Into<String>,
    {
        Self {
            rooms: Vec::with_capacity(capacity),
            start: start.into(),
        }
    }

    /// Returns the number of rooms added so far.
    #[inline]
    pub fn num_rooms(&self) -> usize {
        self.rooms.len()
    }

    /// Changes the label of the start room.
    #[inline]
    pub fn set_start<S>(&mut self, start: S) -> &mut Self
    where
        S: Into<String>,
    {
        self.start = start.into();
        self
    }

    /// Adds a room with the given label, flow rate and exits.
    #[inline]
    pub fn add_room<L, I>(&mut self, label: L, flow_rate: T, exits: I) -> &mut Self
    where
        L: Into<String>,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.rooms.push(PendingRoom {
            label: label.into(),
            flow_rate,
            exits: exits.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Validates the collected rooms and builds the `Model`.
    pub fn build(self) -> Result<Model<T>, ModelError> {
        let mut lookup =
            FxHashMap::with_capacity_and_hasher(self.rooms.len(), Default::default());

        for (index, pending) in self.rooms.iter().enumerate() {
            if pending.flow_rate < T::zero() {
                return Err(ModelError::NegativeFlowRate {
                    room: pending.label.clone(),
                    flow_rate: pending.flow_rate.into(),
                });
            }
            if lookup
                .insert(pending.label.clone(), RoomIndex::new(index))
                .is_some()
            {
                return Err(ModelError::DuplicateRoom {
                    label: pending.label.clone(),
                });
            }
        }

        let start = *lookup.get(&self.start).ok_or_else(|| ModelError::MissingStart {
            label: self.start.clone(),
        })?;

        let mut rooms = Vec::with_capacity(self.rooms.len());
        for pending in self.rooms {
            let mut exits = Vec::with_capacity(pending.exits.len());
            for exit in &pending.exits {
                let target = lookup.get(exit).ok_or_else(|| ModelError::UnknownExit {
                    room: pending.label.clone(),
                    exit: exit.clone(),
                })?;
                exits.push(*target);
            }
            rooms.push(Room {
                label: pending.label,
                flow_rate: pending.flow_rate,
                exits,
            });
        }

        Ok(Model {
            rooms,
            lookup,
            start,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type IntegerType = i64;

    fn two_room_builder() -> ModelBuilder<IntegerType> {
        let mut builder = ModelBuilder::new("AA");
        builder
            .add_room("AA", 0, ["BB"])
            .add_room("BB", 13, ["AA"]);
        builder
    }

    #[test]
    fn test_build_resolves_exits_and_start() {
        let model = two_room_builder().build().expect("valid model");

        assert_eq!(model.num_rooms(), 2);
        assert_eq!(model.num_valves(), 1);
        assert_eq!(model.start(), RoomIndex::new(0));

        let bb = model.room_index("BB").expect("BB exists");
        assert_eq!(model.room(bb).label(), "BB");
        assert_eq!(model.room(bb).flow_rate(), 13);
        assert!(model.room(bb).has_valve());
        assert_eq!(model.room(bb).exits(), &[RoomIndex::new(0)]);
        assert_eq!(model.total_flow_rate(), 13);
    }

    #[test]
    fn test_exits_may_reference_rooms_added_later() {
        let mut builder = ModelBuilder::<IntegerType>::new("AA");
        builder
            .add_room("AA", 0, ["CC"])
            .add_room("CC", 2, ["AA"]);
        let model = builder.build().expect("forward references are allowed");
        assert_eq!(model.room(model.start()).exits(), &[RoomIndex::new(1)]);
    }

    #[test]
    fn test_duplicate_label_is_rejected() {
        let mut builder = two_room_builder();
        builder.add_room("BB", 1, ["AA"]);
        assert_eq!(
            builder.build().unwrap_err(),
            ModelError::DuplicateRoom {
                label: "BB".to_string()
            }
        );
    }

    #[test]
    fn test_missing_start_is_rejected() {
        let mut builder = two_room_builder();
        builder.set_start("ZZ");
        assert_eq!(
            builder.build().unwrap_err(),
            ModelError::MissingStart {
                label: "ZZ".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_exit_is_rejected() {
        let mut builder = two_room_builder();
        builder.add_room("CC", 3, ["QQ"]);
        let err = builder.build().unwrap_err();
        assert_eq!(
            err,
            ModelError::UnknownExit {
                room: "CC".to_string(),
                exit: "QQ".to_string()
            }
        );
        assert_eq!(
            err.to_string(),
            "room 'CC' has an exit to undefined room 'QQ'"
        );
    }

    #[test]
    fn test_negative_flow_rate_is_rejected() {
        let mut builder = two_room_builder();
        builder.add_room("CC", -4, ["AA"]);
        assert!(matches!(
            builder.build(),
            Err(ModelError::NegativeFlowRate { flow_rate: -4, .. })
        ));
    }

    #[test]
    #[should_panic(expected = "room index out of bounds")]
    fn test_room_out_of_bounds_panics() {
        let model = two_room_builder().build().unwrap();
        let _ = model.room(RoomIndex::new(5));
    }
}
