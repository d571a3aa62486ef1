use std::collections::{BTreeMap, BTreeSet};

use derive_more::{Deref, Display};
use uuid::Uuid;

use crate::{ReadError, Velocity};

#[allow(async_fn_in_trait)]
pub trait ExerciseRepository {
    /// Read the exercises with the given IDs. Unknown IDs are skipped.
    async fn read_exercises(&self, ids: &BTreeSet<ExerciseID>) -> Result<Vec<Exercise>, ReadError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Exercise {
    pub id: ExerciseID,
    pub name: String,
    /// Velocity expected at maximal effort, used to anchor load-velocity profiles.
    pub terminal_velocity: Option<Velocity>,
}

#[derive(Deref, Debug, Display, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExerciseID(Uuid);

impl ExerciseID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for ExerciseID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for ExerciseID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[must_use]
pub fn terminal_velocities(exercises: &[Exercise]) -> BTreeMap<ExerciseID, Velocity> {
    exercises
        .iter()
        .filter_map(|e| e.terminal_velocity.map(|v| (e.id, v)))
        .collect()
}
