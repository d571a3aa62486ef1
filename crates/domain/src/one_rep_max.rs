use std::collections::BTreeMap;

use chrono::NaiveDate;
use log::debug;
use strum::{AsRefStr, Display, EnumString};

use crate::{ExerciseID, ReadError, RelationshipGraph, UserID, Weight};

#[allow(async_fn_in_trait)]
pub trait OneRepMaxRepository {
    /// Read all one-repetition maximum records of a user, most recent first.
    async fn read_one_rep_maxes(&self, user_id: UserID)
    -> Result<Vec<OneRepMaxRecord>, ReadError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct OneRepMaxRecord {
    pub user_id: UserID,
    pub exercise_id: ExerciseID,
    pub weight: Weight,
    pub recorded_date: NaiveDate,
}

/// Choice of the linked exercise whose record is used when an exercise has none.
#[derive(AsRefStr, Display, EnumString, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum GroupFallback {
    /// The most recent record of the whole group, the lowest exercise ID on equal dates.
    #[default]
    #[strum(serialize = "most_recent")]
    MostRecent,
    /// The record of the first linked exercise in ascending ID order that has one.
    #[strum(serialize = "first_linked")]
    FirstLinked,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedOneRepMax {
    pub weight: Weight,
    /// The exercise the record belongs to, which differs from the requested one on fallback.
    pub source: ExerciseID,
}

/// The latest one-repetition maximum per exercise of a single user.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct OneRepMaxes {
    latest: BTreeMap<ExerciseID, OneRepMaxRecord>,
}

impl OneRepMaxes {
    /// Keep the latest record per exercise of the given user.
    ///
    /// Records of other users and records without a positive weight are ignored. Of
    /// several records with the same date, the first one wins, so input sorted most recent
    /// first resolves to its first match.
    #[must_use]
    pub fn new(user_id: UserID, records: &[OneRepMaxRecord]) -> Self {
        let mut latest: BTreeMap<ExerciseID, OneRepMaxRecord> = BTreeMap::new();

        for record in records
            .iter()
            .filter(|r| r.user_id == user_id && f64::from(r.weight) > 0.0)
        {
            match latest.get(&record.exercise_id) {
                Some(current) if current.recorded_date >= record.recorded_date => {}
                _ => {
                    latest.insert(record.exercise_id, record.clone());
                }
            }
        }

        Self { latest }
    }

    #[must_use]
    pub fn latest(&self, exercise_id: ExerciseID) -> Option<&OneRepMaxRecord> {
        self.latest.get(&exercise_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.latest.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.latest.is_empty()
    }

    /// The one-repetition maximum of an exercise, falling back to linked exercises.
    #[must_use]
    pub fn resolve(
        &self,
        exercise_id: ExerciseID,
        graph: &RelationshipGraph,
        fallback: GroupFallback,
    ) -> Option<ResolvedOneRepMax> {
        if let Some(record) = self.latest(exercise_id) {
            return Some(ResolvedOneRepMax {
                weight: record.weight,
                source: exercise_id,
            });
        }

        let mut candidates = graph.linked(exercise_id).filter_map(|id| self.latest(id));

        let record = match fallback {
            GroupFallback::FirstLinked => candidates.next(),
            GroupFallback::MostRecent => candidates.fold(None, |best: Option<&OneRepMaxRecord>, r| {
                match best {
                    Some(b) if b.recorded_date >= r.recorded_date => Some(b),
                    _ => Some(r),
                }
            }),
        }?;

        debug!(
            "using one-rep max of exercise {} for exercise {exercise_id}",
            record.exercise_id
        );

        Some(ResolvedOneRepMax {
            weight: record.weight,
            source: record.exercise_id,
        })
    }
}

/// Resolve the one-repetition maximum of a user for an exercise from raw records.
#[must_use]
pub fn resolve_one_rep_max(
    user_id: UserID,
    exercise_id: ExerciseID,
    records: &[OneRepMaxRecord],
    graph: &RelationshipGraph,
) -> Option<Weight> {
    OneRepMaxes::new(user_id, records)
        .resolve(exercise_id, graph, GroupFallback::default())
        .map(|r| r.weight)
}
