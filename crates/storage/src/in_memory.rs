use std::collections::BTreeSet;

use chrono::NaiveDate;
use liftplan_domain as domain;
use log::debug;
use uuid::Uuid;

use crate::SnapshotError;

/// Read-only store holding a snapshot of reference and athlete data.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct InMemory {
    exercises: Vec<domain::Exercise>,
    relationships: Vec<domain::ExerciseRelationship>,
    one_rep_maxes: Vec<domain::OneRepMaxRecord>,
    velocity_attempts: Vec<domain::VelocityAttempt>,
}

impl InMemory {
    #[must_use]
    pub fn new(
        exercises: Vec<domain::Exercise>,
        relationships: Vec<domain::ExerciseRelationship>,
        one_rep_maxes: Vec<domain::OneRepMaxRecord>,
        velocity_attempts: Vec<domain::VelocityAttempt>,
    ) -> Self {
        Self {
            exercises,
            relationships,
            one_rep_maxes,
            velocity_attempts,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let store = Self::try_from(serde_json::from_str::<Snapshot>(json)?)?;
        debug!(
            "loaded snapshot with {} exercises, {} relationships, {} one-rep maxes and {} velocity attempts",
            store.exercises.len(),
            store.relationships.len(),
            store.one_rep_maxes.len(),
            store.velocity_attempts.len()
        );
        Ok(store)
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(&Snapshot::from(self))?)
    }
}

impl domain::ExerciseRepository for InMemory {
    async fn read_exercises(
        &self,
        ids: &BTreeSet<domain::ExerciseID>,
    ) -> Result<Vec<domain::Exercise>, domain::ReadError> {
        Ok(self
            .exercises
            .iter()
            .filter(|e| ids.contains(&e.id))
            .cloned()
            .collect())
    }
}

impl domain::ExerciseRelationshipRepository for InMemory {
    async fn read_exercise_relationships(
        &self,
        relationship_type: domain::RelationshipType,
    ) -> Result<Vec<domain::ExerciseRelationship>, domain::ReadError> {
        Ok(self
            .relationships
            .iter()
            .filter(|r| r.relationship_type == relationship_type)
            .cloned()
            .collect())
    }
}

impl domain::OneRepMaxRepository for InMemory {
    async fn read_one_rep_maxes(
        &self,
        user_id: domain::UserID,
    ) -> Result<Vec<domain::OneRepMaxRecord>, domain::ReadError> {
        let mut records = self
            .one_rep_maxes
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect::<Vec<_>>();
        records.sort_by(|a, b| b.recorded_date.cmp(&a.recorded_date));
        Ok(records)
    }
}

impl domain::VelocityAttemptRepository for InMemory {
    async fn read_velocity_attempts(
        &self,
        user_id: domain::UserID,
    ) -> Result<Vec<domain::VelocityAttempt>, domain::ReadError> {
        Ok(self
            .velocity_attempts
            .iter()
            .filter(|a| a.user_id == user_id && a.velocity_ms.is_some_and(|v| v > 0.0))
            .cloned()
            .collect())
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Snapshot {
    pub exercises: Vec<Exercise>,
    pub relationships: Vec<ExerciseRelationship>,
    pub one_rep_maxes: Vec<OneRepMaxRecord>,
    pub velocity_attempts: Vec<VelocityAttempt>,
}

impl From<&InMemory> for Snapshot {
    fn from(value: &InMemory) -> Self {
        Self {
            exercises: value.exercises.iter().map(Exercise::from).collect(),
            relationships: value
                .relationships
                .iter()
                .map(ExerciseRelationship::from)
                .collect(),
            one_rep_maxes: value
                .one_rep_maxes
                .iter()
                .map(OneRepMaxRecord::from)
                .collect(),
            velocity_attempts: value
                .velocity_attempts
                .iter()
                .map(VelocityAttempt::from)
                .collect(),
        }
    }
}

impl TryFrom<Snapshot> for InMemory {
    type Error = SnapshotError;

    fn try_from(value: Snapshot) -> Result<Self, Self::Error> {
        Ok(Self {
            exercises: value
                .exercises
                .into_iter()
                .map(domain::Exercise::try_from)
                .collect::<Result<_, _>>()?,
            relationships: value
                .relationships
                .into_iter()
                .map(domain::ExerciseRelationship::try_from)
                .collect::<Result<_, _>>()?,
            one_rep_maxes: value
                .one_rep_maxes
                .into_iter()
                .map(domain::OneRepMaxRecord::try_from)
                .collect::<Result<_, _>>()?,
            velocity_attempts: value
                .velocity_attempts
                .into_iter()
                .map(domain::VelocityAttempt::from)
                .collect(),
        })
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal_velocity: Option<f64>,
}

impl From<&domain::Exercise> for Exercise {
    fn from(value: &domain::Exercise) -> Self {
        Self {
            id: *value.id,
            name: value.name.clone(),
            terminal_velocity: value.terminal_velocity.map(f64::from),
        }
    }
}

impl TryFrom<Exercise> for domain::Exercise {
    type Error = domain::VelocityError;

    fn try_from(value: Exercise) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            name: value.name,
            terminal_velocity: match value.terminal_velocity {
                None => None,
                Some(v) if v == 0.0 => None,
                Some(v) => Some(domain::Velocity::new(v)?),
            },
        })
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseRelationship {
    pub exercise_id: Uuid,
    pub related_exercise_id: Uuid,
    #[serde(rename = "type")]
    pub relationship_type: String,
}

impl From<&domain::ExerciseRelationship> for ExerciseRelationship {
    fn from(value: &domain::ExerciseRelationship) -> Self {
        Self {
            exercise_id: *value.exercise_id,
            related_exercise_id: *value.related_exercise_id,
            relationship_type: value.relationship_type.to_string(),
        }
    }
}

impl TryFrom<ExerciseRelationship> for domain::ExerciseRelationship {
    type Error = strum::ParseError;

    fn try_from(value: ExerciseRelationship) -> Result<Self, Self::Error> {
        Ok(Self {
            exercise_id: value.exercise_id.into(),
            related_exercise_id: value.related_exercise_id.into(),
            relationship_type: value.relationship_type.parse()?,
        })
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OneRepMaxRecord {
    pub user_id: Uuid,
    pub exercise_id: Uuid,
    pub weight: f64,
    pub recorded_date: NaiveDate,
}

impl From<&domain::OneRepMaxRecord> for OneRepMaxRecord {
    fn from(value: &domain::OneRepMaxRecord) -> Self {
        Self {
            user_id: *value.user_id,
            exercise_id: *value.exercise_id,
            weight: value.weight.into(),
            recorded_date: value.recorded_date,
        }
    }
}

impl TryFrom<OneRepMaxRecord> for domain::OneRepMaxRecord {
    type Error = domain::WeightError;

    fn try_from(value: OneRepMaxRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: value.user_id.into(),
            exercise_id: value.exercise_id.into(),
            weight: domain::Weight::new(value.weight)?,
            recorded_date: value.recorded_date,
        })
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VelocityAttempt {
    pub exercise_id: Uuid,
    pub user_id: Uuid,
    pub weight_kg: f64,
    #[serde(default)]
    pub velocity_ms: Option<f64>,
}

impl From<&domain::VelocityAttempt> for VelocityAttempt {
    fn from(value: &domain::VelocityAttempt) -> Self {
        Self {
            exercise_id: *value.exercise_id,
            user_id: *value.user_id,
            weight_kg: value.weight_kg,
            velocity_ms: value.velocity_ms,
        }
    }
}

impl From<VelocityAttempt> for domain::VelocityAttempt {
    fn from(value: VelocityAttempt) -> Self {
        Self {
            exercise_id: value.exercise_id.into(),
            user_id: value.user_id.into(),
            weight_kg: value.weight_kg,
            velocity_ms: value.velocity_ms,
        }
    }
}
