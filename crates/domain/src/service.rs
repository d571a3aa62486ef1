use std::collections::BTreeSet;

use futures_util::try_join;
use log::{debug, error};

use crate::{
    ExerciseID, ExerciseRelationshipRepository, ExerciseRepository, OneRepMaxRepository,
    PersonalizationData, PersonalizationService, ReadError, Settings, UserID,
    VelocityAttemptRepository,
};

pub struct Service<R> {
    repository: R,
    settings: Settings,
}

impl<R> Service<R> {
    pub fn new(repository: R) -> Self {
        Self::with_settings(repository, Settings::default())
    }

    pub fn with_settings(repository: R, settings: Settings) -> Self {
        Self {
            repository,
            settings,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

macro_rules! log_on_error {
    ($func: expr, $error: ident, $action: literal, $entity: literal) => {{
        let result = $func.await;
        match result {
            Ok(_) => {}
            Err(ref err) => match err {
                $error::Storage(crate::StorageError::NoConnection) => {
                    debug!("failed to {} {}: {err}", $action, $entity);
                }
                _ => {
                    error!("failed to {} {}: {err}", $action, $entity);
                }
            },
        }
        result
    }};
}

impl<R> PersonalizationService for Service<R>
where
    R: OneRepMaxRepository
        + ExerciseRelationshipRepository
        + VelocityAttemptRepository
        + ExerciseRepository,
{
    async fn get_personalization_data(
        &self,
        user_id: UserID,
    ) -> Result<PersonalizationData, ReadError> {
        let (one_rep_maxes, relationships, attempts) = try_join!(
            async {
                log_on_error!(
                    self.repository.read_one_rep_maxes(user_id),
                    ReadError,
                    "read",
                    "one-rep maxes"
                )
            },
            async {
                log_on_error!(
                    self.repository
                        .read_exercise_relationships(self.settings.relationship_type),
                    ReadError,
                    "read",
                    "exercise relationships"
                )
            },
            async {
                log_on_error!(
                    self.repository.read_velocity_attempts(user_id),
                    ReadError,
                    "read",
                    "velocity attempts"
                )
            },
        )?;

        let exercise_ids = attempts
            .iter()
            .filter(|a| a.point().is_some())
            .map(|a| a.exercise_id)
            .collect::<BTreeSet<ExerciseID>>();

        let exercises = if exercise_ids.is_empty() {
            vec![]
        } else {
            log_on_error!(
                self.repository.read_exercises(&exercise_ids),
                ReadError,
                "read",
                "exercises"
            )?
        };

        Ok(PersonalizationData::new(
            user_id,
            self.settings,
            &one_rep_maxes,
            &relationships,
            &attempts,
            &exercises,
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        Block, Day, Exercise, ExerciseRelationship, OneRepMaxRecord, Program, ProgramExercise,
        RelationshipType, StorageError, Velocity, VelocityAttempt, Week, Weight,
    };

    #[derive(Default)]
    struct FakeRepository {
        one_rep_maxes: Vec<OneRepMaxRecord>,
        relationships: Vec<ExerciseRelationship>,
        attempts: Vec<VelocityAttempt>,
        exercises: Vec<Exercise>,
        unreachable: bool,
        reads: Cell<usize>,
        requested_exercises: RefCell<Vec<BTreeSet<ExerciseID>>>,
        requested_relationship_types: RefCell<Vec<RelationshipType>>,
    }

    impl FakeRepository {
        fn read(&self) -> Result<(), ReadError> {
            self.reads.set(self.reads.get() + 1);
            if self.unreachable {
                Err(StorageError::NoConnection.into())
            } else {
                Ok(())
            }
        }
    }

    impl OneRepMaxRepository for FakeRepository {
        async fn read_one_rep_maxes(
            &self,
            user_id: UserID,
        ) -> Result<Vec<OneRepMaxRecord>, ReadError> {
            self.read()?;
            Ok(self
                .one_rep_maxes
                .iter()
                .filter(|r| r.user_id == user_id)
                .cloned()
                .collect())
        }
    }

    impl ExerciseRelationshipRepository for FakeRepository {
        async fn read_exercise_relationships(
            &self,
            relationship_type: RelationshipType,
        ) -> Result<Vec<ExerciseRelationship>, ReadError> {
            self.read()?;
            self.requested_relationship_types
                .borrow_mut()
                .push(relationship_type);
            Ok(self
                .relationships
                .iter()
                .filter(|r| r.relationship_type == relationship_type)
                .cloned()
                .collect())
        }
    }

    impl VelocityAttemptRepository for FakeRepository {
        async fn read_velocity_attempts(
            &self,
            user_id: UserID,
        ) -> Result<Vec<VelocityAttempt>, ReadError> {
            self.read()?;
            Ok(self
                .attempts
                .iter()
                .filter(|a| a.user_id == user_id)
                .cloned()
                .collect())
        }
    }

    impl ExerciseRepository for FakeRepository {
        async fn read_exercises(
            &self,
            ids: &BTreeSet<ExerciseID>,
        ) -> Result<Vec<Exercise>, ReadError> {
            self.read()?;
            self.requested_exercises.borrow_mut().push(ids.clone());
            Ok(self
                .exercises
                .iter()
                .filter(|e| ids.contains(&e.id))
                .cloned()
                .collect())
        }
    }

    fn record(user_id: u128, exercise_id: u128, weight: f64) -> OneRepMaxRecord {
        OneRepMaxRecord {
            user_id: user_id.into(),
            exercise_id: exercise_id.into(),
            weight: Weight::new(weight).unwrap(),
            recorded_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        }
    }

    fn attempt(
        user_id: u128,
        exercise_id: u128,
        weight_kg: f64,
        velocity_ms: f64,
    ) -> VelocityAttempt {
        VelocityAttempt {
            exercise_id: exercise_id.into(),
            user_id: user_id.into(),
            weight_kg,
            velocity_ms: Some(velocity_ms),
        }
    }

    fn repository() -> FakeRepository {
        FakeRepository {
            one_rep_maxes: vec![record(1, 1, 100.0), record(2, 1, 150.0)],
            relationships: vec![ExerciseRelationship {
                exercise_id: 1.into(),
                related_exercise_id: 2.into(),
                relationship_type: RelationshipType::StrengthVariant,
            }],
            attempts: vec![
                attempt(1, 1, 60.0, 0.8),
                attempt(1, 1, 80.0, 0.6),
                attempt(2, 1, 100.0, 0.5),
                attempt(2, 1, 120.0, 0.3),
            ],
            exercises: vec![
                Exercise {
                    id: 1.into(),
                    name: String::from("Back Squat"),
                    terminal_velocity: Some(Velocity::new(0.3).unwrap()),
                },
                Exercise {
                    id: 2.into(),
                    name: String::from("Pause Squat"),
                    terminal_velocity: None,
                },
            ],
            ..FakeRepository::default()
        }
    }

    fn program() -> Program {
        Program {
            id: 1.into(),
            name: String::from("Squat Cycle"),
            weeks: vec![Week {
                name: String::from("Week 1"),
                days: vec![Day {
                    name: String::from("Day 1"),
                    blocks: vec![Block {
                        name: String::from("Main"),
                        exercises: vec![
                            ProgramExercise {
                                exercise_id: 2.into(),
                                percentage_1rm: String::from("80"),
                                ..ProgramExercise::default()
                            },
                            ProgramExercise {
                                exercise_id: 3.into(),
                                percentage_1rm: String::from("80"),
                                ..ProgramExercise::default()
                            },
                        ],
                    }],
                }],
            }],
        }
    }

    fn loads(program: &Program) -> Vec<(String, Option<f64>)> {
        program
            .exercises()
            .map(|e| (e.kg.clone(), e.velocity_ms))
            .collect()
    }

    #[tokio::test]
    async fn test_get_personalization_data() {
        let service = Service::new(repository());
        let data = service.get_personalization_data(1.into()).await.unwrap();

        assert_eq!(data.user_id(), 1.into());
        assert_eq!(data.one_rep_maxes().len(), 1);
        assert_eq!(data.profiles().len(), 1);
        assert_eq!(
            data.profiles().get(1.into()).unwrap().terminal_velocity(),
            Some(Velocity::new(0.3).unwrap())
        );
        assert!(data.graph().are_linked(1.into(), 2.into()));
        assert_eq!(service.repository.reads.get(), 4);
        assert_eq!(
            *service.repository.requested_exercises.borrow(),
            vec![BTreeSet::from([1.into()])]
        );
    }

    #[tokio::test]
    async fn test_get_personalization_data_without_attempts() {
        let service = Service::new(repository());
        let data = service.get_personalization_data(3.into()).await.unwrap();

        assert!(data.one_rep_maxes().is_empty());
        assert!(data.profiles().is_empty());
        assert_eq!(service.repository.reads.get(), 3);
        assert!(service.repository.requested_exercises.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_get_personalization_data_relationship_type() {
        let service = Service::with_settings(
            repository(),
            Settings {
                relationship_type: RelationshipType::Substitute,
                ..Settings::default()
            },
        );
        let data = service.get_personalization_data(1.into()).await.unwrap();

        assert!(data.graph().is_empty());
        assert_eq!(
            *service.repository.requested_relationship_types.borrow(),
            vec![RelationshipType::Substitute]
        );
        assert_eq!(service.settings().relationship_type, RelationshipType::Substitute);
    }

    #[tokio::test]
    async fn test_get_personalization_data_unreachable() {
        let service = Service::new(FakeRepository {
            unreachable: true,
            ..repository()
        });
        assert!(matches!(
            service.get_personalization_data(1.into()).await,
            Err(ReadError::Storage(StorageError::NoConnection))
        ));
        assert!(service.repository.requested_exercises.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_personalize_program() {
        let service = Service::new(repository());
        let program = program();
        let personalized = service
            .personalize_program(&program, 1.into())
            .await
            .unwrap();

        assert_eq!(personalized.id, program.id);
        assert_eq!(personalized.name, program.name);
        assert_eq!(
            loads(&personalized),
            vec![(String::from("80"), Some(0.6)), (String::new(), None)]
        );
        assert_eq!(loads(&program), vec![(String::new(), None); 2]);
    }

    #[tokio::test]
    async fn test_personalize_weeks() {
        let service = Service::new(repository());
        let weeks = service
            .personalize_weeks(&program().weeks, 1.into())
            .await
            .unwrap();

        assert_eq!(weeks[0].exercises().next().unwrap().kg, "80");
        assert_eq!(
            service
                .personalize_weeks(&program().weeks, 1.into())
                .await
                .unwrap(),
            weeks
        );
    }

    #[tokio::test]
    async fn test_personalize_program_for_athletes() {
        let service = Service::new(repository());
        let programs = service
            .personalize_program_for_athletes(&program(), &[1.into(), 2.into(), 3.into()])
            .await
            .unwrap();

        assert_eq!(
            programs.iter().map(loads).collect::<Vec<_>>(),
            vec![
                vec![(String::from("80"), Some(0.6)), (String::new(), None)],
                vec![(String::from("120"), Some(0.3)), (String::new(), None)],
                vec![(String::new(), None); 2],
            ]
        );
    }

    #[tokio::test]
    async fn test_personalize_program_for_athletes_unreachable() {
        let service = Service::new(FakeRepository {
            unreachable: true,
            ..repository()
        });
        assert!(
            service
                .personalize_program_for_athletes(&program(), &[1.into(), 2.into()])
                .await
                .is_err()
        );
    }
}
