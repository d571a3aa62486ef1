use futures_util::future::try_join_all;
use log::{debug, info};

use crate::{
    Exercise, ExerciseRelationship, OneRepMaxRecord, OneRepMaxes, Program, ProgramExercise,
    ReadError, RelationshipGraph, Settings, UserID, VelocityAttempt, VelocityProfiles, Week,
    target_kg, terminal_velocities,
};

#[allow(async_fn_in_trait)]
pub trait PersonalizationService {
    /// Read everything needed to personalize programs for one athlete.
    async fn get_personalization_data(
        &self,
        user_id: UserID,
    ) -> Result<PersonalizationData, ReadError>;

    async fn personalize_weeks(
        &self,
        weeks: &[Week],
        user_id: UserID,
    ) -> Result<Vec<Week>, ReadError> {
        Ok(self
            .get_personalization_data(user_id)
            .await?
            .personalize_weeks(weeks))
    }

    async fn personalize_program(
        &self,
        program: &Program,
        user_id: UserID,
    ) -> Result<Program, ReadError> {
        Ok(self
            .get_personalization_data(user_id)
            .await?
            .personalize_program(program))
    }

    /// Personalize one copy of the program per athlete, in the order of the given users.
    async fn personalize_program_for_athletes(
        &self,
        program: &Program,
        user_ids: &[UserID],
    ) -> Result<Vec<Program>, ReadError> {
        try_join_all(
            user_ids
                .iter()
                .map(|user_id| self.personalize_program(program, *user_id)),
        )
        .await
    }
}

/// Snapshot of an athlete's data, prepared for personalizing programs.
///
/// The relationship graph and the velocity profiles are built once, so the same snapshot can
/// personalize several programs without further reads.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonalizationData {
    user_id: UserID,
    settings: Settings,
    graph: RelationshipGraph,
    one_rep_maxes: OneRepMaxes,
    profiles: VelocityProfiles,
}

impl PersonalizationData {
    #[must_use]
    pub fn new(
        user_id: UserID,
        settings: Settings,
        one_rep_maxes: &[OneRepMaxRecord],
        relationships: &[ExerciseRelationship],
        attempts: &[VelocityAttempt],
        exercises: &[Exercise],
    ) -> Self {
        Self {
            user_id,
            settings,
            graph: RelationshipGraph::from_relationships(
                relationships,
                settings.relationship_type,
            ),
            one_rep_maxes: OneRepMaxes::new(user_id, one_rep_maxes),
            profiles: VelocityProfiles::new(
                user_id,
                attempts,
                &terminal_velocities(exercises),
                settings.min_velocity_points(),
            ),
        }
    }

    #[must_use]
    pub fn user_id(&self) -> UserID {
        self.user_id
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn graph(&self) -> &RelationshipGraph {
        &self.graph
    }

    #[must_use]
    pub fn one_rep_maxes(&self) -> &OneRepMaxes {
        &self.one_rep_maxes
    }

    #[must_use]
    pub fn profiles(&self) -> &VelocityProfiles {
        &self.profiles
    }

    #[must_use]
    pub fn personalize_exercise(&self, exercise: &ProgramExercise) -> ProgramExercise {
        self.recalculate(exercise, &mut RecalculationReport::default())
    }

    #[must_use]
    pub fn personalize_weeks(&self, weeks: &[Week]) -> Vec<Week> {
        self.personalize_weeks_with_report(weeks).0
    }

    #[must_use]
    pub fn personalize_weeks_with_report(
        &self,
        weeks: &[Week],
    ) -> (Vec<Week>, RecalculationReport) {
        let mut report = RecalculationReport::default();
        let mut personalized = Vec::with_capacity(weeks.len());

        for week in weeks {
            personalized.push(
                week.map_exercises(&mut |e: &ProgramExercise| self.recalculate(e, &mut report)),
            );
        }

        self.log_report(&report);

        (personalized, report)
    }

    #[must_use]
    pub fn personalize_program(&self, program: &Program) -> Program {
        Program {
            weeks: self.personalize_weeks(&program.weeks),
            ..program.clone()
        }
    }

    fn recalculate(
        &self,
        exercise: &ProgramExercise,
        report: &mut RecalculationReport,
    ) -> ProgramExercise {
        report.exercises += 1;

        let Some(percentage) = exercise.percentage() else {
            report.without_percentage += 1;
            return exercise.clone();
        };

        let Some(one_rep_max) = self.one_rep_maxes.resolve(
            exercise.exercise_id,
            &self.graph,
            self.settings.one_rep_max_fallback,
        ) else {
            report.without_one_rep_max += 1;
            return exercise.clone();
        };

        let Some(kg) = target_kg(one_rep_max.weight, percentage) else {
            debug!(
                "load for exercise {} out of range: {} % of {} kg",
                exercise.exercise_id,
                f64::from(percentage),
                f64::from(one_rep_max.weight)
            );
            report.out_of_range += 1;
            return exercise.clone();
        };

        report.loads += 1;

        let velocity = self
            .profiles
            .predict(
                exercise.exercise_id,
                percentage,
                one_rep_max.weight,
                &self.graph,
            )
            .map(|v| v.rounded(self.settings.velocity_decimals));

        if velocity.is_some() {
            report.velocities += 1;
        }

        ProgramExercise {
            kg: kg.to_string(),
            velocity_ms: velocity.map(f64::from).or(exercise.velocity_ms),
            ..exercise.clone()
        }
    }

    fn log_report(&self, report: &RecalculationReport) {
        info!(
            "personalized {} exercises for user {}: {} loads, {} velocities, {} without percentage, {} without one-rep max, {} out of range",
            report.exercises,
            self.user_id,
            report.loads,
            report.velocities,
            report.without_percentage,
            report.without_one_rep_max,
            report.out_of_range
        );
    }
}

/// Counts of a single recalculation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RecalculationReport {
    pub exercises: usize,
    pub loads: usize,
    pub velocities: usize,
    pub without_percentage: usize,
    pub without_one_rep_max: usize,
    pub out_of_range: usize,
}
