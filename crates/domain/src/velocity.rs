use std::collections::BTreeMap;

use log::debug;

use crate::{ExerciseID, Percentage, ReadError, RelationshipGraph, UserID, Velocity, Weight};

#[allow(async_fn_in_trait)]
pub trait VelocityAttemptRepository {
    /// Read the velocity attempts of a user that have a positive velocity.
    async fn read_velocity_attempts(
        &self,
        user_id: UserID,
    ) -> Result<Vec<VelocityAttempt>, ReadError>;
}

/// A recorded set with the load lifted and the velocity measured.
#[derive(Debug, Clone, PartialEq)]
pub struct VelocityAttempt {
    pub exercise_id: ExerciseID,
    pub user_id: UserID,
    pub weight_kg: f64,
    pub velocity_ms: Option<f64>,
}

impl VelocityAttempt {
    /// The attempt as a model input, if both load and velocity are usable.
    #[must_use]
    pub fn point(&self) -> Option<LoadVelocityPoint> {
        Some(LoadVelocityPoint {
            weight: Weight::new(self.weight_kg).ok()?,
            velocity: Velocity::new(self.velocity_ms?).ok()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadVelocityPoint {
    pub weight: Weight,
    pub velocity: Velocity,
}

/// Linear load-velocity model of one exercise for one athlete.
///
/// The model is an ordinary least squares fit of velocity on load. Within and below the
/// observed load range the fitted line is used. Above the heaviest observed load, the
/// terminal velocity (if known) anchors the prediction: velocities are interpolated between
/// the fitted value at the heaviest observed load and the terminal velocity at the
/// one-repetition maximum, and stay at the terminal velocity beyond it.
#[derive(Debug, Clone, PartialEq)]
pub struct VelocityProfile {
    slope: f64,
    intercept: f64,
    r_squared: f64,
    points: usize,
    min_load: f64,
    max_load: f64,
    terminal_velocity: Option<Velocity>,
}

impl VelocityProfile {
    pub const MIN_POINTS: usize = 2;

    /// Fit a profile, or return `None` if the points do not determine a line.
    #[must_use]
    pub fn build(
        points: &[LoadVelocityPoint],
        terminal_velocity: Option<Velocity>,
    ) -> Option<VelocityProfile> {
        if points.len() < Self::MIN_POINTS {
            return None;
        }

        let data = points
            .iter()
            .map(|p| (f64::from(p.weight), f64::from(p.velocity)))
            .collect::<Vec<_>>();
        let (slope, intercept, r_squared) = linear_regression(&data)?;

        Some(VelocityProfile {
            slope,
            intercept,
            r_squared,
            points: data.len(),
            min_load: data.iter().map(|(x, _)| *x).fold(f64::INFINITY, f64::min),
            max_load: data.iter().map(|(x, _)| *x).fold(f64::NEG_INFINITY, f64::max),
            terminal_velocity,
        })
    }

    /// Predicted velocity at a share of the one-repetition maximum.
    #[must_use]
    pub fn predict(&self, percentage: Percentage, one_rep_max: Weight) -> Option<Velocity> {
        self.velocity_at(percentage.of(one_rep_max), one_rep_max)
    }

    /// Predicted velocity at an absolute load.
    ///
    /// Returns `None` if the model yields no positive velocity for the load.
    #[must_use]
    pub fn velocity_at(&self, load: f64, one_rep_max: Weight) -> Option<Velocity> {
        if !load.is_finite() || load < 0.0 {
            return None;
        }

        let one_rep_max = f64::from(one_rep_max);
        let value = match self.terminal_velocity {
            Some(anchor) if load > self.max_load && one_rep_max > self.max_load => {
                let edge = self.fitted(self.max_load);
                let share = ((load - self.max_load) / (one_rep_max - self.max_load)).min(1.0);
                share.mul_add(f64::from(anchor) - edge, edge)
            }
            _ => self.fitted(load),
        };

        Velocity::new(value).ok()
    }

    fn fitted(&self, load: f64) -> f64 {
        self.slope.mul_add(load, self.intercept)
    }

    #[must_use]
    pub fn slope(&self) -> f64 {
        self.slope
    }

    #[must_use]
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Coefficient of determination of the fit.
    #[must_use]
    pub fn r_squared(&self) -> f64 {
        self.r_squared
    }

    #[must_use]
    pub fn points(&self) -> usize {
        self.points
    }

    #[must_use]
    pub fn load_range(&self) -> (f64, f64) {
        (self.min_load, self.max_load)
    }

    #[must_use]
    pub fn terminal_velocity(&self) -> Option<Velocity> {
        self.terminal_velocity
    }
}

/// Least squares fit of (x, y) pairs, returning slope, intercept and R².
fn linear_regression(points: &[(f64, f64)]) -> Option<(f64, f64, f64)> {
    #[allow(clippy::cast_precision_loss)]
    let n = points.len() as f64;

    let sum_x: f64 = points.iter().map(|(x, _)| x).sum();
    let sum_y: f64 = points.iter().map(|(_, y)| y).sum();
    let sum_xy: f64 = points.iter().map(|(x, y)| x * y).sum();
    let sum_xx: f64 = points.iter().map(|(x, _)| x * x).sum();

    let denominator = n.mul_add(sum_xx, -(sum_x * sum_x));
    if denominator.abs() < 1e-10 {
        return None;
    }

    let slope = n.mul_add(sum_xy, -(sum_x * sum_y)) / denominator;
    let intercept = slope.mul_add(-sum_x, sum_y) / n;

    let mean_y = sum_y / n;
    let ss_tot: f64 = points.iter().map(|(_, y)| (y - mean_y).powi(2)).sum();
    let ss_res: f64 = points
        .iter()
        .map(|(x, y)| (y - slope.mul_add(*x, intercept)).powi(2))
        .sum();
    let r_squared = if ss_tot > 0.0 {
        1.0 - ss_res / ss_tot
    } else {
        0.0
    };

    if slope.is_finite() && intercept.is_finite() {
        Some((slope, intercept, r_squared))
    } else {
        None
    }
}

/// The load-velocity profiles of all exercises of one athlete.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct VelocityProfiles {
    profiles: BTreeMap<ExerciseID, VelocityProfile>,
}

impl VelocityProfiles {
    /// Build one profile per exercise from the usable attempts of the given user.
    ///
    /// Exercises with fewer than `min_points` usable attempts (and never fewer than two)
    /// get no profile.
    #[must_use]
    pub fn new(
        user_id: UserID,
        attempts: &[VelocityAttempt],
        terminal_velocities: &BTreeMap<ExerciseID, Velocity>,
        min_points: usize,
    ) -> Self {
        let min_points = min_points.max(VelocityProfile::MIN_POINTS);
        let mut points: BTreeMap<ExerciseID, Vec<LoadVelocityPoint>> = BTreeMap::new();

        for attempt in attempts.iter().filter(|a| a.user_id == user_id) {
            if let Some(point) = attempt.point() {
                points.entry(attempt.exercise_id).or_default().push(point);
            }
        }

        let profiles = points
            .into_iter()
            .filter_map(|(exercise_id, points)| {
                if points.len() < min_points {
                    debug!(
                        "no velocity profile for exercise {exercise_id}: {} of {min_points} points",
                        points.len()
                    );
                    return None;
                }
                let profile = VelocityProfile::build(
                    &points,
                    terminal_velocities.get(&exercise_id).copied(),
                );
                if profile.is_none() {
                    debug!("no velocity profile for exercise {exercise_id}: degenerate points");
                }
                profile.map(|p| (exercise_id, p))
            })
            .collect();

        Self { profiles }
    }

    #[must_use]
    pub fn get(&self, exercise_id: ExerciseID) -> Option<&VelocityProfile> {
        self.profiles.get(&exercise_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Predict the velocity of an exercise, falling back to linked exercises.
    ///
    /// The exercise's own profile is tried first, then the profiles of linked exercises in
    /// ascending ID order. The first profile yielding a velocity wins.
    #[must_use]
    pub fn predict(
        &self,
        exercise_id: ExerciseID,
        percentage: Percentage,
        one_rep_max: Weight,
        graph: &RelationshipGraph,
    ) -> Option<Velocity> {
        std::iter::once(exercise_id)
            .chain(graph.linked(exercise_id))
            .find_map(|id| {
                let velocity = self.get(id)?.predict(percentage, one_rep_max)?;
                if id != exercise_id {
                    debug!("using velocity profile of exercise {id} for exercise {exercise_id}");
                }
                Some(velocity)
            })
    }
}
