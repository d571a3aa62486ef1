use std::collections::BTreeSet;

use derive_more::{Deref, Display};
use uuid::Uuid;

use crate::{ExerciseID, Percentage};

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub id: ProgramID,
    pub name: String,
    pub weeks: Vec<Week>,
}

impl Program {
    pub fn exercises(&self) -> impl Iterator<Item = &ProgramExercise> {
        self.weeks.iter().flat_map(Week::exercises)
    }

    #[must_use]
    pub fn exercise_ids(&self) -> BTreeSet<ExerciseID> {
        self.exercises().map(|e| e.exercise_id).collect()
    }

    /// Rebuild the program with every exercise replaced by the result of `f`.
    #[must_use]
    pub fn map_exercises(&self, mut f: impl FnMut(&ProgramExercise) -> ProgramExercise) -> Self {
        Self {
            id: self.id,
            name: self.name.clone(),
            weeks: self.weeks.iter().map(|w| w.map_exercises(&mut f)).collect(),
        }
    }
}

#[derive(Deref, Debug, Display, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ProgramID(Uuid);

impl ProgramID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for ProgramID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for ProgramID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Week {
    pub name: String,
    pub days: Vec<Day>,
}

impl Week {
    pub fn exercises(&self) -> impl Iterator<Item = &ProgramExercise> {
        self.days.iter().flat_map(Day::exercises)
    }

    #[must_use]
    pub fn map_exercises(&self, f: &mut impl FnMut(&ProgramExercise) -> ProgramExercise) -> Self {
        Self {
            name: self.name.clone(),
            days: self.days.iter().map(|d| d.map_exercises(f)).collect(),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Day {
    pub name: String,
    pub blocks: Vec<Block>,
}

impl Day {
    pub fn exercises(&self) -> impl Iterator<Item = &ProgramExercise> {
        self.blocks.iter().flat_map(|b| b.exercises.iter())
    }

    #[must_use]
    pub fn map_exercises(&self, f: &mut impl FnMut(&ProgramExercise) -> ProgramExercise) -> Self {
        Self {
            name: self.name.clone(),
            blocks: self.blocks.iter().map(|b| b.map_exercises(f)).collect(),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Block {
    pub name: String,
    pub exercises: Vec<ProgramExercise>,
}

impl Block {
    #[must_use]
    pub fn map_exercises(&self, f: &mut impl FnMut(&ProgramExercise) -> ProgramExercise) -> Self {
        Self {
            name: self.name.clone(),
            exercises: self.exercises.iter().map(f).collect(),
        }
    }
}

/// An exercise as authored in a program.
///
/// Besides `kg` and `velocity_ms`, all fields are free-form text owned by the author.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ProgramExercise {
    pub exercise_id: ExerciseID,
    pub percentage_1rm: String,
    pub kg: String,
    pub velocity_ms: Option<f64>,
    pub sets: String,
    pub reps: String,
    pub tempo: String,
    pub rest: String,
    pub notes: String,
}

impl ProgramExercise {
    /// The authored share of the one-repetition maximum, if it is a positive number.
    #[must_use]
    pub fn percentage(&self) -> Option<Percentage> {
        Percentage::try_from(self.percentage_1rm.as_str()).ok()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn exercise(exercise_id: u128, percentage_1rm: &str) -> ProgramExercise {
        ProgramExercise {
            exercise_id: exercise_id.into(),
            percentage_1rm: percentage_1rm.to_string(),
            reps: String::from("5"),
            ..ProgramExercise::default()
        }
    }

    static PROGRAM: std::sync::LazyLock<Program> = std::sync::LazyLock::new(|| Program {
        id: 1.into(),
        name: String::from("Strength Block"),
        weeks: vec![
            Week {
                name: String::from("Week 1"),
                days: vec![
                    Day {
                        name: String::from("Day 1"),
                        blocks: vec![
                            Block {
                                name: String::from("A"),
                                exercises: vec![exercise(1, "80"), exercise(2, "")],
                            },
                            Block {
                                name: String::from("B"),
                                exercises: vec![exercise(3, "70")],
                            },
                        ],
                    },
                    Day {
                        name: String::from("Day 2"),
                        blocks: vec![],
                    },
                ],
            },
            Week {
                name: String::from("Week 2"),
                days: vec![Day {
                    name: String::from("Day 1"),
                    blocks: vec![Block {
                        name: String::from("A"),
                        exercises: vec![exercise(1, "85")],
                    }],
                }],
            },
        ],
    });

    #[test]
    fn test_program_exercises() {
        assert_eq!(
            PROGRAM
                .exercises()
                .map(|e| e.percentage_1rm.as_str())
                .collect::<Vec<_>>(),
            vec!["80", "", "70", "85"]
        );
        assert_eq!(
            PROGRAM.exercise_ids(),
            BTreeSet::from([1.into(), 2.into(), 3.into()])
        );
    }

    #[test]
    fn test_program_map_exercises_keeps_shape() {
        let mut visited = vec![];
        let mapped = PROGRAM.map_exercises(|e| {
            visited.push(e.exercise_id);
            ProgramExercise {
                kg: String::from("1"),
                ..e.clone()
            }
        });
        assert_eq!(visited, vec![1.into(), 2.into(), 3.into(), 1.into()]);
        assert_eq!(mapped.id, PROGRAM.id);
        assert_eq!(mapped.name, PROGRAM.name);
        assert_eq!(mapped.weeks.len(), 2);
        assert_eq!(mapped.weeks[0].days.len(), 2);
        assert_eq!(mapped.weeks[0].days[0].blocks.len(), 2);
        assert!(mapped.weeks[0].days[1].blocks.is_empty());
        assert!(mapped.exercises().all(|e| e.kg == "1"));
        assert!(PROGRAM.exercises().all(|e| e.kg.is_empty()));
    }

    #[test]
    fn test_program_map_exercises_identity() {
        assert_eq!(PROGRAM.map_exercises(Clone::clone), *PROGRAM);
    }

    #[rstest]
    #[case("80", Some(80.0))]
    #[case("82,5", Some(82.5))]
    #[case("", None)]
    #[case("0", None)]
    #[case("max", None)]
    fn test_program_exercise_percentage(#[case] input: &str, #[case] expected: Option<f64>) {
        assert_eq!(exercise(1, input).percentage().map(f64::from), expected);
    }
}
