use liftplan_domain as domain;
use uuid::Uuid;

use crate::SnapshotError;

pub fn read_program(json: &str) -> Result<domain::Program, SnapshotError> {
    Ok(serde_json::from_str::<Program>(json)?.into())
}

pub fn write_program(program: &domain::Program) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string(&Program::from(program))?)
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct Program {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub weeks: Vec<Week>,
}

impl From<&domain::Program> for Program {
    fn from(value: &domain::Program) -> Self {
        Self {
            id: *value.id,
            name: value.name.clone(),
            weeks: value.weeks.iter().map(Week::from).collect(),
        }
    }
}

impl From<Program> for domain::Program {
    fn from(value: Program) -> Self {
        Self {
            id: value.id.into(),
            name: value.name,
            weeks: value.weeks.into_iter().map(domain::Week::from).collect(),
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct Week {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub days: Vec<Day>,
}

impl From<&domain::Week> for Week {
    fn from(value: &domain::Week) -> Self {
        Self {
            name: value.name.clone(),
            days: value.days.iter().map(Day::from).collect(),
        }
    }
}

impl From<Week> for domain::Week {
    fn from(value: Week) -> Self {
        Self {
            name: value.name,
            days: value.days.into_iter().map(domain::Day::from).collect(),
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct Day {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl From<&domain::Day> for Day {
    fn from(value: &domain::Day) -> Self {
        Self {
            name: value.name.clone(),
            blocks: value.blocks.iter().map(Block::from).collect(),
        }
    }
}

impl From<Day> for domain::Day {
    fn from(value: Day) -> Self {
        Self {
            name: value.name,
            blocks: value.blocks.into_iter().map(domain::Block::from).collect(),
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct Block {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub exercises: Vec<ProgramExercise>,
}

impl From<&domain::Block> for Block {
    fn from(value: &domain::Block) -> Self {
        Self {
            name: value.name.clone(),
            exercises: value.exercises.iter().map(ProgramExercise::from).collect(),
        }
    }
}

impl From<Block> for domain::Block {
    fn from(value: Block) -> Self {
        Self {
            name: value.name,
            exercises: value
                .exercises
                .into_iter()
                .map(domain::ProgramExercise::from)
                .collect(),
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ProgramExercise {
    pub exercise_id: Uuid,
    #[serde(rename = "percentage1RM", deserialize_with = "text_or_number")]
    pub percentage_1rm: String,
    #[serde(deserialize_with = "text_or_number")]
    pub kg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub velocity_ms: Option<f64>,
    pub sets: String,
    pub reps: String,
    pub tempo: String,
    pub rest: String,
    pub notes: String,
}

/// Authored programs write numeric cells either as text or as JSON numbers.
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Number(serde_json::Number),
}

fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match serde::Deserialize::deserialize(deserializer)? {
        TextOrNumber::Text(text) => Ok(text),
        TextOrNumber::Number(number) => Ok(number.to_string()),
    }
}

impl From<&domain::ProgramExercise> for ProgramExercise {
    fn from(value: &domain::ProgramExercise) -> Self {
        Self {
            exercise_id: *value.exercise_id,
            percentage_1rm: value.percentage_1rm.clone(),
            kg: value.kg.clone(),
            velocity_ms: value.velocity_ms,
            sets: value.sets.clone(),
            reps: value.reps.clone(),
            tempo: value.tempo.clone(),
            rest: value.rest.clone(),
            notes: value.notes.clone(),
        }
    }
}

impl From<ProgramExercise> for domain::ProgramExercise {
    fn from(value: ProgramExercise) -> Self {
        Self {
            exercise_id: value.exercise_id.into(),
            percentage_1rm: value.percentage_1rm,
            kg: value.kg,
            velocity_ms: value.velocity_ms,
            sets: value.sets,
            reps: value.reps,
            tempo: value.tempo,
            rest: value.rest,
            notes: value.notes,
        }
    }
}
