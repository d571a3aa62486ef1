#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

use liftplan_domain as domain;

pub mod in_memory;
pub mod program;
pub mod settings;

pub use in_memory::InMemory;
pub use program::{read_program, write_program};
pub use settings::{read_settings, write_settings};

#[derive(thiserror::Error, Debug)]
pub enum SnapshotError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("invalid value: {0}")]
    Parse(#[from] strum::ParseError),
    #[error(transparent)]
    Velocity(#[from] domain::VelocityError),
    #[error(transparent)]
    Weight(#[from] domain::WeightError),
}
