#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod error;
mod exercise;
mod load;
mod one_rep_max;
mod personalization;
mod program;
mod relationship;
mod service;
mod settings;
mod units;
mod user;
mod velocity;

pub use error::*;
pub use exercise::*;
pub use load::*;
pub use one_rep_max::*;
pub use personalization::*;
pub use program::*;
pub use relationship::*;
pub use service::*;
pub use settings::*;
pub use units::*;
pub use user::*;
pub use velocity::*;
