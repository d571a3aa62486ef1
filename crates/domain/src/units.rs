use derive_more::Into;

/// A share of the one-repetition maximum, as authored in a program.
#[derive(Debug, Clone, Copy, Into, PartialEq, PartialOrd)]
pub struct Percentage(f64);

impl Percentage {
    pub fn new(value: f64) -> Result<Self, PercentageError> {
        if !value.is_finite() {
            return Err(PercentageError::ParseError);
        }

        if value <= 0.0 {
            return Err(PercentageError::NotPositive);
        }

        Ok(Self(value))
    }

    /// The load this percentage represents for the given one-repetition maximum.
    #[must_use]
    pub fn of(self, one_rep_max: Weight) -> f64 {
        f64::from(one_rep_max) * self.0 / 100.0
    }
}

impl TryFrom<&str> for Percentage {
    type Error = PercentageError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().replace(',', ".");

        if normalized.is_empty() {
            return Err(PercentageError::Missing);
        }

        match normalized.parse::<f64>() {
            Ok(parsed_value) => Percentage::new(parsed_value),
            Err(_) => Err(PercentageError::ParseError),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum PercentageError {
    #[error("Percentage must not be empty")]
    Missing,
    #[error("Percentage must be greater than zero")]
    NotPositive,
    #[error("Percentage must be a decimal")]
    ParseError,
}

/// Load in kilograms.
#[derive(Debug, Clone, Copy, Into, PartialEq, PartialOrd)]
pub struct Weight(f64);

impl Weight {
    pub fn new(value: f64) -> Result<Self, WeightError> {
        if !value.is_finite() {
            return Err(WeightError::NotFinite);
        }

        if value < 0.0 {
            return Err(WeightError::Negative);
        }

        Ok(Self(value))
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum WeightError {
    #[error("Weight must not be negative")]
    Negative,
    #[error("Weight must be a finite number")]
    NotFinite,
}

/// Mean concentric velocity in metres per second.
#[derive(Debug, Clone, Copy, Into, PartialEq, PartialOrd)]
pub struct Velocity(f64);

impl Velocity {
    pub fn new(value: f64) -> Result<Self, VelocityError> {
        if !value.is_finite() {
            return Err(VelocityError::NotFinite);
        }

        if value <= 0.0 {
            return Err(VelocityError::NotPositive);
        }

        Ok(Self(value))
    }

    /// Round to the given number of decimal places.
    #[must_use]
    pub fn rounded(self, decimals: u8) -> Self {
        let factor = 10_f64.powi(i32::from(decimals));
        let value = (self.0 * factor).round() / factor;
        if value > 0.0 { Self(value) } else { self }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum VelocityError {
    #[error("Velocity must be greater than zero")]
    NotPositive,
    #[error("Velocity must be a finite number")]
    NotFinite,
}
