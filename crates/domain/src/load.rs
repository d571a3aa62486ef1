use crate::{Percentage, Weight};

/// Largest load in kilograms that is still represented exactly as an integer.
pub const MAX_LOAD: f64 = 9_007_199_254_740_992.0;

/// Round a calculated load to an even number of kilograms.
///
/// The load is rounded to the nearest integer first. If that integer is odd, it is
/// replaced by whichever even neighbour is closer to the calculated load. An exact tie
/// goes to the upper neighbour. Returns `None` for loads that are not finite or exceed
/// `MAX_LOAD` in magnitude.
#[must_use]
pub fn round_to_even_kg(load: f64) -> Option<i64> {
    if !load.is_finite() || load.abs() > MAX_LOAD {
        return None;
    }

    #[allow(clippy::cast_possible_truncation)]
    let nearest = load.round() as i64;

    if nearest % 2 == 0 {
        return Some(nearest);
    }

    let lower = nearest.checked_sub(1)?;
    let upper = nearest.checked_add(1)?;

    #[allow(clippy::cast_precision_loss)]
    let closer_to_lower = load - (lower as f64) < (upper as f64) - load;

    Some(if closer_to_lower { lower } else { upper })
}

/// The even-rounded target load for a share of the one-repetition maximum.
#[must_use]
pub fn target_kg(one_rep_max: Weight, percentage: Percentage) -> Option<i64> {
    round_to_even_kg(percentage.of(one_rep_max))
}
