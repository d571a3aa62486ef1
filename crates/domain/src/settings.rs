use crate::{GroupFallback, RelationshipType, VelocityProfile};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Relationships of this type link exercises whose data may substitute for each other.
    pub relationship_type: RelationshipType,
    /// Usable velocity attempts required for a profile, at least two.
    pub min_velocity_points: usize,
    pub one_rep_max_fallback: GroupFallback,
    /// Decimal places of predicted velocities.
    pub velocity_decimals: u8,
}

impl Settings {
    #[must_use]
    pub fn min_velocity_points(&self) -> usize {
        self.min_velocity_points.max(VelocityProfile::MIN_POINTS)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            relationship_type: RelationshipType::StrengthVariant,
            min_velocity_points: VelocityProfile::MIN_POINTS,
            one_rep_max_fallback: GroupFallback::MostRecent,
            velocity_decimals: 2,
        }
    }
}
