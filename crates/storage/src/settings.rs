use liftplan_domain as domain;

use crate::SnapshotError;

/// Read settings from JSON. Missing fields take their default value.
pub fn read_settings(json: &str) -> Result<domain::Settings, SnapshotError> {
    Ok(serde_json::from_str::<Settings>(json)?.try_into()?)
}

pub fn write_settings(settings: &domain::Settings) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string(&Settings::from(settings))?)
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub relationship_type: String,
    pub min_velocity_points: usize,
    pub one_rep_max_fallback: String,
    pub velocity_decimals: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from(&domain::Settings::default())
    }
}

impl From<&domain::Settings> for Settings {
    fn from(value: &domain::Settings) -> Self {
        Self {
            relationship_type: value.relationship_type.to_string(),
            min_velocity_points: value.min_velocity_points,
            one_rep_max_fallback: value.one_rep_max_fallback.to_string(),
            velocity_decimals: value.velocity_decimals,
        }
    }
}

impl TryFrom<Settings> for domain::Settings {
    type Error = strum::ParseError;

    fn try_from(value: Settings) -> Result<Self, Self::Error> {
        Ok(Self {
            relationship_type: value.relationship_type.parse()?,
            min_velocity_points: value.min_velocity_points,
            one_rep_max_fallback: value.one_rep_max_fallback.parse()?,
            velocity_decimals: value.velocity_decimals,
        })
    }
}
