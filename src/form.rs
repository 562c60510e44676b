use serde::{Deserialize, Serialize};

use crate::types::workout::{WorkoutDraft, WorkoutKind};

/// Raw values as typed into the workout form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormInput {
    #[serde(rename = "type")]
    pub kind: WorkoutKind,
    #[serde(default)]
    pub distance: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub cadence: String,
    #[serde(default, alias = "elevationGain")]
    pub elevation: String,
}

impl FormInput {
    pub fn running(distance: &str, duration: &str, cadence: &str) -> Self {
        Self {
            kind: WorkoutKind::Running,
            distance: distance.to_string(),
            duration: duration.to_string(),
            cadence: cadence.to_string(),
            elevation: String::new(),
        }
    }

    pub fn cycling(distance: &str, duration: &str, elevation: &str) -> Self {
        Self {
            kind: WorkoutKind::Cycling,
            distance: distance.to_string(),
            duration: duration.to_string(),
            cadence: String::new(),
            elevation: elevation.to_string(),
        }
    }

    pub fn to_draft(&self) -> WorkoutDraft {
        WorkoutDraft {
            kind: self.kind,
            distance: read_number(&self.distance),
            duration: read_number(&self.duration),
            cadence: read_number(&self.cadence),
            elevation_gain: read_number(&self.elevation),
        }
    }
}

// Empty fields read as 0 and garbage as NaN, so both fail validation where
// the field is required.
fn read_number(raw: &str) -> f64 {
    let raw = raw.trim();
    if raw.is_empty() {
        return 0.0;
    }
    raw.parse().unwrap_or(f64::NAN)
}
