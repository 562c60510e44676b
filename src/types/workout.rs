use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::types::coords::Coords;

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutKind {
    Running,
    Cycling,
}

impl WorkoutKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "running" => Some(WorkoutKind::Running),
            "cycling" => Some(WorkoutKind::Cycling),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkoutKind::Running => "running",
            WorkoutKind::Cycling => "cycling",
        }
    }

    pub fn popup_icon(&self) -> &'static str {
        match self {
            WorkoutKind::Running => "🏃‍♂️",
            WorkoutKind::Cycling => "🚴‍♀️",
        }
    }

    /// CSS class the map widget applies to this kind's popups.
    pub fn popup_class(&self) -> &'static str {
        match self {
            WorkoutKind::Running => "running-popup",
            WorkoutKind::Cycling => "cycling-popup",
        }
    }
}

/// Variant-specific measurement and the metric derived from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Variant {
    /// `pace` is minutes per kilometer.
    Running { cadence: f64, pace: f64 },
    /// `speed` is kilometers per hour.
    Cycling { elevation_gain: f64, speed: f64 },
}

impl Variant {
    fn running(distance: f64, duration: f64, cadence: f64) -> Self {
        Variant::Running {
            cadence,
            pace: duration / distance,
        }
    }

    fn cycling(distance: f64, duration: f64, elevation_gain: f64) -> Self {
        Variant::Cycling {
            elevation_gain,
            speed: distance / (duration / 60.0),
        }
    }

    pub fn kind(&self) -> WorkoutKind {
        match self {
            Variant::Running { .. } => WorkoutKind::Running,
            Variant::Cycling { .. } => WorkoutKind::Cycling,
        }
    }
}

/// A recorded session. Everything except `click_count` is fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    id: String,
    date: DateTime<Utc>,
    coords: Coords,
    distance: f64,
    duration: f64,
    description: String,
    click_count: u32,
    variant: Variant,
}

impl Workout {
    /// Builds a running workout. Inputs are not validated; see [`WorkoutDraft`].
    pub fn running(coords: Coords, distance: f64, duration: f64, cadence: f64) -> Self {
        Self::assemble(
            new_id(),
            Utc::now(),
            coords,
            distance,
            duration,
            0,
            Variant::running(distance, duration, cadence),
        )
    }

    pub fn cycling(coords: Coords, distance: f64, duration: f64, elevation_gain: f64) -> Self {
        Self::assemble(
            new_id(),
            Utc::now(),
            coords,
            distance,
            duration,
            0,
            Variant::cycling(distance, duration, elevation_gain),
        )
    }

    /// Rebuilds a workout from its stored record through the same constructors,
    /// so `pace`/`speed`/`description` are recomputed rather than trusted.
    pub fn restore(record: &WorkoutRecord) -> Result<Self, ValidationError> {
        if !record.coords.is_finite() {
            return Err(ValidationError::NonFinite("coordinates"));
        }
        check_positive("distance", record.distance)?;
        check_positive("duration", record.duration)?;

        let variant = match record.kind {
            WorkoutKind::Running => {
                let cadence = record.cadence.ok_or(ValidationError::Missing("cadence"))?;
                check_positive("cadence", cadence)?;
                Variant::running(record.distance, record.duration, cadence)
            }
            WorkoutKind::Cycling => {
                let elevation_gain = record
                    .elevation_gain
                    .ok_or(ValidationError::Missing("elevation gain"))?;
                check_finite("elevation gain", elevation_gain)?;
                Variant::cycling(record.distance, record.duration, elevation_gain)
            }
        };

        Ok(Self::assemble(
            record.id.clone(),
            record.date,
            record.coords,
            record.distance,
            record.duration,
            record.click_count,
            variant,
        ))
    }

    fn assemble(
        id: String,
        date: DateTime<Utc>,
        coords: Coords,
        distance: f64,
        duration: f64,
        click_count: u32,
        variant: Variant,
    ) -> Self {
        Self {
            description: describe(&date, variant.kind()),
            id,
            date,
            coords,
            distance,
            duration,
            click_count,
            variant,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn coords(&self) -> Coords {
        self.coords
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn click_count(&self) -> u32 {
        self.click_count
    }

    pub fn variant(&self) -> &Variant {
        &self.variant
    }

    pub fn kind(&self) -> WorkoutKind {
        self.variant.kind()
    }

    /// Minutes per kilometer, for running workouts.
    pub fn pace(&self) -> Option<f64> {
        match self.variant {
            Variant::Running { pace, .. } => Some(pace),
            Variant::Cycling { .. } => None,
        }
    }

    /// Kilometers per hour, for cycling workouts.
    pub fn speed(&self) -> Option<f64> {
        match self.variant {
            Variant::Cycling { speed, .. } => Some(speed),
            Variant::Running { .. } => None,
        }
    }

    pub fn popup_content(&self) -> String {
        format!("{} {}", self.kind().popup_icon(), self.description)
    }

    pub fn click(&mut self) {
        self.click_count = self.click_count.saturating_add(1);
    }
}

/// `"<Capitalized type> on <Month> <day>"`, e.g. `"Running on March 14"`.
pub fn describe(date: &DateTime<Utc>, kind: WorkoutKind) -> String {
    format!(
        "{} on {} {}",
        capitalize(kind.as_str()),
        MONTHS[date.month0() as usize],
        date.day()
    )
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn check_finite(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NonFinite(field))
    }
}

fn check_positive(field: &'static str, value: f64) -> Result<(), ValidationError> {
    check_finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::NotPositive(field))
    }
}

/// Numeric form values for a workout that has not been validated yet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkoutDraft {
    pub kind: WorkoutKind,
    pub distance: f64,
    pub duration: f64,
    pub cadence: f64,
    pub elevation_gain: f64,
}

impl WorkoutDraft {
    /// All required fields must be finite; distance, duration and (for running)
    /// cadence must also be strictly positive. Elevation gain may be zero or
    /// negative.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.kind {
            WorkoutKind::Running => {
                check_finite("distance", self.distance)?;
                check_finite("duration", self.duration)?;
                check_finite("cadence", self.cadence)?;
                check_positive("distance", self.distance)?;
                check_positive("duration", self.duration)?;
                check_positive("cadence", self.cadence)
            }
            WorkoutKind::Cycling => {
                check_finite("distance", self.distance)?;
                check_finite("duration", self.duration)?;
                check_finite("elevation gain", self.elevation_gain)?;
                check_positive("distance", self.distance)?;
                check_positive("duration", self.duration)
            }
        }
    }

    pub fn build(&self, coords: Coords) -> Result<Workout, ValidationError> {
        self.validate()?;
        Ok(match self.kind {
            WorkoutKind::Running => {
                Workout::running(coords, self.distance, self.duration, self.cadence)
            }
            WorkoutKind::Cycling => {
                Workout::cycling(coords, self.distance, self.duration, self.elevation_gain)
            }
        })
    }
}

/// Flat persisted shape of a workout, one JSON object per entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutRecord {
    pub id: String,
    pub date: DateTime<Utc>,
    pub coords: Coords,
    pub distance: f64,
    pub duration: f64,
    #[serde(rename = "type")]
    pub kind: WorkoutKind,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub click_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cadence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pace: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation_gain: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
}

impl From<&Workout> for WorkoutRecord {
    fn from(workout: &Workout) -> Self {
        let (cadence, pace, elevation_gain, speed) = match workout.variant {
            Variant::Running { cadence, pace } => (Some(cadence), Some(pace), None, None),
            Variant::Cycling {
                elevation_gain,
                speed,
            } => (None, None, Some(elevation_gain), Some(speed)),
        };

        Self {
            id: workout.id.clone(),
            date: workout.date,
            coords: workout.coords,
            distance: workout.distance,
            duration: workout.duration,
            kind: workout.kind(),
            description: workout.description.clone(),
            click_count: workout.click_count,
            cadence,
            pace,
            elevation_gain,
            speed,
        }
    }
}
