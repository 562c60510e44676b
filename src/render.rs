use std::time::Duration;

use crate::types::workout::{Variant, Workout, WorkoutKind};

/// Blocking user-facing messages (the browser's `alert`).
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    PositionUnavailable(String),
    InvalidInput(String),
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::PositionUnavailable(reason) => {
                write!(f, "Could not get your position ({})", reason)
            }
            Notice::InvalidInput(reason) => write!(f, "Inputs have to be positive numbers ({})", reason),
        }
    }
}

/// The page: workout list, input form and notices.
pub trait Renderer {
    /// Inserts a list entry. The entry must carry `workout.id()` so clicks on
    /// it can be mapped back.
    fn render_workout(&mut self, workout: &Workout);
    fn clear_workouts(&mut self);
    fn show_form(&mut self);
    fn focus_distance(&mut self);
    fn clear_form(&mut self);
    /// Hides the form; its layout is re-revealed after `restore_after`.
    fn hide_form(&mut self, restore_after: Duration);
    /// Shows the cadence row for running or the elevation row for cycling.
    fn toggle_variant_field(&mut self, kind: WorkoutKind);
    fn notify(&mut self, notice: Notice);
}

/// Units and labels for one list entry, in display order.
pub fn list_entry_fields(workout: &Workout) -> Vec<(&'static str, String, &'static str)> {
    let icon = workout.kind().popup_icon();
    let mut fields = vec![
        (icon, format!("{}", workout.distance()), "km"),
        ("⏱", format!("{}", workout.duration()), "min"),
    ];
    match *workout.variant() {
        Variant::Running { cadence, pace } => {
            fields.push(("⚡️", format!("{:.1}", pace), "min/km"));
            fields.push(("🦶🏼", format!("{}", cadence), "spm"));
        }
        Variant::Cycling {
            elevation_gain,
            speed,
        } => {
            fields.push(("⚡️", format!("{:.1}", speed), "km/h"));
            fields.push(("⛰", format!("{}", elevation_gain), "m"));
        }
    }
    fields
}
