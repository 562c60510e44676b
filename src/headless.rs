//! Collaborators for running a session without a page: the map and the page
//! only log what they were asked to do.

use std::time::Duration;

use crate::map::{MapWidget, MarkerHandle, PanOptions, Popup};
use crate::render::{list_entry_fields, Notice, Renderer};
use crate::types::coords::Coords;
use crate::types::workout::{Workout, WorkoutKind};

#[derive(Debug, Default)]
pub struct TracingMap {
    next_marker: u64,
}

impl MapWidget for TracingMap {
    fn set_view(&mut self, center: Coords, zoom: u8, pan: PanOptions) {
        if pan.animate {
            tracing::info!("Map pans to {} (zoom {}, {:?})", center, zoom, pan.duration);
        } else {
            tracing::info!("Map view set to {} (zoom {})", center, zoom);
        }
    }

    fn add_marker(&mut self, coords: Coords, popup: &Popup) -> MarkerHandle {
        self.next_marker += 1;
        tracing::info!(
            "Marker {} at {} [{}]: {}",
            self.next_marker,
            coords,
            popup.class_name,
            popup.content
        );
        MarkerHandle(self.next_marker)
    }
}

#[derive(Debug, Default)]
pub struct TracingRenderer;

impl Renderer for TracingRenderer {
    fn render_workout(&mut self, workout: &Workout) {
        let fields: Vec<String> = list_entry_fields(workout)
            .into_iter()
            .map(|(icon, value, unit)| format!("{} {} {}", icon, value, unit))
            .collect();
        tracing::info!(
            "[{}] {}: {}",
            workout.id(),
            workout.description(),
            fields.join(" | ")
        );
    }

    fn clear_workouts(&mut self) {
        tracing::info!("Workout list cleared");
    }

    fn show_form(&mut self) {
        tracing::debug!("Form shown");
    }

    fn focus_distance(&mut self) {
        tracing::debug!("Distance field focused");
    }

    fn clear_form(&mut self) {
        tracing::debug!("Form cleared");
    }

    fn hide_form(&mut self, restore_after: Duration) {
        tracing::debug!("Form hidden, layout back in {:?}", restore_after);
    }

    fn toggle_variant_field(&mut self, kind: WorkoutKind) {
        tracing::debug!("Showing {} fields", kind.as_str());
    }

    fn notify(&mut self, notice: Notice) {
        tracing::warn!("{}", notice);
    }
}
