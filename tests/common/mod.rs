use std::io;
use std::time::Duration;

use mapty_core::config::Config;
use mapty_core::controller::AppController;
use mapty_core::error::StorageError;
use mapty_core::map::{MapBridge, MapWidget, MarkerHandle, PanOptions, Popup};
use mapty_core::render::{Notice, Renderer};
use mapty_core::store::{Storage, WorkoutStore};
use mapty_core::types::coords::Coords;
use mapty_core::types::workout::{Workout, WorkoutKind};

/// Map widget that records every call.
#[derive(Debug, Default)]
pub struct RecordingMap {
    pub views: Vec<(Coords, u8, PanOptions)>,
    pub markers: Vec<(Coords, Popup)>,
}

impl MapWidget for RecordingMap {
    fn set_view(&mut self, center: Coords, zoom: u8, pan: PanOptions) {
        self.views.push((center, zoom, pan));
    }

    fn add_marker(&mut self, coords: Coords, popup: &Popup) -> MarkerHandle {
        self.markers.push((coords, popup.clone()));
        MarkerHandle(self.markers.len() as u64)
    }
}

#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub listed: Vec<String>,
    pub notices: Vec<Notice>,
    pub form_visible: bool,
    pub focused_distance: bool,
    pub form_cleared: usize,
    pub restore_delays: Vec<Duration>,
    pub variant_fields: Vec<WorkoutKind>,
    pub list_cleared: usize,
}

impl Renderer for RecordingRenderer {
    fn render_workout(&mut self, workout: &Workout) {
        self.listed.push(workout.id().to_string());
    }

    fn clear_workouts(&mut self) {
        self.listed.clear();
        self.list_cleared += 1;
    }

    fn show_form(&mut self) {
        self.form_visible = true;
    }

    fn focus_distance(&mut self) {
        self.focused_distance = true;
    }

    fn clear_form(&mut self) {
        self.form_cleared += 1;
    }

    fn hide_form(&mut self, restore_after: Duration) {
        self.form_visible = false;
        self.restore_delays.push(restore_after);
    }

    fn toggle_variant_field(&mut self, kind: WorkoutKind) {
        self.variant_fields.push(kind);
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}

/// Storage whose writes always fail.
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct ReadOnlyStorage;

impl Storage for ReadOnlyStorage {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "quota exceeded").into())
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "read only").into())
    }
}

pub type TestController<S> = AppController<S, RecordingMap, RecordingRenderer>;

#[allow(dead_code)]
pub fn controller_with<S: Storage>(storage: S) -> TestController<S> {
    AppController::new(
        Config::default(),
        WorkoutStore::new(storage, "workouts"),
        MapBridge::new(RecordingMap::default()),
        RecordingRenderer::default(),
    )
}

#[allow(dead_code)]
pub fn london() -> Coords {
    Coords::new(51.5, -0.12)
}
