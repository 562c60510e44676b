use std::cell::RefCell;
use std::rc::Rc;

use crate::config::Config;
use crate::error::{AppError, LocationError, ValidationError};
use crate::form::FormInput;
use crate::map::{ClickSubscription, MapBridge, MapWidget, PanOptions};
use crate::render::{Notice, Renderer};
use crate::state::{AppEvent, AppState};
use crate::store::{Storage, WorkoutStore};
use crate::types::coords::Coords;
use crate::types::workout::{Workout, WorkoutKind};

/// Drives position acquisition, the click-form-workout pipeline, rendering and
/// persistence. Owns the in-memory workout list.
pub struct AppController<S, M, R> {
    config: Config,
    state: AppState,
    workouts: Vec<Workout>,
    store: WorkoutStore<S>,
    map: MapBridge<M>,
    renderer: R,
    /// Filled by the map click handler, drained right after each dispatch.
    clicks: Rc<RefCell<Vec<Coords>>>,
    click_subscription: Option<ClickSubscription>,
}

impl<S: Storage, M: MapWidget, R: Renderer> AppController<S, M, R> {
    /// Restores persisted workouts and lists them right away; markers wait
    /// until the map exists.
    pub fn new(config: Config, store: WorkoutStore<S>, map: MapBridge<M>, mut renderer: R) -> Self {
        let workouts = store.load();
        for workout in &workouts {
            renderer.render_workout(workout);
        }
        tracing::info!("Restored {} workouts", workouts.len());

        Self {
            config,
            state: AppState::AwaitingPosition,
            workouts,
            store,
            map,
            renderer,
            clicks: Rc::new(RefCell::new(Vec::new())),
            click_subscription: None,
        }
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn workout(&self, id: &str) -> Option<&Workout> {
        self.workouts.iter().find(|workout| workout.id() == id)
    }

    pub fn map(&self) -> &MapBridge<M> {
        &self.map
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn store(&self) -> &WorkoutStore<S> {
        &self.store
    }

    pub fn handle(&mut self, event: AppEvent) -> Result<(), AppError> {
        match event {
            AppEvent::PositionResolved(result) => self.on_position(result),
            AppEvent::SurfaceClicked(coords) => self.on_surface_click(coords),
            AppEvent::MapClicked(coords) => self.on_map_click(coords),
            AppEvent::TypeChanged(kind) => {
                self.on_type_change(kind);
                Ok(())
            }
            AppEvent::FormSubmitted(input) => self.on_submit(&input).map(|_| ()),
            AppEvent::WorkoutSelected(id) => self.on_select(&id),
            AppEvent::Reset => {
                self.reset();
                Ok(())
            }
        }
    }

    /// Settles the startup position request. Only the first result counts.
    pub fn on_position(&mut self, result: Result<Coords, LocationError>) -> Result<(), AppError> {
        if self.state != AppState::AwaitingPosition {
            return Err(AppError::InvalidState(self.state.name()));
        }

        let coords = match result {
            Ok(coords) => coords,
            Err(LocationError::Unavailable(reason)) => {
                tracing::warn!("Map features disabled: {}", reason);
                self.renderer.notify(Notice::PositionUnavailable(reason));
                self.state = AppState::PositionUnavailable;
                return Ok(());
            }
        };

        self.map.initialize(coords, self.config.map_zoom)?;
        for workout in &self.workouts {
            self.map.place_marker(
                workout.coords(),
                &workout.popup_content(),
                workout.kind().popup_class(),
            )?;
        }

        let inbox = Rc::clone(&self.clicks);
        let subscription = self
            .map
            .on_click(move |coords| inbox.borrow_mut().push(coords))?;
        self.click_subscription = Some(subscription);

        self.state = AppState::Idle;
        tracing::info!("Map ready with {} markers", self.map.markers().len());
        Ok(())
    }

    /// Hands a raw widget click to the bridge, then acts on whatever the click
    /// subscription received. Without a subscription the click is dropped.
    pub fn on_surface_click(&mut self, coords: Coords) -> Result<(), AppError> {
        if !self.map.dispatch_click(coords) {
            return Ok(());
        }
        let received = std::mem::take(&mut *self.clicks.borrow_mut());
        for coords in received {
            self.on_map_click(coords)?;
        }
        Ok(())
    }

    /// Opens the form for a workout at `coords`. A second click while the form
    /// is open moves the pending location.
    pub fn on_map_click(&mut self, coords: Coords) -> Result<(), AppError> {
        if !self.state.map_ready() {
            return Err(AppError::InvalidState(self.state.name()));
        }
        if !coords.is_finite() {
            return Err(ValidationError::NonFinite("coordinates").into());
        }
        tracing::debug!("Map clicked at {}", coords);
        self.state = AppState::FormOpen { pending: coords };
        self.renderer.show_form();
        self.renderer.focus_distance();
        Ok(())
    }

    pub fn on_type_change(&mut self, kind: WorkoutKind) {
        self.renderer.toggle_variant_field(kind);
    }

    /// Validates the form and records the workout at the pending location.
    /// Invalid input leaves the form open and untouched.
    pub fn on_submit(&mut self, input: &FormInput) -> Result<&Workout, AppError> {
        let AppState::FormOpen { pending } = self.state else {
            return Err(AppError::InvalidState(self.state.name()));
        };

        let workout = match input.to_draft().build(pending) {
            Ok(workout) => workout,
            Err(err) => {
                tracing::debug!("Rejected {} form: {}", input.kind.as_str(), err);
                self.renderer.notify(Notice::InvalidInput(err.to_string()));
                return Err(err.into());
            }
        };

        self.map.place_marker(
            workout.coords(),
            &workout.popup_content(),
            workout.kind().popup_class(),
        )?;
        self.renderer.render_workout(&workout);
        tracing::info!("Added workout {}: {}", workout.id(), workout.description());
        self.workouts.push(workout);

        if let Err(err) = self.store.save(&self.workouts) {
            tracing::warn!("Failed to persist workouts: {}", err);
        }

        self.renderer.clear_form();
        self.renderer.hide_form(self.config.form_restore_delay);
        self.state = AppState::Idle;

        self.workouts
            .last()
            .ok_or(AppError::InvalidState("recording a workout"))
    }

    /// Pans to the selected list entry and counts the selection.
    pub fn on_select(&mut self, id: &str) -> Result<(), AppError> {
        if !self.state.map_ready() {
            return Err(AppError::InvalidState(self.state.name()));
        }
        let workout = self
            .workouts
            .iter_mut()
            .find(|workout| workout.id() == id)
            .ok_or_else(|| AppError::NotFound(id.to_string()))?;

        self.map.center_on(
            workout.coords(),
            self.config.map_zoom,
            PanOptions::animated(self.config.pan_duration),
        )?;
        workout.click();
        tracing::debug!("Selected {} ({} clicks)", id, workout.click_count());
        Ok(())
    }

    /// Forgets every workout, in memory and in storage. Markers already on the
    /// map stay until the session ends.
    pub fn reset(&mut self) {
        if let Err(err) = self.store.clear() {
            tracing::warn!("Failed to clear stored workouts: {}", err);
        }
        self.workouts.clear();
        self.renderer.clear_workouts();
        tracing::info!("Workouts reset");
    }

    /// Drops the map click handler, leaving the controller unable to open the
    /// form from the map.
    pub fn detach_map(&mut self) -> Result<(), AppError> {
        if let Some(subscription) = self.click_subscription.take() {
            self.map.unsubscribe(subscription)?;
        }
        Ok(())
    }
}
