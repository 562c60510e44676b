use serde::Deserialize;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::config::Config;
use crate::controller::AppController;
use crate::error::AppError;
use crate::form::FormInput;
use crate::location::{LocationProvider, LocationService};
use crate::map::{MapBridge, MapWidget};
use crate::render::Renderer;
use crate::state::AppEvent;
use crate::store::{Storage, WorkoutStore};
use crate::types::coords::Coords;
use crate::types::workout::WorkoutKind;

/// One page session: a controller plus the single event queue feeding it.
pub struct Session<S, M, R, L> {
    controller: AppController<S, M, R>,
    location: LocationService<L>,
    events: UnboundedReceiver<AppEvent>,
}

impl<S, M, R, L> Session<S, M, R, L>
where
    S: Storage,
    M: MapWidget,
    R: Renderer,
    L: LocationProvider,
{
    /// Builds the session and returns the sender UI sources push events into.
    /// The session ends once every returned sender is dropped.
    pub fn new(
        config: Config,
        store: WorkoutStore<S>,
        widget: M,
        renderer: R,
        location: LocationService<L>,
    ) -> (Self, UnboundedSender<AppEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let controller = AppController::new(config, store, MapBridge::new(widget), renderer);
        (
            Self {
                controller,
                location,
                events: rx,
            },
            tx,
        )
    }

    pub fn controller(&self) -> &AppController<S, M, R> {
        &self.controller
    }

    /// Awaits the one position request and hands the result to the controller.
    pub async fn start(&mut self) {
        let result = self.location.request_position().await;
        self.dispatch(AppEvent::PositionResolved(result));
    }

    /// Runs `start`, then handles queued events one at a time until all
    /// senders are gone. Returns the controller for inspection.
    pub async fn run(mut self) -> AppController<S, M, R> {
        self.start().await;
        while let Some(event) = self.events.recv().await {
            self.dispatch(event);
        }
        tracing::info!("Session ended with {} workouts", self.controller.workouts().len());
        self.controller
    }

    fn dispatch(&mut self, event: AppEvent) {
        match self.controller.handle(event) {
            Ok(()) => {}
            Err(AppError::Validation(err)) => tracing::debug!("Form rejected: {}", err),
            Err(err) => tracing::warn!("Event not handled: {}", err),
        }
    }
}

/// One line of the JSON event feed read by the headless binary.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum FeedEvent {
    MapClick {
        lat: f64,
        lng: f64,
    },
    TypeChange {
        #[serde(rename = "type")]
        kind: WorkoutKind,
    },
    Submit(FormInput),
    Select {
        id: String,
    },
    Reset,
}

impl FeedEvent {
    pub fn parse(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

impl From<FeedEvent> for AppEvent {
    fn from(event: FeedEvent) -> Self {
        match event {
            FeedEvent::MapClick { lat, lng } => AppEvent::SurfaceClicked(Coords::new(lat, lng)),
            FeedEvent::TypeChange { kind } => AppEvent::TypeChanged(kind),
            FeedEvent::Submit(input) => AppEvent::FormSubmitted(input),
            FeedEvent::Select { id } => AppEvent::WorkoutSelected(id),
            FeedEvent::Reset => AppEvent::Reset,
        }
    }
}
