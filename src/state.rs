use crate::error::LocationError;
use crate::form::FormInput;
use crate::types::coords::Coords;
use crate::types::workout::WorkoutKind;

/// Where the controller is in the session lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AppState {
    /// Startup: the one position request is still pending.
    #[default]
    AwaitingPosition,
    /// The position request failed; map features stay off for the session.
    PositionUnavailable,
    /// Map is ready, form hidden.
    Idle,
    /// Map is ready and the form is open for a workout at `pending`.
    FormOpen { pending: Coords },
}

impl AppState {
    pub fn map_ready(&self) -> bool {
        matches!(self, AppState::Idle | AppState::FormOpen { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            AppState::AwaitingPosition => "awaiting position",
            AppState::PositionUnavailable => "position unavailable",
            AppState::Idle => "idle",
            AppState::FormOpen { .. } => "form open",
        }
    }
}

/// Everything the controller reacts to. Handlers run one at a time.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    PositionResolved(Result<Coords, LocationError>),
    /// Raw click on the map surface, as delivered by the widget. Routed through
    /// the bridge so it only counts while a click handler is subscribed.
    SurfaceClicked(Coords),
    /// Click already accepted by the map, opening the form directly.
    MapClicked(Coords),
    TypeChanged(WorkoutKind),
    FormSubmitted(FormInput),
    WorkoutSelected(String),
    Reset,
}
