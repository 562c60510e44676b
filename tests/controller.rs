mod common;

use std::time::Duration;

use chrono::Datelike;
use common::{controller_with, london, ReadOnlyStorage, TestController};
use mapty_core::error::{AppError, LocationError, ValidationError};
use mapty_core::form::FormInput;
use mapty_core::render::Notice;
use mapty_core::state::{AppEvent, AppState};
use mapty_core::store::{MemoryStorage, Storage, WorkoutStore};
use mapty_core::types::coords::Coords;
use mapty_core::types::workout::{Workout, WorkoutKind};

fn ready(storage: MemoryStorage) -> TestController<MemoryStorage> {
    let mut controller = controller_with(storage);
    controller
        .on_position(Ok(Coords::new(51.49, -0.1)))
        .expect("position");
    controller
}

fn stored_len(storage: &MemoryStorage) -> usize {
    let raw = storage.get("workouts").expect("get").unwrap_or_default();
    if raw.is_empty() {
        return 0;
    }
    serde_json::from_str::<Vec<serde_json::Value>>(&raw)
        .expect("json")
        .len()
}

#[test]
fn starts_awaiting_position_with_empty_list() {
    let controller = controller_with(MemoryStorage::new());
    assert_eq!(controller.state(), AppState::AwaitingPosition);
    assert!(controller.workouts().is_empty());
    assert!(!controller.map().is_initialized());
}

#[test]
fn position_initializes_map_and_subscribes_to_clicks() {
    let controller = ready(MemoryStorage::new());
    assert_eq!(controller.state(), AppState::Idle);

    let view = controller.map().view().expect("map view");
    assert_eq!(view.center, Coords::new(51.49, -0.1));
    assert_eq!(view.zoom, 13);
}

#[test]
fn scenario_a_running_workout_is_recorded_everywhere() {
    let storage = MemoryStorage::new();
    let mut controller = ready(storage.clone());

    controller.on_map_click(london()).expect("click");
    assert_eq!(controller.state(), AppState::FormOpen { pending: london() });
    assert!(controller.renderer().form_visible);
    assert!(controller.renderer().focused_distance);

    let workout = controller
        .on_submit(&FormInput::running("5", "30", "178"))
        .expect("valid running workout")
        .clone();

    assert_eq!(workout.pace(), Some(6.0));
    assert_eq!(workout.coords(), london());
    let date = workout.date();
    assert!(workout
        .description()
        .ends_with(&format!("{} {}", date.format("%B"), date.day())));

    let markers = &controller.map().widget().markers;
    assert_eq!(markers.len(), 1);
    assert_eq!(markers[0].0, london());
    assert_eq!(markers[0].1.class_name, "running-popup");
    assert_eq!(markers[0].1.content, format!("🏃‍♂️ {}", workout.description()));

    assert_eq!(controller.renderer().listed, vec![workout.id().to_string()]);
    assert_eq!(stored_len(&storage), 1);

    assert_eq!(controller.state(), AppState::Idle);
    assert!(!controller.renderer().form_visible);
    assert_eq!(controller.renderer().form_cleared, 1);
    assert_eq!(
        controller.renderer().restore_delays,
        vec![Duration::from_millis(1000)]
    );
}

#[test]
fn scenario_b_cycling_accepts_descent() {
    let mut controller = ready(MemoryStorage::new());
    controller.on_map_click(london()).expect("click");

    let workout = controller
        .on_submit(&FormInput::cycling("20", "60", "-50"))
        .expect("negative elevation is allowed");

    assert_eq!(workout.kind(), WorkoutKind::Cycling);
    assert_eq!(workout.speed(), Some(20.0));
}

#[test]
fn scenario_c_invalid_input_keeps_form_open() {
    let storage = MemoryStorage::new();
    let mut controller = ready(storage.clone());
    controller.on_map_click(london()).expect("click");

    let err = controller
        .on_submit(&FormInput::running("-5", "30", "178"))
        .expect_err("negative distance");

    assert!(matches!(
        err,
        AppError::Validation(ValidationError::NotPositive("distance"))
    ));
    assert!(controller.workouts().is_empty());
    assert_eq!(controller.state(), AppState::FormOpen { pending: london() });
    assert!(controller.renderer().form_visible);
    assert_eq!(controller.renderer().form_cleared, 0);
    assert!(matches!(
        controller.renderer().notices.as_slice(),
        [Notice::InvalidInput(_)]
    ));
    assert!(controller.map().widget().markers.is_empty());
    assert_eq!(stored_len(&storage), 0);

    controller
        .on_submit(&FormInput::running("5", "30", "178"))
        .expect("resubmit succeeds");
    assert_eq!(controller.workouts().len(), 1);
}

#[test]
fn scenario_d_position_failure_still_lists_history() {
    let storage = MemoryStorage::new();
    WorkoutStore::new(storage.clone(), "workouts")
        .save(&[Workout::running(london(), 5.0, 30.0, 178.0)])
        .expect("seed");

    let mut controller = controller_with(storage);
    assert_eq!(controller.renderer().listed.len(), 1);

    controller
        .on_position(Err(LocationError::Unavailable("denied".to_string())))
        .expect("failure is handled");

    assert_eq!(controller.state(), AppState::PositionUnavailable);
    assert!(!controller.map().is_initialized());
    assert!(controller.map().widget().views.is_empty());
    assert_eq!(
        controller.renderer().notices,
        vec![Notice::PositionUnavailable("denied".to_string())]
    );
    assert_eq!(controller.renderer().listed.len(), 1);

    assert!(matches!(
        controller.on_map_click(london()),
        Err(AppError::InvalidState(_))
    ));
    let id = controller.workouts()[0].id().to_string();
    assert!(matches!(
        controller.on_select(&id),
        Err(AppError::InvalidState(_))
    ));
    assert!(matches!(
        controller.on_position(Ok(london())),
        Err(AppError::InvalidState(_))
    ));
}

#[test]
fn restored_workouts_get_markers_once_map_is_ready() {
    let storage = MemoryStorage::new();
    let seeded = vec![
        Workout::running(Coords::new(1.0, 1.0), 5.0, 30.0, 178.0),
        Workout::cycling(Coords::new(2.0, 2.0), 20.0, 60.0, 100.0),
    ];
    WorkoutStore::new(storage.clone(), "workouts")
        .save(&seeded)
        .expect("seed");

    let mut controller = controller_with(storage);
    assert_eq!(controller.workouts(), seeded.as_slice());
    assert!(controller.map().widget().markers.is_empty());

    controller.on_position(Ok(london())).expect("position");
    let markers = &controller.map().widget().markers;
    assert_eq!(markers.len(), 2);
    assert_eq!(markers[1].0, Coords::new(2.0, 2.0));
    assert_eq!(markers[1].1.class_name, "cycling-popup");
}

#[test]
fn map_clicks_flow_through_the_subscription() {
    let mut controller = controller_with(MemoryStorage::new());
    controller.on_position(Ok(london())).expect("position");

    controller
        .handle(AppEvent::SurfaceClicked(Coords::new(10.0, 20.0)))
        .expect("dispatch");

    assert_eq!(
        controller.state(),
        AppState::FormOpen {
            pending: Coords::new(10.0, 20.0)
        }
    );
}

#[test]
fn second_click_moves_pending_location() {
    let mut controller = ready(MemoryStorage::new());
    controller.on_map_click(Coords::new(1.0, 1.0)).expect("click");
    controller.on_map_click(Coords::new(2.0, 2.0)).expect("click");

    let workout = controller
        .on_submit(&FormInput::running("5", "25", "170"))
        .expect("submit");
    assert_eq!(workout.coords(), Coords::new(2.0, 2.0));
}

#[test]
fn non_finite_click_is_rejected_and_history_survives_reload() {
    let storage = MemoryStorage::new();
    let mut controller = ready(storage.clone());
    controller.on_map_click(london()).expect("click");
    controller
        .on_submit(&FormInput::running("5", "30", "178"))
        .expect("running");

    assert!(matches!(
        controller.on_map_click(Coords::new(f64::NAN, 0.0)),
        Err(AppError::Validation(ValidationError::NonFinite("coordinates")))
    ));
    assert_eq!(controller.state(), AppState::Idle);
    assert!(matches!(
        controller.on_submit(&FormInput::running("3", "20", "170")),
        Err(AppError::InvalidState("idle"))
    ));

    let reloaded = controller_with(storage);
    assert_eq!(reloaded.workouts(), controller.workouts());
}

#[test]
fn submit_without_open_form_is_ignored() {
    let mut controller = ready(MemoryStorage::new());
    assert!(matches!(
        controller.on_submit(&FormInput::running("5", "30", "178")),
        Err(AppError::InvalidState("idle"))
    ));
    assert!(controller.workouts().is_empty());
}

#[test]
fn type_change_toggles_fields_in_any_state() {
    let mut controller = controller_with(MemoryStorage::new());
    controller
        .handle(AppEvent::TypeChanged(WorkoutKind::Cycling))
        .expect("toggle");
    controller.on_type_change(WorkoutKind::Running);

    assert_eq!(
        controller.renderer().variant_fields,
        vec![WorkoutKind::Cycling, WorkoutKind::Running]
    );
    assert!(controller.workouts().is_empty());
}

#[test]
fn selecting_a_workout_pans_and_counts() {
    let mut controller = ready(MemoryStorage::new());
    controller.on_map_click(london()).expect("click");
    let id = controller
        .on_submit(&FormInput::running("5", "30", "178"))
        .expect("submit")
        .id()
        .to_string();

    controller.on_select(&id).expect("select");
    controller.on_select(&id).expect("select again");

    assert_eq!(controller.workout(&id).expect("workout").click_count(), 2);
    let (center, zoom, pan) = *controller
        .map()
        .widget()
        .views
        .last()
        .expect("view");
    assert_eq!(center, london());
    assert_eq!(zoom, 13);
    assert!(pan.animate);
    assert_eq!(pan.duration, Duration::from_secs(1));

    assert!(matches!(
        controller.on_select("missing"),
        Err(AppError::NotFound(_))
    ));
}

#[test]
fn workouts_survive_a_reload() {
    let storage = MemoryStorage::new();
    let mut first = ready(storage.clone());
    first.on_map_click(london()).expect("click");
    first
        .on_submit(&FormInput::running("5", "30", "178"))
        .expect("running");
    first.on_map_click(Coords::new(48.85, 2.35)).expect("click");
    first
        .on_submit(&FormInput::cycling("20", "60", "-50"))
        .expect("cycling");

    let second = controller_with(storage);
    assert_eq!(second.workouts(), first.workouts());
    assert_eq!(second.workouts()[0].pace(), Some(6.0));
    assert_eq!(second.workouts()[1].speed(), Some(20.0));
    assert_eq!(second.renderer().listed.len(), 2);
}

#[test]
fn write_failures_are_not_surfaced() {
    let mut controller = controller_with(ReadOnlyStorage);
    controller.on_position(Ok(london())).expect("position");
    controller.on_map_click(london()).expect("click");

    controller
        .on_submit(&FormInput::running("5", "30", "178"))
        .expect("workout still recorded");

    assert_eq!(controller.workouts().len(), 1);
    assert!(controller.renderer().notices.is_empty());
    assert_eq!(controller.state(), AppState::Idle);
}

#[test]
fn reset_clears_memory_and_storage() {
    let storage = MemoryStorage::new();
    let mut controller = ready(storage.clone());
    controller.on_map_click(london()).expect("click");
    controller
        .on_submit(&FormInput::running("5", "30", "178"))
        .expect("submit");

    controller.handle(AppEvent::Reset).expect("reset");

    assert!(controller.workouts().is_empty());
    assert!(storage.is_empty());
    assert!(controller.renderer().listed.is_empty());
    assert_eq!(controller.renderer().list_cleared, 1);
}

#[test]
fn detached_map_no_longer_opens_the_form() {
    let mut controller = controller_with(MemoryStorage::new());
    controller.on_position(Ok(london())).expect("position");
    controller.detach_map().expect("detach");

    controller
        .handle(AppEvent::SurfaceClicked(london()))
        .expect("dispatch");
    assert_eq!(controller.state(), AppState::Idle);
}
