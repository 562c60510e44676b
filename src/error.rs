#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} must be a finite number")]
    NonFinite(&'static str),
    #[error("{0} must be a positive number")]
    NotPositive(&'static str),
    #[error("{0} is missing")]
    Missing(&'static str),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LocationError {
    #[error("Could not get your position: {0}")]
    Unavailable(String),
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
    #[error("Failed to encode workouts: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MapError {
    #[error("Map has not been initialized")]
    NotInitialized,
    #[error("Map is already initialized")]
    AlreadyInitialized,
    #[error("A click handler is already registered")]
    HandlerActive,
    #[error("Unknown click subscription: {0}")]
    UnknownSubscription(u64),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Location(#[from] LocationError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Map(#[from] MapError),
    #[error("Workout not found: {0}")]
    NotFound(String),
    #[error("Action not available while {0}")]
    InvalidState(&'static str),
}
