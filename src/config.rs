use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;
use crate::types::coords::Coords;

#[derive(Debug, Clone)]
pub struct Config {
    pub map_zoom: u8,
    pub storage_key: String,
    pub data_dir: PathBuf,
    pub position_timeout: Duration,
    /// Delay before the hidden form's layout is shown again after a submit.
    pub form_restore_delay: Duration,
    pub pan_duration: Duration,
    /// Position reported by the fixed location provider; `None` means unavailable.
    pub position: Option<Coords>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            map_zoom: 13,
            storage_key: "workouts".to_string(),
            data_dir: PathBuf::from("data"),
            position_timeout: Duration::from_secs(10),
            form_restore_delay: Duration::from_millis(1000),
            pan_duration: Duration::from_millis(1000),
            position: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from `lookup`, which returns a variable's value if set.
    /// Unset or blank variables take their defaults; malformed ones are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |name: &str| lookup(name).filter(|s| !s.trim().is_empty());

        let map_zoom = match var("MAPTY_MAP_ZOOM") {
            Some(raw) => parse_number("MAPTY_MAP_ZOOM", raw)?,
            None => defaults.map_zoom,
        };

        let storage_key = var("MAPTY_STORAGE_KEY").unwrap_or(defaults.storage_key);

        let data_dir = var("MAPTY_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let position_timeout = match var("MAPTY_POSITION_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(parse_number("MAPTY_POSITION_TIMEOUT_SECS", raw)?),
            None => defaults.position_timeout,
        };

        let form_restore_delay = match var("MAPTY_FORM_RESTORE_MS") {
            Some(raw) => Duration::from_millis(parse_number("MAPTY_FORM_RESTORE_MS", raw)?),
            None => defaults.form_restore_delay,
        };

        let pan_duration = match var("MAPTY_PAN_DURATION_MS") {
            Some(raw) => Duration::from_millis(parse_number("MAPTY_PAN_DURATION_MS", raw)?),
            None => defaults.pan_duration,
        };

        let position = match var("MAPTY_POSITION") {
            Some(raw) => Some(
                Coords::parse(&raw).ok_or(ConfigError::Invalid("MAPTY_POSITION", raw))?,
            ),
            None => None,
        };

        Ok(Self {
            map_zoom,
            storage_key,
            data_dir,
            position_timeout,
            form_restore_delay,
            pan_duration,
            position,
        })
    }
}

fn parse_number<T: FromStr>(name: &'static str, raw: String) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid(name, raw))
}
