//! Machine settings loadable from host configuration.

use crate::effects::FiringMode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Invalid settings document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Tunables applied with
/// [`StateMachine::with_settings`](crate::effects::StateMachine::with_settings).
///
/// Missing fields take their defaults, so an empty document is valid.
///
/// # Example
///
/// ```rust
/// use strata::config::Settings;
/// use strata::effects::FiringMode;
///
/// let settings = Settings::from_json(r#"{ "firing_mode": "queued" }"#).unwrap();
/// assert_eq!(settings.firing_mode, FiringMode::Queued);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// How overlapping fires on one machine are handled.
    pub firing_mode: FiringMode,
}

impl Settings {
    pub fn from_json(document: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(document)?)
    }
}
