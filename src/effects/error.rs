//! Errors reported by `fire`.

use super::action::ActionError;
use thiserror::Error;

/// Errors that can occur while firing a trigger.
#[derive(Debug, Error)]
pub enum FireError {
    #[error("No valid leaving transitions are permitted from state '{state}' for trigger '{trigger}'")]
    TriggerNotPermitted { state: String, trigger: String },

    #[error(
        "Trigger '{trigger}' is valid for state '{state}' but no guard passed (guards: {})",
        .guards.join(", ")
    )]
    GuardRejected {
        state: String,
        trigger: String,
        guards: Vec<String>,
    },

    #[error("Another fire is still in progress on this machine")]
    FireInProgress,

    /// A queued trigger was dropped before it ran, because the fire draining
    /// the queue failed or was cancelled.
    #[error("Queued trigger '{trigger}' was discarded before it ran")]
    Abandoned { trigger: String },

    #[error(transparent)]
    Action(#[from] ActionError),
}
