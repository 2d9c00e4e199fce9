//! Configuration errors raised while declaring states.

use thiserror::Error;

/// Errors that can occur when configuring a state machine.
///
/// All of these are raised at configuration time; a machine that configured
/// without error never reports them from `fire`.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigurationError {
    #[error(
        "Trigger '{trigger}' is already permitted unconditionally from state '{state}'. \
         Use a guard to add another candidate"
    )]
    DuplicateTrigger { state: String, trigger: String },

    #[error(
        "Permit from '{state}' on '{trigger}' targets its own state. \
         Use .permit_reentry() or .ignore() instead"
    )]
    SelfTransition { state: String, trigger: String },

    #[error("Making '{state}' a substate of '{superstate}' would create a cycle")]
    SubstateCycle { state: String, superstate: String },

    #[error("State '{state}' is already a substate of '{existing}', cannot move it under '{requested}'")]
    SuperstateAlreadySet {
        state: String,
        existing: String,
        requested: String,
    },
}
