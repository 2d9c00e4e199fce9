//! Core state machine types.
//!
//! This module contains the pure vocabulary the engine is built from:
//! - Identifier traits for states and triggers
//! - Fire-time arguments
//! - Guard predicates for transition control
//! - The transition value handed to actions
//!
//! Nothing in this module performs side effects; actions live in
//! [`crate::effects`].

mod args;
mod guard;
mod state;
mod transition;

pub use args::{ArgumentError, TriggerArgs};
pub use guard::Guard;
pub use state::{State, Trigger};
pub use transition::Transition;
