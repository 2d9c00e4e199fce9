//! The firing engine and its effectful actions.
//!
//! This module is the "imperative shell" around the pure core: it reads and
//! commits host state, runs entry and exit effects, and serializes fires.
//!
//! # Key Concepts
//!
//! - **State Machine**: Resolves triggers through the state hierarchy
//! - **Actions**: Entry/exit effects built on stillwater's `BoxedEffect`
//! - **Guards**: Pure predicates or effects deciding between candidates
//! - **Firing Mode**: What happens to a fire that overlaps another

mod action;
mod error;
mod firing;
mod guard;
mod machine;
pub(crate) mod representation;

pub(crate) use action::{EntryAction, ExitAction};
pub use action::{ActionError, EntryActionFn, ExitActionFn};
pub use error::FireError;
pub use firing::FiringMode;
pub use guard::{EffectGuard, TransitionGuard};
pub use machine::StateMachine;
