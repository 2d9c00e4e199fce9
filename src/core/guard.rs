//! Guard predicates for controlling state transitions.
//!
//! Guards are pure boolean functions that determine whether a candidate
//! transition is eligible. They see the fire-time arguments and nothing else
//! from the engine, and they never suspend. Guards that need the environment
//! are [`EffectGuard`](crate::effects::EffectGuard)s.

use super::args::TriggerArgs;
use std::fmt;

/// Pure predicate that determines if a transition can execute.
///
/// # Example
///
/// ```rust
/// use strata::core::{Guard, TriggerArgs};
///
/// let has_assignee = Guard::described("has assignee", |args: &TriggerArgs| {
///     args.get::<String>(0).is_ok()
/// });
///
/// assert!(has_assignee.check(&TriggerArgs::one("alice")));
/// assert!(!has_assignee.check(&TriggerArgs::none()));
/// assert_eq!(has_assignee.description(), Some("has assignee"));
/// ```
pub struct Guard {
    predicate: Box<dyn Fn(&TriggerArgs) -> bool + Send + Sync>,
    description: Option<String>,
}

impl Guard {
    /// Create a guard from a pure predicate function.
    ///
    /// The predicate must be pure (deterministic, no side effects) and
    /// thread-safe (Send + Sync).
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&TriggerArgs) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
            description: None,
        }
    }

    /// Create a guard carrying a description for reflection and graphs.
    pub fn described<F>(description: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&TriggerArgs) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
            description: Some(description.into()),
        }
    }

    /// Check if the guard allows the transition for these arguments.
    pub fn check(&self, args: &TriggerArgs) -> bool {
        (self.predicate)(args)
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl fmt::Debug for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}
