//! The transition value handed to actions and observers.

use super::state::{State, Trigger};
use chrono::{DateTime, Utc};

/// Record of a single firing: where it started, where it is going and which
/// trigger caused it.
///
/// Transitions are immutable values built once per `fire` and discarded when
/// the fire completes. A transition whose destination equals its source is a
/// reentry.
///
/// # Example
///
/// ```rust
/// use strata::core::{State, Transition, Trigger};
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// enum Door { Open, Closed }
///
/// impl State for Door {
///     fn name(&self) -> &str {
///         match self {
///             Self::Open => "Open",
///             Self::Closed => "Closed",
///         }
///     }
/// }
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// enum Push { Push }
///
/// impl Trigger for Push {
///     fn name(&self) -> &str { "Push" }
/// }
///
/// let transition = Transition::new(Door::Open, Door::Closed, Push::Push);
/// assert!(!transition.is_reentry());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Transition<S: State, T: Trigger> {
    /// The state being transitioned from
    pub source: S,
    /// The state being transitioned to
    pub destination: S,
    /// The trigger that caused the transition
    pub trigger: T,
    /// When the transition was resolved
    pub fired_at: DateTime<Utc>,
}

impl<S: State, T: Trigger> Transition<S, T> {
    pub fn new(source: S, destination: S, trigger: T) -> Self {
        Self {
            source,
            destination,
            trigger,
            fired_at: Utc::now(),
        }
    }

    /// True when the transition leaves and re-enters the same state.
    pub fn is_reentry(&self) -> bool {
        self.source == self.destination
    }
}
