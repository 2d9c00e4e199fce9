//! Identifier traits for states and triggers.
//!
//! The engine treats both as opaque keys: it compares and hashes them, and
//! asks for a display name when logging or building reflection data.

use std::fmt::Debug;
use std::hash::Hash;

/// Trait for state machine states.
///
/// A state is an opaque identifier owned by the host. The engine keys its
/// configuration tables by it and never stores the current state itself.
///
/// `name()` is only used for labels: tracing fields, error messages,
/// reflection and graphs.
///
/// # Example
///
/// ```rust
/// use strata::core::State;
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// enum Ticket {
///     Open,
///     Assigned { team: u8 },
/// }
///
/// impl State for Ticket {
///     fn name(&self) -> &str {
///         match self {
///             Self::Open => "Open",
///             Self::Assigned { .. } => "Assigned",
///         }
///     }
/// }
///
/// // Distinct keys may share a label.
/// assert_ne!(Ticket::Assigned { team: 1 }, Ticket::Assigned { team: 2 });
/// assert_eq!(Ticket::Assigned { team: 1 }.name(), "Assigned");
/// ```
pub trait State: Clone + Eq + Hash + Debug + Send + Sync + 'static {
    /// Label used in logs, errors and reflection.
    fn name(&self) -> &str;
}

/// Trait for triggers: the events that may cause a transition.
///
/// Triggers key the per-state permission tables. Like states they are
/// opaque to the engine apart from equality, hashing and their name.
///
/// # Example
///
/// ```rust
/// use strata::core::Trigger;
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// enum Switch {
///     On,
///     Off,
/// }
///
/// impl Trigger for Switch {
///     fn name(&self) -> &str {
///         match self {
///             Self::On => "On",
///             Self::Off => "Off",
///         }
///     }
/// }
///
/// assert_eq!(Switch::Off.name(), "Off");
/// ```
pub trait Trigger: Clone + Eq + Hash + Debug + Send + Sync + 'static {
    /// Label used in logs, errors and reflection.
    fn name(&self) -> &str;
}
