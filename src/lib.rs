//! Strata: a hierarchical state machine engine
//!
//! Strata drives a host-owned state variable through declared transitions.
//! The host supplies the current state through an accessor and commits new
//! states through a mutator; the engine owns only the rules.
//!
//! # Core Concepts
//!
//! - **States and Triggers**: Opaque identifiers via the `State` and `Trigger` traits
//! - **Configuration**: Per-state permits, reentries, ignores and substate links
//! - **Guards**: Pure predicates over fire-time arguments, or effects that
//!   consult the environment
//! - **Actions**: Entry and exit effects run against a host environment
//! - **Reflection**: Snapshots of the configuration, exportable as a graph
//!
//! # Example
//!
//! ```rust
//! use strata::effects::StateMachine;
//! use strata::graph;
//! use strata::{state_enum, trigger_enum};
//! use stillwater::prelude::*;
//!
//! state_enum! {
//!     enum Door {
//!         Closed,
//!         Open,
//!         Locked,
//!     }
//! }
//!
//! trigger_enum! {
//!     enum Action {
//!         Open,
//!         Close,
//!         Lock,
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut door: StateMachine<Door, Action, ()> = StateMachine::with_initial(Door::Closed);
//!
//! door.configure(Door::Closed)
//!     .permit(Action::Open, Door::Open)?
//!     .permit(Action::Lock, Door::Locked)?;
//! door.configure(Door::Open)
//!     .permit(Action::Close, Door::Closed)?
//!     .on_entry(|_, _| pure(()).boxed());
//!
//! door.fire(Action::Open, &()).await?;
//! assert_eq!(door.state(), Door::Open);
//! assert!(!door.can_fire(&Action::Lock, &()).await?);
//!
//! let graph = graph::export(&door.get_info("Door", "Action"));
//! assert_eq!(graph.nodes.len(), 3);
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod core;
pub mod effects;
pub mod graph;
pub mod reflection;

// Re-export commonly used types
pub use crate::builder::{ConfigurationError, StateConfiguration};
pub use crate::config::Settings;
pub use crate::core::{Guard, State, Transition, Trigger, TriggerArgs};
pub use crate::effects::{ActionError, EffectGuard, FireError, FiringMode, StateMachine};
pub use crate::reflection::StateMachineInfo;
