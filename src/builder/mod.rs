//! Configuration API for declaring states and their rules.
//!
//! [`StateConfiguration`] is the fluent handle returned by
//! [`StateMachine::configure`](crate::effects::StateMachine::configure);
//! the macros declare state and trigger enums with minimal boilerplate.

pub mod configuration;
pub mod error;
pub mod macros;

pub use configuration::StateConfiguration;
pub use error::ConfigurationError;
