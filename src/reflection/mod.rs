//! Reflection model: descriptors of a configured machine.
//!
//! These types are snapshots produced by
//! [`StateMachine::get_info`](crate::effects::StateMachine::get_info). The
//! firing algorithm never reads them; they exist for introspection and for
//! [`crate::graph`] export.

mod info;

pub use info::{
    ActionInfo, InvocationInfo, StateInfo, StateMachineInfo, TransitionInfo, TransitionKind,
    TriggerInfo, DEFAULT_INVOCATION_NAME,
};
