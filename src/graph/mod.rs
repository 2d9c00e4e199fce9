//! Graph export for external renderers.
//!
//! [`export`] turns a [`StateMachineInfo`](crate::reflection::StateMachineInfo)
//! into a [`StateGraph`]: nested state nodes and typed transitions. Turning
//! that into dot, mermaid or anything else is the renderer's job.

mod export;
mod model;

pub use export::export;
pub use model::{FixedTransition, GraphNode, GraphTransition, StateGraph, StayTransition};
