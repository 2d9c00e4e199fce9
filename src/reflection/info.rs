//! Passive descriptors of a configured machine.

use serde::Serialize;

/// Description used for actions and guards registered without one.
pub const DEFAULT_INVOCATION_NAME: &str = "Function";

/// Identity of a configured trigger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TriggerInfo {
    pub name: String,
}

impl TriggerInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Metadata about a host-supplied callable (guard or action).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InvocationInfo {
    pub method_name: String,
    pub description: Option<String>,
}

impl InvocationInfo {
    pub fn new(description: Option<String>) -> Self {
        Self {
            method_name: DEFAULT_INVOCATION_NAME.to_string(),
            description,
        }
    }

    /// The description when present, otherwise the method name.
    pub fn label(&self) -> &str {
        self.description.as_deref().unwrap_or(&self.method_name)
    }
}

/// An entry action, optionally scoped to the trigger that caused the entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ActionInfo {
    pub method: InvocationInfo,
    pub from_trigger: Option<TriggerInfo>,
}

/// How a permitted trigger behaves once selected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TransitionKind {
    /// Moves to a different state.
    Fixed,
    /// Leaves and re-enters the same state, running exit and entry actions.
    Reentry,
    /// Accepted without a state change or any action.
    Ignored,
}

/// One candidate behaviour for a trigger on a state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TransitionInfo {
    pub trigger: TriggerInfo,
    /// Id of the destination; the owning state for reentry and ignore.
    pub destination: usize,
    pub guards: Vec<InvocationInfo>,
    pub kind: TransitionKind,
}

/// Snapshot of one configured state.
///
/// `id` is the state's position in declaration order. Hierarchy links and
/// destinations use ids, since distinct states may share a name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StateInfo {
    pub id: usize,
    pub name: String,
    pub superstate: Option<usize>,
    pub substates: Vec<usize>,
    pub entry_actions: Vec<ActionInfo>,
    pub exit_actions: Vec<InvocationInfo>,
    /// Candidates in registration order.
    pub transitions: Vec<TransitionInfo>,
}

/// Snapshot of a whole machine, states in declaration order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StateMachineInfo {
    pub state_type: String,
    pub trigger_type: String,
    pub states: Vec<StateInfo>,
}

impl StateMachineInfo {
    /// First state carrying `name`.
    pub fn state(&self, name: &str) -> Option<&StateInfo> {
        self.states.iter().find(|s| s.name == name)
    }

    pub fn state_by_id(&self, id: usize) -> Option<&StateInfo> {
        self.states.iter().find(|s| s.id == id)
    }

    /// Name of the state with `id`, or an empty string for unknown ids.
    pub fn name_of(&self, id: usize) -> &str {
        self.state_by_id(id).map_or("", |s| s.name.as_str())
    }
}
