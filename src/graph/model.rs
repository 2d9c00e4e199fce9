//! Neutral graph description of a configured machine.

use serde::Serialize;

/// A state and the states nested inside it.
///
/// `id` matches [`StateInfo::id`](crate::reflection::StateInfo::id); names
/// are labels only and may repeat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    pub id: usize,
    pub name: String,
    pub entry_actions: Vec<String>,
    pub exit_actions: Vec<String>,
    pub substates: Vec<GraphNode>,
}

/// A transition that changes state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FixedTransition {
    pub source_id: usize,
    pub source: String,
    pub destination_id: usize,
    pub destination: String,
    pub trigger: String,
    pub guards: Vec<String>,
    pub label: String,
}

/// A transition whose destination is its source.
///
/// Reentries run exit and entry actions; ignored triggers do not.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StayTransition {
    pub source_id: usize,
    pub source: String,
    pub trigger: String,
    pub guards: Vec<String>,
    pub execute_entry_exit_actions: bool,
    pub label: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GraphTransition {
    Fixed(FixedTransition),
    Stay(StayTransition),
}

impl GraphTransition {
    pub fn source(&self) -> &str {
        match self {
            Self::Fixed(t) => &t.source,
            Self::Stay(t) => &t.source,
        }
    }

    pub fn destination(&self) -> &str {
        match self {
            Self::Fixed(t) => &t.destination,
            Self::Stay(t) => &t.source,
        }
    }

    pub fn source_id(&self) -> usize {
        match self {
            Self::Fixed(t) => t.source_id,
            Self::Stay(t) => t.source_id,
        }
    }

    pub fn destination_id(&self) -> usize {
        match self {
            Self::Fixed(t) => t.destination_id,
            Self::Stay(t) => t.source_id,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Fixed(t) => &t.label,
            Self::Stay(t) => &t.label,
        }
    }

    /// Whether a renderer should draw this as an edge.
    pub fn is_drawn(&self) -> bool {
        match self {
            Self::Fixed(_) => true,
            Self::Stay(t) => t.execute_entry_exit_actions,
        }
    }
}

/// Graph of a machine: nested nodes plus every configured transition, both
/// in declaration order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StateGraph {
    pub state_type: String,
    pub trigger_type: String,
    pub nodes: Vec<GraphNode>,
    pub transitions: Vec<GraphTransition>,
}

impl StateGraph {
    /// Transitions a renderer draws: state changes and reentry self-loops.
    pub fn edges(&self) -> impl Iterator<Item = &GraphTransition> {
        self.transitions.iter().filter(|t| t.is_drawn())
    }

    /// First node named `name`, anywhere in the hierarchy.
    pub fn node(&self, name: &str) -> Option<&GraphNode> {
        find(&self.nodes, &|n| n.name == name)
    }

    pub fn node_by_id(&self, id: usize) -> Option<&GraphNode> {
        find(&self.nodes, &|n| n.id == id)
    }

    /// Number of nodes at every depth.
    pub fn node_count(&self) -> usize {
        fn count(nodes: &[GraphNode]) -> usize {
            nodes.iter().map(|n| 1 + count(&n.substates)).sum()
        }
        count(&self.nodes)
    }

    /// Stable JSON rendering; equal graphs give identical bytes.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn find<'a>(nodes: &'a [GraphNode], pred: &dyn Fn(&GraphNode) -> bool) -> Option<&'a GraphNode> {
    nodes.iter().find_map(|n| {
        if pred(n) {
            Some(n)
        } else {
            find(&n.substates, pred)
        }
    })
}
