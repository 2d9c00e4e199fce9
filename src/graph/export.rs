//! Conversion from reflection data to a [`StateGraph`].

use super::model::{FixedTransition, GraphNode, GraphTransition, StateGraph, StayTransition};
use crate::reflection::{StateInfo, StateMachineInfo, TransitionInfo, TransitionKind};
use std::collections::HashSet;

/// Build the graph description of `info`.
///
/// Pure and deterministic: node and transition order follow the declaration
/// order recorded in `info`, never hash order. Nodes are keyed by state id,
/// so states sharing a name stay distinct.
pub fn export(info: &StateMachineInfo) -> StateGraph {
    let mut placed = HashSet::new();
    let nodes = info
        .states
        .iter()
        .filter(|s| s.superstate.is_none())
        .filter_map(|s| build_node(info, s, &mut placed))
        .collect();

    let transitions = info
        .states
        .iter()
        .flat_map(|state| {
            state
                .transitions
                .iter()
                .map(move |t| build_transition(info, state, t))
        })
        .collect();

    StateGraph {
        state_type: info.state_type.clone(),
        trigger_type: info.trigger_type.clone(),
        nodes,
        transitions,
    }
}

fn build_node(
    info: &StateMachineInfo,
    state: &StateInfo,
    placed: &mut HashSet<usize>,
) -> Option<GraphNode> {
    if !placed.insert(state.id) {
        return None;
    }

    let substates = state
        .substates
        .iter()
        .filter_map(|&id| info.state_by_id(id))
        .filter_map(|sub| build_node(info, sub, placed))
        .collect();

    Some(GraphNode {
        id: state.id,
        name: state.name.clone(),
        entry_actions: state
            .entry_actions
            .iter()
            .map(|a| match &a.from_trigger {
                Some(trigger) => format!("{} [{}]", a.method.label(), trigger.name),
                None => a.method.label().to_string(),
            })
            .collect(),
        exit_actions: state
            .exit_actions
            .iter()
            .map(|a| a.label().to_string())
            .collect(),
        substates,
    })
}

fn build_transition(
    info: &StateMachineInfo,
    source: &StateInfo,
    transition: &TransitionInfo,
) -> GraphTransition {
    let guards: Vec<String> = transition
        .guards
        .iter()
        .map(|g| g.label().to_string())
        .collect();
    let label = if guards.is_empty() {
        transition.trigger.name.clone()
    } else {
        format!("{} [{}]", transition.trigger.name, guards.join(", "))
    };

    match transition.kind {
        TransitionKind::Fixed => GraphTransition::Fixed(FixedTransition {
            source_id: source.id,
            source: source.name.clone(),
            destination_id: transition.destination,
            destination: info.name_of(transition.destination).to_string(),
            trigger: transition.trigger.name.clone(),
            guards,
            label,
        }),
        TransitionKind::Reentry | TransitionKind::Ignored => {
            GraphTransition::Stay(StayTransition {
                source_id: source.id,
                source: source.name.clone(),
                trigger: transition.trigger.name.clone(),
                guards,
                execute_entry_exit_actions: transition.kind == TransitionKind::Reentry,
                label,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Guard;
    use crate::effects::StateMachine;
    use crate::{state_enum, trigger_enum};
    use stillwater::prelude::*;

    state_enum! {
        enum Phone {
            OffHook,
            Ringing,
            Connected,
            OnHold,
        }
    }

    trigger_enum! {
        enum Call {
            Dial,
            Answer,
            Hold,
            Resume,
            Mute,
            Nudge,
        }
    }

    fn phone() -> StateMachine<Phone, Call, ()> {
        let mut machine = StateMachine::with_initial(Phone::OffHook);
        machine
            .configure(Phone::OffHook)
            .permit(Call::Dial, Phone::Ringing)
            .unwrap();
        machine
            .configure(Phone::Ringing)
            .permit_if(
                Call::Answer,
                Phone::Connected,
                Guard::described("line free", |_| true),
            )
            .unwrap()
            .ignore(Call::Nudge)
            .unwrap();
        machine
            .configure(Phone::Connected)
            .permit(Call::Hold, Phone::OnHold)
            .unwrap()
            .permit_reentry(Call::Mute)
            .unwrap()
            .on_entry_described("start timer", |_, _| pure(()).boxed())
            .on_exit_described("stop timer", |_| pure(()).boxed());
        machine
            .configure(Phone::OnHold)
            .substate_of(Phone::Connected)
            .unwrap()
            .permit(Call::Resume, Phone::Connected)
            .unwrap()
            .on_entry_from(Call::Hold, |_, _| pure(()).boxed());
        machine
    }

    #[test]
    fn substates_nest_under_their_superstate() {
        let graph = export(&phone().get_info("Phone", "Call"));

        let roots: Vec<&str> = graph.nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(roots, vec!["OffHook", "Ringing", "Connected"]);

        let connected = graph.node("Connected").unwrap();
        assert_eq!(connected.substates.len(), 1);
        assert_eq!(connected.substates[0].name, "OnHold");
        assert_eq!(connected.entry_actions, vec!["start timer"]);
        assert_eq!(connected.exit_actions, vec!["stop timer"]);
        assert_eq!(
            graph.node("OnHold").unwrap().entry_actions,
            vec!["Function [Hold]"]
        );
    }

    #[test]
    fn guarded_transitions_carry_guard_in_label() {
        let graph = export(&phone().get_info("Phone", "Call"));

        let answer = graph
            .transitions
            .iter()
            .find(|t| t.source() == "Ringing" && t.destination() == "Connected")
            .unwrap();
        assert_eq!(answer.label(), "Answer [line free]");
    }

    #[test]
    fn only_reentries_are_drawn_as_self_loops() {
        let graph = export(&phone().get_info("Phone", "Call"));

        let loops: Vec<&str> = graph
            .edges()
            .filter(|t| t.source() == t.destination())
            .map(GraphTransition::label)
            .collect();
        assert_eq!(loops, vec!["Mute"]);

        let ignored = graph
            .transitions
            .iter()
            .find(|t| t.label() == "Nudge")
            .unwrap();
        assert!(!ignored.is_drawn());
    }

    #[test]
    fn edges_follow_declaration_order() {
        let graph = export(&phone().get_info("Phone", "Call"));
        let labels: Vec<&str> = graph.edges().map(GraphTransition::label).collect();
        assert_eq!(
            labels,
            vec!["Dial", "Answer [line free]", "Hold", "Mute", "Resume"]
        );
    }

    #[test]
    fn repeated_exports_are_byte_identical() {
        let first = export(&phone().get_info("Phone", "Call")).to_json().unwrap();
        let second = export(&phone().get_info("Phone", "Call")).to_json().unwrap();
        assert_eq!(first, second);
        assert!(first.contains("\"kind\": \"stay\""));
    }

    #[derive(Clone, PartialEq, Eq, Hash, Debug)]
    enum Desk {
        Inbox,
        Team(u8),
    }

    impl crate::core::State for Desk {
        fn name(&self) -> &str {
            match self {
                Self::Inbox => "Inbox",
                Self::Team(_) => "Team",
            }
        }
    }

    #[test]
    fn states_sharing_a_name_get_their_own_nodes() {
        let mut machine: StateMachine<Desk, Call, ()> = StateMachine::with_initial(Desk::Inbox);
        machine
            .configure(Desk::Inbox)
            .permit(Call::Dial, Desk::Team(1))
            .unwrap()
            .permit(Call::Answer, Desk::Team(2))
            .unwrap();
        machine
            .configure(Desk::Team(2))
            .substate_of(Desk::Team(1))
            .unwrap();

        let info = machine.get_info("Desk", "Call");
        let graph = export(&info);

        assert_eq!(graph.node_count(), info.states.len());
        let outer = graph.node_by_id(1).unwrap();
        assert_eq!(outer.name, "Team");
        assert_eq!(outer.substates.len(), 1);
        assert_eq!(outer.substates[0].id, 2);

        let targets: Vec<usize> = graph.edges().map(GraphTransition::destination_id).collect();
        assert_eq!(targets, vec![1, 2]);
    }
}
