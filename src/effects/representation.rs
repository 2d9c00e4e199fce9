//! Per-state rule tables and the hierarchy they form.
//!
//! States live in an arena indexed by declaration order. Superstate and
//! substate links are arena indices, so the hierarchy never owns itself and
//! walks are O(depth).

use super::action::{ActionError, EntryAction, ExitAction};
use super::guard::TransitionGuard;
use crate::builder::ConfigurationError;
use crate::core::{State, Trigger, TriggerArgs};
use crate::reflection::{
    InvocationInfo, StateInfo, StateMachineInfo, TransitionInfo, TransitionKind, TriggerInfo,
};
use std::collections::HashMap;

/// What a selected trigger does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Behaviour {
    /// Move to the state at this arena index.
    Transition(usize),
    /// Exit and re-enter the owning state.
    Reentry,
    /// Stay put; no actions run.
    Ignore,
}

pub(crate) struct TriggerBehaviour<T: Trigger, Env> {
    pub(crate) trigger: T,
    pub(crate) guard: Option<TransitionGuard<Env>>,
    pub(crate) behaviour: Behaviour,
}

impl<T: Trigger, Env: Clone + Send + Sync + 'static> TriggerBehaviour<T, Env> {
    async fn passes(&self, args: &TriggerArgs, env: &Env) -> Result<bool, ActionError> {
        match &self.guard {
            Some(guard) => guard.check(args, env).await,
            None => Ok(true),
        }
    }
}

impl<T: Trigger, Env> TriggerBehaviour<T, Env> {
    fn guard_label(&self) -> String {
        self.guard
            .as_ref()
            .map(|g| InvocationInfo::new(g.description().map(str::to_string)).label().to_string())
            .unwrap_or_default()
    }
}

pub(crate) struct StateRepresentation<S: State, T: Trigger, Env> {
    pub(crate) state: S,
    pub(crate) superstate: Option<usize>,
    pub(crate) substates: Vec<usize>,
    pub(crate) behaviours: Vec<TriggerBehaviour<T, Env>>,
    pub(crate) entry_actions: Vec<EntryAction<S, T, Env>>,
    pub(crate) exit_actions: Vec<ExitAction<S, T, Env>>,
}

impl<S: State, T: Trigger, Env> StateRepresentation<S, T, Env> {
    fn new(state: S) -> Self {
        Self {
            state,
            superstate: None,
            substates: Vec::new(),
            behaviours: Vec::new(),
            entry_actions: Vec::new(),
            exit_actions: Vec::new(),
        }
    }
}

/// Outcome of looking a trigger up from some state.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Resolution {
    /// `owner` is the configuration (possibly a superstate) that handled it.
    Selected { owner: usize, behaviour: Behaviour },
    NotPermitted,
    Rejected { guards: Vec<String> },
}

/// The ordered walk a selected transition performs.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Route {
    pub(crate) destination: usize,
    /// Innermost first.
    pub(crate) exits: Vec<usize>,
    /// Outermost first.
    pub(crate) entries: Vec<usize>,
}

pub(crate) struct StateTable<S: State, T: Trigger, Env> {
    states: Vec<StateRepresentation<S, T, Env>>,
    index: HashMap<S, usize>,
}

impl<S: State, T: Trigger, Env> StateTable<S, T, Env> {
    pub(crate) fn new() -> Self {
        Self {
            states: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Index for `state`, creating an empty configuration on first reference.
    pub(crate) fn ensure(&mut self, state: S) -> usize {
        if let Some(&idx) = self.index.get(&state) {
            return idx;
        }
        let idx = self.states.len();
        self.index.insert(state.clone(), idx);
        self.states.push(StateRepresentation::new(state));
        idx
    }

    pub(crate) fn find(&self, state: &S) -> Option<usize> {
        self.index.get(state).copied()
    }

    pub(crate) fn get(&self, idx: usize) -> &StateRepresentation<S, T, Env> {
        &self.states[idx]
    }

    pub(crate) fn get_mut(&mut self, idx: usize) -> &mut StateRepresentation<S, T, Env> {
        &mut self.states[idx]
    }

    /// `idx` followed by each of its superstates, innermost first.
    pub(crate) fn lineage(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        std::iter::successors(Some(idx), move |&i| self.states[i].superstate)
    }

    /// True when `other` is `ancestor` or one of its (transitive) substates.
    pub(crate) fn includes(&self, ancestor: usize, other: usize) -> bool {
        self.lineage(other).any(|i| i == ancestor)
    }

    pub(crate) fn add_behaviour(
        &mut self,
        idx: usize,
        behaviour: TriggerBehaviour<T, Env>,
    ) -> Result<(), ConfigurationError> {
        let representation = &self.states[idx];

        if let Behaviour::Transition(destination) = behaviour.behaviour {
            if destination == idx {
                return Err(ConfigurationError::SelfTransition {
                    state: representation.state.name().to_string(),
                    trigger: behaviour.trigger.name().to_string(),
                });
            }
        }

        let duplicate = behaviour.guard.is_none()
            && representation
                .behaviours
                .iter()
                .any(|b| b.trigger == behaviour.trigger && b.guard.is_none());
        if duplicate {
            return Err(ConfigurationError::DuplicateTrigger {
                state: representation.state.name().to_string(),
                trigger: behaviour.trigger.name().to_string(),
            });
        }

        self.states[idx].behaviours.push(behaviour);
        Ok(())
    }

    pub(crate) fn set_superstate(
        &mut self,
        idx: usize,
        superstate: usize,
    ) -> Result<(), ConfigurationError> {
        let state_name = || self.states[idx].state.name().to_string();
        let superstate_name = || self.states[superstate].state.name().to_string();

        match self.states[idx].superstate {
            Some(existing) if existing == superstate => return Ok(()),
            Some(existing) => {
                return Err(ConfigurationError::SuperstateAlreadySet {
                    state: state_name(),
                    existing: self.states[existing].state.name().to_string(),
                    requested: superstate_name(),
                })
            }
            None => {}
        }

        // The new parent must not already sit below (or be) this state.
        if self.includes(idx, superstate) {
            return Err(ConfigurationError::SubstateCycle {
                state: state_name(),
                superstate: superstate_name(),
            });
        }

        self.states[idx].superstate = Some(superstate);
        self.states[superstate].substates.push(idx);
        Ok(())
    }

    /// Find the behaviour `trigger` selects from `state`, most-derived
    /// configuration first. The first configuration that knows the trigger
    /// decides; its candidates are tried in registration order.
    ///
    /// A guard effect that fails stops the search and its error is returned.
    pub(crate) async fn resolve(
        &self,
        state: &S,
        trigger: &T,
        args: &TriggerArgs,
        env: &Env,
    ) -> Result<Resolution, ActionError>
    where
        Env: Clone + Send + Sync + 'static,
    {
        let Some(start) = self.find(state) else {
            return Ok(Resolution::NotPermitted);
        };

        for idx in self.lineage(start) {
            let mut candidates = self.states[idx]
                .behaviours
                .iter()
                .filter(|b| &b.trigger == trigger)
                .peekable();

            if candidates.peek().is_none() {
                continue;
            }

            let mut guards = Vec::new();
            for candidate in candidates {
                let passed = candidate.passes(args, env).await?;
                tracing::trace!(
                    state = self.states[idx].state.name(),
                    trigger = trigger.name(),
                    guarded = candidate.guard.is_some(),
                    passed,
                    "Evaluated transition candidate"
                );
                if passed {
                    return Ok(Resolution::Selected {
                        owner: idx,
                        behaviour: candidate.behaviour,
                    });
                }
                guards.push(candidate.guard_label());
            }
            return Ok(Resolution::Rejected { guards });
        }

        Ok(Resolution::NotPermitted)
    }

    /// Exit and entry walk for a selected behaviour. `None` for ignores.
    pub(crate) fn route(&self, source: usize, owner: usize, behaviour: Behaviour) -> Option<Route> {
        match behaviour {
            Behaviour::Ignore => None,
            Behaviour::Reentry => {
                // Leave everything up to and including the owner, then come back in.
                let mut exits = Vec::new();
                for idx in self.lineage(source) {
                    exits.push(idx);
                    if idx == owner {
                        break;
                    }
                }
                Some(Route {
                    destination: owner,
                    exits,
                    entries: vec![owner],
                })
            }
            Behaviour::Transition(destination) => {
                let exits = self
                    .lineage(source)
                    .take_while(|&idx| !self.includes(idx, destination))
                    .collect();
                let mut entries: Vec<usize> = self
                    .lineage(destination)
                    .take_while(|&idx| !self.includes(idx, source))
                    .collect();
                entries.reverse();
                Some(Route {
                    destination,
                    exits,
                    entries,
                })
            }
        }
    }

    /// Distinct triggers known anywhere in `state`'s lineage, most-derived
    /// first, in registration order.
    pub(crate) fn known_triggers(&self, state: &S) -> Vec<T> {
        let Some(start) = self.find(state) else {
            return Vec::new();
        };
        let mut triggers: Vec<T> = Vec::new();
        for idx in self.lineage(start) {
            for behaviour in &self.states[idx].behaviours {
                if !triggers.contains(&behaviour.trigger) {
                    triggers.push(behaviour.trigger.clone());
                }
            }
        }
        triggers
    }

    pub(crate) fn info(&self, state_label: &str, trigger_label: &str) -> StateMachineInfo
    where
        Env: Clone + Send + Sync + 'static,
    {
        let states = self
            .states
            .iter()
            .enumerate()
            .map(|(idx, rep)| StateInfo {
                id: idx,
                name: rep.state.name().to_string(),
                superstate: rep.superstate,
                substates: rep.substates.clone(),
                entry_actions: rep.entry_actions.iter().map(EntryAction::info).collect(),
                exit_actions: rep.exit_actions.iter().map(ExitAction::info).collect(),
                transitions: rep
                    .behaviours
                    .iter()
                    .map(|b| {
                        let (destination, kind) = match b.behaviour {
                            Behaviour::Transition(dest) => (dest, TransitionKind::Fixed),
                            Behaviour::Reentry => (idx, TransitionKind::Reentry),
                            Behaviour::Ignore => (idx, TransitionKind::Ignored),
                        };
                        TransitionInfo {
                            trigger: TriggerInfo::new(b.trigger.name()),
                            destination,
                            guards: b
                                .guard
                                .iter()
                                .map(|g| InvocationInfo::new(g.description().map(str::to_string)))
                                .collect(),
                            kind,
                        }
                    })
                    .collect(),
            })
            .collect();

        StateMachineInfo {
            state_type: state_label.to_string(),
            trigger_type: trigger_label.to_string(),
            states,
        }
    }
}
