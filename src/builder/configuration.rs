//! Fluent handle for configuring one state.

use crate::builder::error::ConfigurationError;
use crate::core::{State, Transition, Trigger, TriggerArgs};
use crate::effects::representation::{Behaviour, StateTable, TriggerBehaviour};
use crate::effects::{ActionError, EntryAction, ExitAction, TransitionGuard};
use stillwater::effect::BoxedEffect;

/// Borrowed handle to the configuration of a single state.
///
/// Obtained from [`StateMachine::configure`](crate::effects::StateMachine::configure).
/// Steps that can be rejected return `Result<Self, ConfigurationError>` so a
/// chain reads naturally with `?`; the rest return `Self`.
pub struct StateConfiguration<'m, S: State, T: Trigger, Env> {
    table: &'m mut StateTable<S, T, Env>,
    index: usize,
}

impl<'m, S, T, Env> StateConfiguration<'m, S, T, Env>
where
    S: State,
    T: Trigger,
    Env: Clone + Send + Sync + 'static,
{
    pub(crate) fn new(table: &'m mut StateTable<S, T, Env>, index: usize) -> Self {
        Self { table, index }
    }

    /// The state being configured.
    pub fn state(&self) -> &S {
        &self.table.get(self.index).state
    }

    /// Move to `destination` when `trigger` fires.
    pub fn permit(self, trigger: T, destination: S) -> Result<Self, ConfigurationError> {
        let destination = self.table.ensure(destination);
        self.add(trigger, None, Behaviour::Transition(destination))
    }

    /// Move to `destination` when `trigger` fires and `guard` passes.
    ///
    /// Guarded candidates for one trigger are tried in registration order.
    /// `guard` is either a pure [`Guard`](crate::core::Guard) or an
    /// [`EffectGuard`](crate::effects::EffectGuard).
    pub fn permit_if(
        self,
        trigger: T,
        destination: S,
        guard: impl Into<TransitionGuard<Env>>,
    ) -> Result<Self, ConfigurationError> {
        let destination = self.table.ensure(destination);
        self.add(trigger, Some(guard.into()), Behaviour::Transition(destination))
    }

    /// Exit and re-enter this state when `trigger` fires.
    pub fn permit_reentry(self, trigger: T) -> Result<Self, ConfigurationError> {
        self.add(trigger, None, Behaviour::Reentry)
    }

    pub fn permit_reentry_if(
        self,
        trigger: T,
        guard: impl Into<TransitionGuard<Env>>,
    ) -> Result<Self, ConfigurationError> {
        self.add(trigger, Some(guard.into()), Behaviour::Reentry)
    }

    /// Accept `trigger` without changing state or running any action.
    pub fn ignore(self, trigger: T) -> Result<Self, ConfigurationError> {
        self.add(trigger, None, Behaviour::Ignore)
    }

    pub fn ignore_if(
        self,
        trigger: T,
        guard: impl Into<TransitionGuard<Env>>,
    ) -> Result<Self, ConfigurationError> {
        self.add(trigger, Some(guard.into()), Behaviour::Ignore)
    }

    /// Nest this state under `superstate`, inheriting its triggers and
    /// running its entry/exit actions when the hierarchy boundary is crossed.
    pub fn substate_of(self, superstate: S) -> Result<Self, ConfigurationError> {
        let superstate = self.table.ensure(superstate);
        self.table.set_superstate(self.index, superstate)?;
        Ok(self)
    }

    /// Run `action` on every entry into this state.
    pub fn on_entry<F>(self, action: F) -> Self
    where
        F: Fn(&Transition<S, T>, &TriggerArgs) -> BoxedEffect<(), ActionError, Env>
            + Send
            + Sync
            + 'static,
    {
        self.push_entry(EntryAction::new(action, None, None))
    }

    pub fn on_entry_described<F>(self, description: impl Into<String>, action: F) -> Self
    where
        F: Fn(&Transition<S, T>, &TriggerArgs) -> BoxedEffect<(), ActionError, Env>
            + Send
            + Sync
            + 'static,
    {
        self.push_entry(EntryAction::new(action, None, Some(description.into())))
    }

    /// Run `action` only when the entry was caused by `trigger`.
    pub fn on_entry_from<F>(self, trigger: T, action: F) -> Self
    where
        F: Fn(&Transition<S, T>, &TriggerArgs) -> BoxedEffect<(), ActionError, Env>
            + Send
            + Sync
            + 'static,
    {
        self.push_entry(EntryAction::new(action, Some(trigger), None))
    }

    pub fn on_entry_from_described<F>(
        self,
        trigger: T,
        description: impl Into<String>,
        action: F,
    ) -> Self
    where
        F: Fn(&Transition<S, T>, &TriggerArgs) -> BoxedEffect<(), ActionError, Env>
            + Send
            + Sync
            + 'static,
    {
        self.push_entry(EntryAction::new(
            action,
            Some(trigger),
            Some(description.into()),
        ))
    }

    /// Run `action` on every exit from this state.
    pub fn on_exit<F>(self, action: F) -> Self
    where
        F: Fn(&Transition<S, T>) -> BoxedEffect<(), ActionError, Env> + Send + Sync + 'static,
    {
        self.push_exit(ExitAction::new(action, None))
    }

    pub fn on_exit_described<F>(self, description: impl Into<String>, action: F) -> Self
    where
        F: Fn(&Transition<S, T>) -> BoxedEffect<(), ActionError, Env> + Send + Sync + 'static,
    {
        self.push_exit(ExitAction::new(action, Some(description.into())))
    }

    fn add(
        self,
        trigger: T,
        guard: Option<TransitionGuard<Env>>,
        behaviour: Behaviour,
    ) -> Result<Self, ConfigurationError> {
        self.table.add_behaviour(
            self.index,
            TriggerBehaviour {
                trigger,
                guard,
                behaviour,
            },
        )?;
        Ok(self)
    }

    fn push_entry(self, action: EntryAction<S, T, Env>) -> Self {
        self.table.get_mut(self.index).entry_actions.push(action);
        self
    }

    fn push_exit(self, action: ExitAction<S, T, Env>) -> Self {
        self.table.get_mut(self.index).exit_actions.push(action);
        self
    }
}
