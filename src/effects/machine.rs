//! State machine that fires triggers through the configured hierarchy.

use crate::builder::StateConfiguration;
use crate::config::Settings;
use crate::core::{State, Transition, Trigger, TriggerArgs};
use crate::effects::error::FireError;
use crate::effects::firing::{Admission, FiringGate, FiringMode};
use crate::effects::representation::{Resolution, Route, StateTable};
use crate::reflection::StateMachineInfo;
use parking_lot::Mutex;
use std::sync::Arc;

type Accessor<S> = Box<dyn Fn() -> S + Send + Sync>;
type Mutator<S> = Box<dyn Fn(S) + Send + Sync>;
type Observer<S, T> = Box<dyn Fn(&Transition<S, T>) + Send + Sync>;

/// Hierarchical state machine over host-owned state.
///
/// The machine stores rules, not state: the current state is read through
/// the accessor and committed through the mutator supplied at construction.
/// Configuration needs `&mut self`; firing only needs `&self`, and overlapping
/// fires on one instance are serialized according to [`FiringMode`].
///
/// `Env` is the environment entry and exit effects run against.
///
/// # Example
///
/// ```rust
/// use strata::effects::StateMachine;
/// use strata::{state_enum, trigger_enum};
///
/// state_enum! {
///     enum Light {
///         Off,
///         On,
///     }
/// }
///
/// trigger_enum! {
///     enum Switch {
///         Toggle,
///     }
/// }
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut machine: StateMachine<Light, Switch, ()> = StateMachine::with_initial(Light::Off);
/// machine.configure(Light::Off).permit(Switch::Toggle, Light::On)?;
/// machine.configure(Light::On).permit(Switch::Toggle, Light::Off)?;
///
/// machine.fire(Switch::Toggle, &()).await?;
/// assert_eq!(machine.state(), Light::On);
/// # Ok(())
/// # }
/// ```
pub struct StateMachine<S: State, T: Trigger, Env: Clone + Send + Sync + 'static> {
    accessor: Accessor<S>,
    mutator: Mutator<S>,
    table: StateTable<S, T, Env>,
    observers: Vec<Observer<S, T>>,
    gate: FiringGate<T, Env>,
}

impl<S, T, Env> StateMachine<S, T, Env>
where
    S: State,
    T: Trigger,
    Env: Clone + Send + Sync + 'static,
{
    /// Create a machine over externally stored state.
    pub fn new<A, M>(accessor: A, mutator: M) -> Self
    where
        A: Fn() -> S + Send + Sync + 'static,
        M: Fn(S) + Send + Sync + 'static,
    {
        Self {
            accessor: Box::new(accessor),
            mutator: Box::new(mutator),
            table: StateTable::new(),
            observers: Vec::new(),
            gate: FiringGate::new(FiringMode::default()),
        }
    }

    /// Create a machine that keeps its state in an internal cell.
    pub fn with_initial(initial: S) -> Self {
        let cell = Arc::new(Mutex::new(initial));
        let reader = Arc::clone(&cell);
        Self::new(move || reader.lock().clone(), move |s| *cell.lock() = s)
    }

    pub fn with_firing_mode(mut self, mode: FiringMode) -> Self {
        self.gate.set_mode(mode);
        self
    }

    pub fn with_settings(self, settings: &Settings) -> Self {
        self.with_firing_mode(settings.firing_mode)
    }

    pub fn firing_mode(&self) -> FiringMode {
        self.gate.mode()
    }

    /// Configuration handle for `state`, created on first use.
    pub fn configure(&mut self, state: S) -> StateConfiguration<'_, S, T, Env> {
        let index = self.table.ensure(state);
        StateConfiguration::new(&mut self.table, index)
    }

    /// Register an observer called after each state commit, before entry
    /// actions run.
    pub fn on_transitioned<F>(&mut self, observer: F)
    where
        F: Fn(&Transition<S, T>) + Send + Sync + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    /// Current state, read through the accessor.
    pub fn state(&self) -> S {
        (self.accessor)()
    }

    /// True when the current state is `state` or one of its substates.
    pub fn is_in_state(&self, state: &S) -> bool {
        let current = self.state();
        if &current == state {
            return true;
        }
        match (self.table.find(state), self.table.find(&current)) {
            (Some(ancestor), Some(current)) => self.table.includes(ancestor, current),
            _ => false,
        }
    }

    /// Whether firing `trigger` without arguments would select a transition.
    pub async fn can_fire(&self, trigger: &T, env: &Env) -> Result<bool, FireError> {
        self.can_fire_with(trigger, &TriggerArgs::none(), env).await
    }

    /// Whether firing `trigger` with `args` would select a transition.
    ///
    /// Runs resolution and guards only; no action runs and state is untouched.
    /// Effect guards run against `env`, and their errors are returned as
    /// [`FireError::Action`].
    pub async fn can_fire_with(
        &self,
        trigger: &T,
        args: &TriggerArgs,
        env: &Env,
    ) -> Result<bool, FireError> {
        let resolution = self.table.resolve(&self.state(), trigger, args, env).await?;
        Ok(matches!(resolution, Resolution::Selected { .. }))
    }

    /// Triggers that can currently be fired without arguments.
    pub async fn permitted_triggers(&self, env: &Env) -> Result<Vec<T>, FireError> {
        let current = self.state();
        let mut permitted = Vec::new();
        for trigger in self.table.known_triggers(&current) {
            let resolution = self
                .table
                .resolve(&current, &trigger, &TriggerArgs::none(), env)
                .await?;
            if matches!(resolution, Resolution::Selected { .. }) {
                permitted.push(trigger);
            }
        }
        Ok(permitted)
    }

    /// Snapshot of the configuration for introspection and graph export.
    pub fn get_info(&self, state_label: &str, trigger_label: &str) -> StateMachineInfo {
        self.table.info(state_label, trigger_label)
    }

    /// Fire `trigger` without arguments.
    pub async fn fire(&self, trigger: T, env: &Env) -> Result<(), FireError> {
        self.fire_with(trigger, TriggerArgs::none(), env).await
    }

    /// Fire `trigger`, forwarding `args` to guards and entry actions.
    ///
    /// Action failures are returned as-is; anything that already ran (exit
    /// actions, the state commit) is not rolled back.
    ///
    /// In [`FiringMode::Queued`] an overlapping call waits until the
    /// in-flight caller has run its trigger and returns that trigger's own
    /// outcome. A failure discards whatever is still queued, and those
    /// callers get [`FireError::Abandoned`]. An action must not await a fire
    /// on its own machine in this mode, since that fire waits for the action.
    pub async fn fire_with(&self, trigger: T, args: TriggerArgs, env: &Env) -> Result<(), FireError> {
        let mut token = match self.gate.admit(&trigger, &args, env) {
            Admission::Granted(token) => token,
            Admission::Queued(done) => {
                tracing::debug!(trigger = trigger.name(), "Queued trigger behind in-flight fire");
                return done.await.unwrap_or_else(|_| {
                    Err(FireError::Abandoned {
                        trigger: trigger.name().to_string(),
                    })
                });
            }
            Admission::Rejected => {
                tracing::warn!(
                    trigger = trigger.name(),
                    "Rejected trigger while another fire is in progress"
                );
                return Err(FireError::FireInProgress);
            }
        };

        self.run_fire(trigger, &args, env).await?;

        while let Some(queued) = token.next_queued() {
            let outcome = self
                .run_fire(queued.trigger, &queued.args, &queued.env)
                .await;
            let failed = outcome.is_err();
            if queued.resp.send(outcome).is_err() {
                tracing::debug!("Queued caller stopped waiting for its outcome");
            }
            if failed {
                break;
            }
        }

        Ok(())
    }

    async fn run_fire(&self, trigger: T, args: &TriggerArgs, env: &Env) -> Result<(), FireError> {
        let source = self.state();

        let (owner, behaviour) = match self.table.resolve(&source, &trigger, args, env).await? {
            Resolution::Selected { owner, behaviour } => (owner, behaviour),
            Resolution::NotPermitted => {
                tracing::warn!(
                    state = source.name(),
                    trigger = trigger.name(),
                    "Trigger not permitted"
                );
                return Err(FireError::TriggerNotPermitted {
                    state: source.name().to_string(),
                    trigger: trigger.name().to_string(),
                });
            }
            Resolution::Rejected { guards } => {
                tracing::warn!(
                    state = source.name(),
                    trigger = trigger.name(),
                    "All guards rejected trigger"
                );
                return Err(FireError::GuardRejected {
                    state: source.name().to_string(),
                    trigger: trigger.name().to_string(),
                    guards,
                });
            }
        };

        // Selected implies the source has a configuration.
        let Some(source_index) = self.table.find(&source) else {
            return Ok(());
        };

        let Some(route) = self.table.route(source_index, owner, behaviour) else {
            tracing::debug!(
                state = source.name(),
                trigger = trigger.name(),
                "Ignored trigger"
            );
            return Ok(());
        };

        self.traverse(source, trigger, route, args, env).await
    }

    async fn traverse(
        &self,
        source: S,
        trigger: T,
        route: Route,
        args: &TriggerArgs,
        env: &Env,
    ) -> Result<(), FireError> {
        let destination = self.table.get(route.destination).state.clone();
        let transition = Transition::new(source, destination, trigger);

        tracing::debug!(
            source = transition.source.name(),
            destination = transition.destination.name(),
            trigger = transition.trigger.name(),
            "Firing transition"
        );

        for &index in &route.exits {
            let representation = self.table.get(index);
            for action in &representation.exit_actions {
                tracing::debug!(
                    state = representation.state.name(),
                    action = action.label(),
                    "Running exit action"
                );
                action.execute(&transition, env).await?;
            }
        }

        (self.mutator)(transition.destination.clone());

        for observer in &self.observers {
            observer(&transition);
        }

        for &index in &route.entries {
            let representation = self.table.get(index);
            for action in representation
                .entry_actions
                .iter()
                .filter(|a| a.applies_to(&transition.trigger))
            {
                tracing::debug!(
                    state = representation.state.name(),
                    action = action.label(),
                    "Running entry action"
                );
                action.execute(&transition, args, env).await?;
            }
        }

        Ok(())
    }
}
