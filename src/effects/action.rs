//! Entry and exit actions backed by stillwater effects.

use crate::core::{ArgumentError, State, Transition, Trigger, TriggerArgs};
use crate::reflection::{ActionInfo, InvocationInfo, TriggerInfo};
use std::sync::Arc;
use stillwater::effect::{BoxedEffect, Effect};

/// Errors raised by host-supplied actions.
///
/// The engine never wraps, retries or swallows these; they reach the
/// caller of `fire` as [`FireError::Action`](super::FireError::Action).
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error(transparent)]
    Argument(#[from] ArgumentError),

    #[error("Action failed: {0}")]
    Failed(String),

    #[error(transparent)]
    Host(Box<dyn std::error::Error + Send + Sync>),
}

impl ActionError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }

    pub fn host<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Host(Box::new(error))
    }
}

/// Factory producing a fresh entry effect for each entry.
pub type EntryActionFn<S, T, Env> = Arc<
    dyn Fn(&Transition<S, T>, &TriggerArgs) -> BoxedEffect<(), ActionError, Env> + Send + Sync,
>;

/// Factory producing a fresh exit effect for each exit.
pub type ExitActionFn<S, T, Env> =
    Arc<dyn Fn(&Transition<S, T>) -> BoxedEffect<(), ActionError, Env> + Send + Sync>;

pub(crate) struct EntryAction<S: State, T: Trigger, Env> {
    action: EntryActionFn<S, T, Env>,
    from_trigger: Option<T>,
    info: InvocationInfo,
}

impl<S, T, Env> EntryAction<S, T, Env>
where
    S: State,
    T: Trigger,
    Env: Clone + Send + Sync + 'static,
{
    pub(crate) fn new<F>(action: F, from_trigger: Option<T>, description: Option<String>) -> Self
    where
        F: Fn(&Transition<S, T>, &TriggerArgs) -> BoxedEffect<(), ActionError, Env>
            + Send
            + Sync
            + 'static,
    {
        Self {
            action: Arc::new(action),
            from_trigger,
            info: InvocationInfo::new(description),
        }
    }

    /// Unscoped actions run for every entry; scoped ones only for their trigger.
    pub(crate) fn applies_to(&self, trigger: &T) -> bool {
        self.from_trigger.as_ref().is_none_or(|t| t == trigger)
    }

    pub(crate) async fn execute(
        &self,
        transition: &Transition<S, T>,
        args: &TriggerArgs,
        env: &Env,
    ) -> Result<(), ActionError> {
        (self.action)(transition, args).run(env).await
    }

    pub(crate) fn info(&self) -> ActionInfo {
        ActionInfo {
            method: self.info.clone(),
            from_trigger: self
                .from_trigger
                .as_ref()
                .map(|t| TriggerInfo::new(t.name())),
        }
    }

    pub(crate) fn label(&self) -> &str {
        self.info.label()
    }
}

pub(crate) struct ExitAction<S: State, T: Trigger, Env> {
    action: ExitActionFn<S, T, Env>,
    info: InvocationInfo,
}

impl<S, T, Env> ExitAction<S, T, Env>
where
    S: State,
    T: Trigger,
    Env: Clone + Send + Sync + 'static,
{
    pub(crate) fn new<F>(action: F, description: Option<String>) -> Self
    where
        F: Fn(&Transition<S, T>) -> BoxedEffect<(), ActionError, Env> + Send + Sync + 'static,
    {
        Self {
            action: Arc::new(action),
            info: InvocationInfo::new(description),
        }
    }

    pub(crate) async fn execute(
        &self,
        transition: &Transition<S, T>,
        env: &Env,
    ) -> Result<(), ActionError> {
        (self.action)(transition).run(env).await
    }

    pub(crate) fn info(&self) -> InvocationInfo {
        self.info.clone()
    }

    pub(crate) fn label(&self) -> &str {
        self.info.label()
    }
}
