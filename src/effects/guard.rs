//! Guards whose verdict is an effect.
//!
//! A pure [`Guard`] only sees the fire-time arguments. An [`EffectGuard`]
//! also runs against the machine's environment, so it can await I/O or fail.
//! Both are accepted wherever a configuration step takes a guard.

use super::action::ActionError;
use crate::core::{Guard, TriggerArgs};
use std::fmt;
use stillwater::effect::{BoxedEffect, Effect};

type GuardEffectFn<Env> =
    Box<dyn Fn(&TriggerArgs) -> BoxedEffect<bool, ActionError, Env> + Send + Sync>;

/// Guard that decides by running an effect against `Env`.
///
/// An error from the effect aborts evaluation: `fire` returns it as
/// [`FireError::Action`](super::FireError::Action) and runs nothing else.
///
/// # Example
///
/// ```rust
/// use stillwater::prelude::*;
/// use strata::core::TriggerArgs;
/// use strata::effects::{ActionError, EffectGuard};
///
/// #[derive(Clone)]
/// struct Quota {
///     remaining: u32,
/// }
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), ActionError> {
/// let has_quota = EffectGuard::described("has quota", |_: &TriggerArgs| {
///     from_fn(|quota: &Quota| Ok::<_, ActionError>(quota.remaining > 0)).boxed()
/// });
///
/// assert!(has_quota.check(&TriggerArgs::none(), &Quota { remaining: 1 }).await?);
/// assert!(!has_quota.check(&TriggerArgs::none(), &Quota { remaining: 0 }).await?);
/// # Ok(())
/// # }
/// ```
pub struct EffectGuard<Env> {
    predicate: GuardEffectFn<Env>,
    description: Option<String>,
}

impl<Env> EffectGuard<Env>
where
    Env: Clone + Send + Sync + 'static,
{
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&TriggerArgs) -> BoxedEffect<bool, ActionError, Env> + Send + Sync + 'static,
    {
        Self {
            predicate: Box::new(predicate),
            description: None,
        }
    }

    pub fn described<F>(description: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&TriggerArgs) -> BoxedEffect<bool, ActionError, Env> + Send + Sync + 'static,
    {
        Self {
            predicate: Box::new(predicate),
            description: Some(description.into()),
        }
    }

    pub async fn check(&self, args: &TriggerArgs, env: &Env) -> Result<bool, ActionError> {
        (self.predicate)(args).run(env).await
    }
}

impl<Env> EffectGuard<Env> {
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl<Env> fmt::Debug for EffectGuard<Env> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectGuard")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Either kind of guard, as stored on a transition candidate.
#[derive(Debug)]
pub enum TransitionGuard<Env> {
    Pure(Guard),
    Effect(EffectGuard<Env>),
}

impl<Env> TransitionGuard<Env>
where
    Env: Clone + Send + Sync + 'static,
{
    pub async fn check(&self, args: &TriggerArgs, env: &Env) -> Result<bool, ActionError> {
        match self {
            Self::Pure(guard) => Ok(guard.check(args)),
            Self::Effect(guard) => guard.check(args, env).await,
        }
    }
}

impl<Env> TransitionGuard<Env> {
    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Pure(guard) => guard.description(),
            Self::Effect(guard) => guard.description(),
        }
    }
}

impl<Env> From<Guard> for TransitionGuard<Env> {
    fn from(guard: Guard) -> Self {
        Self::Pure(guard)
    }
}

impl<Env> From<EffectGuard<Env>> for TransitionGuard<Env> {
    fn from(guard: EffectGuard<Env>) -> Self {
        Self::Effect(guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stillwater::prelude::*;

    #[derive(Clone)]
    struct Roster {
        managers: Vec<&'static str>,
        online: bool,
    }

    fn is_manager() -> EffectGuard<Roster> {
        EffectGuard::described("is manager", |args: &TriggerArgs| {
            let name = args.get::<String>(0);
            from_fn(move |roster: &Roster| -> Result<bool, ActionError> {
                if !roster.online {
                    return Err(ActionError::failed("roster offline"));
                }
                let name = name.clone()?;
                Ok(roster.managers.contains(&name.as_str()))
            })
            .boxed()
        })
    }

    fn roster(online: bool) -> Roster {
        Roster {
            managers: vec!["ada"],
            online,
        }
    }

    #[tokio::test]
    async fn effect_guard_reads_the_environment() {
        let guard = is_manager();
        assert!(guard
            .check(&TriggerArgs::one("ada"), &roster(true))
            .await
            .unwrap());
        assert!(!guard
            .check(&TriggerArgs::one("bob"), &roster(true))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn effect_guard_errors_are_returned() {
        let result = is_manager()
            .check(&TriggerArgs::one("ada"), &roster(false))
            .await;
        assert!(matches!(result, Err(ActionError::Failed(ref m)) if m == "roster offline"));

        let missing = is_manager().check(&TriggerArgs::none(), &roster(true)).await;
        assert!(matches!(missing, Err(ActionError::Argument(_))));
    }

    #[tokio::test]
    async fn pure_guards_convert_and_never_fail() {
        let guard: TransitionGuard<Roster> = Guard::described("always", |_| true).into();
        assert_eq!(guard.description(), Some("always"));
        assert!(guard
            .check(&TriggerArgs::none(), &roster(false))
            .await
            .unwrap());

        let effect: TransitionGuard<Roster> = is_manager().into();
        assert_eq!(effect.description(), Some("is manager"));
    }
}
