//! Serialization of `fire` calls on one machine.
//!
//! A machine resolves one trigger at a time. The gate hands out a single
//! token; a caller arriving while it is taken is either rejected or has its
//! trigger queued for the token holder to run, depending on [`FiringMode`].
//! The lock is only held to flip the flag or touch the queue, never across
//! an action.
//!
//! Every queued fire carries a oneshot responder. The token holder sends the
//! queued fire's own outcome through it; a queued fire discarded before it
//! ran sees its responder dropped.

use super::error::FireError;
use crate::core::TriggerArgs;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tokio::sync::oneshot;

/// What happens to a `fire` that arrives while another is in progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FiringMode {
    /// Reject it with `FireError::FireInProgress`.
    #[default]
    Immediate,
    /// Queue it; the in-flight caller runs it after its own transition.
    Queued,
}

pub(crate) type FireResponder = oneshot::Sender<Result<(), FireError>>;

pub(crate) struct QueuedFire<T, Env> {
    pub(crate) trigger: T,
    pub(crate) args: TriggerArgs,
    pub(crate) env: Env,
    pub(crate) resp: FireResponder,
}

struct GateState<T, Env> {
    busy: bool,
    queue: VecDeque<QueuedFire<T, Env>>,
}

pub(crate) struct FiringGate<T, Env> {
    mode: FiringMode,
    state: Mutex<GateState<T, Env>>,
}

pub(crate) enum Admission<'g, T, Env> {
    Granted(FiringToken<'g, T, Env>),
    Queued(oneshot::Receiver<Result<(), FireError>>),
    Rejected,
}

impl<T: Clone, Env: Clone> FiringGate<T, Env> {
    pub(crate) fn new(mode: FiringMode) -> Self {
        Self {
            mode,
            state: Mutex::new(GateState {
                busy: false,
                queue: VecDeque::new(),
            }),
        }
    }

    pub(crate) fn mode(&self) -> FiringMode {
        self.mode
    }

    pub(crate) fn set_mode(&mut self, mode: FiringMode) {
        self.mode = mode;
    }

    pub(crate) fn admit(&self, trigger: &T, args: &TriggerArgs, env: &Env) -> Admission<'_, T, Env> {
        let mut state = self.state.lock();
        if !state.busy {
            state.busy = true;
            return Admission::Granted(FiringToken {
                gate: self,
                released: false,
            });
        }

        match self.mode {
            FiringMode::Immediate => Admission::Rejected,
            FiringMode::Queued => {
                let (resp, done) = oneshot::channel();
                state.queue.push_back(QueuedFire {
                    trigger: trigger.clone(),
                    args: args.clone(),
                    env: env.clone(),
                    resp,
                });
                Admission::Queued(done)
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn queued(&self) -> usize {
        self.state.lock().queue.len()
    }
}

/// Exclusive right to run the firing algorithm.
///
/// Dropping the token without draining releases the gate and discards
/// anything still queued, closing each discarded fire's responder.
pub(crate) struct FiringToken<'g, T, Env> {
    gate: &'g FiringGate<T, Env>,
    released: bool,
}

impl<T, Env> FiringToken<'_, T, Env> {
    /// Next queued fire, or `None` after atomically releasing the gate.
    pub(crate) fn next_queued(&mut self) -> Option<QueuedFire<T, Env>> {
        let mut state = self.gate.state.lock();
        let next = state.queue.pop_front();
        if next.is_none() {
            state.busy = false;
            self.released = true;
        }
        next
    }
}

impl<T, Env> Drop for FiringToken<'_, T, Env> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        let mut state = self.gate.state.lock();
        if !state.queue.is_empty() {
            tracing::warn!(
                discarded = state.queue.len(),
                "Discarding queued triggers before they ran"
            );
        }
        state.queue.clear();
        state.busy = false;
    }
}
