//! Bug tracker workflow driven end to end through the engine.

use parking_lot::Mutex;
use std::sync::Arc;
use stillwater::effect::BoxedEffect;
use stillwater::prelude::*;
use strata::core::{ArgumentError, Trigger};
use strata::effects::{ActionError, FireError, StateMachine};
use strata::graph;
use strata::{state_enum, trigger_enum, ConfigurationError, TriggerArgs};

state_enum! {
    enum BugState {
        Open,
        Assigned,
        Deferred,
        Resolved,
        Closed,
    }
}

trigger_enum! {
    enum BugTrigger {
        Assign,
        Defer,
        Resolve,
        Close,
    }
}

/// Outbound mail plus the assignee the mail is addressed to.
#[derive(Clone)]
struct Mailer {
    title: String,
    assignee: Arc<Mutex<Option<String>>>,
    sent: Arc<Mutex<Vec<String>>>,
}

impl Mailer {
    fn send_to_assignee(&self, message: &str) {
        let to = self
            .assignee
            .lock()
            .clone()
            .unwrap_or_else(|| "nobody".to_string());
        self.sent
            .lock()
            .push(format!("{to}, RE {}: {message}", self.title));
    }
}

fn on_assigned(assignee: Result<String, ArgumentError>) -> BoxedEffect<(), ActionError, Mailer> {
    from_fn(move |mailer: &Mailer| -> Result<(), ActionError> {
        let assignee = assignee.clone()?;
        let previous = mailer.assignee.lock().clone();
        if previous.as_ref().is_some_and(|p| p != &assignee) {
            mailer.send_to_assignee("Don't forget to help the new employee!");
        }
        *mailer.assignee.lock() = Some(assignee);
        mailer.send_to_assignee("You own it.");
        Ok(())
    })
    .boxed()
}

fn on_deassigned() -> BoxedEffect<(), ActionError, Mailer> {
    from_fn(|mailer: &Mailer| -> Result<(), ActionError> {
        mailer.send_to_assignee("You're off the hook.");
        Ok(())
    })
    .boxed()
}

fn clear_assignee() -> BoxedEffect<(), ActionError, Mailer> {
    from_fn(|mailer: &Mailer| -> Result<(), ActionError> {
        *mailer.assignee.lock() = None;
        Ok(())
    })
    .boxed()
}

struct Bug {
    state: Arc<Mutex<BugState>>,
    machine: StateMachine<BugState, BugTrigger, Mailer>,
    mailer: Mailer,
}

impl Bug {
    fn new(title: &str) -> Result<Self, ConfigurationError> {
        let state = Arc::new(Mutex::new(BugState::Open));
        let reader = Arc::clone(&state);
        let writer = Arc::clone(&state);
        let mut machine =
            StateMachine::new(move || *reader.lock(), move |s| *writer.lock() = s);

        machine
            .configure(BugState::Open)
            .permit(BugTrigger::Assign, BugState::Assigned)?;

        machine
            .configure(BugState::Assigned)
            .substate_of(BugState::Open)?
            .on_entry_from_described(BugTrigger::Assign, "on assigned", |_, args| {
                on_assigned(args.get::<String>(0))
            })
            .permit_reentry(BugTrigger::Assign)?
            .permit(BugTrigger::Close, BugState::Closed)?
            .permit(BugTrigger::Defer, BugState::Deferred)?
            .on_exit_described("on deassigned", |_| on_deassigned());

        machine
            .configure(BugState::Deferred)
            .on_entry_described("clear assignee", |_, _| clear_assignee())
            .permit(BugTrigger::Assign, BugState::Assigned)?;

        Ok(Self {
            state,
            machine,
            mailer: Mailer {
                title: title.to_string(),
                assignee: Arc::new(Mutex::new(None)),
                sent: Arc::new(Mutex::new(Vec::new())),
            },
        })
    }

    async fn assign(&self, assignee: &str) -> Result<(), FireError> {
        self.machine
            .fire_with(BugTrigger::Assign, TriggerArgs::one(assignee), &self.mailer)
            .await
    }

    async fn defer(&self) -> Result<(), FireError> {
        self.machine.fire(BugTrigger::Defer, &self.mailer).await
    }

    async fn close(&self) -> Result<(), FireError> {
        self.machine.fire(BugTrigger::Close, &self.mailer).await
    }

    async fn can_assign(&self) -> bool {
        self.machine
            .can_fire(&BugTrigger::Assign, &self.mailer)
            .await
            .unwrap_or(false)
    }

    fn state(&self) -> BugState {
        *self.state.lock()
    }

    fn assignee(&self) -> Option<String> {
        self.mailer.assignee.lock().clone()
    }

    /// Mail sent since the last call.
    fn take_mail(&self) -> Vec<String> {
        std::mem::take(&mut *self.mailer.sent.lock())
    }
}

#[tokio::test]
async fn bug_lifecycle_sends_expected_mail() {
    let bug = Bug::new("Incorrect stock count").unwrap();
    assert_eq!(bug.state(), BugState::Open);
    assert!(bug.can_assign().await);

    bug.assign("alice").await.unwrap();
    assert_eq!(bug.state(), BugState::Assigned);
    assert_eq!(
        bug.take_mail(),
        vec!["alice, RE Incorrect stock count: You own it."]
    );

    bug.assign("bob").await.unwrap();
    assert_eq!(bug.state(), BugState::Assigned);
    assert_eq!(
        bug.take_mail(),
        vec![
            "alice, RE Incorrect stock count: You're off the hook.",
            "alice, RE Incorrect stock count: Don't forget to help the new employee!",
            "bob, RE Incorrect stock count: You own it.",
        ]
    );

    bug.defer().await.unwrap();
    assert_eq!(bug.state(), BugState::Deferred);
    assert_eq!(bug.assignee(), None);
    assert_eq!(
        bug.take_mail(),
        vec!["bob, RE Incorrect stock count: You're off the hook."]
    );

    bug.assign("carol").await.unwrap();
    assert_eq!(bug.state(), BugState::Assigned);
    assert_eq!(
        bug.take_mail(),
        vec!["carol, RE Incorrect stock count: You own it."]
    );

    bug.close().await.unwrap();
    assert_eq!(bug.state(), BugState::Closed);
    assert_eq!(
        bug.take_mail(),
        vec!["carol, RE Incorrect stock count: You're off the hook."]
    );
}

#[tokio::test]
async fn closed_bug_is_terminal() {
    let bug = Bug::new("Crash on save").unwrap();
    bug.assign("dana").await.unwrap();
    bug.close().await.unwrap();
    bug.take_mail();

    assert!(!bug.can_assign().await);
    assert!(bug
        .machine
        .permitted_triggers(&bug.mailer)
        .await
        .unwrap()
        .is_empty());

    let result = bug.assign("erin").await;
    assert!(matches!(
        result,
        Err(FireError::TriggerNotPermitted { ref state, ref trigger })
            if state == "Closed" && trigger == BugTrigger::Assign.name()
    ));
    assert_eq!(bug.state(), BugState::Closed);
    assert!(bug.take_mail().is_empty());
}

#[tokio::test]
async fn open_bug_cannot_be_deferred() {
    let bug = Bug::new("Typo").unwrap();
    let result = bug.defer().await;

    assert!(matches!(result, Err(FireError::TriggerNotPermitted { .. })));
    assert_eq!(bug.state(), BugState::Open);
}

#[tokio::test]
async fn assigned_bug_is_still_open() {
    let bug = Bug::new("Slow search").unwrap();
    bug.assign("frank").await.unwrap();

    assert!(bug.machine.is_in_state(&BugState::Assigned));
    assert!(bug.machine.is_in_state(&BugState::Open));
    assert!(!bug.machine.is_in_state(&BugState::Deferred));
}

#[tokio::test]
async fn missing_assignee_argument_surfaces_as_action_error() {
    let bug = Bug::new("No args").unwrap();
    let result = bug.machine.fire(BugTrigger::Assign, &bug.mailer).await;

    assert!(matches!(
        result,
        Err(FireError::Action(ActionError::Argument(
            ArgumentError::Missing { index: 0, .. }
        )))
    ));
    // The commit happens before entry actions, so the state has moved.
    assert_eq!(bug.state(), BugState::Assigned);
}

#[test]
fn bug_graph_describes_the_workflow() {
    let bug = Bug::new("Graph").unwrap();
    let info = bug.machine.get_info("BugState", "BugTrigger");
    let graph = graph::export(&info);

    assert_eq!(graph.state_type, "BugState");
    let roots: Vec<&str> = graph.nodes.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(roots, vec!["Open", "Closed", "Deferred"]);

    let open = graph.node("Open").unwrap();
    assert_eq!(open.substates[0].name, "Assigned");
    assert_eq!(
        open.substates[0].entry_actions,
        vec!["on assigned [Assign]"]
    );

    let edges: Vec<(String, String, String)> = graph
        .edges()
        .map(|e| {
            (
                e.source().to_string(),
                e.destination().to_string(),
                e.label().to_string(),
            )
        })
        .collect();
    assert_eq!(
        edges,
        vec![
            ("Open".into(), "Assigned".into(), "Assign".into()),
            ("Assigned".into(), "Assigned".into(), "Assign".into()),
            ("Assigned".into(), "Closed".into(), "Close".into()),
            ("Assigned".into(), "Deferred".into(), "Defer".into()),
            ("Deferred".into(), "Assigned".into(), "Assign".into()),
        ]
    );

    let again = graph::export(&bug.machine.get_info("BugState", "BugTrigger"));
    assert_eq!(graph.to_json().unwrap(), again.to_json().unwrap());
}
