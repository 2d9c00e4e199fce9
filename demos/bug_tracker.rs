//! Bug Tracker
//!
//! This example models a bug's lifecycle as a hierarchical state machine.
//!
//! Key concepts:
//! - Host-owned state read and written through accessor/mutator closures
//! - `Assigned` nested under `Open`, inheriting its triggers
//! - Reentry on reassignment, running exit then entry actions
//! - Entry actions reading fire-time arguments
//! - Graph export of the configured workflow
//!
//! Run with: cargo run --example bug_tracker

use parking_lot::Mutex;
use std::sync::Arc;
use stillwater::effect::BoxedEffect;
use stillwater::prelude::*;
use strata::core::{ArgumentError, State, Trigger};
use strata::effects::{ActionError, FireError, StateMachine};
use strata::{graph, state_enum, trigger_enum, ConfigurationError, TriggerArgs};

state_enum! {
    enum BugState {
        Open,
        Assigned,
        Deferred,
        Closed,
    }
}

trigger_enum! {
    enum BugTrigger {
        Assign,
        Defer,
        Close,
    }
}

/// Environment for actions: who owns the bug and how to reach them.
#[derive(Clone)]
struct Mailer {
    title: String,
    assignee: Arc<Mutex<Option<String>>>,
}

impl Mailer {
    fn send_to_assignee(&self, message: &str) {
        match self.assignee.lock().as_deref() {
            Some(to) => println!("  [Mail] {to}, RE {}: {message}", self.title),
            None => println!("  [Mail] (no assignee) {message}"),
        }
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

fn bug_machine(
    state: Arc<Mutex<BugState>>,
) -> Result<StateMachine<BugState, BugTrigger, Mailer>, ConfigurationError> {
    let reader = Arc::clone(&state);
    let mut machine: StateMachine<BugState, BugTrigger, Mailer> = StateMachine::new(move || *reader.lock(), move |s| *state.lock() = s);

    machine.on_transitioned(|t| {
        println!(
            "  [Transition] {} -> {} on {}",
            t.source.name(),
            t.destination.name(),
            t.trigger.name()
        )
    });

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
        .on_exit_described("on deassigned", |_| {
            from_fn(|mailer: &Mailer| -> Result<(), ActionError> {
                mailer.send_to_assignee("You're off the hook.");
                Ok(())
            })
            .boxed()
        });

    machine
        .configure(BugState::Deferred)
        .on_entry_described("clear assignee", |_, _| {
            from_fn(|mailer: &Mailer| -> Result<(), ActionError> {
                *mailer.assignee.lock() = None;
                Ok(())
            })
            .boxed()
        })
        .permit(BugTrigger::Assign, BugState::Assigned)?;

    Ok(machine)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Bug Tracker Example ===\n");

    let state = Arc::new(Mutex::new(BugState::Open));
    let machine = bug_machine(Arc::clone(&state))?;
    let mailer = Mailer {
        title: "Incorrect stock count".to_string(),
        assignee: Arc::new(Mutex::new(None)),
    };

    println!("Assigning to Joe:");
    machine
        .fire_with(BugTrigger::Assign, TriggerArgs::one("Joe"), &mailer)
        .await?;

    println!("\nReassigning to Harry:");
    machine
        .fire_with(BugTrigger::Assign, TriggerArgs::one("Harry"), &mailer)
        .await?;

    println!("\nDeferring:");
    machine.fire(BugTrigger::Defer, &mailer).await?;

    println!("\nAssigning to Fred:");
    machine
        .fire_with(BugTrigger::Assign, TriggerArgs::one("Fred"), &mailer)
        .await?;

    println!("\nClosing:");
    machine.fire(BugTrigger::Close, &mailer).await?;

    println!("\nState: {}", state.lock().name());
    println!(
        "Can assign: {}",
        machine.can_fire(&BugTrigger::Assign, &mailer).await?
    );

    match machine.fire(BugTrigger::Assign, &mailer).await {
        Err(e @ FireError::TriggerNotPermitted { .. }) => println!("Rejected: {e}"),
        other => println!("Unexpected: {other:?}"),
    }

    let permitted = machine.permitted_triggers(&mailer).await?;
    let permitted: Vec<&str> = permitted.iter().map(|t| t.name()).collect();
    println!("Permitted from Closed: {permitted:?}");

    println!("\nWorkflow graph:");
    let graph = graph::export(&machine.get_info("BugState", "BugTrigger"));
    println!("{}", graph.to_json()?);

    Ok(())
}
