//! # Traffic Light: A `SyncRunner`-Driven Hierarchical Machine
//!
//! Builds a state tree directly with the `State` builder methods (no SCXML
//! involved) and drives it with a `SyncRunner`, one explicit `step()` per
//! tick — the pattern for embedding a statechart in an existing
//! synchronous event loop rather than a cooperative async task.
//!
//! ## The Flow
//!
//! ```text
//! red ──tick──> green ──tick──> yellow ──tick──> red
//!  │               │               │
//!  └────────────────── fault ───────┴──> maintenance
//!                                          │
//!                            flashing_on ──tick──> flashing_off
//!                                 ▲                     │
//!                                 └────────tick─────────┘
//!                                          │
//!                                        repair ──> red
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use statechart::{
    render_dot, Action, ActionTable, ConditionTable, Engine, Event, State, SyncRunner, Transition,
};

fn light(name: &str) -> Box<Action> {
    let name = name.to_string();
    Box::new(move |_, _| println!("light: {name}"))
}

fn build_tree() -> Vec<State> {
    let red = State::leaf("red")
        .with_entries(vec!["light_red".into()])
        .with_transitions(vec![
            Transition::new("tick", "green"),
            Transition::new("fault", "maintenance"),
        ]);
    let green = State::leaf("green")
        .with_entries(vec!["light_green".into()])
        .with_transitions(vec![
            Transition::new("tick", "yellow"),
            Transition::new("fault", "maintenance"),
        ]);
    let yellow = State::leaf("yellow")
        .with_entries(vec!["light_yellow".into()])
        .with_transitions(vec![
            Transition::new("tick", "red"),
            Transition::new("fault", "maintenance"),
        ]);

    let flashing_on = State::leaf("flashing_on")
        .with_entries(vec!["light_on".into()])
        .with_transitions(vec![Transition::new("tick", "flashing_off")]);
    let flashing_off = State::leaf("flashing_off")
        .with_entries(vec!["light_off".into()])
        .with_transitions(vec![Transition::new("tick", "flashing_on")]);
    let maintenance = State::leaf("maintenance")
        .with_children(vec![flashing_on, flashing_off])
        .with_transitions(vec![Transition::new("repair", "red")]);

    vec![red, green, yellow, maintenance]
}

fn main() {
    let mut actions = ActionTable::new();
    for name in ["light_red", "light_green", "light_yellow", "light_on", "light_off"] {
        actions.insert(name.into(), light(name));
    }

    let tree = build_tree();
    println!("{}", render_dot(&tree));

    let engine = Engine::new(tree, actions, ConditionTable::new())
        .expect("traffic light states are well-formed");
    let engine = Rc::new(RefCell::new(engine));

    let mut runner = SyncRunner::new();

    println!("=== Traffic Light Demo ===\n");
    println!("current state: {:?}", engine.borrow().current_state());

    for event_name in ["tick", "tick", "tick", "fault", "tick", "tick", "repair"] {
        runner.register(engine.clone(), Event::new(event_name));
        runner.step();
        println!(
            "after {event_name}: {:?}",
            engine.borrow().current_state()
        );
    }
}
