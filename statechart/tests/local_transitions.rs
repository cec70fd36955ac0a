//! Local transitions (`target: None`): actions fire but the configuration
//! does not change and no entry/exit actions run (§4.2, §6.2).

use std::sync::Mutex;

use statechart::{ActionTable, ConditionTable, Engine, Event};
use statechart_core::{State, Transition};

#[test]
fn local_transition_skips_entry_and_exit() {
    static LOG: Mutex<Vec<&str>> = Mutex::new(Vec::new());

    let states = vec![State::leaf("s1")
        .with_entries(vec!["enter".into()])
        .with_transitions(vec![
            Transition {
                event: "e1".into(),
                target: Some("s1".into()),
                actions: vec!["a1".into()],
                conditions: vec![],
                internal: false,
            },
            Transition::local("e2", vec!["a2".into()]),
        ])];

    let mut actions = ActionTable::new();
    actions.insert("enter".into(), Box::new(|_: &Engine, _| LOG.lock().unwrap().push("enter")));
    actions.insert("a1".into(), Box::new(|_: &Engine, _| LOG.lock().unwrap().push("a1")));
    actions.insert("a2".into(), Box::new(|_: &Engine, _| LOG.lock().unwrap().push("a2")));

    let mut engine = Engine::new(states, actions, ConditionTable::new()).expect("valid configuration");
    assert_eq!(std::mem::take(&mut *LOG.lock().unwrap()), vec!["enter"]);

    // e1 is an external self-transition: s1 is exited and re-entered.
    engine.step(&Event::new("e1"));
    assert_eq!(std::mem::take(&mut *LOG.lock().unwrap()), vec!["a1", "enter"]);

    // e2 is local: only its action fires, no entry/exit action runs again.
    engine.step(&Event::new("e2"));
    assert_eq!(std::mem::take(&mut *LOG.lock().unwrap()), vec!["a2"]);
    assert_eq!(engine.current_state(), Some("s1"));
}
