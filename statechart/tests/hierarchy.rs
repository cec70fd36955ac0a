//! Single-state and nested-state transition ordering (§4.1–§4.3).

use std::sync::Mutex;

use statechart::{Action, ActionTable, ConditionTable, Engine, Event};
use statechart_core::{State, Transition};

fn logging_action(log: &'static Mutex<Vec<(String, Option<String>)>>, label: &str) -> Box<Action> {
    let label = label.to_string();
    Box::new(move |_engine, event| {
        log.lock()
            .unwrap()
            .push((label.clone(), event.map(|e| e.name.clone())));
    })
}

fn drain(log: &'static Mutex<Vec<(String, Option<String>)>>) -> Vec<(String, Option<String>)> {
    std::mem::take(&mut *log.lock().unwrap())
}

#[test]
fn single_state_self_transitions() {
    static LOG: Mutex<Vec<(String, Option<String>)>> = Mutex::new(Vec::new());

    let states = vec![State::leaf("s1")
        .with_transitions(vec![
            Transition {
                event: "e1".into(),
                target: Some("s1".into()),
                actions: vec!["transit".into()],
                conditions: vec![],
                internal: false,
            },
            Transition {
                event: "e2".into(),
                target: Some("s1".into()),
                actions: vec!["transit".into()],
                conditions: vec![],
                internal: true,
            },
        ])
        .with_entries(vec!["enter".into()])
        .with_exits(vec!["exit".into()])];

    let mut actions = ActionTable::new();
    actions.insert("enter".into(), logging_action(&LOG, "enter"));
    actions.insert("exit".into(), logging_action(&LOG, "exit"));
    actions.insert("transit".into(), logging_action(&LOG, "transit"));

    let engine = Engine::new(states, actions, ConditionTable::new()).expect("valid configuration");
    assert!(!engine.finished());
    assert_eq!(engine.current_state(), Some("s1"));
    assert_eq!(drain(&LOG), vec![("enter".to_string(), None)]);

    let mut engine = engine;
    let event = Event::new("e1");
    engine.step(&event);
    assert_eq!(
        drain(&LOG),
        vec![
            ("exit".to_string(), Some("e1".to_string())),
            ("transit".to_string(), Some("e1".to_string())),
            ("enter".to_string(), Some("e1".to_string())),
        ]
    );
    assert_eq!(engine.current_state(), Some("s1"));

    let event = Event::with_payload("e2", 123i32);
    engine.step(&event);
    assert_eq!(drain(&LOG), vec![("transit".to_string(), Some("e2".to_string()))]);
    assert_eq!(engine.current_state(), Some("s1"));

    engine.step(&Event::new("e3"));
    assert!(drain(&LOG).is_empty());
    assert_eq!(engine.current_state(), Some("s1"));
}

#[test]
fn nested_states_exit_and_enter_through_the_common_ancestor() {
    static LOG: Mutex<Vec<(String, Option<String>)>> = Mutex::new(Vec::new());

    let s3 = State::leaf("s3")
        .with_transitions(vec![Transition {
            event: "e1".into(),
            target: Some("s4".into()),
            actions: vec!["transit1".into()],
            conditions: vec![],
            internal: false,
        }])
        .with_entries(vec!["enter_s3".into()])
        .with_exits(vec!["exit_s3".into()]);
    let s4 = State::leaf("s4")
        .with_entries(vec!["enter_s4".into()])
        .with_exits(vec!["exit_s4".into()]);
    let s2 = State::leaf("s2")
        .with_children(vec![s3, s4])
        .with_entries(vec!["enter_s2".into()])
        .with_exits(vec!["exit_s2".into()]);
    let s1 = State::leaf("s1")
        .with_children(vec![s2])
        .with_transitions(vec![Transition {
            event: "e2".into(),
            target: Some("s2".into()),
            actions: vec!["transit2".into()],
            conditions: vec![],
            internal: false,
        }])
        .with_entries(vec!["enter_s1".into()])
        .with_exits(vec!["exit_s1".into()]);

    let mut actions = ActionTable::new();
    for name in [
        "enter_s1", "exit_s1", "enter_s2", "exit_s2", "enter_s3", "exit_s3", "enter_s4",
        "exit_s4", "transit1", "transit2",
    ] {
        actions.insert(name.into(), logging_action(&LOG, name));
    }

    let mut engine =
        Engine::new(vec![s1], actions, ConditionTable::new()).expect("valid configuration");

    assert_eq!(
        drain(&LOG),
        vec![
            ("enter_s1".to_string(), None),
            ("enter_s2".to_string(), None),
            ("enter_s3".to_string(), None),
        ]
    );
    assert_eq!(engine.current_state(), Some("s3"));

    let event = Event::with_payload("e1", 123i32);
    engine.step(&event);
    assert_eq!(
        drain(&LOG),
        vec![
            ("exit_s3".to_string(), Some("e1".to_string())),
            ("transit1".to_string(), Some("e1".to_string())),
            ("enter_s4".to_string(), Some("e1".to_string())),
        ]
    );
    assert_eq!(engine.current_state(), Some("s4"));

    let event = Event::with_payload("e2", 123i32);
    engine.step(&event);
    assert_eq!(
        drain(&LOG),
        vec![
            ("exit_s4".to_string(), Some("e2".to_string())),
            ("exit_s2".to_string(), Some("e2".to_string())),
            ("exit_s1".to_string(), Some("e2".to_string())),
            ("transit2".to_string(), Some("e2".to_string())),
            ("enter_s1".to_string(), Some("e2".to_string())),
            ("enter_s2".to_string(), Some("e2".to_string())),
            ("enter_s3".to_string(), Some("e2".to_string())),
        ]
    );
    assert_eq!(engine.current_state(), Some("s3"));
}

#[test]
fn empty_tree_is_finished_immediately() {
    let engine = Engine::new(Vec::new(), ActionTable::new(), ConditionTable::new())
        .expect("an empty tree is valid");
    assert!(engine.finished());
    assert_eq!(engine.current_state(), None);
}
