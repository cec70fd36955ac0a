//! DOT rendering sanity checks (§6.3). No byte-for-byte contract, only that
//! the structure referenced by the spec shows up: one cluster per state,
//! nested clusters for children, and a labeled edge per transition.

use statechart::render_dot;
use statechart_core::{State, Transition};

#[test]
fn empty_tree_renders_a_bare_graph() {
    let dot = render_dot(&[]);
    assert!(dot.starts_with("digraph statechart {"));
    assert!(dot.trim_end().ends_with('}'));
    assert!(!dot.contains("subgraph"));
}

#[test]
fn each_state_gets_its_own_cluster() {
    let door = State::leaf("open").with_children(vec![]);
    let states = vec![
        door,
        State::leaf("closed").with_children(vec![State::leaf("locked"), State::leaf("unlocked")]),
    ];
    let dot = render_dot(&states);

    assert!(dot.contains("subgraph cluster_state_0"));
    assert!(dot.contains("subgraph cluster_state_1"));
    assert!(dot.contains("subgraph cluster_state_1_0"));
    assert!(dot.contains("subgraph cluster_state_1_1"));
}

#[test]
fn transitions_become_labeled_edges_between_clusters() {
    let states = vec![
        State::leaf("off").with_transitions(vec![Transition::new("flip", "on")]),
        State::leaf("on"),
    ];
    let dot = render_dot(&states);

    assert!(dot.contains("state_0 -> state_1"));
    assert!(dot.contains("flip"));
}

#[test]
fn local_and_internal_transitions_are_annotated() {
    let states = vec![State::leaf("s1").with_transitions(vec![
        Transition::local("e", vec!["a".into()]),
        Transition {
            event: "f".into(),
            target: Some("s1".into()),
            actions: vec![],
            conditions: vec![],
            internal: true,
        },
    ])];
    let dot = render_dot(&states);

    assert!(dot.contains("(local)"));
    assert!(dot.contains("(internal)"));
}
