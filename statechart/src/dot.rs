//! DOT graph rendering (§6.3). Presentation only — there is no stability
//! contract on the exact text produced, only that it is valid DOT.

use std::collections::HashMap;
use std::fmt::Write;

use statechart_core::{State, Transition};

const HEADER: &str = r#"digraph statechart {
    graph [rankdir=TB, fontname="monospace", fontsize=10];
    node [fontname="monospace", fontsize=10, shape=plain];
    edge [fontname="monospace", fontsize=10];
"#;

/// Render a root state list as a Graphviz DOT document.
///
/// Each state becomes a cluster containing an HTML-like label of its
/// entry/exit actions; the initial substate of each cluster is marked with
/// an arrow from a small point node; transitions become labeled edges
/// between clusters, using `lhead`/`ltail` so the arrowhead lands on the
/// cluster border rather than on a specific node.
pub fn render_dot(roots: &[State]) -> String {
    let mut ids = HashMap::new();
    let mut states = String::new();
    render_states(roots, &mut ids, "state", &mut states);

    let mut transitions = String::new();
    render_transitions(roots, &ids, "state", &mut transitions);

    let mut out = String::from(HEADER);
    out.push_str(&states);
    out.push_str(&transitions);
    out.push_str("}\n");
    out
}

fn render_states(
    states: &[State],
    ids: &mut HashMap<String, String>,
    id_prefix: &str,
    out: &mut String,
) {
    if states.is_empty() {
        return;
    }

    let _ = writeln!(
        out,
        "    {prefix}_initial [shape=point, width=0.1, label=\"\"];",
        prefix = id_prefix
    );

    for (i, state) in states.iter().enumerate() {
        let state_id = format!("{id_prefix}_{i}");
        ids.insert(state.name.clone(), state_id.clone());

        let actions = state_action_rows(state);
        let separator = if actions.is_empty() { "" } else { "<hr/>" };
        let shape = if state.is_final { " (final)" } else { "" };

        let _ = writeln!(out, "    subgraph cluster_{state_id} {{");
        let _ = writeln!(out, "        label=\"\";");
        let _ = writeln!(
            out,
            concat!(
                "        {id} [label=<<table border=\"0\" cellborder=\"0\" cellspacing=\"0\">",
                "<tr><td><b>{name}{shape}</b></td></tr>{sep}{actions}</table>>];"
            ),
            id = state_id,
            name = state.name,
            shape = shape,
            sep = separator,
            actions = actions,
        );
        render_states(&state.children, ids, &state_id, out);
        let _ = writeln!(out, "    }}");
    }
}

fn state_action_rows(state: &State) -> String {
    let mut rows = String::new();
    for name in &state.entries {
        let _ = write!(rows, r#"<tr><td align="left">entry/ {name}</td></tr>"#);
    }
    for name in &state.exits {
        let _ = write!(rows, r#"<tr><td align="left">exit/ {name}</td></tr>"#);
    }
    rows
}

fn render_transitions(
    states: &[State],
    ids: &HashMap<String, String>,
    id_prefix: &str,
    out: &mut String,
) {
    if states.is_empty() {
        return;
    }

    let _ = writeln!(
        out,
        "    {prefix}_initial -> {prefix}_0 [lhead=cluster_{prefix}_0];",
        prefix = id_prefix
    );

    for (i, state) in states.iter().enumerate() {
        let source_id = format!("{id_prefix}_{i}");
        for transition in &state.transitions {
            render_transition(transition, &source_id, ids, out);
        }
        render_transitions(&state.children, ids, &source_id, out);
    }
}

fn render_transition(
    transition: &Transition,
    source_id: &str,
    ids: &HashMap<String, String>,
    out: &mut String,
) {
    let target_id = match &transition.target {
        Some(name) => ids
            .get(name)
            .expect("transition targets are validated by Engine::new before rendering is reached"),
        None => source_id,
    };

    let mut ltail = format!("cluster_{source_id}");
    let mut lhead = format!("cluster_{target_id}");
    if ltail == lhead {
        ltail.clear();
        lhead.clear();
    } else if lhead.starts_with(&ltail) {
        lhead.clear();
    } else if ltail.starts_with(&lhead) {
        ltail.clear();
    }

    let label = transition_label(transition);
    let _ = writeln!(
        out,
        "    {source_id} -> {target_id} [label=<{label}>, ltail={ltail:?}, lhead={lhead:?}];",
    );
}

fn transition_label(transition: &Transition) -> String {
    let internal = if transition.internal { " (internal)" } else { "" };
    let local = if transition.target.is_none() { " (local)" } else { "" };

    let condition = if transition.conditions.is_empty() {
        String::new()
    } else {
        format!(" [{}]", transition.conditions.join(" "))
    };

    let mut rows = String::new();
    for name in &transition.actions {
        let _ = write!(rows, r#"<tr><td align="left">{name}</td></tr>"#);
    }
    let separator = if rows.is_empty() { "" } else { "<hr/>" };

    format!(
        concat!(
            "<table border=\"0\" cellborder=\"0\" cellspacing=\"0\">",
            "<tr><td><b>{event}</b>{condition}{internal}{local}</td></tr>{sep}{rows}</table>"
        ),
        event = transition.event,
        condition = condition,
        internal = internal,
        local = local,
        sep = separator,
        rows = rows,
    )
}
