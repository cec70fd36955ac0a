//! The statechart engine: owns the current configuration and implements the
//! transition microstep (§4.1–§4.3).

use std::collections::{HashMap, VecDeque};

use statechart_core::{ActionName, ConditionName, ConfigError, Event, State, StateName, Transition};

/// A side-effecting action, invoked on state entry/exit and on transitions.
///
/// Called with the engine (read-only — actions observe configuration, they
/// do not mutate it directly) and the triggering event, or `None` only
/// during initial descent (§4.1, §6.2).
pub type Action = dyn Fn(&Engine, Option<&Event>) + Send + Sync;

/// A transition guard. The transition is eligible only if every listed
/// condition returns `true` (§3.2, §6.2).
pub type Condition = dyn Fn(&Engine, Option<&Event>) -> bool + Send + Sync;

pub type ActionTable = HashMap<ActionName, Box<Action>>;
pub type ConditionTable = HashMap<ConditionName, Box<Condition>>;

/// A flattened, index-addressed state node (Design Note §9: arena + indices
/// rather than name-keyed back-pointers).
struct Node {
    name: StateName,
    parent: Option<usize>,
    /// Ordered child indices; the first is the default initial substate.
    children: Vec<usize>,
    transitions: Vec<Transition>,
    entries: Vec<ActionName>,
    exits: Vec<ActionName>,
    is_final: bool,
}

/// The statechart engine.
///
/// Owns the current configuration (a stack of state indices, root to leaf)
/// and the flattened, validated state tree. Not thread-safe and not
/// reentrant: do not call [`Engine::step`] from within one of its own
/// actions.
pub struct Engine {
    nodes: Vec<Node>,
    index: HashMap<StateName, usize>,
    stack: Vec<usize>,
    actions: ActionTable,
    conditions: ConditionTable,
}

impl Engine {
    /// Build an engine from root state definitions and name-keyed action and
    /// condition tables. The first element of `roots` is the initial root
    /// (§4.1).
    ///
    /// Validates eagerly (§7.1): duplicate state names, transitions
    /// targeting unknown states, and action/condition names with no
    /// implementation are all reported here rather than on first use.
    ///
    /// If `roots` is non-empty, performs the initial descent and invokes
    /// `entries` actions along the way with `event = None`.
    pub fn new(
        roots: Vec<State>,
        actions: ActionTable,
        conditions: ConditionTable,
    ) -> Result<Engine, ConfigError> {
        let mut nodes = Vec::new();
        let mut index = HashMap::new();
        let mut root_indices = Vec::with_capacity(roots.len());
        for root in roots {
            root_indices.push(flatten(root, None, &mut nodes, &mut index)?);
        }

        validate(&nodes, &index, &actions, &conditions)?;

        let mut engine = Engine {
            nodes,
            index,
            stack: Vec::new(),
            actions,
            conditions,
        };

        if let Some(&initial) = root_indices.first() {
            engine.walk_down(initial, None);
        }

        Ok(engine)
    }

    /// The name of the current leaf (or final) state, or `None` if the tree
    /// is empty.
    pub fn current_state(&self) -> Option<&str> {
        self.stack.last().map(|&idx| self.nodes[idx].name.as_str())
    }

    /// The full current configuration, root to leaf.
    pub fn configuration(&self) -> Vec<&str> {
        self.stack.iter().map(|&idx| self.nodes[idx].name.as_str()).collect()
    }

    /// Whether the engine has reached a final state (or has an empty tree).
    pub fn finished(&self) -> bool {
        match self.stack.last() {
            None => true,
            Some(&idx) => self.nodes[idx].is_final,
        }
    }

    /// Process a single event (§4.2). A no-op if the engine is `finished` or
    /// no transition matches.
    ///
    /// Panics raised by a user `Action`/`Condition` propagate unchanged
    /// (§7.2) — this method does not catch them.
    pub fn step(&mut self, event: &Event) {
        if self.finished() {
            return;
        }

        let current = *self
            .stack
            .last()
            .expect("finished() is false, so the stack is non-empty");

        let Some((source_idx, transition)) = self.find_transition(current, event) else {
            return;
        };

        match transition.target.clone() {
            Some(target_name) => {
                let target_idx = self.index[&target_name];
                let ancestor = self.find_ancestor(source_idx, target_idx, transition.internal);
                self.walk_up(ancestor, Some(event));
                let actions = transition.actions.clone();
                self.exec_actions(&actions, Some(event));
                self.walk_down(target_idx, Some(event));
            }
            None => {
                let actions = transition.actions.clone();
                self.exec_actions(&actions, Some(event));
            }
        }
    }

    /// §4.2(a): walk from `start` toward the root, returning the first
    /// matching transition and the index of the state that owns it.
    fn find_transition(&self, start: usize, event: &Event) -> Option<(usize, Transition)> {
        let mut cursor = Some(start);
        while let Some(idx) = cursor {
            for transition in &self.nodes[idx].transitions {
                if transition.event != event.name {
                    continue;
                }
                let satisfied = transition.conditions.iter().all(|name| {
                    let condition = self
                        .conditions
                        .get(name)
                        .expect("condition existence validated at construction");
                    condition(self, Some(event))
                });
                if satisfied {
                    return Some((idx, transition.clone()));
                }
            }
            cursor = self.nodes[idx].parent;
        }
        None
    }

    /// §4.3: compute the LCA of `source` and `target`, honoring `internal`.
    /// Returns `None` only when the two states live in disjoint root trees
    /// and no common ancestor exists — in that case `walk_up` empties the
    /// whole stack.
    fn find_ancestor(&self, source: usize, target: usize, internal: bool) -> Option<usize> {
        let mut target_path = VecDeque::new();
        target_path.push_back(target);
        while let Some(parent) = self.nodes[*target_path.front().unwrap()].parent {
            target_path.push_front(parent);
        }

        let mut ancestor = None;
        for (&live, &wanted) in self.stack.iter().zip(target_path.iter()) {
            if live != wanted {
                break;
            }
            if live == target || live == source {
                if internal && live == source {
                    ancestor = Some(live);
                }
                break;
            }
            ancestor = Some(live);
        }
        ancestor
    }

    /// §4.2(b): pop the stack (firing `exits`) until the top equals `target`
    /// (or, if `target` is `None`, until the stack is empty).
    fn walk_up(&mut self, target: Option<usize>, event: Option<&Event>) {
        while self.stack.last().copied() != target {
            let idx = self
                .stack
                .pop()
                .expect("walk_up target must be reachable from the current configuration");
            let exits = self.nodes[idx].exits.clone();
            self.exec_actions(&exits, event);
        }
    }

    /// §4.2(d): push the path from (just below) the current top down to
    /// `target`, then continue through initial children to a leaf/final
    /// state, firing `entries` along the way. Also used for the initial
    /// descent at construction (with an empty stack and `event = None`).
    fn walk_down(&mut self, target: usize, event: Option<&Event>) {
        let mut path = VecDeque::new();
        path.push_back(target);
        loop {
            let front = *path.front().unwrap();
            if Some(front) == self.stack.last().copied() {
                break;
            }
            match self.nodes[front].parent {
                Some(parent) => path.push_front(parent),
                None => break,
            }
        }

        loop {
            let back = *path.back().unwrap();
            if self.nodes[back].children.is_empty() {
                break;
            }
            path.push_back(self.nodes[back].children[0]);
        }

        if Some(path[0]) == self.stack.last().copied() {
            path.pop_front();
        }

        for idx in path {
            self.stack.push(idx);
            let entries = self.nodes[idx].entries.clone();
            self.exec_actions(&entries, event);
        }
    }

    fn exec_actions(&self, names: &[ActionName], event: Option<&Event>) {
        for name in names {
            let action = self
                .actions
                .get(name)
                .expect("action existence validated at construction");
            action(self, event);
        }
    }
}

fn flatten(
    state: State,
    parent: Option<usize>,
    nodes: &mut Vec<Node>,
    index: &mut HashMap<StateName, usize>,
) -> Result<usize, ConfigError> {
    if index.contains_key(&state.name) {
        return Err(ConfigError::DuplicateState(state.name));
    }

    let my_idx = nodes.len();
    index.insert(state.name.clone(), my_idx);
    nodes.push(Node {
        name: state.name,
        parent,
        children: Vec::new(),
        transitions: state.transitions,
        entries: state.entries,
        exits: state.exits,
        is_final: state.is_final,
    });

    let mut child_indices = Vec::with_capacity(state.children.len());
    for child in state.children {
        child_indices.push(flatten(child, Some(my_idx), nodes, index)?);
    }
    nodes[my_idx].children = child_indices;

    Ok(my_idx)
}

fn validate(
    nodes: &[Node],
    index: &HashMap<StateName, usize>,
    actions: &ActionTable,
    conditions: &ConditionTable,
) -> Result<(), ConfigError> {
    for node in nodes {
        for name in node.entries.iter().chain(node.exits.iter()) {
            if !actions.contains_key(name) {
                return Err(ConfigError::MissingAction(name.clone()));
            }
        }
        for transition in &node.transitions {
            if let Some(target) = &transition.target {
                if !index.contains_key(target) {
                    return Err(ConfigError::DanglingTarget {
                        source: node.name.clone(),
                        event: transition.event.clone(),
                        target: target.clone(),
                    });
                }
            }
            for name in &transition.actions {
                if !actions.contains_key(name) {
                    return Err(ConfigError::MissingAction(name.clone()));
                }
            }
            for name in &transition.conditions {
                if !conditions.contains_key(name) {
                    return Err(ConfigError::MissingCondition(name.clone()));
                }
            }
        }
    }
    Ok(())
}
