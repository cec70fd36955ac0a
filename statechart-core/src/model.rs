//! Immutable value types describing a statechart, independent of any
//! particular engine instance.

/// Event identifier. Equality is exact-match.
pub type EventName = String;

/// State identifier, unique within a single tree.
pub type StateName = String;

/// Name of a user-supplied `Action` callable.
pub type ActionName = String;

/// Name of a user-supplied `Condition` (guard) callable.
pub type ConditionName = String;

/// A single transition out of a `State`.
///
/// Transitions are evaluated in declaration order (§4.2): within a state,
/// the first transition whose event matches and whose conditions all hold
/// wins.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Transition {
    /// Event name that triggers this transition (exact match).
    pub event: EventName,
    /// Destination state. `None` means a local transition: the
    /// configuration does not change, only `actions` fire.
    pub target: Option<StateName>,
    /// Actions executed, in order, when the transition fires.
    pub actions: Vec<ActionName>,
    /// Guard conditions; the transition is eligible only if every one of
    /// these evaluates to `true`. Evaluated left to right, short-circuiting
    /// on the first `false`.
    pub conditions: Vec<ConditionName>,
    /// When `true` and `target` is a strict descendant of this transition's
    /// source state, the source is not exited/re-entered (§4.3).
    pub internal: bool,
}

impl Transition {
    /// An external transition with no actions or guards.
    pub fn new(event: impl Into<EventName>, target: impl Into<StateName>) -> Self {
        Self {
            event: event.into(),
            target: Some(target.into()),
            actions: Vec::new(),
            conditions: Vec::new(),
            internal: false,
        }
    }

    /// A local transition (no `target`): only `actions` fire.
    pub fn local(event: impl Into<EventName>, actions: Vec<ActionName>) -> Self {
        Self {
            event: event.into(),
            target: None,
            actions,
            conditions: Vec::new(),
            internal: false,
        }
    }
}

/// A node in a statechart's state tree.
///
/// If `children` is non-empty, the first child is the initial substate —
/// order is significant and selects defaults (§3.2).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct State {
    /// Unique identifier within the whole tree. The engine assumes
    /// uniqueness; violating it is undefined behavior from the engine's
    /// perspective (caller's contract, §3.2).
    pub name: StateName,
    /// Ordered child states; the first is the default initial substate.
    pub children: Vec<State>,
    /// Outgoing transitions, in priority order.
    pub transitions: Vec<Transition>,
    /// Actions run, in order, when this state is entered.
    pub entries: Vec<ActionName>,
    /// Actions run, in order, when this state is exited.
    pub exits: Vec<ActionName>,
    /// A final state has no children and, by convention, no outgoing
    /// transitions; entering it makes the owning engine `finished`.
    pub is_final: bool,
}

impl State {
    /// A leaf state with no children, transitions, or entry/exit actions.
    pub fn leaf(name: impl Into<StateName>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_children(mut self, children: Vec<State>) -> Self {
        self.children = children;
        self
    }

    pub fn with_transitions(mut self, transitions: Vec<Transition>) -> Self {
        self.transitions = transitions;
        self
    }

    pub fn with_entries(mut self, entries: Vec<ActionName>) -> Self {
        self.entries = entries;
        self
    }

    pub fn with_exits(mut self, exits: Vec<ActionName>) -> Self {
        self.exits = exits;
        self
    }

    pub fn final_state(name: impl Into<StateName>) -> Self {
        Self {
            name: name.into(),
            is_final: true,
            ..Default::default()
        }
    }
}
