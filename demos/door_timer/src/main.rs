//! # Door Timer: An `AsyncRunner`-Driven Motorized Door
//!
//! A door with motorized open/close cycles: pushing `close`/`open` harder
//! (a higher `force`) moves the door faster. The timer is simulated with
//! `tokio::time::sleep` plus a re-registration on the same runner, the
//! same pattern a real caller would use to turn a hardware or OS timer
//! into a statechart event.
//!
//! ## The Flow
//!
//! ```text
//! opened ──close(force)──> closing ──timeout──> closed
//!    ▲                        │
//!    └──────────open(force)───┘ (interrupts the close)
//!
//! closed ──open(force)──> opening ──timeout──> opened
//!    ▲                        │
//!    └──────────close(force)──┘ (interrupts the open)
//! ```
//!
//! `closing`/`opening` are transient: their `onentry` starts a timer via
//! `startTimer`, which re-registers a `timeout` event on the same runner
//! after a force-dependent delay.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, OnceCell};

use statechart::{parse_scxml, ActionTable, AsyncRunner, ConditionTable, Engine, Event};

const DOOR_SCXML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<scxml xmlns="http://www.w3.org/2005/07/scxml" initial="opened" version="1.0">
    <state id="opened">
        <onentry>logEnter</onentry>
        <onexit>logExit</onexit>
        <transition event="close" target="closing">logTransition</transition>
    </state>
    <state id="closing">
        <onentry>logEnter startTimer</onentry>
        <onexit>logExit</onexit>
        <transition event="timeout" target="closed">logTransition</transition>
        <transition event="open" target="opening">logTransition</transition>
    </state>
    <state id="closed">
        <onentry>logEnter</onentry>
        <onexit>logExit</onexit>
        <transition event="open" target="opening">logTransition</transition>
    </state>
    <state id="opening">
        <onentry>logEnter startTimer</onentry>
        <onexit>logExit</onexit>
        <transition event="timeout" target="opened">logTransition</transition>
        <transition event="close" target="closing">logTransition</transition>
    </state>
</scxml>"#;

/// The harder the door is pushed, the faster it moves: no force at all is
/// slow and deliberate, full force is instant.
fn force_to_delay(force: i32) -> Duration {
    if force <= 0 {
        Duration::from_millis(400)
    } else if force >= 100 {
        Duration::ZERO
    } else {
        Duration::from_millis((100 - force) as u64 * 3)
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let states = parse_scxml(DOOR_SCXML).expect("DOOR_SCXML is a valid document");
    let runner = Arc::new(AsyncRunner::new());

    // `startTimer` needs a handle back to the engine it belongs to, but that
    // handle doesn't exist until after `Engine::new` — which itself needs
    // `startTimer` already in the action table, since construction
    // validates eagerly. An `OnceCell` breaks the cycle: the closure
    // captures it empty and only reads it once a timer actually fires,
    // by which point `main` has filled it in below.
    let engine_cell: Arc<OnceCell<Arc<Mutex<Engine>>>> = Arc::new(OnceCell::new());

    let mut actions = ActionTable::new();
    actions.insert(
        "logEnter".into(),
        Box::new(|engine: &Engine, _| {
            println!("entering state {:?}", engine.current_state());
        }),
    );
    actions.insert(
        "logExit".into(),
        Box::new(|engine: &Engine, _| {
            println!("exiting state {:?}", engine.current_state());
        }),
    );
    actions.insert(
        "logTransition".into(),
        Box::new(|_: &Engine, event: Option<&Event>| {
            println!("transitioning because of event {:?}", event.map(|e| &e.name));
        }),
    );
    actions.insert("startTimer".into(), {
        let runner = runner.clone();
        let engine_cell = engine_cell.clone();
        Box::new(move |_: &Engine, event: Option<&Event>| {
            let force = event
                .and_then(|e| e.payload_ref::<i32>())
                .copied()
                .unwrap_or(0);
            let delay = force_to_delay(force);
            println!("waiting for {delay:?}");

            let runner = runner.clone();
            let engine_cell = engine_cell.clone();
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                let engine = engine_cell
                    .get()
                    .expect("engine_cell is set before any event is registered")
                    .clone();
                let _ = runner.register(engine, Event::new("timeout"));
            });
        })
    });

    let engine = Arc::new(Mutex::new(
        Engine::new(states, actions, ConditionTable::new()).expect("door states are well-formed"),
    ));
    engine_cell
        .set(engine.clone())
        .expect("set exactly once, before registering any event");

    println!("=== Door Timer Demo ===\n");
    println!("registering close event");
    runner
        .register(engine.clone(), Event::with_payload("close", 30i32))
        .expect("runner is open");
    tokio::time::sleep(Duration::from_millis(500)).await;

    println!("registering open event");
    runner
        .register(engine.clone(), Event::with_payload("open", 60i32))
        .expect("runner is open");
    tokio::time::sleep(Duration::from_millis(500)).await;

    drop(engine);
    let mut runner = Arc::try_unwrap(runner).unwrap_or_else(|_| panic!("runner still shared"));
    runner.async_close().await;
}
