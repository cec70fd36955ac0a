//! The two event-dispatch runners (§4.4, §4.5): a synchronous FIFO drained
//! by explicit caller ticks, and an async FIFO drained by a single
//! cooperative `tokio` task.

use std::any::Any;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::task::JoinHandle;

use statechart_core::Event;

use crate::Engine;

/// Shared handle to an engine driven by a [`SyncRunner`].
///
/// Single-threaded: a runner may drive many engines, but an engine must not
/// be shared across runners (§5).
pub type SyncEngineHandle = Rc<RefCell<Engine>>;

/// FIFO queue of `(engine, event)` pairs, drained by explicit caller ticks
/// (§4.4). Never blocks.
#[derive(Default)]
pub struct SyncRunner {
    queue: VecDeque<(SyncEngineHandle, Event)>,
}

impl SyncRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the queue is empty.
    pub fn empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Append an event to the tail of the queue.
    pub fn register(&mut self, engine: SyncEngineHandle, event: Event) {
        self.queue.push_back((engine, event));
    }

    /// Pop from the head of the queue and call `engine.step(event)`; a
    /// no-op if the queue is empty.
    pub fn step(&mut self) {
        let Some((engine, event)) = self.queue.pop_front() else {
            return;
        };
        engine.borrow_mut().step(&event);
    }
}

/// Shared handle to an engine driven by an [`AsyncRunner`].
///
/// Multiple engines may share one runner; the `Mutex` only ever sees
/// contention if the same engine is (incorrectly) registered with more than
/// one runner, which §5 calls out as a programmer error.
pub type AsyncEngineHandle = Arc<Mutex<Engine>>;

/// Returned by [`AsyncRunner::register`] once the runner has been closed.
#[derive(Debug, Error)]
#[error("AsyncRunner is closed")]
pub struct RunnerClosed;

/// A cooperatively scheduled, single-consumer drain of a FIFO queue (§4.5).
///
/// On construction, spawns one `tokio` consumer task that loops: await the
/// next item, call `engine.step(event)`, repeat. Events registered on the
/// same runner are delivered in strict enqueue order, even across different
/// target engines (§4.5's ordering guarantee).
pub struct AsyncRunner {
    sender: mpsc::UnboundedSender<(AsyncEngineHandle, Event)>,
    close: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl AsyncRunner {
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::unbounded_channel::<(AsyncEngineHandle, Event)>();
        let (close_tx, mut close_rx) = oneshot::channel();

        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    _ = &mut close_rx => break,
                    item = receiver.recv() => {
                        match item {
                            Some((engine, event)) => {
                                let mut guard = engine.lock().await;
                                let outcome =
                                    catch_unwind(AssertUnwindSafe(|| guard.step(&event)));
                                drop(guard);
                                if let Err(panic) = outcome {
                                    tracing::error!(
                                        error = %panic_message(&panic),
                                        "runner loop error"
                                    );
                                    break;
                                }
                            }
                            None => break,
                        }
                    }
                }
            }
        });

        Self {
            sender,
            close: Some(close_tx),
            task: Some(task),
        }
    }

    /// Enqueue an event without blocking.
    ///
    /// Fails only once the runner has been closed via [`Self::async_close`].
    pub fn register(&self, engine: AsyncEngineHandle, event: Event) -> Result<(), RunnerClosed> {
        self.sender
            .send((engine, event))
            .map_err(|_| RunnerClosed)
    }

    /// Stop the consumer task and wait for it to terminate.
    ///
    /// An in-flight `step` is allowed to complete; any events that were
    /// queued but not yet consumed are dropped (§5's cancellation
    /// semantics). Idempotent: calling this more than once is a no-op after
    /// the first call.
    pub async fn async_close(&mut self) {
        if let Some(close) = self.close.take() {
            let _ = close.send(());
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Default for AsyncRunner {
    fn default() -> Self {
        Self::new()
    }
}

fn panic_message(payload: &Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
