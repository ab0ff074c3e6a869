//! Lifespan Events
//!
//! Ordered queues of startup/shutdown actions. An action is either a plain
//! closure or a closure returning a future; arguments are captured by the
//! closure.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

type ActionFuture = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send>>;

enum Action {
    Sync(Box<dyn FnMut() -> anyhow::Result<()> + Send>),
    Async(Box<dyn FnMut() -> ActionFuture + Send>),
}

// == Event ==
/// A single registered lifespan action.
pub struct Event {
    action: Action,
}

impl Event {
    /// Wraps a synchronous action; it runs inline when its turn comes.
    pub fn sync<F>(action: F) -> Self
    where
        F: FnMut() -> anyhow::Result<()> + Send + 'static,
    {
        Self {
            action: Action::Sync(Box::new(action)),
        }
    }

    /// Wraps an asynchronous action; its future is awaited to completion
    /// before the next action starts.
    pub fn from_async<F, Fut>(mut action: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Self {
            action: Action::Async(Box::new(move || -> ActionFuture { Box::pin(action()) })),
        }
    }

    pub fn is_async(&self) -> bool {
        matches!(self.action, Action::Async(_))
    }

    async fn run(&mut self) -> anyhow::Result<()> {
        match &mut self.action {
            Action::Sync(action) => action(),
            Action::Async(action) => action().await,
        }
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_async() { "async" } else { "sync" };
        f.debug_struct("Event").field("kind", &kind).finish()
    }
}

// == Event Runner ==
/// Runs registered events sequentially in registration order.
#[derive(Debug, Default)]
pub struct EventRunner {
    events: Vec<Event>,
}

impl EventRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event to the end of the queue.
    pub fn push(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Runs every event in order. The first failure stops the queue and is
    /// returned as-is.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        for event in &mut self.events {
            event.run().await?;
        }
        Ok(())
    }
}
