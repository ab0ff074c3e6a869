//! Lifespan Module
//!
//! Runs application startup and shutdown actions around a unit of work.
//!
//! ```ignore
//! let mut lifespan = Lifespan::with_timeout(Duration::from_secs(5));
//! lifespan.on_startup(|| { println!("starting"); Ok(()) });
//! lifespan.on_shutdown_async(|| async { flush().await });
//! lifespan.run(server).await?;
//! ```

mod event;

use std::fmt;
use std::future::Future;
use std::time::Duration;

use serde_json::{Map, Value};
use tokio::time::timeout;
use tracing::debug;

use crate::error::LifespanError;

pub use event::{Event, EventRunner};

// == Phase ==
/// Where a [`Lifespan`] is in its idle → entering → active → exiting → closed cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Accepting registrations; nothing has run
    Idle,
    /// Running the startup queue
    Entering,
    /// Startup finished, the guarded work is running
    Active,
    /// Running the shutdown queue
    Exiting,
    /// Finished, or startup failed
    Closed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Entering => write!(f, "entering"),
            Self::Active => write!(f, "active"),
            Self::Exiting => write!(f, "exiting"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

// == Lifespan ==
/// Startup/shutdown event runner with an optional per-phase deadline and a
/// user-settable `states` mapping.
///
/// Startup events run in registration order when the lifespan is entered,
/// shutdown events when it is exited. Each phase is bounded separately by
/// the configured timeout; an action error or a timeout abandons the rest of
/// that phase and is returned to the caller.
#[derive(Debug)]
pub struct Lifespan {
    startup: EventRunner,
    shutdown: EventRunner,
    timeout: Option<Duration>,
    states: Option<Value>,
    phase: Phase,
}

impl Lifespan {
    /// Creates a lifespan with no deadline.
    pub fn new() -> Self {
        Self {
            startup: EventRunner::new(),
            shutdown: EventRunner::new(),
            timeout: None,
            states: None,
            phase: Phase::Idle,
        }
    }

    /// Creates a lifespan whose startup and shutdown phases must each finish
    /// within `limit`.
    pub fn with_timeout(limit: Duration) -> Self {
        Self {
            timeout: Some(limit),
            ..Self::new()
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn startup_events(&self) -> &EventRunner {
        &self.startup
    }

    pub fn shutdown_events(&self) -> &EventRunner {
        &self.shutdown
    }

    // == Registration ==
    pub fn add_startup(&mut self, event: Event) {
        self.startup.push(event);
    }

    pub fn add_shutdown(&mut self, event: Event) {
        self.shutdown.push(event);
    }

    pub fn on_startup<F>(&mut self, action: F)
    where
        F: FnMut() -> anyhow::Result<()> + Send + 'static,
    {
        self.add_startup(Event::sync(action));
    }

    pub fn on_startup_async<F, Fut>(&mut self, action: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.add_startup(Event::from_async(action));
    }

    pub fn on_shutdown<F>(&mut self, action: F)
    where
        F: FnMut() -> anyhow::Result<()> + Send + 'static,
    {
        self.add_shutdown(Event::sync(action));
    }

    pub fn on_shutdown_async<F, Fut>(&mut self, action: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.add_shutdown(Event::from_async(action));
    }

    // == States ==
    /// Stores `value` as the lifespan states.
    ///
    /// Any JSON value is accepted here; a non-object is only rejected when
    /// [`states`](Self::states) is read.
    pub fn set_states(&mut self, value: impl Into<Value>) {
        self.states = Some(value.into());
    }

    /// Calls `factory` once, now, and stores its result as the states.
    pub fn set_states_with<F, V>(&mut self, factory: F)
    where
        F: FnOnce() -> V,
        V: Into<Value>,
    {
        self.states = Some(factory().into());
    }

    /// Returns the states mapping, `None` if never set.
    pub fn states(&self) -> Result<Option<&Map<String, Value>>, LifespanError> {
        match &self.states {
            None => Ok(None),
            Some(Value::Object(map)) => Ok(Some(map)),
            Some(other) => Err(LifespanError::InvalidStates(json_kind(other).to_string())),
        }
    }

    // == Enter ==
    /// Runs the startup queue and moves to [`Phase::Active`].
    ///
    /// On failure the lifespan is closed and shutdown events are not run.
    pub async fn enter(&mut self) -> Result<&mut Self, LifespanError> {
        if self.phase != Phase::Idle {
            return Err(LifespanError::InvalidPhase {
                operation: "enter",
                phase: self.phase,
            });
        }

        self.phase = Phase::Entering;
        debug!(events = self.startup.len(), "Running lifespan startup events");

        match run_phase(&mut self.startup, Phase::Entering, self.timeout).await {
            Ok(()) => {
                self.phase = Phase::Active;
                Ok(self)
            }
            Err(err) => {
                self.phase = Phase::Closed;
                Err(err)
            }
        }
    }

    // == Exit ==
    /// Runs the shutdown queue and closes the lifespan.
    pub async fn exit(&mut self) -> Result<(), LifespanError> {
        if self.phase != Phase::Active {
            return Err(LifespanError::InvalidPhase {
                operation: "exit",
                phase: self.phase,
            });
        }

        self.phase = Phase::Exiting;
        debug!(events = self.shutdown.len(), "Running lifespan shutdown events");

        let result = run_phase(&mut self.shutdown, Phase::Exiting, self.timeout).await;
        self.phase = Phase::Closed;
        result
    }

    // == Run ==
    /// Enters, awaits `body`, then exits, returning the body's output.
    ///
    /// Shutdown runs whenever startup succeeded and `body` completed.
    pub async fn run<F>(&mut self, body: F) -> Result<F::Output, LifespanError>
    where
        F: Future,
    {
        self.enter().await?;
        let output = body.await;
        self.exit().await?;
        Ok(output)
    }
}

impl Default for Lifespan {
    fn default() -> Self {
        Self::new()
    }
}

async fn run_phase(
    events: &mut EventRunner,
    phase: Phase,
    limit: Option<Duration>,
) -> Result<(), LifespanError> {
    let outcome = match limit {
        Some(limit) => timeout(limit, events.run())
            .await
            .map_err(|_| LifespanError::Timeout {
                phase,
                timeout: limit,
            })?,
        None => events.run().await,
    };

    outcome.map_err(|source| LifespanError::Action { phase, source })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
