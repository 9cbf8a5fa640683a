// Per-view fetch state: loading -> success | error, tagged by generation
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::broadcast;

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewEvent {
    pub view: &'static str,
    pub generation: u64,
    pub phase: Phase,
}

/// Fan-out of view transitions to any number of listeners
#[derive(Debug, Clone)]
pub struct ViewEvents {
    sender: broadcast::Sender<ViewEvent>,
}

impl ViewEvents {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ViewEvent> {
        self.sender.subscribe()
    }

    fn publish(&self, event: ViewEvent) {
        // No listeners is fine
        let _ = self.sender.send(event);
    }
}

impl Default for ViewEvents {
    fn default() -> Self {
        Self::new()
    }
}

/// Proof that a fetch was started for a given generation. Consumed on resolve.
#[derive(Debug)]
pub struct Ticket {
    generation: u64,
}

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ViewSnapshot<T> {
    pub view: &'static str,
    pub generation: u64,
    pub phase: Phase,
    pub data: Option<T>,
    pub error: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug)]
struct CellState<T> {
    generation: u64,
    phase: Phase,
    data: Option<T>,
    error: Option<String>,
    updated_at: Option<DateTime<Utc>>,
}

/// State cell owned by one view.
///
/// Every fetch starts a new generation. A response is applied only if its
/// generation is still current, so a slow answer to an old filter choice
/// never overwrites a newer one. Previous data stays visible while a new
/// fetch is loading; an error replaces it with the message.
#[derive(Debug)]
pub struct ViewCell<T> {
    view: &'static str,
    state: RwLock<CellState<T>>,
    events: ViewEvents,
}

impl<T: Clone> ViewCell<T> {
    pub fn new(view: &'static str, events: ViewEvents) -> Self {
        Self {
            view,
            state: RwLock::new(CellState {
                generation: 0,
                phase: Phase::Loading,
                data: None,
                error: None,
                updated_at: None,
            }),
            events,
        }
    }

    pub fn view(&self) -> &'static str {
        self.view
    }

    pub fn begin(&self) -> Ticket {
        let generation = {
            let mut state = self.write();
            state.generation += 1;
            state.phase = Phase::Loading;
            state.error = None;
            state.generation
        };

        self.events.publish(ViewEvent {
            view: self.view,
            generation,
            phase: Phase::Loading,
        });
        Ticket { generation }
    }

    /// Apply a fetch outcome. Returns false when the ticket was superseded.
    pub fn resolve(&self, ticket: Ticket, outcome: Result<T, String>) -> bool {
        let phase = {
            let mut state = self.write();
            if state.generation != ticket.generation {
                tracing::debug!(
                    "Discarding stale {} response (generation {}, current {})",
                    self.view,
                    ticket.generation,
                    state.generation
                );
                return false;
            }

            match outcome {
                Ok(data) => {
                    state.data = Some(data);
                    state.error = None;
                    state.phase = Phase::Success;
                }
                Err(message) => {
                    tracing::debug!("{} view failed: {}", self.view, message);
                    state.data = None;
                    state.error = Some(message);
                    state.phase = Phase::Error;
                }
            }
            state.updated_at = Some(Utc::now());
            state.phase
        };

        self.events.publish(ViewEvent {
            view: self.view,
            generation: ticket.generation,
            phase,
        });
        true
    }

    pub fn snapshot(&self) -> ViewSnapshot<T> {
        let state = self.read();
        ViewSnapshot {
            view: self.view,
            generation: state.generation,
            phase: state.phase,
            data: state.data.clone(),
            error: state.error.clone(),
            updated_at: state.updated_at,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, CellState<T>> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, CellState<T>> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
