//! Session transition events and the notification port.
//!
//! The timer reports every phase/cycle/set/session boundary as an [`Event`]
//! handed to a [`Notifier`]. Notifiers are fire-and-forget: a failing sink is
//! logged and ignored, it never stalls or rewinds the session.

use std::error::Error;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::ActivePhase;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A pattern phase or relax interval begins counting down.
    PhaseStart {
        active: ActivePhase,
        label: String,
        duration_secs: u32,
        cycle: u32,
        set: u32,
        at: DateTime<Utc>,
    },
    PhaseComplete {
        phase_index: usize,
        phase_name: String,
        at: DateTime<Utc>,
    },
    CycleComplete {
        cycle: u32,
        set: u32,
        at: DateTime<Utc>,
    },
    /// A set finished and the relax interval begins.
    SetComplete {
        set: u32,
        relax_secs: u32,
        at: DateTime<Utc>,
    },
    SessionComplete {
        sets: u32,
        cycles_per_set: u32,
        at: DateTime<Utc>,
    },
}

/// Field-less discriminant of [`Event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    PhaseStart,
    PhaseComplete,
    CycleComplete,
    SetComplete,
    SessionComplete,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::PhaseStart { .. } => EventKind::PhaseStart,
            Event::PhaseComplete { .. } => EventKind::PhaseComplete,
            Event::CycleComplete { .. } => EventKind::CycleComplete,
            Event::SetComplete { .. } => EventKind::SetComplete,
            Event::SessionComplete { .. } => EventKind::SessionComplete,
        }
    }
}

/// Receives transition events (sound, haptics, logging...).
pub trait Notifier {
    /// Called synchronously from inside the transition. Errors are logged by
    /// the timer and otherwise dropped.
    fn notify(&self, event: &Event) -> Result<(), Box<dyn Error + Send + Sync>>;
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _event: &Event) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }
}

/// Records events in order. Clones share the same buffer, so one handle can
/// be given to the timer and another kept for inspection.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Arc<Mutex<Vec<Event>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn kinds(&self) -> Vec<EventKind> {
        self.events
            .lock()
            .map(|e| e.iter().map(Event::kind).collect())
            .unwrap_or_default()
    }

    /// Remove and return everything recorded so far.
    pub fn drain(&self) -> Vec<Event> {
        self.events
            .lock()
            .map(|mut e| std::mem::take(&mut *e))
            .unwrap_or_default()
    }
}

impl Notifier for EventLog {
    fn notify(&self, event: &Event) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.events
            .lock()
            .map_err(|_| "event log poisoned")?
            .push(event.clone());
        Ok(())
    }
}
