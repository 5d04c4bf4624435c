//! Session timer state machine.
//!
//! The timer counts whole seconds. It does not use internal threads - the
//! caller (usually an [`super::IntervalDriver`]) is responsible for calling
//! `tick()` once per second while the session is running.
//!
//! ## Sequencing
//!
//! ```text
//! phase 0 -> phase 1 -> ... -> phase n-1 --+--> phase 0 (next cycle)
//!                                          +--> Relax -> phase 0 (next set)
//!                                          +--> complete (last cycle of last set)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = SessionTimer::new(Pattern::default(), SessionConfig::default());
//! timer.start();
//! // Once per second:
//! timer.tick();
//! ```

use chrono::Utc;
use tracing::{debug, warn};

use super::pattern::{Pattern, Phase};
use super::session::{
    ActivePhase, SessionConfig, SessionConfigUpdate, SessionSnapshot, SessionState,
};
use crate::error::SessionError;
use crate::events::{Event, NoopNotifier, Notifier};

/// Owns the session state and the tick/transition algorithm.
///
/// The commands below are the only way to mutate the state.
pub struct SessionTimer {
    state: SessionState,
    notifier: Box<dyn Notifier>,
}

impl std::fmt::Debug for SessionTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTimer")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Default for SessionTimer {
    fn default() -> Self {
        Self::new(Pattern::default(), SessionConfig::default())
    }
}

impl SessionTimer {
    /// Create a stopped timer positioned on the first phase, with events discarded.
    pub fn new(pattern: Pattern, config: SessionConfig) -> Self {
        Self::with_notifier(pattern, config, Box::new(NoopNotifier))
    }

    pub fn with_notifier(
        pattern: Pattern,
        config: SessionConfig,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        Self {
            state: SessionState::new(pattern, config),
            notifier,
        }
    }

    pub fn set_notifier(&mut self, notifier: Box<dyn Notifier>) {
        self.notifier = notifier;
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.snapshot()
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn is_complete(&self) -> bool {
        self.state.session_complete
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin or resume counting. Announces the active interval only on the
    /// stopped -> running edge.
    pub fn start(&mut self) {
        if self.state.running {
            return;
        }
        self.state.running = true;
        self.state.session_complete = false;
        debug!(
            active = ?self.state.active,
            remaining = self.state.time_remaining_secs,
            "session started"
        );
        self.emit_phase_start();
    }

    /// Freeze the countdown where it is.
    pub fn pause(&mut self) {
        if self.state.running {
            debug!(remaining = self.state.time_remaining_secs, "session paused");
        }
        self.state.running = false;
    }

    pub fn reset(&mut self) {
        self.state.running = false;
        self.state.rewind();
        debug!("session reset");
    }

    /// Swap in a new pattern and rewind progress. `running` and the config are kept.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidPattern` (state untouched) if the phases
    /// are empty or any of them is unnamed or zero-length.
    pub fn replace_pattern(&mut self, phases: Vec<Phase>) -> Result<(), SessionError> {
        let pattern = Pattern::new(phases)?;
        debug!(
            phases = pattern.len(),
            cycle_secs = pattern.cycle_secs(),
            "pattern replaced"
        );
        self.state.pattern = pattern;
        self.state.rewind();
        Ok(())
    }

    /// Change one phase's length in place. Editing the phase that is
    /// currently counting down restarts its countdown at the new length.
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange` for a bad index, `InvalidDuration` for zero seconds.
    pub fn replace_phase_duration(
        &mut self,
        index: usize,
        duration_secs: u32,
    ) -> Result<(), SessionError> {
        let len = self.state.pattern.len();
        if index >= len {
            return Err(SessionError::IndexOutOfRange { index, len });
        }
        if duration_secs < 1 {
            return Err(SessionError::InvalidDuration {
                index,
                duration: duration_secs,
            });
        }

        self.state.pattern.set_duration(index, duration_secs);
        if self.state.active == ActivePhase::Phase(index) {
            self.state.time_remaining_secs = duration_secs;
        }
        debug!(index, duration_secs, "phase duration replaced");
        Ok(())
    }

    /// Merge new cycle/set/relax settings without rewinding progress.
    ///
    /// Counters beyond the new maxima are pulled back onto them, and a relax
    /// countdown longer than the new relax length is shortened to it.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` (state untouched) if any provided count is zero.
    pub fn update_config(&mut self, update: SessionConfigUpdate) -> Result<(), SessionError> {
        let config = self.state.config.merged(&update)?;
        self.state.config = config;

        self.state.current_cycle = self.state.current_cycle.min(config.cycles_per_set);
        self.state.current_set = self.state.current_set.min(config.number_of_sets);
        if self.state.is_relaxing() {
            self.state.time_remaining_secs = self.state.time_remaining_secs.min(config.relax_secs);
        }
        debug!(?config, "session config updated");
        Ok(())
    }

    /// Advance one second. Does nothing unless running.
    ///
    /// At most one boundary is resolved per call, and the new interval's full
    /// length is loaded in the same call.
    pub fn tick(&mut self) {
        if !self.state.running || self.state.session_complete {
            return;
        }

        self.state.time_remaining_secs = self.state.time_remaining_secs.saturating_sub(1);
        if self.state.time_remaining_secs > 0 {
            return;
        }

        match self.state.active {
            ActivePhase::Relax => self.finish_relax(),
            ActivePhase::Phase(index) => self.finish_phase(index),
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn finish_relax(&mut self) {
        if self.state.current_set < self.state.config.number_of_sets {
            self.state.current_set += 1;
            self.state.current_cycle = 1;
            self.enter_phase(0);
            debug!(set = self.state.current_set, "relax finished, next set");
            self.emit_phase_start();
        } else {
            self.complete_session();
        }
    }

    fn finish_phase(&mut self, index: usize) {
        let next = (index + 1) % self.state.pattern.len();

        if next != 0 {
            self.emit(Event::PhaseComplete {
                phase_index: index,
                phase_name: self.state.active_label().to_string(),
                at: Utc::now(),
            });
            self.enter_phase(next);
            debug!(phase = next, "phase advanced");
            self.emit_phase_start();
            return;
        }

        let next_cycle = self.state.current_cycle + 1;
        if next_cycle <= self.state.config.cycles_per_set {
            self.emit(Event::CycleComplete {
                cycle: self.state.current_cycle,
                set: self.state.current_set,
                at: Utc::now(),
            });
            self.state.current_cycle = next_cycle;
            self.enter_phase(0);
            debug!(cycle = next_cycle, "cycle advanced");
            self.emit_phase_start();
        } else if self.state.current_set < self.state.config.number_of_sets {
            let relax_secs = self.state.config.relax_secs;
            self.emit(Event::SetComplete {
                set: self.state.current_set,
                relax_secs,
                at: Utc::now(),
            });
            // A zero-length relax resolves on the following tick.
            self.state.active = ActivePhase::Relax;
            self.state.time_remaining_secs = relax_secs;
            debug!(
                set = self.state.current_set,
                relax_secs,
                "set finished, relaxing"
            );
        } else {
            self.complete_session();
        }
    }

    fn enter_phase(&mut self, index: usize) {
        self.state.active = ActivePhase::Phase(index);
        self.state.time_remaining_secs = self.state.active_duration_secs();
    }

    /// Stop and return the display to a fresh starting position.
    fn complete_session(&mut self) {
        self.state.running = false;
        self.state.rewind();
        self.state.session_complete = true;
        debug!(
            sets = self.state.config.number_of_sets,
            cycles_per_set = self.state.config.cycles_per_set,
            "session complete"
        );
        self.emit(Event::SessionComplete {
            sets: self.state.config.number_of_sets,
            cycles_per_set: self.state.config.cycles_per_set,
            at: Utc::now(),
        });
    }

    fn emit_phase_start(&self) {
        self.emit(Event::PhaseStart {
            active: self.state.active,
            label: self.state.active_label().to_string(),
            duration_secs: self.state.active_duration_secs(),
            cycle: self.state.current_cycle,
            set: self.state.current_set,
            at: Utc::now(),
        });
    }

    fn emit(&self, event: Event) {
        if let Err(e) = self.notifier.notify(&event) {
            warn!(kind = ?event.kind(), error = %e, "notifier failed, event dropped");
        }
    }
}
