use serde::{Deserialize, Serialize};

use super::pattern::Pattern;
use crate::error::SessionError;

/// How many cycles make a set, how many sets make a session, and how long to
/// rest between sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub cycles_per_set: u32,
    pub number_of_sets: u32,
    pub relax_secs: u32,
}

impl SessionConfig {
    /// # Errors
    ///
    /// Returns `SessionError::InvalidConfig` if either count is zero.
    pub fn new(
        cycles_per_set: u32,
        number_of_sets: u32,
        relax_secs: u32,
    ) -> Result<Self, SessionError> {
        check_at_least_one("cycles_per_set", cycles_per_set)?;
        check_at_least_one("number_of_sets", number_of_sets)?;
        Ok(Self {
            cycles_per_set,
            number_of_sets,
            relax_secs,
        })
    }

    /// Merge a partial update, validating every provided field first.
    pub fn merged(&self, update: &SessionConfigUpdate) -> Result<Self, SessionError> {
        Self::new(
            update.cycles_per_set.unwrap_or(self.cycles_per_set),
            update.number_of_sets.unwrap_or(self.number_of_sets),
            update.relax_secs.unwrap_or(self.relax_secs),
        )
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cycles_per_set: 5,
            number_of_sets: 1,
            relax_secs: 30,
        }
    }
}

fn check_at_least_one(field: &str, value: u32) -> Result<(), SessionError> {
    if value == 0 {
        return Err(SessionError::InvalidConfig {
            field: field.into(),
            message: "must be at least 1".into(),
        });
    }
    Ok(())
}

/// Partial configuration change; `None` keeps the current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfigUpdate {
    #[serde(default)]
    pub cycles_per_set: Option<u32>,
    #[serde(default)]
    pub number_of_sets: Option<u32>,
    #[serde(default)]
    pub relax_secs: Option<u32>,
}

/// Which interval is currently counting down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "index", rename_all = "lowercase")]
pub enum ActivePhase {
    /// Index into the pattern.
    Phase(usize),
    /// Rest between sets, outside the pattern.
    Relax,
}

/// All mutable session state. Owned by [`super::SessionTimer`]; everyone else
/// reads it through `&SessionState` or a [`SessionSnapshot`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub pattern: Pattern,
    pub config: SessionConfig,
    pub running: bool,
    pub active: ActivePhase,
    pub time_remaining_secs: u32,
    /// 1-based.
    pub current_cycle: u32,
    /// 1-based.
    pub current_set: u32,
    pub session_complete: bool,
}

impl SessionState {
    pub fn new(pattern: Pattern, config: SessionConfig) -> Self {
        let time_remaining_secs = pattern.first().duration_secs;
        Self {
            pattern,
            config,
            running: false,
            active: ActivePhase::Phase(0),
            time_remaining_secs,
            current_cycle: 1,
            current_set: 1,
            session_complete: false,
        }
    }

    /// Rewind position to the first phase of the first cycle of the first set.
    /// Leaves `running`, `pattern` and `config` alone.
    pub(crate) fn rewind(&mut self) {
        self.active = ActivePhase::Phase(0);
        self.time_remaining_secs = self.pattern.first().duration_secs;
        self.current_cycle = 1;
        self.current_set = 1;
        self.session_complete = false;
    }

    pub fn is_relaxing(&self) -> bool {
        self.active == ActivePhase::Relax
    }

    /// Length of the interval currently counting down.
    pub fn active_duration_secs(&self) -> u32 {
        match self.active {
            ActivePhase::Phase(i) => self.pattern.get(i).map_or(0, |p| p.duration_secs),
            ActivePhase::Relax => self.config.relax_secs,
        }
    }

    pub fn active_label(&self) -> &str {
        match self.active {
            ActivePhase::Phase(i) => self.pattern.get(i).map_or("", |p| p.name.as_str()),
            ActivePhase::Relax => RELAX_LABEL,
        }
    }

    /// 0.0 .. 1.0 progress within the active interval.
    pub fn interval_progress(&self) -> f64 {
        let total = self.active_duration_secs();
        if total == 0 {
            return 1.0;
        }
        1.0 - (f64::from(self.time_remaining_secs) / f64::from(total))
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            label: self.active_label().to_string(),
            active: self.active,
            time_remaining_secs: self.time_remaining_secs,
            interval_secs: self.active_duration_secs(),
            progress: self.interval_progress(),
            current_cycle: self.current_cycle,
            cycles_per_set: self.config.cycles_per_set,
            current_set: self.current_set,
            number_of_sets: self.config.number_of_sets,
            running: self.running,
            session_complete: self.session_complete,
        }
    }
}

pub const RELAX_LABEL: &str = "Relax";

/// Read-only view handed to renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub label: String,
    pub active: ActivePhase,
    pub time_remaining_secs: u32,
    pub interval_secs: u32,
    pub progress: f64,
    pub current_cycle: u32,
    pub cycles_per_set: u32,
    pub current_set: u32,
    pub number_of_sets: u32,
    pub running: bool,
    pub session_complete: bool,
}

impl SessionSnapshot {
    pub fn clock(&self) -> String {
        format_clock(self.time_remaining_secs)
    }
}

/// `m:ss`, minutes unpadded.
pub fn format_clock(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}
