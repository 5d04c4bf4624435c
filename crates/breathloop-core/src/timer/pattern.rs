use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// A single named, timed step of a breath pattern (e.g. "Inhale" for 4s).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    pub name: String,
    /// Duration in whole seconds.
    pub duration_secs: u32,
}

impl Phase {
    pub fn new(name: impl Into<String>, duration_secs: u32) -> Self {
        Self {
            name: name.into(),
            duration_secs,
        }
    }
}

/// Ordered, non-empty list of phases making up one cycle.
///
/// Only constructible through [`Pattern::new`] (or deserialization, which
/// runs the same checks), so every held pattern is playable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Phase>", into = "Vec<Phase>")]
pub struct Pattern {
    phases: Vec<Phase>,
}

impl Pattern {
    /// Validate and wrap a list of phases.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidPattern` if the list is empty, a phase
    /// name is blank, or any duration is zero.
    pub fn new(phases: Vec<Phase>) -> Result<Self, SessionError> {
        if phases.is_empty() {
            return Err(SessionError::InvalidPattern(
                "pattern must contain at least one phase".into(),
            ));
        }
        for (i, phase) in phases.iter().enumerate() {
            if phase.name.trim().is_empty() {
                return Err(SessionError::InvalidPattern(format!(
                    "phase {i} has an empty name"
                )));
            }
            if phase.duration_secs == 0 {
                return Err(SessionError::InvalidPattern(format!(
                    "phase {i} ('{}') must last at least 1 second",
                    phase.name
                )));
            }
        }
        Ok(Self { phases })
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    /// Always false for a constructed pattern.
    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Phase> {
        self.phases.get(index)
    }

    /// Non-empty by construction.
    pub fn first(&self) -> &Phase {
        &self.phases[0]
    }

    /// Seconds needed for one full cycle.
    pub fn cycle_secs(&self) -> u64 {
        self.phases.iter().map(|p| u64::from(p.duration_secs)).sum()
    }

    /// Replace one phase duration. Caller has already validated both inputs.
    pub(crate) fn set_duration(&mut self, index: usize, duration_secs: u32) {
        if let Some(phase) = self.phases.get_mut(index) {
            phase.duration_secs = duration_secs;
        }
    }
}

impl Default for Pattern {
    fn default() -> Self {
        Self {
            phases: vec![
                Phase::new("Inhale", 4),
                Phase::new("Hold", 4),
                Phase::new("Exhale", 4),
            ],
        }
    }
}

impl TryFrom<Vec<Phase>> for Pattern {
    type Error = SessionError;

    fn try_from(phases: Vec<Phase>) -> Result<Self, Self::Error> {
        Self::new(phases)
    }
}

impl From<Pattern> for Vec<Phase> {
    fn from(pattern: Pattern) -> Self {
        pattern.phases
    }
}

/// A named built-in pattern.
#[derive(Debug, Clone, Serialize)]
pub struct Preset {
    pub id: &'static str,
    pub name: &'static str,
    pub pattern: Pattern,
}

/// Built-in presets, in display order.
pub fn presets() -> Vec<Preset> {
    vec![
        Preset {
            id: "inhale-hold-exhale",
            name: "Inhale-Hold-Exhale",
            pattern: Pattern::default(),
        },
        Preset {
            id: "inhale-exhale",
            name: "Inhale-Exhale",
            pattern: Pattern {
                phases: vec![Phase::new("Inhale", 4), Phase::new("Exhale", 4)],
            },
        },
        Preset {
            id: "inhale-hold-exhale-hold",
            name: "Inhale-Hold-Exhale-Hold",
            pattern: Pattern {
                phases: vec![
                    Phase::new("Inhale", 4),
                    Phase::new("Hold", 4),
                    Phase::new("Exhale", 4),
                    Phase::new("Hold", 4),
                ],
            },
        },
    ]
}

pub fn preset(id: &str) -> Option<Preset> {
    presets().into_iter().find(|p| p.id == id)
}
