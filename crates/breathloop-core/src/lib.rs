//! # Breathloop Core Library
//!
//! This library provides the core logic for the Breathloop guided breathing
//! timer. The CLI binary is a thin host over the same library: it owns the
//! clock, the terminal output and the preferences file.
//!
//! ## Architecture
//!
//! - **Session Timer**: A one-second, tick-driven state machine that walks a
//!   breath pattern through cycles, sets and relax intervals. The caller
//!   delivers `tick()`; the timer never sleeps.
//! - **Events**: Every boundary is reported to an injected [`Notifier`]
//! - **Storage**: TOML-based preferences that seed new sessions
//!
//! ## Key Components
//!
//! - [`SessionTimer`]: Core timer state machine
//! - [`Pattern`]: Validated list of named, timed phases
//! - [`IntervalDriver`]: Blocking 1 Hz tick source
//! - [`Config`]: Preferences management

pub mod error;
pub mod events;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, SessionError};
pub use events::{Event, EventKind, EventLog, NoopNotifier, Notifier};
pub use storage::{Config, NotificationsConfig};
pub use timer::{
    fast_forward, format_clock, preset, presets, ActivePhase, IntervalDriver, Pattern, Phase,
    Preset, SessionConfig, SessionConfigUpdate, SessionSnapshot, SessionState, SessionTimer,
    TickSource,
};
