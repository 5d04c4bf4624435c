mod driver;
mod engine;
mod pattern;
mod session;

pub use driver::{fast_forward, IntervalDriver, TickSource};
pub use engine::SessionTimer;
pub use pattern::{preset, presets, Pattern, Phase, Preset};
pub use session::{
    format_clock, ActivePhase, SessionConfig, SessionConfigUpdate, SessionSnapshot, SessionState,
    RELAX_LABEL,
};
