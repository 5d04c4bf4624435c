use std::io::Write;

use breathloop_core::{
    fast_forward, preset, ActivePhase, Config, ConfigError, Event, EventLog, IntervalDriver,
    NotificationsConfig, Notifier, SessionConfigUpdate, SessionSnapshot, SessionTimer,
};
use clap::Args;
use tracing::debug;

/// Overrides applied on top of the saved preferences.
#[derive(Args, Debug, Clone, Default)]
pub struct SessionArgs {
    /// Pattern preset id (see `presets`)
    #[arg(long)]
    pub preset: Option<String>,
    /// Cycles per set
    #[arg(long)]
    pub cycles: Option<u32>,
    /// Number of sets
    #[arg(long)]
    pub sets: Option<u32>,
    /// Relax seconds between sets
    #[arg(long)]
    pub relax: Option<u32>,
}

/// Announces events on the terminal, ringing the bell when sound is enabled.
struct TerminalNotifier {
    bell: bool,
}

impl Notifier for TerminalNotifier {
    fn notify(&self, event: &Event) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut out = std::io::stdout().lock();
        let bell = if self.bell { "\x07" } else { "" };
        writeln!(out, "\r{}{bell}", describe(event))?;
        out.flush()?;
        Ok(())
    }
}

fn describe(event: &Event) -> String {
    match event {
        Event::PhaseStart {
            active: ActivePhase::Relax,
            duration_secs,
            ..
        } => format!("~ Relax for {duration_secs}s"),
        Event::PhaseStart {
            label,
            duration_secs,
            cycle,
            set,
            ..
        } => format!("> {label} {duration_secs}s (cycle {cycle}, set {set})"),
        Event::PhaseComplete { phase_name, .. } => format!("  {phase_name} done"),
        Event::CycleComplete { cycle, .. } => format!("* Cycle {cycle} complete"),
        Event::SetComplete {
            set,
            relax_secs,
            ..
        } => format!("** Set {set} complete, relax {relax_secs}s"),
        Event::SessionComplete {
            sets,
            cycles_per_set,
            ..
        } => format!("*** Session complete: {sets} set(s) of {cycles_per_set} cycle(s)"),
    }
}

fn status_line(snap: &SessionSnapshot) -> String {
    format!(
        "{:<10} {:>5}  cycle {}/{}  set {}/{}",
        snap.label,
        snap.clock(),
        snap.current_cycle,
        snap.cycles_per_set,
        snap.current_set,
        snap.number_of_sets
    )
}

/// The terminal has no volume control, so a muted volume silences the bell.
fn bell_enabled(notifications: &NotificationsConfig, quiet: bool) -> bool {
    notifications.sound_enabled && notifications.volume > 0 && !quiet
}

/// Build a stopped timer from preferences plus command-line overrides.
fn build_timer(
    args: &SessionArgs,
    config: &Config,
) -> Result<SessionTimer, Box<dyn std::error::Error>> {
    let (mut pattern, session_config) = config.session_parts()?;
    if let Some(id) = &args.preset {
        pattern = preset(id)
            .ok_or_else(|| ConfigError::UnknownPreset(id.clone()))?
            .pattern;
    }

    let mut timer = SessionTimer::new(pattern, session_config);
    timer.update_config(SessionConfigUpdate {
        cycles_per_set: args.cycles,
        number_of_sets: args.sets,
        relax_secs: args.relax,
    })?;
    debug!(
        phases = timer.state().pattern.len(),
        config = ?timer.state().config,
        "session built"
    );
    Ok(timer)
}

pub fn run(args: SessionArgs, quiet: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let mut timer = build_timer(&args, &config)?;
    timer.set_notifier(Box::new(TerminalNotifier {
        bell: bell_enabled(&config.notifications, quiet),
    }));

    timer.start();
    let driver = IntervalDriver::default();
    driver.drive(&mut timer, |t| {
        if t.is_running() {
            let mut out = std::io::stdout().lock();
            // Status is best effort; a closed stdout just stops the redraw.
            let _ = write!(out, "\r{}", status_line(&t.snapshot()));
            let _ = out.flush();
        }
    });
    println!();
    Ok(())
}

pub fn simulate(
    args: SessionArgs,
    ticks: u64,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let mut timer = build_timer(&args, &config)?;
    let log = EventLog::new();
    timer.set_notifier(Box::new(log.clone()));

    timer.start();
    let delivered = fast_forward(&mut timer, ticks);
    debug!(requested = ticks, delivered, "simulation finished");
    let snapshot = timer.snapshot();
    let events = log.drain();

    if json {
        let report = serde_json::json!({
            "ticks_delivered": delivered,
            "events": events,
            "snapshot": snapshot,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for event in &events {
            println!("{}", describe(event));
        }
        println!("after {delivered} tick(s): {}", status_line(&snapshot));
        if snapshot.session_complete {
            println!("session complete");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_preferences() {
        let args = SessionArgs {
            preset: Some("inhale-exhale".into()),
            cycles: Some(2),
            sets: Some(3),
            relax: Some(0),
        };
        let timer = build_timer(&args, &Config::default()).unwrap();
        let state = timer.state();
        assert_eq!(state.pattern.len(), 2);
        assert_eq!(state.config.cycles_per_set, 2);
        assert_eq!(state.config.number_of_sets, 3);
        assert_eq!(state.config.relax_secs, 0);
        assert!(!state.running);
    }

    #[test]
    fn unknown_preset_is_rejected() {
        let args = SessionArgs {
            preset: Some("4-7-8".into()),
            ..Default::default()
        };
        assert!(build_timer(&args, &Config::default()).is_err());
    }

    #[test]
    fn zero_cycles_override_is_rejected() {
        let args = SessionArgs {
            cycles: Some(0),
            ..Default::default()
        };
        assert!(build_timer(&args, &Config::default()).is_err());
    }

    #[test]
    fn bell_follows_sound_volume_and_quiet_flag() {
        let mut notifications = NotificationsConfig::default();
        assert!(bell_enabled(&notifications, false));
        assert!(!bell_enabled(&notifications, true));

        notifications.volume = 0;
        assert!(!bell_enabled(&notifications, false));

        notifications.volume = 40;
        notifications.sound_enabled = false;
        assert!(!bell_enabled(&notifications, false));
    }

    #[test]
    fn status_line_shows_counters() {
        let timer = SessionTimer::default();
        let line = status_line(&timer.snapshot());
        assert!(line.starts_with("Inhale"));
        assert!(line.contains("0:04"));
        assert!(line.contains("cycle 1/5"));
        assert!(line.contains("set 1/1"));
    }
}
