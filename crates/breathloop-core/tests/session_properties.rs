//! Property tests for the session timer over arbitrary patterns and commands.

use breathloop_core::{
    ActivePhase, Pattern, Phase, SessionConfig, SessionConfigUpdate, SessionState, SessionTimer,
};
use proptest::prelude::*;

fn pattern_strategy() -> impl Strategy<Value = Pattern> {
    prop::collection::vec(("[A-Za-z]{1,8}", 1u32..6), 1..5).prop_map(|phases| {
        Pattern::new(
            phases
                .into_iter()
                .map(|(name, secs)| Phase::new(name, secs))
                .collect(),
        )
        .unwrap()
    })
}

fn config_strategy() -> impl Strategy<Value = SessionConfig> {
    (1u32..4, 1u32..4, 0u32..4)
        .prop_map(|(cycles, sets, relax)| SessionConfig::new(cycles, sets, relax).unwrap())
}

#[derive(Debug, Clone)]
enum Command {
    Tick(u8),
    Start,
    Pause,
    Reset,
    EditDuration(usize, u32),
    UpdateConfig(Option<u32>, Option<u32>, Option<u32>),
}

fn command_strategy() -> impl Strategy<Value = Command> {
    prop_oneof![
        6 => (1u8..20).prop_map(Command::Tick),
        2 => Just(Command::Start),
        1 => Just(Command::Pause),
        1 => Just(Command::Reset),
        1 => (0usize..6, 0u32..6).prop_map(|(i, d)| Command::EditDuration(i, d)),
        1 => (
            prop::option::of(0u32..4),
            prop::option::of(0u32..4),
            prop::option::of(0u32..4)
        )
            .prop_map(|(c, s, r)| Command::UpdateConfig(c, s, r)),
    ]
}

fn assert_invariants(state: &SessionState) {
    if let ActivePhase::Phase(i) = state.active {
        assert!(i < state.pattern.len());
    }
    assert!(state.time_remaining_secs <= state.active_duration_secs());
    assert!(state.current_cycle >= 1);
    assert!(state.current_cycle <= state.config.cycles_per_set);
    assert!(state.current_set >= 1);
    assert!(state.current_set <= state.config.number_of_sets);
    if state.session_complete {
        assert!(!state.running);
    }
}

proptest! {
    #[test]
    fn one_cycle_of_ticks_reaches_second_cycle(
        pattern in pattern_strategy(),
        config in config_strategy(),
    ) {
        let cycle_secs = pattern.cycle_secs();
        let mut timer = SessionTimer::new(pattern, config);
        timer.reset();
        timer.start();

        for _ in 0..cycle_secs {
            timer.tick();
        }

        let state = timer.state();
        if config.cycles_per_set >= 2 {
            prop_assert_eq!(state.current_cycle, 2);
            prop_assert_eq!(state.active, ActivePhase::Phase(0));
        } else if config.number_of_sets >= 2 {
            prop_assert_eq!(state.active, ActivePhase::Relax);
        } else {
            prop_assert!(state.session_complete);
        }
    }

    #[test]
    fn session_always_terminates_in_expected_ticks(
        pattern in pattern_strategy(),
        config in config_strategy(),
    ) {
        let per_set = pattern.cycle_secs() * u64::from(config.cycles_per_set);
        // A zero-length relax still costs one tick.
        let relax = u64::from(config.relax_secs.max(1));
        let sets = u64::from(config.number_of_sets);
        let expected = per_set * sets + relax * (sets - 1);

        let mut timer = SessionTimer::new(pattern, config);
        timer.start();
        let mut delivered = 0u64;
        while timer.is_running() {
            timer.tick();
            delivered += 1;
            prop_assert!(delivered <= expected);
        }
        prop_assert_eq!(delivered, expected);
        prop_assert!(timer.is_complete());
    }

    #[test]
    fn invariants_hold_under_random_commands(
        pattern in pattern_strategy(),
        config in config_strategy(),
        commands in prop::collection::vec(command_strategy(), 0..60),
    ) {
        let mut timer = SessionTimer::new(pattern, config);
        assert_invariants(timer.state());

        for command in commands {
            let before = timer.state().clone();
            match command {
                Command::Tick(n) => {
                    for _ in 0..n {
                        timer.tick();
                        assert_invariants(timer.state());
                    }
                }
                Command::Start => timer.start(),
                Command::Pause => timer.pause(),
                Command::Reset => timer.reset(),
                Command::EditDuration(index, secs) => {
                    if timer.replace_phase_duration(index, secs).is_err() {
                        prop_assert_eq!(timer.state(), &before);
                    }
                }
                Command::UpdateConfig(cycles_per_set, number_of_sets, relax_secs) => {
                    let update = SessionConfigUpdate { cycles_per_set, number_of_sets, relax_secs };
                    if timer.update_config(update).is_err() {
                        prop_assert_eq!(timer.state(), &before);
                    }
                }
            }
            assert_invariants(timer.state());
        }
    }
}
