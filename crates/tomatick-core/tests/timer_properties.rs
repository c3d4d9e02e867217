//! Property and scenario tests for the timer state machine.

use proptest::prelude::*;
use tomatick_core::{Event, Phase, TimerEngine, TimerSettings};

fn phase_strategy() -> impl Strategy<Value = Phase> {
    prop_oneof![Just(Phase::Work), Just(Phase::ShortBreak), Just(Phase::LongBreak)]
}

fn settings_strategy() -> impl Strategy<Value = TimerSettings> {
    (1u32..=60, 1u32..=60, 1u32..=60).prop_map(|(pomodoro_min, short_break_min, long_break_min)| {
        TimerSettings {
            pomodoro_min,
            short_break_min,
            long_break_min,
            long_break_interval: 4,
        }
    })
}

#[derive(Debug, Clone)]
enum Op {
    Start,
    Pause,
    Reset,
    Switch(Phase),
    Tick,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        1 => Just(Op::Start),
        1 => Just(Op::Pause),
        1 => Just(Op::Reset),
        1 => phase_strategy().prop_map(Op::Switch),
        6 => Just(Op::Tick),
    ]
}

/// Run the current phase to expiry and return the completion event.
fn finish_phase(engine: &mut TimerEngine) -> Event {
    engine.start();
    loop {
        if let Some(event) = engine.tick() {
            return event;
        }
    }
}

fn next_phase(event: &Event) -> Phase {
    match event {
        Event::PhaseCompleted { next, .. } => *next,
        other => panic!("Expected PhaseCompleted, got {other:?}"),
    }
}

proptest! {
    #[test]
    fn switch_mode_loads_configured_duration(
        settings in settings_strategy(),
        phase in phase_strategy(),
        ticks in 0usize..200,
    ) {
        let mut engine = TimerEngine::new(settings);
        engine.start();
        for _ in 0..ticks {
            engine.tick();
        }
        engine.switch_mode(phase);
        prop_assert_eq!(engine.remaining_secs(), u64::from(settings.duration_min(phase)) * 60);
        prop_assert!(!engine.is_running());
        prop_assert_eq!(engine.completed_work_sessions(), 0);
    }

    #[test]
    fn tick_while_stopped_changes_nothing(settings in settings_strategy(), phase in phase_strategy()) {
        let mut engine = TimerEngine::new(settings);
        engine.switch_mode(phase);
        let before = engine.snapshot();
        prop_assert!(engine.tick().is_none());
        prop_assert_eq!(engine.snapshot(), before);
    }

    #[test]
    fn invariants_hold_for_any_op_sequence(
        settings in settings_strategy(),
        ops in prop::collection::vec(op_strategy(), 0..400),
    ) {
        let mut engine = TimerEngine::new(settings);
        for op in ops {
            let sessions_before = engine.completed_work_sessions();
            let phase_before = engine.phase();
            let expired = match op {
                Op::Start => { engine.start(); false }
                Op::Pause => { engine.pause(); false }
                Op::Reset => {
                    engine.reset();
                    prop_assert_eq!(engine.phase(), phase_before);
                    prop_assert_eq!(engine.remaining_secs(), settings.duration_secs(phase_before));
                    false
                }
                Op::Switch(p) => { engine.switch_mode(p); false }
                Op::Tick => engine.tick().is_some(),
            };
            if engine.remaining_secs() == 0 {
                prop_assert!(!engine.is_running());
            }
            if expired {
                prop_assert!(!engine.is_running());
                prop_assert_eq!(engine.remaining_secs(), settings.duration_secs(engine.phase()));
            } else {
                prop_assert_eq!(engine.completed_work_sessions(), sessions_before);
            }
        }
    }

    #[test]
    fn kth_work_completion_picks_break_by_modulo(n in 1u32..=16) {
        let mut engine = TimerEngine::new(TimerSettings { pomodoro_min: 1, short_break_min: 1, long_break_min: 1, long_break_interval: 4 });
        for k in 1..=n {
            let next = next_phase(&finish_phase(&mut engine));
            let expected = if k % 4 == 0 { Phase::LongBreak } else { Phase::ShortBreak };
            prop_assert_eq!(next, expected);
            prop_assert_eq!(engine.completed_work_sessions(), k);
            // Break back to work.
            prop_assert_eq!(next_phase(&finish_phase(&mut engine)), Phase::Work);
        }
        prop_assert_eq!(engine.completed_work_sessions(), n);
    }

    #[test]
    fn finished_break_always_returns_to_work(
        settings in settings_strategy(),
        phase in prop_oneof![Just(Phase::ShortBreak), Just(Phase::LongBreak)],
        sessions in 0u32..10,
    ) {
        let mut engine = TimerEngine::new(settings);
        for _ in 0..sessions {
            finish_phase(&mut engine);
            engine.switch_mode(Phase::Work);
        }
        engine.switch_mode(phase);
        let event = finish_phase(&mut engine);
        prop_assert_eq!(next_phase(&event), Phase::Work);
        prop_assert_eq!(engine.remaining_secs(), settings.duration_secs(Phase::Work));
        prop_assert_eq!(engine.completed_work_sessions(), sessions);
    }
}

#[test]
fn first_pomodoro_ends_in_short_break() {
    let mut engine = TimerEngine::default();
    engine.start();
    let mut expiry = None;
    for _ in 0..1500 {
        if let Some(event) = engine.tick() {
            assert!(expiry.is_none(), "expiry fired twice");
            expiry = Some(event);
        }
    }
    let event = expiry.expect("work phase should expire after 1500 ticks");
    assert_eq!(next_phase(&event), Phase::ShortBreak);
    assert_eq!(engine.phase(), Phase::ShortBreak);
    assert_eq!(engine.remaining_secs(), 300);
    assert_eq!(engine.snapshot().display, "05:00");
    assert_eq!(engine.completed_work_sessions(), 1);
    assert!(!engine.is_running());
}

#[test]
fn fourth_pomodoro_ends_in_long_break() {
    let mut engine = TimerEngine::default();
    let mut nexts = Vec::new();
    while engine.completed_work_sessions() < 4 {
        let event = finish_phase(&mut engine);
        if let Event::PhaseCompleted { completed: Phase::Work, next, .. } = event {
            nexts.push(next);
        }
    }
    assert_eq!(
        nexts,
        vec![Phase::ShortBreak, Phase::ShortBreak, Phase::ShortBreak, Phase::LongBreak]
    );
    assert_eq!(engine.phase(), Phase::LongBreak);
    assert_eq!(engine.remaining_secs(), 15 * 60);
}

#[test]
fn manual_long_break_mid_pomodoro_does_not_count() {
    let mut engine = TimerEngine::default();
    engine.start();
    for _ in 0..900 {
        engine.tick();
    }
    assert_eq!(engine.remaining_secs(), 600);
    engine.switch_mode(Phase::LongBreak);
    assert_eq!(engine.completed_work_sessions(), 0);
    assert_eq!(engine.remaining_secs(), 900);
    assert_eq!(engine.phase(), Phase::LongBreak);
}
