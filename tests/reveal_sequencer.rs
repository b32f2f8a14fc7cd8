use gamescreens::{
    RevealSequencer, RevealTiming,
    reveal::{RevealEvent, RevealPhase},
};

fn run_to_unlock(seq: &mut RevealSequencer, start: u64) -> Vec<RevealEvent> {
    let mut events = Vec::new();
    for at in (start..=start + 8_000).step_by(10) {
        events.extend(seq.advance(at));
    }
    events
}

#[test]
fn trigger_while_locked_changes_nothing() {
    let mut seq = RevealSequencer::new(RevealTiming::default(), 11);
    assert!(seq.trigger(0));
    seq.advance(500);
    let before = seq.state();
    let deadline = seq.next_deadline();
    assert!(!seq.trigger(500));
    assert_eq!(seq.state(), before);
    assert_eq!(seq.next_deadline(), deadline);

    // Still locked during the cool-down.
    seq.advance(7_000);
    let settled = seq.state();
    assert!(settled.is_locked && !settled.is_running);
    assert!(!seq.trigger(7_000));
    assert_eq!(seq.state(), settled);
}

#[test]
fn nineteen_flickers_then_one_settle() {
    let mut seq = RevealSequencer::new(RevealTiming::default(), 3);
    seq.trigger(0);
    let events = run_to_unlock(&mut seq, 0);

    let flickers: Vec<u32> = events
        .iter()
        .filter_map(|e| match e {
            RevealEvent::Flicker { tick, .. } => Some(*tick),
            _ => None,
        })
        .collect();
    assert_eq!(flickers, (1..=19).collect::<Vec<_>>());

    let settles: Vec<&RevealEvent> = events
        .iter()
        .filter(|e| matches!(e, RevealEvent::Settled { .. }))
        .collect();
    assert_eq!(settles.len(), 1);
    assert!(matches!(settles[0], RevealEvent::Settled { tick: 20, .. }));
    assert_eq!(events.last(), Some(&RevealEvent::Unlocked));
}

#[test]
fn settled_value_is_shown_and_in_range() {
    for seed in 0..20 {
        let mut seq = RevealSequencer::new(RevealTiming::default(), seed);
        seq.trigger(0);
        seq.advance(6_700);
        let state = seq.state();
        let value = state.final_value.expect("settled");
        assert_eq!(state.current_value, Some(value));
        assert!((1..=99).contains(&value), "seed {seed} settled on {value}");
    }
}

#[test]
fn run_timeline_matches_the_schedule() {
    let mut seq = RevealSequencer::new(RevealTiming::default(), 8);
    assert!(seq.trigger(0));
    assert!(seq.state().is_running);
    assert!(seq.state().is_locked);
    assert_eq!(seq.state().current_value, None);

    seq.advance(49);
    assert_eq!(seq.state().current_value, None);
    seq.advance(50);
    assert!(seq.state().current_value.is_some());

    seq.advance(6_699);
    assert!(seq.state().is_running);
    assert_eq!(seq.state().final_value, None);
    seq.advance(6_700);
    assert!(!seq.state().is_running);
    assert!(seq.state().is_locked);

    seq.advance(7_699);
    assert!(seq.state().is_locked);
    seq.advance(7_700);
    assert!(!seq.state().is_locked);
    assert_eq!(seq.phase(), RevealPhase::Idle);
}

#[test]
fn unlock_accepts_a_fresh_run() {
    let mut seq = RevealSequencer::new(RevealTiming::default(), 21);
    seq.trigger(1_000);
    seq.advance(8_700);
    let first = seq.state();
    assert!(!first.is_locked);
    // The last result stays visible until the next run starts.
    assert!(first.final_value.is_some());

    assert!(seq.trigger(9_000));
    let second = seq.state();
    assert!(second.is_locked && second.is_running);
    assert_eq!(second.final_value, None);
    seq.advance(9_000 + 6_700);
    assert!(seq.state().final_value.is_some());
}

#[test]
fn cooldown_is_configurable() {
    let timing = RevealTiming {
        cooldown_ms: 250,
        ..RevealTiming::default()
    };
    let mut seq = RevealSequencer::new(timing, 5);
    seq.trigger(0);
    seq.advance(6_949);
    assert!(seq.state().is_locked);
    seq.advance(6_950);
    assert!(!seq.state().is_locked);
}

#[test]
fn same_seed_same_values() {
    let mut a = RevealSequencer::new(RevealTiming::default(), 77);
    let mut b = RevealSequencer::new(RevealTiming::default(), 77);
    a.trigger(0);
    b.trigger(0);
    assert_eq!(run_to_unlock(&mut a, 0), run_to_unlock(&mut b, 0));
}
