//! Dice-style reveal: a random value that flickers with a decelerating cadence,
//! then locks onto a final value and stays locked through a cool-down.

use bracket_random::prelude::RandomNumberGenerator;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::timeline::{Millis, Timeline};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealTiming {
    pub start_delay_ms: Millis,
    pub increment_ms: Millis,
    pub ceiling_ms: Millis,
    pub cooldown_ms: Millis,
    pub min_value: i32,
    pub max_value: i32,
}

impl Default for RevealTiming {
    fn default() -> Self {
        Self {
            start_delay_ms: 50,
            increment_ms: 30,
            ceiling_ms: 600,
            cooldown_ms: 1000,
            min_value: 1,
            max_value: 99,
        }
    }
}

impl RevealTiming {
    /// Delay preceding every tick of one run, settling tick last.
    pub fn delays(&self) -> Vec<Millis> {
        let increment = self.increment_ms.max(1);
        let mut delays = Vec::new();
        let mut delay = self.start_delay_ms;
        while delay < self.ceiling_ms {
            delays.push(delay);
            delay = delay.saturating_add(increment);
        }
        delays.push(delay);
        delays
    }

    pub fn intermediate_ticks(&self) -> usize {
        self.delays().len() - 1
    }

    /// Time from trigger to the settling tick.
    pub fn total_duration(&self) -> Millis {
        self.delays().iter().sum()
    }

    /// Time from trigger until `trigger` is accepted again.
    pub fn lock_duration(&self) -> Millis {
        self.total_duration() + self.cooldown_ms
    }

    fn value_bounds(&self) -> (i32, i32) {
        (
            self.min_value.min(self.max_value),
            self.min_value.max(self.max_value),
        )
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SequenceState {
    pub is_locked: bool,
    pub is_running: bool,
    pub current_value: Option<i32>,
    pub final_value: Option<i32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum RevealPhase {
    Idle,
    Running { tick: u32 },
    /// Settled on `final_value`; still locked until the cool-down ends.
    CoolingDown { final_value: i32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealEvent {
    Flicker { tick: u32, value: i32 },
    Settled { tick: u32, value: i32 },
    Unlocked,
}

#[derive(Clone, Copy, Debug)]
enum Step {
    Tick { index: u32, delay: Millis },
    Unlock,
}

pub struct RevealSequencer {
    timing: RevealTiming,
    rng: RandomNumberGenerator,
    timeline: Timeline<Step>,
    phase: RevealPhase,
    state: SequenceState,
    disposed: bool,
}

impl RevealSequencer {
    pub fn new(timing: RevealTiming, seed: u64) -> Self {
        Self {
            timing,
            rng: RandomNumberGenerator::seeded(seed),
            timeline: Timeline::new(),
            phase: RevealPhase::Idle,
            state: SequenceState::default(),
            disposed: false,
        }
    }

    /// Starts a run. Ignored while a previous run is still locked.
    pub fn trigger(&mut self, now: Millis) -> bool {
        if self.state.is_locked || self.disposed {
            trace!(now, "reveal trigger ignored");
            return false;
        }
        self.state.is_locked = true;
        self.state.is_running = true;
        self.state.final_value = None;
        self.phase = RevealPhase::Running { tick: 0 };
        let delay = self.timing.start_delay_ms;
        self.timeline
            .schedule(now, delay, Step::Tick { index: 1, delay });
        debug!(now, "reveal started");
        true
    }

    /// Runs every step due at or before `now`.
    pub fn advance(&mut self, now: Millis) -> Vec<RevealEvent> {
        let mut events = Vec::new();
        while let Some((at, step)) = self.timeline.pop_due(now) {
            match step {
                Step::Tick { index, delay } if delay < self.timing.ceiling_ms => {
                    let value = self.draw();
                    self.state.current_value = Some(value);
                    self.phase = RevealPhase::Running { tick: index };
                    let next = delay.saturating_add(self.timing.increment_ms.max(1));
                    self.timeline.schedule(
                        at,
                        next,
                        Step::Tick {
                            index: index + 1,
                            delay: next,
                        },
                    );
                    trace!(at, tick = index, value, "reveal flicker");
                    events.push(RevealEvent::Flicker { tick: index, value });
                }
                Step::Tick { index, .. } => {
                    let value = self.draw();
                    self.state.current_value = Some(value);
                    self.state.final_value = Some(value);
                    self.state.is_running = false;
                    self.phase = RevealPhase::CoolingDown { final_value: value };
                    self.timeline
                        .schedule(at, self.timing.cooldown_ms, Step::Unlock);
                    info!(at, tick = index, value, "reveal settled");
                    events.push(RevealEvent::Settled { tick: index, value });
                }
                Step::Unlock => {
                    self.state.is_locked = false;
                    self.phase = RevealPhase::Idle;
                    debug!(at, "reveal unlocked");
                    events.push(RevealEvent::Unlocked);
                }
            }
        }
        events
    }

    /// Drops pending ticks; the sequencer never mutates again.
    pub fn teardown(&mut self) {
        self.timeline.clear();
        self.disposed = true;
    }

    pub fn state(&self) -> SequenceState {
        self.state
    }

    pub fn phase(&self) -> RevealPhase {
        self.phase
    }

    pub fn timing(&self) -> &RevealTiming {
        &self.timing
    }

    pub fn next_deadline(&self) -> Option<Millis> {
        self.timeline.next_deadline()
    }

    fn draw(&mut self) -> i32 {
        let (lo, hi) = self.timing.value_bounds();
        self.rng.range(lo, hi.saturating_add(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_schedule_matches_known_arithmetic() {
        let timing = RevealTiming::default();
        let delays = timing.delays();
        assert_eq!(delays.len(), 20);
        assert_eq!(delays.first(), Some(&50));
        assert_eq!(delays[18], 590);
        assert_eq!(delays.last(), Some(&620));
        assert_eq!(timing.intermediate_ticks(), 19);
        assert_eq!(timing.total_duration(), 6700);
        assert_eq!(timing.lock_duration(), 7700);
    }

    #[test]
    fn start_at_or_above_ceiling_settles_on_first_tick() {
        let timing = RevealTiming {
            start_delay_ms: 700,
            ..RevealTiming::default()
        };
        assert_eq!(timing.delays(), vec![700]);
        assert_eq!(timing.intermediate_ticks(), 0);
    }

    #[test]
    fn phases_follow_the_run() {
        let mut seq = RevealSequencer::new(RevealTiming::default(), 7);
        assert_eq!(seq.phase(), RevealPhase::Idle);
        assert!(seq.trigger(0));
        assert_eq!(seq.phase(), RevealPhase::Running { tick: 0 });
        seq.advance(50);
        assert_eq!(seq.phase(), RevealPhase::Running { tick: 1 });
        seq.advance(6700);
        let settled = seq.state().final_value.expect("settled");
        assert_eq!(
            seq.phase(),
            RevealPhase::CoolingDown {
                final_value: settled
            }
        );
        seq.advance(7700);
        assert_eq!(seq.phase(), RevealPhase::Idle);
    }

    #[test]
    fn teardown_stops_everything() {
        let mut seq = RevealSequencer::new(RevealTiming::default(), 1);
        seq.trigger(0);
        seq.advance(100);
        let before = seq.state();
        seq.teardown();
        assert!(seq.advance(100_000).is_empty());
        assert_eq!(seq.state(), before);
        assert!(!seq.trigger(200_000));
    }

    #[test]
    fn widest_value_range_settles_without_overflow() {
        let timing = RevealTiming {
            min_value: i32::MAX - 3,
            max_value: i32::MAX,
            ..RevealTiming::default()
        };
        let mut seq = RevealSequencer::new(timing, 9);
        seq.trigger(0);
        seq.advance(6700);
        let value = seq.state().final_value.expect("settled");
        assert!(value >= i32::MAX - 3);
    }
}
