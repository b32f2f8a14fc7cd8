//! Simulated-time timers.
//!
//! Every view (and the reveal sequencer) owns one [`Timeline`] and is driven by
//! advancing a clock. Nothing here sleeps or reads the wall clock, so a whole
//! sequence can be replayed in a test by jumping time forward.

use std::collections::BTreeMap;

/// Simulated milliseconds since the owning shell was created.
pub type Millis = u64;

/// Fire-and-forget timers ordered by deadline, then by scheduling order.
#[derive(Clone, Debug)]
pub struct Timeline<E> {
    queue: BTreeMap<(Millis, u64), E>,
    next_seq: u64,
}

impl<E> Default for Timeline<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Timeline<E> {
    pub const fn new() -> Self {
        Self {
            queue: BTreeMap::new(),
            next_seq: 0,
        }
    }

    pub fn schedule_at(&mut self, at: Millis, event: E) {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.queue.insert((at, seq), event);
    }

    pub fn schedule(&mut self, now: Millis, delay: Millis, event: E) {
        self.schedule_at(now.saturating_add(delay), event);
    }

    pub fn next_deadline(&self) -> Option<Millis> {
        self.queue.first_key_value().map(|((at, _), _)| *at)
    }

    /// Pops the earliest timer whose deadline is at or before `now`.
    pub fn pop_due(&mut self, now: Millis) -> Option<(Millis, E)> {
        match self.next_deadline() {
            Some(at) if at <= now => self.queue.pop_first().map(|((at, _), event)| (at, event)),
            _ => None,
        }
    }

    /// Drops every pending timer, returning how many were cleared.
    pub fn clear(&mut self) -> usize {
        let pending = self.queue.len();
        self.queue.clear();
        pending
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Converts elapsed simulated time into a whole number of fixed-length frames.
#[derive(Clone, Copy, Debug)]
pub struct FixedStep {
    step: Millis,
    consumed_until: Millis,
}

impl FixedStep {
    pub fn new(step: Millis, start: Millis) -> Self {
        Self {
            step: step.max(1),
            consumed_until: start,
        }
    }

    pub fn frames_until(&mut self, now: Millis) -> u32 {
        if now <= self.consumed_until {
            return 0;
        }
        let frames = (now - self.consumed_until) / self.step;
        self.consumed_until += frames * self.step;
        frames.min(u32::MAX as u64) as u32
    }

    pub fn step(&self) -> Millis {
        self.step
    }
}
