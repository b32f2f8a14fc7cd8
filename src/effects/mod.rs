//! Short-lived overlays: floating combat text and the notification banner.

use bracket_random::prelude::RandomNumberGenerator;
use serde::Serialize;
use smallvec::SmallVec;
use tracing::trace;

use crate::timeline::Millis;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Tone {
    White,
    Red,
    Gold,
    Green,
    Accent,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EffectId(pub u64);

/// What to show; placement is in percent of the view.
#[derive(Clone, Debug, PartialEq)]
pub struct Spawn {
    pub text: String,
    pub tone: Tone,
    pub x: f32,
    pub y: f32,
    pub scale: f32,
}

impl Spawn {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: Tone::White,
            x: 50.0,
            y: 30.0,
            scale: 1.0,
        }
    }

    pub fn tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }

    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FloatingText {
    pub id: EffectId,
    pub text: String,
    pub tone: Tone,
    pub anchor_x: f32,
    pub anchor_y: f32,
    pub scale: f32,
    pub tilt_deg: f32,
    pub spawned_at: Millis,
    pub expires_at: Millis,
}

impl FloatingText {
    /// 0.0 when spawned, 1.0 at expiry.
    pub fn progress(&self, now: Millis) -> f32 {
        let span = self.expires_at.saturating_sub(self.spawned_at).max(1);
        (now.saturating_sub(self.spawned_at) as f32 / span as f32).clamp(0.0, 1.0)
    }

    pub fn is_expired(&self, now: Millis) -> bool {
        now >= self.expires_at
    }
}

pub struct EffectBoard {
    lifetime: Millis,
    next_id: u64,
    entries: Vec<FloatingText>,
    rng: RandomNumberGenerator,
}

impl EffectBoard {
    pub fn new(lifetime: Millis, seed: u64) -> Self {
        Self {
            lifetime: lifetime.max(1),
            next_id: 1,
            entries: Vec::new(),
            rng: RandomNumberGenerator::seeded(seed),
        }
    }

    pub fn spawn(&mut self, now: Millis, spawn: Spawn) -> EffectId {
        let id = EffectId(self.next_id);
        self.next_id += 1;
        let tilt_deg = self.rng.range(-10.0f32, 10.0);
        trace!(id = id.0, text = %spawn.text, now, "floating text");
        self.entries.push(FloatingText {
            id,
            text: spawn.text,
            tone: spawn.tone,
            anchor_x: spawn.x,
            anchor_y: spawn.y,
            scale: spawn.scale,
            tilt_deg,
            spawned_at: now,
            expires_at: now.saturating_add(self.lifetime),
        });
        id
    }

    /// Removes entries whose lifetime has fully elapsed.
    pub fn expire(&mut self, now: Millis) -> SmallVec<[EffectId; 4]> {
        let mut expired = SmallVec::new();
        self.entries.retain(|entry| {
            if entry.is_expired(now) {
                expired.push(entry.id);
                false
            } else {
                true
            }
        });
        expired
    }

    pub fn active(&self) -> &[FloatingText] {
        &self.entries
    }

    pub fn contains(&self, id: EffectId) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    pub fn texts(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.text.as_str()).collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn lifetime(&self) -> Millis {
        self.lifetime
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BannerMessage {
    pub text: String,
    pub shown_at: Millis,
    pub hide_at: Millis,
}

/// Single-slot notification; a new message replaces the old one outright.
#[derive(Clone, Debug)]
pub struct Banner {
    lifetime: Millis,
    current: Option<BannerMessage>,
}

impl Banner {
    pub fn new(lifetime: Millis) -> Self {
        Self {
            lifetime: lifetime.max(1),
            current: None,
        }
    }

    pub fn show(&mut self, now: Millis, text: impl Into<String>) {
        self.current = Some(BannerMessage {
            text: text.into(),
            shown_at: now,
            hide_at: now.saturating_add(self.lifetime),
        });
    }

    pub fn expire(&mut self, now: Millis) -> bool {
        match &self.current {
            Some(message) if now >= message.hide_at => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    pub fn message(&self) -> Option<&BannerMessage> {
        self.current.as_ref()
    }

    pub fn text(&self) -> Option<&str> {
        self.current.as_ref().map(|message| message.text.as_str())
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}
