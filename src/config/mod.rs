//! Tuning knobs for every screen. All fields default to the values the screens
//! were designed around; a JSON file only needs to name what it overrides.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{reveal::RevealTiming, timeline::Millis};

/// One day; longer timers are almost certainly a typo.
const MAX_DURATION_MS: Millis = 86_400_000;
/// Upper bound for points, coins, hit points and dice faces.
const MAX_AMOUNT: u32 = 1_000_000;
const MAX_GRID_SIDE: i32 = 64;
const MAX_PARTICLES: usize = 10_000;
const MAX_ENERGY: i32 = 1_000;
const MAX_PLOTS: usize = 64;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read tuning file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse tuning file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("malformed tuning json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Invalid(String),
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub reveal: RevealTiming,
    pub effects: EffectTuning,
    pub grid: GridTuning,
    pub combat: CombatTuning,
    pub garden: GardenTuning,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectTuning {
    pub floating_text_ms: Millis,
    pub banner_ms: Millis,
}

impl Default for EffectTuning {
    fn default() -> Self {
        Self {
            floating_text_ms: 800,
            banner_ms: 3000,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridTuning {
    pub columns: i32,
    pub rows: i32,
    pub gem_chance: f32,
    pub cell_points: u32,
    pub primary_points: u32,
    pub primary_coins: u32,
    pub points_per_level: u32,
    pub flash_ms: Millis,
    pub bounce_ms: Millis,
    pub pop_ms: Millis,
    pub welcome_ms: Millis,
    pub coin_drip_every_ms: Millis,
    pub coin_drip_max: u32,
    pub pulse_every_ms: Millis,
    pub pulse_ms: Millis,
    pub swipe_threshold: f32,
    pub burst_particles: usize,
    pub ring_particles: usize,
    pub ring_radius: f32,
    pub frame_step_ms: Millis,
}

impl Default for GridTuning {
    fn default() -> Self {
        Self {
            columns: 8,
            rows: 12,
            gem_chance: 0.3,
            cell_points: 10,
            primary_points: 50,
            primary_coins: 5,
            points_per_level: 500,
            flash_ms: 300,
            bounce_ms: 1000,
            pop_ms: 300,
            welcome_ms: 2000,
            coin_drip_every_ms: 10_000,
            coin_drip_max: 2,
            pulse_every_ms: 5000,
            pulse_ms: 2000,
            swipe_threshold: 100.0,
            burst_particles: 10,
            ring_particles: 30,
            ring_radius: 50.0,
            frame_step_ms: 16,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatTuning {
    pub start_hp: i32,
    pub start_gold: i32,
    pub max_energy: i32,
    pub enemy_hp: i32,
    pub enemy_hp_per_level: i32,
    pub min_damage: i32,
    pub max_damage: i32,
    pub crit_chance: f32,
    pub shake_ms: Millis,
    pub hit_delay_ms: Millis,
    pub respawn_ms: Millis,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            start_hp: 85,
            start_gold: 120,
            max_energy: 3,
            enemy_hp: 50,
            enemy_hp_per_level: 10,
            min_damage: 4,
            max_damage: 11,
            crit_chance: 0.3,
            shake_ms: 200,
            hit_delay_ms: 300,
            respawn_ms: 1500,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GardenTuning {
    pub tick_ms: Millis,
    pub start_coins: u32,
    pub plots: usize,
    pub growth_per_tick: u32,
    pub moisture_per_tick: i32,
    pub harvest_coins: u32,
}

impl Default for GardenTuning {
    fn default() -> Self {
        Self {
            tick_ms: 1000,
            start_coins: 40,
            plots: 6,
            growth_per_tick: 5,
            moisture_per_tick: 10,
            harvest_coins: 12,
        }
    }
}

impl Tuning {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let tuning: Tuning = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(raw)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Rejects values that would stall a timer loop, make a random range empty,
    /// or push the screens' counters past what their integer types hold.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let periods = [
            ("reveal.increment_ms", self.reveal.increment_ms),
            ("effects.floating_text_ms", self.effects.floating_text_ms),
            ("effects.banner_ms", self.effects.banner_ms),
            ("grid.coin_drip_every_ms", self.grid.coin_drip_every_ms),
            ("grid.pulse_every_ms", self.grid.pulse_every_ms),
            ("grid.frame_step_ms", self.grid.frame_step_ms),
            ("garden.tick_ms", self.garden.tick_ms),
        ];
        if let Some((name, _)) = periods.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::Invalid(format!("{name} must be positive")));
        }

        let durations = [
            ("reveal.start_delay_ms", self.reveal.start_delay_ms),
            ("reveal.increment_ms", self.reveal.increment_ms),
            ("reveal.ceiling_ms", self.reveal.ceiling_ms),
            ("reveal.cooldown_ms", self.reveal.cooldown_ms),
            ("effects.floating_text_ms", self.effects.floating_text_ms),
            ("effects.banner_ms", self.effects.banner_ms),
            ("grid.flash_ms", self.grid.flash_ms),
            ("grid.bounce_ms", self.grid.bounce_ms),
            ("grid.pop_ms", self.grid.pop_ms),
            ("grid.welcome_ms", self.grid.welcome_ms),
            ("grid.coin_drip_every_ms", self.grid.coin_drip_every_ms),
            ("grid.pulse_every_ms", self.grid.pulse_every_ms),
            ("grid.pulse_ms", self.grid.pulse_ms),
            ("grid.frame_step_ms", self.grid.frame_step_ms),
            ("combat.shake_ms", self.combat.shake_ms),
            ("combat.hit_delay_ms", self.combat.hit_delay_ms),
            ("combat.respawn_ms", self.combat.respawn_ms),
            ("garden.tick_ms", self.garden.tick_ms),
        ];
        if let Some((name, _)) = durations.iter().find(|(_, value)| *value > MAX_DURATION_MS) {
            return Err(ConfigError::Invalid(format!(
                "{name} must not exceed {MAX_DURATION_MS} ms"
            )));
        }

        let signed = [
            ("reveal.min_value", self.reveal.min_value),
            ("reveal.max_value", self.reveal.max_value),
        ];
        if let Some((name, _)) = signed.iter().find(|(_, value)| value.unsigned_abs() > MAX_AMOUNT)
        {
            return Err(ConfigError::Invalid(format!(
                "{name} must lie within -{MAX_AMOUNT}..={MAX_AMOUNT}"
            )));
        }

        let amounts = [
            ("combat.start_hp", self.combat.start_hp),
            ("combat.start_gold", self.combat.start_gold),
            ("combat.enemy_hp", self.combat.enemy_hp),
            ("combat.enemy_hp_per_level", self.combat.enemy_hp_per_level),
            ("combat.min_damage", self.combat.min_damage),
            ("combat.max_damage", self.combat.max_damage),
        ];
        let counts = [
            ("grid.cell_points", self.grid.cell_points),
            ("grid.primary_points", self.grid.primary_points),
            ("grid.primary_coins", self.grid.primary_coins),
            ("grid.points_per_level", self.grid.points_per_level),
            ("grid.coin_drip_max", self.grid.coin_drip_max),
            ("garden.start_coins", self.garden.start_coins),
            ("garden.harvest_coins", self.garden.harvest_coins),
        ];
        let out_of_range = amounts
            .iter()
            .find(|(_, value)| !(0..=MAX_AMOUNT as i32).contains(value))
            .map(|(name, _)| *name)
            .or_else(|| {
                counts
                    .iter()
                    .find(|(_, value)| *value > MAX_AMOUNT)
                    .map(|(name, _)| *name)
            });
        if let Some(name) = out_of_range {
            return Err(ConfigError::Invalid(format!(
                "{name} must lie within 0..={MAX_AMOUNT}"
            )));
        }

        if self.reveal.min_value > self.reveal.max_value {
            return Err(ConfigError::Invalid(
                "reveal.min_value exceeds reveal.max_value".to_string(),
            ));
        }
        if self.combat.min_damage > self.combat.max_damage {
            return Err(ConfigError::Invalid(
                "combat.min_damage exceeds combat.max_damage".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.combat.crit_chance)
            || !(0.0..=1.0).contains(&self.grid.gem_chance)
        {
            return Err(ConfigError::Invalid(
                "chances must lie within 0.0..=1.0".to_string(),
            ));
        }
        if !(1..=MAX_GRID_SIDE).contains(&self.grid.columns)
            || !(1..=MAX_GRID_SIDE).contains(&self.grid.rows)
        {
            return Err(ConfigError::Invalid(format!(
                "grid sides must lie within 1..={MAX_GRID_SIDE}"
            )));
        }
        if self.grid.burst_particles > MAX_PARTICLES || self.grid.ring_particles > MAX_PARTICLES {
            return Err(ConfigError::Invalid(format!(
                "particle counts must not exceed {MAX_PARTICLES}"
            )));
        }
        if !(1..=MAX_ENERGY).contains(&self.combat.max_energy) {
            return Err(ConfigError::Invalid(format!(
                "combat.max_energy must lie within 1..={MAX_ENERGY}"
            )));
        }
        if !(1..=MAX_PLOTS).contains(&self.garden.plots) {
            return Err(ConfigError::Invalid(format!(
                "garden.plots must lie within 1..={MAX_PLOTS}"
            )));
        }
        if self.garden.growth_per_tick > 100 || !(0..=100).contains(&self.garden.moisture_per_tick) {
            return Err(ConfigError::Invalid(
                "garden growth and moisture per tick must lie within 0..=100".to_string(),
            ));
        }
        Ok(())
    }
}
