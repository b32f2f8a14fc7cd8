use bracket_geometry::prelude::Point;
use bracket_random::prelude::RandomNumberGenerator;
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    config::{GridTuning, Tuning},
    data::{ACHIEVEMENTS, Achievement},
    effects::{Banner, Tone},
    particles::ParticleField,
    timeline::{FixedStep, Millis, Timeline},
};

use super::Key;

/// Side length of one cell in particle-field units.
pub const CELL_PX: f32 = 48.0;
const KEY_SWIPE: f32 = 150.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct GridStats {
    pub score: u32,
    pub level: u32,
    pub coins: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridCell {
    pub index: usize,
    pub point: Point,
    pub has_gem: bool,
    pub flash_until: Millis,
    pub bounce_until: Millis,
}

impl GridCell {
    pub fn is_flashing(&self, now: Millis) -> bool {
        now < self.flash_until
    }

    pub fn is_bouncing(&self, now: Millis) -> bool {
        now < self.bounce_until
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Panels {
    pub settings: bool,
    pub inventory: bool,
    pub achievements: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum GridTimer {
    Welcome,
    CoinDrip,
    Pulse,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GridSnapshot {
    pub stats: GridStats,
    pub panels: Panels,
    pub banner: Option<String>,
    pub particles: usize,
    pub pulsing: bool,
    pub gems: usize,
}

/// The tap-the-cells demo: stat bar, slide panels, sparks and a banner.
pub struct GridView {
    tuning: GridTuning,
    now: Millis,
    stats: GridStats,
    cells: Vec<GridCell>,
    panels: Panels,
    primary_pop_until: Millis,
    pulse_until: Millis,
    particles: ParticleField,
    frames: FixedStep,
    banner: Banner,
    timeline: Timeline<GridTimer>,
    rng: RandomNumberGenerator,
    disposed: bool,
}

impl GridView {
    pub fn mount(tuning: &Tuning, seed: u64, now: Millis) -> Self {
        let grid = tuning.grid.clone();
        let mut rng = RandomNumberGenerator::seeded(seed);
        let cells = (0..(grid.columns * grid.rows))
            .map(|i| GridCell {
                index: i as usize,
                point: Point::new(i % grid.columns, i / grid.columns),
                has_gem: rng.range(0.0f32, 1.0) < grid.gem_chance,
                flash_until: 0,
                bounce_until: 0,
            })
            .collect();

        let mut timeline = Timeline::new();
        timeline.schedule(now, grid.welcome_ms, GridTimer::Welcome);
        timeline.schedule(now, grid.coin_drip_every_ms, GridTimer::CoinDrip);
        timeline.schedule(now, grid.pulse_every_ms, GridTimer::Pulse);

        Self {
            frames: FixedStep::new(grid.frame_step_ms, now),
            particles: ParticleField::new(seed.wrapping_add(1)),
            banner: Banner::new(tuning.effects.banner_ms),
            tuning: grid,
            now,
            stats: GridStats {
                score: 0,
                level: 1,
                coins: 100,
            },
            cells,
            panels: Panels::default(),
            primary_pop_until: 0,
            pulse_until: 0,
            timeline,
            rng,
            disposed: false,
        }
    }

    pub fn advance(&mut self, now: Millis) {
        if self.disposed {
            return;
        }
        while let Some((at, timer)) = self.timeline.pop_due(now) {
            self.now = at;
            self.fire(timer);
        }
        self.now = now.max(self.now);
        let frames = self.frames.frames_until(self.now);
        self.particles.step(frames);
        self.banner.expire(self.now);
    }

    fn fire(&mut self, timer: GridTimer) {
        let at = self.now;
        match timer {
            GridTimer::Welcome => {
                self.banner
                    .show(at, "Welcome to Game UI Foundation! Tap cells to interact.");
            }
            GridTimer::CoinDrip => {
                let top = i32::try_from(self.tuning.coin_drip_max.saturating_add(1)).unwrap_or(i32::MAX);
                let drip = self.rng.range(0, top) as u32;
                self.stats.coins = self.stats.coins.saturating_add(drip);
                debug!(at, drip, coins = self.stats.coins, "coin drip");
                self.timeline
                    .schedule(at, self.tuning.coin_drip_every_ms, GridTimer::CoinDrip);
            }
            GridTimer::Pulse => {
                self.pulse_until = at + self.tuning.pulse_ms;
                self.timeline
                    .schedule(at, self.tuning.pulse_every_ms, GridTimer::Pulse);
            }
        }
    }

    pub fn handle_key(&mut self, key: Key) {
        match key {
            Key::Escape => self.close_all(),
            Key::Char('i') => self.toggle_inventory(),
            Key::Char('a') => self.toggle_achievements(),
            Key::Char('s') => self.toggle_settings(),
            Key::Enter | Key::Space => self.primary_action(),
            Key::Left => self.swipe(-KEY_SWIPE, 0.0),
            Key::Right => self.swipe(KEY_SWIPE, 0.0),
            _ => {}
        }
    }

    /// Returns false for taps outside the grid.
    pub fn tap(&mut self, index: usize) -> bool {
        if self.disposed {
            return false;
        }
        let now = self.now;
        let Some(cell) = self.cells.get_mut(index) else {
            return false;
        };
        cell.flash_until = now + self.tuning.flash_ms;
        cell.bounce_until = now + self.tuning.bounce_ms;
        let (cx, cy) = cell_centre(cell.point);

        self.particles
            .burst(cx, cy, self.tuning.burst_particles, Tone::Accent);
        self.stats.score = self.stats.score.saturating_add(self.tuning.cell_points);
        self.refresh_level();
        self.banner.show(
            now,
            format!(
                "Cell {index} activated! +{} points",
                self.tuning.cell_points
            ),
        );
        info!(index, score = self.stats.score, "cell tapped");
        true
    }

    pub fn primary_action(&mut self) {
        if self.disposed {
            return;
        }
        let (cx, cy) = self.field_centre();
        self.particles.ring(
            cx,
            cy,
            self.tuning.ring_radius,
            self.tuning.ring_particles,
            Tone::Gold,
        );
        self.stats.score = self.stats.score.saturating_add(self.tuning.primary_points);
        self.stats.coins = self.stats.coins.saturating_add(self.tuning.primary_coins);
        self.refresh_level();
        self.primary_pop_until = self.now + self.tuning.pop_ms;
        self.banner.show(
            self.now,
            format!(
                "Primary action triggered! +{} points, +{} coins",
                self.tuning.primary_points, self.tuning.primary_coins
            ),
        );
        info!(score = self.stats.score, coins = self.stats.coins, "primary action");
    }

    pub fn toggle_settings(&mut self) {
        self.panels.settings = !self.panels.settings;
    }

    pub fn toggle_inventory(&mut self) {
        self.panels.inventory = !self.panels.inventory;
        self.panels.achievements = false;
    }

    pub fn toggle_achievements(&mut self) {
        self.panels.achievements = !self.panels.achievements;
        self.panels.inventory = false;
    }

    /// Closes the slide-out panels; settings is a separate sheet.
    pub fn close_all(&mut self) {
        self.panels.inventory = false;
        self.panels.achievements = false;
    }

    pub fn swipe(&mut self, dx: f32, _dy: f32) {
        if dx.abs() <= self.tuning.swipe_threshold {
            return;
        }
        if dx > 0.0 {
            self.toggle_inventory();
        } else {
            self.toggle_achievements();
        }
    }

    pub fn teardown(&mut self) {
        let cleared = self.timeline.clear();
        self.particles.clear();
        self.banner.clear();
        self.disposed = true;
        debug!(cleared, "grid view torn down");
    }

    fn refresh_level(&mut self) {
        self.stats.level = 1 + self.stats.score / self.tuning.points_per_level.max(1);
    }

    fn field_centre(&self) -> (f32, f32) {
        (
            self.tuning.columns as f32 * CELL_PX / 2.0,
            self.tuning.rows as f32 * CELL_PX / 2.0,
        )
    }

    pub fn stats(&self) -> GridStats {
        self.stats
    }

    pub fn panels(&self) -> Panels {
        self.panels
    }

    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    pub fn columns(&self) -> i32 {
        self.tuning.columns
    }

    pub fn banner(&self) -> &Banner {
        &self.banner
    }

    pub fn particles(&self) -> &ParticleField {
        &self.particles
    }

    pub fn now(&self) -> Millis {
        self.now
    }

    pub fn is_pulsing(&self) -> bool {
        self.now < self.pulse_until
    }

    pub fn is_primary_popping(&self) -> bool {
        self.now < self.primary_pop_until
    }

    pub fn pending_timers(&self) -> usize {
        self.timeline.len()
    }

    pub fn achievements(&self) -> Vec<(Achievement, bool)> {
        ACHIEVEMENTS
            .iter()
            .map(|a| {
                (
                    *a,
                    a.unlocked(self.stats.score, self.stats.coins, self.stats.level),
                )
            })
            .collect()
    }

    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            stats: self.stats,
            panels: self.panels,
            banner: self.banner.text().map(str::to_string),
            particles: self.particles.len(),
            pulsing: self.is_pulsing(),
            gems: self.cells.iter().filter(|c| c.has_gem).count(),
        }
    }
}

fn cell_centre(point: Point) -> (f32, f32) {
    (
        point.x as f32 * CELL_PX + CELL_PX / 2.0,
        point.y as f32 * CELL_PX + CELL_PX / 2.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> GridView {
        GridView::mount(&Tuning::default(), 42, 0)
    }

    #[test]
    fn mounts_ninety_six_cells() {
        let grid = view();
        assert_eq!(grid.cells().len(), 96);
        assert_eq!(grid.cells()[95].point, Point::new(7, 11));
        assert_eq!(
            grid.stats(),
            GridStats {
                score: 0,
                level: 1,
                coins: 100
            }
        );
    }

    #[test]
    fn tap_scores_flashes_and_sparks() {
        let mut grid = view();
        assert!(grid.tap(12));
        assert_eq!(grid.stats().score, 10);
        assert_eq!(grid.particles().len(), 10);
        assert_eq!(
            grid.banner().text(),
            Some("Cell 12 activated! +10 points")
        );
        let cell = &grid.cells()[12];
        assert!(cell.is_flashing(299));
        assert!(!cell.is_flashing(300));
        assert!(cell.is_bouncing(999));
        assert!(!cell.is_bouncing(1000));
        assert!(!grid.tap(96));
    }

    #[test]
    fn inventory_and_achievements_exclude_each_other() {
        let mut grid = view();
        grid.toggle_settings();
        grid.toggle_inventory();
        grid.toggle_achievements();
        assert_eq!(
            grid.panels(),
            Panels {
                settings: true,
                inventory: false,
                achievements: true
            }
        );
        grid.handle_key(Key::Escape);
        assert!(!grid.panels().achievements);
        assert!(grid.panels().settings);
    }

    #[test]
    fn short_swipes_are_ignored() {
        let mut grid = view();
        grid.swipe(100.0, 0.0);
        assert_eq!(grid.panels(), Panels::default());
        grid.swipe(101.0, 0.0);
        assert!(grid.panels().inventory);
        grid.swipe(-140.0, 30.0);
        assert!(grid.panels().achievements);
        assert!(!grid.panels().inventory);
    }

    #[test]
    fn level_climbs_every_five_hundred_points() {
        let mut grid = view();
        for _ in 0..10 {
            grid.primary_action();
        }
        assert_eq!(grid.stats().score, 500);
        assert_eq!(grid.stats().level, 2);
        assert_eq!(grid.stats().coins, 150);
    }
}
