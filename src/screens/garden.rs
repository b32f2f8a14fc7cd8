use serde::Serialize;
use tracing::{debug, info};

use crate::{
    config::{GardenTuning, Tuning},
    data::items::{SHOP_OFFERS, ShopGoods, ShopOffer},
    effects::{EffectBoard, Spawn, Tone},
    timeline::{Millis, Timeline},
};

use super::Key;

const METER_MAX: i32 = 100;
const RIPE_AT: u32 = 100;
const PLAY_COST: i32 = 7;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Critter {
    pub name: String,
    pub hunger: i32,
    pub happiness: i32,
    pub energy: i32,
}

impl Default for Critter {
    fn default() -> Self {
        Self {
            name: "Sprout".to_string(),
            hunger: 80,
            happiness: 70,
            energy: 80,
        }
    }
}

impl Critter {
    pub fn mood(&self) -> Mood {
        if self.hunger < 25 {
            Mood::Hungry
        } else if self.happiness >= 70 {
            Mood::Happy
        } else if self.happiness >= 40 {
            Mood::Okay
        } else {
            Mood::Sad
        }
    }

    fn nudge(meter: &mut i32, delta: i32) {
        *meter = (*meter + delta).clamp(0, METER_MAX);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Mood {
    Hungry,
    Happy,
    Okay,
    Sad,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum PlotStage {
    Empty,
    Growing { growth: u32 },
    Ripe,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Plot {
    pub stage: PlotStage,
    pub moisture: i32,
}

impl Plot {
    const fn empty() -> Self {
        Self {
            stage: PlotStage::Empty,
            moisture: 0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Bag {
    pub seeds: u32,
    pub snacks: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum GardenTimer {
    Tick,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GardenSnapshot {
    pub coins: u32,
    pub critter: Critter,
    pub mood: Mood,
    pub bag: Bag,
    pub plots: Vec<Plot>,
    pub cursor: usize,
    pub shop_open: bool,
    pub ticks: u64,
    pub effects: Vec<String>,
}

/// Critter meters and garden plots that tick along in simulated time.
pub struct GardenView {
    tuning: GardenTuning,
    now: Millis,
    coins: u32,
    critter: Critter,
    bag: Bag,
    plots: Vec<Plot>,
    cursor: usize,
    shop_open: bool,
    ticks: u64,
    effects: EffectBoard,
    timeline: Timeline<GardenTimer>,
    disposed: bool,
}

impl GardenView {
    pub fn mount(tuning: &Tuning, seed: u64, now: Millis) -> Self {
        let garden = tuning.garden.clone();
        let mut timeline = Timeline::new();
        timeline.schedule(now, garden.tick_ms, GardenTimer::Tick);
        Self {
            now,
            coins: garden.start_coins,
            critter: Critter::default(),
            bag: Bag {
                seeds: 3,
                snacks: 2,
            },
            plots: vec![Plot::empty(); garden.plots],
            cursor: 0,
            shop_open: false,
            ticks: 0,
            effects: EffectBoard::new(tuning.effects.floating_text_ms, seed),
            timeline,
            disposed: false,
            tuning: garden,
        }
    }

    pub fn advance(&mut self, now: Millis) {
        if self.disposed {
            return;
        }
        while let Some((at, timer)) = self.timeline.pop_due(now) {
            self.now = at;
            match timer {
                GardenTimer::Tick => {
                    self.tick();
                    self.timeline
                        .schedule(at, self.tuning.tick_ms, GardenTimer::Tick);
                }
            }
        }
        self.now = now.max(self.now);
        self.effects.expire(self.now);
    }

    fn tick(&mut self) {
        self.ticks += 1;
        let critter = &mut self.critter;
        Critter::nudge(&mut critter.hunger, -1);
        let sulk = if critter.hunger < 25 { -2 } else { -1 };
        Critter::nudge(&mut critter.happiness, sulk);
        Critter::nudge(&mut critter.energy, 2);

        let plot_count = self.plots.len();
        for idx in 0..plot_count {
            let plot = &mut self.plots[idx];
            let PlotStage::Growing { growth } = plot.stage else {
                continue;
            };
            if plot.moisture <= 0 {
                continue;
            }
            let growth = growth.saturating_add(self.tuning.growth_per_tick).min(RIPE_AT);
            plot.moisture = (plot.moisture - self.tuning.moisture_per_tick).max(0);
            if growth >= RIPE_AT {
                plot.stage = PlotStage::Ripe;
                self.effects.spawn(
                    self.now,
                    Spawn::new("RIPE!")
                        .tone(Tone::Green)
                        .at(plot_x(idx, plot_count), 70.0),
                );
                info!(plot = idx, "plot ripened");
            } else {
                plot.stage = PlotStage::Growing { growth };
            }
        }
    }

    pub fn handle_key(&mut self, key: Key) {
        match key {
            Key::Char('f') => {
                self.feed();
            }
            Key::Char('p') => {
                self.play();
            }
            Key::Char('n') => {
                self.plant();
            }
            Key::Char('w') => {
                self.water();
            }
            Key::Char('h') => {
                self.harvest();
            }
            Key::Char(',') | Key::Left => self.move_cursor(-1),
            Key::Char('.') | Key::Right => self.move_cursor(1),
            Key::Char('s') if self.shop_open => self.close_shop(),
            Key::Char('s') => self.open_shop(),
            Key::Escape => self.close_shop(),
            Key::Char(c @ '1'..='9') if self.shop_open => {
                self.buy(c as usize - '1' as usize);
            }
            Key::Char(c @ '1'..='9') => self.select_plot(c as usize - '1' as usize),
            _ => {}
        }
    }

    pub fn feed(&mut self) -> bool {
        if self.disposed {
            return false;
        }
        if self.bag.snacks == 0 {
            self.effects
                .spawn(self.now, Spawn::new("NO SNACKS").at(50.0, 40.0));
            return false;
        }
        self.bag.snacks -= 1;
        Critter::nudge(&mut self.critter.hunger, 18);
        Critter::nudge(&mut self.critter.happiness, 3);
        self.effects.spawn(
            self.now,
            Spawn::new("YUM").tone(Tone::Green).at(50.0, 40.0),
        );
        true
    }

    pub fn play(&mut self) -> bool {
        if self.disposed {
            return false;
        }
        if self.critter.energy < PLAY_COST {
            self.effects
                .spawn(self.now, Spawn::new("TOO TIRED").at(50.0, 40.0));
            return false;
        }
        Critter::nudge(&mut self.critter.happiness, 10);
        Critter::nudge(&mut self.critter.energy, -PLAY_COST);
        Critter::nudge(&mut self.critter.hunger, -1);
        self.effects.spawn(
            self.now,
            Spawn::new("WHEE!").tone(Tone::Gold).at(50.0, 40.0),
        );
        true
    }

    pub fn plant(&mut self) -> bool {
        if self.disposed || self.bag.seeds == 0 {
            return false;
        }
        let Some(plot) = self.plots.get_mut(self.cursor) else {
            return false;
        };
        if plot.stage != PlotStage::Empty {
            return false;
        }
        plot.stage = PlotStage::Growing { growth: 0 };
        self.bag.seeds -= 1;
        debug!(plot = self.cursor, seeds = self.bag.seeds, "planted");
        true
    }

    pub fn water(&mut self) -> bool {
        if self.disposed {
            return false;
        }
        let plot_count = self.plots.len();
        let Some(plot) = self.plots.get_mut(self.cursor) else {
            return false;
        };
        if plot.stage == PlotStage::Empty {
            return false;
        }
        plot.moisture = METER_MAX;
        self.effects.spawn(
            self.now,
            Spawn::new("SPLASH")
                .tone(Tone::Accent)
                .at(plot_x(self.cursor, plot_count), 75.0),
        );
        true
    }

    pub fn harvest(&mut self) -> bool {
        if self.disposed {
            return false;
        }
        let plot_count = self.plots.len();
        let Some(plot) = self.plots.get_mut(self.cursor) else {
            return false;
        };
        if plot.stage != PlotStage::Ripe {
            return false;
        }
        *plot = Plot::empty();
        let reward = self.tuning.harvest_coins;
        self.coins = self.coins.saturating_add(reward);
        Critter::nudge(&mut self.critter.happiness, 2);
        self.effects.spawn(
            self.now,
            Spawn::new(format!("+{reward}"))
                .tone(Tone::Gold)
                .at(plot_x(self.cursor, plot_count), 65.0),
        );
        info!(plot = self.cursor, coins = self.coins, "harvested");
        true
    }

    pub fn move_cursor(&mut self, delta: i32) {
        let len = self.plots.len() as i32;
        self.cursor = (self.cursor as i32 + delta).rem_euclid(len) as usize;
    }

    pub fn select_plot(&mut self, index: usize) {
        if index < self.plots.len() {
            self.cursor = index;
        }
    }

    pub fn open_shop(&mut self) {
        self.shop_open = true;
    }

    pub fn close_shop(&mut self) {
        self.shop_open = false;
    }

    /// Buys one shop offer; only possible while the shop sheet is open.
    pub fn buy(&mut self, offer_index: usize) -> bool {
        if self.disposed || !self.shop_open {
            return false;
        }
        let Some(offer) = SHOP_OFFERS.get(offer_index).copied() else {
            return false;
        };
        if self.coins < offer.price {
            self.effects
                .spawn(self.now, Spawn::new("NOT ENOUGH").at(50.0, 30.0));
            return false;
        }
        self.coins -= offer.price;
        match offer.goods {
            ShopGoods::Seeds(n) => self.bag.seeds += n,
            ShopGoods::Snacks(n) => self.bag.snacks += n,
            ShopGoods::Toy { joy } => Critter::nudge(&mut self.critter.happiness, joy),
        }
        info!(item = offer.name, coins = self.coins, "bought");
        true
    }

    pub fn teardown(&mut self) {
        let cleared = self.timeline.clear();
        self.effects.clear();
        self.disposed = true;
        debug!(cleared, "garden view torn down");
    }

    pub fn coins(&self) -> u32 {
        self.coins
    }

    pub fn critter(&self) -> &Critter {
        &self.critter
    }

    pub fn bag(&self) -> Bag {
        self.bag
    }

    pub fn plots(&self) -> &[Plot] {
        &self.plots
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn shop_open(&self) -> bool {
        self.shop_open
    }

    pub fn offers(&self) -> &'static [ShopOffer] {
        &SHOP_OFFERS
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn effects(&self) -> &EffectBoard {
        &self.effects
    }

    pub fn now(&self) -> Millis {
        self.now
    }

    pub fn pending_timers(&self) -> usize {
        self.timeline.len()
    }

    pub fn snapshot(&self) -> GardenSnapshot {
        GardenSnapshot {
            coins: self.coins,
            critter: self.critter.clone(),
            mood: self.critter.mood(),
            bag: self.bag,
            plots: self.plots.clone(),
            cursor: self.cursor,
            shop_open: self.shop_open,
            ticks: self.ticks,
            effects: self
                .effects
                .texts()
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}

/// Horizontal anchor (percent) of a plot's floating text.
fn plot_x(index: usize, count: usize) -> f32 {
    (index as f32 + 0.5) / count.max(1) as f32 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> GardenView {
        GardenView::mount(&Tuning::default(), 5, 0)
    }

    #[test]
    fn meters_drift_each_second() {
        let mut garden = view();
        garden.advance(999);
        assert_eq!(garden.ticks(), 0);
        garden.advance(3000);
        assert_eq!(garden.ticks(), 3);
        let critter = garden.critter();
        assert_eq!(critter.hunger, 77);
        assert_eq!(critter.happiness, 67);
        assert_eq!(critter.energy, 86);
    }

    #[test]
    fn unwatered_seedlings_do_not_grow() {
        let mut garden = view();
        assert!(garden.plant());
        assert!(!garden.plant());
        garden.advance(10_000);
        assert_eq!(garden.plots()[0].stage, PlotStage::Growing { growth: 0 });
    }

    #[test]
    fn cursor_wraps_both_ways() {
        let mut garden = view();
        garden.move_cursor(-1);
        assert_eq!(garden.cursor(), 5);
        garden.move_cursor(2);
        assert_eq!(garden.cursor(), 1);
    }

    #[test]
    fn mood_prefers_hunger() {
        let critter = Critter {
            hunger: 10,
            happiness: 95,
            ..Critter::default()
        };
        assert_eq!(critter.mood(), Mood::Hungry);
        let critter = Critter {
            happiness: 39,
            ..Critter::default()
        };
        assert_eq!(critter.mood(), Mood::Sad);
    }

    #[test]
    fn shop_is_closed_by_default() {
        let mut garden = view();
        assert!(!garden.buy(0));
        garden.handle_key(Key::Char('s'));
        garden.handle_key(Key::Char('2'));
        assert_eq!(garden.bag().snacks, 3);
        assert_eq!(garden.coins(), 34);
    }

    #[test]
    fn feeding_uses_snacks_and_clamps_hunger() {
        let mut garden = view();
        assert!(garden.feed());
        assert_eq!((garden.critter().hunger, garden.critter().happiness), (98, 73));
        assert!(garden.feed());
        assert_eq!((garden.critter().hunger, garden.critter().happiness), (100, 76));
        assert_eq!(garden.bag().snacks, 0);

        let before = garden.critter().clone();
        assert!(!garden.feed());
        assert_eq!(garden.critter(), &before);
        assert_eq!(garden.bag().snacks, 0);
        assert!(garden.effects().texts().contains(&"NO SNACKS"));
    }

    #[test]
    fn play_costs_energy_until_too_tired() {
        let mut garden = view();
        assert!(garden.play());
        let critter = garden.critter();
        assert_eq!(
            (critter.happiness, critter.energy, critter.hunger),
            (80, 73, 79)
        );
        for _ in 0..10 {
            assert!(garden.play());
        }
        assert_eq!(garden.critter().energy, 3);
        assert_eq!(garden.critter().happiness, 100);

        let before = garden.critter().clone();
        assert!(!garden.play());
        assert_eq!(garden.critter(), &before);
        assert!(garden.effects().texts().contains(&"TOO TIRED"));
    }

    #[test]
    fn teardown_stops_ticks_and_actions() {
        let mut garden = view();
        garden.plant();
        garden.water();
        assert_eq!(garden.pending_timers(), 1);
        garden.teardown();
        assert_eq!(garden.pending_timers(), 0);
        assert!(garden.effects().active().is_empty());

        let frozen = garden.snapshot();
        garden.advance(60_000);
        assert!(!garden.feed());
        assert!(!garden.harvest());
        assert_eq!(garden.snapshot(), frozen);
    }

    #[test]
    fn digits_pick_plots_while_the_shop_is_closed() {
        let mut garden = view();
        garden.handle_key(Key::Char('4'));
        assert_eq!(garden.cursor(), 3);
        garden.handle_key(Key::Char('9'));
        assert_eq!(garden.cursor(), 3);
        garden.handle_key(Key::Char('s'));
        garden.handle_key(Key::Char('1'));
        assert_eq!(garden.cursor(), 3);
        assert_eq!(garden.bag().seeds, 6);
        garden.handle_key(Key::Escape);
        assert!(!garden.shop_open());
    }
}
