use bracket_random::prelude::RandomNumberGenerator;
use serde::Serialize;
use smallvec::SmallVec;
use tracing::{debug, info};

use crate::{
    config::{CombatTuning, Tuning},
    data::{
        FoeTemplate, foe_for_level,
        items::{BACKPACK_SLOTS, BackpackItem, starter_backpack},
    },
    effects::{EffectBoard, EffectId, Spawn, Tone},
    reveal::{RevealEvent, RevealSequencer, SequenceState},
    timeline::{Millis, Timeline},
};

use super::Key;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CombatTimer {
    ResolveHit,
    NextFoe,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttackOutcome {
    NoEnergy,
    Swung,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct HitReport {
    pub damage: i32,
    pub critical: bool,
    pub defeated: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CombatSnapshot {
    pub hp: i32,
    pub gold: i32,
    pub energy: i32,
    pub enemy: &'static str,
    pub enemy_hp: i32,
    pub enemy_max_hp: i32,
    pub level: u32,
    pub show_inventory: bool,
    pub equipped: Vec<&'static str>,
    pub dice: SequenceState,
    pub effects: Vec<String>,
}

/// One fight against one foe card, plus the backpack and the dice.
pub struct CombatView {
    tuning: CombatTuning,
    now: Millis,
    hp: i32,
    gold: i32,
    energy: i32,
    enemy_hp: i32,
    enemy_max_hp: i32,
    level: u32,
    foe: FoeTemplate,
    backpack: Vec<BackpackItem>,
    show_inventory: bool,
    shake_until: Millis,
    last_hit: Option<HitReport>,
    effects: EffectBoard,
    dice: RevealSequencer,
    timeline: Timeline<CombatTimer>,
    rng: RandomNumberGenerator,
    disposed: bool,
}

impl CombatView {
    pub fn mount(tuning: &Tuning, seed: u64, now: Millis) -> Self {
        let combat = tuning.combat.clone();
        Self {
            now,
            hp: combat.start_hp,
            gold: combat.start_gold,
            energy: combat.max_energy,
            enemy_hp: combat.enemy_hp,
            enemy_max_hp: combat.enemy_hp,
            level: 1,
            foe: foe_for_level(1),
            backpack: starter_backpack(),
            show_inventory: false,
            shake_until: 0,
            last_hit: None,
            effects: EffectBoard::new(tuning.effects.floating_text_ms, seed.wrapping_add(1)),
            dice: RevealSequencer::new(tuning.reveal.clone(), seed.wrapping_add(2)),
            timeline: Timeline::new(),
            rng: RandomNumberGenerator::seeded(seed),
            disposed: false,
            tuning: combat,
        }
    }

    /// Runs view timers and dice ticks in deadline order up to `now`.
    pub fn advance(&mut self, now: Millis) {
        if self.disposed {
            return;
        }
        loop {
            let view_next = self.timeline.next_deadline().filter(|at| *at <= now);
            let dice_next = self.dice.next_deadline().filter(|at| *at <= now);
            match (view_next, dice_next) {
                (Some(v), Some(d)) if d < v => self.run_dice(d),
                (Some(v), _) => {
                    if let Some((at, timer)) = self.timeline.pop_due(v) {
                        self.now = at;
                        self.fire(timer);
                    }
                }
                (None, Some(d)) => self.run_dice(d),
                (None, None) => break,
            }
        }
        self.now = now.max(self.now);
        self.effects.expire(self.now);
    }

    fn run_dice(&mut self, at: Millis) {
        self.now = at;
        for event in self.dice.advance(at) {
            if let RevealEvent::Settled { value, .. } = event {
                self.gold = self.gold.saturating_add(value);
                self.effects.spawn(
                    at,
                    Spawn::new(format!("ROLLED {value}"))
                        .tone(Tone::Gold)
                        .at(50.0, 45.0)
                        .scale(1.2),
                );
                info!(value, gold = self.gold, "dice settled");
            }
        }
    }

    fn fire(&mut self, timer: CombatTimer) {
        match timer {
            CombatTimer::ResolveHit => {
                self.last_hit = self.resolve_hit();
            }
            CombatTimer::NextFoe => self.next_foe(),
        }
    }

    pub fn handle_key(&mut self, key: Key) {
        match key {
            Key::Char('a') => {
                self.attack();
            }
            Key::Char('b') => {
                self.defend();
            }
            Key::Char('r') => self.rest(),
            Key::Char('d') => {
                self.roll_dice();
            }
            Key::Char('i') if self.show_inventory => self.close_backpack(),
            Key::Char('i') => self.open_backpack(),
            Key::Escape => self.close_backpack(),
            Key::Char(c @ '1'..='9') if self.show_inventory => {
                let slot = c as usize - '1' as usize;
                if let Some(id) = self.backpack.get(slot).map(|item| item.id) {
                    self.equip(id);
                }
            }
            _ => {}
        }
    }

    pub fn attack(&mut self) -> AttackOutcome {
        if self.disposed {
            return AttackOutcome::NoEnergy;
        }
        if self.energy < 1 {
            self.effects
                .spawn(self.now, Spawn::new("NO ENERGY!").at(50.0, 60.0));
            return AttackOutcome::NoEnergy;
        }
        self.energy -= 1;
        self.shake_until = self.now + self.tuning.shake_ms;
        self.timeline
            .schedule(self.now, self.tuning.hit_delay_ms, CombatTimer::ResolveHit);
        debug!(energy = self.energy, "attack swung");
        AttackOutcome::Swung
    }

    fn resolve_hit(&mut self) -> Option<HitReport> {
        if self.enemy_hp == 0 {
            debug!("hit landed on a defeated foe");
            return None;
        }
        let base = self
            .rng
            .range(self.tuning.min_damage, self.tuning.max_damage.saturating_add(1));
        let critical = self.rng.range(0.0f32, 1.0) < self.tuning.crit_chance;
        let damage = if critical { base.saturating_mul(2) } else { base };
        self.enemy_hp = self.enemy_hp.saturating_sub(damage).max(0);

        let x = self.rng.range(40.0f32, 60.0);
        let mut spawned: SmallVec<[EffectId; 3]> = SmallVec::new();
        spawned.push(self.effects.spawn(
            self.now,
            Spawn::new(damage.to_string())
                .tone(Tone::Red)
                .at(x, 25.0)
                .scale(if critical { 1.5 } else { 1.0 }),
        ));
        if critical {
            spawned.push(self.effects.spawn(
                self.now,
                Spawn::new("CRIT!").tone(Tone::Gold).at(x, 15.0).scale(0.8),
            ));
        }
        let defeated = self.enemy_hp == 0;
        if defeated {
            spawned.push(self.effects.spawn(
                self.now,
                Spawn::new("VICTORY!")
                    .tone(Tone::Gold)
                    .at(50.0, 40.0)
                    .scale(1.5),
            ));
            self.timeline
                .schedule(self.now, self.tuning.respawn_ms, CombatTimer::NextFoe);
        }
        info!(
            damage,
            critical,
            enemy_hp = self.enemy_hp,
            effects = spawned.len(),
            "hit resolved"
        );
        Some(HitReport {
            damage,
            critical,
            defeated,
        })
    }

    fn next_foe(&mut self) {
        let hp = self.tuning.enemy_hp.saturating_add(
            (self.level as i32).saturating_mul(self.tuning.enemy_hp_per_level),
        );
        self.enemy_hp = hp;
        self.enemy_max_hp = hp;
        self.level += 1;
        self.foe = foe_for_level(self.level);
        self.effects
            .spawn(self.now, Spawn::new("NEW FOE!").at(50.0, 40.0));
        info!(level = self.level, hp, foe = self.foe.name, "new foe");
    }

    /// Spends one energy to block; silently ignored when drained.
    pub fn defend(&mut self) -> bool {
        if self.disposed || self.energy < 1 {
            return false;
        }
        self.energy -= 1;
        self.effects
            .spawn(self.now, Spawn::new("BLOCK!").at(50.0, 50.0));
        true
    }

    pub fn rest(&mut self) {
        if self.disposed {
            return;
        }
        self.energy = self.tuning.max_energy;
        self.effects.spawn(
            self.now,
            Spawn::new("MAX POWER").tone(Tone::Gold).at(50.0, 60.0),
        );
    }

    pub fn roll_dice(&mut self) -> bool {
        self.dice.trigger(self.now)
    }

    pub fn open_backpack(&mut self) {
        self.show_inventory = true;
    }

    pub fn close_backpack(&mut self) {
        self.show_inventory = false;
    }

    /// Flips the equipped flag of one item, leaving the others alone.
    pub fn equip(&mut self, id: u32) {
        for item in self.backpack.iter_mut().filter(|item| item.id == id) {
            item.equipped = !item.equipped;
        }
    }

    pub fn teardown(&mut self) {
        let cleared = self.timeline.clear();
        self.dice.teardown();
        self.effects.clear();
        self.disposed = true;
        debug!(cleared, "combat view torn down");
    }

    pub fn hp(&self) -> i32 {
        self.hp
    }

    pub fn gold(&self) -> i32 {
        self.gold
    }

    pub fn energy(&self) -> i32 {
        self.energy
    }

    pub fn max_energy(&self) -> i32 {
        self.tuning.max_energy
    }

    pub fn enemy_hp(&self) -> i32 {
        self.enemy_hp
    }

    pub fn enemy_max_hp(&self) -> i32 {
        self.enemy_max_hp
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn foe(&self) -> FoeTemplate {
        self.foe
    }

    pub fn backpack(&self) -> &[BackpackItem] {
        &self.backpack
    }

    pub fn empty_slots(&self) -> usize {
        BACKPACK_SLOTS.saturating_sub(self.backpack.len())
    }

    pub fn inventory_open(&self) -> bool {
        self.show_inventory
    }

    pub fn is_shaking(&self) -> bool {
        self.now < self.shake_until
    }

    pub fn health_alert(&self) -> bool {
        self.hp < 30
    }

    pub fn energy_alert(&self) -> bool {
        self.energy == 0
    }

    pub fn last_hit(&self) -> Option<HitReport> {
        self.last_hit
    }

    pub fn effects(&self) -> &EffectBoard {
        &self.effects
    }

    pub fn dice(&self) -> SequenceState {
        self.dice.state()
    }

    pub fn now(&self) -> Millis {
        self.now
    }

    pub fn pending_timers(&self) -> usize {
        self.timeline.len()
    }

    pub fn snapshot(&self) -> CombatSnapshot {
        CombatSnapshot {
            hp: self.hp,
            gold: self.gold,
            energy: self.energy,
            enemy: self.foe.name,
            enemy_hp: self.enemy_hp,
            enemy_max_hp: self.enemy_max_hp,
            level: self.level,
            show_inventory: self.show_inventory,
            equipped: self
                .backpack
                .iter()
                .filter(|item| item.equipped)
                .map(|item| item.name)
                .collect(),
            dice: self.dice.state(),
            effects: self
                .effects
                .texts()
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> CombatView {
        CombatView::mount(&Tuning::default(), 99, 0)
    }

    #[test]
    fn starts_with_the_prototype_numbers() {
        let combat = view();
        assert_eq!(combat.hp(), 85);
        assert_eq!(combat.gold(), 120);
        assert_eq!(combat.energy(), 3);
        assert_eq!((combat.enemy_hp(), combat.enemy_max_hp()), (50, 50));
        assert_eq!(combat.backpack().len(), 4);
        assert_eq!(combat.empty_slots(), 5);
        assert!(!combat.health_alert());
    }

    #[test]
    fn damage_lands_after_the_hit_animation() {
        let mut combat = view();
        assert_eq!(combat.attack(), AttackOutcome::Swung);
        assert_eq!(combat.energy(), 2);
        assert!(combat.is_shaking());
        combat.advance(299);
        assert_eq!(combat.enemy_hp(), 50);
        assert!(!combat.is_shaking());
        combat.advance(300);
        let hit = combat.last_hit().expect("hit resolved");
        assert!((4..=22).contains(&hit.damage));
        if !hit.critical {
            assert!(hit.damage <= 11);
        }
        assert_eq!(combat.enemy_hp(), 50 - hit.damage);
        assert!(combat.effects().texts().contains(&hit.damage.to_string().as_str()));
    }

    #[test]
    fn drained_energy_blocks_actions() {
        let mut combat = view();
        assert!(combat.defend());
        assert!(combat.defend());
        assert!(combat.defend());
        assert!(combat.energy_alert());
        assert!(!combat.defend());
        assert_eq!(combat.attack(), AttackOutcome::NoEnergy);
        assert!(combat.effects().texts().contains(&"NO ENERGY!"));
        assert_eq!(combat.pending_timers(), 0);
        combat.rest();
        assert_eq!(combat.energy(), 3);
    }

    #[test]
    fn equip_toggles_only_the_chosen_item() {
        let mut combat = view();
        combat.equip(2);
        let equipped: Vec<u32> = combat
            .backpack()
            .iter()
            .filter(|i| i.equipped)
            .map(|i| i.id)
            .collect();
        assert_eq!(equipped, vec![1, 2]);
        combat.equip(1);
        assert!(!combat.backpack()[0].equipped);
        assert!(combat.backpack()[1].equipped);
    }

    #[test]
    fn digit_keys_need_the_backpack_open() {
        let mut combat = view();
        combat.handle_key(Key::Char('3'));
        assert!(!combat.backpack()[2].equipped);
        combat.handle_key(Key::Char('i'));
        combat.handle_key(Key::Char('3'));
        assert!(combat.backpack()[2].equipped);
        combat.handle_key(Key::Escape);
        assert!(!combat.inventory_open());
    }

    #[test]
    fn huge_damage_tuning_saturates() {
        let tuning = Tuning {
            combat: CombatTuning {
                min_damage: i32::MAX - 1,
                max_damage: i32::MAX,
                crit_chance: 1.0,
                enemy_hp_per_level: i32::MAX,
                ..CombatTuning::default()
            },
            ..Tuning::default()
        };
        let mut combat = CombatView::mount(&tuning, 3, 0);
        combat.attack();
        combat.advance(300);
        let hit = combat.last_hit().expect("hit resolved");
        assert!(hit.critical);
        assert_eq!(hit.damage, i32::MAX);
        assert_eq!(combat.enemy_hp(), 0);
        combat.advance(1800);
        assert_eq!(combat.enemy_max_hp(), i32::MAX);
    }
}
