pub mod components;
pub mod resources;
pub mod systems;

use bracket_random::prelude::RandomNumberGenerator;
use specs::prelude::{Builder, Dispatcher, DispatcherBuilder, Join, World as SpecsWorld, WorldExt};

use crate::effects::Tone;

use self::{
    components::{Life, Motion, Sprite},
    resources::{FrameRules, ParticleStats},
    systems::{CullSystem, DecaySystem, MotionSystem},
};

const LIFE_DECAY: f32 = 0.02;
const MAX_SPEED: f32 = 2.0;
const MIN_SIZE: f32 = 2.0;
const MAX_SIZE: f32 = 6.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleView {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub alpha: f32,
    pub tone: Tone,
}

/// Sparks for tap feedback, simulated one animation frame at a time.
pub struct ParticleField {
    specs_world: SpecsWorld,
    dispatcher: Dispatcher<'static, 'static>,
}

impl ParticleField {
    pub fn new(seed: u64) -> Self {
        let mut specs_world = SpecsWorld::new();
        specs_world.register::<Motion>();
        specs_world.register::<Life>();
        specs_world.register::<Sprite>();
        specs_world.insert(RandomNumberGenerator::seeded(seed));
        specs_world.insert(FrameRules::default());
        specs_world.insert(ParticleStats::default());
        let dispatcher = DispatcherBuilder::new()
            .with(MotionSystem::default(), "motion", &[])
            .with(DecaySystem::default(), "decay", &[])
            .with(CullSystem::default(), "cull", &["motion", "decay"])
            .build();

        Self {
            specs_world,
            dispatcher,
        }
    }

    /// Scatters `count` sparks from one point.
    pub fn burst(&mut self, x: f32, y: f32, count: usize, tone: Tone) {
        for _ in 0..count {
            self.spawn(x, y, tone);
        }
    }

    /// Places `count` sparks evenly on a circle.
    pub fn ring(&mut self, cx: f32, cy: f32, radius: f32, count: usize, tone: Tone) {
        for i in 0..count {
            let angle = (i as f32 / count as f32) * std::f32::consts::TAU;
            self.spawn(cx + angle.cos() * radius, cy + angle.sin() * radius, tone);
        }
    }

    fn spawn(&mut self, x: f32, y: f32, tone: Tone) {
        let (vx, vy, size) = {
            let mut rng = self.specs_world.write_resource::<RandomNumberGenerator>();
            (
                rng.range(-MAX_SPEED, MAX_SPEED),
                rng.range(-MAX_SPEED, MAX_SPEED),
                rng.range(MIN_SIZE, MAX_SIZE),
            )
        };
        self.specs_world
            .create_entity()
            .with(Motion { x, y, vx, vy })
            .with(Life {
                remaining: 1.0,
                decay: LIFE_DECAY,
            })
            .with(Sprite { size, tone })
            .build();
        self.specs_world.write_resource::<ParticleStats>().spawned += 1;
    }

    pub fn step(&mut self, frames: u32) {
        for _ in 0..frames {
            if self.is_empty() {
                break;
            }
            self.dispatcher.dispatch(&mut self.specs_world);
            self.specs_world.maintain();
        }
    }

    pub fn len(&self) -> usize {
        let lives = self.specs_world.read_component::<Life>();
        (&lives).join().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn each_particle<F>(&self, mut f: F)
    where
        F: FnMut(ParticleView),
    {
        let motions = self.specs_world.read_component::<Motion>();
        let lives = self.specs_world.read_component::<Life>();
        let sprites = self.specs_world.read_component::<Sprite>();
        for (motion, life, sprite) in (&motions, &lives, &sprites).join() {
            f(ParticleView {
                x: motion.x,
                y: motion.y,
                size: sprite.size,
                alpha: life.remaining.clamp(0.0, 1.0),
                tone: sprite.tone,
            });
        }
    }

    pub fn stats(&self) -> ParticleStats {
        (*self.specs_world.read_resource::<ParticleStats>()).clone()
    }

    pub fn clear(&mut self) {
        self.specs_world.delete_all();
        self.specs_world.maintain();
    }
}

#[cfg(test)]
mod tests {
    use super::ParticleField;
    use crate::effects::Tone;

    #[test]
    fn sparks_fade_after_fifty_frames() {
        let mut field = ParticleField::new(11);
        field.burst(100.0, 100.0, 10, Tone::Accent);
        assert_eq!(field.len(), 10);
        field.step(49);
        assert_eq!(field.len(), 10);
        field.step(2);
        assert!(field.is_empty());
        let stats = field.stats();
        assert_eq!((stats.spawned, stats.culled), (10, 10));
        assert!((50..=51).contains(&stats.frames));
    }

    #[test]
    fn ring_places_sparks_on_the_radius() {
        let mut field = ParticleField::new(5);
        field.ring(0.0, 0.0, 50.0, 30, Tone::Gold);
        let mut count = 0;
        field.each_particle(|p| {
            let dist = (p.x * p.x + p.y * p.y).sqrt();
            assert!((dist - 50.0).abs() < 0.01);
            assert!((2.0..6.0).contains(&p.size));
            count += 1;
        });
        assert_eq!(count, 30);
    }

    #[test]
    fn sparks_shrink_and_fade() {
        let mut field = ParticleField::new(2);
        field.burst(0.0, 0.0, 1, Tone::White);
        let mut before = None;
        field.each_particle(|p| before = Some(p));
        field.step(10);
        let mut after = None;
        field.each_particle(|p| after = Some(p));
        let (before, after) = (before.expect("spawned"), after.expect("alive"));
        assert!(after.size < before.size);
        assert!((after.alpha - 0.8).abs() < 1e-4);
    }
}
