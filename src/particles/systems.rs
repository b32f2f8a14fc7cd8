use specs::prelude::*;

use super::{
    components::{Life, Motion, Sprite},
    resources::{FrameRules, ParticleStats},
};

#[derive(Default)]
pub struct MotionSystem;

impl<'a> System<'a> for MotionSystem {
    type SystemData = WriteStorage<'a, Motion>;

    fn run(&mut self, mut motions: Self::SystemData) {
        for motion in (&mut motions).join() {
            motion.x += motion.vx;
            motion.y += motion.vy;
        }
    }
}

#[derive(Default)]
pub struct DecaySystem;

impl<'a> System<'a> for DecaySystem {
    type SystemData = (
        WriteStorage<'a, Life>,
        WriteStorage<'a, Sprite>,
        ReadExpect<'a, FrameRules>,
    );

    fn run(&mut self, (mut lives, mut sprites, rules): Self::SystemData) {
        for (life, sprite) in (&mut lives, &mut sprites).join() {
            life.remaining -= life.decay;
            sprite.size *= rules.shrink;
        }
    }
}

#[derive(Default)]
pub struct CullSystem;

impl<'a> System<'a> for CullSystem {
    type SystemData = (
        Entities<'a>,
        ReadStorage<'a, Life>,
        WriteExpect<'a, ParticleStats>,
    );

    fn run(&mut self, (entities, lives, mut stats): Self::SystemData) {
        let mut spent = Vec::new();
        for (entity, life) in (&entities, &lives).join() {
            if life.remaining <= 0.0 {
                spent.push(entity);
            }
        }
        for entity in spent {
            if entities.delete(entity).is_ok() {
                stats.culled += 1;
            }
        }
        stats.frames += 1;
    }
}
