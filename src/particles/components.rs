use specs::prelude::{Component, VecStorage};

use crate::effects::Tone;

#[derive(Clone, Debug)]
pub struct Motion {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
}

impl Component for Motion {
    type Storage = VecStorage<Self>;
}

#[derive(Clone, Debug)]
pub struct Life {
    pub remaining: f32,
    pub decay: f32,
}

impl Component for Life {
    type Storage = VecStorage<Self>;
}

#[derive(Clone, Debug)]
pub struct Sprite {
    pub size: f32,
    pub tone: Tone,
}

impl Component for Sprite {
    type Storage = VecStorage<Self>;
}
