/// Per-frame tuning shared by the particle systems.
#[derive(Clone, Debug)]
pub struct FrameRules {
    pub shrink: f32,
}

impl Default for FrameRules {
    fn default() -> Self {
        Self { shrink: 0.98 }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ParticleStats {
    pub spawned: u64,
    pub culled: u64,
    pub frames: u64,
}
