pub mod items;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FoeTemplate {
    pub name: &'static str,
    pub glyph: char,
}

const FOES: [FoeTemplate; 4] = [
    FoeTemplate {
        name: "Pixel Gremlin",
        glyph: 'g',
    },
    FoeTemplate {
        name: "Glitch Slime",
        glyph: 's',
    },
    FoeTemplate {
        name: "Byte Bat",
        glyph: 'b',
    },
    FoeTemplate {
        name: "Cache Wyrm",
        glyph: 'W',
    },
];

/// Foes rotate as floors climb.
pub fn foe_for_level(level: u32) -> FoeTemplate {
    FOES[(level.max(1) as usize - 1) % FOES.len()]
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Goal {
    Score(u32),
    Coins(u32),
    Level(u32),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Achievement {
    pub title: &'static str,
    pub goal: Goal,
}

pub const ACHIEVEMENTS: [Achievement; 4] = [
    Achievement {
        title: "First Tap",
        goal: Goal::Score(10),
    },
    Achievement {
        title: "Centurion",
        goal: Goal::Score(100),
    },
    Achievement {
        title: "Coin Hoarder",
        goal: Goal::Coins(150),
    },
    Achievement {
        title: "Climber",
        goal: Goal::Level(3),
    },
];

impl Achievement {
    pub fn unlocked(&self, score: u32, coins: u32, level: u32) -> bool {
        match self.goal {
            Goal::Score(target) => score >= target,
            Goal::Coins(target) => coins >= target,
            Goal::Level(target) => level >= target,
        }
    }
}
