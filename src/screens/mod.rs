pub mod combat;
pub mod garden;
pub mod grid;

use serde::Serialize;

/// Input keys, independent of the terminal backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Escape,
    Enter,
    Space,
    Tab,
    Left,
    Right,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum ScreenKind {
    Grid,
    Combat,
    Garden,
}

pub const SCREENS: [ScreenKind; 3] = [ScreenKind::Grid, ScreenKind::Combat, ScreenKind::Garden];

impl ScreenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScreenKind::Grid => "Stat Grid",
            ScreenKind::Combat => "Combat HUD",
            ScreenKind::Garden => "Garden",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            ScreenKind::Grid => 0,
            ScreenKind::Combat => 1,
            ScreenKind::Garden => 2,
        }
    }

    pub fn cycle(self, delta: i32) -> Self {
        let idx = self.index() as i32;
        let next = (idx + delta).rem_euclid(SCREENS.len() as i32) as usize;
        SCREENS[next]
    }
}
