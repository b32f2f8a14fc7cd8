//! Root state object: owns the clock and whichever screen is mounted.

use serde::Serialize;
use tracing::info;

use crate::{
    config::Tuning,
    screens::{
        Key, ScreenKind,
        combat::{CombatSnapshot, CombatView},
        garden::{GardenSnapshot, GardenView},
        grid::{GridSnapshot, GridView},
    },
    timeline::Millis,
};

pub enum Screen {
    Grid(GridView),
    Combat(CombatView),
    Garden(GardenView),
}

impl Screen {
    pub fn kind(&self) -> ScreenKind {
        match self {
            Screen::Grid(_) => ScreenKind::Grid,
            Screen::Combat(_) => ScreenKind::Combat,
            Screen::Garden(_) => ScreenKind::Garden,
        }
    }

    fn mount(kind: ScreenKind, tuning: &Tuning, seed: u64, now: Millis) -> Self {
        match kind {
            ScreenKind::Grid => Screen::Grid(GridView::mount(tuning, seed, now)),
            ScreenKind::Combat => Screen::Combat(CombatView::mount(tuning, seed, now)),
            ScreenKind::Garden => Screen::Garden(GardenView::mount(tuning, seed, now)),
        }
    }

    fn advance(&mut self, now: Millis) {
        match self {
            Screen::Grid(view) => view.advance(now),
            Screen::Combat(view) => view.advance(now),
            Screen::Garden(view) => view.advance(now),
        }
    }

    fn handle_key(&mut self, key: Key) {
        match self {
            Screen::Grid(view) => view.handle_key(key),
            Screen::Combat(view) => view.handle_key(key),
            Screen::Garden(view) => view.handle_key(key),
        }
    }

    fn teardown(&mut self) {
        match self {
            Screen::Grid(view) => view.teardown(),
            Screen::Combat(view) => view.teardown(),
            Screen::Garden(view) => view.teardown(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum ScreenSnapshot {
    Grid(GridSnapshot),
    Combat(CombatSnapshot),
    Garden(GardenSnapshot),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ArcadeSnapshot {
    pub clock: Millis,
    pub mounts: u64,
    pub view: ScreenSnapshot,
}

pub struct Arcade {
    tuning: Tuning,
    seed: u64,
    clock: Millis,
    mounts: u64,
    screen: Screen,
}

impl Arcade {
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let screen = Screen::mount(ScreenKind::Grid, &tuning, mount_seed(seed, 0), 0);
        Self {
            tuning,
            seed,
            clock: 0,
            mounts: 1,
            screen,
        }
    }

    pub fn advance(&mut self, dt: Millis) {
        self.clock = self.clock.saturating_add(dt);
        self.screen.advance(self.clock);
    }

    pub fn advance_to(&mut self, at: Millis) {
        if at > self.clock {
            self.advance(at - self.clock);
        }
    }

    pub fn press(&mut self, key: Key) {
        if key == Key::Tab {
            self.switch_to(self.screen.kind().cycle(1));
            return;
        }
        self.screen.handle_key(key);
    }

    /// Grid cell tap; other screens ignore it.
    pub fn tap(&mut self, index: usize) -> bool {
        match &mut self.screen {
            Screen::Grid(view) => view.tap(index),
            _ => false,
        }
    }

    pub fn swipe(&mut self, dx: f32, dy: f32) {
        if let Screen::Grid(view) = &mut self.screen {
            view.swipe(dx, dy);
        }
    }

    /// Tears down the mounted screen and mounts a fresh `kind`.
    pub fn switch_to(&mut self, kind: ScreenKind) {
        self.screen.teardown();
        let seed = mount_seed(self.seed, self.mounts);
        self.mounts += 1;
        self.screen = Screen::mount(kind, &self.tuning, seed, self.clock);
        info!(screen = kind.as_str(), clock = self.clock, "screen mounted");
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut Screen {
        &mut self.screen
    }

    pub fn kind(&self) -> ScreenKind {
        self.screen.kind()
    }

    pub fn clock(&self) -> Millis {
        self.clock
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn snapshot(&self) -> ArcadeSnapshot {
        let view = match &self.screen {
            Screen::Grid(view) => ScreenSnapshot::Grid(view.snapshot()),
            Screen::Combat(view) => ScreenSnapshot::Combat(view.snapshot()),
            Screen::Garden(view) => ScreenSnapshot::Garden(view.snapshot()),
        };
        ArcadeSnapshot {
            clock: self.clock,
            mounts: self.mounts,
            view,
        }
    }
}

fn mount_seed(seed: u64, mount: u64) -> u64 {
    seed ^ mount.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}
