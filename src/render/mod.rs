use bracket_terminal::prelude::*;

use gamescreens::{
    effects::{FloatingText, Tone},
    screens::{
        SCREENS, ScreenKind,
        combat::CombatView,
        garden::{GardenView, PlotStage},
        grid::{CELL_PX, GridView},
    },
    shell::{Arcade, Screen},
    timeline::Millis,
};

pub const GRID_X: i32 = 2;
pub const GRID_Y: i32 = 8;
pub const CELL_W: i32 = 6;
pub const CELL_H: i32 = 3;
const SIDE_X: i32 = 52;
const PLAY_TOP: i32 = 8;
const PLAY_HEIGHT: i32 = 36;
const BANNER_Y: i32 = 45;

pub fn tone_color(tone: Tone) -> RGB {
    match tone {
        Tone::White => RGB::named(WHITE),
        Tone::Red => RGB::from_u8(239, 68, 68),
        Tone::Gold => RGB::from_u8(234, 179, 8),
        Tone::Green => RGB::from_u8(74, 222, 128),
        Tone::Accent => RGB::from_u8(0, 212, 255),
    }
}

pub struct TabStrip;

impl TabStrip {
    pub const fn new() -> Self {
        Self
    }

    pub fn draw(&self, ctx: &mut BTerm, active: ScreenKind, clock: Millis) {
        let (width, _) = ctx.get_char_size();
        ctx.draw_box(0, 0, width as i32 - 1, 6, RGB::named(GRAY), RGB::named(BLACK));
        ctx.print_color(
            2,
            1,
            RGB::named(WHITE),
            RGB::named(BLACK),
            format!("Game Screens · {}", active.as_str()),
        );
        ctx.print_color(
            2,
            2,
            RGB::named(LIGHT_BLUE),
            RGB::named(BLACK),
            format!("t+{:.1}s  [Tab] next screen  [F10] quit", clock as f32 / 1000.0),
        );

        for (idx, kind) in SCREENS.iter().enumerate() {
            let x = 2 + (idx as i32 * 16);
            let (fg, glyph) = if *kind == active {
                (RGB::named(LIGHT_GREEN), '*')
            } else {
                (RGB::named(DARK_GRAY), '·')
            };
            ctx.set(x, 4, fg, RGB::named(BLACK), to_cp437(glyph));
            ctx.print_color(x + 2, 4, fg, RGB::named(BLACK), kind.as_str());
        }
    }
}

pub fn draw_screen(ctx: &mut BTerm, arcade: &Arcade) {
    match arcade.screen() {
        Screen::Grid(view) => draw_grid(ctx, view),
        Screen::Combat(view) => draw_combat(ctx, view),
        Screen::Garden(view) => draw_garden(ctx, view),
    }
}

fn draw_banner(ctx: &mut BTerm, text: Option<&str>, start_y: i32) {
    let Some(text) = text else {
        return;
    };
    let (width, _) = ctx.get_char_size();
    ctx.draw_box(
        0,
        start_y,
        width as i32 - 1,
        2,
        RGB::named(DARK_GRAY),
        RGB::named(BLACK),
    );
    ctx.print_color(
        2,
        start_y + 1,
        tone_color(Tone::Accent),
        RGB::named(BLACK),
        text,
    );
}

/// Maps a mouse position to the grid cell underneath it.
pub fn grid_cell_at(view: &GridView, mouse: Point) -> Option<usize> {
    let col = (mouse.x - GRID_X).div_euclid(CELL_W);
    let row = (mouse.y - GRID_Y).div_euclid(CELL_H);
    let columns = view.columns();
    if mouse.x < GRID_X || mouse.y < GRID_Y || col >= columns {
        return None;
    }
    let index = (row * columns + col) as usize;
    (index < view.cells().len()).then_some(index)
}

fn draw_grid(ctx: &mut BTerm, view: &GridView) {
    let now = view.now();
    let stats = view.stats();
    ctx.print_color(
        2,
        5,
        RGB::named(YELLOW),
        RGB::named(BLACK),
        format!(
            "Score {}   Level {}   Coins {}",
            stats.score, stats.level, stats.coins
        ),
    );

    for cell in view.cells() {
        let x = GRID_X + cell.point.x * CELL_W;
        let y = GRID_Y + cell.point.y * CELL_H;
        let fg = if cell.is_flashing(now) {
            RGB::named(YELLOW)
        } else if cell.is_bouncing(now) {
            tone_color(Tone::Accent)
        } else {
            RGB::named(DARK_GRAY)
        };
        ctx.draw_box(x, y, CELL_W - 2, CELL_H - 1, fg, RGB::named(BLACK));
        if cell.has_gem {
            ctx.set(
                x + CELL_W / 2 - 1,
                y + 1,
                tone_color(Tone::Accent),
                RGB::named(BLACK),
                to_cp437('o'),
            );
        }
    }

    view.particles().each_particle(|spark| {
        let x = GRID_X + (spark.x / (CELL_PX / CELL_W as f32)) as i32;
        let y = GRID_Y + (spark.y / (CELL_PX / CELL_H as f32)) as i32;
        if x < GRID_X || y < GRID_Y || x >= SIDE_X || y >= GRID_Y + PLAY_HEIGHT {
            return;
        }
        let glyph = if spark.size > 4.0 { '*' } else { '.' };
        let fg = tone_color(spark.tone);
        let faded = RGB::from_f32(fg.r * spark.alpha, fg.g * spark.alpha, fg.b * spark.alpha);
        ctx.set(x, y, faded, RGB::named(BLACK), to_cp437(glyph));
    });

    let button = if view.is_primary_popping() {
        RGB::named(WHITE)
    } else if view.is_pulsing() {
        RGB::named(GOLD)
    } else {
        RGB::named(ORANGE)
    };
    ctx.print_color(SIDE_X, GRID_Y, button, RGB::named(BLACK), "[Enter] PRIMARY");
    ctx.print(SIDE_X, GRID_Y + 2, "[i] inventory  [a] trophies");
    ctx.print(SIDE_X, GRID_Y + 3, "[s] settings   [Esc] close");
    ctx.print(SIDE_X, GRID_Y + 4, "[<-/->] swipe  click cells");

    let panels = view.panels();
    let mut y = GRID_Y + 7;
    if panels.inventory {
        ctx.draw_box(SIDE_X - 1, y - 1, 27, 6, RGB::named(GRAY), RGB::named(BLACK));
        ctx.print_color(SIDE_X, y, RGB::named(WHITE), RGB::named(BLACK), "Inventory");
        ctx.print(SIDE_X, y + 2, format!("Coins  {}", stats.coins));
        ctx.print(SIDE_X, y + 3, format!("Gems   {}", view.snapshot().gems));
        y += 8;
    }
    if panels.achievements {
        ctx.draw_box(SIDE_X - 1, y - 1, 27, 7, RGB::named(GRAY), RGB::named(BLACK));
        ctx.print_color(SIDE_X, y, RGB::named(WHITE), RGB::named(BLACK), "Achievements");
        for (row, (achievement, unlocked)) in view.achievements().iter().enumerate() {
            let (fg, mark) = if *unlocked {
                (RGB::named(LIGHT_GREEN), '+')
            } else {
                (RGB::named(DARK_GRAY), '-')
            };
            ctx.print_color(
                SIDE_X,
                y + 2 + row as i32,
                fg,
                RGB::named(BLACK),
                format!("{mark} {}", achievement.title),
            );
        }
        y += 9;
    }
    if panels.settings {
        ctx.draw_box(SIDE_X - 1, y - 1, 27, 3, RGB::named(GRAY), RGB::named(BLACK));
        ctx.print_color(SIDE_X, y, RGB::named(WHITE), RGB::named(BLACK), "Settings");
        ctx.print(SIDE_X, y + 1, "Sound: on   Haptics: on");
    }

    draw_banner(ctx, view.banner().text(), BANNER_Y);
}

fn draw_combat(ctx: &mut BTerm, view: &CombatView) {
    let now = view.now();
    let shake = if view.is_shaking() {
        if (now / 40) % 2 == 0 { -1 } else { 1 }
    } else {
        0
    };

    let hp_fg = if view.health_alert() {
        RGB::named(RED)
    } else {
        RGB::named(WHITE)
    };
    let energy_fg = if view.energy_alert() {
        RGB::named(RED)
    } else {
        RGB::named(YELLOW)
    };
    ctx.print_color(2, 5, hp_fg, RGB::named(BLACK), format!("HP {}", view.hp()));
    ctx.print_color(
        12,
        5,
        energy_fg,
        RGB::named(BLACK),
        format!("Energy {}/{}", view.energy(), view.max_energy()),
    );
    ctx.print_color(
        30,
        5,
        RGB::named(GOLD),
        RGB::named(BLACK),
        format!("Gold {}", view.gold()),
    );

    let card_x = 26 + shake;
    let card_y = 12;
    ctx.draw_box(card_x, card_y, 28, 14, RGB::named(INDIGO), RGB::named(BLACK));
    ctx.print_color(
        card_x + 2,
        card_y + 1,
        RGB::named(LIGHT_BLUE),
        RGB::named(BLACK),
        format!("Floor {}", view.level()),
    );
    let foe = view.foe();
    ctx.set(
        card_x + 14,
        card_y + 6,
        RGB::named(MAGENTA),
        RGB::named(BLACK),
        to_cp437(foe.glyph),
    );
    ctx.print_color(
        card_x + 2,
        card_y + 10,
        RGB::named(WHITE),
        RGB::named(BLACK),
        foe.name,
    );
    ctx.draw_bar_horizontal(
        card_x + 2,
        card_y + 11,
        24,
        view.enemy_hp(),
        view.enemy_max_hp().max(1),
        RGB::named(RED),
        RGB::named(DARK_GRAY),
    );
    ctx.print(
        card_x + 2,
        card_y + 12,
        format!("HP {}/{}", view.enemy_hp(), view.enemy_max_hp()),
    );

    let dice = view.dice();
    let face = dice
        .current_value
        .map(|v| format!("{v:>2}"))
        .unwrap_or_else(|| "--".to_string());
    let dice_fg = if dice.is_running {
        RGB::named(WHITE)
    } else if dice.is_locked {
        RGB::named(GOLD)
    } else {
        RGB::named(GRAY)
    };
    ctx.draw_box(60, 12, 8, 4, dice_fg, RGB::named(BLACK));
    ctx.print_color(63, 14, dice_fg, RGB::named(BLACK), face);

    ctx.print_color(
        10,
        38,
        RGB::named(WHITE),
        RGB::named(BLACK),
        "[A]ttack   [B]lock   [R]est   [D]ice   [I] backpack",
    );

    draw_effects(ctx, view.effects().active(), now);

    if view.inventory_open() {
        ctx.draw_box(14, 14, 50, 18, RGB::named(GRAY), RGB::named(BLACK));
        ctx.print_color(16, 15, RGB::named(WHITE), RGB::named(BLACK), "BACKPACK  [Esc] close");
        for (row, item) in view.backpack().iter().enumerate() {
            let fg = if item.equipped {
                RGB::named(LIGHT_GREEN)
            } else {
                RGB::named(WHITE)
            };
            let mark = if item.equipped { "(equipped)" } else { "" };
            ctx.print_color(
                16,
                17 + row as i32,
                fg,
                RGB::named(BLACK),
                format!("[{}] {} {} {mark}", row + 1, item.glyph, item.name),
            );
        }
        let first_empty = view.backpack().len() as i32;
        for slot in 0..view.empty_slots() as i32 {
            ctx.print_color(
                16,
                17 + first_empty + slot,
                RGB::named(DARK_GRAY),
                RGB::named(BLACK),
                "[ ] ...",
            );
        }
    }
}

fn draw_garden(ctx: &mut BTerm, view: &GardenView) {
    let critter = view.critter();
    ctx.print_color(
        2,
        5,
        RGB::named(LIGHT_GREEN),
        RGB::named(BLACK),
        format!("{} is {:?}", critter.name, critter.mood()),
    );
    ctx.print_color(
        40,
        5,
        RGB::named(GOLD),
        RGB::named(BLACK),
        format!("Coins {}", view.coins()),
    );

    let meters = [
        ("Hunger", critter.hunger, RGB::named(ORANGE)),
        ("Joy", critter.happiness, RGB::named(PINK)),
        ("Energy", critter.energy, RGB::named(YELLOW)),
    ];
    for (row, (label, value, fg)) in meters.iter().enumerate() {
        let y = PLAY_TOP + row as i32 * 2;
        ctx.print(2, y, format!("{label:<7}"));
        ctx.draw_bar_horizontal(10, y, 30, *value, 100, *fg, RGB::named(DARK_GRAY));
    }
    let bag = view.bag();
    ctx.print(
        44,
        PLAY_TOP,
        format!("Seeds {}  Snacks {}", bag.seeds, bag.snacks),
    );

    let plot_y = 24;
    for (idx, plot) in view.plots().iter().enumerate() {
        let x = 2 + idx as i32 * 12;
        let border = if idx == view.cursor() {
            RGB::named(WHITE)
        } else {
            RGB::named(DARK_GRAY)
        };
        ctx.draw_box(x, plot_y, 10, 5, border, RGB::named(BLACK));
        let (glyph, fg) = match plot.stage {
            PlotStage::Empty => ('_', RGB::from_u8(139, 90, 43)),
            PlotStage::Growing { growth } if growth < 50 => (',', RGB::named(GREEN)),
            PlotStage::Growing { .. } => ('v', RGB::named(GREEN)),
            PlotStage::Ripe => ('Y', RGB::named(GOLD)),
        };
        ctx.set(x + 5, plot_y + 2, fg, RGB::named(BLACK), to_cp437(glyph));
        if plot.moisture > 0 {
            ctx.print_color(
                x + 2,
                plot_y + 4,
                tone_color(Tone::Accent),
                RGB::named(BLACK),
                format!("{:>3}%", plot.moisture),
            );
        }
    }

    ctx.print(
        2,
        38,
        "[F]eed [P]lay [N] plant [W]ater [H]arvest [,/./1-6] plot [S]hop",
    );

    draw_effects(ctx, view.effects().active(), view.now());

    if view.shop_open() {
        ctx.draw_box(20, 12, 40, 10, RGB::named(GOLD), RGB::named(BLACK));
        ctx.print_color(22, 13, RGB::named(GOLD), RGB::named(BLACK), "SHOP  [Esc] close");
        for (row, offer) in view.offers().iter().enumerate() {
            let fg = if view.coins() >= offer.price {
                RGB::named(WHITE)
            } else {
                RGB::named(DARK_GRAY)
            };
            ctx.print_color(
                22,
                15 + row as i32 * 2,
                fg,
                RGB::named(BLACK),
                format!("[{}] {:<12} {:>3} coins", row + 1, offer.name, offer.price),
            );
        }
    }
}

fn draw_effects(ctx: &mut BTerm, effects: &[FloatingText], now: Millis) {
    let (width, _) = ctx.get_char_size();
    for effect in effects {
        let rise = (effect.progress(now) * 5.0) as i32;
        let x = (effect.anchor_x / 100.0 * width as f32) as i32 - effect.text.len() as i32 / 2;
        let y = PLAY_TOP + (effect.anchor_y / 100.0 * PLAY_HEIGHT as f32) as i32 - rise;
        ctx.print_color(
            x.max(0),
            y.max(PLAY_TOP),
            tone_color(effect.tone),
            RGB::named(BLACK),
            &effect.text,
        );
    }
}
