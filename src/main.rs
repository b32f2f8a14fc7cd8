mod render;

use std::{
    fs::File,
    path::{Path, PathBuf},
    sync::Mutex,
};

use anyhow::{Context, anyhow};
use bracket_terminal::prelude::*;
use clap::Parser;
use gamescreens::{
    Arcade, Key, Tuning,
    scripted_input::ScriptedInput,
    shell::Screen,
};
use render::{TabStrip, draw_screen, grid_cell_at};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "gamescreens", about = "Game UI screens in the terminal")]
struct Cli {
    /// JSON tuning file; built-in defaults when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value_t = 0x5EED)]
    seed: u64,
    /// Play an input script headlessly and print the final snapshot as JSON.
    #[arg(long)]
    script: Option<PathBuf>,
    /// Log file used while the terminal owns the screen.
    #[arg(long, default_value = "gamescreens.log")]
    log_file: PathBuf,
}

struct ArcadeState {
    arcade: Arcade,
    tabs: TabStrip,
    pending_ms: f32,
}

impl GameState for ArcadeState {
    fn tick(&mut self, ctx: &mut BTerm) {
        if ctx.key == Some(VirtualKeyCode::F10) {
            ctx.quit();
            return;
        }
        self.handle_input(ctx);

        self.pending_ms += ctx.frame_time_ms;
        let whole = self.pending_ms.floor();
        self.pending_ms -= whole;
        self.arcade.advance(whole as u64);

        ctx.cls();
        self.tabs.draw(ctx, self.arcade.kind(), self.arcade.clock());
        draw_screen(ctx, &self.arcade);
    }
}

impl ArcadeState {
    fn handle_input(&mut self, ctx: &mut BTerm) {
        if let Some(key) = ctx.key.and_then(map_key) {
            self.arcade.press(key);
        }
        if ctx.left_click {
            let cell = match self.arcade.screen() {
                Screen::Grid(view) => grid_cell_at(view, ctx.mouse_point()),
                _ => None,
            };
            if let Some(cell) = cell {
                self.arcade.tap(cell);
            }
        }
    }
}

fn map_key(key: VirtualKeyCode) -> Option<Key> {
    use VirtualKeyCode::*;
    let key = match key {
        Escape => Key::Escape,
        Return | NumpadEnter => Key::Enter,
        Space => Key::Space,
        Tab => Key::Tab,
        Left => Key::Left,
        Right => Key::Right,
        Comma => Key::Char(','),
        Period => Key::Char('.'),
        Key1 => Key::Char('1'),
        Key2 => Key::Char('2'),
        Key3 => Key::Char('3'),
        Key4 => Key::Char('4'),
        Key5 => Key::Char('5'),
        Key6 => Key::Char('6'),
        Key7 => Key::Char('7'),
        Key8 => Key::Char('8'),
        Key9 => Key::Char('9'),
        A => Key::Char('a'),
        B => Key::Char('b'),
        D => Key::Char('d'),
        F => Key::Char('f'),
        H => Key::Char('h'),
        I => Key::Char('i'),
        N => Key::Char('n'),
        P => Key::Char('p'),
        R => Key::Char('r'),
        S => Key::Char('s'),
        W => Key::Char('w'),
        _ => return None,
    };
    Some(key)
}

fn load_tuning(cli: &Cli) -> anyhow::Result<Tuning> {
    match &cli.config {
        Some(path) => Ok(Tuning::load(path)?),
        None => Ok(Tuning::default()),
    }
}

fn run_script(cli: &Cli, path: &Path) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let tuning = load_tuning(cli)?;
    let mut script = ScriptedInput::from_file(path)?;
    let mut arcade = Arcade::new(tuning, cli.seed);
    info!(steps = script.len(), seed = cli.seed, "playing script");
    script.play(&mut arcade);
    println!("{}", serde_json::to_string_pretty(&arcade.snapshot())?);
    Ok(())
}

fn run_terminal(cli: &Cli) -> anyhow::Result<()> {
    let log = File::create(&cli.log_file)
        .with_context(|| format!("failed to create log file {}", cli.log_file.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_ansi(false)
        .with_writer(Mutex::new(log))
        .init();

    let tuning = load_tuning(cli)?;
    let context = BTermBuilder::simple80x50()
        .with_title("Game Screens")
        .with_fps_cap(60.0)
        .build()
        .map_err(|e| anyhow!("failed to open terminal: {e}"))?;
    let state = ArcadeState {
        arcade: Arcade::new(tuning, cli.seed),
        tabs: TabStrip::new(),
        pending_ms: 0.0,
    };
    info!(seed = cli.seed, "terminal session started");
    main_loop(context, state).map_err(|e| anyhow!("terminal loop failed: {e}"))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match &cli.script {
        Some(path) => run_script(&cli, path),
        None => run_terminal(&cli),
    }
}
