pub mod config;
pub mod data;
pub mod effects;
pub mod particles;
pub mod reveal;
pub mod screens;
pub mod scripted_input;
pub mod shell;
pub mod timeline;

pub use config::{ConfigError, Tuning};
pub use reveal::{RevealSequencer, RevealTiming, SequenceState};
pub use screens::{Key, ScreenKind};
pub use shell::{Arcade, ArcadeSnapshot};
pub use timeline::{Millis, Timeline};
