//! Headless input scripts.
//!
//! One directive per line: `+<ms>` advances the clock, `@<n>` taps grid cell
//! `n`, `swipe <dx> <dy>` swipes, `tab`/`esc`/`enter`/`space`/`left`/`right`
//! press those keys, and anything else is a run of character key presses.
//! Blank lines and `#` comments are skipped.

use std::{
    fs,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::debug;

use crate::{screens::Key, shell::Arcade, timeline::Millis};

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read script {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: {reason}")]
    BadLine { line: usize, reason: String },
}

#[derive(Clone, Debug, PartialEq)]
pub enum ScriptStep {
    Advance(Millis),
    Press(Key),
    Tap(usize),
    Swipe(f32, f32),
}

pub struct ScriptedInput {
    steps: Vec<ScriptStep>,
    current_step_index: usize,
}

impl ScriptedInput {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ScriptError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&source)
    }

    pub fn parse(source: &str) -> Result<Self, ScriptError> {
        let mut steps = Vec::new();
        for (idx, raw) in source.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let bad = |reason: &str| ScriptError::BadLine {
                line: idx + 1,
                reason: reason.to_string(),
            };

            if let Some(ms) = line.strip_prefix('+') {
                let ms = ms.trim().parse().map_err(|_| bad("expected +<ms>"))?;
                steps.push(ScriptStep::Advance(ms));
            } else if let Some(cell) = line.strip_prefix('@') {
                let cell = cell.trim().parse().map_err(|_| bad("expected @<cell>"))?;
                steps.push(ScriptStep::Tap(cell));
            } else if line.split_whitespace().next() == Some("swipe") {
                let parts: Vec<f32> = line
                    .split_whitespace()
                    .skip(1)
                    .map(str::parse::<f32>)
                    .collect::<Result<_, _>>()
                    .map_err(|_| bad("expected swipe <dx> <dy>"))?;
                let [dx, dy] = parts.as_slice() else {
                    return Err(bad("expected swipe <dx> <dy>"));
                };
                steps.push(ScriptStep::Swipe(*dx, *dy));
            } else if let Some(key) = named_key(line) {
                steps.push(ScriptStep::Press(key));
            } else {
                steps.extend(
                    line.chars()
                        .filter(|c| !c.is_whitespace())
                        .map(|c| ScriptStep::Press(Key::Char(c))),
                );
            }
        }

        Ok(Self {
            steps,
            current_step_index: 0,
        })
    }

    pub fn next_step(&mut self) -> Option<ScriptStep> {
        let step = self.steps.get(self.current_step_index).cloned()?;
        self.current_step_index += 1;
        Some(step)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Plays every remaining step against `arcade`.
    pub fn play(&mut self, arcade: &mut Arcade) {
        while let Some(step) = self.next_step() {
            debug!(?step, clock = arcade.clock(), "script step");
            match step {
                ScriptStep::Advance(ms) => arcade.advance(ms),
                ScriptStep::Press(key) => arcade.press(key),
                ScriptStep::Tap(cell) => {
                    arcade.tap(cell);
                }
                ScriptStep::Swipe(dx, dy) => arcade.swipe(dx, dy),
            }
        }
    }
}

fn named_key(word: &str) -> Option<Key> {
    match word.to_ascii_lowercase().as_str() {
        "tab" => Some(Key::Tab),
        "esc" | "escape" => Some(Key::Escape),
        "enter" => Some(Key::Enter),
        "space" => Some(Key::Space),
        "left" => Some(Key::Left),
        "right" => Some(Key::Right),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_directive() {
        let mut script = ScriptedInput::parse(
            "# warm up\n+2000\n@12\nswipe -150 0\n\ntab\nab r\n",
        )
        .expect("valid script");
        assert_eq!(script.len(), 7);
        assert_eq!(script.next_step(), Some(ScriptStep::Advance(2000)));
        assert_eq!(script.next_step(), Some(ScriptStep::Tap(12)));
        assert_eq!(script.next_step(), Some(ScriptStep::Swipe(-150.0, 0.0)));
        assert_eq!(script.next_step(), Some(ScriptStep::Press(Key::Tab)));
        assert_eq!(script.next_step(), Some(ScriptStep::Press(Key::Char('a'))));
        assert_eq!(script.next_step(), Some(ScriptStep::Press(Key::Char('b'))));
        assert_eq!(script.next_step(), Some(ScriptStep::Press(Key::Char('r'))));
        assert_eq!(script.next_step(), None);
    }

    #[test]
    fn only_a_whole_swipe_word_is_a_swipe() {
        let mut script = ScriptedInput::parse("swipea\nswipe 120 -4\n").expect("valid script");
        let steps: Vec<ScriptStep> = std::iter::from_fn(|| script.next_step()).collect();
        assert_eq!(
            steps,
            vec![
                ScriptStep::Press(Key::Char('s')),
                ScriptStep::Press(Key::Char('w')),
                ScriptStep::Press(Key::Char('i')),
                ScriptStep::Press(Key::Char('p')),
                ScriptStep::Press(Key::Char('e')),
                ScriptStep::Press(Key::Char('a')),
                ScriptStep::Swipe(120.0, -4.0),
            ]
        );
    }

    #[test]
    fn reports_the_offending_line() {
        let err = ScriptedInput::parse("+10\n+soon\n").err().expect("bad line");
        assert!(matches!(err, ScriptError::BadLine { line: 2, .. }));
        let err = ScriptedInput::parse("swipe 1\n").err().expect("bad swipe");
        assert!(matches!(err, ScriptError::BadLine { line: 1, .. }));
    }
}
