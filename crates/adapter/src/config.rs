//! Adapter configuration, read from `ARCADE_*` environment variables

use std::env;

use arcade_types::{
    DEFAULT_LIFE_HEIGHT, DEFAULT_LIFE_WIDTH, DEFAULT_MINES_COUNT, DEFAULT_MINES_HEIGHT,
    DEFAULT_MINES_WIDTH, DEFAULT_SNAKE_HEIGHT, DEFAULT_SNAKE_WIDTH, MAX_GRID_SIDE, MAX_MINES_SIDE,
    MIN_MINES_SIDE,
};

pub const PROTOCOL_VERSION: &str = "1.0.0";

/// Longest accepted input line, newline excluded
pub const DEFAULT_MAX_LINE_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterConfig {
    /// 0 seeds from OS entropy
    pub seed: u64,
    pub minesweeper_width: usize,
    pub minesweeper_height: usize,
    pub minesweeper_mines: usize,
    pub snake_width: usize,
    pub snake_height: usize,
    pub life_width: usize,
    pub life_height: usize,
    pub max_line_bytes: usize,
    pub protocol_version: String,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            minesweeper_width: DEFAULT_MINES_WIDTH,
            minesweeper_height: DEFAULT_MINES_HEIGHT,
            minesweeper_mines: DEFAULT_MINES_COUNT,
            snake_width: DEFAULT_SNAKE_WIDTH,
            snake_height: DEFAULT_SNAKE_HEIGHT,
            life_width: DEFAULT_LIFE_WIDTH,
            life_height: DEFAULT_LIFE_HEIGHT,
            max_line_bytes: DEFAULT_MAX_LINE_BYTES,
            protocol_version: PROTOCOL_VERSION.to_string(),
        }
    }
}

impl AdapterConfig {
    /// Create from environment variables; unset or unparsable values keep their defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`AdapterConfig::from_env`] with an arbitrary key lookup.
    ///
    /// Board sides are clamped to the sizes the engines accept and the mine
    /// count to what the board can hold.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let parsed = |key: &str, default: usize| {
            lookup(key)
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(default)
        };
        let side = |key: &str, default: usize, min: usize, max: usize| {
            parsed(key, default).clamp(min, max)
        };

        let seed = lookup("ARCADE_SEED")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.seed);

        let max_line_bytes = match parsed("ARCADE_MAX_LINE_BYTES", defaults.max_line_bytes) {
            0 => defaults.max_line_bytes,
            n => n,
        };

        let ms = |key: &str, default: usize| side(key, default, MIN_MINES_SIDE, MAX_MINES_SIDE);
        let grid = |key: &str, default: usize| side(key, default, 1, MAX_GRID_SIDE);

        let minesweeper_width = ms("ARCADE_MS_WIDTH", defaults.minesweeper_width);
        let minesweeper_height = ms("ARCADE_MS_HEIGHT", defaults.minesweeper_height);
        let minesweeper_mines = parsed("ARCADE_MS_MINES", defaults.minesweeper_mines)
            .clamp(1, minesweeper_width * minesweeper_height - 1);

        Self {
            seed,
            minesweeper_width,
            minesweeper_height,
            minesweeper_mines,
            snake_width: grid("ARCADE_SNAKE_WIDTH", defaults.snake_width),
            snake_height: grid("ARCADE_SNAKE_HEIGHT", defaults.snake_height),
            life_width: grid("ARCADE_LIFE_WIDTH", defaults.life_width),
            life_height: grid("ARCADE_LIFE_HEIGHT", defaults.life_height),
            max_line_bytes,
            protocol_version: defaults.protocol_version,
        }
    }
}
