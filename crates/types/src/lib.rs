//! Shared types and constants for the arcade engines.
//!
//! Everything here is plain data: dimensions, timing tables, and the small
//! enums that both the engines and the adapter protocol speak. Nothing in this
//! crate touches randomness, time, or I/O.
//!
//! # Tetris playfield
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19, top to bottom)
//! - **Spawn**: horizontally centred for the piece's matrix width, row 0
//!
//! # Gravity
//!
//! Gravity interval in milliseconds per row, by level (levels start at 1):
//!
//! | Level | Interval |
//! |-------|----------|
//! | 1 | 800ms |
//! | 2 | 750ms |
//! | 5 | 600ms |
//! | 15+ | 100ms (floor) |
//!
//! # Examples
//!
//! ```
//! use arcade_types::{Direction, TetrisAction, TetrominoType, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! let piece = TetrominoType::from_str("t").unwrap();
//! assert_eq!(piece, TetrominoType::T);
//!
//! let action = TetrisAction::from_str("hardDrop").unwrap();
//! assert_eq!(action, TetrisAction::HardDrop);
//!
//! assert_eq!(Direction::Up.opposite(), Direction::Down);
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

use serde::{Deserialize, Serialize};

/// Tetris board width in cells (10 columns)
pub const BOARD_WIDTH: usize = 10;

/// Tetris board height in cells (20 rows)
pub const BOARD_HEIGHT: usize = 20;

/// Gravity interval at level 1 (milliseconds per row)
pub const BASE_DROP_MS: u32 = 800;

/// Gravity speed-up per level
pub const DROP_STEP_MS: u32 = 50;

/// Fastest gravity interval
pub const DROP_INTERVAL_MIN_MS: u32 = 100;

/// Line clear scoring table, indexed by lines cleared in one lock.
///
/// Points are multiplied by the current level.
pub const LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

/// Per-line weight used by the level formula.
pub const LEVEL_LINE_WEIGHT: u32 = 100;

/// Points per level in the level formula.
pub const LEVEL_SCORE_STEP: u32 = 1000;

/// Minesweeper defaults (10x10, 15 mines)
pub const DEFAULT_MINES_WIDTH: usize = 10;
pub const DEFAULT_MINES_HEIGHT: usize = 10;
pub const DEFAULT_MINES_COUNT: usize = 15;

/// Smallest Minesweeper side length
pub const MIN_MINES_SIDE: usize = 2;

/// Largest Minesweeper side length
pub const MAX_MINES_SIDE: usize = 100;

/// Largest side length for the Snake and Life grids
pub const MAX_GRID_SIDE: usize = 256;

/// Snake defaults
pub const DEFAULT_SNAKE_WIDTH: usize = 20;
pub const DEFAULT_SNAKE_HEIGHT: usize = 20;
pub const SNAKE_INITIAL_SPEED_MS: u32 = 150;
pub const SNAKE_SPEED_INCREMENT_MS: u32 = 5;
pub const SNAKE_MIN_SPEED_MS: u32 = 50;
pub const SNAKE_FOOD_SCORE: u32 = 10;

/// Life defaults
pub const DEFAULT_LIFE_WIDTH: usize = 40;
pub const DEFAULT_LIFE_HEIGHT: usize = 30;

/// Blackjack defaults
pub const DEFAULT_SHOE_DECKS: usize = 6;
pub const SHOE_RESHUFFLE_BELOW: usize = 10;
pub const STARTING_CHIPS: u64 = 1000;
pub const DEALER_STANDS_ON: u32 = 17;


/// The seven tetromino kinds
///
/// Each kind has a distinct matrix and colour:
/// - **I**: Cyan, 4x4
/// - **J**: Blue, 3x3
/// - **L**: Orange, 3x3
/// - **O**: Yellow, 2x2
/// - **S**: Green, 3x3
/// - **T**: Purple, 3x3
/// - **Z**: Red, 3x3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TetrominoType {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl TetrominoType {
    /// All kinds in table order.
    pub const ALL: [TetrominoType; 7] = [
        TetrominoType::I,
        TetrominoType::J,
        TetrominoType::L,
        TetrominoType::O,
        TetrominoType::S,
        TetrominoType::T,
        TetrominoType::Z,
    ];

    /// Parse from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use arcade_types::TetrominoType;
    ///
    /// assert_eq!(TetrominoType::from_str("i"), Some(TetrominoType::I));
    /// assert_eq!(TetrominoType::from_str("Z"), Some(TetrominoType::Z));
    /// assert_eq!(TetrominoType::from_str("q"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(TetrominoType::I),
            "j" => Some(TetrominoType::J),
            "l" => Some(TetrominoType::L),
            "o" => Some(TetrominoType::O),
            "s" => Some(TetrominoType::S),
            "t" => Some(TetrominoType::T),
            "z" => Some(TetrominoType::Z),
            _ => None,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            TetrominoType::I => "i",
            TetrominoType::J => "j",
            TetrominoType::L => "l",
            TetrominoType::O => "o",
            TetrominoType::S => "s",
            TetrominoType::T => "t",
            TetrominoType::Z => "z",
        }
    }

    /// Non-zero cell code used in compact board snapshots (1-7).
    pub fn code(&self) -> u8 {
        match self {
            TetrominoType::I => 1,
            TetrominoType::J => 2,
            TetrominoType::L => 3,
            TetrominoType::O => 4,
            TetrominoType::S => 5,
            TetrominoType::T => 6,
            TetrominoType::Z => 7,
        }
    }
}

/// Colour tag carried by a tetromino and by the cells it locks into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceColor {
    Cyan,
    Blue,
    Orange,
    Yellow,
    Green,
    Purple,
    Red,
}

impl PieceColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceColor::Cyan => "cyan",
            PieceColor::Blue => "blue",
            PieceColor::Orange => "orange",
            PieceColor::Yellow => "yellow",
            PieceColor::Green => "green",
            PieceColor::Purple => "purple",
            PieceColor::Red => "red",
        }
    }
}

/// Tetris actions an input layer can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TetrisAction {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Move piece one cell down (locks when blocked)
    SoftDrop,
    /// Drop to the lowest free row and lock
    HardDrop,
    /// Rotate 90° clockwise with a one-column kick
    Rotate,
    /// Toggle pause
    Pause,
    /// Start a fresh game
    Restart,
}

impl TetrisAction {
    /// Parse action from string (for the adapter protocol)
    ///
    /// # Examples
    ///
    /// ```
    /// use arcade_types::TetrisAction;
    ///
    /// assert_eq!(TetrisAction::from_str("moveLeft"), Some(TetrisAction::MoveLeft));
    /// assert_eq!(TetrisAction::from_str("ROTATE"), Some(TetrisAction::Rotate));
    /// assert_eq!(TetrisAction::from_str("hold"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(TetrisAction::MoveLeft),
            "moveright" => Some(TetrisAction::MoveRight),
            "softdrop" => Some(TetrisAction::SoftDrop),
            "harddrop" => Some(TetrisAction::HardDrop),
            "rotate" | "rotatecw" => Some(TetrisAction::Rotate),
            "pause" => Some(TetrisAction::Pause),
            "restart" => Some(TetrisAction::Restart),
            _ => None,
        }
    }

    /// Convert to camelCase string for the adapter protocol
    pub fn as_str(&self) -> &'static str {
        match self {
            TetrisAction::MoveLeft => "moveLeft",
            TetrisAction::MoveRight => "moveRight",
            TetrisAction::SoftDrop => "softDrop",
            TetrisAction::HardDrop => "hardDrop",
            TetrisAction::Rotate => "rotate",
            TetrisAction::Pause => "pause",
            TetrisAction::Restart => "restart",
        }
    }
}

/// Heading on a grid (screen coordinates, y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// The reverse heading
    ///
    /// ```
    /// use arcade_types::Direction;
    ///
    /// assert_eq!(Direction::Left.opposite(), Direction::Right);
    /// ```
    pub fn opposite(&self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Unit step `(dx, dy)`
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Integer grid coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// This point moved one step in `direction`
    pub fn step(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self::new(self.x + dx, self.y + dy)
    }
}
