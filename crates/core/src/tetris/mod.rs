//! Tetris engine
//!
//! - [`board`]: 10x20 playfield, collision detection, line clearing
//! - [`pieces`]: tetromino matrices, clockwise matrix rotation, spawn placement
//! - [`scoring`]: line clear points, level formula, gravity interval
//! - [`game_state`]: the falling piece and the spawn/lock cycle
//! - [`snapshot`]: the serializable frame handed to renderers
//!
//! # Rules
//!
//! - Pieces are drawn uniformly at random, with a one-piece preview
//! - Rotation is clockwise only; a blocked rotation tries one column right,
//!   then one column left, then gives up
//! - A blocked downward move locks the piece
//! - Line clears score `[0, 100, 300, 500, 800][lines] * level`
//! - A spawn that collides ends the game
//!
//! # Example
//!
//! ```
//! use arcade_core::rng::SimpleRng;
//! use arcade_core::tetris::TetrisState;
//! use arcade_core::types::TetrisAction;
//!
//! let mut rng = SimpleRng::new(12345);
//! let game = TetrisState::new(&mut rng);
//!
//! let game = game.apply_action(TetrisAction::MoveRight, &mut rng);
//! let game = game.apply_action(TetrisAction::Rotate, &mut rng);
//! let game = game.apply_action(TetrisAction::HardDrop, &mut rng);
//!
//! assert_eq!(game.board().filled_count(), 4);
//! assert!(!game.game_over());
//! ```

pub mod board;
pub mod game_state;
pub mod pieces;
pub mod scoring;
pub mod snapshot;

pub use board::{check_collision, create_empty_board, Board, CellValue, LockedCell};
pub use game_state::{LineClear, TetrisState, TetrisStatus};
pub use pieces::{random_tetromino, rotate_matrix, tetromino, Piece, Shape, TetrominoDef, TETROMINOES};
pub use scoring::{calculate_level, calculate_line_score, drop_interval_ms};
pub use snapshot::{ActiveSnapshot, TetrisSnapshot};
