//! Core game logic - pure, deterministic, and testable
//!
//! Every engine in this crate is a value type with transition methods that
//! take `&self` and return the next state. Nothing here does I/O. Randomness
//! and wall-clock time come in through the [`rng::RandomSource`] and
//! [`clock::Clock`] traits, so the same seed replays the same game.
//!
//! # Module Structure
//!
//! - [`grid`]: generic row-major 2D storage with bounded and toroidal neighbours
//! - [`rng`]: the random source trait, a seeded LCG, an entropy-seeded source, Fisher-Yates
//! - [`clock`]: wall-clock trait with a system and a frozen implementation
//! - [`minesweeper`]: deferred mine placement, flood-fill reveal, flags
//! - [`tetris`]: board, tetrominoes, collision, rotation, spawn/lock cycle
//! - [`snake`]: grid movement, food, growth
//! - [`life`]: Conway's Game of Life on a torus with preset patterns
//! - [`blackjack`]: shoe, hand valuation, one betting round
//!
//! # Invalid input
//!
//! Engines never return errors. Off-board coordinates, moves after the game
//! ended, and out-of-phase actions return the state unchanged; sizes and counts
//! are clamped into range.
//!
//! # Example
//!
//! ```
//! use arcade_core::clock::FixedClock;
//! use arcade_core::minesweeper::{self, MinesweeperStatus};
//! use arcade_core::rng::SimpleRng;
//!
//! let mut rng = SimpleRng::new(12345);
//! let clock = FixedClock(0);
//!
//! let game = minesweeper::create_initial_state(10, 10, 10);
//! let game = minesweeper::reveal_cell(&game, 0, 0, &mut rng, &clock);
//!
//! assert_eq!(game.status(), MinesweeperStatus::Playing);
//! assert!(minesweeper::get_cell(&game, 0, 0).unwrap().is_revealed);
//! ```

pub mod blackjack;
pub mod clock;
pub mod grid;
pub mod life;
pub mod minesweeper;
pub mod rng;
pub mod snake;
pub mod tetris;

pub use arcade_types as types;

// Re-export commonly used types for convenience
pub use blackjack::{BlackjackPhase, BlackjackState, Card, RoundOutcome};
pub use clock::{Clock, FixedClock, SystemClock};
pub use grid::Grid;
pub use life::{LifeSpeed, LifeState, Pattern};
pub use minesweeper::{MinesweeperState, MinesweeperStatus};
pub use rng::{shuffle, RandomSource, SimpleRng, SystemRng};
pub use snake::SnakeState;
pub use tetris::{Board, TetrisSnapshot, TetrisState, TetrisStatus};
