//! Snapshot module - a read-only, serializable view of a Tetris game
//!
//! The board is flattened to piece codes with the falling piece painted in,
//! so a renderer or the JSON adapter never has to know about `Piece`.

use serde::Serialize;

use super::game_state::{TetrisState, TetrisStatus};
use super::pieces::Shape;
use crate::types::{TetrominoType, BOARD_HEIGHT, BOARD_WIDTH};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveSnapshot {
    pub kind: TetrominoType,
    pub shape: Shape,
    pub x: i32,
    pub y: i32,
}

/// What a renderer needs to draw one frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TetrisSnapshot {
    /// Piece codes (0 = empty) with the active piece painted in
    pub board: [[u8; BOARD_WIDTH]; BOARD_HEIGHT],
    pub active: Option<ActiveSnapshot>,
    pub next: TetrominoType,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub status: TetrisStatus,
    pub paused: bool,
    pub game_over: bool,
    pub drop_interval_ms: u32,
    /// Rows cleared by the most recent lock
    pub last_clear_rows: Vec<usize>,
}

impl TetrisSnapshot {
    pub fn from_state(state: &TetrisState) -> Self {
        let mut board = state.board().to_codes();
        if let Some(active) = state.active() {
            let code = active.kind.code();
            for (x, y) in active.cells() {
                if (0..BOARD_WIDTH as i32).contains(&x) && (0..BOARD_HEIGHT as i32).contains(&y) {
                    board[y as usize][x as usize] = code;
                }
            }
        }

        Self {
            board,
            active: state.active().map(|p| ActiveSnapshot {
                kind: p.kind,
                shape: p.shape.clone(),
                x: p.x,
                y: p.y,
            }),
            next: state.next(),
            score: state.score(),
            level: state.level(),
            lines: state.lines(),
            status: state.status(),
            paused: state.paused(),
            game_over: state.game_over(),
            drop_interval_ms: state.drop_interval_ms(),
            last_clear_rows: state
                .last_clear()
                .map(|c| c.rows.clone())
                .unwrap_or_default(),
        }
    }

    pub fn playable(&self) -> bool {
        !self.game_over && !self.paused
    }
}
