//! Game state module - falling piece, spawn/lock cycle, score and level
//!
//! `TetrisState` is a value: every transition borrows the current state and
//! returns the next one. Transitions that can lock a piece take the random
//! source used to draw the new preview piece.

use serde::Serialize;

use super::board::{Board, LockedCell};
use super::pieces::{random_tetromino, rotate_matrix, Piece};
use super::scoring::{calculate_level, calculate_line_score, drop_interval_ms};
use super::snapshot::TetrisSnapshot;
use crate::rng::RandomSource;
use crate::types::{TetrisAction, TetrominoType, BOARD_HEIGHT};

/// Horizontal offsets tried in order when a rotation collides
const ROTATION_KICKS: [i32; 3] = [0, 1, -1];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TetrisStatus {
    /// A piece is falling
    Falling,
    /// The last spawned piece collided at its spawn position
    GameOver,
}

/// Rows removed by one lock
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineClear {
    /// Cleared row indices before the shift, bottom to top
    pub rows: Vec<usize>,
    /// Points awarded for the clear
    pub points: u32,
}

/// Complete Tetris game state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TetrisState {
    board: Board,
    active: Option<Piece>,
    next: TetrominoType,
    score: u32,
    level: u32,
    lines: u32,
    status: TetrisStatus,
    paused: bool,
    /// Set by every lock: `Some` when that lock cleared rows
    last_clear: Option<LineClear>,
}

impl TetrisState {
    /// New game: empty board, level 1, first piece spawned
    pub fn new<R: RandomSource + ?Sized>(rng: &mut R) -> Self {
        let first = random_tetromino(rng);
        let next = random_tetromino(rng);
        Self::with_board(Board::new(), first, next)
    }

    /// Game on an existing board with `active` spawned and `next` previewed
    pub fn with_board(board: Board, active: TetrominoType, next: TetrominoType) -> Self {
        let state = Self {
            board,
            active: None,
            next,
            score: 0,
            level: 1,
            lines: 0,
            status: TetrisStatus::Falling,
            paused: false,
            last_clear: None,
        };
        state.spawn(active)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active(&self) -> Option<&Piece> {
        self.active.as_ref()
    }

    pub fn next(&self) -> TetrominoType {
        self.next
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn status(&self) -> TetrisStatus {
        self.status
    }

    pub fn game_over(&self) -> bool {
        self.status == TetrisStatus::GameOver
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn last_clear(&self) -> Option<&LineClear> {
        self.last_clear.as_ref()
    }

    /// Gravity interval for the current level
    pub fn drop_interval_ms(&self) -> u32 {
        drop_interval_ms(self.level)
    }

    /// Place a fresh `kind` at the spawn position.
    ///
    /// If it collides the game is over; the piece stays as the active piece so
    /// it can still be drawn.
    pub fn spawn(&self, kind: TetrominoType) -> Self {
        let mut next = self.clone();
        let piece = Piece::spawn(kind);
        if next.board.collides(&piece.shape, piece.x, piece.y) {
            next.status = TetrisStatus::GameOver;
        }
        next.active = Some(piece);
        next
    }

    /// Lock the active piece, clear full rows, score, and spawn the preview piece
    pub fn lock<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Self {
        let Some(active) = &self.active else {
            return self.clone();
        };

        let mut next = self.clone();
        let cell = LockedCell {
            kind: active.kind,
            color: active.color(),
        };
        next.board.paint(&active.shape, active.x, active.y, cell);

        let cleared_rows = next.board.clear_full_rows();
        let lines_cleared = cleared_rows.len();

        if lines_cleared > 0 {
            let points = calculate_line_score(lines_cleared, self.level);
            next.score = self.score.saturating_add(points);
            next.level = calculate_level(self.score, lines_cleared as u32);
            next.lines = self.lines.saturating_add(lines_cleared as u32);
            next.last_clear = Some(LineClear {
                rows: cleared_rows.to_vec(),
                points,
            });
        } else {
            next.last_clear = None;
        }

        let upcoming = next.next;
        next.next = random_tetromino(rng);
        next.spawn(upcoming)
    }

    fn can_act(&self) -> bool {
        self.active.is_some() && !self.paused && self.status == TetrisStatus::Falling
    }

    /// Shift the active piece by (dx, dy).
    ///
    /// A blocked move is a no-op, except that a blocked downward move locks the
    /// piece.
    pub fn move_by<R: RandomSource + ?Sized>(&self, dx: i32, dy: i32, rng: &mut R) -> Self {
        let Some(active) = self.active.as_ref().filter(|_| self.can_act()) else {
            return self.clone();
        };

        let moved = active.shifted(dx, dy);
        if self.board.collides(&moved.shape, moved.x, moved.y) {
            if dy > 0 {
                return self.lock(rng);
            }
            return self.clone();
        }

        let mut next = self.clone();
        next.active = Some(moved);
        next
    }

    /// Rotate clockwise, kicking one column right then one column left if needed
    pub fn rotate(&self) -> Self {
        let Some(active) = self.active.as_ref().filter(|_| self.can_act()) else {
            return self.clone();
        };

        let shape = rotate_matrix(&active.shape);
        for kick in ROTATION_KICKS {
            let x = active.x + kick;
            if !self.board.collides(&shape, x, active.y) {
                let mut next = self.clone();
                next.active = Some(Piece {
                    kind: active.kind,
                    shape,
                    x,
                    y: active.y,
                });
                return next;
            }
        }
        self.clone()
    }

    /// Row the active piece would land on
    pub fn drop_y(&self) -> Option<i32> {
        let active = self.active.as_ref()?;
        let mut y = active.y;
        while y < BOARD_HEIGHT as i32 && !self.board.collides(&active.shape, active.x, y + 1) {
            y += 1;
        }
        Some(y)
    }

    /// Drop straight down and lock
    pub fn hard_drop<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Self {
        if !self.can_act() {
            return self.clone();
        }
        let Some(y) = self.drop_y() else {
            return self.clone();
        };

        let mut dropped = self.clone();
        if let Some(piece) = dropped.active.as_mut() {
            piece.y = y;
        }
        dropped.lock(rng)
    }

    /// One gravity step
    pub fn tick<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Self {
        self.move_by(0, 1, rng)
    }

    /// Flip pause; ignored once the game is over
    pub fn toggle_pause(&self) -> Self {
        let mut next = self.clone();
        if self.status != TetrisStatus::GameOver {
            next.paused = !self.paused;
        }
        next
    }

    /// Apply a game action
    pub fn apply_action<R: RandomSource + ?Sized>(&self, action: TetrisAction, rng: &mut R) -> Self {
        match action {
            TetrisAction::MoveLeft => self.move_by(-1, 0, rng),
            TetrisAction::MoveRight => self.move_by(1, 0, rng),
            TetrisAction::SoftDrop => self.move_by(0, 1, rng),
            TetrisAction::HardDrop => self.hard_drop(rng),
            TetrisAction::Rotate => self.rotate(),
            TetrisAction::Pause => self.toggle_pause(),
            TetrisAction::Restart => Self::new(rng),
        }
    }

    /// Presentation view with the active piece overlaid on the board
    pub fn snapshot(&self) -> TetrisSnapshot {
        TetrisSnapshot::from_state(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SimpleRng;
    use crate::tetris::pieces::tetromino;
    use crate::types::BOARD_WIDTH;

    fn filled(kind: TetrominoType) -> Option<LockedCell> {
        Some(LockedCell {
            kind,
            color: tetromino(kind).color,
        })
    }

    #[test]
    fn test_new_game_state() {
        let mut rng = SimpleRng::new(12345);
        let state = TetrisState::new(&mut rng);

        assert_eq!(state.status(), TetrisStatus::Falling);
        assert!(!state.paused());
        assert_eq!(state.score(), 0);
        assert_eq!(state.level(), 1);
        assert_eq!(state.lines(), 0);
        assert!(state.active().is_some());
        assert_eq!(state.board().filled_count(), 0);
        assert_eq!(state.active().unwrap().y, 0);
    }

    #[test]
    fn test_spawn_is_deterministic_for_seed() {
        let a = TetrisState::new(&mut SimpleRng::new(9));
        let b = TetrisState::new(&mut SimpleRng::new(9));
        assert_eq!(a, b);
    }

    #[test]
    fn test_spawn_collision_is_game_over() {
        let mut board = Board::new();
        board.set(4, 0, filled(TetrominoType::Z));
        let state = TetrisState::with_board(board, TetrominoType::O, TetrominoType::I);

        assert!(state.game_over());
        // The colliding piece is still exposed
        let active = state.active().unwrap();
        assert_eq!(active.kind, TetrominoType::O);
        assert_eq!((active.x, active.y), (4, 0));
    }

    #[test]
    fn test_move_left_right() {
        let state = TetrisState::with_board(Board::new(), TetrominoType::T, TetrominoType::O);
        let mut rng = SimpleRng::new(1);

        let left = state.move_by(-1, 0, &mut rng);
        assert_eq!(left.active().unwrap().x, 2);
        let right = state.move_by(1, 0, &mut rng);
        assert_eq!(right.active().unwrap().x, 4);
        // Input is untouched
        assert_eq!(state.active().unwrap().x, 3);
    }

    #[test]
    fn test_blocked_lateral_move_is_noop() {
        let mut state = TetrisState::with_board(Board::new(), TetrominoType::O, TetrominoType::O);
        let mut rng = SimpleRng::new(1);
        for _ in 0..10 {
            state = state.move_by(-1, 0, &mut rng);
        }
        assert_eq!(state.active().unwrap().x, 0);
        assert_eq!(state.move_by(-1, 0, &mut rng), state);
    }

    #[test]
    fn test_blocked_downward_move_locks() {
        let mut state = TetrisState::with_board(Board::new(), TetrominoType::O, TetrominoType::T);
        let mut rng = SimpleRng::new(1);
        for _ in 0..18 {
            state = state.move_by(0, 1, &mut rng);
        }
        assert_eq!(state.active().unwrap().y, 18);
        assert_eq!(state.board().filled_count(), 0);

        let locked = state.move_by(0, 1, &mut rng);
        assert_eq!(locked.board().filled_count(), 4);
        assert!(locked.board().is_occupied(4, 19));
        assert_eq!(locked.active().unwrap().kind, TetrominoType::T);
        assert_eq!(locked.active().unwrap().y, 0);
    }

    #[test]
    fn test_upward_blocked_move_does_not_lock() {
        let state = TetrisState::with_board(Board::new(), TetrominoType::O, TetrominoType::T);
        let mut rng = SimpleRng::new(1);
        // Moving up from y=0 is not blocked (cells above the board skip checks).
        let up = state.move_by(0, -1, &mut rng);
        assert_eq!(up.active().unwrap().y, -1);
        assert_eq!(up.board().filled_count(), 0);
    }

    #[test]
    fn test_rotate_in_place() {
        let state = TetrisState::with_board(Board::new(), TetrominoType::T, TetrominoType::O);
        let rotated = state.rotate();
        let piece = rotated.active().unwrap();
        assert_eq!(piece.shape, vec![vec![0, 1, 0], vec![0, 1, 1], vec![0, 1, 0]]);
        assert_eq!(piece.x, 3);
    }

    #[test]
    fn test_rotate_kicks_right_from_left_wall() {
        let mut state = TetrisState::with_board(Board::new(), TetrominoType::T, TetrominoType::O);
        let mut rng = SimpleRng::new(1);
        state = state.move_by(0, 2, &mut rng).rotate();
        // Vertical T with its stem column 1; push it flush against the left wall.
        for _ in 0..5 {
            state = state.move_by(-1, 0, &mut rng);
        }
        assert_eq!(state.active().unwrap().x, -1);

        // Rotating back needs column -1 free; kick to x = 0.
        let kicked = state.rotate();
        assert_eq!(kicked.active().unwrap().x, 0);
        assert_eq!(
            kicked.active().unwrap().shape,
            vec![vec![0, 0, 0], vec![1, 1, 1], vec![0, 1, 0]]
        );
    }

    #[test]
    fn test_rotate_kicks_left_from_right_wall() {
        let mut state = TetrisState::with_board(Board::new(), TetrominoType::I, TetrominoType::O);
        let mut rng = SimpleRng::new(1);
        state = state.move_by(0, 2, &mut rng).rotate();
        // Vertical I sits in matrix column 2
        for _ in 0..10 {
            state = state.move_by(1, 0, &mut rng);
        }
        assert_eq!(state.active().unwrap().x, 7);

        // x=7 and x=8 overflow the right wall; x=6 covers columns 6..9
        let kicked = state.rotate();
        assert_eq!(kicked.active().unwrap().x, 6);
    }

    #[test]
    fn test_rotate_abandoned_when_all_kicks_fail() {
        let mut board = Board::new();
        // A one-column shaft at column 4, rows 2 to 5
        for y in 2..6 {
            board.set(3, y, filled(TetrominoType::Z));
            board.set(5, y, filled(TetrominoType::Z));
        }
        let mut state = TetrisState::with_board(board, TetrominoType::I, TetrominoType::O);
        let vertical = rotate_matrix(&tetromino(TetrominoType::I).shape_matrix());
        state.active = Some(Piece {
            kind: TetrominoType::I,
            shape: vertical,
            x: 2,
            y: 2,
        });

        let attempted = state.rotate();
        assert_eq!(attempted, state);
    }

    #[test]
    fn test_hard_drop_locks_at_bottom() {
        let state = TetrisState::with_board(Board::new(), TetrominoType::I, TetrominoType::O);
        let mut rng = SimpleRng::new(1);
        assert_eq!(state.drop_y(), Some(18));

        let dropped = state.hard_drop(&mut rng);
        for x in 3..7 {
            assert!(dropped.board().is_occupied(x, 19));
        }
        assert_eq!(dropped.active().unwrap().kind, TetrominoType::O);
    }

    #[test]
    fn test_single_line_clear_scores() {
        let mut board = Board::new();
        for x in 0..BOARD_WIDTH as i32 {
            if !(3..7).contains(&x) {
                board.set(x, 19, filled(TetrominoType::J));
            }
        }
        let state = TetrisState::with_board(board, TetrominoType::I, TetrominoType::O);
        let after = state.hard_drop(&mut SimpleRng::new(1));

        assert_eq!(after.lines(), 1);
        assert_eq!(after.score(), 100);
        assert_eq!(after.level(), 1);
        assert_eq!(after.board().filled_count(), 0);
        assert_eq!(
            after.last_clear(),
            Some(&LineClear {
                rows: vec![19],
                points: 100
            })
        );
    }

    #[test]
    fn test_four_line_clear_scores_800_times_level() {
        let mut board = Board::new();
        for y in 16..BOARD_HEIGHT as i32 {
            for x in 0..BOARD_WIDTH as i32 {
                if x != 0 {
                    board.set(x, y, filled(TetrominoType::L));
                }
            }
        }
        board.set(5, 15, filled(TetrominoType::S));

        let mut state = TetrisState::with_board(board, TetrominoType::I, TetrominoType::O);
        state.level = 2;
        let mut rng = SimpleRng::new(1);
        state = state.rotate();
        for _ in 0..5 {
            state = state.move_by(-1, 0, &mut rng);
        }
        assert_eq!(state.active().unwrap().x, -2);

        let after = state.hard_drop(&mut rng);
        assert_eq!(after.lines(), 4);
        assert_eq!(after.score(), 1600);
        // The stray block fell four rows; everything above is empty.
        assert!(after.board().is_occupied(5, 19));
        assert_eq!(after.board().filled_count(), 1);
        assert_eq!(after.board().rows().count(), BOARD_HEIGHT);
    }

    #[test]
    fn test_level_uses_score_before_lock() {
        let mut board = Board::new();
        for x in 0..BOARD_WIDTH as i32 {
            if !(3..7).contains(&x) {
                board.set(x, 19, filled(TetrominoType::J));
            }
        }
        let mut state = TetrisState::with_board(board, TetrominoType::I, TetrominoType::O);
        state.score = 850;
        let after = state.hard_drop(&mut SimpleRng::new(1));
        // (850 + 100) / 1000 + 1 = 1 even though the score is now 950
        assert_eq!(after.score(), 950);
        assert_eq!(after.level(), 1);

        state.score = 950;
        let after = state.hard_drop(&mut SimpleRng::new(1));
        assert_eq!(after.level(), 2);
        assert_eq!(after.drop_interval_ms(), 750);
    }

    #[test]
    fn test_lock_without_clear_resets_last_clear() {
        let state = TetrisState::with_board(Board::new(), TetrominoType::O, TetrominoType::O);
        let after = state.hard_drop(&mut SimpleRng::new(1));
        assert!(after.last_clear().is_none());
        assert_eq!(after.score(), 0);
    }

    #[test]
    fn test_stack_to_top_ends_game() {
        let mut state = TetrisState::with_board(Board::new(), TetrominoType::O, TetrominoType::O);
        let mut rng = SimpleRng::new(3);
        for _ in 0..40 {
            if state.game_over() {
                break;
            }
            state = state.hard_drop(&mut rng);
        }
        assert!(state.game_over());
        let frozen = state.hard_drop(&mut rng);
        assert_eq!(frozen, state);
        assert_eq!(state.move_by(1, 0, &mut rng), state);
        assert_eq!(state.toggle_pause(), state);
    }

    #[test]
    fn test_pause_blocks_movement() {
        let state = TetrisState::with_board(Board::new(), TetrominoType::T, TetrominoType::O);
        let mut rng = SimpleRng::new(1);
        let paused = state.toggle_pause();
        assert!(paused.paused());
        assert_eq!(paused.move_by(1, 0, &mut rng), paused);
        assert_eq!(paused.rotate(), paused);
        assert_eq!(paused.tick(&mut rng), paused);
        assert_eq!(paused.hard_drop(&mut rng), paused);
        assert!(!paused.toggle_pause().paused());
    }

    #[test]
    fn test_tick_gravity() {
        let state = TetrisState::with_board(Board::new(), TetrominoType::T, TetrominoType::O);
        let ticked = state.tick(&mut SimpleRng::new(1));
        assert_eq!(ticked.active().unwrap().y, 1);
    }

    #[test]
    fn test_apply_action_dispatch() {
        let state = TetrisState::with_board(Board::new(), TetrominoType::T, TetrominoType::O);
        let mut rng = SimpleRng::new(1);

        assert_eq!(state.apply_action(TetrisAction::MoveLeft, &mut rng).active().unwrap().x, 2);
        assert_eq!(state.apply_action(TetrisAction::MoveRight, &mut rng).active().unwrap().x, 4);
        assert_eq!(state.apply_action(TetrisAction::SoftDrop, &mut rng).active().unwrap().y, 1);
        assert!(state.apply_action(TetrisAction::Pause, &mut rng).paused());
        assert_eq!(
            state.apply_action(TetrisAction::Rotate, &mut rng),
            state.rotate()
        );
        assert_eq!(
            state
                .apply_action(TetrisAction::HardDrop, &mut rng)
                .board()
                .filled_count(),
            4
        );
    }

    #[test]
    fn test_apply_action_restart() {
        let mut rng = SimpleRng::new(1);
        let state = TetrisState::with_board(Board::new(), TetrominoType::T, TetrominoType::O)
            .hard_drop(&mut rng);
        assert_eq!(state.board().filled_count(), 4);

        let restarted = state.apply_action(TetrisAction::Restart, &mut rng);
        assert_eq!(restarted.board().filled_count(), 0);
        assert_eq!(restarted.score(), 0);
        assert_eq!(restarted.level(), 1);
    }
}
