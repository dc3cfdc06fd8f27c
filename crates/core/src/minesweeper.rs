//! Minesweeper module - deferred mine placement, flood-fill reveal, flags
//!
//! Every transition takes `&self` and returns a fresh [`MinesweeperState`]; the
//! input is never modified. Invalid requests (off-board coordinates, revealing a
//! flagged cell, acting after the game ended) return an unchanged copy instead
//! of an error.
//!
//! Mines are not placed until the first reveal. The clicked cell and its
//! Moore neighbourhood are excluded from placement, so the opening click always
//! lands on a zero and opens an area (board size permitting).
//!
//! # Example
//!
//! ```
//! use arcade_core::clock::FixedClock;
//! use arcade_core::minesweeper::{MinesweeperState, MinesweeperStatus};
//! use arcade_core::rng::SimpleRng;
//!
//! let mut rng = SimpleRng::new(7);
//! let clock = FixedClock(1_000);
//!
//! let state = MinesweeperState::new(9, 9, 10);
//! let state = state.reveal(4, 4, &mut rng, &clock);
//!
//! assert_eq!(state.status(), MinesweeperStatus::Playing);
//! assert!(!state.cell(4, 4).unwrap().is_mine);
//! ```

use std::collections::VecDeque;

use serde::Serialize;

use crate::clock::Clock;
use crate::grid::Grid;
use crate::rng::{shuffle, RandomSource};
use crate::types::{MAX_MINES_SIDE, MIN_MINES_SIDE};

/// Lifecycle of a Minesweeper game
///
/// Transitions only move forward: `Ready -> Playing -> Won | Lost`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MinesweeperStatus {
    /// No reveal yet; mines not placed
    Ready,
    Playing,
    Won,
    Lost,
}

impl MinesweeperStatus {
    pub fn is_over(&self) -> bool {
        matches!(self, MinesweeperStatus::Won | MinesweeperStatus::Lost)
    }
}

/// One board position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
    pub is_mine: bool,
    /// Mines among the Moore neighbours; always 0 on a mine cell
    pub adjacent_mines: u8,
    pub is_revealed: bool,
    pub is_flagged: bool,
}

impl Cell {
    fn cleared(x: usize, y: usize) -> Self {
        Self {
            x,
            y,
            is_mine: false,
            adjacent_mines: 0,
            is_revealed: false,
            is_flagged: false,
        }
    }
}

/// Complete Minesweeper game state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MinesweeperState {
    width: usize,
    height: usize,
    mines: usize,
    cells: Grid<Cell>,
    status: MinesweeperStatus,
    revealed_count: usize,
    flagged_count: usize,
    /// Epoch milliseconds of the first reveal
    started_at: Option<u64>,
    /// Epoch milliseconds of the win or loss
    ended_at: Option<u64>,
}

impl MinesweeperState {
    /// Create a fresh board.
    ///
    /// Width and height are clamped to `[2, 100]`; `mines` is clamped to
    /// `[1, width*height - 1]`.
    pub fn new(width: usize, height: usize, mines: usize) -> Self {
        let width = clamp_side(width);
        let height = clamp_side(height);
        let mines = clamp_mines(width, height, mines);

        Self {
            width,
            height,
            mines,
            cells: Grid::from_fn(width, height, Cell::cleared),
            status: MinesweeperStatus::Ready,
            revealed_count: 0,
            flagged_count: 0,
            started_at: None,
            ended_at: None,
        }
    }

    /// Build a game already in progress with mines at the given positions.
    ///
    /// Positions outside the board and duplicates are ignored; `mines` is the
    /// number of distinct mines actually placed (at least 1 is not enforced
    /// here, a layout is taken as given).
    pub fn from_layout(
        width: usize,
        height: usize,
        mine_positions: &[(usize, usize)],
        started_at: u64,
    ) -> Self {
        let width = clamp_side(width);
        let height = clamp_side(height);
        let mut cells = Grid::from_fn(width, height, Cell::cleared);

        for &(x, y) in mine_positions {
            if let Some(cell) = cells.get_mut(x as i32, y as i32) {
                cell.is_mine = true;
            }
        }
        compute_adjacent_counts(&mut cells);
        let mines = cells.cells().iter().filter(|c| c.is_mine).count();

        Self {
            width,
            height,
            mines,
            cells,
            status: MinesweeperStatus::Playing,
            revealed_count: 0,
            flagged_count: 0,
            started_at: Some(started_at),
            ended_at: None,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn mines(&self) -> usize {
        self.mines
    }

    pub fn status(&self) -> MinesweeperStatus {
        self.status
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed_count
    }

    pub fn flagged_count(&self) -> usize {
        self.flagged_count
    }

    pub fn started_at(&self) -> Option<u64> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<u64> {
        self.ended_at
    }

    /// All cells in row-major order
    pub fn cells(&self) -> &[Cell] {
        self.cells.cells()
    }

    pub fn grid(&self) -> &Grid<Cell> {
        &self.cells
    }

    /// Cell at (x, y), `None` when out of bounds
    pub fn cell(&self, x: i32, y: i32) -> Option<&Cell> {
        self.cells.get(x, y)
    }

    /// Cells that are not mines
    pub fn safe_cell_count(&self) -> usize {
        self.width * self.height - self.mines
    }

    /// Mines minus flags, never below zero
    pub fn mines_remaining(&self) -> usize {
        self.mines.saturating_sub(self.flagged_count)
    }

    /// Whole seconds between the first reveal and the end of the game
    /// (or `now_ms` while still playing). Zero before the first reveal.
    pub fn elapsed_seconds(&self, now_ms: u64) -> u64 {
        let Some(started) = self.started_at else {
            return 0;
        };
        let end = self.ended_at.unwrap_or(now_ms);
        end.saturating_sub(started) / 1000
    }

    /// Reveal the cell at (x, y).
    ///
    /// The first reveal places mines (using `rng`) and starts the clock. Hitting
    /// a mine reveals every mine and loses; otherwise a breadth-first flood fill
    /// opens the connected zero region and its numbered border. Revealing the
    /// last safe cell flags every mine and wins.
    pub fn reveal<R, C>(&self, x: i32, y: i32, rng: &mut R, clock: &C) -> Self
    where
        R: RandomSource + ?Sized,
        C: Clock + ?Sized,
    {
        let Some(idx) = self.cells.index(x, y) else {
            return self.clone();
        };
        if self.status.is_over() {
            return self.clone();
        }
        let target = self.cells.cells()[idx];
        if target.is_revealed || target.is_flagged {
            return self.clone();
        }

        let mut next = self.clone();

        if next.status == MinesweeperStatus::Ready {
            next.place_mines(idx, rng);
            next.status = MinesweeperStatus::Playing;
            next.started_at = Some(clock.now_ms());
            next.ended_at = None;
        }

        if next.cells.cells()[idx].is_mine {
            for cell in next.cells.cells_mut() {
                if cell.is_mine {
                    cell.is_revealed = true;
                }
            }
            next.status = MinesweeperStatus::Lost;
            next.ended_at = Some(clock.now_ms());
            return next;
        }

        next.flood_fill(idx);

        if next.revealed_count >= next.safe_cell_count() {
            for cell in next.cells.cells_mut() {
                if cell.is_mine {
                    cell.is_flagged = true;
                }
            }
            next.flagged_count = next.mines;
            next.status = MinesweeperStatus::Won;
            next.ended_at = Some(clock.now_ms());
        }

        next
    }

    /// Flip the flag on an unrevealed cell.
    ///
    /// No-op when out of bounds, after the game ended, or on a revealed cell.
    /// The number of flags is not capped by the mine count.
    pub fn toggle_flag(&self, x: i32, y: i32) -> Self {
        let mut next = self.clone();
        if self.status.is_over() {
            return next;
        }
        let Some(cell) = next.cells.get_mut(x, y) else {
            return next;
        };
        if cell.is_revealed {
            return next;
        }

        cell.is_flagged = !cell.is_flagged;
        if cell.is_flagged {
            next.flagged_count += 1;
        } else {
            next.flagged_count -= 1;
        }
        next
    }

    /// Scatter mines over every cell except `safe_idx` and its neighbours.
    fn place_mines<R: RandomSource + ?Sized>(&mut self, safe_idx: usize, rng: &mut R) {
        let excluded = self.cells.neighbor_indices(safe_idx);
        let mut candidates: Vec<usize> = (0..self.cells.len())
            .filter(|&i| i != safe_idx && !excluded.contains(&i))
            .collect();

        for cell in self.cells.cells_mut() {
            cell.is_mine = false;
            cell.adjacent_mines = 0;
        }

        shuffle(rng, &mut candidates);
        let count = self.mines.min(candidates.len());
        for &i in &candidates[..count] {
            self.cells.cells_mut()[i].is_mine = true;
        }

        compute_adjacent_counts(&mut self.cells);
    }

    /// Breadth-first reveal starting at `start`.
    fn flood_fill(&mut self, start: usize) {
        let mut queue = VecDeque::from([start]);
        let mut visited = vec![false; self.cells.len()];

        while let Some(idx) = queue.pop_front() {
            if visited[idx] {
                continue;
            }
            visited[idx] = true;

            let cell = &mut self.cells.cells_mut()[idx];
            if cell.is_revealed || cell.is_flagged || cell.is_mine {
                continue;
            }
            cell.is_revealed = true;
            self.revealed_count += 1;

            if cell.adjacent_mines != 0 {
                continue;
            }
            for n in self.cells.neighbor_indices(idx) {
                if !visited[n] {
                    queue.push_back(n);
                }
            }
        }
    }
}

impl Default for MinesweeperState {
    fn default() -> Self {
        use crate::types::{DEFAULT_MINES_COUNT, DEFAULT_MINES_HEIGHT, DEFAULT_MINES_WIDTH};
        Self::new(DEFAULT_MINES_WIDTH, DEFAULT_MINES_HEIGHT, DEFAULT_MINES_COUNT)
    }
}

fn clamp_side(side: usize) -> usize {
    side.clamp(MIN_MINES_SIDE, MAX_MINES_SIDE)
}

fn clamp_mines(width: usize, height: usize, mines: usize) -> usize {
    let max = (width * height).saturating_sub(1).max(1);
    mines.clamp(1, max)
}

fn compute_adjacent_counts(cells: &mut Grid<Cell>) {
    for idx in 0..cells.len() {
        if cells.cells()[idx].is_mine {
            cells.cells_mut()[idx].adjacent_mines = 0;
            continue;
        }
        let count = cells
            .neighbor_indices(idx)
            .iter()
            .filter(|&&n| cells.cells()[n].is_mine)
            .count();
        cells.cells_mut()[idx].adjacent_mines = count as u8;
    }
}

/// Fresh game; see [`MinesweeperState::new`]
pub fn create_initial_state(width: usize, height: usize, mines: usize) -> MinesweeperState {
    MinesweeperState::new(width, height, mines)
}

/// Same as [`create_initial_state`]; kept as the restart entry point
pub fn reset_game(width: usize, height: usize, mines: usize) -> MinesweeperState {
    create_initial_state(width, height, mines)
}

/// See [`MinesweeperState::reveal`]
pub fn reveal_cell<R, C>(
    state: &MinesweeperState,
    x: i32,
    y: i32,
    rng: &mut R,
    clock: &C,
) -> MinesweeperState
where
    R: RandomSource + ?Sized,
    C: Clock + ?Sized,
{
    state.reveal(x, y, rng, clock)
}

/// See [`MinesweeperState::toggle_flag`]
pub fn toggle_flag(state: &MinesweeperState, x: i32, y: i32) -> MinesweeperState {
    state.toggle_flag(x, y)
}

/// Cell lookup, `None` when out of bounds
pub fn get_cell(state: &MinesweeperState, x: i32, y: i32) -> Option<&Cell> {
    state.cell(x, y)
}
