//! Conway's Game of Life on a torus
//!
//! Standard B3/S23 rules: a dead cell with exactly three live neighbours is
//! born, a live cell with two or three survives, everything else dies. The
//! grid wraps at every edge.

use serde::Serialize;

use crate::grid::Grid;
use crate::rng::RandomSource;
use crate::types::{DEFAULT_LIFE_HEIGHT, DEFAULT_LIFE_WIDTH, MAX_GRID_SIDE};

/// Default placement offset for [`LifeState::apply_pattern`]
pub const DEFAULT_PATTERN_OFFSET: i32 = 5;

/// Default live-cell probability for [`LifeState::randomize`]
pub const DEFAULT_DENSITY: f64 = 0.3;

/// Auto-run speed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LifeSpeed {
    Slow,
    #[default]
    Medium,
    Fast,
}

impl LifeSpeed {
    /// Milliseconds between generations
    pub fn interval_ms(&self) -> u32 {
        match self {
            LifeSpeed::Slow => 500,
            LifeSpeed::Medium => 200,
            LifeSpeed::Fast => 50,
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "slow" => Some(LifeSpeed::Slow),
            "medium" => Some(LifeSpeed::Medium),
            "fast" => Some(LifeSpeed::Fast),
            _ => None,
        }
    }
}

/// A named set of live cells relative to the pattern's top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pattern {
    pub name: &'static str,
    pub cells: &'static [(i32, i32)],
}

#[rustfmt::skip]
pub static PATTERNS: [Pattern; 5] = [
    Pattern {
        name: "Glider",
        cells: &[(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)],
    },
    Pattern {
        name: "Blinker",
        cells: &[(0, 1), (1, 1), (2, 1)],
    },
    Pattern {
        name: "Beacon",
        cells: &[(0, 0), (1, 0), (0, 1), (3, 2), (2, 3), (3, 3)],
    },
    Pattern {
        name: "Pulsar",
        cells: &[
            (2, 0), (3, 0), (4, 0), (8, 0), (9, 0), (10, 0),
            (0, 2), (5, 2), (7, 2), (12, 2),
            (0, 3), (5, 3), (7, 3), (12, 3),
            (0, 4), (5, 4), (7, 4), (12, 4),
            (2, 5), (3, 5), (4, 5), (8, 5), (9, 5), (10, 5),
            (2, 7), (3, 7), (4, 7), (8, 7), (9, 7), (10, 7),
            (0, 8), (5, 8), (7, 8), (12, 8),
            (0, 9), (5, 9), (7, 9), (12, 9),
            (0, 10), (5, 10), (7, 10), (12, 10),
            (2, 12), (3, 12), (4, 12), (8, 12), (9, 12), (10, 12),
        ],
    },
    Pattern {
        name: "Gosper Glider Gun",
        cells: &[
            (24, 0),
            (22, 1), (24, 1),
            (12, 2), (13, 2), (20, 2), (21, 2), (34, 2), (35, 2),
            (11, 3), (15, 3), (20, 3), (21, 3), (34, 3), (35, 3),
            (0, 4), (1, 4), (10, 4), (16, 4), (20, 4), (21, 4),
            (0, 5), (1, 5), (10, 5), (14, 5), (16, 5), (17, 5), (22, 5), (24, 5),
            (10, 6), (16, 6), (24, 6),
            (11, 7), (15, 7),
            (12, 8), (13, 8),
        ],
    },
];

/// Preset by name, ignoring case
pub fn pattern(name: &str) -> Option<&'static Pattern> {
    PATTERNS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}

/// One generation of B3/S23 with toroidal wrap
pub fn next_generation(grid: &Grid<bool>) -> Grid<bool> {
    grid.map(|x, y, &alive| {
        let neighbors = grid
            .wrapping_neighbors(x, y)
            .iter()
            .filter(|&&(nx, ny)| grid.get(nx as i32, ny as i32) == Some(&true))
            .count();
        matches!((alive, neighbors), (true, 2) | (_, 3))
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LifeState {
    grid: Grid<bool>,
    generation: u64,
    running: bool,
    speed: LifeSpeed,
}

impl LifeState {
    /// Empty grid, stopped, medium speed; sides are clamped to `[1, 256]`
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid: Grid::filled(
                width.clamp(1, MAX_GRID_SIDE),
                height.clamp(1, MAX_GRID_SIDE),
                false,
            ),
            generation: 0,
            running: false,
            speed: LifeSpeed::default(),
        }
    }

    pub fn grid(&self) -> &Grid<bool> {
        &self.grid
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn running(&self) -> bool {
        self.running
    }

    pub fn speed(&self) -> LifeSpeed {
        self.speed
    }

    pub fn is_alive(&self, x: i32, y: i32) -> bool {
        self.grid.get(x, y) == Some(&true)
    }

    pub fn population(&self) -> usize {
        self.grid.cells().iter().filter(|&&c| c).count()
    }

    /// Advance one generation
    pub fn step(&self) -> Self {
        Self {
            grid: next_generation(&self.grid),
            generation: self.generation + 1,
            ..self.clone()
        }
    }

    /// Flip one cell; out of bounds is a no-op
    pub fn toggle_cell(&self, x: i32, y: i32) -> Self {
        let mut next = self.clone();
        if let Some(cell) = next.grid.get_mut(x, y) {
            *cell = !*cell;
        }
        next
    }

    /// Kill every cell and reset the generation counter
    pub fn clear(&self) -> Self {
        Self {
            grid: Grid::filled(self.grid.width(), self.grid.height(), false),
            generation: 0,
            ..self.clone()
        }
    }

    /// Fill each cell independently with probability `density` (clamped to [0, 1])
    pub fn randomize<R: RandomSource + ?Sized>(&self, density: f64, rng: &mut R) -> Self {
        let density = if density.is_nan() { 0.0 } else { density.clamp(0.0, 1.0) };
        let grid = Grid::from_fn(self.grid.width(), self.grid.height(), |_, _| {
            rng.next_f64() < density
        });
        Self {
            grid,
            generation: 0,
            ..self.clone()
        }
    }

    pub fn set_speed(&self, speed: LifeSpeed) -> Self {
        Self {
            speed,
            ..self.clone()
        }
    }

    pub fn toggle_running(&self) -> Self {
        Self {
            running: !self.running,
            ..self.clone()
        }
    }

    /// Replace the grid with `pattern` placed at (`offset_x`, `offset_y`).
    ///
    /// Cells falling outside the grid are dropped; the generation resets.
    pub fn apply_pattern(&self, pattern: &Pattern, offset_x: i32, offset_y: i32) -> Self {
        let mut grid = Grid::filled(self.grid.width(), self.grid.height(), false);
        for &(x, y) in pattern.cells {
            if let (Some(gx), Some(gy)) = (x.checked_add(offset_x), y.checked_add(offset_y)) {
                grid.set(gx, gy, true);
            }
        }
        Self {
            grid,
            generation: 0,
            ..self.clone()
        }
    }
}

impl Default for LifeState {
    fn default() -> Self {
        Self::new(DEFAULT_LIFE_WIDTH, DEFAULT_LIFE_HEIGHT)
    }
}
