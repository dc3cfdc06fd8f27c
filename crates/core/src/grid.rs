//! Grid module - generic 2D cell storage shared by the board games
//!
//! Cells live in a flat `Vec` in row-major order (`y * width + x`), the same
//! layout the Tetris board uses for its fixed-size array. Coordinates passed in
//! from callers are signed so that off-board positions can be represented and
//! rejected instead of wrapping.

use arrayvec::ArrayVec;
use serde::Serialize;

/// Offsets of the Moore neighbourhood (8-connectivity), row by row.
pub const MOORE_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// A rectangular grid of `T`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Grid with every cell set to `value`
    pub fn filled(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            cells: vec![value; width * height],
        }
    }
}

impl<T> Grid<T> {
    /// Build a grid cell by cell in row-major order
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                cells.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Calculate flat index from (x, y); `None` when off the grid
    #[inline(always)]
    pub fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some()
    }

    /// (x, y) of a flat index
    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index % self.width, index / self.width)
    }

    pub fn get(&self, x: i32, y: i32) -> Option<&T> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    pub fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut T> {
        let i = self.index(x, y)?;
        Some(&mut self.cells[i])
    }

    /// Set cell at (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i32, y: i32, value: T) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.cells[i] = value;
                true
            }
            None => false,
        }
    }

    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [T] {
        &mut self.cells
    }

    /// Rows from top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.cells.chunks_exact(self.width.max(1))
    }

    /// In-bounds Moore neighbours of (x, y), excluding (x, y) itself
    pub fn neighbors(&self, x: usize, y: usize) -> ArrayVec<(usize, usize), 8> {
        let mut out = ArrayVec::new();
        for (dx, dy) in MOORE_OFFSETS {
            let nx = x as i32 + dx;
            let ny = y as i32 + dy;
            if self.contains(nx, ny) {
                out.push((nx as usize, ny as usize));
            }
        }
        out
    }

    /// Flat indices of the in-bounds Moore neighbours of a flat index
    pub fn neighbor_indices(&self, index: usize) -> ArrayVec<usize, 8> {
        let (x, y) = self.coords(index);
        self.neighbors(x, y)
            .into_iter()
            .map(|(nx, ny)| ny * self.width + nx)
            .collect()
    }

    /// Moore neighbours on a torus: edges wrap to the opposite side
    pub fn wrapping_neighbors(&self, x: usize, y: usize) -> [(usize, usize); 8] {
        let w = self.width as i32;
        let h = self.height as i32;
        MOORE_OFFSETS.map(|(dx, dy)| {
            let nx = (x as i32 + dx).rem_euclid(w);
            let ny = (y as i32 + dy).rem_euclid(h);
            (nx as usize, ny as usize)
        })
    }

    /// Same-shape grid with `f` applied to every cell
    pub fn map<U>(&self, mut f: impl FnMut(usize, usize, &T) -> U) -> Grid<U> {
        Grid::from_fn(self.width, self.height, |x, y| {
            f(x, y, &self.cells[y * self.width + x])
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_calculation() {
        let grid = Grid::filled(10, 20, 0u8);
        assert_eq!(grid.index(0, 0), Some(0));
        assert_eq!(grid.index(9, 0), Some(9));
        assert_eq!(grid.index(0, 1), Some(10));
        assert_eq!(grid.index(9, 19), Some(199));
        assert_eq!(grid.index(-1, 0), None);
        assert_eq!(grid.index(10, 0), None);
        assert_eq!(grid.index(0, 20), None);
    }

    #[test]
    fn test_from_fn_row_major() {
        let grid = Grid::from_fn(3, 2, |x, y| (x, y));
        assert_eq!(grid.cells()[0], (0, 0));
        assert_eq!(grid.cells()[2], (2, 0));
        assert_eq!(grid.cells()[3], (0, 1));
        assert_eq!(grid.coords(4), (1, 1));
    }

    #[test]
    fn test_set_out_of_bounds() {
        let mut grid = Grid::filled(4, 4, false);
        assert!(grid.set(3, 3, true));
        assert!(!grid.set(4, 0, true));
        assert!(!grid.set(0, -1, true));
        assert_eq!(grid.get(3, 3), Some(&true));
    }

    #[test]
    fn test_corner_has_three_neighbors() {
        let grid = Grid::filled(5, 5, ());
        assert_eq!(grid.neighbors(0, 0).len(), 3);
        assert_eq!(grid.neighbors(4, 4).len(), 3);
        assert_eq!(grid.neighbors(2, 0).len(), 5);
        assert_eq!(grid.neighbors(2, 2).len(), 8);
    }

    #[test]
    fn test_neighbor_indices_match_coords() {
        let grid = Grid::filled(4, 3, ());
        let mut idx = grid.neighbor_indices(0).to_vec();
        idx.sort_unstable();
        assert_eq!(idx, vec![1, 4, 5]);
    }

    #[test]
    fn test_wrapping_neighbors_wrap_edges() {
        let grid = Grid::filled(4, 3, ());
        let n = grid.wrapping_neighbors(0, 0);
        assert!(n.contains(&(3, 2)));
        assert!(n.contains(&(1, 1)));
        assert!(n.contains(&(3, 0)));
        assert_eq!(n.len(), 8);
    }

    #[test]
    fn test_rows() {
        let grid = Grid::from_fn(3, 2, |x, y| x + y * 3);
        let rows: Vec<&[usize]> = grid.rows().collect();
        assert_eq!(rows, vec![&[0usize, 1, 2][..], &[3usize, 4, 5][..]]);
    }
}
