//! Pieces module - tetromino matrices and rotation
//!
//! Each tetromino is a square 0/1 matrix (I 4x4, O 2x2, the rest 3x3).
//! Rotation turns the whole matrix 90 degrees clockwise; there is no SRS table,
//! and kicks are handled by the game state (try in place, then one column
//! right, then one column left).

use serde::Serialize;

use crate::rng::RandomSource;
use crate::types::{PieceColor, TetrominoType, BOARD_WIDTH};

/// An owned, possibly rotated, piece matrix
pub type Shape = Vec<Vec<u8>>;

/// Static definition of one tetromino
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TetrominoDef {
    pub kind: TetrominoType,
    pub shape: &'static [&'static [u8]],
    pub color: PieceColor,
}

impl TetrominoDef {
    /// Owned copy of the base matrix
    pub fn shape_matrix(&self) -> Shape {
        self.shape.iter().map(|row| row.to_vec()).collect()
    }

    /// Matrix width (columns of the first row)
    pub fn width(&self) -> usize {
        self.shape.first().map_or(0, |row| row.len())
    }
}

/// The seven tetrominoes, in `TetrominoType::ALL` order
pub static TETROMINOES: [TetrominoDef; 7] = [
    TetrominoDef {
        kind: TetrominoType::I,
        shape: &[&[0, 0, 0, 0], &[1, 1, 1, 1], &[0, 0, 0, 0], &[0, 0, 0, 0]],
        color: PieceColor::Cyan,
    },
    TetrominoDef {
        kind: TetrominoType::J,
        shape: &[&[1, 0, 0], &[1, 1, 1], &[0, 0, 0]],
        color: PieceColor::Blue,
    },
    TetrominoDef {
        kind: TetrominoType::L,
        shape: &[&[0, 0, 1], &[1, 1, 1], &[0, 0, 0]],
        color: PieceColor::Orange,
    },
    TetrominoDef {
        kind: TetrominoType::O,
        shape: &[&[1, 1], &[1, 1]],
        color: PieceColor::Yellow,
    },
    TetrominoDef {
        kind: TetrominoType::S,
        shape: &[&[0, 1, 1], &[1, 1, 0], &[0, 0, 0]],
        color: PieceColor::Green,
    },
    TetrominoDef {
        kind: TetrominoType::T,
        shape: &[&[0, 1, 0], &[1, 1, 1], &[0, 0, 0]],
        color: PieceColor::Purple,
    },
    TetrominoDef {
        kind: TetrominoType::Z,
        shape: &[&[1, 1, 0], &[0, 1, 1], &[0, 0, 0]],
        color: PieceColor::Red,
    },
];

/// Definition for a kind
pub fn tetromino(kind: TetrominoType) -> &'static TetrominoDef {
    let idx = match kind {
        TetrominoType::I => 0,
        TetrominoType::J => 1,
        TetrominoType::L => 2,
        TetrominoType::O => 3,
        TetrominoType::S => 4,
        TetrominoType::T => 5,
        TetrominoType::Z => 6,
    };
    &TETROMINOES[idx]
}

/// Uniformly random kind
pub fn random_tetromino<R: RandomSource + ?Sized>(rng: &mut R) -> TetrominoType {
    TetrominoType::ALL[rng.next_below(TetrominoType::ALL.len())]
}

/// Rotate a matrix 90 degrees clockwise: `rotated[i][j] = matrix[N-1-j][i]`.
///
/// Every tetromino matrix is square. A rectangular input rotates into its
/// transpose shape; missing cells of a ragged row read as `T::default()`.
///
/// # Examples
///
/// ```
/// use arcade_core::tetris::rotate_matrix;
///
/// let m = vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9]];
/// assert_eq!(rotate_matrix(&m), vec![vec![7, 4, 1], vec![8, 5, 2], vec![9, 6, 3]]);
/// ```
pub fn rotate_matrix<T: Copy + Default>(matrix: &[Vec<T>]) -> Vec<Vec<T>> {
    let n = matrix.len();
    let cols = matrix.first().map_or(0, |row| row.len());

    (0..cols)
        .map(|i| {
            (0..n)
                .map(|j| matrix[n - 1 - j].get(i).copied().unwrap_or_default())
                .collect()
        })
        .collect()
}

/// The falling piece
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Piece {
    pub kind: TetrominoType,
    pub shape: Shape,
    /// Column of the matrix's left edge
    pub x: i32,
    /// Row of the matrix's top edge
    pub y: i32,
}

impl Piece {
    /// Piece of `kind` at its spawn position: centred, top row
    pub fn spawn(kind: TetrominoType) -> Self {
        let def = tetromino(kind);
        Self {
            kind,
            shape: def.shape_matrix(),
            x: spawn_x(def.width()),
            y: 0,
        }
    }

    pub fn color(&self) -> PieceColor {
        tetromino(self.kind).color
    }

    /// Same piece shifted by (dx, dy)
    pub fn shifted(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self.clone()
        }
    }

    /// Absolute board coordinates of the filled cells
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape.iter().enumerate().flat_map(move |(dy, row)| {
            row.iter()
                .enumerate()
                .filter(|&(_, &v)| v != 0)
                .map(move |(dx, _)| (self.x + dx as i32, self.y + dy as i32))
        })
    }
}

/// Left column that centres a matrix of `shape_width` on the board
pub fn spawn_x(shape_width: usize) -> i32 {
    (BOARD_WIDTH.saturating_sub(shape_width) / 2) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SimpleRng;

    #[test]
    fn test_all_pieces_have_four_cells() {
        for def in &TETROMINOES {
            let count: usize = def
                .shape
                .iter()
                .map(|row| row.iter().filter(|&&v| v != 0).count())
                .sum();
            assert_eq!(count, 4, "{:?} should have 4 cells", def.kind);
        }
    }

    #[test]
    fn test_all_shapes_are_square() {
        for def in &TETROMINOES {
            let n = def.shape.len();
            assert!(def.shape.iter().all(|row| row.len() == n), "{:?}", def.kind);
        }
        assert_eq!(tetromino(TetrominoType::I).width(), 4);
        assert_eq!(tetromino(TetrominoType::O).width(), 2);
        assert_eq!(tetromino(TetrominoType::T).width(), 3);
    }

    #[test]
    fn test_table_order_matches_kinds() {
        for (def, kind) in TETROMINOES.iter().zip(TetrominoType::ALL) {
            assert_eq!(def.kind, kind);
            assert_eq!(tetromino(kind).kind, kind);
        }
    }

    #[test]
    fn test_colors() {
        assert_eq!(tetromino(TetrominoType::I).color, PieceColor::Cyan);
        assert_eq!(tetromino(TetrominoType::O).color, PieceColor::Yellow);
        assert_eq!(tetromino(TetrominoType::T).color, PieceColor::Purple);
        assert_eq!(tetromino(TetrominoType::Z).color, PieceColor::Red);
    }

    #[test]
    fn test_rotate_3x3() {
        let m = vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9]];
        assert_eq!(
            rotate_matrix(&m),
            vec![vec![7, 4, 1], vec![8, 5, 2], vec![9, 6, 3]]
        );
    }

    #[test]
    fn test_four_rotations_is_identity() {
        for def in &TETROMINOES {
            let base = def.shape_matrix();
            let mut m = base.clone();
            for _ in 0..4 {
                m = rotate_matrix(&m);
            }
            assert_eq!(m, base);
        }
    }

    #[test]
    fn test_rotate_i_vertical() {
        let rotated = rotate_matrix(&tetromino(TetrominoType::I).shape_matrix());
        assert_eq!(
            rotated,
            vec![
                vec![0, 0, 1, 0],
                vec![0, 0, 1, 0],
                vec![0, 0, 1, 0],
                vec![0, 0, 1, 0],
            ]
        );
    }

    #[test]
    fn test_rotate_empty() {
        let empty: Vec<Vec<u8>> = Vec::new();
        assert!(rotate_matrix(&empty).is_empty());
    }

    #[test]
    fn test_spawn_centres_piece() {
        assert_eq!(Piece::spawn(TetrominoType::I).x, 3);
        assert_eq!(Piece::spawn(TetrominoType::O).x, 4);
        assert_eq!(Piece::spawn(TetrominoType::T).x, 3);
        assert_eq!(Piece::spawn(TetrominoType::T).y, 0);
    }

    #[test]
    fn test_piece_cells_absolute() {
        let piece = Piece::spawn(TetrominoType::O).shifted(0, 5);
        let cells: Vec<_> = piece.cells().collect();
        assert_eq!(cells, vec![(4, 5), (5, 5), (4, 6), (5, 6)]);
    }

    #[test]
    fn test_random_tetromino_covers_all_kinds() {
        let mut rng = SimpleRng::new(12345);
        let mut seen = [false; 7];
        for _ in 0..500 {
            let kind = random_tetromino(&mut rng);
            seen[(kind.code() - 1) as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}
