use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

/// A block offset `(dx, dy)` relative to the pivot of a piece.
pub type Offset = (i32, i32);

/// Kind of a tetromino, also used as the occupancy marker of a board cell.
///
/// [`Shape::Empty`] means "no piece" on the board and "no active piece" for
/// [`ActivePiece`](super::piece::ActivePiece).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum Shape {
    /// Unoccupied cell / no piece.
    #[default]
    Empty = 0,
    /// Z-piece.
    Z = 1,
    /// S-piece.
    S = 2,
    /// I-piece.
    Line = 3,
    /// T-piece.
    T = 4,
    /// O-piece.
    Square = 5,
    /// L-piece.
    L = 6,
    /// J-piece.
    MirroredL = 7,
}

impl Distribution<Shape> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Shape {
        Shape::PLAYABLE[rng.random_range(0..Shape::PLAYABLE.len())]
    }
}

impl Shape {
    /// Number of shape variants, including [`Shape::Empty`].
    pub const LEN: usize = 8;

    /// The seven shapes that can be spawned.
    pub const PLAYABLE: [Shape; 7] = [
        Shape::Z,
        Shape::S,
        Shape::Line,
        Shape::T,
        Shape::Square,
        Shape::L,
        Shape::MirroredL,
    ];

    /// Returns the block offsets of this shape in its spawn orientation.
    ///
    /// # Example
    ///
    /// ```
    /// use tetrix_engine::Shape;
    ///
    /// assert_eq!(Shape::Line.offsets(), [(0, -1), (0, 0), (0, 1), (0, 2)]);
    /// ```
    #[must_use]
    pub const fn offsets(self) -> [Offset; 4] {
        SHAPE_OFFSETS[self as usize]
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Shape::Empty)
    }

    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Shape::Empty),
            1 => Some(Shape::Z),
            2 => Some(Shape::S),
            3 => Some(Shape::Line),
            4 => Some(Shape::T),
            5 => Some(Shape::Square),
            6 => Some(Shape::L),
            7 => Some(Shape::MirroredL),
            _ => None,
        }
    }

    /// Returns the single character used to draw this shape on a board.
    ///
    /// # Examples
    ///
    /// ```
    /// use tetrix_engine::Shape;
    ///
    /// assert_eq!(Shape::Empty.as_char(), '.');
    /// assert_eq!(Shape::MirroredL.as_char(), 'J');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Shape::Empty => '.',
            Shape::Z => 'Z',
            Shape::S => 'S',
            Shape::Line => 'I',
            Shape::T => 'T',
            Shape::Square => 'O',
            Shape::L => 'L',
            Shape::MirroredL => 'J',
        }
    }

    /// Parses a shape from its board character.
    ///
    /// # Examples
    ///
    /// ```
    /// use tetrix_engine::Shape;
    ///
    /// assert_eq!(Shape::from_char('I'), Some(Shape::Line));
    /// assert_eq!(Shape::from_char('.'), Some(Shape::Empty));
    /// assert_eq!(Shape::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            '.' => Some(Shape::Empty),
            'Z' => Some(Shape::Z),
            'S' => Some(Shape::S),
            'I' => Some(Shape::Line),
            'T' => Some(Shape::T),
            'O' => Some(Shape::Square),
            'L' => Some(Shape::L),
            'J' => Some(Shape::MirroredL),
            _ => None,
        }
    }
}

/// Spawn-orientation offsets indexed by `Shape as usize`.
const SHAPE_OFFSETS: [[Offset; 4]; Shape::LEN] = [
    // Empty
    [(0, 0), (0, 0), (0, 0), (0, 0)],
    // Z
    [(0, -1), (0, 0), (-1, 0), (-1, 1)],
    // S
    [(0, -1), (0, 0), (1, 0), (1, 1)],
    // Line
    [(0, -1), (0, 0), (0, 1), (0, 2)],
    // T
    [(-1, 0), (0, 0), (1, 0), (0, 1)],
    // Square
    [(0, 0), (1, 0), (0, 1), (1, 1)],
    // L
    [(-1, -1), (0, -1), (0, 0), (0, 1)],
    // MirroredL
    [(1, -1), (0, -1), (0, 0), (0, 1)],
];

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_empty_offsets_are_degenerate() {
        assert_eq!(Shape::Empty.offsets(), [(0, 0); 4]);
    }

    #[test]
    fn test_playable_offsets_are_distinct_cells() {
        for shape in Shape::PLAYABLE {
            let offsets = shape.offsets();
            for i in 0..4 {
                for j in (i + 1)..4 {
                    assert_ne!(offsets[i], offsets[j], "{shape:?} repeats a cell");
                }
            }
        }
    }

    #[test]
    fn test_index_round_trip() {
        for index in 0..Shape::LEN {
            let shape = Shape::from_index(index).unwrap();
            assert_eq!(shape as usize, index);
        }
        assert_eq!(Shape::from_index(Shape::LEN), None);
    }

    #[test]
    fn test_char_conversion() {
        for index in 0..Shape::LEN {
            let shape = Shape::from_index(index).unwrap();
            assert_eq!(Shape::from_char(shape.as_char()), Some(shape));
        }
        assert_eq!(Shape::from_char('x'), None);
    }

    #[test]
    fn test_random_shape_is_never_empty() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut seen = [false; Shape::LEN];
        for _ in 0..1000 {
            let shape: Shape = rng.random();
            assert_ne!(shape, Shape::Empty);
            seen[shape as usize] = true;
        }
        for shape in Shape::PLAYABLE {
            assert!(seen[shape as usize], "{shape:?} was never drawn");
        }
    }
}
