use rand::Rng;
use serde::{Deserialize, Serialize};

use super::shape::{Offset, Shape};

/// A tetromino in a specific orientation, independent of its board position.
///
/// The piece stores the four pivot-relative block offsets of its current
/// orientation. Pieces are values: rotations return new `ActivePiece`
/// instances, so a rotation rejected by the board can simply be dropped.
///
/// The default piece has shape [`Shape::Empty`] and stands for "no active
/// piece".
///
/// # Example
///
/// ```
/// use tetrix_engine::{ActivePiece, Shape};
///
/// let piece = ActivePiece::new(Shape::T);
/// let rotated = piece.rotated_left();
/// assert_eq!(rotated.rotated_right(), piece);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct ActivePiece {
    shape: Shape,
    coords: [Offset; 4],
}

impl ActivePiece {
    /// The "no active piece" sentinel.
    pub const EMPTY: Self = Self {
        shape: Shape::Empty,
        coords: Shape::Empty.offsets(),
    };

    #[must_use]
    pub const fn new(shape: Shape) -> Self {
        Self {
            shape,
            coords: shape.offsets(),
        }
    }

    #[must_use]
    pub const fn shape(&self) -> Shape {
        self.shape
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.shape.is_empty()
    }

    /// Replaces the shape and resets the orientation to the spawn one.
    pub const fn set_shape(&mut self, shape: Shape) {
        self.shape = shape;
        self.coords = shape.offsets();
    }

    /// Replaces the shape with one drawn uniformly from [`Shape::PLAYABLE`].
    pub fn set_random_shape<R>(&mut self, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        self.set_shape(rng.random());
    }

    /// Returns the x offset of block `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= 4`.
    #[must_use]
    pub fn x(&self, index: usize) -> i32 {
        self.coords[index].0
    }

    /// Returns the y offset of block `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= 4`.
    #[must_use]
    pub fn y(&self, index: usize) -> i32 {
        self.coords[index].1
    }

    /// Returns an iterator over the four block offsets.
    pub fn blocks(&self) -> impl Iterator<Item = Offset> + '_ {
        self.coords.iter().copied()
    }

    #[must_use]
    pub fn min_x(&self) -> i32 {
        self.blocks().map(|(x, _)| x).fold(self.x(0), i32::min)
    }

    #[must_use]
    pub fn max_x(&self) -> i32 {
        self.blocks().map(|(x, _)| x).fold(self.x(0), i32::max)
    }

    #[must_use]
    pub fn min_y(&self) -> i32 {
        self.blocks().map(|(_, y)| y).fold(self.y(0), i32::min)
    }

    #[must_use]
    pub fn max_y(&self) -> i32 {
        self.blocks().map(|(_, y)| y).fold(self.y(0), i32::max)
    }

    /// Returns a copy rotated a quarter turn left: `(x, y) -> (y, -x)`.
    ///
    /// Squares are rotationally symmetric and come back unchanged.
    #[must_use]
    pub fn rotated_left(&self) -> Self {
        self.map_coords(|(x, y)| (y, -x))
    }

    /// Returns a copy rotated a quarter turn right: `(x, y) -> (-y, x)`.
    ///
    /// Squares are rotationally symmetric and come back unchanged.
    #[must_use]
    pub fn rotated_right(&self) -> Self {
        self.map_coords(|(x, y)| (-y, x))
    }

    fn map_coords<F>(&self, f: F) -> Self
    where
        F: Fn(Offset) -> Offset,
    {
        if self.shape == Shape::Square {
            return *self;
        }
        Self {
            shape: self.shape,
            coords: self.coords.map(f),
        }
    }
}
