use std::fmt;

use serde::{Deserialize, Serialize};

use super::{piece::ActivePiece, shape::Shape};

/// The grid of placed blocks.
///
/// Cells are stored row-major in a single buffer. Row `0` is the bottom row
/// and `x` grows to the right. Each cell holds [`Shape::Empty`] or the shape of
/// the piece that was locked there.
///
/// Cell accessors take unsigned coordinates and panic outside the grid; the
/// session checks bounds with [`Board::contains`] before touching cells.
///
/// # Example
///
/// ```
/// use tetrix_engine::{Board, Shape};
///
/// let mut board = Board::new(4, 3);
/// for x in 0..4 {
///     board.set_shape_at(x, 0, Shape::Line);
/// }
/// board.set_shape_at(1, 1, Shape::T);
///
/// assert_eq!(board.remove_full_lines(), 1);
/// assert_eq!(board.shape_at(1, 0), Shape::T);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<Shape>,
}

impl Board {
    /// Creates an empty board.
    ///
    /// # Panics
    ///
    /// Panics if `width` or `height` is zero.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "board must have at least one cell");
        Self {
            width,
            height,
            cells: vec![Shape::Empty; width * height],
        }
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    fn index(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.width && y < self.height,
            "cell ({x}, {y}) is outside the {}x{} board",
            self.width,
            self.height
        );
        y * self.width + x
    }

    /// Converts signed coordinates to a cell position if they lie on the board.
    #[must_use]
    pub fn contains(&self, x: i32, y: i32) -> Option<(usize, usize)> {
        let x = usize::try_from(x).ok().filter(|&x| x < self.width)?;
        let y = usize::try_from(y).ok().filter(|&y| y < self.height)?;
        Some((x, y))
    }

    #[must_use]
    pub fn shape_at(&self, x: usize, y: usize) -> Shape {
        self.cells[self.index(x, y)]
    }

    pub fn set_shape_at(&mut self, x: usize, y: usize, shape: Shape) {
        let index = self.index(x, y);
        self.cells[index] = shape;
    }

    /// Resets every cell to [`Shape::Empty`].
    pub fn clear(&mut self) {
        self.cells.fill(Shape::Empty);
    }

    fn row(&self, y: usize) -> &[Shape] {
        &self.cells[y * self.width..][..self.width]
    }

    /// Returns an iterator over the rows, bottom row first.
    pub fn rows(&self) -> impl DoubleEndedIterator<Item = &[Shape]> + '_ {
        self.cells.chunks_exact(self.width)
    }

    #[must_use]
    pub fn is_row_full(&self, y: usize) -> bool {
        self.row(y).iter().all(|shape| !shape.is_empty())
    }

    /// Removes row `y`, moving every row above it down by one.
    ///
    /// The top row becomes empty.
    pub fn collapse_row(&mut self, y: usize) {
        assert!(y < self.height, "row {y} is outside the board");
        let start = y * self.width;
        self.cells.copy_within(start + self.width.., start);
        let top = (self.height - 1) * self.width;
        self.cells[top..].fill(Shape::Empty);
    }

    /// Removes every full row and returns how many were removed.
    ///
    /// Rows are scanned from the top down. After a collapse the same index is
    /// tested again, since a different row now sits there.
    pub fn remove_full_lines(&mut self) -> usize {
        let mut count = 0;
        for y in (0..self.height).rev() {
            while self.is_row_full(y) {
                count += 1;
                self.collapse_row(y);
            }
        }
        count
    }

    /// Writes the shape of `piece` into its four cells with the pivot at `(x, y)`.
    ///
    /// Block `i` lands on `(x + piece.x(i), y - piece.y(i))`.
    ///
    /// # Panics
    ///
    /// Panics if any block falls outside the board.
    pub fn place_piece(&mut self, piece: &ActivePiece, x: i32, y: i32) {
        for (dx, dy) in piece.blocks() {
            let (cx, cy) = self
                .contains(x + dx, y - dy)
                .unwrap_or_else(|| panic!("block ({}, {}) is outside the board", x + dx, y - dy));
            self.set_shape_at(cx, cy, piece.shape());
        }
    }

    /// Builds a board from ASCII art, top row first.
    ///
    /// Each character is a [`Shape`] character (`.` for empty). All rows must
    /// have the same width.
    ///
    /// # Panics
    ///
    /// Panics on unknown characters, ragged rows or an empty picture.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let lines: Vec<&str> = art
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        Self::from_rows(&lines).unwrap_or_else(|e| panic!("{e}"))
    }

    fn from_rows<S>(rows: &[S]) -> Result<Self, String>
    where
        S: AsRef<str>,
    {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.as_ref().chars().count());
        if width == 0 || height == 0 {
            return Err("board must have at least one cell".to_owned());
        }

        let mut board = Self::new(width, height);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let y = height - 1 - i;
            let count = row.chars().count();
            if count != width {
                return Err(format!(
                    "expected {width} cells in every row, got {count} in row {y}"
                ));
            }
            for (x, c) in row.chars().enumerate() {
                let shape = Shape::from_char(c)
                    .ok_or_else(|| format!("invalid cell '{c}' at ({x}, {y})"))?;
                board.set_shape_at(x, y, shape);
            }
        }
        Ok(board)
    }

    fn row_string(row: &[Shape]) -> String {
        row.iter().map(|shape| shape.as_char()).collect()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows().rev() {
            writeln!(f, "{}", Self::row_string(row))?;
        }
        Ok(())
    }
}

impl Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Format: ["..........", "...TTT....", ...] (top row first)
        serializer.collect_seq(self.rows().rev().map(Self::row_string))
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let rows = Vec::<String>::deserialize(deserializer)?;
        Self::from_rows(&rows).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill_row(board: &mut Board, y: usize, shape: Shape) {
        for x in 0..board.width() {
            board.set_shape_at(x, y, shape);
        }
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new(10, 22);
        assert_eq!(board.width(), 10);
        assert_eq!(board.height(), 22);
        for y in 0..22 {
            for x in 0..10 {
                assert_eq!(board.shape_at(x, y), Shape::Empty);
            }
        }
    }

    #[test]
    fn test_set_and_clear() {
        let mut board = Board::new(10, 22);
        board.set_shape_at(3, 4, Shape::Z);
        assert_eq!(board.shape_at(3, 4), Shape::Z);
        board.clear();
        assert_eq!(board, Board::new(10, 22));
    }

    #[test]
    #[should_panic(expected = "outside the 10x22 board")]
    fn test_out_of_bounds_access_panics() {
        let board = Board::new(10, 22);
        let _ = board.shape_at(10, 0);
    }

    #[test]
    fn test_contains() {
        let board = Board::new(10, 22);
        assert_eq!(board.contains(0, 0), Some((0, 0)));
        assert_eq!(board.contains(9, 21), Some((9, 21)));
        assert_eq!(board.contains(-1, 0), None);
        assert_eq!(board.contains(10, 0), None);
        assert_eq!(board.contains(0, -1), None);
        assert_eq!(board.contains(0, 22), None);
    }

    #[test]
    fn test_is_row_full() {
        let mut board = Board::new(4, 3);
        assert!(!board.is_row_full(0));
        board.set_shape_at(0, 0, Shape::T);
        board.set_shape_at(1, 0, Shape::T);
        board.set_shape_at(2, 0, Shape::T);
        assert!(!board.is_row_full(0));
        board.set_shape_at(3, 0, Shape::L);
        assert!(board.is_row_full(0));
    }

    #[test]
    fn test_collapse_row_shifts_rows_above() {
        let mut board = Board::from_ascii(
            "
            Z...
            .S..
            ..T.
            ...L
            ",
        );
        board.collapse_row(1);
        assert_eq!(
            board,
            Board::from_ascii(
                "
                ....
                Z...
                .S..
                ...L
                ",
            )
        );
    }

    #[test]
    fn test_collapse_top_row() {
        let mut board = Board::from_ascii(
            "
            ZZZZ
            SS..
            ",
        );
        board.collapse_row(1);
        assert_eq!(
            board,
            Board::from_ascii(
                "
                ....
                SS..
                ",
            )
        );
    }

    #[test]
    fn test_remove_single_line() {
        let mut board = Board::new(10, 22);
        for y in 0..22 {
            board.set_shape_at(y % 10, y, Shape::S);
        }
        fill_row(&mut board, 5, Shape::Line);
        let before = board.clone();

        assert_eq!(board.remove_full_lines(), 1);

        for y in 0..5 {
            for x in 0..10 {
                assert_eq!(board.shape_at(x, y), before.shape_at(x, y));
            }
        }
        for y in 5..21 {
            for x in 0..10 {
                assert_eq!(board.shape_at(x, y), before.shape_at(x, y + 1));
            }
        }
        for x in 0..10 {
            assert_eq!(board.shape_at(x, 21), Shape::Empty);
        }
    }

    #[test]
    fn test_remove_adjacent_lines() {
        let mut board = Board::from_ascii(
            "
            ....
            T...
            IIII
            IIII
            .O..
            ",
        );
        assert_eq!(board.remove_full_lines(), 2);
        assert_eq!(
            board,
            Board::from_ascii(
                "
                ....
                ....
                ....
                T...
                .O..
                ",
            )
        );
    }

    #[test]
    fn test_remove_non_adjacent_lines() {
        let mut board = Board::from_ascii(
            "
            L...
            JJJJ
            .S..
            ZZZZ
            ..T.
            ",
        );
        assert_eq!(board.remove_full_lines(), 2);
        assert_eq!(
            board,
            Board::from_ascii(
                "
                ....
                ....
                L...
                .S..
                ..T.
                ",
            )
        );
    }

    #[test]
    fn test_remove_all_lines() {
        let mut board = Board::new(3, 4);
        for y in 0..4 {
            fill_row(&mut board, y, Shape::Square);
        }
        assert_eq!(board.remove_full_lines(), 4);
        assert_eq!(board, Board::new(3, 4));
    }

    #[test]
    fn test_remove_no_lines() {
        let mut board = Board::from_ascii(
            "
            .III
            O.OO
            ",
        );
        let before = board.clone();
        assert_eq!(board.remove_full_lines(), 0);
        assert_eq!(board, before);
    }

    #[test]
    fn test_place_piece() {
        let mut board = Board::new(6, 5);
        board.place_piece(&ActivePiece::new(Shape::T), 2, 3);
        assert_eq!(
            board,
            Board::from_ascii(
                "
                ......
                .TTT..
                ..T...
                ......
                ......
                ",
            )
        );
    }

    #[test]
    #[should_panic(expected = "outside the board")]
    fn test_place_piece_out_of_bounds_panics() {
        let mut board = Board::new(6, 5);
        board.place_piece(&ActivePiece::new(Shape::Line), 0, 0);
    }

    #[test]
    fn test_display() {
        let board = Board::from_ascii(
            "
            ..
            Z.
            ",
        );
        assert_eq!(board.to_string(), "..\nZ.\n");
    }

    #[test]
    fn test_board_serialization() {
        let board = Board::from_ascii(
            "
            ...
            .J.
            TTO
            ",
        );
        let serialized = serde_json::to_string(&board).unwrap();
        assert_eq!(serialized, r#"["...",".J.","TTO"]"#);

        let deserialized: Board = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, board);
    }

    #[test]
    fn test_board_deserialization_error_cases() {
        assert!(serde_json::from_str::<Board>("[]").is_err());
        assert!(serde_json::from_str::<Board>(r#"["",""]"#).is_err());
        assert!(serde_json::from_str::<Board>(r#"["...",".."]"#).is_err());
        assert!(serde_json::from_str::<Board>(r#"["..X"]"#).is_err());
    }
}
