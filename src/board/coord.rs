//! Axial coordinates and movement directions for the hexagonal board.

use serde::{Deserialize, Serialize};

/// Number of rows (and columns) spanned by the side-5 hexagon.
pub(crate) const SPAN: i8 = 9;

/// A cell address on the side-5 hexagonal board.
///
/// Coordinates are axial `(col, row)` pairs with `row` running 1–9 from the
/// bottom edge and `col` running 1–9, clipped to the hexagon: row `r` holds
/// columns `max(1, r-4) ..= min(9, r+4)`. Exactly 61 cells exist.
///
/// The `Display` form is the classic letter-digit notation: the row maps to
/// `A`–`I` and the column stays a digit, so `(3, 2)` prints as `B3`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Coordinate {
    col: i8,
    row: i8,
}

impl Coordinate {
    /// Creates a coordinate, returning `None` for pairs outside the hexagon.
    ///
    /// Every `Coordinate` that exists is a valid board cell, so callers can
    /// pass coordinates around without re-validating.
    pub fn new(col: i8, row: i8) -> Option<Self> {
        if (1..=SPAN).contains(&row) && col >= 1.max(row - 4) && col <= SPAN.min(row + 4) {
            Some(Self { col, row })
        } else {
            None
        }
    }

    /// Returns the column component (1–9).
    pub fn col(self) -> i8 {
        self.col
    }

    /// Returns the row component (1–9).
    pub fn row(self) -> i8 {
        self.row
    }

    /// The cell one step away in `dir`, or `None` if that step leaves the board.
    pub fn step(self, dir: Direction) -> Option<Self> {
        let (dx, dy) = dir.delta();
        Self::new(self.col + dx, self.row + dy)
    }

    /// Iterates all 61 cells in row-major order (row 1 first, columns ascending).
    pub fn all() -> impl Iterator<Item = Self> {
        (1..=SPAN).flat_map(|row| {
            (1.max(row - 4)..=SPAN.min(row + 4)).map(move |col| Self { col, row })
        })
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let letter = (b'A' + (self.row - 1) as u8) as char;
        write!(f, "{}{}", letter, self.col)
    }
}

/// One of the six axial movement directions.
///
/// The delta is what a single step adds to a `(col, row)` pair. No other
/// vector is a legal step; in particular `(1, 1)` is not a direction.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Direction {
    /// South-west, `(-1, 1)`.
    SW,
    /// South-east, `(0, 1)`.
    SE,
    /// East, `(1, 0)`.
    E,
    /// North-east, `(1, -1)`.
    NE,
    /// North-west, `(0, -1)`.
    NW,
    /// West, `(-1, 0)`.
    W,
}

impl Direction {
    /// Returns the `(dcol, drow)` step for this direction.
    pub fn delta(self) -> (i8, i8) {
        match self {
            Self::SW => (-1, 1),
            Self::SE => (0, 1),
            Self::E => (1, 0),
            Self::NE => (1, -1),
            Self::NW => (0, -1),
            Self::W => (-1, 0),
        }
    }

    /// Maps a step vector back to its direction, if it is one of the six.
    pub fn from_delta(delta: (i8, i8)) -> Option<Self> {
        use strum::IntoEnumIterator;
        Self::iter().find(|d| d.delta() == delta)
    }

    /// The direction pointing the opposite way.
    pub fn opposite(self) -> Self {
        match self {
            Self::SW => Self::NE,
            Self::SE => Self::NW,
            Self::E => Self::W,
            Self::NE => Self::SW,
            Self::NW => Self::SE,
            Self::W => Self::E,
        }
    }
}
