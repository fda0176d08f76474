//! Board occupancy: players, marble positions, and the opening layouts.

use super::coord::Coordinate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Marbles each side starts with, in every layout.
pub const STARTING_MARBLES: u8 = 14;

/// One of the two sides.
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
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Player {
    /// The black side (moves first in the standard setup).
    Black,
    /// The white side.
    White,
}

impl Player {
    /// Returns the opposing side.
    pub fn opponent(self) -> Self {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
        }
    }
}

/// The historical starting arrangements.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum BoardLayout {
    /// Classic facing rows of 5/6 plus a wedge of 3.
    #[default]
    Standard,
    /// Two opposing daisies per side on the flanks.
    GermanDaisy,
    /// Daisies packed against the top and bottom edges.
    BelgianDaisy,
}

/// Read-only occupancy snapshot of the 61 cells.
///
/// The rule/AI engine owns the authoritative board; the interaction core
/// holds one of these as a cache and rebuilds it from engine position lists
/// after every state-changing call. Cells absent from the map are empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BoardState {
    cells: HashMap<Coordinate, Player>,
}

impl BoardState {
    /// Builds a board from the two sides' position lists.
    pub fn from_positions(black: &[Coordinate], white: &[Coordinate]) -> Self {
        let mut cells = HashMap::with_capacity(black.len() + white.len());
        for &c in black {
            cells.insert(c, Player::Black);
        }
        for &c in white {
            cells.insert(c, Player::White);
        }
        Self { cells }
    }

    /// Builds the starting board for a layout.
    ///
    /// Engines are free to ignore this and supply their own initial state;
    /// the orchestrator always trusts the engine's.
    pub fn opening(layout: BoardLayout) -> Self {
        let (black, white) = opening_positions(layout);
        Self::from_positions(&black, &white)
    }

    /// The marble on `coord`, or `None` for an empty cell.
    pub fn occupant(&self, coord: Coordinate) -> Option<Player> {
        self.cells.get(&coord).copied()
    }

    /// Number of marbles `player` has on the board.
    pub fn marbles(&self, player: Player) -> u8 {
        self.cells.values().filter(|&&p| p == player).count() as u8
    }

    /// Positions held by `player`, unordered.
    pub fn positions(&self, player: Player) -> Vec<Coordinate> {
        self.cells
            .iter()
            .filter(|&(_, &p)| p == player)
            .map(|(&c, _)| c)
            .collect()
    }
}

/// Starting positions for a layout as `(black, white)` coordinate lists.
fn opening_positions(layout: BoardLayout) -> (Vec<Coordinate>, Vec<Coordinate>) {
    let (black, white): (&[(i8, i8)], &[(i8, i8)]) = match layout {
        BoardLayout::Standard => (
            &[
                (1, 1), (2, 1), (3, 1), (4, 1), (5, 1),
                (1, 2), (2, 2), (3, 2), (4, 2), (5, 2), (6, 2),
                (3, 3), (4, 3), (5, 3),
            ],
            &[
                (5, 9), (6, 9), (7, 9), (8, 9), (9, 9),
                (4, 8), (5, 8), (6, 8), (7, 8), (8, 8), (9, 8),
                (5, 7), (6, 7), (7, 7),
            ],
        ),
        BoardLayout::GermanDaisy => (
            &[
                (1, 2), (2, 2),
                (1, 3), (2, 3), (3, 3),
                (2, 4), (3, 4),
                (7, 6), (8, 6),
                (7, 7), (8, 7), (9, 7),
                (8, 8), (9, 8),
            ],
            &[
                (5, 2), (6, 2),
                (5, 3), (6, 3), (7, 3),
                (6, 4), (7, 4),
                (3, 6), (4, 6),
                (3, 7), (4, 7), (5, 7),
                (4, 8), (5, 8),
            ],
        ),
        BoardLayout::BelgianDaisy => (
            &[
                (1, 1), (2, 1),
                (1, 2), (2, 2), (3, 2),
                (2, 3), (3, 3),
                (7, 7), (8, 7),
                (7, 8), (8, 8), (9, 8),
                (8, 9), (9, 9),
            ],
            &[
                (4, 1), (5, 1),
                (4, 2), (5, 2), (6, 2),
                (5, 3), (6, 3),
                (4, 7), (5, 7),
                (4, 8), (5, 8), (6, 8),
                (5, 9), (6, 9),
            ],
        ),
    };
    let lift = |cells: &[(i8, i8)]| {
        cells
            .iter()
            .map(|&(c, r)| Coordinate::new(c, r).expect("opening layout cell is on the board"))
            .collect()
    };
    (lift(black), lift(white))
}
