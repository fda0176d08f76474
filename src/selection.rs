//! Group selection: the 1–3 marbles a player has picked for their next move.

use crate::board::{BoardState, Coordinate, Direction, Player};
use tracing::{debug, instrument, warn};

/// Maximum marbles in one group.
pub const MAX_GROUP: usize = 3;

/// Checks whether a candidate set of cells forms a legal group on `board`.
///
/// Legal means: 1–3 cells, all occupied by the same player, collinear along
/// one of the six directions with unit spacing and no gaps. The check is a
/// pure function of its arguments so it can be exercised without any
/// session state.
pub fn is_valid_group(board: &BoardState, coords: &[Coordinate]) -> bool {
    let owner = match coords.first().map(|&c| board.occupant(c)) {
        Some(Some(p)) => p,
        _ => return false,
    };
    if coords.iter().any(|&c| board.occupant(c) != Some(owner)) {
        return false;
    }
    group_is_line(coords)
}

/// Geometry half of the group check: collinear, unit-spaced, gap-free.
///
/// Sorts a copy of the coordinates, so caller order does not matter. Sizes
/// outside 1–3 are never legal.
pub fn group_is_line(coords: &[Coordinate]) -> bool {
    let mut sorted: Vec<Coordinate> = coords.to_vec();
    sorted.sort();
    match sorted.as_slice() {
        [_] => true,
        [a, b] => step_between(*a, *b).is_some(),
        [a, b, c] => match (step_between(*a, *b), step_between(*b, *c)) {
            (Some(first), Some(second)) => first == second,
            _ => false,
        },
        _ => false,
    }
}

/// The direction from `a` to `b` if they are exactly one step apart.
fn step_between(a: Coordinate, b: Coordinate) -> Option<Direction> {
    Direction::from_delta((b.col() - a.col(), b.row() - a.row()))
}

/// The marbles currently picked for a move, in click order.
///
/// All mutation goes through [`pick`](Selection::pick) and
/// [`extend`](Selection::extend), which only ever leave the selection in a
/// state that passes [`is_valid_group`]. Cleared when a move is applied,
/// rejected for cause, or the turn is abandoned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    picked: Vec<Coordinate>,
}

impl Selection {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// The selected coordinates in the order they were picked.
    pub fn coords(&self) -> &[Coordinate] {
        &self.picked
    }

    /// Number of selected marbles.
    pub fn len(&self) -> usize {
        self.picked.len()
    }

    /// True when nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.picked.is_empty()
    }

    /// True when `coord` is part of the selection.
    pub fn contains(&self, coord: Coordinate) -> bool {
        self.picked.contains(&coord)
    }

    /// Restarts the selection at `coord`.
    ///
    /// Replaces whatever was selected with just `coord` when the cell holds
    /// one of `active`'s marbles. Clicking an empty or opponent cell never
    /// starts a selection; the call reports `false` and changes nothing.
    #[instrument(skip(self, board))]
    pub fn pick(&mut self, coord: Coordinate, board: &BoardState, active: Player) -> bool {
        if board.occupant(coord) != Some(active) {
            warn!(%coord, ?active, "pick ignored, cell not owned by active player");
            return false;
        }
        self.picked.clear();
        self.picked.push(coord);
        debug!(%coord, "selection restarted");
        true
    }

    /// Toggles `coord` in or out of the selection.
    ///
    /// An already-selected cell is deselected. Otherwise the cell joins the
    /// group only if the group stays within [`MAX_GROUP`] marbles, the cell
    /// is owned by `active`, and the grown group still passes
    /// [`is_valid_group`]. Returns `false`, leaving the selection untouched,
    /// when the candidate is rejected.
    #[instrument(skip(self, board))]
    pub fn extend(&mut self, coord: Coordinate, board: &BoardState, active: Player) -> bool {
        if let Some(at) = self.picked.iter().position(|&c| c == coord) {
            self.picked.remove(at);
            debug!(%coord, "marble deselected");
            return true;
        }
        if self.picked.len() >= MAX_GROUP || board.occupant(coord) != Some(active) {
            warn!(%coord, size = self.picked.len(), "extend rejected");
            return false;
        }
        let mut candidate = self.picked.clone();
        candidate.push(coord);
        if !is_valid_group(board, &candidate) {
            warn!(%coord, "extend rejected, group would not be collinear");
            return false;
        }
        self.picked = candidate;
        debug!(%coord, size = self.picked.len(), "selection extended");
        true
    }

    /// Empties the selection.
    pub fn clear(&mut self) {
        self.picked.clear();
    }
}
