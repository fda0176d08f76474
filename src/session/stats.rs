//! Session-owned counters: clocks, move counts, scores.

use crate::board::{BoardState, Player, STARTING_MARBLES};
use derive_getters::Getters;
use std::time::Duration;

/// Accumulated counters for one player.
///
/// A player's score is the number of opposing marbles pushed off so far,
/// i.e. `14 - opponent marbles remaining`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Getters)]
pub struct PlayerStats {
    /// Total time spent across this player's turns.
    elapsed: Duration,
    /// Moves this player has made.
    moves: u32,
    /// Opposing marbles captured.
    score: u8,
}

impl PlayerStats {
    fn charge(&mut self, duration: Duration) {
        self.elapsed += duration;
    }

    fn refund(&mut self, duration: Duration) {
        self.elapsed = self.elapsed.saturating_sub(duration);
    }
}

/// The counters for both sides, owned by the session.
///
/// Explicitly passed around rather than global so several sessions can
/// coexist and tests stay deterministic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    black: PlayerStats,
    white: PlayerStats,
}

impl SessionStats {
    /// Creates zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counters for `player`.
    pub fn player(&self, player: Player) -> &PlayerStats {
        match player {
            Player::Black => &self.black,
            Player::White => &self.white,
        }
    }

    fn player_mut(&mut self, player: Player) -> &mut PlayerStats {
        match player {
            Player::Black => &mut self.black,
            Player::White => &mut self.white,
        }
    }

    /// Combined move count of both players.
    pub fn total_moves(&self) -> u32 {
        self.black.moves + self.white.moves
    }

    /// Records one applied move for `player` and charges its turn time.
    pub fn record_move(&mut self, player: Player, duration: Duration) {
        let stats = self.player_mut(player);
        stats.moves += 1;
        stats.charge(duration);
    }

    /// Charges turn time to `player` without counting a move (used when a
    /// submission is rejected for exceeding the time limit).
    pub fn charge_time(&mut self, player: Player, duration: Duration) {
        self.player_mut(player).charge(duration);
    }

    /// Reverts one applied move for `player`, refunding its duration.
    pub fn revert_move(&mut self, player: Player, duration: Duration) {
        let stats = self.player_mut(player);
        stats.moves = stats.moves.saturating_sub(1);
        stats.refund(duration);
    }

    /// Recomputes both scores from the marble counts on `board`.
    pub fn update_scores(&mut self, board: &BoardState) {
        self.black.score = STARTING_MARBLES.saturating_sub(board.marbles(Player::White));
        self.white.score = STARTING_MARBLES.saturating_sub(board.marbles(Player::Black));
    }
}
