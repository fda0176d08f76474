//! Shared test fixtures: a scriptable fake engine and helpers.
#![allow(dead_code)]

use abalone_core::{
    BoardLayout, BoardState, Coordinate, Direction, Engine, EngineError, EngineReply,
    EngineSnapshot, GameMode, Player, Selection, SessionConfig, SessionObserver,
};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Initializes tracing once per test binary; repeat calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Builds a coordinate that is known to be on the board.
pub fn coord(col: i8, row: i8) -> Coordinate {
    Coordinate::new(col, row).expect("test coordinate is on the board")
}

/// A session config pointing its log file into a scratch directory.
pub fn test_config(mode: GameMode, log_path: PathBuf) -> SessionConfig {
    SessionConfig::with_shared_time_limit(
        Player::Black,
        BoardLayout::Standard,
        mode,
        100,
        60,
        log_path,
    )
}

/// Forced outcome for the fake engine's next move submission.
pub enum Scripted {
    /// Reject the move.
    Invalid,
    /// Report the engine-side move cap with these final positions.
    MaxMoves(EngineSnapshot),
    /// Fail with an engine error.
    Fault,
    /// Accept and force these exact positions and reply duration.
    Snapshot(EngineSnapshot, Duration),
}

/// Snapshot of the standard opening.
pub fn standard_snapshot() -> EngineSnapshot {
    let board = BoardState::opening(BoardLayout::Standard);
    EngineSnapshot {
        black: board.positions(Player::Black),
        white: board.positions(Player::White),
    }
}

/// Standard opening with each side's position list truncated to a count.
pub fn snapshot_with_counts(black: usize, white: usize) -> EngineSnapshot {
    let mut snapshot = standard_snapshot();
    snapshot.black.truncate(black);
    snapshot.white.truncate(white);
    snapshot
}

/// Test double for the rule/AI engine.
///
/// Unscripted submissions are applied naively: the selected marbles shift
/// one step, marbles stepping off the board disappear, and a blocked
/// destination rejects the move. No sumito, no automatic reply on the
/// board - close enough to exercise the orchestrator, which never looks
/// inside.
pub struct FakeEngine {
    initial: EngineSnapshot,
    current: EngineSnapshot,
    history: Vec<EngineSnapshot>,
    script: VecDeque<Scripted>,
    reply_duration: Duration,
    applies: Arc<AtomicUsize>,
}

impl FakeEngine {
    /// Engine starting from the standard opening.
    pub fn standard() -> Self {
        Self::with_layout(BoardLayout::Standard)
    }

    /// Engine starting from the given layout.
    pub fn with_layout(layout: BoardLayout) -> Self {
        let board = BoardState::opening(layout);
        let snapshot = EngineSnapshot {
            black: board.positions(Player::Black),
            white: board.positions(Player::White),
        };
        Self {
            initial: snapshot.clone(),
            current: snapshot,
            history: Vec::new(),
            script: VecDeque::new(),
            reply_duration: Duration::from_millis(150),
            applies: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Queues a forced outcome for the next submission.
    pub fn script(mut self, outcome: Scripted) -> Self {
        self.script.push_back(outcome);
        self
    }

    /// Overrides the reply duration reported for accepted moves.
    pub fn reply_duration(mut self, duration: Duration) -> Self {
        self.reply_duration = duration;
        self
    }

    /// Handle counting how often the engine was asked to apply a move.
    pub fn apply_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.applies)
    }
}

impl Engine for FakeEngine {
    fn apply_move_and_maybe_reply(
        &mut self,
        selection: &Selection,
        direction: Direction,
    ) -> Result<EngineReply, EngineError> {
        self.applies.fetch_add(1, Ordering::SeqCst);
        if let Some(outcome) = self.script.pop_front() {
            return match outcome {
                Scripted::Invalid => Ok(EngineReply::Invalid),
                Scripted::MaxMoves(snapshot) => {
                    self.history.push(self.current.clone());
                    self.current = snapshot.clone();
                    Ok(EngineReply::MaxMoves { snapshot })
                }
                Scripted::Fault => Err(EngineError::new("scripted fault")),
                Scripted::Snapshot(snapshot, reply_duration) => {
                    self.history.push(self.current.clone());
                    self.current = snapshot.clone();
                    Ok(EngineReply::Applied {
                        snapshot,
                        reply_duration,
                    })
                }
            };
        }

        let board = self.current.board();
        let moving: Vec<Coordinate> = selection.coords().to_vec();
        let color = match moving.first().and_then(|&c| board.occupant(c)) {
            Some(color) => color,
            None => return Ok(EngineReply::Invalid),
        };
        let mut landed = Vec::new();
        for &marble in &moving {
            match marble.step(direction) {
                Some(target) => {
                    if board.occupant(target).is_some() && !moving.contains(&target) {
                        return Ok(EngineReply::Invalid);
                    }
                    landed.push(target);
                }
                None => {} // pushed off the board
            }
        }

        let mut next = self.current.clone();
        let list = match color {
            Player::Black => &mut next.black,
            Player::White => &mut next.white,
        };
        list.retain(|c| !moving.contains(c));
        list.extend(landed);

        self.history.push(self.current.clone());
        self.current = next.clone();
        Ok(EngineReply::Applied {
            snapshot: next,
            reply_duration: self.reply_duration,
        })
    }

    fn undo_last_move_pair(&mut self) -> Result<(), EngineError> {
        self.current = self
            .history
            .pop()
            .ok_or_else(|| EngineError::new("no move to roll back"))?;
        Ok(())
    }

    fn current_state(&self) -> Result<EngineSnapshot, EngineError> {
        Ok(self.current.clone())
    }

    fn initial_state(&self) -> Result<EngineSnapshot, EngineError> {
        Ok(self.initial.clone())
    }
}

/// Observer that records every notification for assertions.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    /// Log lines in arrival order.
    pub lines: Rc<RefCell<Vec<String>>>,
    /// Number of state-update notifications.
    pub updates: Rc<Cell<usize>>,
}

impl SessionObserver for RecordingObserver {
    fn on_state_updated(&self) {
        self.updates.set(self.updates.get() + 1);
    }

    fn on_log_appended(&self, line: &str) {
        self.lines.borrow_mut().push(line.to_string());
    }
}
