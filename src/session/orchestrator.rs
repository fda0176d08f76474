//! The turn state machine driving one game session.

use crate::board::{BoardState, Coordinate, Direction, Player};
use crate::db::{GameRepository, NewGameRecord};
use crate::engine::{Engine, EngineReply};
use crate::log::{EndReason, GameSummary, MoveLog, MoveRecord, RecordOutcome, format_move};
use crate::selection::Selection;
use crate::session::{GameMode, SessionConfig, SessionError, SessionStats};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument, warn};

// A side has lost once six of its fourteen marbles are gone.
const LOSS_THRESHOLD: u8 = 8;

/// Where the session is in its turn cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the active player to start a selection.
    AwaitingSelection,
    /// A non-empty selection exists; waiting for a direction.
    AwaitingDirection,
    /// A move is being handed to the engine.
    Submitting,
    /// The engine is computing its automatic reply.
    EngineReplyPending,
    /// The game is over; no further input is accepted.
    Ended,
}

/// Notification hooks the orchestrator invokes after each state change.
///
/// Both hooks are called synchronously on the orchestrator's thread and
/// their return values are ignored. The presentation layer implements this
/// to redraw and to append log lines.
pub trait SessionObserver {
    /// Board, selection, clocks, or phase changed; redraw.
    fn on_state_updated(&self) {}

    /// One formatted line was appended to the move log.
    fn on_log_appended(&self, line: &str) {
        let _ = line;
    }
}

/// Observer that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl SessionObserver for NullObserver {}

/// One game session: the authoritative sequencer of human and engine turns.
///
/// Owns the selection, the cached board, the move log, and all counters;
/// everything is mutated only through this struct, one event at a time.
/// The engine is consulted synchronously and trusted completely on move
/// legality.
pub struct GameSession {
    config: SessionConfig,
    engine: Box<dyn Engine>,
    observer: Box<dyn SessionObserver>,
    repository: Option<GameRepository>,
    board: BoardState,
    selection: Selection,
    phase: Phase,
    active: Player,
    log: MoveLog,
    stats: SessionStats,
    turn_started: Instant,
    summary: Option<GameSummary>,
}

impl GameSession {
    /// Starts a session: pulls the initial board from the engine and hands
    /// the first turn to the configured starting color.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::EngineFault`] if the engine cannot supply
    /// its initial state.
    #[instrument(skip(config, engine, observer), fields(mode = %config.mode(), starting = %config.starting_color()))]
    pub fn new(
        config: SessionConfig,
        engine: Box<dyn Engine>,
        observer: Box<dyn SessionObserver>,
    ) -> Result<Self, SessionError> {
        let board = engine.initial_state()?.board();
        let mut stats = SessionStats::new();
        stats.update_scores(&board);
        let active = *config.starting_color();
        info!(black = board.marbles(Player::Black), white = board.marbles(Player::White), "Session started");
        Ok(Self {
            config,
            engine,
            observer,
            repository: None,
            board,
            selection: Selection::new(),
            phase: Phase::AwaitingSelection,
            active,
            log: MoveLog::new(),
            stats,
            turn_started: Instant::now(),
            summary: None,
        })
    }

    /// Attaches a repository; finished games are recorded through it.
    pub fn with_repository(mut self, repository: GameRepository) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Starts a fresh selection at `coord`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidSelection`] when the cell is not one
    /// of the active player's marbles, and [`SessionError::SessionOver`]
    /// after the game has ended.
    #[instrument(skip(self), fields(active = %self.active))]
    pub fn pick(&mut self, coord: Coordinate) -> Result<(), SessionError> {
        self.ensure_running()?;
        if self.selection.pick(coord, &self.board, self.active) {
            self.phase = Phase::AwaitingDirection;
            self.observer.on_state_updated();
            Ok(())
        } else {
            Err(SessionError::InvalidSelection)
        }
    }

    /// Toggles `coord` in or out of the current selection.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidSelection`] when adding the cell
    /// would break the group rules, and [`SessionError::SessionOver`]
    /// after the game has ended.
    #[instrument(skip(self), fields(active = %self.active))]
    pub fn extend(&mut self, coord: Coordinate) -> Result<(), SessionError> {
        self.ensure_running()?;
        if self.selection.extend(coord, &self.board, self.active) {
            self.phase = if self.selection.is_empty() {
                Phase::AwaitingSelection
            } else {
                Phase::AwaitingDirection
            };
            self.observer.on_state_updated();
            Ok(())
        } else {
            Err(SessionError::InvalidSelection)
        }
    }

    /// Abandons the current selection (e.g. the player switched away).
    #[instrument(skip(self))]
    pub fn clear_selection(&mut self) {
        self.selection.clear();
        if self.phase != Phase::Ended {
            self.phase = Phase::AwaitingSelection;
        }
        self.observer.on_state_updated();
    }

    /// Submits the current selection in `direction`.
    ///
    /// Applies the policy checks (time limit, move cap), delegates to the
    /// engine, and on success updates the cached board, clocks, counters,
    /// scores, and the move log, then checks for game termination.
    ///
    /// # Errors
    ///
    /// Every rejection and fault is reported through the
    /// [`SessionError`] taxonomy; only
    /// [`MaxMovesReached`](SessionError::MaxMovesReached) and
    /// [`EngineFault`](SessionError::EngineFault) leave the session ended.
    #[instrument(skip(self), fields(active = %self.active, selection = self.selection.len()))]
    pub fn submit(&mut self, direction: Direction) -> Result<(), SessionError> {
        self.ensure_running()?;
        if self.selection.is_empty() {
            warn!("submit without a selection");
            return Err(SessionError::InvalidSelection);
        }
        self.phase = Phase::Submitting;
        let mover = self.active;
        let elapsed = self.turn_started.elapsed();
        let limit = self.config.time_limit(mover);
        let text = format_move(self.selection.coords(), direction);

        // Post-hoc time limit: read the clock only now, at submission. The
        // overrun turn is still charged to the player's accumulator.
        if elapsed > limit {
            warn!(elapsed = ?elapsed, limit = ?limit, "time limit exceeded at submission");
            let line = self.log.append(MoveRecord::new(
                mover,
                format!("{text} (time limit exceeded)"),
                elapsed,
                RecordOutcome::Rejected,
            ));
            self.observer.on_log_appended(&line);
            self.stats.charge_time(mover, elapsed);
            self.selection.clear();
            self.turn_started = Instant::now();
            self.phase = Phase::AwaitingSelection;
            self.observer.on_state_updated();
            return Err(SessionError::TimeLimitExceeded { elapsed, limit });
        }

        // Combined move cap, checked before the engine is contacted.
        if self.stats.total_moves() >= *self.config.move_limit() {
            info!("move cap reached before submission");
            self.end_game(EndReason::MoveLimitReached);
            return Err(SessionError::MaxMovesReached);
        }

        if *self.config.mode() == GameMode::HumanVsEngine {
            self.phase = Phase::EngineReplyPending;
        }
        let reply = match self.engine.apply_move_and_maybe_reply(&self.selection, direction) {
            Ok(reply) => reply,
            Err(err) => {
                error!(%err, "engine fault during submit");
                self.end_game(EndReason::EngineFault);
                return Err(SessionError::EngineFault(err));
            }
        };

        match reply {
            EngineReply::Invalid => {
                debug!(%text, "engine rejected move");
                let line = self.log.append(MoveRecord::new(
                    mover,
                    text.clone(),
                    Duration::ZERO,
                    RecordOutcome::Rejected,
                ));
                self.observer.on_log_appended(&line);
                self.selection.clear();
                self.phase = Phase::AwaitingSelection;
                self.observer.on_state_updated();
                Err(SessionError::IllegalMove(text))
            }
            EngineReply::MaxMoves { snapshot } => {
                info!("engine reported move cap");
                self.board = snapshot.board();
                self.stats.update_scores(&self.board);
                self.end_game(EndReason::MoveLimitReached);
                Err(SessionError::MaxMovesReached)
            }
            EngineReply::Applied {
                snapshot,
                reply_duration,
            } => {
                self.board = snapshot.board();
                let line = self.log.append(MoveRecord::new(
                    mover,
                    text,
                    elapsed,
                    RecordOutcome::Applied,
                ));
                self.observer.on_log_appended(&line);
                self.stats.record_move(mover, elapsed);
                if *self.config.mode() == GameMode::HumanVsEngine {
                    let reply_line = self.log.append(MoveRecord::new(
                        mover.opponent(),
                        "(engine reply)".to_string(),
                        reply_duration,
                        RecordOutcome::Applied,
                    ));
                    self.observer.on_log_appended(&reply_line);
                    self.stats.record_move(mover.opponent(), reply_duration);
                    // The turn comes straight back to the human side.
                } else {
                    self.active = mover.opponent();
                }
                self.stats.update_scores(&self.board);
                self.selection.clear();
                self.turn_started = Instant::now();
                self.phase = Phase::AwaitingSelection;
                self.observer.on_state_updated();

                let black_left = self.board.marbles(Player::Black);
                let white_left = self.board.marbles(Player::White);
                if black_left <= LOSS_THRESHOLD || white_left <= LOSS_THRESHOLD {
                    info!(black_left, white_left, "marble threshold reached");
                    self.end_game(EndReason::MarblesCaptured);
                }
                Ok(())
            }
        }
    }

    /// Rolls back the most recent applied move-pair (one ply in
    /// human-vs-human mode) and returns the turn to the side that made it.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NothingToUndo`] when no applied move exists,
    /// [`SessionError::ReplyPending`] while the engine is replying,
    /// [`SessionError::SessionOver`] after the game has ended, and
    /// [`SessionError::EngineFault`] if the engine cannot roll back.
    #[instrument(skip(self))]
    pub fn undo(&mut self) -> Result<(), SessionError> {
        self.ensure_running()?;
        if self.phase == Phase::EngineReplyPending {
            return Err(SessionError::ReplyPending);
        }
        let plies = match self.config.mode() {
            GameMode::HumanVsEngine => 2,
            GameMode::HumanVsHuman => 1,
        };
        if self.log.applied_count() < plies {
            debug!("undo requested with no applied move");
            return Err(SessionError::NothingToUndo);
        }

        if let Err(err) = self.engine.undo_last_move_pair() {
            error!(%err, "engine fault during undo");
            self.end_game(EndReason::EngineFault);
            return Err(SessionError::EngineFault(err));
        }

        let popped = self.log.pop_last_applied(plies);
        for record in &popped {
            self.stats.revert_move(*record.actor(), *record.duration());
        }

        let snapshot = match self.engine.current_state() {
            Ok(snapshot) => snapshot,
            Err(err) => {
                error!(%err, "engine fault refreshing state after undo");
                self.end_game(EndReason::EngineFault);
                return Err(SessionError::EngineFault(err));
            }
        };
        self.board = snapshot.board();
        self.stats.update_scores(&self.board);

        self.active = match self.config.mode() {
            GameMode::HumanVsEngine => *self.config.starting_color(),
            GameMode::HumanVsHuman => popped
                .first()
                .map(|r| *r.actor())
                .unwrap_or(*self.config.starting_color()),
        };
        self.selection.clear();
        self.turn_started = Instant::now();
        self.phase = Phase::AwaitingSelection;
        self.observer.on_state_updated();
        info!(plies, active = %self.active, "move pair rolled back");
        Ok(())
    }

    /// Ends the session, determines the winner, persists the log and
    /// summary, records the result, and notifies the presentation layer.
    ///
    /// Fires at most once; later calls are ignored.
    #[instrument(skip(self), fields(reason = %reason))]
    pub fn end_game(&mut self, reason: EndReason) {
        if self.phase == Phase::Ended {
            return;
        }
        let black_left = self.board.marbles(Player::Black);
        let white_left = self.board.marbles(Player::White);
        // An engine fault skips winner determination entirely; otherwise
        // the side whose opponent is at or below the threshold wins, and
        // both at once means nobody does.
        let winner = match reason {
            EndReason::EngineFault => None,
            _ => match (
                white_left <= LOSS_THRESHOLD,
                black_left <= LOSS_THRESHOLD,
            ) {
                (true, false) => Some(Player::Black),
                (false, true) => Some(Player::White),
                _ => None,
            },
        };
        let black = *self.stats.player(Player::Black);
        let white = *self.stats.player(Player::White);
        let summary = GameSummary::new(
            winner,
            reason,
            *black.moves(),
            *white.moves(),
            *black.elapsed(),
            *white.elapsed(),
            black_left,
            white_left,
        );
        self.phase = Phase::Ended;
        self.observer.on_log_appended(&summary.headline());

        if let Err(err) = self.log.persist(&summary, self.config.log_path()) {
            warn!(%err, "failed to persist game log");
        }
        if let Some(repository) = &self.repository {
            let record = NewGameRecord::new(
                self.config.mode().to_string(),
                winner.map(|p| p.to_string()),
                reason.to_string(),
                *black.moves() as i32,
                *white.moves() as i32,
                black.elapsed().as_secs_f64(),
                white.elapsed().as_secs_f64(),
                i32::from(black_left),
                i32::from(white_left),
                self.config.log_path().display().to_string(),
            );
            if let Err(err) = repository.record_game(record) {
                warn!(%err, "failed to record game result");
            }
        }
        self.summary = Some(summary);
        info!(?winner, "game ended");
        self.observer.on_state_updated();
    }

    /// Read-only clock probe for periodic UI ticks.
    pub fn turn_elapsed(&self) -> Duration {
        self.turn_started.elapsed()
    }

    /// The cached board as of the last engine refresh.
    pub fn board(&self) -> &BoardState {
        &self.board
    }

    /// Current phase of the turn cycle.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Side whose turn it is.
    pub fn active_player(&self) -> Player {
        self.active
    }

    /// The current group selection.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The move log so far.
    pub fn move_log(&self) -> &MoveLog {
        &self.log
    }

    /// Both players' counters.
    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// The session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Final summary, available once the game has ended.
    pub fn summary(&self) -> Option<&GameSummary> {
        self.summary.as_ref()
    }

    /// True once the session has ended.
    pub fn is_over(&self) -> bool {
        self.phase == Phase::Ended
    }

    fn ensure_running(&self) -> Result<(), SessionError> {
        if self.phase == Phase::Ended {
            Err(SessionError::SessionOver)
        } else {
            Ok(())
        }
    }
}
