//! Session lifecycle.
//!
//! `GameController` owns one session from layout generation to the final
//! summary. All state changes go through `&mut self`, so a move and a timer
//! tick can never interleave; hosts that share a controller across threads
//! wrap it in a `Mutex`.
//!
//! A session reports to its logger exactly twice: at construction and at
//! the first finalization. Later finalizations return the stored summary.

use std::time::Duration;

use rand::Rng;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use super::event::GameEvent;
use crate::board::{
    BridgeLayout, FallCause, Outcome, Player, PlayerId, PlayerState, Roster, Side, TileGrid,
};
use crate::config::{ConfigError, GameConfig};
use crate::session::{elapsed_between, SessionContext, SessionId, SessionStart, SessionSummary};
use crate::timer::{Countdown, Tick};
use crate::turn::TurnScheduler;

/// A step request: `player` moves onto `side` of `row`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub player: PlayerId,
    pub row: usize,
    pub side: Side,
}

/// Reasons a move or turn signal is refused. A refused call leaves the
/// session untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("the game is over")]
    GameOver,

    #[error("no player with id {0}")]
    UnknownPlayer(usize),

    #[error("{0} has already finished")]
    PlayerFinished(String),

    #[error("it is {current}'s turn, not {player}'s")]
    NotYourTurn { player: String, current: String },

    #[error("{player} must step onto row {expected}, not row {got}")]
    WrongRow {
        player: String,
        expected: usize,
        got: usize,
    },
}

/// Drives a single Glass Bridge session.
#[derive(Debug)]
pub struct GameController {
    config: GameConfig,
    layout: BridgeLayout,
    roster: Roster,
    scheduler: TurnScheduler,
    tiles: TileGrid,
    countdown: Countdown,
    ctx: SessionContext,
    session_id: Option<SessionId>,
    start_time: OffsetDateTime,
    summary: Option<SessionSummary>,
}

impl GameController {
    /// Starts a session with a freshly drawn layout of
    /// `config.bridge_length` rows.
    pub fn start<I, S, R>(
        config: GameConfig,
        names: I,
        rng: &mut R,
        ctx: SessionContext,
    ) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        R: Rng + ?Sized,
    {
        let roster = Roster::new(names)?;
        config.validate()?;
        let layout = BridgeLayout::generate(config.bridge_length, rng)?;
        Ok(Self::from_parts(config, roster, layout, ctx))
    }

    /// Starts a session on a given layout. The layout decides the bridge
    /// length; `config.bridge_length` is overwritten.
    pub fn new<I, S>(
        mut config: GameConfig,
        names: I,
        layout: BridgeLayout,
        ctx: SessionContext,
    ) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let roster = Roster::new(names)?;
        config.bridge_length = layout.len();
        config.validate()?;
        Ok(Self::from_parts(config, roster, layout, ctx))
    }

    fn from_parts(
        config: GameConfig,
        roster: Roster,
        layout: BridgeLayout,
        mut ctx: SessionContext,
    ) -> Self {
        let start_time = ctx.clock.now();
        let start = SessionStart {
            start_time,
            players_selected: roster.names(),
            layout: layout.clone(),
        };
        let session_id = match ctx.logger.record_session_start(&start) {
            Ok(id) => Some(id),
            Err(e) => {
                warn!(error = %e, "session start not recorded; continuing without persistence");
                None
            }
        };
        info!(
            session = ?session_id,
            players = roster.len(),
            rows = layout.len(),
            policy = config.turn_policy.option_value(),
            "session started"
        );

        GameController {
            scheduler: TurnScheduler::new(roster.len()),
            tiles: TileGrid::new(layout.len()),
            countdown: Countdown::new(config.time_limit),
            config,
            layout,
            roster,
            ctx,
            session_id,
            start_time,
            summary: None,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn layout(&self) -> &BridgeLayout {
        &self.layout
    }

    pub fn tiles(&self) -> &TileGrid {
        &self.tiles
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn player(&self, id: PlayerId) -> &Player {
        self.roster.get(id)
    }

    pub fn find_player(&self, name: &str) -> Option<PlayerId> {
        self.roster.find(name)
    }

    pub fn session_id(&self) -> Option<SessionId> {
        self.session_id
    }

    pub fn start_time(&self) -> OffsetDateTime {
        self.start_time
    }

    /// The player whose turn it is, if the game is still running. Always
    /// `None` once the session is finalized.
    pub fn current_player_id(&self) -> Option<PlayerId> {
        self.scheduler.peek_current()
    }

    pub fn current_player(&self) -> Option<&Player> {
        self.current_player_id().map(|id| self.roster.get(id))
    }

    /// Players still taking turns, current first.
    pub fn active_players(&self) -> Vec<PlayerId> {
        self.scheduler.iter().collect()
    }

    pub fn remaining_time(&self) -> Duration {
        self.countdown.remaining()
    }

    pub fn timer_running(&self) -> bool {
        self.countdown.is_running()
    }

    pub fn is_over(&self) -> bool {
        self.summary.is_some()
    }

    /// Final summary, once the game is over.
    pub fn summary(&self) -> Option<&SessionSummary> {
        self.summary.as_ref()
    }

    /// Names of players who crossed so far.
    pub fn winners(&self) -> Vec<String> {
        self.roster.crossed_names()
    }

    /// Moves the current player onto `side` of their next row.
    pub fn submit_move(&mut self, side: Side) -> Result<Vec<GameEvent>, MoveError> {
        let player = self.current_player_id().ok_or(MoveError::GameOver)?;
        let row = self.roster.get(player).next_row();
        self.apply_move(Move { player, row, side })
    }

    /// Validates and applies a step.
    pub fn apply_move(&mut self, mv: Move) -> Result<Vec<GameEvent>, MoveError> {
        self.validate_move(mv)?;

        let mut events = Vec::new();
        if self.countdown.start() {
            debug!(limit = ?self.countdown.limit(), "countdown started");
            events.push(GameEvent::TimerStarted {
                limit: self.countdown.limit(),
            });
        }

        let outcome = self.layout.evaluate(mv.row, mv.side);
        self.tiles.reveal(mv.row, mv.side, outcome);
        events.push(GameEvent::TileRevealed {
            row: mv.row,
            side: mv.side,
            outcome,
        });

        let last_row = self.layout.last_row();
        let player = self.roster.get_mut(mv.player);
        debug!(player = %player.name, row = mv.row, side = %mv.side, ?outcome, "step");
        match outcome {
            Outcome::Safe => {
                player.row = Some(mv.row);
                player.side = Some(mv.side);
                player.state = PlayerState::OnBridge;
                events.push(GameEvent::PlayerMoved {
                    player: player.name.clone(),
                    row: mv.row,
                    side: mv.side,
                });
                if mv.row == last_row {
                    player.state = PlayerState::Crossed;
                    info!(player = %player.name, "crossed the bridge");
                    events.push(GameEvent::PlayerCrossed {
                        player: player.name.clone(),
                    });
                    self.retire_current(&mut events);
                } else if self.config.turn_policy.rotates_after_safe_step() {
                    self.scheduler.advance(false);
                    self.push_turn_change(mv.player, &mut events);
                }
            }
            Outcome::Broken => {
                player.state = PlayerState::Fallen(FallCause::BrokenTile);
                info!(player = %player.name, row = mv.row, "fell through a broken tile");
                events.push(GameEvent::PlayerFell {
                    player: player.name.clone(),
                    row: player.row,
                    cause: FallCause::BrokenTile,
                });
                self.retire_current(&mut events);
            }
        }

        self.debug_check_invariants();
        Ok(events)
    }

    /// The current player gives up the rest of their turn and goes to the
    /// back of the rotation.
    pub fn end_turn(&mut self) -> Result<Vec<GameEvent>, MoveError> {
        let current = self.current_player_id().ok_or(MoveError::GameOver)?;
        if self.is_over() {
            return Err(MoveError::GameOver);
        }
        self.scheduler.advance(false);
        let mut events = Vec::new();
        self.push_turn_change(current, &mut events);
        Ok(events)
    }

    /// Advances the countdown by `dt`. When it runs out every active player
    /// falls, the bridge collapses, and the game ends.
    pub fn tick(&mut self, dt: Duration) -> Vec<GameEvent> {
        if self.is_over() {
            return Vec::new();
        }
        match self.countdown.tick(dt) {
            Tick::Idle => Vec::new(),
            Tick::Running(remaining) => vec![GameEvent::TimeRemaining { remaining }],
            Tick::Expired => self.time_out(),
        }
    }

    /// Ends the session and reports it. Only the first call does anything;
    /// later calls return the same summary without touching the logger.
    ///
    /// Players still active when a host ends the game early are reported
    /// as neither crossed nor fallen.
    pub fn finalize(&mut self, time_limit_reached: bool) -> &SessionSummary {
        let summary = match self.summary.take() {
            Some(existing) => {
                debug!("session already finalized");
                existing
            }
            None => self.close_session(time_limit_reached),
        };
        self.summary.insert(summary)
    }

    fn validate_move(&self, mv: Move) -> Result<(), MoveError> {
        if self.is_over() {
            return Err(MoveError::GameOver);
        }
        if mv.player.0 >= self.roster.len() {
            return Err(MoveError::UnknownPlayer(mv.player.0));
        }
        let player = self.roster.get(mv.player);
        if player.is_terminal() {
            return Err(MoveError::PlayerFinished(player.name.clone()));
        }
        let current = self.current_player_id().ok_or(MoveError::GameOver)?;
        if current != mv.player {
            return Err(MoveError::NotYourTurn {
                player: player.name.clone(),
                current: self.roster.get(current).name.clone(),
            });
        }
        let expected = player.next_row();
        if mv.row != expected {
            return Err(MoveError::WrongRow {
                player: player.name.clone(),
                expected,
                got: mv.row,
            });
        }
        Ok(())
    }

    /// Removes the current (now terminal) player and hands the turn on, or
    /// ends the game if nobody is left.
    fn retire_current(&mut self, events: &mut Vec<GameEvent>) {
        match self.scheduler.advance(true) {
            Some(next) => events.push(GameEvent::TurnChanged {
                player: self.roster.get(next).name.clone(),
            }),
            None => {
                let summary = self.finalize(false).clone();
                events.push(GameEvent::GameOver { summary });
            }
        }
    }

    fn push_turn_change(&self, previous: PlayerId, events: &mut Vec<GameEvent>) {
        if let Some(next) = self.current_player_id() {
            if next != previous {
                events.push(GameEvent::TurnChanged {
                    player: self.roster.get(next).name.clone(),
                });
            }
        }
    }

    fn time_out(&mut self) -> Vec<GameEvent> {
        info!("time limit reached");
        let mut events = Vec::new();
        for id in self.scheduler.drain() {
            let player = self.roster.get_mut(id);
            player.state = PlayerState::Fallen(FallCause::TimeOut);
            events.push(GameEvent::PlayerFell {
                player: player.name.clone(),
                row: player.row,
                cause: FallCause::TimeOut,
            });
        }
        let rows = self.tiles.collapse();
        if !rows.is_empty() {
            events.push(GameEvent::BridgeCollapsed { rows });
        }
        let summary = self.finalize(true).clone();
        events.push(GameEvent::GameOver { summary });
        events
    }

    fn close_session(&mut self, time_limit_reached: bool) -> SessionSummary {
        self.countdown.stop();
        let abandoned = self.scheduler.drain();
        if !abandoned.is_empty() {
            debug!(players = abandoned.len(), "session closed with players still on turn");
        }
        let end_time = self.ctx.clock.now();
        let summary = SessionSummary {
            session_id: self.session_id,
            start_time: self.start_time,
            end_time,
            duration: elapsed_between(self.start_time, end_time),
            players_selected: self.roster.names(),
            players_crossed: self.roster.crossed_names(),
            players_fallen: self.roster.fallen_names(),
            time_limit_reached,
            layout: self.layout.clone(),
        };
        info!(
            session = ?self.session_id,
            crossed = ?summary.players_crossed,
            fallen = summary.players_fallen.len(),
            time_limit_reached,
            "game over"
        );
        match self.session_id {
            Some(id) => {
                if let Err(e) = self.ctx.logger.record_session_end(id, &summary) {
                    warn!(session = %id, error = %e, "session end not recorded");
                }
            }
            None => warn!("session start was never recorded; skipping end record"),
        }
        summary
    }

    fn debug_check_invariants(&self) {
        debug_assert!(
            self.scheduler
                .iter()
                .all(|id| !self.roster.get(id).is_terminal()),
            "scheduler holds a terminal player"
        );
        debug_assert!(
            self.is_over() || !self.scheduler.is_empty(),
            "running session with an empty scheduler"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{ManualClock, MemoryLogger};
    use crate::turn::TurnPolicy;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn layout(sides: &[Side]) -> BridgeLayout {
        BridgeLayout::from_safe_sides(sides.to_vec()).unwrap()
    }

    fn game(names: &[&str], sides: &[Side]) -> (GameController, MemoryLogger) {
        let logger = MemoryLogger::new();
        let ctx = SessionContext::new(logger.clone(), ManualClock::new(OffsetDateTime::UNIX_EPOCH));
        let game = GameController::new(GameConfig::default(), names.iter().copied(), layout(sides), ctx)
            .unwrap();
        (game, logger)
    }

    use Side::{Left as L, Right as R};

    #[test]
    fn start_generates_configured_length() {
        let config = GameConfig {
            bridge_length: 6,
            ..GameConfig::default()
        };
        let mut rng = SmallRng::seed_from_u64(5);
        let game = GameController::start(config, ["A"], &mut rng, SessionContext::default()).unwrap();
        assert_eq!(game.layout().len(), 6);
        assert_eq!(game.tiles().len(), 6);
    }

    #[test]
    fn start_rejects_bad_configuration_before_logging() {
        let logger = MemoryLogger::new();
        let mut rng = SmallRng::seed_from_u64(5);

        let err = GameController::start(
            GameConfig::default(),
            Vec::<String>::new(),
            &mut rng,
            SessionContext::with_logger(logger.clone()),
        )
        .unwrap_err();
        assert_eq!(err, ConfigError::EmptyRoster);

        let config = GameConfig {
            bridge_length: 0,
            ..GameConfig::default()
        };
        let err = GameController::start(config, ["A"], &mut rng, SessionContext::with_logger(logger.clone()))
            .unwrap_err();
        assert_eq!(err, ConfigError::EmptyBridge);

        let config = GameConfig {
            time_limit: Duration::ZERO,
            ..GameConfig::default()
        };
        let err = GameController::new(config, ["A"], layout(&[L]), SessionContext::with_logger(logger.clone()))
            .unwrap_err();
        assert_eq!(err, ConfigError::ZeroTimeLimit);

        assert!(logger.snapshot().starts.is_empty());
    }

    #[test]
    fn new_records_session_start_once() {
        let (game, logger) = game(&["A", "B"], &[L, R, L]);
        let log = logger.snapshot();
        assert_eq!(log.starts.len(), 1);
        assert_eq!(log.starts[0].1.players_selected, vec!["A", "B"]);
        assert_eq!(log.starts[0].1.layout, layout(&[L, R, L]));
        assert_eq!(game.session_id(), Some(SessionId(1)));
        assert_eq!(game.current_player().unwrap().name, "A");
        assert!(!game.timer_running());
    }

    #[test]
    fn first_move_starts_timer_once() {
        let (mut game, _) = game(&["A"], &[L, R, L]);
        let events = game.submit_move(L).unwrap();
        assert!(matches!(events[0], GameEvent::TimerStarted { .. }));
        assert!(game.timer_running());
        let events = game.submit_move(R).unwrap();
        assert!(!events.iter().any(|e| matches!(e, GameEvent::TimerStarted { .. })));
    }

    #[test]
    fn tick_before_first_move_does_nothing() {
        let (mut game, _) = game(&["A"], &[L]);
        assert!(game.tick(Duration::from_secs(100)).is_empty());
        assert_eq!(game.remaining_time(), Duration::from_secs(40));
        assert!(!game.is_over());
    }

    #[test]
    fn safe_step_keeps_turn_under_default_policy() {
        let (mut game, _) = game(&["A", "B"], &[L, R, L]);
        let events = game.submit_move(L).unwrap();
        assert!(!events.iter().any(|e| matches!(e, GameEvent::TurnChanged { .. })));
        let a = game.player(PlayerId(0));
        assert_eq!(a.state, PlayerState::OnBridge);
        assert_eq!(a.row, Some(0));
        assert_eq!(a.side, Some(L));
        assert_eq!(game.current_player_id(), Some(PlayerId(0)));
    }

    #[test]
    fn safe_step_rotates_under_rotate_policy() {
        let logger = MemoryLogger::new();
        let config = GameConfig {
            turn_policy: TurnPolicy::RotateEachMove,
            ..GameConfig::default()
        };
        let mut game =
            GameController::new(config, ["A", "B"], layout(&[L, R, L]), SessionContext::with_logger(logger))
                .unwrap();
        let events = game.submit_move(L).unwrap();
        assert_eq!(
            events.last(),
            Some(&GameEvent::TurnChanged { player: "B".into() })
        );
        assert_eq!(game.current_player_id(), Some(PlayerId(1)));
        game.submit_move(L).unwrap();
        assert_eq!(game.current_player_id(), Some(PlayerId(0)));
        // A resumes from row 1.
        game.submit_move(R).unwrap();
        assert_eq!(game.player(PlayerId(0)).row, Some(1));
    }

    #[test]
    fn broken_step_retires_player_and_passes_turn() {
        let (mut game, _) = game(&["A", "B"], &[L, R, L]);
        let events = game.submit_move(R).unwrap();
        let a = game.player(PlayerId(0));
        assert_eq!(a.state, PlayerState::Fallen(FallCause::BrokenTile));
        assert_eq!(a.row, None);
        assert!(events.contains(&GameEvent::PlayerFell {
            player: "A".into(),
            row: None,
            cause: FallCause::BrokenTile,
        }));
        assert_eq!(events.last(), Some(&GameEvent::TurnChanged { player: "B".into() }));
        assert_eq!(game.active_players(), vec![PlayerId(1)]);
    }

    #[test]
    fn crossing_the_last_row() {
        let (mut game, logger) = game(&["A"], &[L, R]);
        game.submit_move(L).unwrap();
        let events = game.submit_move(R).unwrap();
        assert_eq!(game.player(PlayerId(0)).state, PlayerState::Crossed);
        assert!(events.contains(&GameEvent::PlayerCrossed { player: "A".into() }));
        assert!(matches!(events.last(), Some(GameEvent::GameOver { .. })));
        assert!(game.is_over());
        assert_eq!(game.winners(), vec!["A"]);
        assert_eq!(logger.snapshot().ends.len(), 1);
    }

    #[test]
    fn rejects_wrong_row_and_finished_players() {
        let (mut game, _) = game(&["A", "B"], &[L, R, L]);
        let err = game
            .apply_move(Move { player: PlayerId(0), row: 1, side: L })
            .unwrap_err();
        assert_eq!(
            err,
            MoveError::WrongRow { player: "A".into(), expected: 0, got: 1 }
        );
        assert!(!game.timer_running());

        game.submit_move(R).unwrap();
        let err = game
            .apply_move(Move { player: PlayerId(0), row: 0, side: L })
            .unwrap_err();
        assert_eq!(err, MoveError::PlayerFinished("A".into()));

        let err = game
            .apply_move(Move { player: PlayerId(9), row: 0, side: L })
            .unwrap_err();
        assert_eq!(err, MoveError::UnknownPlayer(9));
    }

    #[test]
    fn end_turn_rotates_without_changing_positions() {
        let (mut game, _) = game(&["A", "B", "C"], &[L, R, L]);
        game.submit_move(L).unwrap();
        let events = game.end_turn().unwrap();
        assert_eq!(events, vec![GameEvent::TurnChanged { player: "B".into() }]);
        assert_eq!(game.active_players(), vec![PlayerId(1), PlayerId(2), PlayerId(0)]);
        assert_eq!(game.player(PlayerId(0)).row, Some(0));
    }

    #[test]
    fn single_player_end_turn_keeps_turn() {
        let (mut game, _) = game(&["A"], &[L, R]);
        assert!(game.end_turn().unwrap().is_empty());
        assert_eq!(game.current_player_id(), Some(PlayerId(0)));
    }

    #[test]
    fn everything_rejected_after_game_over() {
        let (mut game, _) = game(&["A"], &[L]);
        game.submit_move(R).unwrap();
        assert!(game.is_over());
        assert_eq!(game.submit_move(L), Err(MoveError::GameOver));
        assert_eq!(game.end_turn(), Err(MoveError::GameOver));
        assert!(game.tick(Duration::from_secs(60)).is_empty());
    }

    #[test]
    fn finalize_is_idempotent() {
        let (mut game, logger) = game(&["A", "B"], &[L, R]);
        game.submit_move(L).unwrap();
        let first = game.finalize(false).clone();
        let second = game.finalize(true).clone();
        assert_eq!(first, second);
        assert!(!second.time_limit_reached);
        assert_eq!(logger.snapshot().ends.len(), 1);
        assert!(game.is_over());
    }

    #[test]
    fn early_finalize_leaves_nobody_on_turn() {
        let (mut game, _) = game(&["A", "B"], &[L, R, L]);
        game.submit_move(L).unwrap();
        game.finalize(false);

        assert_eq!(game.current_player_id(), None);
        assert!(game.current_player().is_none());
        assert!(game.active_players().is_empty());
        assert_eq!(game.submit_move(R), Err(MoveError::GameOver));
        assert_eq!(game.end_turn(), Err(MoveError::GameOver));

        // Players cut off by the early end keep their last state.
        assert_eq!(game.player(PlayerId(0)).state, PlayerState::OnBridge);
        assert_eq!(game.player(PlayerId(1)).state, PlayerState::Waiting);
        let summary = game.summary().unwrap();
        assert!(summary.players_crossed.is_empty());
        assert!(summary.players_fallen.is_empty());
    }

    #[test]
    fn duration_comes_from_the_clock() {
        let logger = MemoryLogger::new();
        let clock = ManualClock::new(OffsetDateTime::UNIX_EPOCH);
        let ctx = SessionContext::new(logger, clock.clone());
        let mut game = GameController::new(GameConfig::default(), ["A"], layout(&[L]), ctx).unwrap();
        clock.advance(Duration::from_secs(12));
        game.submit_move(L).unwrap();
        let summary = game.summary().unwrap();
        assert_eq!(summary.duration, Duration::from_secs(12));
        assert_eq!(summary.end_time, OffsetDateTime::UNIX_EPOCH + time::Duration::seconds(12));
    }

    #[test]
    fn unavailable_logger_does_not_change_play() {
        let ctx = SessionContext::with_logger(MemoryLogger::unavailable());
        let mut game = GameController::new(GameConfig::default(), ["A"], layout(&[L, R]), ctx).unwrap();
        assert_eq!(game.session_id(), None);
        game.submit_move(L).unwrap();
        game.submit_move(R).unwrap();
        let summary = game.summary().unwrap();
        assert_eq!(summary.session_id, None);
        assert_eq!(summary.winners(), ["A".to_string()]);
    }
}
