use super::board::{Board, Tick};
use super::direction::Direction;
use super::levels;
use super::snake::Snake;
use super::snapshot::Snapshot;
use crate::store::{SaveError, Store};
use crate::util::DisplayChain;
use rand::Rng;
use ratatui::layout::{Position, Size};
use std::collections::HashSet;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// A single user's game: the board, its run state, and the means of saving
/// it.
///
/// Direction changes are buffered and applied at the next tick, with later
/// changes replacing earlier ones.
#[derive(Clone, Debug)]
pub(crate) struct Session<S, R> {
    user: String,
    store: S,
    rng: R,
    board: Board,
    state: GameState,
    high_score: u32,
    queued: Option<Direction>,
    last_tick: Option<Tick>,
}

impl<S: Store, R: Rng> Session<S, R> {
    /// Start a session for `user`, resuming their saved game if there is
    /// one.
    ///
    /// A saved game that cannot be restored is discarded in favor of a new
    /// game on level 1.  If the user has no saved game, a new game starts on
    /// their stored level.
    pub(crate) fn resume(user: String, store: S, size: Size, mut rng: R) -> Session<S, R> {
        let record = store.load(&user);
        let board = if let Some(blob) = record.game_state.as_deref() {
            match Snapshot::from_json(blob).and_then(|s| Board::restore(&s, size, &mut rng)) {
                Ok(board) => {
                    log::info!(
                        "Resuming saved game for {user:?} on level {} with score {}",
                        board.level(),
                        board.score()
                    );
                    board
                }
                Err(e) => {
                    log::warn!(
                        "Discarding saved game for {user:?}: {}; starting new game on level 1",
                        DisplayChain(&e)
                    );
                    Board::new(1, size, &mut rng)
                }
            }
        } else {
            log::info!("Starting new game for {user:?} on level {}", record.level);
            Board::new(record.level, size, &mut rng)
        };
        Session {
            user,
            store,
            rng,
            board,
            state: GameState::Running,
            high_score: record.high_score,
            queued: None,
            last_tick: None,
        }
    }

    /// Buffer a change of direction to apply at the next tick.  Returns
    /// `false` (and does nothing) if the game is paused or over.
    pub(crate) fn queue_direction(&mut self, direction: Direction) -> bool {
        if self.state == GameState::Running {
            self.queued = Some(direction);
            true
        } else {
            false
        }
    }

    /// Pause a running game or resume a paused one
    pub(crate) fn toggle_pause(&mut self) {
        match self.state {
            GameState::Running => {
                log::debug!("Game paused");
                self.state = GameState::Paused;
            }
            GameState::Paused => {
                log::debug!("Game resumed");
                self.state = GameState::Running;
            }
            GameState::GameOver => (),
        }
    }

    /// Advance the game by one tick if it is running, applying any buffered
    /// direction change.  Returns `None` if the game is paused or over.
    pub(crate) fn tick(&mut self) -> Option<Tick> {
        if self.state != GameState::Running {
            return None;
        }
        let tick = self.board.advance(self.queued.take(), &mut self.rng);
        match tick {
            Tick::LevelUp(level) => {
                log::info!("{:?} reached level {level}", self.user);
            }
            Tick::Collided(collision) => {
                log::info!(
                    "Game over for {:?}: hit {collision:?} on level {} with score {}",
                    self.user,
                    self.board.level(),
                    self.board.score()
                );
            }
            Tick::BoardFull => {
                log::info!(
                    "Game over for {:?}: board filled on level {} with score {}",
                    self.user,
                    self.board.level(),
                    self.board.score()
                );
            }
            Tick::Moved | Tick::Ate => (),
        }
        if tick.is_fatal() {
            self.state = GameState::GameOver;
        }
        self.last_tick = Some(tick);
        Some(tick)
    }

    /// Save the paused game and raise the stored high score.  On success,
    /// the caller should end the session.  Failing to raise the high score
    /// is logged but does not undo the save.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the game is not paused or if the game could not be
    /// saved.  In either case the game stays as it was.
    pub(crate) fn save_and_exit(&mut self) -> Result<(), SessionError> {
        if self.state != GameState::Paused {
            return Err(SessionError::InvalidState {
                action: "save",
                state: self.state,
            });
        }
        self.save()
    }

    /// Start the game over on the current level with no score.  Returns
    /// `false` (and does nothing) if the game is not over.
    pub(crate) fn restart(&mut self) -> bool {
        if self.state != GameState::GameOver {
            return false;
        }
        log::info!("Restarting game for {:?} on level {}", self.user, self.board.level());
        self.board = Board::new(self.board.level(), self.board.size(), &mut self.rng);
        self.state = GameState::Running;
        self.queued = None;
        self.last_tick = None;
        true
    }

    /// Record the final score of a finished game as a possible high score.
    /// The board itself is not saved.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the game is not over or if the high score could not
    /// be saved.
    pub(crate) fn quit_from_game_over(&mut self) -> Result<(), SessionError> {
        if self.state != GameState::GameOver {
            return Err(SessionError::InvalidState {
                action: "record final score",
                state: self.state,
            });
        }
        self.store.update_high_score(&self.user, self.board.score())?;
        self.high_score = self.high_score.max(self.board.score());
        Ok(())
    }

    /// End the session from any state, making one attempt at saving: the
    /// whole game if it is still in progress, just the high score if it is
    /// over.
    ///
    /// # Errors
    ///
    /// Returns `Err` if saving failed.
    pub(crate) fn quit(&mut self) -> Result<(), SessionError> {
        match self.state {
            GameState::Running | GameState::Paused => self.save(),
            GameState::GameOver => self.quit_from_game_over(),
        }
    }

    fn save(&mut self) -> Result<(), SessionError> {
        let blob = self.board.snapshot().to_json()?;
        let score = self.board.score();
        self.store.save(&self.user, self.board.level(), score, &blob)?;
        log::info!(
            "Saved game for {:?} on level {} with score {score}",
            self.user,
            self.board.level()
        );
        match self.store.update_high_score(&self.user, score) {
            Ok(()) => self.high_score = self.high_score.max(score),
            Err(e) => log::error!("Game saved, but high score was not: {}", DisplayChain(&e)),
        }
        Ok(())
    }
}

impl<S, R> Session<S, R> {
    pub(crate) fn state(&self) -> GameState {
        self.state
    }

    /// Time to wait between ticks at the current level
    pub(crate) fn tick_period(&self) -> Duration {
        levels::tick_period(self.board.level())
    }

    /// A read-only view of everything a renderer needs to draw the game
    pub(crate) fn view(&self) -> BoardView<'_> {
        BoardView {
            size: self.board.size(),
            wrap: self.board.bounds().wrap,
            snake: self.board.snake(),
            obstacles: self.board.obstacles(),
            food: self.board.food(),
            score: self.board.score(),
            level: self.board.level(),
            high_score: self.high_score,
            state: self.state,
            collided: matches!(self.last_tick, Some(Tick::Collided(_))),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum GameState {
    Running,
    Paused,
    GameOver,
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameState::Running => write!(f, "running"),
            GameState::Paused => write!(f, "paused"),
            GameState::GameOver => write!(f, "game over"),
        }
    }
}

/// What the renderer sees of a session on a given tick
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct BoardView<'a> {
    pub(crate) size: Size,
    /// Whether the snake wraps around the grid edges
    pub(crate) wrap: bool,
    pub(crate) snake: &'a Snake,
    pub(crate) obstacles: &'a HashSet<Position>,
    pub(crate) food: Option<Position>,
    pub(crate) score: u32,
    pub(crate) level: u32,
    pub(crate) high_score: u32,
    pub(crate) state: GameState,
    /// Whether the game ended because the snake's head hit something
    pub(crate) collided: bool,
}

#[derive(Debug, Error)]
pub(crate) enum SessionError {
    #[error("cannot {action} while the game is {state}")]
    InvalidState {
        action: &'static str,
        state: GameState,
    },
    #[error("failed to serialize game state")]
    Serialize(#[from] serde_json::Error),
    #[error(transparent)]
    Store(#[from] SaveError),
}
