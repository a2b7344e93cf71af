mod board;
mod direction;
mod levels;
mod paused;
mod render;
mod session;
mod snake;
mod snapshot;
pub(crate) use self::session::Session;
use self::direction::Direction;
use self::paused::{PauseOpt, Paused};
use self::session::GameState;
use crate::app::AppState;
use crate::command::Command;
use crate::store::{JsonStore, Store};
use crate::util::DisplayChain;
use crossterm::event::{poll, read, Event};
use rand::{rngs::ThreadRng, Rng};
use ratatui::Frame;
use std::time::Instant;

/// The game screen: a [`Session`] plus the bits of interface state that go
/// with it
#[derive(Clone, Debug)]
pub(crate) struct Game<S = JsonStore, R = ThreadRng> {
    session: Session<S, R>,
    /// The pause menu, while the game is paused
    menu: Paused,
    /// Shown below the board until the next state change
    message: Option<String>,
    next_tick: Option<Instant>,
}

impl<S: Store, R: Rng> Game<S, R> {
    pub(crate) fn new(session: Session<S, R>) -> Game<S, R> {
        Game {
            session,
            menu: Paused::new(),
            message: None,
            next_tick: None,
        }
    }

    /// Wait for either an input event or the next tick, whichever comes
    /// first, and handle it
    pub(crate) fn process_input(&mut self) -> std::io::Result<Option<AppState>> {
        if self.session.state() == GameState::Running {
            let when = *self
                .next_tick
                .get_or_insert_with(|| Instant::now() + self.session.tick_period());
            let wait = when.saturating_duration_since(Instant::now());
            if wait.is_zero() || !poll(wait)? {
                let _ = self.session.tick();
                self.next_tick = None;
                Ok(None)
            } else {
                Ok(self.handle_event(read()?))
            }
        } else {
            Ok(self.handle_event(read()?))
        }
    }

    fn handle_event(&mut self, event: Event) -> Option<AppState> {
        let command = event.as_key_press_event().and_then(Command::from_key_event);
        if command == Some(Command::Quit) {
            return Some(self.quit());
        }
        match self.session.state() {
            GameState::Running => {
                if event == Event::FocusLost {
                    self.pause();
                } else {
                    match command? {
                        Command::Up => self.turn(Direction::Up),
                        Command::Down => self.turn(Direction::Down),
                        Command::Left => self.turn(Direction::Left),
                        Command::Right => self.turn(Direction::Right),
                        Command::Esc | Command::P => self.pause(),
                        _ => (),
                    }
                }
            }
            GameState::Paused => match self.menu.handle_event(event)? {
                PauseOpt::Resume => {
                    self.message = None;
                    self.session.toggle_pause();
                }
                PauseOpt::SaveAndQuit => match self.session.save_and_exit() {
                    Ok(()) => return Some(AppState::Quit),
                    Err(e) => {
                        log::error!("{}", DisplayChain(&e));
                        self.message = Some(String::from(" Save failed; see log for details"));
                    }
                },
            },
            GameState::GameOver => match command? {
                Command::R => {
                    if self.session.restart() {
                        self.message = None;
                        self.next_tick = None;
                    }
                }
                Command::Q => return Some(self.quit()),
                _ => (),
            },
        }
        None
    }

    fn turn(&mut self, direction: Direction) {
        let _ = self.session.queue_direction(direction);
    }

    fn pause(&mut self) {
        self.session.toggle_pause();
        self.menu = Paused::new();
        self.next_tick = None;
    }

    /// End the game, saving whatever can be saved
    fn quit(&mut self) -> AppState {
        if let Err(e) = self.session.quit() {
            log::error!("{}", DisplayChain(&e));
        }
        AppState::Quit
    }
}

impl<S, R> Game<S, R> {
    pub(crate) fn draw(&self, frame: &mut Frame<'_>) {
        frame.render_widget(self, frame.area());
    }
}
