use crate::game::Game;
use ratatui::{backend::Backend, Terminal};
use std::io;

#[derive(Clone, Debug)]
pub(crate) struct App {
    state: AppState,
}

impl App {
    pub(crate) fn new(game: Game) -> App {
        App {
            state: AppState::Game(game),
        }
    }

    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<()> {
        while !self.quitting() {
            self.draw(&mut terminal)?;
            self.process_input()?;
        }
        Ok(())
    }

    fn draw<B: Backend>(&self, terminal: &mut Terminal<B>) -> io::Result<()> {
        if let AppState::Game(ref game) = self.state {
            terminal.draw(|frame| game.draw(frame))?;
        }
        Ok(())
    }

    fn process_input(&mut self) -> io::Result<()> {
        if let AppState::Game(ref mut game) = self.state {
            if let Some(state) = game.process_input()? {
                self.state = state;
            }
        }
        Ok(())
    }

    fn quitting(&self) -> bool {
        matches!(self.state, AppState::Quit)
    }
}

#[derive(Clone, Debug)]
pub(crate) enum AppState {
    Game(Game),
    Quit,
}
