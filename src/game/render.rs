//! Drawing the game screen
use super::paused::Paused;
use super::session::{BoardView, GameState};
use super::Game;
use crate::consts;
use crate::util::{center_rect, get_display_area};
use ratatui::{
    buffer::{Buffer, Cell},
    layout::{Constraint, Layout, Margin, Position, Rect, Size},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Widget},
};

impl<S, R> Widget for &Game<S, R> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let view = self.session.view();
        let display = get_display_area(area);
        let [score_area, block_area, msg1_area, msg2_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(display);
        Line::styled(
            format!(
                " Score: {} | Level: {} | High: {}",
                view.score, view.level, view.high_score
            ),
            consts::SCORE_BAR_STYLE,
        )
        .render(score_area, buf);

        let block_size = Size {
            width: view.size.width.saturating_add(2),
            height: view.size.height.saturating_add(2),
        };
        let block_area = center_rect(block_area, block_size);
        if view.wrap {
            DottedBorder.render(block_area, buf);
        } else {
            Block::bordered().render(block_area, buf);
        }
        draw_board(&view, block_area.inner(Margin::new(1, 1)), buf);

        if let Some(ref msg) = self.message {
            Span::styled(msg, consts::WARNING_STYLE).render(msg1_area, buf);
        }
        match view.state {
            GameState::Running => (),
            GameState::Paused => {
                let pause_area = center_rect(
                    display,
                    Size {
                        width: Paused::WIDTH,
                        height: Paused::HEIGHT,
                    },
                );
                self.menu.render(pause_area, buf);
            }
            GameState::GameOver => {
                Span::from(" — GAME OVER —").render(msg1_area, buf);
                Line::from_iter([
                    Span::raw(" Choose One: Restart ("),
                    Span::styled("r", consts::KEY_STYLE),
                    Span::raw(") — Quit ("),
                    Span::styled("q", consts::KEY_STYLE),
                    Span::raw(")"),
                ])
                .render(msg2_area, buf);
            }
        }
    }
}

fn draw_board(view: &BoardView<'_>, area: Rect, buf: &mut Buffer) {
    let mut level = Canvas { area, buf };
    for &pos in view.obstacles {
        level.draw_cell(pos, consts::OBSTACLE_SYMBOL, consts::OBSTACLE_STYLE);
    }
    if let Some(pos) = view.food {
        level.draw_cell(pos, consts::FOOD_SYMBOL, consts::FOOD_STYLE);
    }
    for p in view.snake.body() {
        level.draw_cell(p, consts::SNAKE_BODY_SYMBOL, consts::SNAKE_STYLE);
    }
    // Draw the head last so that, if it's a collision, we overwrite
    // whatever it's colliding with
    if view.collided {
        level.draw_cell(
            view.snake.head(),
            consts::COLLISION_SYMBOL,
            consts::COLLISION_STYLE,
        );
    } else {
        level.draw_cell(
            view.snake.head(),
            view.snake.head_symbol(),
            consts::SNAKE_STYLE,
        );
    }
}

#[derive(Debug, Eq, PartialEq)]
struct Canvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl Canvas<'_> {
    fn cell_mut(&mut self, pos: Position) -> Option<&mut Cell> {
        let x = self.area.x.checked_add(pos.x)?;
        let y = self.area.y.checked_add(pos.y)?;
        self.buf.cell_mut((x, y))
    }

    fn draw_char(&mut self, pos: Position, symbol: char) {
        if let Some(cell) = self.cell_mut(pos) {
            cell.set_char(symbol);
        }
    }

    fn draw_cell(&mut self, pos: Position, symbol: char, style: Style) {
        if let Some(cell) = self.cell_mut(pos) {
            cell.set_char(symbol);
            cell.set_style(Style::reset().patch(style));
        }
    }
}

/// A border drawn around grids whose edges wrap around
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct DottedBorder;

impl Widget for DottedBorder {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        let size = area.as_size();
        let max_x = size.width.saturating_sub(1);
        let max_y = size.height.saturating_sub(1);
        let mut canvas = Canvas { area, buf };
        canvas.draw_char(Position::ORIGIN, '·');
        canvas.draw_char(Position::new(max_x, 0), '·');
        canvas.draw_char(Position::new(max_x, max_y), '·');
        canvas.draw_char(Position::new(0, max_y), '·');
        for x in 1..max_x {
            canvas.draw_char(Position::new(x, 0), '⋯');
            canvas.draw_char(Position::new(x, max_y), '⋯');
        }
        for y in 1..max_y {
            canvas.draw_char(Position::new(0, y), '⋮');
            canvas.draw_char(Position::new(max_x, y), '⋮');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppState;
    use crate::game::Session;
    use crate::store::JsonStore;
    use crossterm::event::{Event, KeyCode};
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;
    use ratatui::style::Modifier;
    use tempfile::{tempdir, TempDir};

    const RNG_SEED: u64 = 0x0123456789ABCDEF;

    /// The grid is drawn starting at this position for a 20×15 grid on an
    /// 80×24 screen
    const ORIGIN: (u16, u16) = (30, 4);

    fn new_game(tmp: &TempDir, saves: &str) -> Game<JsonStore, ChaCha12Rng> {
        let path = tmp.path().join("saves.json");
        fs_err::write(&path, saves).unwrap();
        Game::new(Session::resume(
            String::from("alice"),
            JsonStore::new(path),
            Size::new(20, 15),
            ChaCha12Rng::seed_from_u64(RNG_SEED),
        ))
    }

    fn render(game: &Game<JsonStore, ChaCha12Rng>) -> Buffer {
        let area = Rect::new(0, 0, 80, 24);
        let mut buffer = Buffer::empty(area);
        game.render(area, &mut buffer);
        buffer
    }

    fn row(buffer: &Buffer, y: u16) -> String {
        (0..buffer.area.width)
            .filter_map(|x| buffer.cell((x, y)))
            .map(Cell::symbol)
            .collect::<String>()
            .trim_end()
            .to_owned()
    }

    fn grid_cell(buffer: &Buffer, x: u16, y: u16) -> &Cell {
        buffer.cell((ORIGIN.0 + x, ORIGIN.1 + y)).unwrap()
    }

    #[test]
    fn level_one() {
        let tmp = tempdir().unwrap();
        let game = new_game(
            &tmp,
            r#"[{"user": "alice", "level": 1, "score": 0, "high_score": 120}]"#,
        );
        let buffer = render(&game);
        assert_eq!(row(&buffer, 0), " Score: 0 | Level: 1 | High: 120");
        assert!(buffer
            .cell((0, 0))
            .unwrap()
            .modifier
            .contains(Modifier::REVERSED));
        assert_eq!(row(&buffer, 3).trim(), format!("·{}·", "⋯".repeat(20)));
        assert_eq!(row(&buffer, 10).trim_start().chars().next(), Some('⋮'));
        let head = grid_cell(&buffer, 10, 7);
        assert_eq!(head.symbol(), "<");
        assert_eq!(head.fg, consts::SNAKE_STYLE.fg.unwrap());
        let food = game.session.view().food.unwrap();
        assert_eq!(grid_cell(&buffer, food.x, food.y).symbol(), "●");
        assert_eq!(row(&buffer, 22), "");
        assert_eq!(row(&buffer, 23), "");
    }

    #[test]
    fn bordered_level() {
        let tmp = tempdir().unwrap();
        let game = new_game(
            &tmp,
            r#"[{"user": "alice", "level": 2, "score": 0, "high_score": 0}]"#,
        );
        let buffer = render(&game);
        assert_eq!(row(&buffer, 3).trim(), format!("┌{}┐", "─".repeat(20)));
        assert_eq!(grid_cell(&buffer, 0, 0).symbol(), "█");
        assert_eq!(grid_cell(&buffer, 19, 14).symbol(), "█");
    }

    #[test]
    fn paused() {
        let tmp = tempdir().unwrap();
        let mut game = new_game(&tmp, "[]");
        assert!(game
            .handle_event(Event::Key(KeyCode::Char('p').into()))
            .is_none());
        let buffer = render(&game);
        assert!(row(&buffer, 10).contains("┌───── PAUSED ──────┐"));
        assert!(row(&buffer, 11).contains("│ » Resume (p)      │"));
        assert!(row(&buffer, 12).contains("│   Save & Quit (s) │"));
        assert!(row(&buffer, 13).contains("└───────────────────┘"));
    }

    #[test]
    fn game_over() {
        let tmp = tempdir().unwrap();
        let mut game = new_game(
            &tmp,
            r#"[{"user": "alice", "level": 2, "score": 0, "high_score": 0}]"#,
        );
        while game.session.state() == GameState::Running {
            let _ = game.session.tick();
        }
        let buffer = render(&game);
        let head = game.session.view().snake.head();
        assert_eq!(grid_cell(&buffer, head.x, head.y).symbol(), "×");
        assert_eq!(row(&buffer, 22), " — GAME OVER —");
        assert_eq!(row(&buffer, 23), " Choose One: Restart (r) — Quit (q)");
        assert!(matches!(
            game.handle_event(Event::Key(KeyCode::Char('q').into())),
            Some(AppState::Quit)
        ));
    }
}
