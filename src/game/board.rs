//! The playing field and the rules for advancing it one tick at a time
use super::direction::Direction;
use super::levels::{self, Bounds};
use super::snake::Snake;
use super::snapshot::{Snapshot, SnapshotError};
use crate::consts;
use rand::{seq::IteratorRandom, Rng};
use ratatui::layout::{Position, Size};
use std::collections::HashSet;

/// Everything on the grid: the snake, the obstacles, the food, plus the score
/// and level
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Board {
    size: Size,
    level: u32,
    score: u32,
    snake: Snake,
    obstacles: HashSet<Position>,
    /// `None` only once the snake has filled every free cell
    food: Option<Position>,
}

impl Board {
    /// Create a fresh board for `level` with no score and a single-cell snake
    /// at the starting position
    pub(crate) fn new<R: Rng + ?Sized>(level: u32, size: Size, rng: &mut R) -> Board {
        let level = level.max(1);
        let (head, direction) = levels::snake_start(size);
        let mut board = Board {
            size,
            level,
            score: 0,
            snake: Snake::new(head, direction),
            obstacles: levels::generate(level, size, rng),
            food: None,
        };
        board.food = board.free_cell(rng);
        board
    }

    /// Rebuild a board from a saved snapshot.
    ///
    /// Obstacles are not part of the snapshot and are generated anew for the
    /// saved level; any that would land on the snake or the food are
    /// dropped.  Saved food that is missing, out of bounds, or on the snake
    /// is placed anew.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the snake has no cells, any snake cell lies outside
    /// the grid, or the snake occupies a cell twice.
    pub(crate) fn restore<R: Rng + ?Sized>(
        snapshot: &Snapshot,
        size: Size,
        rng: &mut R,
    ) -> Result<Board, SnapshotError> {
        let bounds = Bounds::from((size, false));
        let mut seen = HashSet::new();
        for &(x, y) in &snapshot.snake {
            let pos = Position::new(x, y);
            if !bounds.contains(pos) {
                return Err(SnapshotError::OutOfBounds {
                    x,
                    y,
                    width: size.width,
                    height: size.height,
                });
            }
            if !seen.insert(pos) {
                return Err(SnapshotError::SelfOverlap { x, y });
            }
        }
        let Some(snake) = Snake::from_cells(
            snapshot.snake.iter().map(|&(x, y)| Position::new(x, y)),
            snapshot.direction,
        ) else {
            return Err(SnapshotError::EmptySnake);
        };
        let food = snapshot
            .food
            .map(|(x, y)| Position::new(x, y))
            .filter(|&p| bounds.contains(p) && !snake.occupies(p));
        let mut obstacles = levels::generate(snapshot.level, size, rng);
        obstacles.retain(|p| !snake.occupies(*p) && Some(*p) != food);
        let mut board = Board {
            size,
            level: snapshot.level,
            score: snapshot.score,
            snake,
            obstacles,
            food,
        };
        if board.food.is_none() {
            board.food = board.free_cell(rng);
        }
        Ok(board)
    }

    pub(crate) fn snapshot(&self) -> Snapshot {
        Snapshot {
            snake: self.snake.cells().iter().map(|p| (p.x, p.y)).collect(),
            direction: self.snake.direction(),
            food: self.food.map(|p| (p.x, p.y)),
            score: self.score,
            level: self.level,
        }
    }

    /// Advance the board by one tick, first turning the snake to face
    /// `turn` (if given) unless that would reverse it.
    ///
    /// Eating the food that brings the score to a multiple of
    /// [`LEVEL_UP_SCORE`][consts::LEVEL_UP_SCORE] moves the board to the next
    /// level, which replaces the obstacles and puts the snake back at the
    /// starting position at its initial length.
    pub(crate) fn advance<R: Rng + ?Sized>(
        &mut self,
        turn: Option<Direction>,
        rng: &mut R,
    ) -> Tick {
        if let Some(d) = turn {
            let _ = self.snake.turn(d);
        }
        let Some(head) = self.snake.direction().advance(self.snake.head(), self.bounds()) else {
            return Tick::Collided(Collision::Wall);
        };
        if self.obstacles.contains(&head) {
            return Tick::Collided(Collision::Obstacle);
        }
        if self.snake.would_bite(head) {
            return Tick::Collided(Collision::Itself);
        }
        self.snake.push_head(head);
        if self.food != Some(head) {
            self.snake.pop_tail();
            return Tick::Moved;
        }
        self.score = self.score.saturating_add(consts::FOOD_SCORE);
        let tick = if self.score % consts::LEVEL_UP_SCORE == 0 {
            self.level_up(rng);
            Tick::LevelUp(self.level)
        } else {
            Tick::Ate
        };
        self.food = self.free_cell(rng);
        if self.food.is_none() {
            Tick::BoardFull
        } else {
            tick
        }
    }

    fn level_up<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.level = self.level.saturating_add(1);
        self.obstacles = levels::generate(self.level, self.size, rng);
        let (head, direction) = levels::snake_start(self.size);
        self.snake = Snake::new(head, direction);
    }

    /// Pick a random cell that is not occupied by the snake or an obstacle
    fn free_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Position> {
        self.bounds()
            .positions()
            .filter(|p| !self.obstacles.contains(p) && !self.snake.occupies(*p))
            .choose(rng)
    }

    pub(crate) fn bounds(&self) -> Bounds {
        Bounds::from((self.size, levels::wraps(self.level)))
    }

    pub(crate) fn size(&self) -> Size {
        self.size
    }

    pub(crate) fn level(&self) -> u32 {
        self.level
    }

    pub(crate) fn score(&self) -> u32 {
        self.score
    }

    pub(crate) fn snake(&self) -> &Snake {
        &self.snake
    }

    pub(crate) fn obstacles(&self) -> &HashSet<Position> {
        &self.obstacles
    }

    pub(crate) fn food(&self) -> Option<Position> {
        self.food
    }
}

/// The result of advancing a board by one tick
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Tick {
    /// The snake moved without eating anything.
    Moved,
    /// The snake ate the food and grew.
    Ate,
    /// The snake ate the food and the board moved up to the given level.
    LevelUp(u32),
    /// The snake ran into something; the board is unchanged.
    Collided(Collision),
    /// The snake ate the food, but there is nowhere left to put new food.
    BoardFull,
}

impl Tick {
    /// Whether the game is over after this tick
    pub(crate) fn is_fatal(self) -> bool {
        matches!(self, Tick::Collided(_) | Tick::BoardFull)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Collision {
    Wall,
    Obstacle,
    Itself,
}
