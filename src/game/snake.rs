use super::direction::Direction;
use crate::consts;
use ratatui::layout::Position;
use std::collections::VecDeque;

/// Snake state.  Snate.
///
/// All positions are relative to the top-left corner of the grid.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Snake {
    /// The cells occupied by the snake, head first.  Never empty.
    cells: VecDeque<Position>,

    /// The direction in which the snake is currently facing
    direction: Direction,
}

impl Snake {
    /// Create a new single-cell snake at `head` facing in `direction`
    pub(crate) fn new(head: Position, direction: Direction) -> Snake {
        Snake {
            cells: VecDeque::from([head]),
            direction,
        }
    }

    /// Create a snake from its cells, head first.  Returns `None` if `cells`
    /// is empty.
    pub(crate) fn from_cells<I>(cells: I, direction: Direction) -> Option<Snake>
    where
        I: IntoIterator<Item = Position>,
    {
        let cells = cells.into_iter().collect::<VecDeque<_>>();
        (!cells.is_empty()).then_some(Snake { cells, direction })
    }

    /// Return the position of the snake's head
    pub(crate) fn head(&self) -> Position {
        self.cells[0]
    }

    /// Return the cells of the snake, head first
    pub(crate) fn cells(&self) -> &VecDeque<Position> {
        &self.cells
    }

    /// Return the cells of the snake after the head
    pub(crate) fn body(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells.iter().skip(1).copied()
    }

    pub(crate) fn direction(&self) -> Direction {
        self.direction
    }

    /// Return the glyph to use for drawing the snake's head
    pub(crate) fn head_symbol(&self) -> char {
        match self.direction {
            Direction::Up => consts::SNAKE_HEAD_UP_SYMBOL,
            Direction::Down => consts::SNAKE_HEAD_DOWN_SYMBOL,
            Direction::Left => consts::SNAKE_HEAD_LEFT_SYMBOL,
            Direction::Right => consts::SNAKE_HEAD_RIGHT_SYMBOL,
        }
    }

    /// Change the snake's direction to `direction` unless that would make it
    /// double back on itself.  Returns `false` if the turn was ignored.
    pub(crate) fn turn(&mut self, direction: Direction) -> bool {
        if direction == self.direction.reverse() {
            false
        } else {
            self.direction = direction;
            true
        }
    }

    /// Whether moving the head to `pos` would run into the snake's own body.
    /// The tail is not counted, as it moves out of the way on the same tick.
    pub(crate) fn would_bite(&self, pos: Position) -> bool {
        let len = self.cells.len();
        self.cells.iter().take(len - 1).any(|&p| p == pos)
    }

    /// Push a new head onto the front of the snake
    pub(crate) fn push_head(&mut self, pos: Position) {
        self.cells.push_front(pos);
    }

    /// Drop the snake's last cell, keeping at least one cell
    pub(crate) fn pop_tail(&mut self) {
        if self.cells.len() > 1 {
            let _ = self.cells.pop_back();
        }
    }

    /// Whether any cell of the snake lies on `pos`
    pub(crate) fn occupies(&self, pos: Position) -> bool {
        self.cells.contains(&pos)
    }
}
