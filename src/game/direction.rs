use super::levels::Bounds;
use ratatui::layout::Position;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// The unit `(dx, dy)` step for this direction, with `y` growing
    /// downwards
    pub(crate) fn delta(self) -> (i8, i8) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub(crate) fn from_delta(delta: (i8, i8)) -> Option<Direction> {
        match delta {
            (0, -1) => Some(Direction::Up),
            (0, 1) => Some(Direction::Down),
            (-1, 0) => Some(Direction::Left),
            (1, 0) => Some(Direction::Right),
            _ => None,
        }
    }

    /// Return the position one cell from `pos` in this direction.  Returns
    /// `None` if that would leave `bounds` and `bounds` does not wrap.
    pub(crate) fn advance(self, pos: Position, bounds: Bounds) -> Option<Position> {
        let Position { mut x, mut y } = pos;
        match self {
            Direction::Up => {
                y = decrement_in_bounds(y, bounds.height, bounds.wrap)?;
            }
            Direction::Down => {
                y = increment_in_bounds(y, bounds.height, bounds.wrap)?;
            }
            Direction::Left => {
                x = decrement_in_bounds(x, bounds.width, bounds.wrap)?;
            }
            Direction::Right => {
                x = increment_in_bounds(x, bounds.width, bounds.wrap)?;
            }
        }
        Some(Position { x, y })
    }

    pub(crate) fn reverse(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

fn decrement_in_bounds(x: u16, max: u16, wrap: bool) -> Option<u16> {
    if let Some(x2) = x.checked_sub(1) {
        Some(x2)
    } else if wrap {
        Some(max - 1)
    } else {
        None
    }
}

fn increment_in_bounds(x: u16, max: u16, wrap: bool) -> Option<u16> {
    if let Some(x2) = x.checked_add(1).filter(|&xx| xx < max) {
        Some(x2)
    } else if wrap {
        Some(0)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::layout::Size;
    use rstest::rstest;

    #[rstest]
    #[case(Direction::Right, Position::new(10, 10), false, Some(Position::new(11, 10)))]
    #[case(Direction::Left, Position::new(10, 10), false, Some(Position::new(9, 10)))]
    #[case(Direction::Up, Position::new(10, 10), false, Some(Position::new(10, 9)))]
    #[case(Direction::Down, Position::new(10, 10), false, Some(Position::new(10, 11)))]
    #[case(Direction::Right, Position::new(19, 4), true, Some(Position::new(0, 4)))]
    #[case(Direction::Right, Position::new(19, 4), false, None)]
    #[case(Direction::Left, Position::new(0, 4), true, Some(Position::new(19, 4)))]
    #[case(Direction::Left, Position::new(0, 4), false, None)]
    #[case(Direction::Up, Position::new(3, 0), true, Some(Position::new(3, 14)))]
    #[case(Direction::Up, Position::new(3, 0), false, None)]
    #[case(Direction::Down, Position::new(3, 14), true, Some(Position::new(3, 0)))]
    #[case(Direction::Down, Position::new(3, 14), false, None)]
    fn test_advance(
        #[case] d: Direction,
        #[case] pos: Position,
        #[case] wrap: bool,
        #[case] r: Option<Position>,
    ) {
        let bounds = Bounds::from((Size::new(20, 15), wrap));
        assert_eq!(d.advance(pos, bounds), r);
    }

    #[rstest]
    #[case(Direction::Up)]
    #[case(Direction::Down)]
    #[case(Direction::Left)]
    #[case(Direction::Right)]
    fn test_delta_inverts(#[case] d: Direction) {
        assert_eq!(Direction::from_delta(d.delta()), Some(d));
        let (dx, dy) = d.delta();
        assert_eq!(d.reverse().delta(), (-dx, -dy));
    }

    #[rstest]
    #[case((0, 0))]
    #[case((1, 1))]
    #[case((2, 0))]
    #[case((0, -2))]
    fn test_from_bad_delta(#[case] delta: (i8, i8)) {
        assert_eq!(Direction::from_delta(delta), None);
    }
}
