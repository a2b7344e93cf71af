//! Per-level obstacle layouts, speeds, and starting positions
use super::direction::Direction;
use crate::consts;
use rand::{seq::IteratorRandom, Rng};
use ratatui::layout::{Position, Positions, Rect, Size};
use std::collections::HashSet;
use std::time::Duration;

/// Generate the obstacle layout for `level` on a grid of the given size.
///
/// Level 1 is an open arena, level 2 is walled in, level 3 has a cross in the
/// middle, and every level after that scatters an increasing number of
/// obstacles at random over the interior.
pub(crate) fn generate<R: Rng + ?Sized>(level: u32, size: Size, rng: &mut R) -> HashSet<Position> {
    match level {
        0 | 1 => HashSet::new(),
        2 => border(size),
        3 => {
            let mut obstacles = cross(size);
            for pos in start_lane(size) {
                obstacles.remove(&pos);
            }
            obstacles
        }
        _ => scatter(random_obstacle_count(level), size, rng),
    }
}

/// Whether the snake wraps around the edges of the grid on `level` instead of
/// dying when it hits them
pub(crate) fn wraps(level: u32) -> bool {
    level <= 1
}

/// Number of ticks per second on `level`
pub(crate) fn speed(level: u32) -> u32 {
    consts::SPEED_PER_LEVEL
        .saturating_mul(level.saturating_sub(1))
        .saturating_add(consts::BASE_SPEED)
}

/// Time between movements of the snake on `level`
pub(crate) fn tick_period(level: u32) -> Duration {
    (Duration::from_secs(1) / speed(level)).max(consts::MIN_TICK_PERIOD)
}

/// The position & direction of a freshly-placed snake
pub(crate) fn snake_start(size: Size) -> (Position, Direction) {
    (
        Position::new(size.width / 2, size.height / 2),
        Direction::Right,
    )
}

fn random_obstacle_count(level: u32) -> usize {
    let extra = usize::try_from(level.saturating_sub(4)).unwrap_or(usize::MAX);
    extra
        .saturating_mul(consts::RANDOM_OBSTACLES_PER_LEVEL)
        .saturating_add(consts::BASE_RANDOM_OBSTACLES)
}

fn border(size: Size) -> HashSet<Position> {
    Bounds::from((size, false))
        .positions()
        .filter(|p| {
            p.x == 0 || p.y == 0 || p.x + 1 == size.width || p.y + 1 == size.height
        })
        .collect()
}

fn cross(size: Size) -> HashSet<Position> {
    let (center, _) = snake_start(size);
    let mut obstacles = HashSet::new();
    for x in consts::CROSS_INSET..size.width.saturating_sub(consts::CROSS_INSET) {
        if x.abs_diff(center.x) > consts::CROSS_GAP {
            obstacles.insert(Position::new(x, center.y));
        }
    }
    for y in consts::CROSS_INSET..size.height.saturating_sub(consts::CROSS_INSET) {
        if y.abs_diff(center.y) > consts::CROSS_GAP {
            obstacles.insert(Position::new(center.x, y));
        }
    }
    obstacles
}

/// Place `qty` distinct obstacles uniformly at random in the interior of the
/// grid, away from the snake's starting lane.  The count is capped so that
/// some interior cells always stay free.
fn scatter<R: Rng + ?Sized>(qty: usize, size: Size, rng: &mut R) -> HashSet<Position> {
    let lane = start_lane(size).collect::<HashSet<_>>();
    let margin = consts::OBSTACLE_MARGIN;
    let interior = Rect::new(
        margin,
        margin,
        size.width.saturating_sub(margin * 2),
        size.height.saturating_sub(margin * 2),
    );
    let candidates = interior
        .positions()
        .filter(|p| !lane.contains(p))
        .collect::<Vec<_>>();
    let qty = qty.min(candidates.len().saturating_sub(consts::FREE_CELL_RESERVE));
    candidates
        .into_iter()
        .choose_multiple(rng, qty)
        .into_iter()
        .collect()
}

/// The snake's starting cell plus the cells directly in front of it
fn start_lane(size: Size) -> impl Iterator<Item = Position> {
    let (head, direction) = snake_start(size);
    let bounds = Bounds::from((size, false));
    std::iter::successors(Some(head), move |&p| direction.advance(p, bounds))
        .take(usize::from(consts::FORWARDS_CLEARANCE) + 1)
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Bounds {
    pub(crate) width: u16,
    pub(crate) height: u16,
    pub(crate) wrap: bool,
}

impl Bounds {
    pub(crate) fn size(self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }

    pub(crate) fn contains(self, pos: Position) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    pub(crate) fn positions(self) -> Positions {
        Rect::from((Position::ORIGIN, self.size())).positions()
    }
}

impl From<(Size, bool)> for Bounds {
    fn from((size, wrap): (Size, bool)) -> Bounds {
        Bounds {
            width: size.width,
            height: size.height,
            wrap,
        }
    }
}
