//! Assorted constants & hard-coded configuration
use ratatui::{
    layout::Size,
    style::{Color, Modifier, Style},
};
use std::time::Duration;

/// Draw everything inside a rectangle of this size in the center of the
/// terminal window.
///
/// Cf. [`crate::util::get_display_area()`]
pub(crate) const DISPLAY_SIZE: Size = Size {
    width: 80,
    height: 24,
};

/// Grid size used when the configuration file does not set one
pub(crate) const DEFAULT_GRID_SIZE: Size = Size {
    width: 40,
    height: 19,
};

/// Smallest grid size accepted from the configuration file
pub(crate) const MIN_GRID_SIZE: Size = Size {
    width: 16,
    height: 12,
};

/// Largest grid size accepted from the configuration file; anything bigger
/// would not fit inside [`DISPLAY_SIZE`] together with the status lines.
pub(crate) const MAX_GRID_SIZE: Size = Size {
    width: 76,
    height: 19,
};

/// Points awarded for each piece of food eaten
pub(crate) const FOOD_SCORE: u32 = 10;

/// The player advances a level each time the score reaches a multiple of this
pub(crate) const LEVEL_UP_SCORE: u32 = 50;

/// Ticks per second on level 1
pub(crate) const BASE_SPEED: u32 = 8;

/// Additional ticks per second gained with each level after the first
pub(crate) const SPEED_PER_LEVEL: u32 = 2;

/// Shortest time between movements of the snake, however high the level
pub(crate) const MIN_TICK_PERIOD: Duration = Duration::from_millis(25);

/// Number of random obstacles on level 4
pub(crate) const BASE_RANDOM_OBSTACLES: usize = 20;

/// Additional random obstacles for each level after level 4
pub(crate) const RANDOM_OBSTACLES_PER_LEVEL: usize = 5;

/// Random obstacles are kept at least this many cells away from each edge.
pub(crate) const OBSTACLE_MARGIN: u16 = 2;

/// Number of interior cells that random obstacle placement always leaves
/// free, however high the level
pub(crate) const FREE_CELL_RESERVE: usize = 10;

/// Distance from the grid edges at which the arms of the level 3 cross start
pub(crate) const CROSS_INSET: u16 = 5;

/// Cells within this distance of the grid center are left out of the level 3
/// cross.
pub(crate) const CROSS_GAP: u16 = 2;

/// On levels with interior obstacles, keep this many cells in front of the
/// snake's starting position (in addition to the position itself) clear.
pub(crate) const FORWARDS_CLEARANCE: u16 = 7;

/// Glyph for the snake's head when it is moving up
pub(crate) const SNAKE_HEAD_UP_SYMBOL: char = 'v';

/// Glyph for the snake's head when it is moving down
pub(crate) const SNAKE_HEAD_DOWN_SYMBOL: char = '^';

/// Glyph for the snake's head when it is moving right
pub(crate) const SNAKE_HEAD_RIGHT_SYMBOL: char = '<';

/// Glyph for the snake's head when it is moving left
pub(crate) const SNAKE_HEAD_LEFT_SYMBOL: char = '>';

/// Glyph for the parts of the snake's body
pub(crate) const SNAKE_BODY_SYMBOL: char = '⚬';

/// Glyph for the food
pub(crate) const FOOD_SYMBOL: char = '●';

/// Glyph for obstacles
pub(crate) const OBSTACLE_SYMBOL: char = '█';

/// Glyph for the snake's head when it's collided with an obstacle or wall
pub(crate) const COLLISION_SYMBOL: char = '×';

/// Style for the snake's head and body
pub(crate) const SNAKE_STYLE: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);

/// Style for the food
pub(crate) const FOOD_STYLE: Style = Style::new().fg(Color::LightRed);

/// Style for obstacles
pub(crate) const OBSTACLE_STYLE: Style = Style::new().fg(Color::Gray);

/// Style for [`COLLISION_SYMBOL`]
pub(crate) const COLLISION_STYLE: Style = Style::new()
    .fg(Color::LightRed)
    .add_modifier(Modifier::REVERSED);

/// Style for key codes shown in the interface
pub(crate) const KEY_STYLE: Style = Style::new().fg(Color::Yellow);

/// Style for the score bar at the top of the game screen
pub(crate) const SCORE_BAR_STYLE: Style = Style::new().add_modifier(Modifier::REVERSED);

/// Style for the currently-selected menu item
pub(crate) const MENU_SELECTION_STYLE: Style = Style::new().add_modifier(Modifier::UNDERLINED);

/// Style for status messages such as save failures
pub(crate) const WARNING_STYLE: Style = Style::new().fg(Color::LightRed);
