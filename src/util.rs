use crate::consts;
use enum_map::Enum;
use ratatui::layout::{Flex, Layout, Rect, Size};
use std::fmt;
use std::path::PathBuf;

/// Name of the directories under the local config & data directories in
/// which the program keeps its files
const APP_DIR: &str = "snake-levels";

pub(crate) fn get_display_area(buffer_area: Rect) -> Rect {
    center_rect(buffer_area, consts::DISPLAY_SIZE)
}

/// Return a `Rect` of the given size (clamped to `area`) centered within
/// `area`
pub(crate) fn center_rect(area: Rect, size: Size) -> Rect {
    let [rect] = Layout::horizontal([size.width])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::vertical([size.height])
        .flex(Flex::Center)
        .areas(rect);
    rect
}

/// Path at which sessions are saved when the configuration does not say
pub(crate) fn default_save_file_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|p| p.join(APP_DIR).join("saves.json"))
}

/// Path to which logs are written when the configuration does not say
pub(crate) fn default_log_file_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|p| p.join(APP_DIR).join("snake-levels.log"))
}

/// Path of the configuration file when none is given on the command line
pub(crate) fn default_config_path() -> Option<PathBuf> {
    dirs::config_local_dir().map(|p| p.join(APP_DIR).join("config.toml"))
}

pub(crate) trait EnumExt: Enum + Sized {
    fn iter() -> impl Iterator<Item = Self> {
        (0..Self::LENGTH).map(Self::from_usize)
    }

    fn min() -> Self {
        Self::from_usize(0)
    }

    fn max() -> Self {
        Self::from_usize(Self::LENGTH - 1)
    }

    fn next(self) -> Option<Self> {
        let i = self.into_usize() + 1;
        (i < Self::LENGTH).then(|| Self::from_usize(i))
    }

    fn prev(self) -> Option<Self> {
        self.into_usize().checked_sub(1).map(Self::from_usize)
    }
}

impl<T: Enum> EnumExt for T {}

/// Display an error followed by each of its sources, separated by colons
#[derive(Clone, Copy, Debug)]
pub(crate) struct DisplayChain<'a>(pub(crate) &'a dyn std::error::Error);

impl fmt::Display for DisplayChain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)?;
        let mut source = self.0.source();
        while let Some(src) = source {
            write!(f, ": {src}")?;
            source = src.source();
        }
        Ok(())
    }
}
