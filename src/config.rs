use crate::consts;
use crate::util::{default_config_path, default_log_file_path, default_save_file_path};
use ratatui::layout::Size;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Program configuration read from a configuration file
#[derive(Clone, Deserialize, Debug, Default, Eq, PartialEq)]
pub(crate) struct Config {
    /// Dimensions of the playing field
    #[serde(default)]
    pub(crate) grid: GridConfig,

    /// Settings about data files
    #[serde(default)]
    pub(crate) files: FileConfig,
}

impl Config {
    /// Return the default configuration file path
    pub(crate) fn default_path() -> Result<PathBuf, ConfigError> {
        default_config_path().ok_or(ConfigError::NoPath)
    }

    /// Read configuration from a file on disk.  If the file does not exist and
    /// `allow_missing` is true, a default `Config` value is returned.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the file could not be read or if the file's contents
    /// could not be deserialized or were out of range.
    pub(crate) fn load(path: &Path, allow_missing: bool) -> Result<Config, ConfigError> {
        let content = match fs_err::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
                return Ok(Config::default())
            }
            Err(e) => return Err(ConfigError::Read(e)),
        };
        toml::from_str(&content).map_err(Into::into)
    }

    /// Return the file in which sessions are saved: the one given in the
    /// configuration or, failing that, the default.
    pub(crate) fn save_file(&self) -> Result<PathBuf, ConfigError> {
        self.files
            .save_file
            .clone()
            .or_else(default_save_file_path)
            .ok_or(ConfigError::NoDataPath)
    }

    /// Return the file to which logs are written: the one given in the
    /// configuration or, failing that, the default.
    pub(crate) fn log_file(&self) -> Result<PathBuf, ConfigError> {
        self.files
            .log_file
            .clone()
            .or_else(default_log_file_path)
            .ok_or(ConfigError::NoDataPath)
    }
}

#[derive(Clone, Copy, Deserialize, Debug, Eq, PartialEq)]
#[serde(try_from = "RawGridConfig")]
pub(crate) struct GridConfig {
    width: u16,
    height: u16,
}

impl GridConfig {
    pub(crate) fn size(self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }
}

impl Default for GridConfig {
    fn default() -> GridConfig {
        GridConfig {
            width: consts::DEFAULT_GRID_SIZE.width,
            height: consts::DEFAULT_GRID_SIZE.height,
        }
    }
}

#[derive(Clone, Deserialize, Debug, Eq, PartialEq)]
#[serde(default)]
struct RawGridConfig {
    width: u16,
    height: u16,
}

impl Default for RawGridConfig {
    fn default() -> RawGridConfig {
        RawGridConfig {
            width: consts::DEFAULT_GRID_SIZE.width,
            height: consts::DEFAULT_GRID_SIZE.height,
        }
    }
}

impl TryFrom<RawGridConfig> for GridConfig {
    type Error = GridSizeError;

    fn try_from(value: RawGridConfig) -> Result<GridConfig, GridSizeError> {
        let min = consts::MIN_GRID_SIZE;
        let max = consts::MAX_GRID_SIZE;
        if !(min.width..=max.width).contains(&value.width) {
            return Err(GridSizeError {
                dimension: "width",
                value: value.width,
                min: min.width,
                max: max.width,
            });
        }
        if !(min.height..=max.height).contains(&value.height) {
            return Err(GridSizeError {
                dimension: "height",
                value: value.height,
                min: min.height,
                max: max.height,
            });
        }
        Ok(GridConfig {
            width: value.width,
            height: value.height,
        })
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("grid {dimension} must be between {min} and {max}, got {value}")]
pub(crate) struct GridSizeError {
    dimension: &'static str,
    value: u16,
    min: u16,
    max: u16,
}

#[derive(Clone, Default, Deserialize, Debug, Eq, PartialEq)]
#[serde(try_from = "RawFileConfig")]
pub(crate) struct FileConfig {
    /// Path at which sessions are saved
    save_file: Option<PathBuf>,

    /// Path to which logs are written
    log_file: Option<PathBuf>,
}

#[derive(Clone, Default, Deserialize, Debug, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
struct RawFileConfig {
    save_file: Option<String>,
    log_file: Option<String>,
}

impl TryFrom<RawFileConfig> for FileConfig {
    type Error = std::io::Error;

    fn try_from(value: RawFileConfig) -> Result<FileConfig, std::io::Error> {
        Ok(FileConfig {
            save_file: value.save_file.map(expanduser::expanduser).transpose()?,
            log_file: value.log_file.map(expanduser::expanduser).transpose()?,
        })
    }
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to determine path to local configuration directory")]
    NoPath,
    #[error("failed to determine path to local data directory")]
    NoDataPath,
    #[error("failed to read configuration file")]
    Read(#[from] std::io::Error),
    #[error("failed to parse configuration file")]
    Parse(#[from] toml::de::Error),
}
