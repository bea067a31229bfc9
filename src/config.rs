use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::difficulty::Difficulty;

/// Logical grid dimensions passed through the game as a named type.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct GridSize {
    pub width: u16,
    pub height: u16,
}

impl GridSize {
    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }
}

/// Default board width in cells.
pub const DEFAULT_GRID_WIDTH: u16 = 40;

/// Default board height in cells.
pub const DEFAULT_GRID_HEIGHT: u16 = 30;

/// Edge length of one cell in pixels, for renderers that draw in pixel space.
pub const DEFAULT_CELL_SIZE: u16 = 10;

/// Ticks between bonus item spawns.
pub const BONUS_SPAWN_CYCLE: u32 = 50;

/// Segment count of a freshly created snake.
pub const INITIAL_SNAKE_LENGTH: usize = 3;

/// Probability that a due bonus spawn produces a poisoned apple.
pub const POISONED_APPLE_CHANCE: f64 = 0.1;

/// Tick interval of the slowest level in milliseconds.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 200;

/// Tick interval of the fastest level in milliseconds.
pub const MIN_TICK_INTERVAL_MS: u64 = 60;

/// Errors raised while loading or validating a [`GameConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("config file {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Load-time game constants. The engine copies this at construction and
/// never changes it afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub grid: GridSize,
    pub cell_size: u16,
    pub bonus_spawn_cycle: u32,
    pub initial_snake_length: usize,
    pub poisoned_apple_chance: f64,
    pub starting_difficulty: Difficulty,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid: GridSize {
                width: DEFAULT_GRID_WIDTH,
                height: DEFAULT_GRID_HEIGHT,
            },
            cell_size: DEFAULT_CELL_SIZE,
            bonus_spawn_cycle: BONUS_SPAWN_CYCLE,
            initial_snake_length: INITIAL_SNAKE_LENGTH,
            poisoned_apple_chance: POISONED_APPLE_CHANCE,
            starting_difficulty: Difficulty::Slow,
        }
    }
}

impl GameConfig {
    /// Reads a JSON config file. Missing fields fall back to the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Checks that a session can be laid out with these values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.width < 2 || self.grid.height < 2 {
            return Err(ConfigError::Invalid(format!(
                "grid must be at least 2x2, got {}x{}",
                self.grid.width, self.grid.height
            )));
        }

        if self.initial_snake_length == 0
            || self.initial_snake_length > usize::from(self.grid.width)
        {
            return Err(ConfigError::Invalid(format!(
                "initial snake length {} must be between 1 and the grid width {}",
                self.initial_snake_length, self.grid.width
            )));
        }

        // The apple needs one free cell next to the starting snake.
        if self.initial_snake_length >= self.grid.total_cells() {
            return Err(ConfigError::Invalid(
                "grid leaves no room for the apple".to_string(),
            ));
        }

        if self.bonus_spawn_cycle == 0 {
            return Err(ConfigError::Invalid(
                "bonus spawn cycle must be at least one tick".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.poisoned_apple_chance) {
            return Err(ConfigError::Invalid(format!(
                "poisoned apple chance {} is not a probability",
                self.poisoned_apple_chance
            )));
        }

        Ok(())
    }

    /// Board size in pixels for renderers working in pixel space.
    #[must_use]
    pub fn pixel_size(&self) -> (u32, u32) {
        let cell = u32::from(self.cell_size);
        (
            u32::from(self.grid.width) * cell,
            u32::from(self.grid.height) * cell,
        )
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use crate::difficulty::Difficulty;

    use super::{ConfigError, GameConfig, GridSize};

    #[test]
    fn default_config_is_valid() {
        let config = GameConfig::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.pixel_size(), (400, 300));
    }

    #[test]
    fn tiny_grid_is_rejected() {
        let config = GameConfig {
            grid: GridSize {
                width: 1,
                height: 5,
            },
            ..GameConfig::default()
        };

        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn snake_wider_than_grid_is_rejected() {
        let config = GameConfig {
            grid: GridSize {
                width: 4,
                height: 4,
            },
            initial_snake_length: 5,
            ..GameConfig::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn full_board_at_start_is_rejected() {
        let config = GameConfig {
            grid: GridSize {
                width: 2,
                height: 2,
            },
            initial_snake_length: 2,
            ..GameConfig::default()
        };
        assert!(config.validate().is_ok());

        // 2x2 with a 2-cell snake still leaves two cells, but a 4-cell
        // snake could never fit on a 2-wide row anyway.
        let crowded = GameConfig {
            initial_snake_length: 4,
            ..config
        };
        assert!(crowded.validate().is_err());
    }

    #[test]
    fn zero_bonus_cycle_is_rejected() {
        let config = GameConfig {
            bonus_spawn_cycle: 0,
            ..GameConfig::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let path = unique_test_path("partial");
        write_test_file(
            &path,
            r#"{ "grid": { "width": 12, "height": 9 }, "starting_difficulty": "Medium" }"#,
        );

        let config = GameConfig::load(&path).expect("partial config should load");

        assert_eq!(
            config.grid,
            GridSize {
                width: 12,
                height: 9
            }
        );
        assert_eq!(config.starting_difficulty, Difficulty::Medium);
        assert_eq!(config.bonus_spawn_cycle, super::BONUS_SPAWN_CYCLE);
        cleanup_test_path(&path);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let path = unique_test_path("malformed");
        write_test_file(&path, "{ grid: ");

        assert!(matches!(
            GameConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
        cleanup_test_path(&path);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let path = unique_test_path("missing");

        assert!(matches!(GameConfig::load(&path), Err(ConfigError::Io { .. })));
    }

    fn unique_test_path(label: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be after epoch")
            .as_nanos();

        std::env::temp_dir()
            .join("snake-rules-config-tests")
            .join(format!("{label}-{nanos}.json"))
    }

    fn write_test_file(path: &PathBuf, contents: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("test parent directory should be creatable");
        }
        fs::write(path, contents).expect("test file write should succeed");
    }

    fn cleanup_test_path(path: &PathBuf) {
        let _ = fs::remove_file(path);
        if let Some(parent) = path.parent() {
            let _ = fs::remove_dir(parent);
        }
    }
}
