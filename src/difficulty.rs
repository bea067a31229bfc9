use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{DEFAULT_TICK_INTERVAL_MS, MIN_TICK_INTERVAL_MS};

/// Pacing level of a session. Levels only ever move up.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Difficulty {
    Slow,
    Medium,
    Fast,
    Insane,
}

/// Tunable parameters carried by one difficulty level.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct LevelParams {
    /// Bonus items allowed on the board at once, not counting the apple.
    pub max_bonus_items: usize,
    pub tick_interval: Duration,
    /// Starter length at which the session may move to the next level.
    pub level_length: usize,
    pub score_multiplier: u32,
}

impl Difficulty {
    /// All levels in upgrade order.
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Slow,
        Difficulty::Medium,
        Difficulty::Fast,
        Difficulty::Insane,
    ];

    #[must_use]
    pub fn params(self) -> LevelParams {
        match self {
            Self::Slow => LevelParams {
                max_bonus_items: 1,
                tick_interval: Duration::from_millis(DEFAULT_TICK_INTERVAL_MS),
                level_length: 8,
                score_multiplier: 1,
            },
            Self::Medium => LevelParams {
                max_bonus_items: 2,
                tick_interval: Duration::from_millis(140),
                level_length: 14,
                score_multiplier: 2,
            },
            Self::Fast => LevelParams {
                max_bonus_items: 3,
                tick_interval: Duration::from_millis(100),
                level_length: 20,
                score_multiplier: 3,
            },
            Self::Insane => LevelParams {
                max_bonus_items: 4,
                tick_interval: Duration::from_millis(MIN_TICK_INTERVAL_MS),
                level_length: usize::MAX,
                score_multiplier: 4,
            },
        }
    }

    #[must_use]
    pub fn max_bonus_items(self) -> usize {
        self.params().max_bonus_items
    }

    #[must_use]
    pub fn tick_interval(self) -> Duration {
        self.params().tick_interval
    }

    #[must_use]
    pub fn level_length(self) -> usize {
        self.params().level_length
    }

    #[must_use]
    pub fn score_multiplier(self) -> u32 {
        self.params().score_multiplier
    }

    /// Successor level; the top level is its own successor.
    #[must_use]
    pub fn next_level(self) -> Self {
        match self {
            Self::Slow => Self::Medium,
            Self::Medium => Self::Fast,
            Self::Fast | Self::Insane => Self::Insane,
        }
    }

    #[must_use]
    pub fn is_max_level(self) -> bool {
        self.next_level() == self
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Slow => "slow",
            Self::Medium => "medium",
            Self::Fast => "fast",
            Self::Insane => "insane",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Error)]
#[error("unknown difficulty level `{0}`")]
pub struct UnknownDifficulty(String);

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.to_string().eq_ignore_ascii_case(value))
            .ok_or_else(|| UnknownDifficulty(value.to_string()))
    }
}
