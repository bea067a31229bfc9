use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

const APP_DIR_NAME: &str = "snake-rules";
const SCORE_FILE_NAME: &str = "scores.json";

/// Final result of one run, the only record handed to score storage.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Score {
    player_name: String,
    score: u32,
}

impl Score {
    #[must_use]
    pub fn new(player_name: impl Into<String>, score: u32) -> Self {
        Self {
            player_name: player_name.into(),
            score,
        }
    }

    #[must_use]
    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }
}

/// Failure to hand a score to storage. The engine logs these and carries on.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to access score file {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("score file {path} is malformed: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("score storage unavailable: {0}")]
    Unavailable(String),
}

/// Write-only destination for finished runs, injected into each session.
pub trait ScoreSink {
    fn persist_score(&mut self, score: &Score) -> Result<(), PersistenceError>;
}

/// Sink for sessions that keep no score history.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullScoreSink;

impl ScoreSink for NullScoreSink {
    fn persist_score(&mut self, _score: &Score) -> Result<(), PersistenceError> {
        Ok(())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ScoreFile {
    scores: Vec<Score>,
}

/// Keeps every saved score in a JSON file.
#[derive(Debug, Clone)]
pub struct JsonScoreStore {
    path: PathBuf,
}

impl JsonScoreStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the platform-correct score file path.
    #[must_use]
    pub fn at_default_location() -> Self {
        Self::new(scores_path())
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads all saved scores, best first.
    ///
    /// Returns an empty list when the score file does not yet exist.
    pub fn load_scores(&self) -> Result<Vec<Score>, PersistenceError> {
        let mut scores = self.read_file()?.scores;
        scores.sort_by(|a, b| b.score.cmp(&a.score));
        Ok(scores)
    }

    /// Best saved score, or zero when nothing was saved yet.
    pub fn high_score(&self) -> Result<u32, PersistenceError> {
        Ok(self
            .read_file()?
            .scores
            .iter()
            .map(Score::score)
            .max()
            .unwrap_or(0))
    }

    fn read_file(&self) -> Result<ScoreFile, PersistenceError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(ScoreFile::default()),
            Err(source) => {
                return Err(PersistenceError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        serde_json::from_str(&raw).map_err(|source| PersistenceError::Malformed {
            path: self.path.clone(),
            source,
        })
    }

    fn write_file(&self, file: &ScoreFile) -> Result<(), PersistenceError> {
        let io_error = |source| PersistenceError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }

        let json = serde_json::to_string_pretty(file).map_err(|source| {
            PersistenceError::Malformed {
                path: self.path.clone(),
                source,
            }
        })?;

        fs::write(&self.path, json).map_err(io_error)
    }
}

impl ScoreSink for JsonScoreStore {
    fn persist_score(&mut self, score: &Score) -> Result<(), PersistenceError> {
        let mut file = self.read_file()?;
        file.scores.push(score.clone());
        self.write_file(&file)
    }
}

/// Returns the platform-correct score file path.
#[must_use]
pub fn scores_path() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(SCORE_FILE_NAME);
    base
}
