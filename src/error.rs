use thiserror::Error;

use crate::config::ConfigError;
use crate::tile::PlacementError;

/// Errors that stop a session from being laid out.
#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Placement(#[from] PlacementError),
}
