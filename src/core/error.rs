use thiserror::Error;

use crate::core::types::UnitId;

/// Fatal engine errors.
///
/// Ordinary command rejections (out of range, wrong phase, no LOS) are NOT
/// errors; they are returned as `CommandOutcome::Rejected` values. An error
/// here means an internal invariant broke and the event log can no longer
/// be trusted.
#[derive(Error, Debug)]
pub enum GameError {
    #[error("Unit not found in roster: {0:?}")]
    UnitNotFound(UnitId),

    #[error("Invalid deployment: {0}")]
    InvalidDeployment(String),

    #[error("Corrupt event log: {0}")]
    CorruptEventLog(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
