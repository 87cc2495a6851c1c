//! Error types for scenesound.

use std::path::PathBuf;
use thiserror::Error;

/// Errors reported by the scheduler, the attachment actions and the effect chain.
#[derive(Debug, Error)]
pub enum Error {
    #[error("scene has no active camera")]
    MissingCamera,

    #[error("object '{object}' references unknown sound '{sound}'")]
    UnresolvedSound { object: String, sound: String },

    #[error("audio file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("failed to load audio from {}: {source}", path.display())]
    BufferLoad {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("failed to export audio to {}: {source}", path.display())]
    BufferExport {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("invalid frame interval: end {end} is before start {start}")]
    InvalidInterval { start: i32, end: i32 },

    #[error("sound '{0}' is already loaded")]
    DuplicateSound(String),

    #[error("object not found: {0}")]
    ObjectNotFound(String),

    #[error("object '{0}' has no attached sound")]
    NoAttachment(String),
}

pub type Result<T> = std::result::Result<T, Error>;
