use std::path::PathBuf;

use thiserror::Error;

use crate::model::Channel;

#[derive(Debug, Error)]
pub enum GridPackerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Path not found: {}", .path.display())]
    PathNotFound { path: PathBuf },
    #[error("Failed to decode image {}: {source}", .path.display())]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error(
        "Dimension mismatch at index {index}: expected {}x{}, got {}x{}",
        .expected.0, .expected.1, .actual.0, .actual.1
    )]
    DimensionMismatch {
        index: usize,
        expected: (u32, u32),
        actual: (u32, u32),
    },
    #[error("Capacity exceeded: {provided} images provided, atlas holds {capacity}")]
    CapacityExceeded { provided: usize, capacity: usize },
    #[error("Insufficient frames: found {found}, required {required}")]
    InsufficientFrames { found: usize, required: usize },
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Frame count {frame_count} must be a positive multiple of 4")]
    InvalidFrameCount { frame_count: u32 },
    #[error("Packing worker for channel {channel} panicked")]
    WorkerPanicked { channel: Channel },
}

pub type Result<T> = std::result::Result<T, GridPackerError>;
