//! Error type shared by the curve indexer, classifiers and renderer.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The requested index space does not factor into a curve of this dimension.
    #[error("size {size} does not fit a Hilbert curve of dimension {dimension}")]
    InvalidCurveSize { dimension: u32, size: u64 },

    #[error("curve index {index} out of range (curve length {len})")]
    IndexOutOfRange { index: u64, len: u64 },

    #[error("point {point:?} is not on the {dimension}-dimensional grid of side {side}")]
    PointOutOfRange {
        point: Vec<u64>,
        side: u64,
        dimension: u32,
    },

    #[error("buffer offset {offset} out of range (buffer length {len})")]
    OffsetOutOfRange { offset: usize, len: usize },

    #[error("buffer of {len} bytes is shorter than the {block_size}-byte entropy window")]
    BufferTooSmallForWindow { len: usize, block_size: usize },

    #[error("entropy window size must be non-zero")]
    InvalidWindow,

    #[error("cannot visualize an empty buffer")]
    EmptyBuffer,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to write image: {0}")]
    ImageWriteFailure(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub(crate) fn config(msg: impl Into<String>) -> Error {
    Error::InvalidConfig(msg.into())
}
