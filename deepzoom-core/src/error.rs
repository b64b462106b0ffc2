//! Error types shared by the core numeric types and the engine crate.

use thiserror::Error;

/// Failure modes for parsing a decimal string into a [`crate::quad::Quad`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuadParseError {
    #[error("empty numeric string")]
    Empty,

    #[error("malformed decimal literal: {0}")]
    Malformed(String),
}

/// Errors a frame request can fail with.
///
/// Mirrors the donor's GPU-error-enum shape: one variant per external
/// failure surface, `#[from]` conversions wired up where a lower layer
/// already has its own typed error.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid region: {0}")]
    InvalidRegion(String),

    #[error("invalid output size: {0}")]
    InvalidSize(String),

    #[error("out of memory allocating {requested_bytes} bytes for frame buffer")]
    OutOfMemory { requested_bytes: usize },

    #[error("failed to parse numeric literal: {0}")]
    Quad(#[from] QuadParseError),
}
