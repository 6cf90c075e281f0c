//! Errors.

use thiserror::Error;

/// Errors from the fallible edges of the crate.
///
/// Picking, allocation and path lookups never fail; they degrade to “no zone” instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to load configuration: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("cursor transport has been disconnected")]
    Disconnected,

    #[error("pixel buffer has {actual} pixels, expected {expected}")]
    BufferSize { expected: usize, actual: usize },
}
