//! Error types shared by the store and the image pipeline.
//!
//! Missing routines/exercises/records are deliberately NOT errors: the
//! mutation API keeps a boolean/no-op contract for those (see `tracker`).

use thiserror::Error;

/// Result alias for store and image operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Serialized table or raw image input exceeds a hard size ceiling.
    #[error("data size of {size} bytes exceeds the {limit} byte limit")]
    SizeLimit { size: u64, limit: u64 },

    /// The image file could not be read or decoded.
    #[error("could not decode image: {0}")]
    Decode(String),

    /// Any other persistence failure.
    #[error("could not save data: {0} (please try again)")]
    Save(String),
}

impl Error {
    /// True for the size-ceiling error kind, whatever raised it.
    pub fn is_size_limit(&self) -> bool {
        matches!(self, Error::SizeLimit { .. })
    }
}
