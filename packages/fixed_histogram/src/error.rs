use thiserror::Error;

use crate::HistogramName;

/// Errors that can occur when registering histograms.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A histogram with the same name is already present in the registry.
    #[error("a histogram named '{name}' is already registered")]
    DuplicateName {
        /// The name that was already taken.
        name: HistogramName,
    },
}

/// A specialized `Result` type for histogram registration, returning the crate's
/// [`Error`] type as the error value.
pub type Result<T> = std::result::Result<T, Error>;
