//! # Error Types
//!
//! This module defines all error types for the reel library.
//!
//! Extraction and serialization never fail: missing headers degrade to
//! defaults. Errors only come from caller contract violations (ratings and
//! difficulties outside 1-5), strict bulk import, unknown tune ids, and the
//! persistence/config layers.
//!
//! ## Usage
//! ```rust
//! use reel::{import_tunebook, ReelError};
//!
//! match import_tunebook("X:1\nK:G\nabc|") {
//!     Ok(tunes) => println!("imported {}", tunes.len()),
//!     Err(ReelError::Import { block, source }) => {
//!         eprintln!("tune {} rejected: {}", block, source);
//!     }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum ReelError {
    /// Practice quality rating outside 1-5.
    ///
    /// # Example
    /// ```
    /// # use reel::ReelError;
    /// let err = ReelError::InvalidRating(7);
    /// assert_eq!(err.to_string(), "Invalid quality rating 7: expected 1-5");
    /// ```
    #[error("Invalid quality rating {0}: expected 1-5")]
    InvalidRating(u8),

    #[error("Invalid difficulty {0}: expected 1-5")]
    InvalidDifficulty(u8),

    /// A required header (`T:`, `R:` or `K:`) is absent or empty.
    ///
    /// Only raised by strict extraction, which bulk import uses.
    #[error("Missing required header: {0}")]
    MissingHeader(&'static str),

    /// One block of a multi-tune import was rejected.
    ///
    /// `block` is the 1-based position of the block in the pasted text.
    ///
    /// # Example
    /// ```
    /// # use reel::ReelError;
    /// let err = ReelError::Import {
    ///     block: 2,
    ///     source: Box::new(ReelError::MissingHeader("title (T:)")),
    /// };
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Invalid tune 2 in import: Missing required header: title (T:)"
    /// );
    /// ```
    #[error("Invalid tune {block} in import: {source}")]
    Import {
        block: usize,
        #[source]
        source: Box<ReelError>,
    },

    #[error("No tune with id {0}")]
    TuneNotFound(Uuid),

    #[error("Store error: {0}")]
    Store(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Config(String),
}
