//! Error types for the maskscan library
//!
//! Maskscan uses a single error type across query parsing, automaton
//! construction, and text scanning. Scanning is fail-fast: an invalid input
//! symbol aborts the current query rather than degrading to a silent
//! match/no-match guess.

use thiserror::Error;

/// Result type alias for maskscan operations
pub type Result<T> = std::result::Result<T, MaskscanError>;

/// Main error type for maskscan operations
#[derive(Error, Debug)]
pub enum MaskscanError {
    /// A byte outside the configured alphabet appeared in the mask or text.
    ///
    /// `position` is the zero-based symbol index at which the byte was seen
    /// (mask index for mask errors, text symbol index for scan errors).
    #[error("invalid symbol 0x{byte:02x} at position {position}: expected a lowercase ASCII letter")]
    InvalidSymbol {
        /// The offending byte
        byte: u8,
        /// Zero-based symbol index where the byte was seen
        position: usize,
    },

    /// The mask itself is malformed (e.g. empty)
    #[error("invalid mask: {0}")]
    InvalidMask(String),

    /// I/O error from the text stream
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
