//! Alphabet configuration shared across the crate.
//!
//! The alphabet is a fixed compile-time constant: the 26 lowercase ASCII
//! letters, encoded as dense indices `0..26`. The wildcard and end-of-text
//! sentinel live outside the alphabet and never enter the automaton.

use crate::error::{MaskscanError, Result};

/// Number of distinct symbols in the alphabet
pub const ALPHABET_LEN: usize = 26;

/// First byte of the alphabet; symbols are encoded as `byte - SYMBOL_BASE`
pub const SYMBOL_BASE: u8 = b'a';

/// Mask byte matching exactly one arbitrary symbol
pub const WILDCARD: u8 = b'?';

/// Byte that terminates the text stream
pub const TERMINATOR: u8 = b'|';

/// Maps a byte to its dense alphabet index.
///
/// `position` is only used for error reporting: it is the zero-based symbol
/// index at which `byte` was encountered.
#[inline]
pub(crate) fn symbol_index(byte: u8, position: usize) -> Result<usize> {
    if byte.is_ascii_lowercase() {
        Ok((byte - SYMBOL_BASE) as usize)
    } else {
        Err(MaskscanError::InvalidSymbol { byte, position })
    }
}
