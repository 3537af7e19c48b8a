//! Text delivery from buffered readers.
//!
//! The scanner itself is byte-at-a-time and source-agnostic; this module
//! adapts real input streams to it. Whitespace between symbols is skipped,
//! and the scan stops at the end-of-text sentinel (`|`) or end of input,
//! whichever comes first. Each buffered chunk is clamped to the sentinel in
//! a single `memchr` pass before its symbols are fed through.

use crate::error::Result;
use crate::scanner::MaskScanner;
use crate::symbol::TERMINATOR;
use memchr::memchr;
use std::io::BufRead;

/// Reads the next whitespace-delimited token from `reader`.
///
/// Returns `Ok(None)` at end of input. Used by callers to pull the mask
/// token off the front of a combined mask-plus-text stream.
pub fn read_token<R: BufRead>(reader: &mut R) -> Result<Option<String>> {
    let mut token = Vec::new();

    loop {
        let buf = reader.fill_buf()?;
        if buf.is_empty() {
            break;
        }

        let mut idx = 0;
        if token.is_empty() {
            while idx < buf.len() && buf[idx].is_ascii_whitespace() {
                idx += 1;
            }
        }

        let start = idx;
        while idx < buf.len() && !buf[idx].is_ascii_whitespace() {
            idx += 1;
        }
        token.extend_from_slice(&buf[start..idx]);

        // A delimiter inside the chunk ends the token; leave it unconsumed
        // for the text scan, which skips whitespace anyway.
        let ended = idx < buf.len();
        reader.consume(idx);
        if ended && !token.is_empty() {
            break;
        }
    }

    if token.is_empty() {
        return Ok(None);
    }
    String::from_utf8(token)
        .map(Some)
        .map_err(|err| crate::MaskscanError::InvalidMask(format!("mask is not UTF-8: {err}")))
}

/// Feeds `reader` through `scanner` until the sentinel or end of input.
///
/// Whitespace bytes are skipped without being counted as symbols; every
/// other byte is a symbol and must be in the alphabet. Returns the number
/// of symbols consumed.
pub fn scan_text<R: BufRead>(scanner: &mut MaskScanner<'_>, mut reader: R) -> Result<usize> {
    loop {
        let buf = reader.fill_buf()?;
        if buf.is_empty() {
            break;
        }

        let (chunk_end, hit_terminator) = match memchr(TERMINATOR, buf) {
            Some(pos) => (pos, true),
            None => (buf.len(), false),
        };

        for &byte in &buf[..chunk_end] {
            if byte.is_ascii_whitespace() {
                continue;
            }
            scanner.advance(byte)?;
        }

        let consumed = if hit_terminator {
            chunk_end + 1
        } else {
            chunk_end
        };
        reader.consume(consumed);

        if hit_terminator {
            break;
        }
    }

    Ok(scanner.symbols_consumed())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::MaskQuery;
    use crate::PieceAutomaton;
    use std::io::{BufReader, Cursor};

    fn scan_stream(mask: &str, input: &str) -> (usize, Vec<usize>) {
        let query = MaskQuery::parse(mask).unwrap();
        let mut automaton = PieceAutomaton::build(&query).unwrap();
        let mut scanner = automaton.scanner();
        let consumed = scan_text(&mut scanner, Cursor::new(input)).unwrap();
        (consumed, scanner.finish())
    }

    #[test]
    fn test_read_token_skips_leading_whitespace() {
        let mut reader = Cursor::new("  \n\tabc def");
        assert_eq!(read_token(&mut reader).unwrap().as_deref(), Some("abc"));
        assert_eq!(read_token(&mut reader).unwrap().as_deref(), Some("def"));
        assert_eq!(read_token(&mut reader).unwrap(), None);
    }

    #[test]
    fn test_read_token_spans_small_buffers() {
        // A one-byte buffer forces the token to accumulate across fills.
        let mut reader = BufReader::with_capacity(1, Cursor::new("abcde rest"));
        assert_eq!(read_token(&mut reader).unwrap().as_deref(), Some("abcde"));
    }

    #[test]
    fn test_scan_text_stops_at_sentinel() {
        let (consumed, offsets) = scan_stream("ab", "abab|abab");
        assert_eq!(consumed, 4);
        assert_eq!(offsets, vec![0, 2]);
    }

    #[test]
    fn test_scan_text_skips_whitespace() {
        // Symbols keep their stream indices regardless of interleaved
        // whitespace: the text is "abab".
        let (consumed, offsets) = scan_stream("ab", "a b\na\tb\n");
        assert_eq!(consumed, 4);
        assert_eq!(offsets, vec![0, 2]);
    }

    #[test]
    fn test_scan_text_runs_to_end_of_input() {
        let (consumed, offsets) = scan_stream("abc", "abcabc");
        assert_eq!(consumed, 6);
        assert_eq!(offsets, vec![0, 3]);
    }

    #[test]
    fn test_scan_text_across_small_buffers() {
        let query = MaskQuery::parse("a?a").unwrap();
        let mut automaton = PieceAutomaton::build(&query).unwrap();
        let mut scanner = automaton.scanner();
        let reader = BufReader::with_capacity(2, Cursor::new("aaa|trailing"));
        let consumed = scan_text(&mut scanner, reader).unwrap();
        assert_eq!(consumed, 3);
        assert_eq!(scanner.finish(), vec![0]);
    }

    #[test]
    fn test_scan_text_reports_symbol_position() {
        let query = MaskQuery::parse("ab").unwrap();
        let mut automaton = PieceAutomaton::build(&query).unwrap();
        let mut scanner = automaton.scanner();
        // The bad byte is the third symbol; whitespace does not count.
        let err = scan_text(&mut scanner, Cursor::new("a b X")).unwrap_err();
        match err {
            crate::MaskscanError::InvalidSymbol { byte, position } => {
                assert_eq!(byte, b'X');
                assert_eq!(position, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
