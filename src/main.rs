//! Command-line front end for maskscan.
//!
//! Reads a wildcard mask as the first whitespace-delimited token on stdin,
//! scans the remaining input as the text until `|` or end of input, and
//! prints the matching zero-based offsets space-separated on one line.

use anyhow::{bail, Context, Result};
use maskscan::{stream, MaskQuery, PieceAutomaton};
use std::io::{self, BufWriter, Write};

fn print_usage() {
    println!(
        "Usage: maskscan [--stats]\n\n\
         Reads a wildcard mask (lowercase letters and '?') as the first\n\
         whitespace-delimited token on stdin, then scans the remaining input\n\
         as the text until '|' or end of input. Prints the zero-based offsets\n\
         at which the whole mask matches, space-separated, ascending.\n\n\
         Options:\n\
         \x20 --stats    print automaton and scan statistics to stderr\n\
         \x20 -h, --help show this help"
    );
}

fn main() -> Result<()> {
    let mut show_stats = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--stats" => show_stats = true,
            "-h" | "--help" => {
                print_usage();
                return Ok(());
            }
            other => bail!("unrecognized argument: {other} (try --help)"),
        }
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();

    let mask = stream::read_token(&mut input)
        .context("failed to read mask")?
        .context("missing mask: expected a mask token on stdin")?;

    let query = MaskQuery::parse(&mask).with_context(|| format!("bad mask {mask:?}"))?;
    let mut automaton = PieceAutomaton::build(&query).context("failed to build automaton")?;

    let mut scanner = automaton.scanner();
    let text_len = stream::scan_text(&mut scanner, &mut input).context("failed to scan text")?;
    let offsets = scanner.finish();

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let line = offsets
        .iter()
        .map(usize::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    writeln!(out, "{line}").context("failed to write offsets")?;
    out.flush().context("failed to flush stdout")?;

    if show_stats {
        eprintln!(
            "[INFO] mask length {} with {} pieces, {} automaton nodes",
            query.mask_len(),
            query.piece_count(),
            automaton.node_count()
        );
        eprintln!(
            "[INFO] scanned {} symbols, {} matches",
            text_len,
            offsets.len()
        );
    }

    Ok(())
}
