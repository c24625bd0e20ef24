//! JSON I/O handling for the CLI
//!
//! - Output: one JSON response per line on stdout
//! - `exec` input: one JSON request per line on stdin; blank lines skipped

use std::io::{BufRead, Write};

use serde_json::Value;

use super::errors::CliResult;
use crate::api::Response;

/// Write a success envelope around `data`
pub fn write_response<W: Write>(out: &mut W, data: Value) -> CliResult<()> {
    write_envelope(out, &Response::success(data))
}

/// Write one response envelope as a single line
pub fn write_envelope<W: Write>(out: &mut W, response: &Response) -> CliResult<()> {
    serde_json::to_writer(&mut *out, response)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

/// Write plain text (charts, descriptions)
pub fn write_text<W: Write>(out: &mut W, text: &str) -> CliResult<()> {
    out.write_all(text.as_bytes())?;
    if !text.ends_with('\n') {
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

/// Non-blank request lines from `input`
pub fn read_requests<R: BufRead>(input: R) -> impl Iterator<Item = CliResult<String>> {
    input
        .lines()
        .filter(|line| !matches!(line, Ok(l) if l.trim().is_empty()))
        .map(|line| line.map_err(Into::into))
}
