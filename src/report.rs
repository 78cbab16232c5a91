//! Rendering a [`Tally`] as text, JSON or CSV.
//!
//! Entries come out in ascending key order, followed by an `error` pseudo-entry
//! when code-point decoding met undecodable bytes.

use std::io::{self, Write};

use serde::Serialize;
use unicode_general_category::{get_general_category, GeneralCategory};

use crate::config::OutputFormat;
use crate::decode::Tally;
use crate::error::{FreqError, Result};

/// Placeholder shown instead of an unprintable glyph.
pub const DASH: &str = "-";

/// Whether `c` has a visible rendering: letters, marks, numbers, punctuation,
/// symbols and the ASCII space.
pub fn is_printable(c: char) -> bool {
    if c == ' ' {
        return true;
    }
    !matches!(
        get_general_category(c),
        GeneralCategory::SpaceSeparator
            | GeneralCategory::LineSeparator
            | GeneralCategory::ParagraphSeparator
            | GeneralCategory::Control
            | GeneralCategory::Format
            | GeneralCategory::Surrogate
            | GeneralCategory::PrivateUse
            | GeneralCategory::Unassigned
    )
}

/// Character to show for `key`, if any. The space is never shown so that
/// columns stay readable.
pub fn glyph(key: u32) -> Option<char> {
    char::from_u32(key).filter(|&c| c != ' ' && is_printable(c))
}

/// One report row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub key: String,
    pub glyph: String,
    pub count: u64,
}

impl Entry {
    fn counted(key: u32, count: u64, width: usize) -> Self {
        Self {
            key: format!("{key:0width$x}"),
            glyph: glyph(key).map_or_else(|| DASH.to_string(), String::from),
            count,
        }
    }

    fn errors(count: u64) -> Self {
        Self {
            key: "error".to_string(),
            glyph: DASH.to_string(),
            count,
        }
    }
}

/// All rows of the report, in output order.
pub fn entries(tally: &Tally) -> impl Iterator<Item = Entry> + '_ {
    let width = tally.mode().hex_width();
    let errors = tally.errors();
    tally
        .table()
        .iter()
        .map(move |(key, count)| Entry::counted(key, count, width))
        .chain((errors > 0).then(|| Entry::errors(errors)))
}

/// Write `hex glyph<TAB>count` lines.
pub fn write_text<W: Write>(tally: &Tally, out: &mut W) -> io::Result<()> {
    for entry in entries(tally) {
        writeln!(out, "{} {}\t{}", entry.key, entry.glyph, entry.count)?;
    }
    Ok(())
}

/// Write the report as a pretty-printed JSON array.
pub fn write_json<W: Write>(tally: &Tally, out: &mut W) -> serde_json::Result<()> {
    let records: Vec<Entry> = entries(tally).collect();
    serde_json::to_writer_pretty(&mut *out, &records)?;
    out.write_all(b"\n").map_err(serde_json::Error::io)
}

/// Write the report as CSV with a `key,glyph,count` header.
pub fn write_csv<W: Write>(tally: &Tally, out: &mut W) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    for entry in entries(tally) {
        wtr.serialize(entry)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the report in `format`. `target` labels write failures.
pub fn write_report<W: Write>(
    tally: &Tally,
    format: OutputFormat,
    out: &mut W,
    target: &str,
) -> Result<()> {
    let write_err = |source: io::Error| FreqError::Write {
        target: target.to_string(),
        source,
    };
    match format {
        OutputFormat::Text => write_text(tally, out).map_err(write_err)?,
        OutputFormat::Json => write_json(tally, out).map_err(|source| FreqError::Json {
            target: target.to_string(),
            source,
        })?,
        OutputFormat::Csv => write_csv(tally, out).map_err(|source| FreqError::Csv {
            target: target.to_string(),
            source,
        })?,
    }
    out.flush().map_err(write_err)
}

/// Render the text report into a string.
pub fn render(tally: &Tally) -> String {
    let mut out = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = write_text(tally, &mut out);
    String::from_utf8_lossy(&out).into_owned()
}
