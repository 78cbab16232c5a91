//! Core logic for `freq`: count how many times each distinct code point (or
//! byte) occurs in the input and report the counts in ascending order.

pub mod config;
pub mod decode;
pub mod error;
pub mod io_utils;
pub mod report;
pub mod stats;
pub mod table;

pub use config::{Config, CountMode, OutputFormat};
pub use decode::{Tally, Unit, Utf8Units};
pub use error::{FreqError, Result};
pub use io_utils::Source;
pub use report::{entries, glyph, is_printable, render, write_report, Entry};
pub use stats::SourceStats;
pub use table::{FreqTable, KEY_MASK};

use tracing::debug;

/// Drain every configured source, in order, into one [`Tally`].
///
/// Each source is opened only after the previous one is exhausted; the first
/// open or read failure ends the run.
pub fn count_sources(config: &Config) -> Result<Tally> {
    let mut tally = Tally::new(config.mode);
    for source in &config.sources {
        debug!(source = %source, "opening source");
        let reader = source.open()?;
        tally.consume(&source.name(), reader)?;
    }
    tally.log_summary();
    Ok(tally)
}

/// Count all sources and write the report to the configured destination.
pub fn run(config: &Config) -> Result<Tally> {
    let tally = count_sources(config)?;
    let target = io_utils::target_name(config.output.as_deref());
    let mut out = io_utils::open_output(config.output.as_deref())?;
    write_report(&tally, config.format, &mut out, &target)?;
    Ok(tally)
}
