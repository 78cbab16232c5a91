use std::path::PathBuf;

use crate::io_utils::Source;

/// What a counting key is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CountMode {
    /// Every byte of input is one key (0..=255).
    Bytes,
    /// Input is decoded as UTF-8 and every code point is one key.
    #[default]
    CodePoints,
}

impl CountMode {
    /// Minimum number of hex digits used to print a key.
    pub fn hex_width(self) -> usize {
        match self {
            CountMode::Bytes => 2,
            CountMode::CodePoints => 4,
        }
    }
}

/// Layout of the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// `hex glyph<TAB>count` lines.
    #[default]
    Text,
    /// Pretty-printed array of records.
    Json,
    /// `key,glyph,count` rows with a header.
    Csv,
}

/// Runtime configuration for one counting run.
#[derive(Debug, Clone)]
pub struct Config {
    pub mode: CountMode,
    pub format: OutputFormat,
    /// Inputs in the order they are drained.
    pub sources: Vec<Source>,
    /// Report destination; standard output when unset.
    pub output: Option<PathBuf>,
}

impl Config {
    /// Build a configuration for the given files, falling back to standard
    /// input when `files` is empty.
    pub fn new(mode: CountMode, files: Vec<PathBuf>) -> Self {
        Self {
            mode,
            format: OutputFormat::Text,
            sources: Source::from_paths(files),
            output: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(CountMode::default(), Vec::new())
    }
}
