//! Turning input streams into counting keys.
//!
//! In code-point mode every byte that does not begin a complete, valid UTF-8
//! sequence is consumed on its own and counted as a decode error; decoding
//! resumes at the following byte. A correctly encoded U+FFFD is an ordinary
//! key.

use std::io::{self, BufRead, ErrorKind};

use tracing::debug;

use crate::config::CountMode;
use crate::error::{FreqError, Result};
use crate::stats::SourceStats;
use crate::table::FreqTable;

/// Result of decoding one unit of UTF-8 input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Char(char),
    /// A single byte that could not be decoded.
    Invalid,
}

/// Length of the sequence introduced by `lead`, or 0 if it cannot start one.
fn sequence_len(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 0,
    }
}

/// Incremental UTF-8 decoder over a buffered reader.
///
/// Up to four bytes of lookahead are kept so sequences split across reads of
/// the underlying reader decode as if contiguous.
pub struct Utf8Units<R> {
    inner: R,
    pending: [u8; 4],
    len: usize,
    eof: bool,
}

impl<R: BufRead> Utf8Units<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            pending: [0; 4],
            len: 0,
            eof: false,
        }
    }

    /// Buffer lookahead until `want` bytes are pending or the stream ends.
    fn fill(&mut self, want: usize) -> io::Result<()> {
        while self.len < want && !self.eof {
            let buf = match self.inner.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            if buf.is_empty() {
                self.eof = true;
                break;
            }
            let take = (want - self.len).min(buf.len());
            self.pending[self.len..self.len + take].copy_from_slice(&buf[..take]);
            self.len += take;
            self.inner.consume(take);
        }
        Ok(())
    }

    fn shift(&mut self, n: usize) {
        self.pending.copy_within(n..self.len, 0);
        self.len -= n;
    }

    /// Decode the next unit, or `None` at end of stream.
    pub fn next_unit(&mut self) -> io::Result<Option<Unit>> {
        self.fill(1)?;
        if self.len == 0 {
            return Ok(None);
        }
        let width = sequence_len(self.pending[0]);
        if width > 0 {
            self.fill(width)?;
            if self.len >= width {
                if let Some(c) = std::str::from_utf8(&self.pending[..width])
                    .ok()
                    .and_then(|s| s.chars().next())
                {
                    self.shift(width);
                    return Ok(Some(Unit::Char(c)));
                }
            }
        }
        self.shift(1);
        Ok(Some(Unit::Invalid))
    }
}

impl<R: BufRead> Iterator for Utf8Units<R> {
    type Item = io::Result<Unit>;

    fn next(&mut self) -> Option<io::Result<Unit>> {
        self.next_unit().transpose()
    }
}

/// Counting state shared by every source of a run.
pub struct Tally {
    mode: CountMode,
    table: FreqTable,
    errors: u64,
}

impl Tally {
    pub fn new(mode: CountMode) -> Self {
        Self {
            mode,
            table: FreqTable::new(),
            errors: 0,
        }
    }

    pub fn mode(&self) -> CountMode {
        self.mode
    }

    pub fn table(&self) -> &FreqTable {
        &self.table
    }

    /// Number of undecodable bytes seen in code-point mode.
    pub fn errors(&self) -> u64 {
        self.errors
    }

    /// Drain `reader` into the table. `name` labels read failures.
    pub fn consume<R: BufRead>(&mut self, name: &str, reader: R) -> Result<SourceStats> {
        let stats = match self.mode {
            CountMode::Bytes => self.consume_bytes(reader),
            CountMode::CodePoints => self.consume_code_points(reader),
        }
        .map_err(|source| FreqError::Read {
            name: name.to_string(),
            source,
        })?;
        stats.report(name);
        Ok(stats)
    }

    /// Convenience for in-memory input.
    pub fn consume_slice(&mut self, data: &[u8]) -> SourceStats {
        let mut stats = SourceStats::new();
        match self.mode {
            CountMode::Bytes => {
                self.table.extend(data.iter().map(|&b| u32::from(b)));
                stats.tick_units(data.len() as u64);
            }
            CountMode::CodePoints => {
                for unit in Utf8Units::new(data).map_while(|unit| unit.ok()) {
                    self.record(unit, &mut stats);
                }
            }
        }
        stats
    }

    fn consume_bytes<R: BufRead>(&mut self, mut reader: R) -> io::Result<SourceStats> {
        let mut stats = SourceStats::new();
        loop {
            let buf = match reader.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            if buf.is_empty() {
                return Ok(stats);
            }
            let n = buf.len();
            self.table.extend(buf.iter().map(|&b| u32::from(b)));
            stats.tick_units(n as u64);
            reader.consume(n);
        }
    }

    fn consume_code_points<R: BufRead>(&mut self, reader: R) -> io::Result<SourceStats> {
        let mut stats = SourceStats::new();
        for unit in Utf8Units::new(reader) {
            self.record(unit?, &mut stats);
        }
        Ok(stats)
    }

    fn record(&mut self, unit: Unit, stats: &mut SourceStats) {
        match unit {
            Unit::Char(c) => {
                self.table.increment(u32::from(c));
                stats.tick_units(1);
            }
            Unit::Invalid => {
                self.errors += 1;
                stats.tick_error();
            }
        }
    }

    /// Log a one-line summary of the table's shape.
    pub fn log_summary(&self) {
        debug!(
            distinct = self.table.distinct(),
            total = self.table.total(),
            errors = self.errors,
            leaf_nodes = self.table.leaf_nodes(),
            "tally complete"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufReader, Read};

    fn units(data: &[u8]) -> Vec<Unit> {
        Utf8Units::new(data).map(|u| u.unwrap()).collect()
    }

    #[test]
    fn decodes_ascii_and_multibyte() {
        assert_eq!(
            units("a\u{e9}\u{4e2d}\u{1f600}".as_bytes()),
            vec![
                Unit::Char('a'),
                Unit::Char('\u{e9}'),
                Unit::Char('\u{4e2d}'),
                Unit::Char('\u{1f600}'),
            ]
        );
    }

    #[test]
    fn lone_continuation_is_one_error() {
        assert_eq!(units(&[0x80]), vec![Unit::Invalid]);
    }

    #[test]
    fn bad_continuation_consumes_only_lead() {
        assert_eq!(units(&[0xC3, b'a']), vec![Unit::Invalid, Unit::Char('a')]);
    }

    #[test]
    fn truncated_sequence_at_eof_is_per_byte() {
        assert_eq!(units(&[0xE2, 0x82]), vec![Unit::Invalid, Unit::Invalid]);
    }

    #[test]
    fn surrogates_and_overlongs_are_rejected() {
        assert_eq!(units(&[0xED, 0xA0, 0x80]), vec![Unit::Invalid; 3]);
        assert_eq!(units(&[0xC0, 0xAF]), vec![Unit::Invalid; 2]);
        assert_eq!(units(&[0xF4, 0x90, 0x80, 0x80]), vec![Unit::Invalid; 4]);
    }

    #[test]
    fn encoded_replacement_char_is_a_char() {
        assert_eq!(units(&[0xEF, 0xBF, 0xBD]), vec![Unit::Char('\u{FFFD}')]);
    }

    #[test]
    fn sequences_split_across_reads() {
        let text = "x\u{4e2d}\u{1f600}y";
        let reader = BufReader::with_capacity(1, text.as_bytes());
        let decoded: Vec<Unit> = Utf8Units::new(reader).map(|u| u.unwrap()).collect();
        let expected: Vec<Unit> = text.chars().map(Unit::Char).collect();
        assert_eq!(decoded, expected);
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(ErrorKind::Other, "disk on fire"))
        }
    }

    #[test]
    fn read_failure_names_the_source() {
        let mut tally = Tally::new(CountMode::CodePoints);
        let err = tally
            .consume("broken.txt", BufReader::new(FailingReader))
            .unwrap_err();
        assert_eq!(err.to_string(), "broken.txt: disk on fire");

        let mut tally = Tally::new(CountMode::Bytes);
        let err = tally
            .consume("<stdin>", BufReader::new(FailingReader))
            .unwrap_err();
        assert!(matches!(err, FreqError::Read { ref name, .. } if name == "<stdin>"));
    }

    /// Fails with `Interrupted` on its first read, then serves `data`.
    struct InterruptOnce<'a> {
        interrupted: bool,
        data: &'a [u8],
    }

    impl Read for InterruptOnce<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(io::Error::new(ErrorKind::Interrupted, "signal"));
            }
            self.data.read(buf)
        }
    }

    #[test]
    fn interrupted_reads_are_retried() {
        let data = "a\u{e9}a\x00".as_bytes();
        for mode in [CountMode::CodePoints, CountMode::Bytes] {
            let reader = BufReader::new(InterruptOnce {
                interrupted: false,
                data,
            });
            let mut interrupted = Tally::new(mode);
            let stats = interrupted.consume("slow", reader).unwrap();

            let mut plain = Tally::new(mode);
            let expected = plain.consume_slice(data);
            assert_eq!(stats, expected);
            assert!(interrupted.table().iter().eq(plain.table().iter()));
            assert_eq!(interrupted.errors(), 0);
        }
    }

    #[test]
    fn stats_track_units_and_errors() {
        let mut tally = Tally::new(CountMode::CodePoints);
        let stats = tally.consume("mem", &b"ab\xffc"[..]).unwrap();
        assert_eq!(stats, SourceStats { units: 3, errors: 1 });
        assert_eq!(tally.errors(), 1);
        assert_eq!(tally.table().total(), 3);
    }
}
