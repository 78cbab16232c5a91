use std::io::ErrorKind;
use std::path::PathBuf;

use thiserror::Error;

/// Failures that end a run. Malformed text is counted, never reported here.
#[derive(Error, Debug)]
pub enum FreqError {
    /// A named input file could not be opened.
    #[error("open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A read from an already open source failed before end of stream.
    #[error("{name}: {source}")]
    Read {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// The report could not be written.
    #[error("write {target}: {source}")]
    Write {
        target: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV report serialization failed.
    #[error("write {target}: {source}")]
    Csv {
        target: String,
        #[source]
        source: csv::Error,
    },

    /// JSON report serialization failed.
    #[error("write {target}: {source}")]
    Json {
        target: String,
        #[source]
        source: serde_json::Error,
    },
}

impl FreqError {
    /// Whether writing the report failed because its reader closed the pipe.
    pub fn is_broken_pipe(&self) -> bool {
        match self {
            FreqError::Write { source, .. } => source.kind() == ErrorKind::BrokenPipe,
            FreqError::Csv { source, .. } => {
                matches!(source.kind(), csv::ErrorKind::Io(e) if e.kind() == ErrorKind::BrokenPipe)
            }
            FreqError::Json { source, .. } => source.io_error_kind() == Some(ErrorKind::BrokenPipe),
            FreqError::Open { .. } | FreqError::Read { .. } => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, FreqError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn broken_pipe_is_only_a_write_condition() {
        let pipe = || io::Error::new(ErrorKind::BrokenPipe, "pipe closed");
        let write = FreqError::Write {
            target: "<stdout>".into(),
            source: pipe(),
        };
        assert!(write.is_broken_pipe());

        let csv = FreqError::Csv {
            target: "<stdout>".into(),
            source: csv::Error::from(pipe()),
        };
        assert!(csv.is_broken_pipe());

        let json = FreqError::Json {
            target: "<stdout>".into(),
            source: serde_json::Error::io(pipe()),
        };
        assert!(json.is_broken_pipe());

        let read = FreqError::Read {
            name: "<stdin>".into(),
            source: pipe(),
        };
        assert!(!read.is_broken_pipe());

        let full = FreqError::Write {
            target: "report.txt".into(),
            source: io::Error::new(ErrorKind::Other, "disk full"),
        };
        assert!(!full.is_broken_pipe());
    }
}
