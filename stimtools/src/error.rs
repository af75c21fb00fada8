//! Error types shared by the decode, codec and repair stages

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StimError {
    /// Malformed channel or polarity configuration; raised before decoding starts
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Time and raw word sequences must be aligned sample for sample
    #[error("got {times} sample times for {words} raw words")]
    LengthMismatch { times: usize, words: usize },

    /// Unparseable line in a persisted file; aborts the whole read
    #[error("error in {}, line {line}: {msg}", .path.display())]
    Format { path: PathBuf, line: usize, msg: String },

    /// Write target is already present; nothing was written
    #[error("could not write {}; file already exists", .path.display())]
    AlreadyExists { path: PathBuf },

    #[error("could not open {}; file not found", .path.display())]
    NotFound { path: PathBuf },

    /// Recorded entries ran out before every display order entry was matched
    #[error(
        "{}: recorded entries exhausted after {entries} lines with {satisfied} of {expected} stimuli matched",
        origin(.path)
    )]
    IncompleteRecording {
        path: Option<PathBuf>,
        satisfied: usize,
        expected: usize,
        entries: usize,
    },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StimError {
    /// Classify an I/O failure on `path`, keeping the not-found and
    /// already-exists cases as their own variants.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::NotFound => StimError::NotFound { path },
            io::ErrorKind::AlreadyExists => StimError::AlreadyExists { path },
            _ => StimError::Io { path, source },
        }
    }

    pub fn format(path: impl Into<PathBuf>, line: usize, msg: impl Into<String>) -> Self {
        StimError::Format { path: path.into(), line, msg: msg.into() }
    }
}

fn origin(path: &Option<PathBuf>) -> String {
    match path {
        Some(p) => p.display().to_string(),
        None => "<records>".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, StimError>;
