//! Error types for the shorthand virtual machine.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ShorthandError>;

#[derive(Debug, Error)]
pub enum ShorthandError {
    #[error("Cannot redefine operator '{token}'")]
    DuplicateOperator { token: String },

    #[error("'{token}' is not a registered operator (line {line_no})")]
    UnknownOperator { token: String, line_no: i64 },

    #[error("Cannot read {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cannot write {}: {source}", .path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Shell command '{command}' failed: {source}")]
    ShellExec {
        command: String,
        #[source]
        source: ShellFailure,
    },

    #[error("Line {line_no} is not an assignment: {line}")]
    ParseMismatch { line_no: i64, line: String },

    #[error("{} line {line_no}: {source}", .path.display())]
    Import {
        path: PathBuf,
        line_no: i64,
        #[source]
        source: Box<ShorthandError>,
    },

    #[error("Imports nested deeper than {depth} levels")]
    ImportDepthExceeded { depth: usize },
}

/// Why a shell command did not produce usable output.
#[derive(Debug, Error)]
pub enum ShellFailure {
    #[error("could not start: {0}")]
    Spawn(#[source] io::Error),

    #[error("could not collect output: {0}")]
    Wait(#[source] io::Error),

    #[error("exited with status {}{}", display_code(.code), display_stderr(.stderr))]
    Status { code: Option<i32>, stderr: String },

    #[error("timed out after {0:?}")]
    TimedOut(Duration),
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "unknown (terminated by signal)".to_string(),
    }
}

fn display_stderr(stderr: &str) -> String {
    let stderr = stderr.trim();
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {}", stderr)
    }
}

impl ShorthandError {
    pub(crate) fn file_read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ShorthandError::FileRead {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn file_write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ShorthandError::FileWrite {
            path: path.into(),
            source,
        }
    }

    /// The innermost error, following import wrappers.
    pub fn root_cause(&self) -> &ShorthandError {
        match self {
            ShorthandError::Import { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
