//! Marked-block error types

use thiserror::Error;

use super::editor::{BLOCK_END, BLOCK_START};
use crate::exec::ExecError;

/// Errors that can occur while editing a marked block
#[derive(Error, Debug)]
pub enum BlockError {
    /// A second start marker was found; only one tpux block per file is supported
    #[error("Found a second '{start}' marker on line {line}. Remove the duplicate block by hand.", start = BLOCK_START)]
    DuplicateBlock { line: usize },

    /// Start marker without a matching end marker
    #[error("'{start}' on line {line} has no matching '{end}'", start = BLOCK_START, end = BLOCK_END)]
    UnterminatedBlock { line: usize },

    /// End marker appearing before any start marker
    #[error("'{end}' on line {line} appears before any '{start}'", start = BLOCK_START, end = BLOCK_END)]
    UnexpectedEnd { line: usize },

    /// A malformed block, annotated with the file it was found in
    #[error("{path}: {source}")]
    InFile {
        path: String,
        #[source]
        source: Box<BlockError>,
    },

    /// Failed to read the target file
    #[error("Failed to read {0}")]
    Read(String),

    /// Failed to write the target file
    #[error("Failed to write {0}")]
    Write(String),

    /// The privileged copy onto the target failed
    #[error(transparent)]
    Exec(#[from] ExecError),
}

impl BlockError {
    /// Standard error of a failed privileged copy
    pub fn command_stderr(&self) -> Option<&str> {
        match self {
            BlockError::Exec(e) => e.stderr(),
            _ => None,
        }
    }
}
