//! Marked-block config editing
//!
//! Inserts, replaces and removes a single tpux-owned region inside files
//! that otherwise belong to the user or the system (`~/.ssh/config`,
//! `/etc/exports`, shell rc files).

mod editor;
mod error;
mod file;

pub use editor::{BLOCK_END, BLOCK_START, BlockSpan, clear_block, insert_block, locate_block, render_block};
pub use error::BlockError;
pub use file::{BlockFile, WriteMode};
