//! Error types for zipsh.

use std::io;

/// Errors produced by the zipsh shell and its virtual filesystem.
///
/// None of these are fatal: every variant is caught at the surface loop and
/// converted to a printed message, after which the next line is read.
#[derive(Debug, thiserror::Error)]
pub enum ZipshError {
    /// Malformed quoting in an input line. The line yields no tokens.
    #[error("parse error: {0}")]
    Parse(String),

    /// Archive missing, corrupt, or unreadable. The store stays unchanged.
    #[error("load error: {0}")]
    Load(String),

    /// A filesystem command was issued before a successful archive load.
    #[error("VFS is not loaded (use 'load <archive>' first)")]
    NotLoaded,

    /// Path target missing, or a file where a directory was required.
    #[error("{0}")]
    Path(String),

    /// Binary content where text was required (`cat`/`rev` on binary data).
    #[error("{0}")]
    Binary(String),

    /// Unknown command or bad command usage.
    #[error("{0}")]
    Command(String),

    /// Script source missing or undecodable.
    #[error("script error: {0}")]
    Script(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ZipshError>;
