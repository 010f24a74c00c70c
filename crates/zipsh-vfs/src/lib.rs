//! In-memory virtual filesystem populated from a zip archive.
//!
//! The whole tree lives in two containers: a file map keyed by normalized
//! path and a set of directory keys. Nothing is ever written back to disk;
//! the store exists for the process lifetime only.

mod archive;
mod store;

pub use archive::{ArchiveImage, read_archive, read_archive_bytes};
pub use store::VfsStore;

use base64::Engine;

/// Content of a single file in the VFS.
///
/// Archive bytes that decode as UTF-8 are stored as text. Anything else is
/// kept as raw bytes and never auto-decoded; display goes through
/// [`FileContent::base64`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    Text(String),
    Binary(Vec<u8>),
}

impl FileContent {
    /// Classify raw archive bytes: UTF-8 becomes text, the rest stays binary.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        match String::from_utf8(bytes) {
            Ok(text) => FileContent::Text(text),
            Err(err) => FileContent::Binary(err.into_bytes()),
        }
    }

    /// Size in bytes of the stored content.
    pub fn len(&self) -> usize {
        match self {
            FileContent::Text(text) => text.len(),
            FileContent::Binary(bytes) => bytes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, FileContent::Binary(_))
    }

    /// Base64 rendering of binary content, for round-trip display.
    /// Text content has no base64 form.
    pub fn base64(&self) -> Option<String> {
        match self {
            FileContent::Text(_) => None,
            FileContent::Binary(bytes) => {
                Some(base64::engine::general_purpose::STANDARD.encode(bytes))
            },
        }
    }
}
