//! Zip archive decoding.
//!
//! The loader turns a byte source into an [`ArchiveImage`]: a map of file
//! keys to content plus a set of directory keys. Keys are stored without a
//! leading slash; directory keys end with `/`. Ancestor directories that
//! only exist implicitly (a zip may carry `docs/readme.txt` with no `docs/`
//! entry) are added while scanning.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use zip::ZipArchive;
use zipsh_types::{Result, ZipshError};

use crate::FileContent;

/// Decoded archive contents, ready to be swapped into a [`crate::VfsStore`].
#[derive(Debug, Default)]
pub struct ArchiveImage {
    /// File key (`docs/readme.txt`) to content.
    pub files: BTreeMap<String, FileContent>,
    /// Directory keys (`docs/`), including implicit ancestors.
    pub folders: BTreeSet<String>,
}

impl ArchiveImage {
    /// Insert every ancestor directory of the known keys.
    fn add_implicit_ancestors(&mut self) {
        let mut ancestors = BTreeSet::new();
        for key in self.files.keys().chain(self.folders.iter()) {
            for (i, ch) in key.char_indices() {
                if ch == '/' {
                    ancestors.insert(key[..=i].to_string());
                }
            }
        }
        self.folders.extend(ancestors);
    }
}

/// Read a zip archive from disk.
///
/// Missing file, unreadable file, and invalid zip data each produce a
/// distinct [`ZipshError::Load`] message.
pub fn read_archive(path: &Path) -> Result<ArchiveImage> {
    if !path.exists() {
        return Err(ZipshError::Load(format!(
            "archive not found: {}",
            path.display()
        )));
    }
    let file = fs::File::open(path).map_err(|e| {
        ZipshError::Load(format!("cannot open archive {}: {e}", path.display()))
    })?;
    read_from(file)
}

/// Read a zip archive from an in-memory byte buffer.
pub fn read_archive_bytes(bytes: &[u8]) -> Result<ArchiveImage> {
    read_from(Cursor::new(bytes))
}

fn read_from<R: Read + Seek>(reader: R) -> Result<ArchiveImage> {
    let mut zip = ZipArchive::new(reader)
        .map_err(|e| ZipshError::Load(format!("not a valid zip archive: {e}")))?;

    let mut image = ArchiveImage::default();
    for i in 0..zip.len() {
        let mut entry = zip
            .by_index(i)
            .map_err(|e| ZipshError::Load(format!("corrupt archive entry #{i}: {e}")))?;
        let key = normalize_entry_name(entry.name());
        if key.is_empty() {
            continue;
        }
        if entry.is_dir() {
            image.folders.insert(key);
        } else {
            let mut bytes = Vec::with_capacity(entry.size() as usize);
            entry
                .read_to_end(&mut bytes)
                .map_err(|e| ZipshError::Load(format!("failed to read entry {key}: {e}")))?;
            let content = FileContent::from_bytes(bytes);
            if content.is_binary() {
                log::debug!("stored {key} as binary ({} bytes)", content.len());
            }
            image.files.insert(key, content);
        }
    }
    image.add_implicit_ancestors();

    log::info!(
        "decoded archive: {} files, {} directories",
        image.files.len(),
        image.folders.len()
    );
    Ok(image)
}

/// Strip leading slashes and collapse backslash separators, so zip entries
/// written by different tools end up under the same key scheme.
fn normalize_entry_name(name: &str) -> String {
    let slashed = name.replace('\\', "/");
    let mut key = String::with_capacity(slashed.len());
    let mut prev_slash = false;
    for ch in slashed.trim_start_matches('/').chars() {
        if ch == '/' {
            if !prev_slash {
                key.push(ch);
            }
            prev_slash = true;
        } else {
            key.push(ch);
            prev_slash = false;
        }
    }
    key
}
