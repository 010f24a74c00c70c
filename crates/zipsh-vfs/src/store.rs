//! The VFS store: file map, directory-key set, working directory, load flag.
//!
//! Keys are stored without a leading slash (`docs/readme.txt`, `docs/`);
//! the root directory is the empty prefix. Presentation paths are absolute
//! (`/docs/readme.txt`), and `cwd` always carries both a leading and a
//! trailing slash (`/`, `/docs/`).

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use zipsh_types::{Result, ZipshError};

use crate::{ArchiveImage, FileContent, archive};

/// A fully in-memory virtual filesystem with an explicit lifecycle:
/// created empty, replaced wholesale by a successful load, reset in bulk.
#[derive(Debug)]
pub struct VfsStore {
    files: BTreeMap<String, FileContent>,
    folders: BTreeSet<String>,
    cwd: String,
    loaded: bool,
}

impl VfsStore {
    /// Create an empty, unloaded store with `cwd = "/"`.
    pub fn new() -> Self {
        Self {
            files: BTreeMap::new(),
            folders: BTreeSet::new(),
            cwd: "/".to_string(),
            loaded: false,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Current working directory in presentation form (`/`, `/docs/`).
    pub fn cwd(&self) -> &str {
        &self.cwd
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn folder_count(&self) -> usize {
        self.folders.len()
    }

    /// Replace the entire store contents with a decoded archive image.
    pub fn load(&mut self, image: ArchiveImage) {
        self.files = image.files;
        self.folders = image.folders;
        self.cwd = "/".to_string();
        self.loaded = true;
        log::info!(
            "VFS loaded: {} files, {} directories",
            self.files.len(),
            self.folders.len()
        );
    }

    /// Load a zip archive from disk. On failure the store is untouched.
    ///
    /// Returns `(file_count, folder_count)` on success.
    pub fn load_path(&mut self, path: &Path) -> Result<(usize, usize)> {
        let image = archive::read_archive(path)?;
        self.load(image);
        Ok((self.files.len(), self.folders.len()))
    }

    /// Load a zip archive from an in-memory buffer. On failure the store is
    /// untouched.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<(usize, usize)> {
        let image = archive::read_archive_bytes(bytes)?;
        self.load(image);
        Ok((self.files.len(), self.folders.len()))
    }

    /// Clear back to the empty, unloaded state. Always succeeds.
    pub fn reset(&mut self) {
        self.files.clear();
        self.folders.clear();
        self.cwd = "/".to_string();
        self.loaded = false;
    }

    /// Resolve a path against `cwd` into absolute presentation form.
    ///
    /// Absolute inputs stand alone; relative inputs are joined onto `cwd`.
    /// `.` and `..` segments are folded. The result starts with `/` and has
    /// no trailing slash (except root), so re-resolving it is the identity.
    pub fn resolve(&self, input: &str) -> String {
        let raw = if input.starts_with('/') {
            input.to_string()
        } else {
            // cwd always ends with '/', so plain concatenation is clean.
            format!("{}{input}", self.cwd)
        };

        let mut parts: Vec<&str> = Vec::new();
        for component in raw.split('/') {
            match component {
                "" | "." => {},
                ".." => {
                    parts.pop();
                },
                other => parts.push(other),
            }
        }

        if parts.is_empty() {
            "/".to_string()
        } else {
            format!("/{}", parts.join("/"))
        }
    }

    /// Whether an absolute path names a file key.
    pub fn is_file(&self, abs: &str) -> bool {
        self.files.contains_key(key_of(abs))
    }

    /// Whether an absolute path names a directory: root, an explicit folder
    /// key, or a prefix of any stored key.
    pub fn is_dir(&self, abs: &str) -> bool {
        if abs == "/" {
            return true;
        }
        let prefix = format!("{}/", key_of(abs));
        self.folders.contains(&prefix) || self.has_key_under(&prefix)
    }

    /// List the immediate children of a directory: deduplicated,
    /// lexicographically sorted, directories rendered with a trailing `/`.
    pub fn list(&self, path: Option<&str>) -> Result<Vec<String>> {
        let abs = self.resolve(path.unwrap_or(""));
        if self.is_file(&abs) {
            return Err(ZipshError::Path(format!(
                "{abs}: is a file, not a directory"
            )));
        }
        if !self.is_dir(&abs) {
            return Err(ZipshError::Path(format!("{abs}: no such directory")));
        }

        let prefix = dir_key_of(&abs);
        let mut children = BTreeSet::new();
        for key in self.files.keys().chain(self.folders.iter()) {
            if let Some(rest) = key.strip_prefix(&prefix)
                && !rest.is_empty()
            {
                match rest.split_once('/') {
                    // Further nesting after the first segment: a directory.
                    Some((name, _)) => {
                        children.insert(format!("{name}/"));
                    },
                    None => {
                        children.insert(rest.to_string());
                    },
                }
            }
        }
        Ok(children.into_iter().collect())
    }

    /// Change the working directory.
    ///
    /// With no argument, go to root. A target that names a file key is
    /// rejected; a target with no file or folder key under it does not
    /// exist. `cwd` is unchanged on failure.
    pub fn change_dir(&mut self, path: Option<&str>) -> Result<()> {
        let Some(path) = path else {
            self.cwd = "/".to_string();
            return Ok(());
        };
        let abs = self.resolve(path);
        if abs == "/" {
            self.cwd = abs;
            return Ok(());
        }
        if self.is_file(&abs) {
            return Err(ZipshError::Path(format!(
                "{abs}: is a file, not a directory"
            )));
        }
        if !self.is_dir(&abs) {
            return Err(ZipshError::Path(format!("{abs}: no such directory")));
        }
        self.cwd = format!("{abs}/");
        Ok(())
    }

    /// Look up a file's content by absolute or `cwd`-relative path.
    pub fn read(&self, path: &str) -> Result<&FileContent> {
        let abs = self.resolve(path);
        self.files
            .get(key_of(&abs))
            .ok_or_else(|| ZipshError::Path(format!("{abs}: no such file")))
    }

    /// Read a text file with its full character sequence reversed.
    ///
    /// The content is reversed as one sequence, line breaks included, so a
    /// multi-line file comes out with its lines in reverse order and each
    /// line's characters reversed. Binary content is refused.
    pub fn read_reversed(&self, path: &str) -> Result<String> {
        match self.read(path)? {
            FileContent::Text(text) => Ok(text.chars().rev().collect()),
            FileContent::Binary(_) => {
                let abs = self.resolve(path);
                Err(ZipshError::Binary(format!("{abs}: binary file")))
            },
        }
    }

    fn has_key_under(&self, prefix: &str) -> bool {
        // BTreeMap/BTreeSet range scans let us probe the prefix without a
        // full walk.
        let files_hit = self
            .files
            .range(prefix.to_string()..)
            .next()
            .is_some_and(|(k, _)| k.starts_with(prefix));
        let folders_hit = self
            .folders
            .range(prefix.to_string()..)
            .next()
            .is_some_and(|k| k.starts_with(prefix));
        files_hit || folders_hit
    }
}

impl Default for VfsStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Stored key form of an absolute path: strip the leading slash.
fn key_of(abs: &str) -> &str {
    abs.trim_start_matches('/')
}

/// Stored directory-key form: empty prefix for root, `name/` otherwise.
fn dir_key_of(abs: &str) -> String {
    if abs == "/" {
        String::new()
    } else {
        format!("{}/", key_of(abs))
    }
}
