use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use flatcms_types::DocumentName;
use tracing::{debug, warn};

use crate::error::{check_component, StoreError, StoreResult};
use crate::traits::DocumentStore;

/// Prefix for in-flight temporary files. Dot-prefixed names are never
/// valid documents, so these never show up in listings.
const TEMP_PREFIX: &str = ".flatcms-";

/// Document store backed by a single flat directory.
///
/// Every document is one regular file named after the document. Writes go
/// to a temporary file in the same directory, are synced, and then renamed
/// over the target, so a concurrent reader sees either the old body or the
/// new one.
#[derive(Clone, Debug)]
pub struct FsDocumentStore {
    root: PathBuf,
}

impl FsDocumentStore {
    /// Open the store at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        debug!(root = %root.display(), "document store opened");
        Ok(Self { root })
    }

    /// The directory documents live in.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Storage location of `name`. The name must already be path-checked.
    fn path_of(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Path of the regular file behind `name`.
    ///
    /// Directories and other non-regular entries are not documents and
    /// report `NotFound`, matching what `list` and `exists` show.
    fn document_path(&self, name: &str) -> StoreResult<PathBuf> {
        check_component(name)?;
        let path = self.path_of(name);
        match fs::metadata(&path) {
            Ok(meta) if meta.is_file() => Ok(path),
            Ok(_) => Err(StoreError::not_found(name)),
            Err(e) => Err(not_found_or(e, name)),
        }
    }
}

fn not_found_or(err: io::Error, name: &str) -> StoreError {
    if err.kind() == io::ErrorKind::NotFound {
        StoreError::not_found(name)
    } else {
        StoreError::Unavailable(err)
    }
}

impl DocumentStore for FsDocumentStore {
    fn list(&self) -> StoreResult<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) if name.starts_with('.') => {}
                Ok(name) => names.push(name),
                Err(raw) => warn!(file = ?raw, "skipping non-UTF-8 file name"),
            }
        }
        Ok(names)
    }

    fn exists(&self, name: &str) -> StoreResult<bool> {
        match self.document_path(name) {
            Ok(_) => Ok(true),
            Err(StoreError::NotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn read(&self, name: &str) -> StoreResult<String> {
        let path = self.document_path(name)?;
        let content = fs::read_to_string(path).map_err(|e| not_found_or(e, name))?;
        debug!(document = name, bytes = content.len(), "document read");
        Ok(content)
    }

    fn write(&self, name: &DocumentName, content: &str) -> StoreResult<()> {
        let target = self.path_of(name.as_str());
        let mut temp = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .tempfile_in(&self.root)?;
        temp.write_all(content.as_bytes())?;
        temp.as_file().sync_all()?;
        temp.persist(&target).map_err(|e| e.error)?;
        debug!(document = %name, bytes = content.len(), "document written");
        Ok(())
    }

    fn delete(&self, name: &str) -> StoreResult<()> {
        let path = self.document_path(name)?;
        fs::remove_file(path).map_err(|e| not_found_or(e, name))?;
        debug!(document = name, "document deleted");
        Ok(())
    }
}
