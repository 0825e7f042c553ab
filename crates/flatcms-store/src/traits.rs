use flatcms_types::DocumentName;
use tracing::{debug, info, warn};

use crate::duplicate::{duplicate_name, DuplicateCounter};
use crate::error::{parse_name, StoreResult};

/// A flat, name-keyed document repository.
///
/// Backends provide the five storage primitives; the mutation operations
/// (`create`, `overwrite`, `duplicate`) are built on top of them and shared.
///
/// All implementations must satisfy these invariants:
/// - Names are single path components; anything else is `InvalidName`.
/// - `write` replaces the whole body atomically with respect to readers.
/// - Nothing is cached: `list` and `read` always observe current storage.
/// - All I/O errors are propagated as `StoreError::Unavailable`.
pub trait DocumentStore: Send + Sync {
    /// All document names, in backend enumeration order.
    ///
    /// Callers must not rely on the order for anything but display.
    fn list(&self) -> StoreResult<Vec<String>>;

    /// Whether a document named `name` exists.
    fn exists(&self, name: &str) -> StoreResult<bool>;

    /// Read the full content of `name`.
    ///
    /// Returns `NotFound` if the document does not exist.
    fn read(&self, name: &str) -> StoreResult<String>;

    /// Create or replace `name` with `content` in a single atomic step.
    fn write(&self, name: &DocumentName, content: &str) -> StoreResult<()>;

    /// Remove `name` irrevocably. Returns `NotFound` if it does not exist.
    fn delete(&self, name: &str) -> StoreResult<()>;

    /// Create a new document seeded with `initial_content`.
    ///
    /// The name is trimmed and validated first. An existing document of the
    /// same name is replaced without complaint; the replacement is logged.
    fn create(&self, name: &str, initial_content: &str) -> StoreResult<DocumentName> {
        let name = parse_name(name)?;
        if self.exists(name.as_str())? {
            warn!(document = %name, "create replaces an existing document");
        }
        self.write(&name, initial_content)?;
        info!(document = %name, bytes = initial_content.len(), "document created");
        Ok(name)
    }

    /// Replace the entire content of `name`, creating it if absent.
    fn overwrite(&self, name: &str, content: &str) -> StoreResult<DocumentName> {
        let name = parse_name(name)?;
        self.write(&name, content)?;
        info!(document = %name, bytes = content.len(), "document updated");
        Ok(name)
    }

    /// Copy `name` into a freshly numbered sibling and return the new name.
    ///
    /// The ordinal is the number of duplicates of `name` already made in the
    /// session that owns `counter`. Ordinals whose name is already taken in
    /// the store are consumed and skipped.
    fn duplicate(&self, name: &str, counter: &mut DuplicateCounter) -> StoreResult<DocumentName> {
        let source = parse_name(name)?;
        let content = self.read(source.as_str())?;

        let target = loop {
            let candidate = duplicate_name(&source, counter.next_ordinal(source.as_str()))?;
            if !self.exists(candidate.as_str())? {
                break candidate;
            }
            debug!(candidate = %candidate, "duplicate name taken; trying next ordinal");
        };

        self.create(target.as_str(), &content)
    }
}
