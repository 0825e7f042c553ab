//! Document storage for flatcms.
//!
//! Documents are flat, named text files. The store enumerates, reads,
//! creates, overwrites, duplicates, and deletes them by name; it never
//! interprets their contents.
//!
//! # Storage Backends
//!
//! All backends implement the [`DocumentStore`] trait:
//!
//! - [`FsDocumentStore`] -- one flat directory on the local file system
//! - [`InMemoryDocumentStore`] -- `BTreeMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. A document's storage key is its name; names never contain path components.
//! 2. Writes replace the whole body. There is no append or patch.
//! 3. Each write is atomic: readers see the old body or the new one, never a mix.
//! 4. Nothing is cached. Every read and listing goes back to the backend.
//! 5. All I/O errors are propagated, never silently ignored.

pub mod duplicate;
pub mod error;
pub mod fs;
pub mod memory;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use duplicate::{duplicate_name, DuplicateCounter};
pub use error::{StoreError, StoreResult};
pub use fs::FsDocumentStore;
pub use memory::InMemoryDocumentStore;
pub use traits::DocumentStore;
