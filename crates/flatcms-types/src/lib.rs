//! Foundation types for flatcms.
//!
//! This crate provides the naming, extension, and identity types shared by
//! every other flatcms crate.
//!
//! # Key Types
//!
//! - [`DocumentName`] -- Validated, path-safe document name with an allowed extension
//! - [`Extension`] -- The closed set of supported document extensions
//! - [`ContentType`] -- MIME type a document is served with
//! - [`SessionIdentity`] -- Optional signed-in username carried by a session

pub mod error;
pub mod identity;
pub mod name;

pub use error::NameError;
pub use identity::SessionIdentity;
pub use name::{validate_path_component, ContentType, DocumentName, Extension};
