use thiserror::Error;

/// Reasons a document name is rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NameError {
    #[error("a name is required")]
    Empty,

    #[error("name must not contain path components: {0:?}")]
    UnsafePath(String),

    #[error("name has no extension: {0:?}")]
    MissingExtension(String),

    #[error("unsupported extension {extension:?}; name must end with .txt or .md")]
    UnsupportedExtension { extension: String },
}
