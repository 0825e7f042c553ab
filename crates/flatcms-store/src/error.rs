use flatcms_types::{validate_path_component, DocumentName, NameError};

/// Errors from document store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested document does not exist.
    #[error("document not found: {name}")]
    NotFound { name: String },

    /// The name is empty, path-unsafe, or has an extension outside the allow-list.
    #[error("invalid document name {name:?}: {reason}")]
    InvalidName {
        name: String,
        #[source]
        reason: NameError,
    },

    /// The underlying storage could not be read or written.
    #[error("storage unavailable: {0}")]
    Unavailable(#[from] std::io::Error),
}

impl StoreError {
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    /// `true` for failures that leave nothing meaningful to render.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Validate a name for a write: path-safe and allow-listed extension.
pub(crate) fn parse_name(raw: &str) -> StoreResult<DocumentName> {
    DocumentName::parse(raw).map_err(|reason| StoreError::InvalidName {
        name: raw.trim().to_string(),
        reason,
    })
}

/// Validate a name for a read or delete: path safety only.
pub(crate) fn check_component(raw: &str) -> StoreResult<()> {
    validate_path_component(raw).map_err(|reason| StoreError::InvalidName {
        name: raw.to_string(),
        reason,
    })
}
