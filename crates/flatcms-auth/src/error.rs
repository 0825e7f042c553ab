use std::path::PathBuf;

/// Errors from credential store operations.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// Signup for a username that already has an entry.
    #[error("user already exists: {username}")]
    DuplicateUser { username: String },

    /// The username cannot be stored in the credential file.
    #[error("invalid username {username:?}: {reason}")]
    InvalidUsername { username: String, reason: String },

    #[error("password must not be empty")]
    EmptyPassword,

    /// The credential file could not be read or written.
    #[error("credential store unavailable at {}: {source}", path.display())]
    StoreUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line of the credential file is not a `username: hash` entry.
    #[error("malformed credential entry on line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    /// The password hashing primitive failed.
    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// Result alias for credential operations.
pub type CredentialResult<T> = Result<T, CredentialError>;
