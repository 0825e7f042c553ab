//! Credential storage for flatcms.
//!
//! A single text file maps usernames to salted argon2id password hashes, one
//! YAML entry per line. The file is re-read on every lookup, so entries
//! appended by another process are visible immediately.
//!
//! Hashes are never reversed: verification re-hashes the candidate password
//! and compares in constant time inside the argon2 primitive.

pub mod credentials;
pub mod error;
pub mod hasher;

pub use credentials::CredentialStore;
pub use error::{CredentialError, CredentialResult};
pub use hasher::CredentialHasher;
