use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{CredentialError, CredentialResult};
use crate::hasher::CredentialHasher;

/// File-backed username → password-hash mapping.
///
/// On-disk format, one YAML mapping entry per line:
/// ```text
/// 'admin': '$argon2id$v=19$m=19456,t=2,p=1$...$...'
/// ```
/// Blank lines and `#` comments are ignored. When a username appears more
/// than once, the last line wins.
pub struct CredentialStore {
    path: PathBuf,
    hasher: CredentialHasher,
}

impl CredentialStore {
    /// Open the credential file at `path`, creating it (empty) if missing.
    pub fn open(path: impl Into<PathBuf>) -> CredentialResult<Self> {
        let path = path.into();
        let unavailable = |source| CredentialError::StoreUnavailable {
            path: path.clone(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(unavailable)?;
        }
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(unavailable)?;
        debug!(path = %path.display(), "credential store opened");
        Ok(Self {
            path,
            hasher: CredentialHasher::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the full mapping from disk.
    pub fn load(&self) -> CredentialResult<BTreeMap<String, String>> {
        parse_entries(&self.read_raw()?)
    }

    /// Whether `password` matches the stored hash for `username`.
    ///
    /// Unknown usernames return `false`, after spending the same hashing
    /// work a known username would.
    pub fn verify(&self, username: &str, password: &str) -> CredentialResult<bool> {
        let users = self.load()?;
        let matched = match users.get(username) {
            Some(stored) => self.hasher.verify(password, stored),
            None => {
                self.hasher.verify_dummy(password);
                false
            }
        };
        debug!(username, matched, "credentials checked");
        Ok(matched)
    }

    /// Append a new `username → hash(password)` entry.
    pub fn add(&self, username: &str, password: &str) -> CredentialResult<()> {
        validate_username(username)?;
        if password.is_empty() {
            return Err(CredentialError::EmptyPassword);
        }

        let raw = self.read_raw()?;
        if parse_entries(&raw)?.contains_key(username) {
            return Err(CredentialError::DuplicateUser {
                username: username.to_string(),
            });
        }

        let hash = self.hasher.hash(password)?;
        let mut line = String::new();
        if !raw.is_empty() && !raw.ends_with('\n') {
            line.push('\n');
        }
        line.push_str(&format!("'{username}': '{hash}'\n"));

        OpenOptions::new()
            .append(true)
            .open(&self.path)
            .and_then(|mut file| file.write_all(line.as_bytes()))
            .map_err(|source| self.unavailable(source))?;

        info!(username, "user added");
        Ok(())
    }

    fn read_raw(&self) -> CredentialResult<String> {
        fs::read_to_string(&self.path).map_err(|source| self.unavailable(source))
    }

    fn unavailable(&self, source: std::io::Error) -> CredentialError {
        CredentialError::StoreUnavailable {
            path: self.path.clone(),
            source,
        }
    }
}

fn parse_entries(raw: &str) -> CredentialResult<BTreeMap<String, String>> {
    let mut users = BTreeMap::new();
    for (idx, line) in raw.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed == "---" {
            continue;
        }
        let entry: BTreeMap<String, String> =
            serde_yaml::from_str(trimmed).map_err(|e| CredentialError::Malformed {
                line: idx + 1,
                reason: e.to_string(),
            })?;
        users.extend(entry);
    }
    Ok(users)
}

/// Usernames are kept to characters that need no escaping in the file.
fn validate_username(username: &str) -> CredentialResult<()> {
    let reject = |reason: &str| {
        Err(CredentialError::InvalidUsername {
            username: username.to_string(),
            reason: reason.to_string(),
        })
    };
    let mut chars = username.chars();
    match chars.next() {
        None => return reject("username must not be empty"),
        Some(c) if !c.is_ascii_alphanumeric() => {
            return reject("username must start with a letter or digit")
        }
        Some(_) => {}
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '@')) {
        return reject("only letters, digits, '_', '-', '.', '@' are allowed");
    }
    Ok(())
}
