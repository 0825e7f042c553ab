use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

/// Directory under the storage root that holds documents.
pub const DATA_DIR: &str = "data";
/// File under the storage root that holds credentials.
pub const CREDENTIALS_FILE: &str = "users.yml";

/// Service configuration.
///
/// Every path the service touches is derived from `storage_root`, so a test
/// and a production instance differ only in the value passed here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CmsConfig {
    pub bind_addr: SocketAddr,
    pub storage_root: PathBuf,
    pub session_cookie: String,
    /// Seconds a session may sit unused before it is forgotten.
    pub session_idle_secs: u64,
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 4567)),
            storage_root: PathBuf::from("."),
            session_cookie: "flatcms_session".into(),
            session_idle_secs: 24 * 60 * 60,
        }
    }
}

impl CmsConfig {
    /// A default configuration rooted at `storage_root`.
    pub fn with_root(storage_root: impl Into<PathBuf>) -> Self {
        Self {
            storage_root: storage_root.into(),
            ..Default::default()
        }
    }

    pub fn data_dir(&self) -> PathBuf {
        self.storage_root.join(DATA_DIR)
    }

    pub fn credentials_path(&self) -> PathBuf {
        self.storage_root.join(CREDENTIALS_FILE)
    }

    pub fn session_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.session_idle_secs)
    }

    /// Parse a TOML document; missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> ServerResult<Self> {
        toml::from_str(text).map_err(|e| ServerError::Config(e.to_string()))
    }

    pub fn from_toml_file(path: &Path) -> ServerResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ServerError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }
}
