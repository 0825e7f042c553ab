use std::sync::Arc;

use flatcms_auth::CredentialStore;
use flatcms_gate::AccessGate;
use flatcms_render::ContentRenderer;
use flatcms_store::{DocumentStore, FsDocumentStore};

use crate::config::CmsConfig;
use crate::error::ServerResult;
use crate::session::SessionStore;

/// Shared handles every request needs.
#[derive(Clone)]
pub struct AppState {
    pub documents: Arc<dyn DocumentStore>,
    pub credentials: Arc<CredentialStore>,
    pub renderer: Arc<ContentRenderer>,
    pub gate: AccessGate,
    pub sessions: Arc<SessionStore>,
    pub cookie_name: Arc<str>,
}

impl AppState {
    pub fn new(documents: Arc<dyn DocumentStore>, credentials: CredentialStore) -> Self {
        Self {
            documents,
            credentials: Arc::new(credentials),
            renderer: Arc::new(ContentRenderer::default()),
            gate: AccessGate::new(),
            sessions: Arc::new(SessionStore::new()),
            cookie_name: Arc::from(CmsConfig::default().session_cookie),
        }
    }

    /// Open the file-backed stores under the configured storage root.
    pub fn from_config(config: &CmsConfig) -> ServerResult<Self> {
        let documents = FsDocumentStore::open(config.data_dir())?;
        let credentials = CredentialStore::open(config.credentials_path())?;
        let mut state = Self::new(Arc::new(documents), credentials);
        state.cookie_name = Arc::from(config.session_cookie.as_str());
        state.sessions = Arc::new(SessionStore::with_idle_timeout(config.session_idle_timeout()));
        Ok(state)
    }
}
