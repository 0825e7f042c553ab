use tokio::net::TcpListener;

use crate::config::CmsConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;
use crate::state::AppState;

/// The flatcms HTTP service.
pub struct CmsServer {
    config: CmsConfig,
    state: AppState,
}

impl CmsServer {
    /// Open the stores named by `config`.
    pub fn new(config: CmsConfig) -> ServerResult<Self> {
        let state = AppState::from_config(&config)?;
        Ok(Self { config, state })
    }

    pub fn config(&self) -> &CmsConfig {
        &self.config
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.state.clone())
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let app = build_router(self.state);
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        tracing::info!(
            addr = %self.config.bind_addr,
            root = %self.config.storage_root.display(),
            "flatcms listening"
        );
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}
