use std::sync::Arc;

use tokio::net::TcpListener;

use cddemo_store::{InMemoryResourceStore, ResourceStore};

use crate::config::ServerConfig;
use crate::error::ServerResult;
use crate::handler::AppState;
use crate::router::build_router;
use crate::schema::demo_schemas;

/// The demo REST server: a configuration plus the store it serves.
pub struct DemoServer {
    config: ServerConfig,
    store: Arc<dyn ResourceStore>,
}

impl DemoServer {
    pub fn new(config: ServerConfig, store: Arc<dyn ResourceStore>) -> Self {
        Self { config, store }
    }

    /// A server backed by a fresh in-memory store.
    pub fn in_memory(config: ServerConfig) -> Self {
        Self::new(config, Arc::new(InMemoryResourceStore::new()))
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> ServerResult<axum::Router> {
        let schemas = demo_schemas(self.config.api.clone())?;
        Ok(build_router(AppState::new(Arc::clone(&self.store), schemas)))
    }

    /// Start serving requests until Ctrl-C.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router()?;
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!("cddemo server listening on {}", self.config.bind_addr);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown requested"),
        Err(e) => {
            tracing::warn!("cannot listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_construction() {
        let server = DemoServer::in_memory(ServerConfig::default());
        assert_eq!(server.config().bind_addr, "0.0.0.0:80".parse().unwrap());
    }

    #[test]
    fn router_builds() {
        let server = DemoServer::in_memory(ServerConfig::default());
        assert!(server.router().is_ok());
    }
}
