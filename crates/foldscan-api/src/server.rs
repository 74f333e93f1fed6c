//! API server.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::routes::create_router;
use crate::state::AppState;

/// The scan API server.
pub struct ApiServer {
    host: String,
    port: u16,
    state: Arc<AppState>,
}

impl ApiServer {
    pub fn new(host: impl Into<String>, port: u16, state: Arc<AppState>) -> Self {
        Self {
            host: host.into(),
            port,
            state,
        }
    }

    /// Get the server address.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Start the server.
    pub async fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        let app = create_router(self.state.clone());

        let addr: SocketAddr = self.addr().parse()?;
        let listener = TcpListener::bind(addr).await?;

        info!("Scan API listening on {}", addr);
        // ConnectInfo gives handlers the client address for rate limiting.
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foldscan_config::Config;

    fn test_state() -> Arc<AppState> {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.server.scans_dir = tmp.path().join("scans");
        AppState::from_config(&config, "http://localhost:3000").unwrap()
    }

    #[test]
    fn addr_formats_host_and_port() {
        let server = ApiServer::new("127.0.0.1", 3000, test_state());
        assert_eq!(server.addr(), "127.0.0.1:3000");

        let server = ApiServer::new("0.0.0.0", 8080, test_state());
        assert_eq!(server.addr(), "0.0.0.0:8080");
    }
}
