mod info;
mod pages;

use std::net::SocketAddr;

use axum::Router;
use axum::routing::get;
use chatrelay_config::Config;
use chatrelay_relay::Relay;
use tower_http::trace::TraceLayer;

use crate::info::ServiceInfo;

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the server from configuration
    ///
    /// `POST /api/chat` is mounted only when the relay is enabled; the
    /// informational endpoints are always available.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the completion
    /// provider cannot be constructed
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        config.validate()?;

        let listen_address = config.server.listen_address();
        let info = ServiceInfo::from_config(config);

        let mut info_routes = Router::new().route("/api/info", get(info::info_handler));

        if config.server.health.enabled {
            info_routes = info_routes.route(&config.server.health.path, get(info::health_handler));
        }

        if config.server.debug.enabled {
            tracing::warn!(path = %config.server.debug.path, "debug endpoint enabled");
            info_routes = info_routes.route(&config.server.debug.path, get(info::debug_handler));
        }

        let mut app = Router::new()
            .route("/", get(pages::index_handler))
            .merge(info_routes.with_state(info));

        match config.active_provider() {
            Some(provider) => {
                let relay = Relay::from_config(provider, &config.relay)?;
                tracing::info!(
                    provider = provider.provider_type.as_str(),
                    endpoint = %provider.endpoint,
                    deployment = %provider.deployment,
                    api_key = "[redacted]",
                    "chat relay enabled"
                );
                app = app.merge(chatrelay_relay::chat_router(relay));
            }
            None => tracing::warn!("chat relay disabled; serving informational endpoints only"),
        }

        let app = app.fallback(pages::not_found_handler).layer(TraceLayer::new_for_http());

        Ok(Self {
            router: app,
            listen_address,
        })
    }

    /// Get the configured listen address
    #[must_use]
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Consume the server and return the inner router
    ///
    /// Useful for testing when the caller manages the listener
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Start serving requests
    ///
    /// Blocks until the cancellation token is triggered.
    ///
    /// # Errors
    ///
    /// Returns an error if binding the TCP listener or serving fails
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("graceful shutdown initiated");
            })
            .await?;

        Ok(())
    }
}
