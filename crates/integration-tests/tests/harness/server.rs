//! Test server wrapper that starts chatrelay on a random port

use std::net::SocketAddr;

use chatrelay_config::Config;
use chatrelay_server::Server;
use tokio_util::sync::CancellationToken;

/// A running test server instance
pub struct TestServer {
    addr: SocketAddr,
    shutdown: CancellationToken,
    client: reqwest::Client,
}

impl TestServer {
    /// Start a test server with the given configuration
    ///
    /// Binds to port 0 for automatic port assignment
    pub async fn start(config: Config) -> anyhow::Result<Self> {
        let server = Server::new(&config)?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        // Bind the listener here so we know the actual port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        tokio::spawn(async move {
            axum::serve(listener, server.into_router())
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        let client = reqwest::Client::new();

        Ok(Self { addr, shutdown, client })
    }

    /// URL of a path on the running test server
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Get a reference to the HTTP client
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Post a raw body to `/api/chat` with the given content type
    pub async fn post_chat(&self, content_type: &str, body: &str) -> (u16, serde_json::Value) {
        let resp = self
            .client
            .post(self.url("/api/chat"))
            .header("content-type", content_type)
            .body(body.to_owned())
            .send()
            .await
            .expect("request to test server");
        let status = resp.status().as_u16();
        let json = resp.json().await.unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    /// Post a chat message as JSON to `/api/chat`
    pub async fn chat(&self, message: &str) -> (u16, serde_json::Value) {
        let body = serde_json::json!({ "message": message }).to_string();
        self.post_chat("application/json", &body).await
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
