//! Test server harness for fixture routers.
//!
//! Provides `TestServer` for spawning a real fixture server in tests.

use axum::Router;
use std::net::SocketAddr;
use tokio::task::JoinHandle;

/// A fixture router served on a random local port.
///
/// # Example
/// ```rust,ignore
/// let server = TestServer::spawn(probe_image::routes::build_routes(state)).await?;
/// let response = reqwest::get(format!("{}/healthy", server.url())).await?;
/// assert_eq!(response.status(), 200);
/// ```
pub struct TestServer {
    addr: SocketAddr,
    client: reqwest::Client,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Bind `127.0.0.1:0` and serve `app` in the background.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the listener cannot be bound.
    pub async fn spawn(app: Router) -> Result<Self, std::io::Error> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            client: reqwest::Client::new(),
            handle,
        })
    }

    /// Get the base URL of the test server.
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the socket address.
    #[must_use]
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Issue a GET for `path` against the server.
    ///
    /// # Errors
    ///
    /// Returns the `reqwest` error if the request cannot be completed.
    pub async fn get(&self, path: &str) -> Result<reqwest::Response, reqwest::Error> {
        self.client.get(format!("{}{}", self.url(), path)).send().await
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
