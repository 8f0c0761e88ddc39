use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{header, Client};

use super::{Fetcher, ResponseMode};
use crate::errors::FetchError;

/// Hard limit for one provider call, connect through body.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Identifying user agent sent with every request.
pub const USER_AGENT: &str = concat!("argentum/", env!("CARGO_PKG_VERSION"));

/// [`Fetcher`] backed by a shared `reqwest` client.
///
/// The whole request (connect, status, body) runs under `tokio::time::timeout`,
/// so a slow provider is cancelled and reported as [`FetchError::Timeout`].
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_FETCH_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        let client = Client::builder()
            .connect_timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn send(&self, url: &str, mode: ResponseMode) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::ACCEPT, mode.accept())
            .send()
            .await
            .map_err(|e| self.transport_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| self.transport_error(url, e))
    }

    fn transport_error(&self, url: &str, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
                after: self.timeout,
            }
        } else {
            FetchError::Network {
                url: url.to_string(),
                message: e.to_string(),
            }
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str, mode: ResponseMode) -> Result<String, FetchError> {
        debug!("GET {} ({:?})", url, mode);

        match tokio::time::timeout(self.timeout, self.send(url, mode)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout {
                url: url.to_string(),
                after: self.timeout,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    fn http_response(status_line: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        )
    }

    /// Accepts one connection, captures the request head, then answers after `delay`.
    async fn serve_once(response: String, delay: Duration) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut head = Vec::new();
            let mut buf = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                head.extend_from_slice(&buf[..n]);
            }
            let _ = tx.send(String::from_utf8_lossy(&head).to_lowercase());
            tokio::time::sleep(delay).await;
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        });

        (format!("http://{}/quote", addr), rx)
    }

    #[tokio::test]
    async fn test_returns_body_and_sends_identifying_headers() {
        let (url, request) = serve_once(http_response("200 OK", "31.5"), Duration::ZERO).await;
        let fetcher = HttpFetcher::new();

        let body = fetcher.fetch(&url, ResponseMode::Json).await.unwrap();
        assert_eq!(body, "31.5");

        let head = request.await.unwrap();
        assert!(head.contains(&format!("user-agent: {}", USER_AGENT.to_lowercase())));
        assert!(head.contains("accept: application/json"));
    }

    #[tokio::test]
    async fn test_text_mode_accept_header() {
        let (url, request) = serve_once(http_response("200 OK", "a,b"), Duration::ZERO).await;
        HttpFetcher::new().fetch_text(&url).await.unwrap();

        let head = request.await.unwrap();
        assert!(head.contains("accept: text/csv"));
    }

    #[tokio::test]
    async fn test_non_success_status_is_http_error() {
        let (url, _request) = serve_once(
            http_response("503 Service Unavailable", "maintenance"),
            Duration::ZERO,
        )
        .await;

        let err = HttpFetcher::new()
            .fetch(&url, ResponseMode::Text)
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(503));
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let (url, _request) =
            serve_once(http_response("200 OK", "late"), Duration::from_secs(3)).await;
        let fetcher = HttpFetcher::with_timeout(Duration::from_millis(200));

        let started = std::time::Instant::now();
        let err = fetcher.fetch(&url, ResponseMode::Text).await.unwrap_err();

        assert!(err.is_timeout(), "expected timeout, got {err:?}");
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = HttpFetcher::new()
            .fetch(&format!("http://{}/", addr), ResponseMode::Json)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Network { .. }));
    }
}
