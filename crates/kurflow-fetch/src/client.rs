//! HTTP client for downloading feed documents.

use bytes::Bytes;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

use crate::url::BASE_URL;

/// Configuration for the download client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the feed archive.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Pause between consecutive requests of one job.
    pub request_delay: Duration,
    /// User agent string.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            timeout: Duration::from_secs(15),
            request_delay: Duration::from_millis(30), // Keep load on the archive low
            user_agent: format!("kurflow/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Errors that can occur during downloads.
#[derive(Error, Debug)]
pub enum DownloadError {
    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with anything but 200 OK.
    #[error("Unexpected status: {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },
}

impl DownloadError {
    /// Returns true if the server answered 404, which the archive uses for
    /// days without a publication (weekends and holidays).
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404 })
    }
}

/// HTTP client for the feed archive.
///
/// Requests are issued one at a time; there are no retries.
#[derive(Debug, Clone)]
pub struct DownloadClient {
    client: Client,
    config: ClientConfig,
}

impl DownloadClient {
    /// Creates a new download client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            // One connection is enough for sequential requests
            .pool_max_idle_per_host(1)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_nodelay(true)
            .timeout(config.timeout)
            .connect_timeout(config.timeout.min(Duration::from_secs(10)))
            .user_agent(&config.user_agent)
            .gzip(true)
            .build()?;
        Ok(Self { client, config })
    }

    /// Creates a client with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_defaults() -> Result<Self, reqwest::Error> {
        Self::new(ClientConfig::default())
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Downloads a single feed document, returning its raw bytes.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-200 status.
    pub async fn download(&self, url: &str) -> Result<Bytes, DownloadError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(DownloadError::Status {
                status: status.as_u16(),
            });
        }

        Ok(response.bytes().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(15));
        assert_eq!(config.request_delay, Duration::from_millis(30));
        assert!(config.user_agent.starts_with("kurflow/"));
    }

    #[tokio::test]
    async fn test_client_creation() {
        let client = DownloadClient::with_defaults();
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_download_ok() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/202401/02012024.xml"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<Tarih_Date/>"))
            .mount(&server)
            .await;

        let client = DownloadClient::with_defaults().unwrap();
        let body = client
            .download(&format!("{}/202401/02012024.xml", server.uri()))
            .await
            .unwrap();

        assert_eq!(&body[..], b"<Tarih_Date/>");
    }

    #[tokio::test]
    async fn test_download_not_found() {
        let server = MockServer::start().await;

        let client = DownloadClient::with_defaults().unwrap();
        let err = client
            .download(&format!("{}/202401/06012024.xml", server.uri()))
            .await
            .unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_download_non_ok_success_status_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let client = DownloadClient::with_defaults().unwrap();
        let err = client
            .download(&format!("{}/anything.xml", server.uri()))
            .await
            .unwrap_err();

        assert!(matches!(err, DownloadError::Status { status: 204 }));
    }
}
