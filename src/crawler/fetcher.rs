//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with a user agent and per-request timeout
//! - GET requests to fetch page content
//! - Error classification
//!
//! A failed fetch is an ordinary outcome on the open web. It is logged and
//! reported as "no content", never as an error, and never retried.

use crate::config::UserAgentConfig;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Upper bound on the TCP connect phase
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Source of raw page content
///
/// The crawler only ever asks for a body or nothing. Implementations must not
/// panic on network failures.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Retrieves the body at `url`, or `None` on any failure
    async fn fetch(&self, url: &Url) -> Option<String>;
}

#[async_trait]
impl<T: Fetch + ?Sized> Fetch for std::sync::Arc<T> {
    async fn fetch(&self, url: &Url) -> Option<String> {
        (**self).fetch(url).await
    }
}

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// Server answered with a non-success status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, unreadable body, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}


/// Formats the user agent as `Name/Version` or `Name/Version (+ContactURL)`
pub fn user_agent_string(config: &UserAgentConfig) -> String {
    match &config.contact_url {
        Some(contact) => format!(
            "{}/{} (+{})",
            config.crawler_name, config.crawler_version, contact
        ),
        None => format!("{}/{}", config.crawler_name, config.crawler_version),
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Whole-request timeout applied to every fetch
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent_string(config))
        .timeout(timeout)
        .connect_timeout(timeout.min(CONNECT_TIMEOUT))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL once and classifies the outcome
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
///
/// # Returns
///
/// A FetchResult indicating success or the type of failure
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            let error = if e.is_timeout() {
                "Request timeout".to_string()
            } else if e.is_connect() {
                "Connection refused".to_string()
            } else {
                e.to_string()
            };
            return FetchResult::NetworkError { error };
        }
    };

    let status = response.status();
    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    let final_url = response.url().to_string();
    match response.text().await {
        Ok(body) => FetchResult::Success {
            final_url,
            status_code: status.as_u16(),
            body,
        },
        Err(e) => FetchResult::NetworkError {
            error: e.to_string(),
        },
    }
}

/// `Fetch` implementation backed by reqwest
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher with its own client
    pub fn new(config: &UserAgentConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config, timeout)?,
        })
    }

    /// Wraps an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Option<String> {
        match fetch_url(&self.client, url.as_str()).await {
            FetchResult::Success {
                final_url,
                status_code,
                body,
            } => {
                tracing::trace!(
                    "Fetched {} ({}, {} bytes, final URL {})",
                    url,
                    status_code,
                    body.len(),
                    final_url
                );
                Some(body)
            }
            FetchResult::HttpError { status_code } => {
                tracing::debug!("HTTP {} for {}", status_code, url);
                None
            }
            FetchResult::NetworkError { error } => {
                tracing::debug!("Network error for {}: {}", url, error);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_test_config() -> UserAgentConfig {
        UserAgentConfig {
            crawler_name: "TestCrawler".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: Some("https://example.com/about".to_string()),
        }
    }

    #[test]
    fn test_build_http_client() {
        let config = create_test_config();
        let client = build_http_client(&config, Duration::from_secs(10));
        assert!(client.is_ok());
    }

    #[test]
    fn test_user_agent_format() {
        let mut config = create_test_config();
        assert_eq!(
            user_agent_string(&config),
            "TestCrawler/1.0 (+https://example.com/about)"
        );

        config.contact_url = None;
        assert_eq!(user_agent_string(&config), "TestCrawler/1.0");
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ok"))
            .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&create_test_config(), Duration::from_secs(5)).unwrap();
        let url = Url::parse(&format!("{}/ok", server.uri())).unwrap();
        assert_eq!(fetcher.fetch(&url).await.as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn test_fetch_http_error_is_absent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
            .mount(&server)
            .await;

        let client = build_http_client(&create_test_config(), Duration::from_secs(5)).unwrap();
        let url = format!("{}/missing", server.uri());
        assert!(matches!(
            fetch_url(&client, &url).await,
            FetchResult::HttpError { status_code: 404 }
        ));

        let fetcher = HttpFetcher::with_client(client);
        assert!(fetcher.fetch(&Url::parse(&url).unwrap()).await.is_none());
    }

    #[tokio::test]
    async fn test_fetch_timeout_is_absent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("slow")
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&create_test_config(), Duration::from_millis(200)).unwrap();
        let url = Url::parse(&format!("{}/slow", server.uri())).unwrap();
        assert!(fetcher.fetch(&url).await.is_none());
    }

    #[tokio::test]
    async fn test_fetch_unresolvable_host_is_absent() {
        let fetcher = HttpFetcher::new(&create_test_config(), Duration::from_secs(2)).unwrap();
        let url = Url::parse("http://nonexistent.invalid/").unwrap();
        assert!(fetcher.fetch(&url).await.is_none());
    }
}
