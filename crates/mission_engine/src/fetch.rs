use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};

use crate::{FailureKind, FetchError, FetchMetadata, FetchOutput};

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; SEOMissionBot/1.0)";

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            redirect_limit: 5,
            max_bytes: 5 * 1024 * 1024,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// GET capability used for target pages, robots.txt and sitemap.xml.
///
/// Non-2xx responses are errors (`FailureKind::HttpStatus`).
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchOutput, FetchError>;

    /// Status of a GET once the response headers arrive. The body is never read,
    /// so `max_bytes` does not apply.
    async fn check_status(&self, url: &str, timeout: Duration) -> Result<u16, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    settings: FetchSettings,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Self {
        Self { settings }
    }

    fn build_client(
        &self,
        redirect_counter: Arc<AtomicUsize>,
    ) -> Result<reqwest::Client, FetchError> {
        let redirect_limit = self.settings.redirect_limit;
        let policy = reqwest::redirect::Policy::custom(move |attempt| {
            let count = attempt.previous().len();
            redirect_counter.store(count, Ordering::Relaxed);
            if count >= redirect_limit {
                attempt.error("redirect limit exceeded")
            } else {
                attempt.follow()
            }
        });

        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .redirect(policy)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))
    }
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchOutput, FetchError> {
        let parsed = parse_url(url)?;
        let redirect_counter = Arc::new(AtomicUsize::new(0));
        let client = self.build_client(redirect_counter.clone())?;

        // The timeout covers the whole exchange, body included.
        let exchange = async {
            let response = self.send(&client, parsed).await?;
            let status = response.status();

            if let Some(content_len) = response.content_length() {
                if content_len > self.settings.max_bytes {
                    return Err(FetchError::new(
                        FailureKind::TooLarge {
                            max_bytes: self.settings.max_bytes,
                            actual: Some(content_len),
                        },
                        "response too large",
                    ));
                }
            }

            let final_url = response.url().to_string();
            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .map(|value| value.to_string());

            let mut bytes = Vec::new();
            let mut stream = response.bytes_stream();
            while let Some(chunk) = stream.next().await {
                let chunk = chunk.map_err(map_reqwest_error)?;
                let next_len = bytes.len() as u64 + chunk.len() as u64;
                if next_len > self.settings.max_bytes {
                    return Err(FetchError::new(
                        FailureKind::TooLarge {
                            max_bytes: self.settings.max_bytes,
                            actual: Some(next_len),
                        },
                        "response too large",
                    ));
                }
                bytes.extend_from_slice(&chunk);
            }

            let metadata = FetchMetadata {
                original_url: url.to_string(),
                final_url,
                status: status.as_u16(),
                redirect_count: redirect_counter.load(Ordering::Relaxed),
                content_type,
                byte_len: bytes.len() as u64,
            };
            Ok(FetchOutput { bytes, metadata })
        };

        within(timeout, exchange).await
    }

    async fn check_status(&self, url: &str, timeout: Duration) -> Result<u16, FetchError> {
        let parsed = parse_url(url)?;
        let client = self.build_client(Arc::new(AtomicUsize::new(0)))?;
        let exchange = async {
            let response = self.send(&client, parsed).await?;
            Ok(response.status().as_u16())
        };
        within(timeout, exchange).await
    }
}

impl ReqwestFetcher {
    /// Send a GET and reject non-2xx statuses. The body is left unread.
    async fn send(
        &self,
        client: &reqwest::Client,
        url: reqwest::Url,
    ) -> Result<reqwest::Response, FetchError> {
        let response = client
            .get(url)
            .header(USER_AGENT, self.settings.user_agent.as_str())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
        Ok(response)
    }
}

fn parse_url(url: &str) -> Result<reqwest::Url, FetchError> {
    reqwest::Url::parse(url).map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))
}

async fn within<T>(
    timeout: Duration,
    exchange: impl std::future::Future<Output = Result<T, FetchError>>,
) -> Result<T, FetchError> {
    match tokio::time::timeout(timeout, exchange).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::new(
            FailureKind::Timeout,
            format!("no complete response within {}ms", timeout.as_millis()),
        )),
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_redirect() {
        return FetchError::new(FailureKind::RedirectLimitExceeded, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
