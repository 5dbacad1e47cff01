use crate::types::{FetchConfig, RelayError, Result};
use backoff::{backoff::Backoff, exponential::ExponentialBackoff};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, error, warn};

/// Shared HTTP client for idempotent reads (listings, image downloads).
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self { client, config })
    }

    /// GET a JSON document, retrying transport errors and non-success statuses.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.get_with_retry(url).await?;
        Ok(response.json::<T>().await?)
    }

    /// GET a binary body, retrying transport errors and non-success statuses.
    pub async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.get_with_retry(url).await?;
        let bytes = response.bytes().await?;
        debug!("Downloaded {} bytes from {}", bytes.len(), url);
        Ok(bytes.to_vec())
    }

    async fn get_with_retry(&self, url: &str) -> Result<Response> {
        let start_time = Instant::now();
        let retry_delay = self.config.retry_delay_seconds;

        let mut backoff: ExponentialBackoff<backoff::SystemClock> = ExponentialBackoff {
            current_interval: Duration::from_secs(retry_delay),
            initial_interval: Duration::from_secs(retry_delay),
            max_interval: Duration::from_secs(retry_delay * 32),
            multiplier: 2.0,
            max_elapsed_time: Some(Duration::from_secs(retry_delay.max(1) * 60)),
            ..Default::default()
        };

        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            debug!("GET {} (attempt {})", url, attempt + 1);
            let error = match self.client.get(url).send().await {
                Ok(response) if response.status().is_success() => {
                    debug!("GET {} succeeded in {:?}", url, start_time.elapsed());
                    return Ok(response);
                }
                Ok(response) => {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    RelayError::Api {
                        status: status.as_u16(),
                        body,
                    }
                }
                Err(e) => RelayError::Http(e),
            };

            last_error = Some(error);
            if attempt < self.config.max_retries {
                if let Some(delay) = backoff.next_backoff() {
                    warn!("Attempt {} failed for {}, retrying in {:?}", attempt + 1, url, delay);
                    tokio::time::sleep(delay).await;
                    continue;
                }
            }
            break;
        }

        error!("Failed to GET {} after {} attempts", url, self.config.max_retries + 1);
        Err(last_error.unwrap_or_else(|| RelayError::Response(format!("no response from {url}"))))
    }
}
