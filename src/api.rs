use crate::error::{Error, FetchError};
use log::warn;
use reqwest::Client;
use std::time::Duration;
use tokio::time::sleep;
use url::Url;

const USER_AGENT: &str = concat!("gatherer_sql/", env!("CARGO_PKG_VERSION"));
const MAX_BACKOFF_EXPONENT: u32 = 6;

/// Retrieves a page body. Parsing into a document is left to the caller so
/// that the non-`Send` `scraper::Html` never lives across an await point.
#[allow(async_fn_in_trait)]
pub trait Fetcher {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError>;
}

pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
    retries: u32,
    retry_delay: Duration,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, retries: u32) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|source| FetchError::Transport {
                url: String::new(),
                source,
            })?;

        Ok(HttpFetcher {
            client,
            timeout,
            retries,
            retry_delay: Duration::from_secs(1),
        })
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    async fn fetch_once(&self, url: &Url) -> Result<String, FetchError> {
        let transport = |source| FetchError::Transport {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .get(url.clone())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(transport)
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let mut attempts = 0;
        loop {
            match self.fetch_once(url).await {
                Ok(body) => return Ok(body),
                Err(err) if attempts < self.retries && is_transient(&err) => {
                    attempts += 1;
                    let delay = backoff_delay(self.retry_delay, attempts);
                    warn!("{} (attempt {}), retrying in {:?}", err, attempts, delay);
                    sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

/// Delay before retry number `attempt` (1-based), doubling each time up to
/// `2^MAX_BACKOFF_EXPONENT` times the base delay.
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1).min(MAX_BACKOFF_EXPONENT);
    base.saturating_mul(1 << exponent)
}

fn is_transient(err: &FetchError) -> bool {
    match err {
        FetchError::Transport { .. } => true,
        FetchError::Status { status, .. } => *status >= 500,
    }
}

/// URL layout of the Gatherer catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    base: Url,
}

impl Catalog {
    pub fn new(base_url: &str) -> Result<Self, Error> {
        // A base without a trailing slash would make `join` drop its last segment.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let base = parse_url(&normalized)?;
        Ok(Catalog { base })
    }

    pub fn landing_page(&self) -> Result<Url, Error> {
        join_url(&self.base, "Pages/Default.aspx")
    }

    pub fn set_listing(&self, set_name: &str) -> Result<Url, Error> {
        join_url(
            &self.base,
            &format!(
                "Pages/Search/Default.aspx?sort=color+&set=[%22{}%22]",
                urlencoding::encode(set_name)
            ),
        )
    }
}

pub(crate) fn parse_url(url: &str) -> Result<Url, Error> {
    Url::parse(url).map_err(|source| Error::InvalidUrl {
        url: url.to_string(),
        source,
    })
}

pub(crate) fn join_url(base: &Url, href: &str) -> Result<Url, Error> {
    base.join(href).map_err(|source| Error::InvalidUrl {
        url: href.to_string(),
        source,
    })
}
