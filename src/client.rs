use tracing::{debug, instrument};

use crate::error::{HowstatError, Result};

/// Source of raw page markup.
///
/// Any non-2xx response must surface as [`HowstatError::UnexpectedStatus`] so
/// callers can tell a missing page from a broken one.
#[allow(async_fn_in_trait)]
pub trait PageFetcher {
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// [`PageFetcher`] backed by a [`reqwest::Client`].
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> howstat_scraper::Result<()> {
/// use howstat_scraper::{HttpFetcher, PageFetcher};
///
/// let fetcher = HttpFetcher::new();
/// let body = fetcher
///     .fetch("http://howstat.com/cricket/Statistics/Players/PlayerListCurrent.asp")
///     .await?;
/// println!("fetched {} bytes", body.len());
/// # Ok(())
/// # }
/// ```
pub struct HttpFetcher {
    http: reqwest::Client,
}

impl HttpFetcher {
    /// Create a new fetcher with default settings.
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    /// Create a fetcher using the provided [`reqwest::Client`].
    ///
    /// Use this when you need to configure timeouts, proxies, headers, etc.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { http: client }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl PageFetcher for HttpFetcher {
    #[instrument(skip(self))]
    async fn fetch(&self, url: &str) -> Result<String> {
        debug!("fetching page");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| HowstatError::Http {
                url: url.to_owned(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(HowstatError::UnexpectedStatus {
                url: url.to_owned(),
                status,
            });
        }

        response.text().await.map_err(|e| HowstatError::ResponseBody {
            url: url.to_owned(),
            source: e,
        })
    }
}
