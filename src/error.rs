use ::scraper::error::SelectorErrorKind;

/// All errors that can occur while scraping howstat and persisting the results.
#[derive(thiserror::Error, Debug)]
pub enum HowstatError {
    /// HTTP request failed (network, DNS, TLS, timeout, etc.).
    #[error("http request failed for {url}: {source}")]
    Http {
        url: String,
        source: reqwest::Error,
    },

    /// Server returned a non-success HTTP status code.
    #[error("unexpected status {status} for {url}")]
    UnexpectedStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Failed to read the response body as text.
    #[error("failed to read response body from {url}: {source}")]
    ResponseBody {
        url: String,
        source: reqwest::Error,
    },

    /// A CSS selector string could not be parsed.
    #[error("invalid CSS selector: {0}")]
    Selector(String),

    /// Reading or writing a collection file failed.
    #[error("i/o error on {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// A record could not be converted to or from JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The remote document store rejected a command or could not be reached.
    #[error("document store error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    /// A record could not be converted to BSON.
    #[error("bson encoding error: {0}")]
    BsonEncode(#[from] mongodb::bson::ser::Error),

    /// A stored BSON document could not be read back as a record.
    #[error("bson decoding error: {0}")]
    BsonDecode(#[from] mongodb::bson::de::Error),

    /// An environment setting is missing or malformed.
    #[error("invalid configuration for {key}: {reason}")]
    Config { key: &'static str, reason: String },
}

impl HowstatError {
    /// `true` for errors raised while fetching a page, as opposed to
    /// parsing or persisting it. Callers skip the unit of work on these.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            HowstatError::Http { .. }
                | HowstatError::UnexpectedStatus { .. }
                | HowstatError::ResponseBody { .. }
        )
    }
}

impl<'a> From<SelectorErrorKind<'a>> for HowstatError {
    fn from(err: SelectorErrorKind<'a>) -> Self {
        HowstatError::Selector(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, HowstatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_failure_classification() {
        let status = HowstatError::UnexpectedStatus {
            url: "http://example.test".to_owned(),
            status: reqwest::StatusCode::NOT_FOUND,
        };
        assert!(status.is_fetch_failure());

        let selector = HowstatError::Selector("bad".to_owned());
        assert!(!selector.is_fetch_failure());

        let config = HowstatError::Config {
            key: "HOWSTAT_STORE",
            reason: "unknown mode".to_owned(),
        };
        assert!(!config.is_fetch_failure());
        assert_eq!(
            config.to_string(),
            "invalid configuration for HOWSTAT_STORE: unknown mode"
        );
    }
}
