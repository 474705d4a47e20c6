//! Network collaborator: fetches and parses one standings page per season.
//!
//! The extraction core never fetches; it only ever sees the parsed document
//! returned from here.

use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, DNT, UPGRADE_INSECURE_REQUESTS,
};
use reqwest::StatusCode;
use scraper::Html;
use tracing::{debug, info};

use crate::BASE_URL;

const USER_AGENT_VALUE: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Safari/605.1.15";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
// Be polite to the site between requests.
const REQUEST_DELAY: Duration = Duration::from_secs(1);

/// Why a fetch failed. Fatal to the season's run; the pipeline never sees a
/// document when any of these occur.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request timed out after {}s", REQUEST_TIMEOUT.as_secs())]
    Timeout,
    #[error("connection error")]
    Connection,
    #[error("http error: status {0}")]
    Status(StatusCode),
    #[error("request error: {0}")]
    Other(reqwest::Error),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_connect() {
            FetchError::Connection
        } else if let Some(status) = err.status() {
            FetchError::Status(status)
        } else {
            FetchError::Other(err)
        }
    }
}

pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new() -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("es-ES,es;q=0.9,en;q=0.8"),
        );
        headers.insert(DNT, HeaderValue::from_static("1"));
        headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));

        let client = Client::builder()
            .user_agent(USER_AGENT_VALUE)
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }

    pub fn season_url(season: &str) -> String {
        format!("{BASE_URL}/{season}")
    }

    /// Fetch the standings page for `season` and parse it. Redirects are
    /// followed; non-2xx statuses are errors.
    pub fn fetch_standings(&self, season: &str) -> Result<Html, FetchError> {
        let url = Self::season_url(season);
        info!(%url, "fetching standings page");

        thread::sleep(REQUEST_DELAY);

        let response = self.client.get(&url).send()?.error_for_status()?;
        let body = response.text()?;
        debug!(bytes = body.len(), "page fetched");

        Ok(Html::parse_document(&body))
    }
}
