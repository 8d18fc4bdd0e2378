use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{debug, info};

use crate::dataset::Dataset;

/// Dataset retrieval. Degraded conditions never surface as errors: a failed
/// request, a non-200 status or an unparseable body all resolve to an empty
/// dataset and the table simply renders nothing.
pub trait RowFetch {
    fn fetch_rows(&self, url: &str) -> Dataset;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        HttpFetcher { client }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        HttpFetcher::new()
    }
}

impl RowFetch for HttpFetcher {
    fn fetch_rows(&self, url: &str) -> Dataset {
        let response = match self.client.get(url).send() {
            Ok(response) => response,
            Err(err) => {
                debug!("dataset fetch from {url} failed: {err}");
                return Dataset::new();
            }
        };
        if response.status().as_u16() != 200 {
            debug!("dataset fetch from {url} returned {}", response.status());
            return Dataset::new();
        }
        match response.json::<Dataset>() {
            Ok(rows) => {
                info!("fetched {} row(s) from {url}", rows.len());
                rows
            }
            Err(err) => {
                debug!("dataset body from {url} is not a JSON array: {err}");
                Dataset::new()
            }
        }
    }
}
