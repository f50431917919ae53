use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

use crate::error::IngestError;

pub const DEFAULT_BASE_URL: &str = "http://export.arxiv.org/api/query?";

/// One page of an arXiv API query. The search query is sent verbatim, so it
/// must already be URL-encoded (`cat:cs.CV+OR+cat:cs.AI`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub search_query: String,
    pub start: usize,
    pub max_results: usize,
}

impl PageRequest {
    pub fn query_string(&self) -> String {
        format!(
            "search_query={}&sortBy=lastUpdatedDate&start={}&max_results={}",
            self.search_query, self.start, self.max_results
        )
    }

    pub fn url(&self, base_url: &str) -> String {
        format!("{base_url}{}", self.query_string())
    }
}

pub trait ArxivClient {
    /// Returns the raw Atom document for one page.
    fn fetch_page(&self, request: &PageRequest) -> Result<String, IngestError>;
}

impl<T: ArxivClient + ?Sized> ArxivClient for &T {
    fn fetch_page(&self, request: &PageRequest) -> Result<String, IngestError> {
        (**self).fetch_page(request)
    }
}

#[derive(Clone)]
pub struct ArxivHttpClient {
    client: Client,
    base_url: String,
}

impl ArxivHttpClient {
    pub fn new(base_url: &str, user_agent: &str) -> Result<Self, IngestError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent)
                .map_err(|err| IngestError::InvalidArgument(err.to_string()))?,
        );
        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|err| IngestError::ArxivHttp(err.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }
}

impl ArxivClient for ArxivHttpClient {
    fn fetch_page(&self, request: &PageRequest) -> Result<String, IngestError> {
        let response = self
            .client
            .get(request.url(&self.base_url))
            .send()
            .map_err(|err| IngestError::ArxivHttp(err.to_string()))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .unwrap_or_else(|_| "arXiv request failed".to_string());
            return Err(IngestError::ArxivStatus { status, message });
        }
        response
            .text()
            .map_err(|err| IngestError::ArxivHttp(err.to_string()))
    }
}

pub fn default_user_agent() -> String {
    format!("arxiv-ingest/{}", env!("CARGO_PKG_VERSION"))
}
