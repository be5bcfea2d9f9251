// Stylesheet Fetcher
//
// Loads remote stylesheet sources.

use async_trait::async_trait;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use url::Url;

use crate::error::FetchError;

/// Fetcher trait.
#[async_trait(?Send)]
pub trait Fetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// In-memory fetcher.
///
/// Clones share resources and the request log.
#[derive(Clone, Default)]
pub struct InMemoryFetcher {
    resources: Rc<RefCell<HashMap<String, String>>>,
    requests: Rc<RefCell<Vec<String>>>,
}

impl InMemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, url: &str, content: &str) {
        self.resources
            .borrow_mut()
            .insert(url.to_string(), content.to_string());
    }

    /// Number of fetches issued for `url`.
    pub fn request_count(&self, url: &str) -> usize {
        self.requests.borrow().iter().filter(|u| *u == url).count()
    }
}

#[async_trait(?Send)]
impl Fetcher for InMemoryFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.requests.borrow_mut().push(url.to_string());
        // Resolve on a later poll, like a real network round trip
        tokio::task::yield_now().await;
        self.resources
            .borrow()
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::not_found(url))
    }
}

/// Fetcher for `file:` URLs.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileFetcher;

#[async_trait(?Send)]
impl Fetcher for FileFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let path = Url::parse(url)
            .ok()
            .and_then(|u| u.to_file_path().ok())
            .ok_or_else(|| FetchError::load_failed(url, "not a file url"))?;
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| FetchError::load_failed(url, &e.to_string()))
    }
}

/// Fetcher for `http:` and `https:` URLs.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait(?Send)]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| FetchError::load_failed(url, &e.to_string()))?;
        response
            .text()
            .await
            .map_err(|e| FetchError::load_failed(url, &e.to_string()))
    }
}

/// Dispatches on the URL scheme.
#[derive(Debug, Clone, Default)]
pub struct DefaultFetcher {
    file: FileFetcher,
    http: HttpFetcher,
}

#[async_trait(?Send)]
impl Fetcher for DefaultFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        if url.starts_with("file:") {
            self.file.fetch(url).await
        } else if url.starts_with("http:") || url.starts_with("https:") {
            self.http.fetch(url).await
        } else {
            Err(FetchError::load_failed(url, "unsupported scheme"))
        }
    }
}
