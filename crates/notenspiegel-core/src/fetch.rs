use crate::config::SourceConfig;
use crate::error::NotenspiegelError;
use reqwest::blocking::{Client, Response};
use std::path::Path;
use tracing::{debug, info};

/// Retrieves raw bytes for a document location.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, location: &str) -> Result<Vec<u8>, NotenspiegelError>;

    fn fetch_text(&self, location: &str) -> Result<String, NotenspiegelError> {
        let bytes = self.fetch(location)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Blocking HTTP fetcher. One GET per call, no retries.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &SourceConfig) -> Result<Self, NotenspiegelError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("notenspiegel/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| NotenspiegelError::network(&config.host, e))?;
        Ok(HttpFetcher { client })
    }
}

impl HttpFetcher {
    /// GET `location`, failing on any non-success status.
    fn get(&self, location: &str) -> Result<Response, NotenspiegelError> {
        info!(location, "GET");
        let response = self
            .client
            .get(location)
            .send()
            .map_err(|e| NotenspiegelError::network(location, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotenspiegelError::network(location, format!("HTTP {}", status)));
        }
        Ok(response)
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, location: &str) -> Result<Vec<u8>, NotenspiegelError> {
        let bytes = self
            .get(location)?
            .bytes()
            .map_err(|e| NotenspiegelError::network(location, e))?;
        debug!(location, bytes = bytes.len(), "response received");
        Ok(bytes.to_vec())
    }

    /// Decodes with the charset from `Content-Type`, UTF-8 if none is declared.
    fn fetch_text(&self, location: &str) -> Result<String, NotenspiegelError> {
        let text = self
            .get(location)?
            .text()
            .map_err(|e| NotenspiegelError::network(location, e))?;
        debug!(location, chars = text.len(), "page received");
        Ok(text)
    }
}

/// Reads locations as local file paths.
pub struct FileFetcher;

impl Fetcher for FileFetcher {
    fn fetch(&self, location: &str) -> Result<Vec<u8>, NotenspiegelError> {
        debug!(location, "reading local file");
        std::fs::read(Path::new(location)).map_err(|e| NotenspiegelError::network(location, e))
    }
}
