use crate::error::{LedgerError, Result};
use std::time::Duration;

/// The seam between transport and parsing. Implementations fetch the raw
/// CSV text for a source URL; tests and demos substitute in-memory sources.
pub trait RecordSource: Send + Sync {
    fn fetch(&self, url: &str) -> Result<String>;
}

/// Blocking HTTP transport with a fixed request timeout. A request that
/// exceeds the timeout fails cleanly; retry happens only on the next
/// explicit load trigger.
pub struct HttpSource {
    client: reqwest::blocking::Client,
}

impl HttpSource {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LedgerError::InvalidConfig(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }
}

impl RecordSource for HttpSource {
    fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| LedgerError::fetch(url, e))?
            .error_for_status()
            .map_err(|e| LedgerError::fetch(url, e))?;

        response.text().map_err(|e| LedgerError::fetch(url, e))
    }
}
