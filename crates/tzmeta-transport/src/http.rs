//! HTTP fetch collaborator.
//!
//! External, IPFS-gatewayed and checksummed metadata locations are fetched
//! over plain HTTP GET. The engine applies no timeout or retry of its own;
//! both belong to the fetcher implementation.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;
use tzmeta_types::{FetchFailure, MetadataError};

/// A completed HTTP response: status plus raw body bytes.
///
/// The body is kept as bytes so that checksum verification can hash exactly
/// what came over the wire before any JSON parsing happens.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl FetchResponse {
    /// Whether the status code is a success (2xx).
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse the body as JSON.
    pub fn json(&self) -> Result<Value, MetadataError> {
        serde_json::from_slice(&self.body)
            .map_err(|e| MetadataError::Decoding(format!("fetched body is not JSON: {}", e)))
    }
}

/// HTTP GET collaborator.
///
/// Implementations return `Ok` for any response that carries an HTTP status
/// (success or not) and fail with [`MetadataError::FetchUrl`] carrying a
/// transport cause when no response was received at all.
#[async_trait]
pub trait HttpFetch: Send + Sync {
    async fn get(&self, url: &str) -> Result<FetchResponse, MetadataError>;
}

/// `ureq`-backed fetcher.
///
/// `ureq` is blocking, so requests run on the blocking thread pool; the
/// calling resolution step suspends without blocking unrelated work.
#[derive(Clone)]
pub struct UreqFetcher {
    agent: ureq::Agent,
}

impl UreqFetcher {
    pub fn new() -> Self {
        Self {
            agent: ureq::Agent::new(),
        }
    }
}

impl Default for UreqFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpFetch for UreqFetcher {
    async fn get(&self, url: &str) -> Result<FetchResponse, MetadataError> {
        let agent = self.agent.clone();
        let url = url.to_string();
        debug!(url = %url, "fetching metadata document");
        tokio::task::spawn_blocking(move || {
            let read_body = |response: ureq::Response| -> Result<FetchResponse, MetadataError> {
                use std::io::Read;
                let status = response.status();
                let mut body = Vec::new();
                response
                    .into_reader()
                    .read_to_end(&mut body)
                    .map_err(|e| MetadataError::FetchUrl {
                        url: url.clone(),
                        failure: FetchFailure::Transport(e.to_string()),
                    })?;
                Ok(FetchResponse { status, body })
            };
            match agent.get(&url).call() {
                Ok(response) => read_body(response),
                // Non-2xx still carries a response; surface it with its status.
                Err(ureq::Error::Status(_, response)) => read_body(response),
                Err(e) => Err(MetadataError::FetchUrl {
                    url: url.clone(),
                    failure: FetchFailure::Transport(e.to_string()),
                }),
            }
        })
        .await
        .map_err(|e| MetadataError::Rpc(format!("fetch task failed: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_fetcher_constructs() {
        let fetcher = UreqFetcher::default();
        let _clone = fetcher.clone();
    }

    #[test]
    fn test_response_ok_range() {
        let ok = FetchResponse { status: 200, body: vec![] };
        let redirect = FetchResponse { status: 304, body: vec![] };
        let missing = FetchResponse { status: 404, body: vec![] };
        assert!(ok.ok());
        assert!(!redirect.ok());
        assert!(!missing.ok());
    }

    #[test]
    fn test_response_json() {
        let response = FetchResponse {
            status: 200,
            body: b"{\"name\":\"X\"}".to_vec(),
        };
        assert_eq!(response.json().unwrap(), json!({"name": "X"}));

        let bad = FetchResponse {
            status: 200,
            body: b"<html></html>".to_vec(),
        };
        assert!(matches!(bad.json(), Err(MetadataError::Decoding(_))));
    }
}
