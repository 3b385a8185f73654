//! Failure taxonomy for metadata resolution.
//!
//! Every failure is raised at the point of detection and propagates unchanged
//! through recursive cross-contract resolution; the caller of the top-level
//! resolve sees the innermost failure. No variant is ever downgraded to the
//! absence value except where resolution explicitly defines absence as a
//! valid outcome (opaque pointers, missing big-map entries, missing registry
//! redirects).

use std::fmt;

use thiserror::Error;

/// Why an HTTP fetch for external metadata failed.
///
/// A fetch either reached the server and got a non-success answer, or died
/// in transit before any HTTP response existed. Both are carried under the
/// single [`MetadataError::FetchUrl`] kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    /// The server answered with a non-success status code.
    Status(u16),
    /// The request failed before an HTTP response was received.
    Transport(String),
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchFailure::Status(code) => write!(f, "HTTP status {}", code),
            FetchFailure::Transport(cause) => write!(f, "{}", cause),
        }
    }
}

/// Errors produced while resolving contract metadata.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MetadataError {
    /// The address does not resolve to a deployed contract on the connected chain.
    #[error("contract {address} was not found on the connected chain")]
    ContractNotFound { address: String },

    /// A cross-contract reference names an address that fails contract-address
    /// validation.
    #[error("invalid contract address {address}")]
    InvalidContractAddress { address: String },

    /// A chain-id-shaped network tag disagrees with the chain id of the
    /// connected node.
    #[error("chain id {asserted} was specified, which is not the chain id of the connected node ({live})")]
    ChainIdMismatch { asserted: String, live: String },

    /// A name-shaped network tag disagrees with the declared/expected network.
    #[error("{asserted} network was specified, which is not the network the client works with")]
    NetworkNameMismatch {
        asserted: String,
        expected: Option<String>,
    },

    /// An entrypoint-based path has no usable callback-contract configuration
    /// for the live chain. `field` names the missing configuration knob.
    #[error("no {field} is configured for chain {chain_id}")]
    NotEnoughCredentials {
        chain_id: String,
        field: &'static str,
    },

    /// An HTTP fetch for external/IPFS/checksummed metadata failed or
    /// returned a non-success response.
    #[error("error received while fetching {url}: {failure}")]
    FetchUrl { url: String, failure: FetchFailure },

    /// A fetched body does not hash to the digest carried by its
    /// `sha256://` URI. Only raised when checksum verification is enabled.
    #[error("sha256 mismatch for {url}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        url: String,
        expected: String,
        actual: String,
    },

    /// Hex or JSON decoding of a stored or fetched value failed.
    #[error("decoding error: {0}")]
    Decoding(String),

    /// The cross-contract reference chain exceeded the configured depth limit.
    #[error("metadata reference depth limit of {limit} exceeded")]
    DepthExceeded { limit: usize },

    /// A node/transport fault reported by an injected collaborator.
    #[error("rpc error: {0}")]
    Rpc(String),
}
