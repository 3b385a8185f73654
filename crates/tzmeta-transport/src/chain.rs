//! Chain collaborator traits.
//!
//! These model the boundary the resolution engine consumes: a node client
//! that answers chain-identity queries and loads contracts, contract handles
//! that expose storage, big-map fields and entrypoints, and pending
//! operations that can be awaited for confirmations.
//!
//! Storage records and big-map entries surface as [`serde_json::Value`]:
//! hex-string leaves for TZIP-16 style values, structured objects/arrays
//! for token metadata records. How those values are obtained from Michelson
//! storage is the implementation's concern.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tzmeta_types::MetadataError;

/// Result alias for collaborator calls. Transport/node faults map into
/// [`MetadataError::Rpc`]; everything else uses the taxonomy directly.
pub type ChainResult<T> = Result<T, MetadataError>;

/// A connected Tezos node.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// The live chain id of the connected network (e.g. `NetXdQprcVkpaWU`).
    async fn chain_id(&self) -> ChainResult<String>;

    /// Load a deployed contract. `None` when the address does not resolve
    /// to a contract on this chain.
    async fn contract(&self, address: &str) -> ChainResult<Option<Arc<dyn ContractHandle>>>;
}

/// A deployed contract: storage, big-map fields, entrypoints.
#[async_trait]
pub trait ContractHandle: Send + Sync {
    /// The address this handle was loaded for.
    fn address(&self) -> &str;

    /// The contract's plain storage record.
    async fn storage(&self) -> ChainResult<Value>;

    /// A handle to the big-map stored under `field`, when that storage
    /// field holds one.
    fn big_map(&self, field: &str) -> Option<Arc<dyn BigMap>>;

    /// Whether the contract exposes a callable entrypoint named `name`.
    fn has_entrypoint(&self, name: &str) -> bool;

    /// Invoke an entrypoint. Submits a transaction; the returned operation
    /// must be confirmed before its effects are visible.
    async fn invoke(&self, entrypoint: &str, args: &[Value])
        -> ChainResult<Box<dyn PendingOperation>>;
}

/// A big-map-shaped storage field.
#[async_trait]
pub trait BigMap: Send + Sync {
    /// The raw entry at `key`; `None` when the key is absent.
    async fn get(&self, key: &str) -> ChainResult<Option<Value>>;

    /// The whole mapping as a JSON object. Used for TZIP-16 "direct" mode,
    /// where the map itself is the metadata.
    async fn snapshot(&self) -> ChainResult<Value>;
}

/// An injected operation awaiting inclusion.
#[async_trait]
pub trait PendingOperation: Send + Sync {
    /// Suspend until the operation has `count` confirmations.
    async fn confirm(&self, count: u32) -> ChainResult<()>;
}
