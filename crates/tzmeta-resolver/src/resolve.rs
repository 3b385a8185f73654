//! Resolution orchestrator.
//!
//! Ties the classifier, identity checks and shape dispatch together: given
//! a contract address and an optional key, produces the final metadata
//! value, recursing through cross-contract references and remote fetches
//! as needed and enforcing network-identity checks along recursive edges.
//!
//! Each `resolve` call is independent: no internal caching, no retries, no
//! engine-owned timeouts. Recursion carries a depth counter so that a pair
//! of contracts pointing at each other fails with a depth error instead of
//! exhausting the stack.

use std::sync::Arc;

use futures::future::BoxFuture;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use tracing::debug;

use tzmeta_transport::{
    BigMap, ChainClient, ContractHandle, HttpFetch, NetworkCatalog, DEFAULT_IPFS_GATEWAY,
};
use tzmeta_types::{
    hex_to_json, hex_to_utf8, percent_decode, validate_contract_address, FetchFailure,
    MetadataError,
};

use crate::identity::{check_network_tag, resolve_expected_network};
use crate::shape::{classify_shape, ContractShape};
use crate::uri::{classify, MetadataUri};

/// Default bound on cross-contract/registry recursion hops.
const DEFAULT_MAX_DEPTH: usize = 16;

/// A metadata store being read: either a live big-map or an inline value
/// (a token metadata entry nesting TZIP-16 style indirection).
enum StoreRef {
    BigMap(Arc<dyn BigMap>),
    Inline(Value),
}

impl StoreRef {
    async fn entry(&self, key: &str) -> Result<Option<Value>, MetadataError> {
        match self {
            StoreRef::BigMap(map) => map.get(key).await,
            StoreRef::Inline(value) => Ok(value.get(key).cloned()),
        }
    }

    async fn snapshot(&self) -> Result<Value, MetadataError> {
        match self {
            StoreRef::BigMap(map) => map.snapshot().await,
            StoreRef::Inline(value) => Ok(value.clone()),
        }
    }
}

/// Whether a value carries a TZIP-16 pointer: its reserved empty-string
/// entry is text-shaped.
fn is_pointer_shaped(value: &Value) -> bool {
    value.get("").is_some_and(Value::is_string)
}

/// Decode a hex-string store value into its JSON document.
fn hex_value_to_json(raw: &Value) -> Result<Value, MetadataError> {
    let hex_str = raw.as_str().ok_or_else(|| {
        MetadataError::Decoding("stored metadata value is not a hex string".to_string())
    })?;
    hex_to_json(hex_str)
}

/// Stringify a token-id field for comparison against a requested key.
fn field_key_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Token metadata resolver.
///
/// Construction takes the chain client and HTTP fetcher; everything else is
/// immutable configuration with well-known defaults, adjusted through the
/// `with_*` builders.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use tzmeta_resolver::MetadataResolver;
/// use tzmeta_transport::UreqFetcher;
///
/// let resolver = MetadataResolver::new(chain, Arc::new(UreqFetcher::new()))
///     .with_declared_network("mainnet");
/// let metadata = resolver.resolve("KT1...", None).await?;
/// ```
pub struct MetadataResolver {
    chain: Arc<dyn ChainClient>,
    http: Arc<dyn HttpFetch>,
    catalog: NetworkCatalog,
    ipfs_gateway: String,
    declared_network: Option<String>,
    token_metadata_callback: Option<String>,
    registry_callback: Option<String>,
    max_depth: usize,
    verify_checksums: bool,
}

impl MetadataResolver {
    pub fn new(chain: Arc<dyn ChainClient>, http: Arc<dyn HttpFetch>) -> Self {
        Self {
            chain,
            http,
            catalog: NetworkCatalog::well_known(),
            ipfs_gateway: DEFAULT_IPFS_GATEWAY.to_string(),
            declared_network: None,
            token_metadata_callback: None,
            registry_callback: None,
            max_depth: DEFAULT_MAX_DEPTH,
            verify_checksums: false,
        }
    }

    /// Replace the well-known network/callback catalog.
    pub fn with_network_catalog(mut self, catalog: NetworkCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Override the IPFS gateway used for `ipfs://` references.
    pub fn with_ipfs_gateway(mut self, gateway: &str) -> Self {
        self.ipfs_gateway = gateway.trim_end_matches('/').to_string();
        self
    }

    /// Declare the network id/name the caller believes it is connected to.
    /// Takes precedence over the catalog lookup of the live chain id.
    pub fn with_declared_network(mut self, network: &str) -> Self {
        self.declared_network = Some(network.to_string());
        self
    }

    /// Supply a `token_metadata` callback contract for chains with no
    /// built-in default.
    pub fn with_token_metadata_callback(mut self, contract: &str) -> Self {
        self.token_metadata_callback = Some(contract.to_string());
        self
    }

    /// Supply a `token_metadata_registry` callback contract for chains with
    /// no built-in default.
    pub fn with_registry_callback(mut self, contract: &str) -> Self {
        self.registry_callback = Some(contract.to_string());
        self
    }

    /// Bound the number of cross-contract/registry hops.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Verify `sha256://` digests against fetched bodies. Off by default:
    /// the digest is carried but not checked, matching the standard's
    /// observed usage.
    pub fn with_verify_checksums(mut self, verify: bool) -> Self {
        self.verify_checksums = verify;
        self
    }

    /// Resolve metadata for a contract, optionally under a specific key.
    ///
    /// Returns the resolved JSON value; `Value::Null` is the absence value
    /// (opaque pointer, missing token entry, missing registry redirect).
    pub async fn resolve(&self, address: &str, key: Option<&str>) -> Result<Value, MetadataError> {
        self.resolve_at(
            address.to_string(),
            key.map(str::to_string),
            self.declared_network.clone(),
            0,
        )
        .await
    }

    /// One step of resolution. `expected_network` narrows at each
    /// cross-contract hop and is never widened; `depth` counts hops.
    fn resolve_at(
        &self,
        address: String,
        key: Option<String>,
        expected_network: Option<String>,
        depth: usize,
    ) -> BoxFuture<'_, Result<Value, MetadataError>> {
        Box::pin(async move {
            if depth > self.max_depth {
                return Err(MetadataError::DepthExceeded {
                    limit: self.max_depth,
                });
            }
            let contract = self.chain.contract(&address).await?.ok_or_else(|| {
                MetadataError::ContractNotFound {
                    address: address.clone(),
                }
            })?;
            let shape = classify_shape(contract.as_ref());
            debug!(address = %address, ?shape, key = ?key, depth, "classified contract shape");

            match shape {
                ContractShape::GenericStore => {
                    let store = contract.big_map("metadata").ok_or_else(storage_changed)?;
                    self.resolve_generic(
                        StoreRef::BigMap(store),
                        key.as_deref(),
                        &expected_network,
                        depth,
                    )
                    .await
                }
                ContractShape::TokenIndexedBigmap => {
                    let map = contract
                        .big_map("token_metadata")
                        .ok_or_else(storage_changed)?;
                    let token_id = key.as_deref().unwrap_or("0");
                    let Some(entry) = map.get(token_id).await? else {
                        return Ok(Value::Null);
                    };
                    if is_pointer_shaped(&entry) {
                        return self
                            .resolve_generic(StoreRef::Inline(entry), None, &expected_network, depth)
                            .await;
                    }
                    if let Some(nested) = entry.get("token_metadata_map") {
                        if is_pointer_shaped(nested) {
                            let nested = nested.clone();
                            return self
                                .resolve_generic(
                                    StoreRef::Inline(nested),
                                    None,
                                    &expected_network,
                                    depth,
                                )
                                .await;
                        }
                    }
                    Ok(entry)
                }
                ContractShape::EntrypointWithCallback => {
                    self.resolve_via_entrypoint(contract.as_ref(), key.as_deref())
                        .await
                }
                ContractShape::RegistryEntrypointWithCallback => {
                    self.resolve_via_registry(
                        contract.as_ref(),
                        key.as_deref(),
                        expected_network,
                        depth,
                    )
                    .await
                }
                ContractShape::RawFallback => self.raw_storage(contract.as_ref(), key.as_deref()).await,
            }
        })
    }

    /// Resolve against a generic (TZIP-16 style) key-value store.
    async fn resolve_generic(
        &self,
        store: StoreRef,
        key: Option<&str>,
        expected_network: &Option<String>,
        depth: usize,
    ) -> Result<Value, MetadataError> {
        if let Some(key) = key {
            let decoded = percent_decode(key);
            // An absent entry under an explicit key is not distinguished
            // from a malformed one; both surface as decoding failures.
            let raw = store.entry(&decoded).await?.ok_or_else(|| {
                MetadataError::Decoding(format!("no metadata value at key '{}'", decoded))
            })?;
            return hex_value_to_json(&raw);
        }

        let pointer_hex = match store.entry("").await? {
            Some(Value::String(hex_str)) => hex_str,
            // No text-shaped pointer entry: the map itself is the metadata.
            _ => return store.snapshot().await,
        };
        let pointer = hex_to_utf8(&pointer_hex)?;
        debug!(pointer = %pointer, "decoded metadata pointer");

        match classify(&pointer) {
            MetadataUri::ExternalUrl(url) => self.fetch_json(&url, None).await,
            MetadataUri::Ipfs(id) => {
                let url = format!("{}/{}", self.ipfs_gateway, id);
                self.fetch_json(&url, None).await
            }
            MetadataUri::ChecksummedUrl { sha256, url } => {
                self.fetch_json(&percent_decode(&url), Some(&sha256)).await
            }
            MetadataUri::SameStoreKey(key) => {
                match store.entry(&percent_decode(&key)).await? {
                    Some(raw) => hex_value_to_json(&raw),
                    None => Ok(Value::Null),
                }
            }
            MetadataUri::CrossContractRef {
                contract,
                network_tag,
                key,
            } => {
                validate_contract_address(&contract)?;
                // Identity checks run before any storage access on the
                // referenced contract.
                let live = self.chain.chain_id().await?;
                let expected =
                    resolve_expected_network(expected_network.as_deref(), &live, &self.catalog);
                check_network_tag(network_tag.as_deref(), &live, expected.as_deref())?;
                debug!(target = %contract, key = %key, "following cross-contract reference");
                self.resolve_at(contract, Some(key), expected, depth + 1).await
            }
            MetadataUri::Opaque => Ok(Value::Null),
        }
    }

    /// GET a metadata document and parse it as JSON.
    async fn fetch_json(
        &self,
        url: &str,
        checksum: Option<&str>,
    ) -> Result<Value, MetadataError> {
        let response = self.http.get(url).await?;
        if !response.ok() {
            return Err(MetadataError::FetchUrl {
                url: url.to_string(),
                failure: FetchFailure::Status(response.status),
            });
        }
        if self.verify_checksums {
            if let Some(expected) = checksum {
                let actual = hex::encode(Sha256::digest(&response.body));
                if actual != expected {
                    return Err(MetadataError::ChecksumMismatch {
                        url: url.to_string(),
                        expected: expected.to_string(),
                        actual,
                    });
                }
            }
        }
        response.json()
    }

    /// TZIP-12 legacy path: invoke `token_metadata` against a callback
    /// contract, wait one confirmation, read the record sequence back.
    async fn resolve_via_entrypoint(
        &self,
        contract: &dyn ContractHandle,
        key: Option<&str>,
    ) -> Result<Value, MetadataError> {
        let live = self.chain.chain_id().await?;
        let callback = self
            .catalog
            .token_metadata_callback(&live)
            .map(str::to_string)
            .or_else(|| self.token_metadata_callback.clone())
            .ok_or_else(|| MetadataError::NotEnoughCredentials {
                chain_id: live.clone(),
                field: "token_metadata_callback",
            })?;
        let token_id = key.unwrap_or("0");
        debug!(
            address = contract.address(),
            callback = %callback,
            token_id,
            "invoking token_metadata entrypoint"
        );

        let op = contract
            .invoke("token_metadata", &[json!(callback), json!([token_id])])
            .await?;
        op.confirm(1).await?;

        let callback_contract = self.chain.contract(&callback).await?.ok_or_else(|| {
            MetadataError::ContractNotFound {
                address: callback.clone(),
            }
        })?;
        let records = callback_contract.storage().await?;
        let records = records.as_array().ok_or_else(|| {
            MetadataError::Decoding("callback storage is not a record sequence".to_string())
        })?;

        for record in records {
            let Some(fields) = record.as_array() else {
                continue;
            };
            let matches_key = fields
                .first()
                .is_some_and(|id| field_key_string(id) == token_id);
            if matches_key {
                return Ok(json!({
                    "symbol": fields.get(1).cloned().unwrap_or(Value::Null),
                    "name": fields.get(2).cloned().unwrap_or(Value::Null),
                    "decimals": fields.get(3).cloned().unwrap_or(Value::Null),
                    "extras": fields.get(4).cloned().unwrap_or_else(|| json!({})),
                }));
            }
        }
        Ok(Value::Null)
    }

    /// TZIP-12 registry path: locate the storage contract that holds this
    /// contract's metadata and resolve there; without a redirection, fall
    /// through to raw storage.
    async fn resolve_via_registry(
        &self,
        contract: &dyn ContractHandle,
        key: Option<&str>,
        expected_network: Option<String>,
        depth: usize,
    ) -> Result<Value, MetadataError> {
        let live = self.chain.chain_id().await?;
        let callback = self
            .catalog
            .registry_callback(&live)
            .map(str::to_string)
            .or_else(|| self.registry_callback.clone())
            .ok_or_else(|| MetadataError::NotEnoughCredentials {
                chain_id: live.clone(),
                field: "registry_callback",
            })?;
        debug!(
            address = contract.address(),
            callback = %callback,
            "invoking token_metadata_registry entrypoint"
        );

        let op = contract
            .invoke("token_metadata_registry", &[json!(callback)])
            .await?;
        op.confirm(1).await?;

        let callback_contract = self.chain.contract(&callback).await?.ok_or_else(|| {
            MetadataError::ContractNotFound {
                address: callback.clone(),
            }
        })?;
        let mapping = callback_contract.storage().await?;

        if let Some(entries) = mapping.as_object() {
            for (storage_contract, token_contract) in entries {
                if token_contract.as_str() == Some(contract.address()) {
                    debug!(target = %storage_contract, "following registry redirection");
                    return self
                        .resolve_at(storage_contract.clone(), None, expected_network, depth + 1)
                        .await;
                }
            }
        }
        self.raw_storage(contract, key).await
    }

    /// No known shape: read the storage record directly.
    async fn raw_storage(
        &self,
        contract: &dyn ContractHandle,
        key: Option<&str>,
    ) -> Result<Value, MetadataError> {
        let storage = contract.storage().await?;
        match key {
            Some(k) => Ok(storage.get(k).cloned().unwrap_or(Value::Null)),
            None => Ok(storage),
        }
    }
}

fn storage_changed() -> MetadataError {
    MetadataError::Rpc("contract storage changed during resolution".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tzmeta_transport::memory::{hex_text, MemoryChain, MemoryContractBuilder, MemoryHttp};

    const MAINNET: &str = "NetXdQprcVkpaWU";
    const STORE: &str = "KT1XRT495WncnqNmqKn4tkuRiDJzEiR4N2C9";

    fn resolver(chain: MemoryChain) -> MetadataResolver {
        MetadataResolver::new(Arc::new(chain), Arc::new(MemoryHttp::new()))
    }

    #[tokio::test]
    async fn test_direct_store_value() {
        let mut chain = MemoryChain::new(MAINNET);
        chain.deploy(
            MemoryContractBuilder::new(STORE)
                .big_map(
                    "metadata",
                    [
                        ("".to_string(), hex_text("tezos-storage:foo")),
                        ("foo".to_string(), hex_text("{\"name\":\"X\"}")),
                    ],
                )
                .build(),
        );
        let value = resolver(chain).resolve(STORE, None).await.unwrap();
        assert_eq!(value, json!({"name": "X"}));
    }

    #[tokio::test]
    async fn test_contract_not_found() {
        let chain = MemoryChain::new(MAINNET);
        let err = resolver(chain).resolve(STORE, None).await.unwrap_err();
        assert!(matches!(
            err,
            MetadataError::ContractNotFound { ref address } if address == STORE
        ));
    }

    #[tokio::test]
    async fn test_raw_fallback() {
        let mut chain = MemoryChain::new(MAINNET);
        chain.deploy(
            MemoryContractBuilder::new(STORE)
                .storage(json!({"name": "OroPocket Silver", "paused": false}))
                .build(),
        );
        let resolver = resolver(chain);

        let whole = resolver.resolve(STORE, None).await.unwrap();
        assert_eq!(whole, json!({"name": "OroPocket Silver", "paused": false}));

        let field = resolver.resolve(STORE, Some("name")).await.unwrap();
        assert_eq!(field, json!("OroPocket Silver"));

        let missing = resolver.resolve(STORE, Some("absent")).await.unwrap();
        assert_eq!(missing, Value::Null);
    }

    #[tokio::test]
    async fn test_registry_cycle_hits_depth_limit() {
        const CARTHAGENET: &str = "NetXjD3HPJJjmcd";
        const REGISTRY_CALLBACK: &str = "KT1Xv55KvDqmRnDBLCYMet2UoWBdPVs4Dbf1";
        const OTHER: &str = "KT1TftZK1NTjZ22Z8jRc2S2HTJ1hPEuJ8LfC";

        let mut chain = MemoryChain::new(CARTHAGENET);
        for address in [STORE, OTHER] {
            chain.deploy(
                MemoryContractBuilder::new(address)
                    .entrypoint("token_metadata_registry")
                    .storage(json!({}))
                    .build(),
            );
        }
        // Each contract's metadata lives on the other, forever.
        chain.deploy(
            MemoryContractBuilder::new(REGISTRY_CALLBACK)
                .storage(json!({ OTHER: STORE, STORE: OTHER }))
                .build(),
        );

        let err = resolver(chain).resolve(STORE, None).await.unwrap_err();
        assert!(matches!(err, MetadataError::DepthExceeded { .. }));
    }
}
