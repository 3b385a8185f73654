//! In-memory chain and HTTP implementations.
//!
//! Backs the integration tests and doubles as a local shim when no node is
//! available. Contracts are assembled with [`MemoryContractBuilder`] and
//! deployed into a [`MemoryChain`]; entrypoint invocations are recorded and
//! confirm instantly, with their observable effects pre-seeded into the
//! relevant contract's storage.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tzmeta_types::{FetchFailure, MetadataError};

use crate::chain::{BigMap, ChainClient, ChainResult, ContractHandle, PendingOperation};
use crate::http::{FetchResponse, HttpFetch};

/// Hex-encode UTF-8 text as a big-map value, the way TZIP-16 stores it.
pub fn hex_text(text: &str) -> Value {
    Value::String(hex::encode(text.as_bytes()))
}

/// An in-memory big-map: ordered string keys to JSON values.
#[derive(Debug, Clone, Default)]
pub struct MemoryBigMap {
    entries: BTreeMap<String, Value>,
}

impl MemoryBigMap {
    pub fn new(entries: impl IntoIterator<Item = (String, Value)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }
}

#[async_trait]
impl BigMap for MemoryBigMap {
    async fn get(&self, key: &str) -> ChainResult<Option<Value>> {
        Ok(self.entries.get(key).cloned())
    }

    async fn snapshot(&self) -> ChainResult<Value> {
        let map: Map<String, Value> = self
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Ok(Value::Object(map))
    }
}

/// A deployed in-memory contract.
pub struct MemoryContract {
    address: String,
    storage: Value,
    big_maps: HashMap<String, Arc<MemoryBigMap>>,
    entrypoints: HashSet<String>,
    invocations: Mutex<Vec<(String, Vec<Value>)>>,
}

impl MemoryContract {
    pub fn builder(address: &str) -> MemoryContractBuilder {
        MemoryContractBuilder::new(address)
    }

    /// Entrypoint invocations recorded so far, as `(entrypoint, args)` pairs.
    pub fn invocations(&self) -> Vec<(String, Vec<Value>)> {
        self.invocations.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

struct InstantOperation;

#[async_trait]
impl PendingOperation for InstantOperation {
    async fn confirm(&self, _count: u32) -> ChainResult<()> {
        Ok(())
    }
}

#[async_trait]
impl ContractHandle for MemoryContract {
    fn address(&self) -> &str {
        &self.address
    }

    async fn storage(&self) -> ChainResult<Value> {
        Ok(self.storage.clone())
    }

    fn big_map(&self, field: &str) -> Option<Arc<dyn BigMap>> {
        self.big_maps
            .get(field)
            .map(|m| m.clone() as Arc<dyn BigMap>)
    }

    fn has_entrypoint(&self, name: &str) -> bool {
        self.entrypoints.contains(name)
    }

    async fn invoke(
        &self,
        entrypoint: &str,
        args: &[Value],
    ) -> ChainResult<Box<dyn PendingOperation>> {
        if !self.has_entrypoint(entrypoint) {
            return Err(MetadataError::Rpc(format!(
                "contract {} has no entrypoint {}",
                self.address, entrypoint
            )));
        }
        if let Ok(mut log) = self.invocations.lock() {
            log.push((entrypoint.to_string(), args.to_vec()));
        }
        Ok(Box::new(InstantOperation))
    }
}

/// Builder for [`MemoryContract`] fixtures.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use tzmeta_transport::memory::{hex_text, MemoryContractBuilder};
///
/// let contract = MemoryContractBuilder::new("KT1XRT495WncnqNmqKn4tkuRiDJzEiR4N2C9")
///     .big_map("metadata", [("".to_string(), hex_text("tezos-storage:foo"))])
///     .build();
/// ```
pub struct MemoryContractBuilder {
    address: String,
    storage: Value,
    big_maps: HashMap<String, Arc<MemoryBigMap>>,
    entrypoints: HashSet<String>,
}

impl MemoryContractBuilder {
    pub fn new(address: &str) -> Self {
        Self {
            address: address.to_string(),
            storage: Value::Object(Map::new()),
            big_maps: HashMap::new(),
            entrypoints: HashSet::new(),
        }
    }

    /// Set the plain storage record.
    pub fn storage(mut self, storage: Value) -> Self {
        self.storage = storage;
        self
    }

    /// Attach a big-map under a storage field.
    pub fn big_map(
        mut self,
        field: &str,
        entries: impl IntoIterator<Item = (String, Value)>,
    ) -> Self {
        self.big_maps
            .insert(field.to_string(), Arc::new(MemoryBigMap::new(entries)));
        self
    }

    /// Declare a callable entrypoint.
    pub fn entrypoint(mut self, name: &str) -> Self {
        self.entrypoints.insert(name.to_string());
        self
    }

    pub fn build(self) -> MemoryContract {
        MemoryContract {
            address: self.address,
            storage: self.storage,
            big_maps: self.big_maps,
            entrypoints: self.entrypoints,
            invocations: Mutex::new(Vec::new()),
        }
    }
}

/// An in-memory chain: a chain id plus deployed contracts.
pub struct MemoryChain {
    chain_id: String,
    contracts: HashMap<String, Arc<MemoryContract>>,
}

impl MemoryChain {
    pub fn new(chain_id: &str) -> Self {
        Self {
            chain_id: chain_id.to_string(),
            contracts: HashMap::new(),
        }
    }

    /// Deploy a contract at its builder-assigned address.
    pub fn deploy(&mut self, contract: MemoryContract) -> Arc<MemoryContract> {
        let contract = Arc::new(contract);
        self.contracts
            .insert(contract.address.clone(), contract.clone());
        contract
    }
}

#[async_trait]
impl ChainClient for MemoryChain {
    async fn chain_id(&self) -> ChainResult<String> {
        Ok(self.chain_id.clone())
    }

    async fn contract(&self, address: &str) -> ChainResult<Option<Arc<dyn ContractHandle>>> {
        Ok(self
            .contracts
            .get(address)
            .map(|c| c.clone() as Arc<dyn ContractHandle>))
    }
}

/// An in-memory HTTP fetcher with fixed routes.
///
/// Unrouted URLs fail with a transport cause, as a dead host would.
#[derive(Default)]
pub struct MemoryHttp {
    routes: HashMap<String, (u16, Vec<u8>)>,
}

impl MemoryHttp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` with `status` at `url`.
    pub fn route(mut self, url: &str, status: u16, body: &[u8]) -> Self {
        self.routes.insert(url.to_string(), (status, body.to_vec()));
        self
    }
}

#[async_trait]
impl HttpFetch for MemoryHttp {
    async fn get(&self, url: &str) -> Result<FetchResponse, MetadataError> {
        match self.routes.get(url) {
            Some((status, body)) => Ok(FetchResponse {
                status: *status,
                body: body.clone(),
            }),
            None => Err(MetadataError::FetchUrl {
                url: url.to_string(),
                failure: FetchFailure::Transport("connection refused".to_string()),
            }),
        }
    }
}
