//! Well-known network and callback-contract catalogs.
//!
//! These are immutable configuration data handed to the resolver at
//! construction. The built-in tables cover the well-known public networks;
//! callers extend or override them through the `with_*` builders, and the
//! tables are never mutated at runtime.

use std::collections::HashMap;

/// Well-known public networks, keyed by chain id.
const WELL_KNOWN_NETWORKS: [(&str, &str); 4] = [
    ("NetXdQprcVkpaWU", "mainnet"),
    ("NetXjD3HPJJjmcd", "carthagenet"),
    ("NetXm8tYqnMWky1", "delphinet"),
    ("NetXSp4gfdanies", "edonet"),
];

/// Default callback contracts for the `token_metadata` entrypoint, keyed by
/// chain id. Only test networks carry the legacy entrypoint flow.
const TOKEN_METADATA_CALLBACKS: [(&str, &str); 2] = [
    ("NetXjD3HPJJjmcd", "KT1VoTeZmAhp3PmDVDkq4sJKFnSwHAr7nBdC"),
    ("NetXm8tYqnMWky1", "KT1Mps3KsVkmdnUtbZ1nHRuUhasYXYCavVGi"),
];

/// Default callback contracts for the `token_metadata_registry` entrypoint.
const REGISTRY_CALLBACKS: [(&str, &str); 2] = [
    ("NetXjD3HPJJjmcd", "KT1Xv55KvDqmRnDBLCYMet2UoWBdPVs4Dbf1"),
    ("NetXm8tYqnMWky1", "KT1Hkg5qeNhfwpKW4fXvq7HGZB9z2EnmCCA9"),
];

/// Default public IPFS gateway used to resolve `ipfs://` references.
pub const DEFAULT_IPFS_GATEWAY: &str = "https://cloudflare-ipfs.com/ipfs";

/// Immutable catalog of chain-id keyed lookups: network names and default
/// callback contracts.
#[derive(Debug, Clone)]
pub struct NetworkCatalog {
    networks: HashMap<String, String>,
    token_metadata_callbacks: HashMap<String, String>,
    registry_callbacks: HashMap<String, String>,
}

impl NetworkCatalog {
    /// The built-in catalog of well-known public networks and their default
    /// callback contracts.
    pub fn well_known() -> Self {
        let to_map = |pairs: &[(&str, &str)]| {
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect()
        };
        Self {
            networks: to_map(&WELL_KNOWN_NETWORKS),
            token_metadata_callbacks: to_map(&TOKEN_METADATA_CALLBACKS),
            registry_callbacks: to_map(&REGISTRY_CALLBACKS),
        }
    }

    /// An empty catalog, for fully caller-controlled configurations.
    pub fn empty() -> Self {
        Self {
            networks: HashMap::new(),
            token_metadata_callbacks: HashMap::new(),
            registry_callbacks: HashMap::new(),
        }
    }

    /// The canonical network name for a chain id, if known.
    pub fn network_name(&self, chain_id: &str) -> Option<&str> {
        self.networks.get(chain_id).map(String::as_str)
    }

    /// The default `token_metadata` callback contract for a chain id.
    pub fn token_metadata_callback(&self, chain_id: &str) -> Option<&str> {
        self.token_metadata_callbacks
            .get(chain_id)
            .map(String::as_str)
    }

    /// The default `token_metadata_registry` callback contract for a chain id.
    pub fn registry_callback(&self, chain_id: &str) -> Option<&str> {
        self.registry_callbacks.get(chain_id).map(String::as_str)
    }

    /// Add or replace a chain-id to network-name entry.
    pub fn with_network(mut self, chain_id: &str, name: &str) -> Self {
        self.networks.insert(chain_id.to_string(), name.to_string());
        self
    }

    /// Add or replace a default `token_metadata` callback contract.
    pub fn with_token_metadata_callback(mut self, chain_id: &str, contract: &str) -> Self {
        self.token_metadata_callbacks
            .insert(chain_id.to_string(), contract.to_string());
        self
    }

    /// Add or replace a default `token_metadata_registry` callback contract.
    pub fn with_registry_callback(mut self, chain_id: &str, contract: &str) -> Self {
        self.registry_callbacks
            .insert(chain_id.to_string(), contract.to_string());
        self
    }
}

impl Default for NetworkCatalog {
    fn default() -> Self {
        Self::well_known()
    }
}
