//! Contract-shape dispatch.
//!
//! A contract's storage and entrypoints decide which retrieval strategy
//! applies. The decision is made freshly per call (storage may have
//! changed) by probing field/method presence in a fixed priority order;
//! contracts may expose more than one shape simultaneously, and the
//! directly readable, transaction-free big-map shapes take precedence over
//! the entrypoint shapes.

use tzmeta_transport::ContractHandle;

/// The retrieval strategy for a contract at a point in time. Exactly one
/// applies per classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractShape {
    /// A TZIP-16 style big-map keyed by arbitrary string under `metadata`.
    GenericStore,
    /// A TZIP-12 style big-map keyed by token id under `token_metadata`.
    TokenIndexedBigmap,
    /// A `token_metadata` entrypoint that must be paired with a callback
    /// contract.
    EntrypointWithCallback,
    /// A `token_metadata_registry` entrypoint that redirects to a storage
    /// contract.
    RegistryEntrypointWithCallback,
    /// No known shape; resolution reads raw storage.
    RawFallback,
}

/// Classify a contract against the shape priority ladder. First match wins.
pub fn classify_shape(contract: &dyn ContractHandle) -> ContractShape {
    let token_entrypoint = contract.has_entrypoint("token_metadata");
    let registry_entrypoint = contract.has_entrypoint("token_metadata_registry");
    let token_bigmap = contract.big_map("token_metadata").is_some();
    let generic_bigmap = contract.big_map("metadata").is_some();

    if (token_entrypoint || registry_entrypoint) && token_bigmap {
        ContractShape::TokenIndexedBigmap
    } else if generic_bigmap {
        ContractShape::GenericStore
    } else if token_bigmap {
        // Read-only path: the big-map is present without any callable
        // entrypoint.
        ContractShape::TokenIndexedBigmap
    } else if token_entrypoint {
        ContractShape::EntrypointWithCallback
    } else if registry_entrypoint {
        ContractShape::RegistryEntrypointWithCallback
    } else {
        ContractShape::RawFallback
    }
}
