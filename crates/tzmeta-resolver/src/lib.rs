//! Contract metadata resolution for TZIP-16 / TZIP-12 token contracts.
//!
//! Resolution proceeds in three stages:
//! 1. [`shape`] classifies the contract by its storage fields and
//!    entrypoints
//! 2. [`uri`] classifies decoded metadata pointers into the reference
//!    scheme they use
//! 3. [`resolve`] orchestrates lookups, remote fetches, callback
//!    invocations and cross-contract recursion, with the network
//!    identity checks in [`identity`] guarding every recursive edge
//!
//! The entry point is [`MetadataResolver`].

pub mod identity;
pub mod resolve;
pub mod shape;
pub mod uri;

// Re-export main types for convenience
pub use identity::{check_network_tag, resolve_expected_network};
pub use resolve::MetadataResolver;
pub use shape::{classify_shape, ContractShape};
pub use uri::{classify, is_chain_id_shaped, MetadataUri};
