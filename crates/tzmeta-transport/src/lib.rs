//! Collaborator interfaces consumed by the metadata resolution engine.
//!
//! The engine owns orchestration only; chain access and raw network
//! transport are injected behind the traits defined here.
//!
//! This crate provides:
//! - [`chain`]: the chain client, contract handle, big-map and pending
//!   operation traits
//! - [`http`]: the HTTP fetch trait and a `ureq`-backed implementation
//! - [`network`]: immutable catalogs of well-known networks and callback
//!   contracts
//! - [`memory`]: an in-memory chain implementation for tests and local use

pub mod chain;
pub mod http;
pub mod memory;
pub mod network;

// Re-export main types for convenience
pub use chain::{BigMap, ChainClient, ContractHandle, PendingOperation};
pub use http::{FetchResponse, HttpFetch, UreqFetcher};
pub use memory::{MemoryChain, MemoryContract, MemoryContractBuilder, MemoryHttp};
pub use network::{NetworkCatalog, DEFAULT_IPFS_GATEWAY};
