//! Token metadata resolution for Tezos contracts.
//!
//! `tzmeta` resolves TZIP-16 / TZIP-12 metadata from contract storage,
//! following stored pointers wherever they lead: same-store keys, other
//! contracts on the same network, IPFS documents and plain HTTPS URLs,
//! with legacy entrypoint/callback protocols as a fallback.
//!
//! The facade re-exports the workspace crates:
//! - [`tzmeta_types`]: addresses, hex/JSON decoding, the error taxonomy
//! - [`tzmeta_transport`]: chain client and HTTP fetch traits, in-memory
//!   implementations, well-known network catalogs
//! - [`tzmeta_resolver`]: the classifiers and the [`MetadataResolver`]
//!   orchestrator
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use serde_json::json;
//! use tzmeta::transport::memory::{hex_text, MemoryChain, MemoryContractBuilder, MemoryHttp};
//! use tzmeta::MetadataResolver;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mut chain = MemoryChain::new("NetXdQprcVkpaWU");
//! chain.deploy(
//!     MemoryContractBuilder::new("KT1XRT495WncnqNmqKn4tkuRiDJzEiR4N2C9")
//!         .big_map(
//!             "metadata",
//!             [
//!                 ("".to_string(), hex_text("tezos-storage:content")),
//!                 ("content".to_string(), hex_text(r#"{"name":"Example Token"}"#)),
//!             ],
//!         )
//!         .build(),
//! );
//!
//! let resolver = MetadataResolver::new(Arc::new(chain), Arc::new(MemoryHttp::new()));
//! let metadata = resolver
//!     .resolve("KT1XRT495WncnqNmqKn4tkuRiDJzEiR4N2C9", None)
//!     .await
//!     .unwrap();
//! assert_eq!(metadata, json!({"name": "Example Token"}));
//! # }
//! ```

pub use tzmeta_resolver as resolver;
pub use tzmeta_transport as transport;
pub use tzmeta_types as types;

pub use tzmeta_resolver::{classify, classify_shape, ContractShape, MetadataResolver, MetadataUri};
pub use tzmeta_transport::{ChainClient, HttpFetch, NetworkCatalog, UreqFetcher};
pub use tzmeta_types::MetadataError;
