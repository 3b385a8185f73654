//! Network identity checks for cross-contract references.
//!
//! Chain ids are authoritative: a chain-id-shaped tag is compared against
//! the live chain id obtained from the node. Network names are not
//! retrievable from the chain, so name-shaped tags are compared against the
//! caller's declared/expected network id instead.

use tzmeta_transport::NetworkCatalog;
use tzmeta_types::MetadataError;

use crate::uri::is_chain_id_shaped;

/// The network id resolution prefers a caller-declared id and falls back to
/// the well-known catalog entry for the live chain. Neither being available
/// is not an error by itself; checks against an undefined expectation
/// simply fail when a name is actually asserted.
pub fn resolve_expected_network(
    declared: Option<&str>,
    live_chain_id: &str,
    catalog: &NetworkCatalog,
) -> Option<String> {
    declared
        .map(str::to_string)
        .or_else(|| catalog.network_name(live_chain_id).map(str::to_string))
}

/// Validate an asserted network tag against the connected chain.
///
/// An absent tag passes. A chain-id-shaped tag must equal the live chain
/// id; a name-shaped tag must equal the expected network id.
pub fn check_network_tag(
    tag: Option<&str>,
    live_chain_id: &str,
    expected_network: Option<&str>,
) -> Result<(), MetadataError> {
    let Some(tag) = tag else {
        return Ok(());
    };
    if is_chain_id_shaped(tag) {
        if tag != live_chain_id {
            return Err(MetadataError::ChainIdMismatch {
                asserted: tag.to_string(),
                live: live_chain_id.to_string(),
            });
        }
        return Ok(());
    }
    if expected_network != Some(tag) {
        return Err(MetadataError::NetworkNameMismatch {
            asserted: tag.to_string(),
            expected: expected_network.map(str::to_string),
        });
    }
    Ok(())
}
