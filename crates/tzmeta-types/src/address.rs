//! Syntactic validation of Tezos addresses.
//!
//! This module is the canonical source for address validation in the
//! workspace. Other crates should import from here rather than defining
//! their own checks.
//!
//! Tezos addresses are base58check strings with a fixed length of 36:
//! - Implicit accounts: `tz1...`, `tz2...`, `tz3...`
//! - Originated contracts: `KT1...`
//!
//! Validation here is purely syntactic (prefix class, length, base58
//! alphabet); whether an address actually resolves to a deployed contract
//! is decided by the chain client.

use crate::error::MetadataError;

/// Prefixes of implicit (curve-keyed) account addresses.
pub const ACCOUNT_PREFIXES: [&str; 3] = ["tz1", "tz2", "tz3"];

/// Prefix of originated contract addresses.
pub const CONTRACT_PREFIX: &str = "KT1";

/// Length of every base58check-encoded Tezos address.
pub const ADDRESS_LEN: usize = 36;

fn is_base58(s: &str) -> bool {
    // Bitcoin base58 alphabet: no 0, O, I or l.
    s.bytes().all(|b| {
        b.is_ascii_alphanumeric() && !matches!(b, b'0' | b'O' | b'I' | b'l')
    })
}

/// Check whether a string is a syntactically valid Tezos address
/// (implicit account or originated contract).
///
/// # Examples
///
/// ```
/// use tzmeta_types::address::is_valid_address;
///
/// assert!(is_valid_address("KT1XRT495WncnqNmqKn4tkuRiDJzEiR4N2C9"));
/// assert!(is_valid_address("tz1Ts3m2dXTXB66XN7cg5ALiAvzZY6AxrFd9"));
/// assert!(!is_valid_address("KT1short"));
/// ```
pub fn is_valid_address(address: &str) -> bool {
    if address.len() != ADDRESS_LEN {
        return false;
    }
    let known_prefix = address.starts_with(CONTRACT_PREFIX)
        || ACCOUNT_PREFIXES.iter().any(|p| address.starts_with(p));
    known_prefix && is_base58(address)
}

/// Check whether an address belongs to the originated-contract class
/// (the `KT` prefix). This is a prefix class check only; combine with
/// [`is_valid_address`] for full validation.
pub fn is_contract_address(address: &str) -> bool {
    address.starts_with("KT")
}

/// Validate that a string is a well-formed originated-contract address.
///
/// Used on addresses extracted from cross-contract references before any
/// chain access happens.
pub fn validate_contract_address(address: &str) -> Result<(), MetadataError> {
    if is_valid_address(address) && is_contract_address(address) {
        Ok(())
    } else {
        Err(MetadataError::InvalidContractAddress {
            address: address.to_string(),
        })
    }
}
