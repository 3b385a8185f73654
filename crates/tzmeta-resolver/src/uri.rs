//! Metadata-location URI classifier.
//!
//! Classification is pure string analysis: total (every input maps to
//! exactly one variant, with [`MetadataUri::Opaque`] as the catch-all) and
//! order-sensitive, because a URL can satisfy character classes that the
//! storage patterns also accept. The grammars below are the fixed external
//! standards and must be matched byte-for-byte.

use std::sync::LazyLock;

use regex::Regex;

/// Scheme-optional dotted-host URL, or an explicit localhost URL.
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^((?:http(s)?://)?[\w.-]+(?:\.[\w.-]+)+[\w\-._~:/?#\[\]@!$&'()*+,;=.]+)|(http(s)?://localhost:[0-9]+)$",
    )
    .expect("URL pattern is valid")
});

/// `ipfs://<content-id>`.
static IPFS_URI_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ipfs://([0-9A-z]+)$").expect("IPFS pattern is valid"));

/// `sha256://0x<64-hex-digest>/<percent-encoded-url>`.
static SHA256_URI_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^sha256://0x([0-9a-f]{64})/((?:http(s)?:(%2[fF]){2})?[\w.-]+(?:\.[\w.-]+)+[\w\-._~:%?#\[\]@!$&'()*+,;=.]+)$",
    )
    .expect("sha256 pattern is valid")
});

/// `tezos-storage:` followed by at least one character.
static STORAGE_KEY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^tezos-storage:.").expect("storage pattern is valid"));

/// `//<KT-address>[.<network-tag>]/<key>` inside a stripped storage URI.
static CROSS_CONTRACT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^//(KT[A-z0-9]+)(\.[A-z0-9]+)?/([^/]+)").expect("cross-contract pattern is valid")
});

/// Chain-id-shaped network tag: `Net` plus 12 alphanumerics.
static CHAIN_ID_TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Net[A-z0-9]{12}$").expect("chain id pattern is valid"));

/// Where a metadata-location string says the metadata lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataUri {
    /// An absolute or scheme-less HTTP(S) URL.
    ExternalUrl(String),
    /// An IPFS content identifier, resolved through a gateway.
    Ipfs(String),
    /// A URL paired with an expected SHA-256 digest. The URL is carried
    /// percent-encoded; it is decoded at fetch time, not here.
    ChecksummedUrl { sha256: String, url: String },
    /// A key to resolve in the current contract's metadata store.
    /// Percent-decoding is applied at lookup time, not at classification.
    SameStoreKey(String),
    /// A reference into another contract's metadata store, optionally
    /// asserting a target network.
    CrossContractRef {
        contract: String,
        network_tag: Option<String>,
        key: String,
    },
    /// None of the recognized schemes. Resolution yields the absence
    /// value, not an error.
    Opaque,
}

/// Classify a metadata-location string.
///
/// The External-URL test runs before the IPFS/checksum/storage tests
/// because a URL can itself satisfy the overlapping character classes.
///
/// # Examples
///
/// ```
/// use tzmeta_resolver::uri::{classify, MetadataUri};
///
/// assert_eq!(
///     classify("tezos-storage:foo"),
///     MetadataUri::SameStoreKey("foo".to_string())
/// );
/// assert_eq!(classify("just some text"), MetadataUri::Opaque);
/// ```
pub fn classify(raw: &str) -> MetadataUri {
    if URL_PATTERN.is_match(raw) {
        return MetadataUri::ExternalUrl(raw.to_string());
    }
    if let Some(captures) = IPFS_URI_PATTERN.captures(raw) {
        return MetadataUri::Ipfs(captures[1].to_string());
    }
    if let Some(captures) = SHA256_URI_PATTERN.captures(raw) {
        return MetadataUri::ChecksummedUrl {
            sha256: captures[1].to_string(),
            url: captures[2].to_string(),
        };
    }
    if !STORAGE_KEY_PATTERN.is_match(raw) {
        return MetadataUri::Opaque;
    }

    let stripped = raw.replacen("tezos-storage:", "", 1);
    if let Some(captures) = CROSS_CONTRACT_PATTERN.captures(&stripped) {
        return MetadataUri::CrossContractRef {
            contract: captures[1].to_string(),
            // Strip the leading dot separator.
            network_tag: captures.get(2).map(|tag| tag.as_str()[1..].to_string()),
            key: captures[3].to_string(),
        };
    }
    MetadataUri::SameStoreKey(stripped)
}

/// Whether a network tag is chain-id-shaped (as opposed to name-shaped).
/// Purely syntactic; never a lookup.
pub fn is_chain_id_shaped(tag: &str) -> bool {
    CHAIN_ID_TAG_PATTERN.is_match(tag)
}
