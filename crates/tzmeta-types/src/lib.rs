//! Shared leaf types for the tzmeta workspace.
//!
//! This crate provides:
//! - [`address`]: syntactic validation of Tezos addresses (tz accounts, KT contracts)
//! - [`encoding`]: hex/UTF-8/JSON decoding and percent-decoding of store keys
//! - [`error`]: the typed failure taxonomy surfaced by metadata resolution

pub mod address;
pub mod encoding;
pub mod error;

pub use address::{is_contract_address, is_valid_address, validate_contract_address};
pub use encoding::{hex_to_json, hex_to_utf8, parse_json, percent_decode};
pub use error::{FetchFailure, MetadataError};
