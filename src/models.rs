// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Brightside

//! # Core Data Models
//!
//! Shared data structures for the wallet-link flow. The JSON field names on
//! [`LighterCredentials`] are camelCase because the encrypted blob is decoded
//! by the companion mobile app, which expects that exact shape.

use serde::{Deserialize, Serialize};

use crate::config;

// =============================================================================
// Wallet Address Type
// =============================================================================

/// Ethereum-compatible L1 wallet address wrapper.
///
/// The L1 address is the root identity of the flow: it selects the venue
/// account and signs the change-pub-key authorization message.
/// Format: `0x` followed by 40 hexadecimal characters (20 bytes).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WalletAddress(pub String);

impl std::fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for WalletAddress {
    fn from(value: String) -> Self {
        WalletAddress(value)
    }
}

impl From<&str> for WalletAddress {
    fn from(value: &str) -> Self {
        WalletAddress(value.to_string())
    }
}

impl From<WalletAddress> for String {
    fn from(value: WalletAddress) -> Self {
        value.0
    }
}

// =============================================================================
// API Key Pair
// =============================================================================

/// Freshly generated Lighter API key pair.
///
/// Generated once per provisioning attempt, held in volatile memory only,
/// and never written to durable storage by this crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKeyPair {
    /// Public key, registered with the venue as the new API key.
    pub public_key: String,
    /// Private key, handed to the companion app as the API secret.
    pub private_key: String,
}

// =============================================================================
// Lighter Credentials
// =============================================================================

/// Final artifact of a successful provisioning run.
///
/// Exists only transiently in memory and in its encrypted-string form.
/// Index fields are strings because the companion app treats them as opaque
/// identifiers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LighterCredentials {
    /// API key (the generated public key).
    pub api_key: String,
    /// API secret (the generated private key).
    pub api_secret: String,
    /// Venue account index the key is registered against.
    pub account_index: String,
    /// API key slot the key occupies.
    pub api_key_index: String,
    /// L1 wallet address that authorized the key change.
    pub l1_address: String,
}

impl LighterCredentials {
    /// Assemble credentials from a provisioning run's outputs.
    pub fn new(key_pair: &ApiKeyPair, account_index: i64, l1_address: &WalletAddress) -> Self {
        Self {
            api_key: key_pair.public_key.clone(),
            api_secret: key_pair.private_key.clone(),
            account_index: account_index.to_string(),
            api_key_index: config::API_KEY_INDEX.to_string(),
            l1_address: l1_address.0.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wallet_address_display_and_conversions() {
        let addr = WalletAddress::from("0x742d35Cc6634C0532925a3b844Bc9e7595f4aB12");
        assert_eq!(
            addr.to_string(),
            "0x742d35Cc6634C0532925a3b844Bc9e7595f4aB12"
        );
        let raw: String = addr.into();
        assert!(raw.starts_with("0x"));
    }

    #[test]
    fn credentials_use_fixed_api_key_index() {
        let pair = ApiKeyPair {
            public_key: "pub".to_string(),
            private_key: "priv".to_string(),
        };
        let creds = LighterCredentials::new(&pair, 7, &WalletAddress::from("0xabc"));
        assert_eq!(creds.account_index, "7");
        assert_eq!(creds.api_key_index, "2");
        assert_eq!(creds.api_key, "pub");
        assert_eq!(creds.api_secret, "priv");
    }

    #[test]
    fn credentials_serialize_with_camel_case_fields() {
        let creds = LighterCredentials {
            api_key: "k".to_string(),
            api_secret: "s".to_string(),
            account_index: "7".to_string(),
            api_key_index: "2".to_string(),
            l1_address: "0xabc".to_string(),
        };
        let json = serde_json::to_value(&creds).unwrap();
        assert!(json.get("apiKey").is_some());
        assert!(json.get("apiSecret").is_some());
        assert!(json.get("accountIndex").is_some());
        assert!(json.get("apiKeyIndex").is_some());
        assert!(json.get("l1Address").is_some());
    }
}
