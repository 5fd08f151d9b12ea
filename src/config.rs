// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Brightside

//! # Protocol Constants & Runtime Configuration
//!
//! Fixed protocol constants dictated by the Lighter venue, plus the
//! environment variables this crate reads at startup. The numeric constants
//! are part of the venue's wire protocol and must not be derived or changed.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `LIGHTER_API_BASE_URL` | Venue REST base URL | mainnet endpoint |
//! | `LIGHTER_CREDENTIAL_KEY` | Passphrase for credential encryption | built-in application key |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info` |

/// Default Lighter mainnet REST endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://mainnet.zklighter.elliot.ai";

/// Environment variable overriding the venue base URL.
pub const API_BASE_URL_ENV: &str = "LIGHTER_API_BASE_URL";

/// Environment variable overriding the credential encryption passphrase.
pub const CREDENTIAL_KEY_ENV: &str = "LIGHTER_CREDENTIAL_KEY";

/// Fixed application passphrase for credential encryption.
///
/// The companion mobile app derives the same key, so changing this breaks
/// the scan hand-off for existing app builds.
pub const DEFAULT_CREDENTIAL_PASSPHRASE: &str = "brightside-lighter-2024";

/// Lighter zk-rollup chain id.
pub const CHAIN_ID: u32 = 304;

/// API key slot this application provisions into.
///
/// Slots 0 and 1 are reserved for the venue's own frontend; the companion
/// app always reads slot 2.
pub const API_KEY_INDEX: u8 = 2;

/// Transaction type code for the change-pub-key transaction.
pub const TX_TYPE_CHANGE_PUB_KEY: u8 = 8;

/// Length of the all-zero placeholder private key used for the first
/// signing-context creation, before a real key pair exists.
pub const PLACEHOLDER_PRIVATE_KEY_LEN: usize = 80;

/// Embedded response code the venue uses for plain success.
pub const VENUE_CODE_OK: i64 = 200;

/// Lowest embedded response code in the "accepted/pending" range.
///
/// The venue can answer HTTP 200 with an embedded failure code; codes at or
/// above this threshold mean the transaction was accepted and is pending.
pub const VENUE_CODE_ACCEPTED_THRESHOLD: i64 = 30_000;

/// The all-zero placeholder private key for the initial signing context.
pub fn placeholder_private_key() -> String {
    "0".repeat(PLACEHOLDER_PRIVATE_KEY_LEN)
}

/// Read an environment variable, treating empty/whitespace values as unset.
pub fn env_optional(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(value) => {
            let trimmed = value.trim().to_string();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed)
            }
        }
        Err(_) => None,
    }
}

/// Read an environment variable with a fallback default.
pub fn env_or_default(name: &str, default: &str) -> String {
    env_optional(name).unwrap_or_else(|| default.to_string())
}

/// Resolve the venue base URL from the environment.
pub fn api_base_url() -> String {
    env_or_default(API_BASE_URL_ENV, DEFAULT_API_BASE_URL)
}

/// Resolve the credential encryption passphrase from the environment.
pub fn credential_passphrase() -> String {
    env_or_default(CREDENTIAL_KEY_ENV, DEFAULT_CREDENTIAL_PASSPHRASE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_key_is_all_zeros_at_protocol_length() {
        let key = placeholder_private_key();
        assert_eq!(key.len(), PLACEHOLDER_PRIVATE_KEY_LEN);
        assert!(key.chars().all(|c| c == '0'));
    }

    #[test]
    fn env_or_default_falls_back_when_unset() {
        assert_eq!(
            env_or_default("LIGHTER_LINK_TEST_UNSET_VAR", "fallback"),
            "fallback"
        );
    }

    #[test]
    fn protocol_constants_match_venue() {
        assert_eq!(CHAIN_ID, 304);
        assert_eq!(API_KEY_INDEX, 2);
        assert_eq!(TX_TYPE_CHANGE_PUB_KEY, 8);
        assert_eq!(VENUE_CODE_OK, 200);
        assert_eq!(VENUE_CODE_ACCEPTED_THRESHOLD, 30_000);
    }
}
