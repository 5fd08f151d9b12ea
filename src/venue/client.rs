// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Brightside

//! Reqwest-backed implementation of the venue operations.

use std::time::Duration;

use reqwest::Client;

use crate::config;

use super::types::{
    is_accepted_code, AccountsByL1AddressResponse, NextNonceResponse, SendTxResponse, SubAccount,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Errors from venue API calls.
#[derive(Debug, thiserror::Error)]
pub enum VenueError {
    /// Network failure or non-2xx HTTP status. Recoverable; the user may
    /// retry.
    #[error("Venue request failed: {0}")]
    Transport(String),

    /// Response body did not match the expected shape.
    #[error("Venue response was invalid: {0}")]
    InvalidResponse(String),

    /// The venue refused the transaction (embedded failure code or
    /// transport-level rejection of a submission).
    #[error("Transaction rejected by venue: {0}")]
    Rejected(String),
}

/// The three venue operations the provisioning flow depends on.
pub trait VenueApi {
    /// Look up sub-accounts owned by an L1 address. An empty list means
    /// "no account", not an error.
    fn accounts_by_l1_address(
        &self,
        address: &str,
    ) -> impl std::future::Future<Output = Result<Vec<SubAccount>, VenueError>> + Send;

    /// Fetch the next usable nonce for `(account_index, api_key_index)`.
    ///
    /// Must be called as close as possible to the signing step; a stale
    /// nonce invalidates the transaction.
    fn next_nonce(
        &self,
        account_index: i64,
        api_key_index: u8,
    ) -> impl std::future::Future<Output = Result<i64, VenueError>> + Send;

    /// Submit a signed transaction.
    fn send_tx(
        &self,
        tx_type: u8,
        tx_info: &str,
    ) -> impl std::future::Future<Output = Result<SendTxResponse, VenueError>> + Send;
}

/// Stateless HTTP client for the Lighter REST API.
///
/// Holds no mutable state; clone freely or inject a shared instance.
#[derive(Debug, Clone)]
pub struct LighterClient {
    base_url: String,
    http: Client,
}

impl LighterClient {
    /// Create a client for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self, VenueError> {
        let base_url = base_url.into();
        base_url
            .parse::<url::Url>()
            .map_err(|e| VenueError::Transport(format!("invalid base URL: {e}")))?;

        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| VenueError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Create a client from `LIGHTER_API_BASE_URL`, defaulting to mainnet.
    pub fn from_env() -> Result<Self, VenueError> {
        Self::new(config::api_base_url())
    }

    /// Base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl VenueApi for LighterClient {
    async fn accounts_by_l1_address(&self, address: &str) -> Result<Vec<SubAccount>, VenueError> {
        let path = "/api/v1/accountsByL1Address";
        let response = self
            .http
            .get(self.endpoint(path))
            .query(&[("l1_address", address)])
            .send()
            .await
            .map_err(|e| VenueError::Transport(format!("GET {path} failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(VenueError::Transport(format!(
                "GET {path} returned {status}"
            )));
        }

        let body: AccountsByL1AddressResponse = response
            .json()
            .await
            .map_err(|e| VenueError::InvalidResponse(format!("GET {path} invalid JSON: {e}")))?;

        tracing::debug!(
            l1_address = %address,
            sub_accounts = body.sub_accounts.len(),
            "Fetched venue sub-accounts"
        );
        Ok(body.sub_accounts)
    }

    async fn next_nonce(&self, account_index: i64, api_key_index: u8) -> Result<i64, VenueError> {
        let path = "/api/v1/nextNonce";
        let response = self
            .http
            .get(self.endpoint(path))
            .query(&[
                ("account_index", account_index.to_string()),
                ("api_key_index", api_key_index.to_string()),
            ])
            .send()
            .await
            .map_err(|e| VenueError::Transport(format!("GET {path} failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(VenueError::Transport(format!(
                "GET {path} returned {status}"
            )));
        }

        let body: NextNonceResponse = response
            .json()
            .await
            .map_err(|e| VenueError::InvalidResponse(format!("GET {path} invalid JSON: {e}")))?;

        tracing::debug!(account_index, api_key_index, nonce = body.nonce, "Fetched next nonce");
        Ok(body.nonce)
    }

    async fn send_tx(&self, tx_type: u8, tx_info: &str) -> Result<SendTxResponse, VenueError> {
        let path = "/api/v1/sendTx";
        let response = self
            .http
            .post(self.endpoint(path))
            .header("Accept", "application/json")
            .form(&[
                ("tx_type", tx_type.to_string().as_str()),
                ("tx_info", tx_info),
                // Forced off: key-change transactions carry no price.
                ("price_protection", "false"),
            ])
            .send()
            .await
            .map_err(|e| VenueError::Transport(format!("POST {path} failed: {e}")))?;

        let status = response.status();
        let body: SendTxResponse = match response.json().await {
            Ok(body) => body,
            Err(_) if !status.is_success() => {
                return Err(VenueError::Transport(format!(
                    "POST {path} returned {status}"
                )));
            }
            Err(e) => {
                return Err(VenueError::InvalidResponse(format!(
                    "POST {path} invalid JSON: {e}"
                )));
            }
        };

        // The venue can answer 200 with an embedded failure code, so both
        // channels are checked.
        if !status.is_success() || !is_accepted_code(body.code) {
            let detail = body
                .failure_detail()
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP {status}"));
            tracing::warn!(code = ?body.code, %status, "Venue rejected transaction");
            return Err(VenueError::Rejected(detail));
        }

        tracing::debug!(tx_type, code = ?body.code, "Transaction submitted");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_trims_trailing_slash() {
        let client = LighterClient::new("https://mainnet.zklighter.elliot.ai/").unwrap();
        assert_eq!(client.base_url(), "https://mainnet.zklighter.elliot.ai");
        assert_eq!(
            client.endpoint("/api/v1/sendTx"),
            "https://mainnet.zklighter.elliot.ai/api/v1/sendTx"
        );
    }

    #[test]
    fn new_rejects_invalid_url() {
        let result = LighterClient::new("not a url");
        assert!(matches!(result, Err(VenueError::Transport(_))));
    }

    #[test]
    fn from_env_defaults_to_mainnet() {
        // Relies on LIGHTER_API_BASE_URL being unset in the test env.
        let client = LighterClient::from_env().unwrap();
        assert_eq!(client.base_url(), crate::config::DEFAULT_API_BASE_URL);
    }
}
