// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Brightside

//! Venue connectivity probe.
//!
//! Small diagnostic binary around [`LighterClient`]: looks up the
//! sub-accounts for a wallet address and, when one exists, fetches the next
//! nonce for the provisioning key slot. Useful for checking venue
//! reachability and account state without running the full link flow.
//!
//! Environment:
//!
//!   LINK_ADDRESS            L1 wallet address to look up (required)
//!   LIGHTER_API_BASE_URL    Venue REST base URL (default: mainnet)
//!   LOG_FORMAT              `json` or `pretty` (default: pretty)
//!   RUST_LOG                Log level filter (default: info)

use std::env;
use std::process::ExitCode;

use lighter_link::config;
use lighter_link::venue::{LighterClient, VenueApi};

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let Some(address) = config::env_optional("LINK_ADDRESS") else {
        eprintln!("LINK_ADDRESS not set; nothing to probe");
        return ExitCode::FAILURE;
    };

    let client = match LighterClient::from_env() {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build venue client");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(base_url = client.base_url(), address = %address, "Probing venue");

    let accounts = match client.accounts_by_l1_address(&address).await {
        Ok(accounts) => accounts,
        Err(e) => {
            tracing::error!(error = %e, "Account lookup failed");
            return ExitCode::FAILURE;
        }
    };

    let Some(account) = accounts.first() else {
        tracing::warn!(%address, "No Lighter account for this address");
        return ExitCode::SUCCESS;
    };
    tracing::info!(
        account_index = account.index,
        sub_accounts = accounts.len(),
        "Account found"
    );

    match client.next_nonce(account.index, config::API_KEY_INDEX).await {
        Ok(nonce) => {
            tracing::info!(
                nonce,
                api_key_index = config::API_KEY_INDEX,
                "Next nonce fetched"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Nonce fetch failed");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let format = env::var("LOG_FORMAT").unwrap_or_default();
    if format.eq_ignore_ascii_case("json") {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
