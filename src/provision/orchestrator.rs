// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Brightside

//! Provisioning state machine.
//!
//! Coordinates the signing adapter, venue client, and wallet into the
//! end-to-end "link wallet, obtain trading API key" pipeline:
//!
//! ```text
//! Idle -> CheckingAccount -> { NoAccountFound | AccountFound }
//!                                  AccountFound -> Generating -> { Success | Failed }
//! ```
//!
//! The `Generating` state is the mutual-exclusion guard: exactly one
//! provisioning attempt is in flight at a time, and a second request while
//! one is running is rejected. Every step failure is caught here, converted
//! to a user-facing message, and halts the pipeline in `Failed`; nothing in
//! the flow is fatal to the process.

use tokio_util::sync::CancellationToken;

use crate::config;
use crate::models::{LighterCredentials, WalletAddress};
use crate::signer::{EngineError, SignerAdapter};
use crate::venue::VenueApi;
use crate::wallet::{WalletError, WalletProvider};

/// User-facing message for the "wallet owns no venue account" outcome.
const NO_ACCOUNT_MESSAGE: &str = "No Lighter account found. Please deposit to perps first.";

/// Observable state of the link flow.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkState {
    /// No wallet session active, or the session was reset.
    Idle,
    /// Sub-account lookup in flight.
    CheckingAccount,
    /// The wallet owns no usable account, or the check could not complete.
    /// The message distinguishes the two.
    NoAccountFound { message: String },
    /// A venue account exists; provisioning may be started.
    AccountFound { account_index: i64 },
    /// A provisioning attempt is in flight.
    Generating { account_index: i64 },
    /// Credentials were published; the orchestrator is inert until reset.
    Success { account_index: i64 },
    /// The last attempt failed at some step; retry is allowed.
    Failed { account_index: i64, message: String },
}

/// Errors scoped to a single provisioning attempt.
#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    #[error("Wallet not connected")]
    NotConnected,

    #[error("No Lighter account found")]
    NoAccount,

    #[error("A provisioning attempt is already in flight")]
    Busy,

    #[error("API key already provisioned for this session")]
    AlreadyProvisioned,

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Failed to get nonce: {0}")]
    Nonce(String),

    #[error(transparent)]
    Wallet(#[from] WalletError),

    #[error("Failed to send transaction: {0}")]
    Submission(String),

    #[error("Provisioning aborted: wallet disconnected")]
    Aborted,
}

/// The wallet-link provisioning orchestrator.
///
/// Single-flight and cooperative: all methods take `&mut self`, network and
/// wallet-signature calls are suspension points, and mutual exclusion falls
/// out of the state machine itself.
pub struct Orchestrator<V: VenueApi> {
    venue: V,
    signer: SignerAdapter,
    endpoint: String,
    state: LinkState,
    credentials: Option<LighterCredentials>,
}

impl<V: VenueApi> Orchestrator<V> {
    /// Create an orchestrator over a venue client and signing adapter.
    ///
    /// `endpoint` parameterizes the signing context and is normally the
    /// same base URL the venue client talks to.
    pub fn new(venue: V, signer: SignerAdapter, endpoint: impl Into<String>) -> Self {
        Self {
            venue,
            signer,
            endpoint: endpoint.into(),
            state: LinkState::Idle,
            credentials: None,
        }
    }

    /// Current flow state.
    pub fn state(&self) -> &LinkState {
        &self.state
    }

    /// Published credentials, present only after a successful run.
    pub fn credentials(&self) -> Option<&LighterCredentials> {
        self.credentials.as_ref()
    }

    /// Reset to `Idle`, discarding credentials and any live signing
    /// context. Key material from an in-progress attempt must not survive
    /// across wallet identities.
    pub fn reset(&mut self) {
        self.state = LinkState::Idle;
        self.credentials = None;
        self.signer.discard_context();
    }

    /// Check whether the connected wallet owns a venue account.
    ///
    /// Only acts from `Idle`; any other state leaves the machine untouched
    /// so a repeated trigger cannot start a duplicate lookup. Operates on
    /// the first returned sub-account.
    pub async fn check_account<W: WalletProvider>(&mut self, wallet: &W) {
        if self.state != LinkState::Idle {
            tracing::debug!(state = ?self.state, "Account check ignored outside Idle");
            return;
        }
        let address = match connected_address(wallet) {
            Some(address) => address,
            None => {
                tracing::warn!("Account check requested without a connected wallet");
                return;
            }
        };

        self.state = LinkState::CheckingAccount;
        tracing::info!(l1_address = %address, "Checking for Lighter account");

        match self.venue.accounts_by_l1_address(&address.0).await {
            Ok(accounts) => match accounts.first() {
                Some(first) => {
                    tracing::info!(account_index = first.index, "Lighter account found");
                    self.state = LinkState::AccountFound {
                        account_index: first.index,
                    };
                }
                None => {
                    tracing::info!(l1_address = %address, "No Lighter account found");
                    self.state = LinkState::NoAccountFound {
                        message: NO_ACCOUNT_MESSAGE.to_string(),
                    };
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "Account check failed");
                self.state = LinkState::NoAccountFound {
                    message: format!("Could not check for a Lighter account: {e}"),
                };
            }
        }
    }

    /// Run the provisioning pipeline for the discovered account.
    ///
    /// Allowed from `AccountFound` and `Failed` (retry). On success the
    /// credentials are published and returned; on failure the state carries
    /// the step's message. Cancellation (wallet disconnect) resets to
    /// `Idle` and discards in-flight key material.
    pub async fn generate_api_key<W: WalletProvider>(
        &mut self,
        wallet: &W,
        cancel: &CancellationToken,
    ) -> Result<&LighterCredentials, ProvisionError> {
        let account_index = match self.state {
            LinkState::AccountFound { account_index }
            | LinkState::Failed { account_index, .. } => account_index,
            LinkState::Generating { .. } => return Err(ProvisionError::Busy),
            LinkState::Success { .. } => return Err(ProvisionError::AlreadyProvisioned),
            _ => return Err(ProvisionError::NoAccount),
        };

        self.state = LinkState::Generating { account_index };

        match self.run_pipeline(wallet, cancel, account_index).await {
            Ok(credentials) => {
                tracing::info!(account_index, "API key provisioning complete");
                self.state = LinkState::Success { account_index };
                self.credentials = Some(credentials);
                Ok(self.credentials.as_ref().expect("credentials just set"))
            }
            Err(ProvisionError::Aborted) => {
                tracing::info!(account_index, "Provisioning aborted, resetting");
                self.reset();
                Err(ProvisionError::Aborted)
            }
            Err(e) => {
                tracing::warn!(account_index, error = %e, "API key provisioning failed");
                self.state = LinkState::Failed {
                    account_index,
                    message: e.to_string(),
                };
                Err(e)
            }
        }
    }

    /// The strict ten-step pipeline. Fails at the first broken step.
    async fn run_pipeline<W: WalletProvider>(
        &mut self,
        wallet: &W,
        cancel: &CancellationToken,
        account_index: i64,
    ) -> Result<LighterCredentials, ProvisionError> {
        let address = connected_address(wallet).ok_or(ProvisionError::NotConnected)?;

        tracing::info!(account_index, "Starting API key generation");

        // 1. Engine acquisition (no-op after the first success).
        self.signer.initialize()?;

        // 2. Disposable context under the all-zero placeholder key.
        self.signer.create_or_reinit_context(
            &self.endpoint,
            &config::placeholder_private_key(),
            config::CHAIN_ID,
            config::API_KEY_INDEX,
            account_index,
        )?;

        // 3. Fresh API key pair, volatile memory only.
        let key_pair = self.signer.generate_key_pair()?;
        tracing::info!(account_index, "API key pair generated");

        // 4. Fresh nonce, fetched as late as possible before signing.
        let nonce = self
            .venue
            .next_nonce(account_index, config::API_KEY_INDEX)
            .await
            .map_err(|e| ProvisionError::Nonce(e.to_string()))?;
        ensure_live(wallet, cancel)?;

        // 5. Re-create the context under the real private key. Same
        //    (api_key_index, account_index) pair as the nonce fetch.
        self.signer.create_or_reinit_context(
            &self.endpoint,
            &key_pair.private_key,
            config::CHAIN_ID,
            config::API_KEY_INDEX,
            account_index,
        )?;

        // 6. Engine signature over the change-pub-key request.
        let signed = self
            .signer
            .sign_change_pub_key(&key_pair.public_key, nonce)?;
        tracing::info!(account_index, nonce, "Change-pub-key transaction signed");

        // 7. Wallet countersignature over exactly the engine's message.
        let l1_signature = wallet.sign_message(&signed.message_to_sign).await?;
        ensure_live(wallet, cancel)?;
        tracing::info!(account_index, "Wallet signature obtained");

        // 8-9. Assemble and submit.
        let tx_info = signed.into_submission_payload(&l1_signature);
        self.venue
            .send_tx(config::TX_TYPE_CHANGE_PUB_KEY, &tx_info)
            .await
            .map_err(|e| ProvisionError::Submission(e.to_string()))?;
        ensure_live(wallet, cancel)?;
        tracing::info!(account_index, "Transaction accepted by venue");

        // 10. Publish.
        Ok(LighterCredentials::new(&key_pair, account_index, &address))
    }
}

fn connected_address<W: WalletProvider>(wallet: &W) -> Option<WalletAddress> {
    if wallet.is_connected() {
        wallet.address()
    } else {
        None
    }
}

/// Abort check after each suspension point: a disconnect mid-flow must not
/// let the pipeline continue under a stale wallet identity.
fn ensure_live<W: WalletProvider>(
    wallet: &W,
    cancel: &CancellationToken,
) -> Result<(), ProvisionError> {
    if cancel.is_cancelled() || !wallet.is_connected() {
        Err(ProvisionError::Aborted)
    } else {
        Ok(())
    }
}
