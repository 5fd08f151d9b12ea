// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Brightside

//! Session layer over the orchestrator.
//!
//! Owns the wallet handle for one connection session, guards the account
//! check with a one-shot flag so reconnect events cannot start duplicate
//! lookups, and triggers the encryption + scannable-code step once
//! credentials are published. Disconnecting resets everything
//! unconditionally.

use tokio_util::sync::CancellationToken;

use crate::credentials::{
    encrypt_credentials, render_visual_code, CredentialError, VisualCodeOptions,
};
use crate::models::LighterCredentials;
use crate::venue::VenueApi;
use crate::wallet::WalletProvider;

use super::orchestrator::{LinkState, Orchestrator, ProvisionError};

/// One wallet-connection session of the link flow.
pub struct LinkSession<V: VenueApi, W: WalletProvider> {
    orchestrator: Orchestrator<V>,
    wallet: W,
    /// One-shot guard: at most one account check per connection session.
    checked_this_session: bool,
    cancel: CancellationToken,
}

impl<V: VenueApi, W: WalletProvider> LinkSession<V, W> {
    /// Create a session for a wallet over an orchestrator.
    pub fn new(orchestrator: Orchestrator<V>, wallet: W) -> Self {
        Self {
            orchestrator,
            wallet,
            checked_this_session: false,
            cancel: CancellationToken::new(),
        }
    }

    /// Current flow state, for the presentation layer.
    pub fn state(&self) -> &LinkState {
        self.orchestrator.state()
    }

    /// The wallet bound to this session.
    pub fn wallet(&self) -> &W {
        &self.wallet
    }

    /// Token that aborts an in-flight provisioning attempt when cancelled.
    ///
    /// Wire this to the wallet library's disconnect event so a disconnect
    /// mid-flow aborts instead of completing under a stale identity.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Handle a wallet-connect event.
    ///
    /// Runs the account check exactly once per connection session; repeat
    /// connect events from the same session are no-ops.
    pub async fn on_connect(&mut self) {
        if !self.wallet.is_connected() {
            return;
        }
        if self.checked_this_session {
            tracing::debug!("Account already checked this session");
            return;
        }
        self.checked_this_session = true;
        self.orchestrator.check_account(&self.wallet).await;
    }

    /// Handle a wallet-disconnect event.
    ///
    /// Cancels any in-flight attempt, resets the state machine to `Idle`,
    /// and discards published credentials. The next connect re-runs the
    /// check from scratch.
    pub fn on_disconnect(&mut self) {
        self.cancel.cancel();
        self.cancel = CancellationToken::new();
        self.checked_this_session = false;
        self.orchestrator.reset();
        tracing::info!("Wallet disconnected, session reset");
    }

    /// User-initiated provisioning. Delegates to the orchestrator under
    /// this session's cancellation token.
    pub async fn generate_api_key(&mut self) -> Result<&LighterCredentials, ProvisionError> {
        let cancel = self.cancel.clone();
        self.orchestrator.generate_api_key(&self.wallet, &cancel).await
    }

    /// Published credentials, if the flow has succeeded.
    pub fn credentials(&self) -> Option<&LighterCredentials> {
        self.orchestrator.credentials()
    }

    /// Encrypted transport blob for the published credentials.
    ///
    /// `None` until the flow succeeds. The blob is what the companion app
    /// scans, and is safe to copy to the clipboard verbatim.
    pub fn encrypted_credentials(&self) -> Option<Result<String, CredentialError>> {
        self.orchestrator
            .credentials()
            .map(encrypt_credentials)
    }

    /// Scannable SVG code for the published credentials.
    pub fn credentials_visual_code(
        &self,
        options: &VisualCodeOptions,
    ) -> Option<Result<String, CredentialError>> {
        self.orchestrator.credentials().map(|credentials| {
            let blob = encrypt_credentials(credentials)?;
            render_visual_code(&blob, options)
        })
    }
}
