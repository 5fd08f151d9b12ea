// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Brightside

//! # Wallet Boundary
//!
//! The wallet-connection provider is external to this crate; the flow only
//! consumes three capabilities: the connected address, the connection flag,
//! and a message-signing suspension point. [`WalletProvider`] is that
//! boundary, and [`LocalWallet`] is a private-key-backed implementation used
//! by integration tests and operational tooling.

use alloy::signers::{local::PrivateKeySigner, Signer};

use crate::models::WalletAddress;

/// Errors reported by a wallet provider.
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    #[error("Wallet not connected")]
    NotConnected,

    #[error("Signature request rejected by user")]
    Rejected,

    #[error("Invalid private key: {0}")]
    InvalidKey(String),

    #[error("Wallet signing failed: {0}")]
    Signing(String),
}

/// External wallet-connection provider.
///
/// `sign_message` is a suspension point: browser wallets park the call until
/// the user approves or rejects the request, so implementations may take
/// arbitrarily long to resolve. A user rejection surfaces as
/// [`WalletError::Rejected`] and is recoverable.
pub trait WalletProvider {
    /// The connected L1 address, if any.
    fn address(&self) -> Option<WalletAddress>;

    /// Whether a wallet is currently connected.
    fn is_connected(&self) -> bool;

    /// Request a personal-message signature over `message`.
    ///
    /// Returns the signature as a `0x`-prefixed hex string.
    fn sign_message(
        &self,
        message: &str,
    ) -> impl std::future::Future<Output = Result<String, WalletError>> + Send;
}

/// Wallet provider backed by a local secp256k1 private key.
///
/// Signs immediately without user interaction. Not a substitute for a real
/// wallet connection in the product, but it exercises the same contract.
#[derive(Debug, Clone)]
pub struct LocalWallet {
    signer: PrivateKeySigner,
    address: WalletAddress,
}

impl LocalWallet {
    /// Create a wallet from a hex-encoded private key (with or without the
    /// `0x` prefix).
    pub fn from_hex_key(private_key_hex: &str) -> Result<Self, WalletError> {
        let key_bytes = alloy::hex::decode(private_key_hex)
            .map_err(|e| WalletError::InvalidKey(e.to_string()))?;
        let signer = PrivateKeySigner::from_slice(&key_bytes)
            .map_err(|e| WalletError::InvalidKey(e.to_string()))?;
        let address = WalletAddress(signer.address().to_string());
        Ok(Self { signer, address })
    }
}

impl WalletProvider for LocalWallet {
    fn address(&self) -> Option<WalletAddress> {
        Some(self.address.clone())
    }

    fn is_connected(&self) -> bool {
        true
    }

    async fn sign_message(&self, message: &str) -> Result<String, WalletError> {
        let signature = self
            .signer
            .sign_message(message.as_bytes())
            .await
            .map_err(|e| WalletError::Signing(e.to_string()))?;
        Ok(format!("0x{}", alloy::hex::encode(signature.as_bytes())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_KEY: &str = "59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";

    #[test]
    fn from_hex_key_derives_address() {
        let wallet = LocalWallet::from_hex_key(TEST_KEY).unwrap();
        let addr = wallet.address().unwrap();
        assert!(addr.0.starts_with("0x"));
        assert_eq!(addr.0.len(), 42);
        assert!(wallet.is_connected());
    }

    #[test]
    fn from_hex_key_accepts_0x_prefix() {
        let plain = LocalWallet::from_hex_key(TEST_KEY).unwrap();
        let prefixed = LocalWallet::from_hex_key(&format!("0x{TEST_KEY}")).unwrap();
        assert_eq!(plain.address(), prefixed.address());
    }

    #[test]
    fn from_hex_key_rejects_garbage() {
        assert!(matches!(
            LocalWallet::from_hex_key("not-hex"),
            Err(WalletError::InvalidKey(_))
        ));
    }

    #[tokio::test]
    async fn sign_message_returns_65_byte_hex_signature() {
        let wallet = LocalWallet::from_hex_key(TEST_KEY).unwrap();
        let signature = wallet.sign_message("hello lighter").await.unwrap();
        assert!(signature.starts_with("0x"));
        // 65 bytes = 130 hex chars
        assert_eq!(signature.len(), 2 + 130);
    }

    #[tokio::test]
    async fn signatures_differ_per_message() {
        let wallet = LocalWallet::from_hex_key(TEST_KEY).unwrap();
        let a = wallet.sign_message("message a").await.unwrap();
        let b = wallet.sign_message("message b").await.unwrap();
        assert_ne!(a, b);
    }
}
