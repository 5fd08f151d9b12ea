// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Brightside

//! Opaque signing engine contract.
//!
//! The engine exposes global functions that all answer in the same shape:
//! an optional serialized payload and an optional error string. An `err`
//! present means failure; the error text comes from the engine and is
//! surfaced verbatim to aid diagnosis.

/// Raw `{str?, err?}` result of an engine call that may carry a payload.
#[derive(Debug, Clone, Default)]
pub struct EngineOutput {
    /// JSON-serialized payload, when the call produces one.
    pub payload: Option<String>,
    /// Engine-reported error string; presence means failure.
    pub err: Option<String>,
}

/// Raw result of an engine call that only reports success or failure.
#[derive(Debug, Clone, Default)]
pub struct EngineStatus {
    /// Engine-reported error string; presence means failure.
    pub err: Option<String>,
}

/// Raw result of the engine's key generation call.
#[derive(Debug, Clone, Default)]
pub struct KeyGenOutput {
    /// Generated public key.
    pub public_key: String,
    /// Generated private key.
    pub private_key: String,
    /// Engine-reported error string; presence means failure.
    pub err: Option<String>,
}

/// The opaque signing engine behind the adapter.
///
/// Implementations hold at most one live signing context at a time;
/// `create_client` replaces any existing context. Nothing about the engine's
/// internals may be assumed beyond this contract.
pub trait SigningEngine: Send {
    /// Create or replace the signing context.
    ///
    /// The context is parameterized by the venue endpoint, the active
    /// private key, the chain id, and the (api_key_index, account_index)
    /// pair the subsequent signatures are scoped to.
    fn create_client(
        &mut self,
        url: &str,
        private_key: &str,
        chain_id: u32,
        api_key_index: u8,
        account_index: i64,
    ) -> EngineStatus;

    /// Generate a new API key pair.
    ///
    /// Does not sign anything, but the live context supplies the signing
    /// domain parameters.
    fn generate_api_key(&mut self) -> KeyGenOutput;

    /// Sign a change-pub-key request for `pub_key` at `nonce`.
    ///
    /// On success the payload is a JSON object holding every transaction
    /// field plus a `MessageToSign` field the wallet must countersign.
    fn sign_change_pub_key(&mut self, pub_key: &str, nonce: i64) -> EngineOutput;
}

/// Errors surfaced by the signing module adapter.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Signing engine failed to load: {0}")]
    Initialization(String),

    #[error("Signing engine not initialized")]
    NotInitialized,

    #[error("No signing context; create one first")]
    NoContext,

    #[error("Signing context creation failed: {0}")]
    Context(String),

    #[error("API key generation failed: {0}")]
    KeyGeneration(String),

    #[error("Signing failed: {0}")]
    Signing(String),

    #[error("Malformed engine response: {0}")]
    MalformedResponse(String),
}
