// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Brightside

//! Adapter over the opaque signing engine.
//!
//! Handles lazy one-time engine acquisition, tracks whether a signing
//! context is live, and converts the engine's `{str?, err?}` results into
//! typed outcomes. Creating a new context discards the previous one; only
//! one context is live at a time.

use serde_json::{Map, Value};

use crate::models::ApiKeyPair;

use super::engine::{EngineError, SigningEngine};

/// Field in the engine's change-pub-key payload holding the exact message
/// the wallet must countersign.
pub const MESSAGE_TO_SIGN_FIELD: &str = "MessageToSign";

/// Field name the venue expects the wallet signature under.
pub const L1_SIGNATURE_FIELD: &str = "L1Sig";

/// Loader that acquires the underlying engine exactly once.
pub type EngineLoader = Box<dyn FnMut() -> Result<Box<dyn SigningEngine>, EngineError> + Send>;

/// Engine-signed change-pub-key request, split into the message the wallet
/// must countersign and the remaining transaction fields.
#[derive(Debug, Clone)]
pub struct SignedChangePubKey {
    /// Exact payload for the wallet-layer signature.
    pub message_to_sign: String,
    /// All other transaction fields, as emitted by the engine.
    pub tx_fields: Map<String, Value>,
}

impl SignedChangePubKey {
    /// Assemble the final submission payload: every engine field except the
    /// message, plus the wallet signature under [`L1_SIGNATURE_FIELD`].
    pub fn into_submission_payload(mut self, l1_signature: &str) -> String {
        self.tx_fields.insert(
            L1_SIGNATURE_FIELD.to_string(),
            Value::String(l1_signature.to_string()),
        );
        Value::Object(self.tx_fields).to_string()
    }
}

/// Lazily-initialized wrapper around the signing engine.
pub struct SignerAdapter {
    loader: EngineLoader,
    engine: Option<Box<dyn SigningEngine>>,
    has_context: bool,
}

impl SignerAdapter {
    /// Create an adapter that will acquire the engine via `loader` on the
    /// first [`initialize`](Self::initialize) call.
    pub fn new(loader: EngineLoader) -> Self {
        Self {
            loader,
            engine: None,
            has_context: false,
        }
    }

    /// Whether the engine has been loaded.
    pub fn is_initialized(&self) -> bool {
        self.engine.is_some()
    }

    /// Whether a signing context is currently live.
    pub fn has_context(&self) -> bool {
        self.has_context
    }

    /// Acquire the engine. Idempotent: after the first success this is a
    /// no-op.
    pub fn initialize(&mut self) -> Result<(), EngineError> {
        if self.engine.is_none() {
            self.engine = Some((self.loader)()?);
            tracing::debug!("Signing engine loaded");
        }
        Ok(())
    }

    /// Create or replace the signing context.
    pub fn create_or_reinit_context(
        &mut self,
        endpoint: &str,
        private_key_hex: &str,
        chain_id: u32,
        api_key_index: u8,
        account_index: i64,
    ) -> Result<(), EngineError> {
        let engine = self.engine.as_mut().ok_or(EngineError::NotInitialized)?;
        let status = engine.create_client(
            endpoint,
            private_key_hex,
            chain_id,
            api_key_index,
            account_index,
        );
        if let Some(err) = status.err {
            self.has_context = false;
            return Err(EngineError::Context(err));
        }
        self.has_context = true;
        Ok(())
    }

    /// Drop the live context, if any.
    ///
    /// The engine itself stays loaded; the next provisioning attempt starts
    /// from a fresh context.
    pub fn discard_context(&mut self) {
        self.has_context = false;
    }

    /// Generate a new API key pair. Requires a live context.
    pub fn generate_key_pair(&mut self) -> Result<ApiKeyPair, EngineError> {
        if !self.has_context {
            return Err(EngineError::NoContext);
        }
        let engine = self.engine.as_mut().ok_or(EngineError::NotInitialized)?;
        let output = engine.generate_api_key();
        if let Some(err) = output.err {
            return Err(EngineError::KeyGeneration(err));
        }
        if output.public_key.is_empty() || output.private_key.is_empty() {
            return Err(EngineError::MalformedResponse(
                "key generation returned an empty key".to_string(),
            ));
        }
        Ok(ApiKeyPair {
            public_key: output.public_key,
            private_key: output.private_key,
        })
    }

    /// Sign a change-pub-key request for `new_public_key` at `nonce`.
    ///
    /// Validates that the engine payload parses as a JSON object carrying a
    /// string [`MESSAGE_TO_SIGN_FIELD`]; the field is split off so the
    /// remaining map holds exactly the fields the venue expects.
    pub fn sign_change_pub_key(
        &mut self,
        new_public_key: &str,
        nonce: i64,
    ) -> Result<SignedChangePubKey, EngineError> {
        if !self.has_context {
            return Err(EngineError::NoContext);
        }
        let engine = self.engine.as_mut().ok_or(EngineError::NotInitialized)?;
        let output = engine.sign_change_pub_key(new_public_key, nonce);

        if let Some(err) = output.err {
            return Err(EngineError::Signing(err));
        }
        let payload = output.payload.ok_or_else(|| {
            EngineError::MalformedResponse("no transaction data returned".to_string())
        })?;

        let mut tx_fields: Map<String, Value> = serde_json::from_str(&payload)
            .map_err(|e| EngineError::MalformedResponse(format!("invalid payload JSON: {e}")))?;

        let message_to_sign = match tx_fields.remove(MESSAGE_TO_SIGN_FIELD) {
            Some(Value::String(message)) if !message.is_empty() => message,
            _ => {
                return Err(EngineError::MalformedResponse(format!(
                    "{MESSAGE_TO_SIGN_FIELD} not found in transaction data"
                )))
            }
        };

        Ok(SignedChangePubKey {
            message_to_sign,
            tx_fields,
        })
    }
}

impl std::fmt::Debug for SignerAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignerAdapter")
            .field("initialized", &self.engine.is_some())
            .field("has_context", &self.has_context)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signer::engine::{EngineOutput, EngineStatus, KeyGenOutput};

    /// Scripted engine for adapter tests.
    struct ScriptedEngine {
        create_client_err: Option<String>,
        keygen: KeyGenOutput,
        sign_output: EngineOutput,
        create_client_calls: usize,
    }

    impl Default for ScriptedEngine {
        fn default() -> Self {
            Self {
                create_client_err: None,
                keygen: KeyGenOutput {
                    public_key: "pub-key".to_string(),
                    private_key: "priv-key".to_string(),
                    err: None,
                },
                sign_output: EngineOutput {
                    payload: Some(
                        r#"{"MessageToSign":"approve key","PubKey":"pub-key","Nonce":42}"#
                            .to_string(),
                    ),
                    err: None,
                },
                create_client_calls: 0,
            }
        }
    }

    impl SigningEngine for ScriptedEngine {
        fn create_client(
            &mut self,
            _url: &str,
            _private_key: &str,
            _chain_id: u32,
            _api_key_index: u8,
            _account_index: i64,
        ) -> EngineStatus {
            self.create_client_calls += 1;
            EngineStatus {
                err: self.create_client_err.clone(),
            }
        }

        fn generate_api_key(&mut self) -> KeyGenOutput {
            self.keygen.clone()
        }

        fn sign_change_pub_key(&mut self, _pub_key: &str, _nonce: i64) -> EngineOutput {
            self.sign_output.clone()
        }
    }

    fn adapter_with(engine: ScriptedEngine) -> SignerAdapter {
        let mut slot = Some(engine);
        SignerAdapter::new(Box::new(
            move || -> Result<Box<dyn SigningEngine>, EngineError> {
                Ok(Box::new(slot.take().expect("engine loaded once")))
            },
        ))
    }

    fn ready_adapter(engine: ScriptedEngine) -> SignerAdapter {
        let mut adapter = adapter_with(engine);
        adapter.initialize().unwrap();
        adapter
            .create_or_reinit_context("https://venue.example", "00", 304, 2, 7)
            .unwrap();
        adapter
    }

    #[test]
    fn initialize_is_idempotent() {
        let mut adapter = adapter_with(ScriptedEngine::default());
        assert!(!adapter.is_initialized());
        adapter.initialize().unwrap();
        assert!(adapter.is_initialized());
        // Second call must not re-invoke the loader (which would panic).
        adapter.initialize().unwrap();
    }

    #[test]
    fn initialize_surfaces_loader_failure() {
        let mut adapter = SignerAdapter::new(Box::new(
            || -> Result<Box<dyn SigningEngine>, EngineError> {
                Err(EngineError::Initialization("wasm fetch failed".to_string()))
            },
        ));
        let err = adapter.initialize().unwrap_err();
        assert!(matches!(err, EngineError::Initialization(_)));
        assert!(!adapter.is_initialized());
    }

    #[test]
    fn operations_require_initialization() {
        let mut adapter = adapter_with(ScriptedEngine::default());
        let err = adapter
            .create_or_reinit_context("https://venue.example", "00", 304, 2, 7)
            .unwrap_err();
        assert!(matches!(err, EngineError::NotInitialized));
    }

    #[test]
    fn key_generation_requires_context() {
        let mut adapter = adapter_with(ScriptedEngine::default());
        adapter.initialize().unwrap();
        assert!(matches!(
            adapter.generate_key_pair(),
            Err(EngineError::NoContext)
        ));
    }

    #[test]
    fn context_error_carries_engine_message() {
        let mut adapter = adapter_with(ScriptedEngine {
            create_client_err: Some("bad key length".to_string()),
            ..ScriptedEngine::default()
        });
        adapter.initialize().unwrap();
        let err = adapter
            .create_or_reinit_context("https://venue.example", "00", 304, 2, 7)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Signing context creation failed: bad key length"
        );
        assert!(!adapter.has_context());
    }

    #[test]
    fn generate_key_pair_returns_keys() {
        let mut adapter = ready_adapter(ScriptedEngine::default());
        let pair = adapter.generate_key_pair().unwrap();
        assert_eq!(pair.public_key, "pub-key");
        assert_eq!(pair.private_key, "priv-key");
    }

    #[test]
    fn sign_change_pub_key_splits_message_from_fields() {
        let mut adapter = ready_adapter(ScriptedEngine::default());
        let signed = adapter.sign_change_pub_key("pub-key", 42).unwrap();
        assert_eq!(signed.message_to_sign, "approve key");
        assert!(!signed.tx_fields.contains_key(MESSAGE_TO_SIGN_FIELD));
        assert_eq!(signed.tx_fields["Nonce"], 42);
    }

    #[test]
    fn sign_change_pub_key_rejects_engine_error() {
        let mut adapter = ready_adapter(ScriptedEngine {
            sign_output: EngineOutput {
                payload: None,
                err: Some("nonce mismatch".to_string()),
            },
            ..ScriptedEngine::default()
        });
        let err = adapter.sign_change_pub_key("pub-key", 42).unwrap_err();
        assert_eq!(err.to_string(), "Signing failed: nonce mismatch");
    }

    #[test]
    fn sign_change_pub_key_rejects_missing_message() {
        let mut adapter = ready_adapter(ScriptedEngine {
            sign_output: EngineOutput {
                payload: Some(r#"{"PubKey":"pub-key"}"#.to_string()),
                err: None,
            },
            ..ScriptedEngine::default()
        });
        let err = adapter.sign_change_pub_key("pub-key", 42).unwrap_err();
        assert!(matches!(err, EngineError::MalformedResponse(_)));
    }

    #[test]
    fn sign_change_pub_key_rejects_absent_payload() {
        let mut adapter = ready_adapter(ScriptedEngine {
            sign_output: EngineOutput {
                payload: None,
                err: None,
            },
            ..ScriptedEngine::default()
        });
        assert!(matches!(
            adapter.sign_change_pub_key("pub-key", 42),
            Err(EngineError::MalformedResponse(_))
        ));
    }

    #[test]
    fn submission_payload_swaps_message_for_signature() {
        let mut adapter = ready_adapter(ScriptedEngine::default());
        let signed = adapter.sign_change_pub_key("pub-key", 42).unwrap();
        let payload = signed.into_submission_payload("0xsig");
        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(value[L1_SIGNATURE_FIELD], "0xsig");
        assert!(value.get(MESSAGE_TO_SIGN_FIELD).is_none());
        assert_eq!(value["PubKey"], "pub-key");
    }
}
