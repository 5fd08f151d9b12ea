// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Brightside

//! XChaCha20-Poly1305 encryption of the credential record.
//!
//! The key is derived as SHA-256 of a fixed application passphrase shared
//! with the companion app. Each encryption draws a fresh 24-byte nonce from
//! OS entropy, so ciphertexts are not byte-stable; round-trip identity of
//! the plaintext is the guarantee. Transport form is
//! `base64(nonce || ciphertext)`.

use base64ct::{Base64, Encoding};
use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{Key, XChaCha20Poly1305, XNonce};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::config;
use crate::models::LighterCredentials;

/// XChaCha20-Poly1305 nonce length in bytes.
const NONCE_LEN: usize = 24;

/// Errors from credential encryption, decryption, or rendering.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("Credential serialization failed: {0}")]
    Serialization(String),

    #[error("Credential encryption failed: {0}")]
    Encryption(String),

    /// Malformed blob or wrong key. The companion app may present a
    /// corrupted or foreign blob, so this is always recoverable.
    #[error("Credential decryption failed: {0}")]
    Decryption(String),

    #[error("Visual code rendering failed: {0}")]
    VisualCode(String),
}

fn derive_key(passphrase: &str) -> [u8; 32] {
    let digest = Sha256::digest(passphrase.as_bytes());
    digest.into()
}

/// Encrypt a credential record under the application passphrase.
///
/// Returns the transport blob embedded in the scannable code.
pub fn encrypt_credentials(credentials: &LighterCredentials) -> Result<String, CredentialError> {
    encrypt_with_passphrase(credentials, &config::credential_passphrase())
}

/// Decrypt a transport blob back into a credential record.
pub fn decrypt_credentials(blob: &str) -> Result<LighterCredentials, CredentialError> {
    decrypt_with_passphrase(blob, &config::credential_passphrase())
}

/// Encrypt under an explicit passphrase.
pub fn encrypt_with_passphrase(
    credentials: &LighterCredentials,
    passphrase: &str,
) -> Result<String, CredentialError> {
    let plaintext = serde_json::to_vec(credentials)
        .map_err(|e| CredentialError::Serialization(e.to_string()))?;

    let key = derive_key(passphrase);
    let cipher = XChaCha20Poly1305::new(Key::from_slice(&key));

    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = XNonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext.as_slice())
        .map_err(|e| CredentialError::Encryption(e.to_string()))?;

    let mut framed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    framed.extend_from_slice(&nonce_bytes);
    framed.extend_from_slice(&ciphertext);
    Ok(Base64::encode_string(&framed))
}

/// Decrypt under an explicit passphrase.
pub fn decrypt_with_passphrase(
    blob: &str,
    passphrase: &str,
) -> Result<LighterCredentials, CredentialError> {
    let framed = Base64::decode_vec(blob.trim())
        .map_err(|e| CredentialError::Decryption(format!("invalid base64: {e}")))?;

    if framed.len() <= NONCE_LEN {
        return Err(CredentialError::Decryption("blob too short".to_string()));
    }
    let (nonce_bytes, ciphertext) = framed.split_at(NONCE_LEN);

    let key = derive_key(passphrase);
    let cipher = XChaCha20Poly1305::new(Key::from_slice(&key));

    let plaintext = cipher
        .decrypt(XNonce::from_slice(nonce_bytes), ciphertext)
        .map_err(|_| {
            CredentialError::Decryption("authentication failed (wrong key or tampered blob)".to_string())
        })?;

    serde_json::from_slice(&plaintext).map_err(|e| CredentialError::Decryption(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_credentials() -> LighterCredentials {
        LighterCredentials {
            api_key: "0302b5d1a-pub".to_string(),
            api_secret: "8f2c44-priv".to_string(),
            account_index: "7".to_string(),
            api_key_index: "2".to_string(),
            l1_address: "0x742d35Cc6634C0532925a3b844Bc9e7595f4aB12".to_string(),
        }
    }

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let creds = sample_credentials();
        let blob = encrypt_with_passphrase(&creds, "test-pass").unwrap();
        let decrypted = decrypt_with_passphrase(&blob, "test-pass").unwrap();
        assert_eq!(decrypted, creds);
    }

    #[test]
    fn ciphertexts_differ_per_encryption_but_both_decrypt() {
        let creds = sample_credentials();
        let a = encrypt_with_passphrase(&creds, "test-pass").unwrap();
        let b = encrypt_with_passphrase(&creds, "test-pass").unwrap();
        // Random nonce per encryption.
        assert_ne!(a, b);
        assert_eq!(decrypt_with_passphrase(&a, "test-pass").unwrap(), creds);
        assert_eq!(decrypt_with_passphrase(&b, "test-pass").unwrap(), creds);
    }

    #[test]
    fn wrong_passphrase_fails_cleanly() {
        let blob = encrypt_with_passphrase(&sample_credentials(), "right").unwrap();
        let err = decrypt_with_passphrase(&blob, "wrong").unwrap_err();
        assert!(matches!(err, CredentialError::Decryption(_)));
    }

    #[test]
    fn malformed_blob_fails_cleanly() {
        for blob in ["", "not base64 !!!", "aGVsbG8="] {
            assert!(matches!(
                decrypt_with_passphrase(blob, "any"),
                Err(CredentialError::Decryption(_))
            ));
        }
    }

    #[test]
    fn tampered_blob_fails_authentication() {
        let blob = encrypt_with_passphrase(&sample_credentials(), "test-pass").unwrap();
        let mut framed = Base64::decode_vec(&blob).unwrap();
        let last = framed.len() - 1;
        framed[last] ^= 0xFF;
        let tampered = Base64::encode_string(&framed);
        assert!(matches!(
            decrypt_with_passphrase(&tampered, "test-pass"),
            Err(CredentialError::Decryption(_))
        ));
    }

    #[test]
    fn default_passphrase_roundtrip() {
        let creds = sample_credentials();
        let blob = encrypt_credentials(&creds).unwrap();
        assert_eq!(decrypt_credentials(&blob).unwrap(), creds);
    }
}
