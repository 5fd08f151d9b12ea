// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Brightside

//! # Signing Module Adapter
//!
//! The Lighter signing engine is an opaque module loaded at runtime; this
//! crate treats it as a black box with a fixed function contract
//! (`GenerateAPIKey`, `CreateClient`, `SignChangePubKey`, each returning a
//! `{str?, err?}`-shaped result). [`SigningEngine`] models that contract and
//! [`SignerAdapter`] wraps it with lazy initialization, typed errors, and
//! response validation.

pub mod adapter;
pub mod engine;

pub use adapter::{SignedChangePubKey, SignerAdapter, L1_SIGNATURE_FIELD, MESSAGE_TO_SIGN_FIELD};
pub use engine::{EngineError, EngineOutput, EngineStatus, KeyGenOutput, SigningEngine};
