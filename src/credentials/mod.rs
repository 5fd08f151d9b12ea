// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Brightside

//! # Credential Hand-Off
//!
//! Symmetric encryption of the [`LighterCredentials`](crate::models::LighterCredentials)
//! record into an opaque transport string, and rendering of that string as a
//! scannable code for the companion mobile app. The blob is also suitable
//! for verbatim clipboard copy.

pub mod encryption;
pub mod qr;

pub use encryption::{decrypt_credentials, encrypt_credentials, CredentialError};
pub use qr::{render_visual_code, ErrorCorrection, VisualCodeOptions};
