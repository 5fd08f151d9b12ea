// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Brightside

//! Lighter Link - Wallet Linking & API Key Provisioning
//!
//! This crate implements the full link flow between an L1 wallet and the
//! Lighter venue: sub-account lookup by wallet address, API key pair
//! provisioning via the dual-signature change-pub-key transaction, and
//! hand-off of the resulting credentials to the companion mobile app as an
//! encrypted scannable code.
//!
//! ## Modules
//!
//! - `config` - Protocol constants and environment configuration
//! - `credentials` - Credential encryption and scannable-code rendering
//! - `provision` - The link state machine and provisioning pipeline
//! - `signer` - Venue-specific signing engine abstraction
//! - `venue` - Lighter REST client
//! - `wallet` - L1 wallet abstraction and local signer

pub mod config;
pub mod credentials;
pub mod models;
pub mod provision;
pub mod signer;
pub mod venue;
pub mod wallet;

pub use models::{ApiKeyPair, LighterCredentials, WalletAddress};
pub use provision::{LinkSession, LinkState, Orchestrator, ProvisionError};
pub use venue::{LighterClient, VenueApi, VenueError};
pub use wallet::{WalletError, WalletProvider};
