// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Brightside

//! # Provisioning Flow
//!
//! The state machine that links a connected wallet to a Lighter account and
//! provisions an API key pair for it, plus the session layer that surfaces
//! its state and hands the resulting credentials off as an encrypted
//! scannable code.

pub mod orchestrator;
pub mod session;

pub use orchestrator::{LinkState, Orchestrator, ProvisionError};
pub use session::LinkSession;
