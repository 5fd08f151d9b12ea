// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Brightside

//! # Lighter Venue API Client
//!
//! Stateless HTTP client for the three venue operations the link flow
//! needs: sub-account lookup by L1 address, next-nonce fetch, and signed
//! transaction submission. Every call is an independent request with no
//! built-in retry; retries are the orchestrator's responsibility.

pub mod client;
pub mod types;

pub use client::{LighterClient, VenueApi, VenueError};
pub use types::{is_accepted_code, SendTxResponse, SubAccount};
