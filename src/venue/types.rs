// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Brightside

//! Venue wire types and the embedded response-code policy.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::{VENUE_CODE_ACCEPTED_THRESHOLD, VENUE_CODE_OK};

/// One venue sub-account owned by an L1 address.
///
/// Only the index matters to the link flow; the rest of the record is
/// carried opaquely.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubAccount {
    /// Venue account index.
    pub index: i64,
    /// Remaining venue-defined fields, passed through untouched.
    #[serde(flatten)]
    pub raw: Map<String, Value>,
}

/// `GET /api/v1/accountsByL1Address` response.
#[derive(Debug, Deserialize)]
pub struct AccountsByL1AddressResponse {
    pub code: Option<i64>,
    pub l1_address: Option<String>,
    #[serde(default)]
    pub sub_accounts: Vec<SubAccount>,
}

/// `GET /api/v1/nextNonce` response.
#[derive(Debug, Deserialize)]
pub struct NextNonceResponse {
    pub nonce: i64,
}

/// `POST /api/v1/sendTx` response.
#[derive(Debug, Clone, Deserialize)]
pub struct SendTxResponse {
    /// Embedded application-level status code.
    pub code: Option<i64>,
    /// Venue error description, when present.
    pub error: Option<String>,
    /// Venue message, sometimes used instead of `error`.
    pub message: Option<String>,
    /// Remaining venue-defined fields.
    #[serde(flatten)]
    pub raw: Map<String, Value>,
}

impl SendTxResponse {
    /// Best-effort human-readable failure description from the body.
    pub fn failure_detail(&self) -> Option<&str> {
        self.error.as_deref().or(self.message.as_deref())
    }
}

/// Whether an embedded response code counts as accepted.
///
/// The venue may answer HTTP 200 with an embedded failure code, so HTTP
/// status alone is not trusted. Accepted: code absent, the success
/// sentinel, or anything in the high "accepted/pending" range.
pub fn is_accepted_code(code: Option<i64>) -> bool {
    match code {
        None => true,
        Some(c) => c == VENUE_CODE_OK || c >= VENUE_CODE_ACCEPTED_THRESHOLD,
    }
}
