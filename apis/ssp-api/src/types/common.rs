// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Common types used across the SSP API

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// RFC3339 timestamp, passed through from the provider unchanged
pub type Timestamp = String;

/// Generic acknowledgement returned by state-changing endpoints
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MessageResponse {
    /// Human-readable summary of what was done
    pub message: String,
}

/// Path parameter for numeric provider ids (Tower templates and jobs)
#[derive(Debug, Deserialize, JsonSchema)]
pub struct NumericIdPath {
    pub id: u64,
}
