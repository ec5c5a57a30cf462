// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Sematext monitoring types

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Default app type for plan listings
pub const DEFAULT_SEMATEXT_APP_TYPE: &str = "Logsene";

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SematextApp {
    pub id: u64,
    pub name: String,
    /// Logsene, Spm, Rum, ...
    pub app_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_name: Option<String>,
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SematextAppListResponse {
    pub apps: Vec<SematextApp>,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct SematextPlansQuery {
    /// Defaults to `Logsene`
    #[serde(default)]
    pub app_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SematextPlan {
    pub id: u64,
    pub name: String,
    pub price_per_month: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_daily_max_limit_mb: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SematextPlanListResponse {
    pub plans: Vec<SematextPlan>,
}
