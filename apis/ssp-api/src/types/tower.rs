// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Ansible Tower types

use super::common::Timestamp;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct JobTemplate {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct JobTemplateListResponse {
    pub job_templates: Vec<JobTemplate>,
}

/// Body for launching a job template
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct LaunchJobRequest {
    /// Variables handed to the playbook
    #[serde(default)]
    pub extra_vars: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct LaunchJobResponse {
    pub job_id: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Job {
    pub id: u64,
    pub name: String,
    /// pending, waiting, running, successful, failed, error, canceled
    pub status: String,
    pub failed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished: Option<Timestamp>,
}
