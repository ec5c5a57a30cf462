// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! OpenShift types

use super::common::Timestamp;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A configured OpenShift cluster (connection details are never exposed)
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Cluster {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ClusterListResponse {
    pub clusters: Vec<Cluster>,
}

/// Query parameter selecting a cluster
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ClusterQuery {
    #[serde(default)]
    pub clusterid: Option<String>,
}

/// Path parameter for project operations
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ProjectPath {
    pub project: String,
}

/// OpenShift project as seen by its requester
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Project {
    pub name: String,
    pub requester: String,
    /// Accounting element the project is billed to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub megaid: Option<String>,
    pub created: Timestamp,
    /// Project phase (Active, Terminating)
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ProjectListResponse {
    pub projects: Vec<Project>,
}
