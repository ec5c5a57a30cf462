// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Feature toggle types

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Query parameters for the feature toggle endpoint
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct FeaturesQuery {
    /// OpenShift cluster the frontend is currently looking at
    #[serde(default)]
    pub clusterid: Option<String>,
}

/// Capabilities of the selected OpenShift cluster
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct OpenshiftFeatures {
    /// NFS volumes can be ordered on this cluster
    pub nfs: bool,
}

/// DDC capabilities
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DdcFeatures {
    pub enabled: bool,
}

/// OTC capabilities
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct OtcFeatures {
    /// Elastic cloud servers can be managed
    pub ecs: bool,
    /// RDS database instances can be browsed
    pub rds: bool,
}

/// Merged feature flags of all providers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FeatureToggleResponse {
    pub openshift: OpenshiftFeatures,
    pub ddc: DdcFeatures,
    pub otc: OtcFeatures,
}
