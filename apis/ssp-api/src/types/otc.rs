// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! OTC (OpenStack) types: elastic cloud servers, images, volumes, RDS

use super::common::Timestamp;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ============================================================================
// Elastic Cloud Servers
// ============================================================================

/// Elastic cloud server owned by the caller
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EcsServer {
    pub id: String,
    pub name: String,
    /// Compute status (ACTIVE, SHUTOFF, REBOOT, ...)
    pub status: String,
    pub created: Timestamp,
    pub flavor_id: String,
    /// Flavor name, when compute reports it inline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flavor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_zone: Option<String>,
    /// All fixed and floating addresses, across networks
    pub ip_addresses: Vec<String>,
}

/// Response for the server list endpoint
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct EcsServerListResponse {
    pub servers: Vec<EcsServer>,
}

/// Reference to a server in an action request
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EcsServerRef {
    pub id: String,
    /// Display name, used in messages only
    #[serde(default)]
    pub name: String,
}

/// Body for stop/start/reboot requests
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct EcsActionRequest {
    pub servers: Vec<EcsServerRef>,
}

/// Compute flavor
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Flavor {
    pub id: String,
    pub name: String,
    pub vcpus: u32,
    /// RAM in MB
    pub ram: u64,
    /// Root disk in GB
    pub disk: u64,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct FlavorListResponse {
    pub flavors: Vec<Flavor>,
}

/// Image available for new servers
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Image {
    pub id: String,
    pub name: String,
    pub status: String,
    pub visibility: String,
    /// Minimum disk in GB
    pub min_disk: u64,
    /// Minimum RAM in MB
    pub min_ram: u64,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ImageListResponse {
    pub images: Vec<Image>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct AvailabilityZoneListResponse {
    pub availability_zones: Vec<String>,
}

/// Block storage volume type
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct VolumeType {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct VolumeTypeListResponse {
    pub volume_types: Vec<VolumeType>,
}

// ============================================================================
// RDS
// ============================================================================

/// Database engines offered by RDS
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum RdsDatastore {
    MySQL,
    PostgreSQL,
    SQLServer,
}

impl RdsDatastore {
    pub fn as_str(&self) -> &'static str {
        match self {
            RdsDatastore::MySQL => "MySQL",
            RdsDatastore::PostgreSQL => "PostgreSQL",
            RdsDatastore::SQLServer => "SQLServer",
        }
    }
}

impl std::str::FromStr for RdsDatastore {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MySQL" => Ok(RdsDatastore::MySQL),
            "PostgreSQL" => Ok(RdsDatastore::PostgreSQL),
            "SQLServer" => Ok(RdsDatastore::SQLServer),
            other => Err(format!("unknown datastore: {}", other)),
        }
    }
}

impl std::fmt::Display for RdsDatastore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query parameters for the RDS version list.
///
/// The datastore is kept as a plain string so that an unknown engine is
/// reported with the portal's own error message rather than a schema error.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct RdsVersionsQuery {
    #[serde(default)]
    pub datastore: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RdsVersion {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct RdsVersionListResponse {
    pub versions: Vec<RdsVersion>,
}

/// Query parameters for the RDS flavor list
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct RdsFlavorsQuery {
    /// Datastore version id as returned by the version list
    #[serde(default)]
    pub version_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RdsFlavor {
    pub id: String,
    pub name: String,
    pub spec_code: String,
    /// RAM in GB
    pub ram: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vcpus: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct RdsFlavorListResponse {
    pub flavors: Vec<RdsFlavor>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RdsInstance {
    pub id: String,
    pub name: String,
    pub status: String,
    pub datastore_type: String,
    pub datastore_version: String,
    pub flavor_id: String,
    /// Volume size in GB
    pub volume_size: u64,
    pub created: Timestamp,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct RdsInstanceListResponse {
    pub instances: Vec<RdsInstance>,
}
