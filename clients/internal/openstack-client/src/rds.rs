// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! OTC relational database service (RDS v1) calls

use serde::Deserialize;
use url::Url;

use crate::ServiceClient;
use crate::error::OpenStackError;

#[derive(Debug, Clone, Deserialize)]
pub struct RdsVersion {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RdsFlavor {
    pub id: String,
    pub name: String,
    #[serde(rename = "specCode", default)]
    pub spec_code: String,
    /// MiB
    #[serde(default)]
    pub ram: u64,
    #[serde(rename = "flavorDetail", default)]
    pub details: Vec<FlavorDetail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FlavorDetail {
    pub name: String,
    pub value: String,
}

impl RdsFlavor {
    /// CPU count from the `cpu` detail entry, when present and numeric
    pub fn vcpus(&self) -> Option<u32> {
        self.details
            .iter()
            .find(|d| d.name == "cpu")
            .and_then(|d| d.value.trim().parse().ok())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RdsInstance {
    pub id: String,
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub created: String,
    #[serde(alias = "dataStoreInfo")]
    pub datastore: RdsDatastoreInfo,
    pub flavor: RdsRef,
    pub volume: RdsVolume,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RdsDatastoreInfo {
    #[serde(rename = "type")]
    pub kind: String,
    pub version: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RdsRef {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RdsVolume {
    /// GiB
    pub size: u64,
}

#[derive(Deserialize)]
struct VersionsEnvelope {
    #[serde(rename = "dataStores")]
    versions: Vec<RdsVersion>,
}

#[derive(Deserialize)]
struct FlavorsEnvelope {
    flavors: Vec<RdsFlavor>,
}

#[derive(Deserialize)]
struct InstancesEnvelope {
    instances: Vec<RdsInstance>,
}

pub struct RdsClient {
    inner: ServiceClient,
    region: String,
}

impl RdsClient {
    pub fn new(inner: ServiceClient, region: impl Into<String>) -> Self {
        Self {
            inner,
            region: region.into(),
        }
    }

    /// Versions offered for a datastore such as `MySQL`
    pub async fn list_versions(&self, datastore: &str) -> Result<Vec<RdsVersion>, OpenStackError> {
        let path = format!("datastores/{}/versions", urlencoding::encode(datastore));
        let envelope: VersionsEnvelope = self.inner.get_json(&path).await?;
        Ok(envelope.versions)
    }

    /// Flavors available for one datastore version
    pub async fn list_flavors(&self, version_id: &str) -> Result<Vec<RdsFlavor>, OpenStackError> {
        let mut url = Url::parse(&self.inner.url("flavors"))?;
        url.query_pairs_mut()
            .append_pair("dbId", version_id)
            .append_pair("region", &self.region);
        let envelope: FlavorsEnvelope = self.inner.get_json_url(url.as_str()).await?;
        Ok(envelope.flavors)
    }

    pub async fn list_instances(&self) -> Result<Vec<RdsInstance>, OpenStackError> {
        let envelope: InstancesEnvelope = self.inner.get_json("instances").await?;
        Ok(envelope.instances)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flavor_vcpus_from_details() {
        let flavor: RdsFlavor = serde_json::from_value(json!({
            "id": "f1",
            "name": "rds.mysql.s1.medium",
            "specCode": "rds.mysql.s1.medium",
            "ram": 4096,
            "flavorDetail": [{"name": "mem", "value": "4"}, {"name": "cpu", "value": "1"}]
        }))
        .unwrap();
        assert_eq!(flavor.vcpus(), Some(1));

        let bare: RdsFlavor = serde_json::from_value(json!({"id": "f2", "name": "x"})).unwrap();
        assert_eq!(bare.vcpus(), None);
        assert_eq!(bare.spec_code, "");
    }

    #[test]
    fn test_instance_accepts_either_datastore_key() {
        for key in ["dataStoreInfo", "datastore"] {
            let mut raw = json!({
                "id": "i1",
                "name": "orders-db",
                "status": "ACTIVE",
                "created": "2026-02-11T08:00:00+0000",
                "flavor": {"id": "f1"},
                "volume": {"size": 100}
            });
            raw[key] = json!({"type": "MySQL", "version": "8.0"});
            let instance: RdsInstance = serde_json::from_value(raw).unwrap();
            assert_eq!(instance.datastore.kind, "MySQL");
            assert_eq!(instance.volume.size, 100);
        }
    }
}
