// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Cinder (block storage) calls

use serde::Deserialize;

use crate::ServiceClient;
use crate::error::OpenStackError;

#[derive(Debug, Clone, Deserialize)]
pub struct VolumeType {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Deserialize)]
struct VolumeTypesEnvelope {
    volume_types: Vec<VolumeType>,
}

pub struct BlockStorageClient {
    inner: ServiceClient,
}

impl BlockStorageClient {
    pub fn new(inner: ServiceClient) -> Self {
        Self { inner }
    }

    pub async fn list_volume_types(&self) -> Result<Vec<VolumeType>, OpenStackError> {
        let envelope: VolumeTypesEnvelope = self.inner.get_json("types").await?;
        Ok(envelope.volume_types)
    }
}
