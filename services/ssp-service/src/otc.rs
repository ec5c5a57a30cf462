// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! OTC operations: elastic cloud servers, catalog data and RDS

use keycloak_auth::AuthenticatedUser;
use openstack_client::{Server, ServerAction};
use ssp_api::{
    AvailabilityZoneListResponse, EcsActionRequest, EcsServer, EcsServerListResponse, Flavor,
    FlavorListResponse, Image, ImageListResponse, MessageResponse, RdsDatastore, RdsFlavor,
    RdsFlavorListResponse, RdsInstance, RdsInstanceListResponse, RdsVersion,
    RdsVersionListResponse, VolumeType, VolumeTypeListResponse,
};

use crate::context::ApiContext;
use crate::error::SspError;

fn to_ecs_server(server: Server) -> EcsServer {
    let ip_addresses = server.ip_addresses();
    let image_id = server.image_id().map(str::to_string);
    EcsServer {
        flavor_id: server
            .flavor
            .id
            .clone()
            .or_else(|| server.flavor.original_name.clone())
            .unwrap_or_default(),
        flavor_name: server.flavor.original_name,
        image_id,
        availability_zone: server.availability_zone,
        created: server.created.to_rfc3339(),
        id: server.id,
        name: server.name,
        status: server.status,
        ip_addresses,
    }
}

impl ApiContext {
    /// Servers whose `owner` metadata names the caller
    pub async fn list_ecs(&self, user: &AuthenticatedUser) -> Result<EcsServerListResponse, SspError> {
        let compute = self.otc()?.compute.compute().await?;
        let servers = compute
            .list_servers_detail()
            .await?
            .into_iter()
            .filter(|s| s.is_owned_by(&user.username))
            .map(to_ecs_server)
            .collect();

        Ok(EcsServerListResponse { servers })
    }

    /// Apply `action` to every requested server.
    ///
    /// Ownership of all servers is checked before any action is sent, so a
    /// request naming a foreign server changes nothing.
    pub async fn ecs_action(
        &self,
        user: &AuthenticatedUser,
        request: EcsActionRequest,
        action: ServerAction,
    ) -> Result<MessageResponse, SspError> {
        if request.servers.is_empty() {
            return Err(SspError::WrongApiUsage("no servers given".to_string()));
        }
        if request.servers.iter().any(|s| s.id.trim().is_empty()) {
            return Err(SspError::WrongApiUsage("server without id".to_string()));
        }

        let compute = self.otc()?.compute.compute().await?;

        let mut names = Vec::with_capacity(request.servers.len());
        for requested in &request.servers {
            let server = compute.get_server(&requested.id).await?;
            if !server.is_owned_by(&user.username) {
                tracing::warn!(
                    user = %user.username,
                    server = %server.id,
                    action = ?action,
                    "refusing action on foreign server"
                );
                return Err(SspError::NotOwner(server.name));
            }
            names.push(server.name);
        }

        for requested in &request.servers {
            compute.server_action(&requested.id, action).await?;
        }

        tracing::info!(user = %user.username, servers = ?names, action = ?action, "server action sent");
        Ok(MessageResponse {
            message: format!("Servers {} {}", names.join(", "), action.verb()),
        })
    }

    /// Compute flavors, smallest first
    pub async fn list_flavors(&self) -> Result<FlavorListResponse, SspError> {
        let compute = self.otc()?.compute.compute().await?;
        let mut flavors: Vec<Flavor> = compute
            .list_flavors()
            .await?
            .into_iter()
            .map(|f| Flavor {
                id: f.id,
                name: f.name,
                vcpus: f.vcpus,
                ram: f.ram,
                disk: f.disk,
            })
            .collect();
        flavors.sort_by(|a, b| {
            a.vcpus
                .cmp(&b.vcpus)
                .then(a.ram.cmp(&b.ram))
                .then_with(|| a.name.cmp(&b.name))
        });

        Ok(FlavorListResponse { flavors })
    }

    pub async fn list_images(&self) -> Result<ImageListResponse, SspError> {
        let image = self.otc()?.compute.image().await?;
        let mut images: Vec<Image> = image
            .list_images()
            .await?
            .into_iter()
            .map(|i| Image {
                id: i.id,
                name: i.name.unwrap_or_default(),
                status: i.status,
                visibility: i.visibility,
                min_disk: i.min_disk,
                min_ram: i.min_ram,
            })
            .collect();
        images.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(ImageListResponse { images })
    }

    /// Names of zones that currently accept servers
    pub async fn list_availability_zones(&self) -> Result<AvailabilityZoneListResponse, SspError> {
        let compute = self.otc()?.compute.compute().await?;
        let availability_zones = compute
            .list_availability_zones()
            .await?
            .into_iter()
            .filter(|z| z.state.available)
            .map(|z| z.name)
            .collect();

        Ok(AvailabilityZoneListResponse { availability_zones })
    }

    pub async fn list_volume_types(&self) -> Result<VolumeTypeListResponse, SspError> {
        let storage = self.otc()?.compute.block_storage().await?;
        let volume_types = storage
            .list_volume_types()
            .await?
            .into_iter()
            .map(|v| VolumeType {
                id: v.id,
                name: v.name,
                description: v.description.filter(|d| !d.is_empty()),
            })
            .collect();

        Ok(VolumeTypeListResponse { volume_types })
    }

    pub async fn list_rds_versions(
        &self,
        datastore: Option<&str>,
    ) -> Result<RdsVersionListResponse, SspError> {
        let datastore: RdsDatastore = datastore
            .unwrap_or_default()
            .parse()
            .map_err(SspError::WrongApiUsage)?;

        let rds = self.otc()?.rds.rds().await?;
        let versions = rds
            .list_versions(datastore.as_str())
            .await?
            .into_iter()
            .map(|v| RdsVersion {
                id: v.id,
                name: v.name,
            })
            .collect();

        Ok(RdsVersionListResponse { versions })
    }

    pub async fn list_rds_flavors(
        &self,
        version_id: Option<&str>,
    ) -> Result<RdsFlavorListResponse, SspError> {
        let version_id = version_id
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| SspError::WrongApiUsage("version_id is required".to_string()))?;

        let rds = self.otc()?.rds.rds().await?;
        let flavors = rds
            .list_flavors(version_id)
            .await?
            .into_iter()
            .map(|f| RdsFlavor {
                vcpus: f.vcpus(),
                id: f.id,
                name: f.name,
                spec_code: f.spec_code,
                ram: f.ram,
            })
            .collect();

        Ok(RdsFlavorListResponse { flavors })
    }

    pub async fn list_rds_instances(&self) -> Result<RdsInstanceListResponse, SspError> {
        let rds = self.otc()?.rds.rds().await?;
        let instances = rds
            .list_instances()
            .await?
            .into_iter()
            .map(|i| RdsInstance {
                id: i.id,
                name: i.name,
                status: i.status,
                datastore_type: i.datastore.kind,
                datastore_version: i.datastore.version,
                flavor_id: i.flavor.id,
                volume_size: i.volume.size,
                created: i.created,
            })
            .collect();

        Ok(RdsInstanceListResponse { instances })
    }
}
