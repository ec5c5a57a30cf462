// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! OpenShift operations

use keycloak_auth::AuthenticatedUser;
use openshift_client::{OpenshiftClient, OpenshiftError};
use ssp_api::{Cluster, ClusterListResponse, Project, ProjectListResponse};

use crate::context::ApiContext;
use crate::error::SspError;

fn to_project(project: openshift_client::Project) -> Project {
    Project {
        requester: project.requester().unwrap_or_default().to_string(),
        billing: project.billing().map(str::to_string),
        megaid: project.megaid().map(str::to_string),
        created: project
            .metadata
            .creation_timestamp
            .map(|t| t.to_rfc3339())
            .unwrap_or_default(),
        status: project.status.phase,
        name: project.metadata.name,
    }
}

impl ApiContext {
    fn cluster(&self, cluster_id: Option<&str>) -> Result<&OpenshiftClient, SspError> {
        cluster_id
            .and_then(|id| self.clusters.get(id))
            .ok_or(SspError::UnknownCluster)
    }

    /// Configured clusters, sorted by id
    pub fn list_clusters(&self) -> ClusterListResponse {
        let mut clusters: Vec<Cluster> = self
            .clusters
            .values()
            .map(|c| Cluster {
                id: c.cluster().id.clone(),
                name: c.cluster().name.clone(),
            })
            .collect();
        clusters.sort_by(|a, b| a.id.cmp(&b.id));
        ClusterListResponse { clusters }
    }

    /// Projects on the cluster requested by the caller
    pub async fn list_projects(
        &self,
        user: &AuthenticatedUser,
        cluster_id: Option<&str>,
    ) -> Result<ProjectListResponse, SspError> {
        let client = self.cluster(cluster_id)?;
        let mut projects: Vec<Project> = client
            .list_projects()
            .await?
            .into_iter()
            .filter(|p| p.is_requested_by(&user.username))
            .map(to_project)
            .collect();
        projects.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(ProjectListResponse { projects })
    }

    /// One project, visible only to the user who requested it
    pub async fn get_project(
        &self,
        user: &AuthenticatedUser,
        cluster_id: Option<&str>,
        name: &str,
    ) -> Result<Project, SspError> {
        let client = self.cluster(cluster_id)?;
        let project = match client.get_project(name).await {
            Ok(p) => p,
            Err(OpenshiftError::NotFound(_)) => return Err(SspError::ProjectNotFound),
            Err(e) => return Err(e.into()),
        };

        if !project.is_requested_by(&user.username) {
            return Err(SspError::ProjectNotFound);
        }
        Ok(to_project(project))
    }
}
