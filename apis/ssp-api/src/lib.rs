// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Self-service portal (SSP) API trait definition
//!
//! The SSP backend gives portal users a small, uniform JSON surface over a
//! handful of infrastructure providers:
//! - OTC (OpenStack): elastic cloud servers, flavors, images, volumes, RDS
//! - OpenShift: clusters and projects
//! - Sematext: monitoring apps and plans
//! - Ansible Tower: job templates and jobs
//!
//! Everything under `/api/` requires a Keycloak bearer token. The feature
//! toggle endpoint is public so the frontend can decide what to render before
//! the user logs in.
//!
//! CORS headers are not produced by the service; Dropshot has no middleware
//! layer, so they are added by the fronting reverse proxy.

use dropshot::{Body, HttpError, HttpResponseOk, Path, Query, RequestContext, TypedBody};
use http::Response;

pub mod types;
pub use types::*;

/// SSP API trait definition
#[dropshot::api_description]
pub trait SspApi {
    /// Context type for request handlers
    type Context: Send + Sync + 'static;

    // ========================================================================
    // Public Endpoints
    // ========================================================================

    /// Get feature toggles
    ///
    /// Merges the capability flags of every provider into one response.
    /// Never fails; a provider that cannot answer reports all flags false.
    #[endpoint {
        method = GET,
        path = "/features",
        tags = ["features"],
    }]
    async fn get_features(
        rqctx: RequestContext<Self::Context>,
        query: Query<FeaturesQuery>,
    ) -> Result<HttpResponseOk<FeatureToggleResponse>, HttpError>;

    // ========================================================================
    // OTC Endpoints
    // ========================================================================

    /// List the caller's elastic cloud servers
    #[endpoint {
        method = GET,
        path = "/api/otc/ecs",
        tags = ["otc"],
    }]
    async fn list_ecs(
        rqctx: RequestContext<Self::Context>,
    ) -> Result<HttpResponseOk<EcsServerListResponse>, HttpError>;

    /// Stop elastic cloud servers
    #[endpoint {
        method = POST,
        path = "/api/otc/stopecs",
        tags = ["otc"],
    }]
    async fn stop_ecs(
        rqctx: RequestContext<Self::Context>,
        body: TypedBody<EcsActionRequest>,
    ) -> Result<HttpResponseOk<MessageResponse>, HttpError>;

    /// Start elastic cloud servers
    #[endpoint {
        method = POST,
        path = "/api/otc/startecs",
        tags = ["otc"],
    }]
    async fn start_ecs(
        rqctx: RequestContext<Self::Context>,
        body: TypedBody<EcsActionRequest>,
    ) -> Result<HttpResponseOk<MessageResponse>, HttpError>;

    /// Reboot elastic cloud servers (soft reboot)
    #[endpoint {
        method = POST,
        path = "/api/otc/rebootecs",
        tags = ["otc"],
    }]
    async fn reboot_ecs(
        rqctx: RequestContext<Self::Context>,
        body: TypedBody<EcsActionRequest>,
    ) -> Result<HttpResponseOk<MessageResponse>, HttpError>;

    /// List compute flavors
    #[endpoint {
        method = GET,
        path = "/api/otc/flavors",
        tags = ["otc"],
    }]
    async fn list_flavors(
        rqctx: RequestContext<Self::Context>,
    ) -> Result<HttpResponseOk<FlavorListResponse>, HttpError>;

    /// List images
    #[endpoint {
        method = GET,
        path = "/api/otc/images",
        tags = ["otc"],
    }]
    async fn list_images(
        rqctx: RequestContext<Self::Context>,
    ) -> Result<HttpResponseOk<ImageListResponse>, HttpError>;

    /// List availability zones
    #[endpoint {
        method = GET,
        path = "/api/otc/availabilityzones",
        tags = ["otc"],
    }]
    async fn list_availability_zones(
        rqctx: RequestContext<Self::Context>,
    ) -> Result<HttpResponseOk<AvailabilityZoneListResponse>, HttpError>;

    /// List block storage volume types
    #[endpoint {
        method = GET,
        path = "/api/otc/volumetypes",
        tags = ["otc"],
    }]
    async fn list_volume_types(
        rqctx: RequestContext<Self::Context>,
    ) -> Result<HttpResponseOk<VolumeTypeListResponse>, HttpError>;

    /// List RDS datastore versions
    #[endpoint {
        method = GET,
        path = "/api/otc/rds/versions",
        tags = ["otc", "rds"],
    }]
    async fn list_rds_versions(
        rqctx: RequestContext<Self::Context>,
        query: Query<RdsVersionsQuery>,
    ) -> Result<HttpResponseOk<RdsVersionListResponse>, HttpError>;

    /// List RDS flavors for a datastore version
    #[endpoint {
        method = GET,
        path = "/api/otc/rds/flavors",
        tags = ["otc", "rds"],
    }]
    async fn list_rds_flavors(
        rqctx: RequestContext<Self::Context>,
        query: Query<RdsFlavorsQuery>,
    ) -> Result<HttpResponseOk<RdsFlavorListResponse>, HttpError>;

    /// List RDS instances
    #[endpoint {
        method = GET,
        path = "/api/otc/rds/instances",
        tags = ["otc", "rds"],
    }]
    async fn list_rds_instances(
        rqctx: RequestContext<Self::Context>,
    ) -> Result<HttpResponseOk<RdsInstanceListResponse>, HttpError>;

    // ========================================================================
    // OpenShift Endpoints
    // ========================================================================

    /// List configured OpenShift clusters
    #[endpoint {
        method = GET,
        path = "/api/ose/clusters",
        tags = ["openshift"],
    }]
    async fn list_clusters(
        rqctx: RequestContext<Self::Context>,
    ) -> Result<HttpResponseOk<ClusterListResponse>, HttpError>;

    /// List the caller's projects on a cluster
    #[endpoint {
        method = GET,
        path = "/api/ose/projects",
        tags = ["openshift"],
    }]
    async fn list_projects(
        rqctx: RequestContext<Self::Context>,
        query: Query<ClusterQuery>,
    ) -> Result<HttpResponseOk<ProjectListResponse>, HttpError>;

    /// Describe one of the caller's projects
    #[endpoint {
        method = GET,
        path = "/api/ose/projects/{project}",
        tags = ["openshift"],
    }]
    async fn get_project(
        rqctx: RequestContext<Self::Context>,
        path: Path<ProjectPath>,
        query: Query<ClusterQuery>,
    ) -> Result<HttpResponseOk<Project>, HttpError>;

    // ========================================================================
    // Sematext Endpoints
    // ========================================================================

    /// List the caller's Sematext apps
    #[endpoint {
        method = GET,
        path = "/api/sematext/apps",
        tags = ["sematext"],
    }]
    async fn list_sematext_apps(
        rqctx: RequestContext<Self::Context>,
    ) -> Result<HttpResponseOk<SematextAppListResponse>, HttpError>;

    /// List Sematext plans for an app type
    #[endpoint {
        method = GET,
        path = "/api/sematext/plans",
        tags = ["sematext"],
    }]
    async fn list_sematext_plans(
        rqctx: RequestContext<Self::Context>,
        query: Query<SematextPlansQuery>,
    ) -> Result<HttpResponseOk<SematextPlanListResponse>, HttpError>;

    // ========================================================================
    // Ansible Tower Endpoints
    // ========================================================================

    /// List the job templates portal users may launch
    #[endpoint {
        method = GET,
        path = "/api/tower/jobtemplates",
        tags = ["tower"],
    }]
    async fn list_job_templates(
        rqctx: RequestContext<Self::Context>,
    ) -> Result<HttpResponseOk<JobTemplateListResponse>, HttpError>;

    /// Launch a job template on behalf of the caller
    #[endpoint {
        method = POST,
        path = "/api/tower/jobtemplates/{id}/launch",
        tags = ["tower"],
    }]
    async fn launch_job_template(
        rqctx: RequestContext<Self::Context>,
        path: Path<NumericIdPath>,
        body: TypedBody<LaunchJobRequest>,
    ) -> Result<HttpResponseOk<LaunchJobResponse>, HttpError>;

    /// Describe a job the caller launched
    #[endpoint {
        method = GET,
        path = "/api/tower/jobs/{id}",
        tags = ["tower"],
    }]
    async fn get_job(
        rqctx: RequestContext<Self::Context>,
        path: Path<NumericIdPath>,
    ) -> Result<HttpResponseOk<Job>, HttpError>;

    /// Plain-text output of a job the caller launched
    #[endpoint {
        method = GET,
        path = "/api/tower/jobs/{id}/stdout",
        tags = ["tower"],
    }]
    async fn get_job_stdout(
        rqctx: RequestContext<Self::Context>,
        path: Path<NumericIdPath>,
    ) -> Result<Response<Body>, HttpError>;
}
