// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Self-service portal backend
//!
//! Implements [`SspApi`] on top of [`ApiContext`]. Every `/api/` handler
//! authenticates the caller first and then delegates to the provider module
//! for its route group:
//!
//! - [`otc`]: elastic cloud servers, catalog data and RDS
//! - [`openshift`]: clusters and projects
//! - [`sematext`]: apps and plans
//! - [`tower`]: job templates and jobs
//!
//! `/features` is public and served from the [`features`] aggregator.

pub mod config;
pub mod context;
pub mod error;
pub mod features;
pub mod openshift;
pub mod otc;
pub mod sematext;
pub mod tower;

use dropshot::{
    ApiDescription, Body, HttpError, HttpResponseOk, Path, Query, RequestContext, TypedBody,
};
use http::{Response, header};
use openstack_client::ServerAction;
use ssp_api::*;

pub use crate::config::SspConfig;
pub use crate::context::ApiContext;
pub use crate::error::SspError;

/// SSP API implementation
pub enum SspServiceImpl {}

/// The full API, ready to hand to a Dropshot server
pub fn api_description() -> Result<ApiDescription<ApiContext>, anyhow::Error> {
    ssp_api::ssp_api_mod::api_description::<SspServiceImpl>()
        .map_err(|e| anyhow::anyhow!("Failed to create API description: {}", e))
}

async fn ecs_action(
    rqctx: RequestContext<ApiContext>,
    body: TypedBody<EcsActionRequest>,
    action: ServerAction,
    operation: &'static str,
) -> Result<HttpResponseOk<MessageResponse>, HttpError> {
    let ctx = rqctx.context();
    let user = ctx.authenticate(rqctx.request.headers()).await?;

    let message = ctx
        .ecs_action(&user, body.into_inner(), action)
        .await
        .map_err(|e| e.logged(operation))?;

    Ok(HttpResponseOk(message))
}

impl SspApi for SspServiceImpl {
    type Context = ApiContext;

    async fn get_features(
        rqctx: RequestContext<Self::Context>,
        query: Query<FeaturesQuery>,
    ) -> Result<HttpResponseOk<FeatureToggleResponse>, HttpError> {
        let ctx = rqctx.context();
        Ok(HttpResponseOk(ctx.features().collect(&query.into_inner())))
    }

    // ------------------------------------------------------------------------
    // OTC
    // ------------------------------------------------------------------------

    async fn list_ecs(
        rqctx: RequestContext<Self::Context>,
    ) -> Result<HttpResponseOk<EcsServerListResponse>, HttpError> {
        let ctx = rqctx.context();
        let user = ctx.authenticate(rqctx.request.headers()).await?;

        let servers = ctx
            .list_ecs(&user)
            .await
            .map_err(|e| e.logged("list_ecs"))?;

        Ok(HttpResponseOk(servers))
    }

    async fn stop_ecs(
        rqctx: RequestContext<Self::Context>,
        body: TypedBody<EcsActionRequest>,
    ) -> Result<HttpResponseOk<MessageResponse>, HttpError> {
        ecs_action(rqctx, body, ServerAction::Stop, "stop_ecs").await
    }

    async fn start_ecs(
        rqctx: RequestContext<Self::Context>,
        body: TypedBody<EcsActionRequest>,
    ) -> Result<HttpResponseOk<MessageResponse>, HttpError> {
        ecs_action(rqctx, body, ServerAction::Start, "start_ecs").await
    }

    async fn reboot_ecs(
        rqctx: RequestContext<Self::Context>,
        body: TypedBody<EcsActionRequest>,
    ) -> Result<HttpResponseOk<MessageResponse>, HttpError> {
        ecs_action(rqctx, body, ServerAction::Reboot, "reboot_ecs").await
    }

    async fn list_flavors(
        rqctx: RequestContext<Self::Context>,
    ) -> Result<HttpResponseOk<FlavorListResponse>, HttpError> {
        let ctx = rqctx.context();
        ctx.authenticate(rqctx.request.headers()).await?;

        let flavors = ctx
            .list_flavors()
            .await
            .map_err(|e| e.logged("list_flavors"))?;

        Ok(HttpResponseOk(flavors))
    }

    async fn list_images(
        rqctx: RequestContext<Self::Context>,
    ) -> Result<HttpResponseOk<ImageListResponse>, HttpError> {
        let ctx = rqctx.context();
        ctx.authenticate(rqctx.request.headers()).await?;

        let images = ctx
            .list_images()
            .await
            .map_err(|e| e.logged("list_images"))?;

        Ok(HttpResponseOk(images))
    }

    async fn list_availability_zones(
        rqctx: RequestContext<Self::Context>,
    ) -> Result<HttpResponseOk<AvailabilityZoneListResponse>, HttpError> {
        let ctx = rqctx.context();
        ctx.authenticate(rqctx.request.headers()).await?;

        let zones = ctx
            .list_availability_zones()
            .await
            .map_err(|e| e.logged("list_availability_zones"))?;

        Ok(HttpResponseOk(zones))
    }

    async fn list_volume_types(
        rqctx: RequestContext<Self::Context>,
    ) -> Result<HttpResponseOk<VolumeTypeListResponse>, HttpError> {
        let ctx = rqctx.context();
        ctx.authenticate(rqctx.request.headers()).await?;

        let volume_types = ctx
            .list_volume_types()
            .await
            .map_err(|e| e.logged("list_volume_types"))?;

        Ok(HttpResponseOk(volume_types))
    }

    async fn list_rds_versions(
        rqctx: RequestContext<Self::Context>,
        query: Query<RdsVersionsQuery>,
    ) -> Result<HttpResponseOk<RdsVersionListResponse>, HttpError> {
        let ctx = rqctx.context();
        ctx.authenticate(rqctx.request.headers()).await?;
        let query = query.into_inner();

        let versions = ctx
            .list_rds_versions(query.datastore.as_deref())
            .await
            .map_err(|e| e.logged("list_rds_versions"))?;

        Ok(HttpResponseOk(versions))
    }

    async fn list_rds_flavors(
        rqctx: RequestContext<Self::Context>,
        query: Query<RdsFlavorsQuery>,
    ) -> Result<HttpResponseOk<RdsFlavorListResponse>, HttpError> {
        let ctx = rqctx.context();
        ctx.authenticate(rqctx.request.headers()).await?;
        let query = query.into_inner();

        let flavors = ctx
            .list_rds_flavors(query.version_id.as_deref())
            .await
            .map_err(|e| e.logged("list_rds_flavors"))?;

        Ok(HttpResponseOk(flavors))
    }

    async fn list_rds_instances(
        rqctx: RequestContext<Self::Context>,
    ) -> Result<HttpResponseOk<RdsInstanceListResponse>, HttpError> {
        let ctx = rqctx.context();
        ctx.authenticate(rqctx.request.headers()).await?;

        let instances = ctx
            .list_rds_instances()
            .await
            .map_err(|e| e.logged("list_rds_instances"))?;

        Ok(HttpResponseOk(instances))
    }

    // ------------------------------------------------------------------------
    // OpenShift
    // ------------------------------------------------------------------------

    async fn list_clusters(
        rqctx: RequestContext<Self::Context>,
    ) -> Result<HttpResponseOk<ClusterListResponse>, HttpError> {
        let ctx = rqctx.context();
        ctx.authenticate(rqctx.request.headers()).await?;
        Ok(HttpResponseOk(ctx.list_clusters()))
    }

    async fn list_projects(
        rqctx: RequestContext<Self::Context>,
        query: Query<ClusterQuery>,
    ) -> Result<HttpResponseOk<ProjectListResponse>, HttpError> {
        let ctx = rqctx.context();
        let user = ctx.authenticate(rqctx.request.headers()).await?;
        let query = query.into_inner();

        let projects = ctx
            .list_projects(&user, query.clusterid.as_deref())
            .await
            .map_err(|e| e.logged("list_projects"))?;

        Ok(HttpResponseOk(projects))
    }

    async fn get_project(
        rqctx: RequestContext<Self::Context>,
        path: Path<ProjectPath>,
        query: Query<ClusterQuery>,
    ) -> Result<HttpResponseOk<Project>, HttpError> {
        let ctx = rqctx.context();
        let user = ctx.authenticate(rqctx.request.headers()).await?;
        let project = path.into_inner().project;
        let query = query.into_inner();

        let project = ctx
            .get_project(&user, query.clusterid.as_deref(), &project)
            .await
            .map_err(|e| e.logged("get_project"))?;

        Ok(HttpResponseOk(project))
    }

    // ------------------------------------------------------------------------
    // Sematext
    // ------------------------------------------------------------------------

    async fn list_sematext_apps(
        rqctx: RequestContext<Self::Context>,
    ) -> Result<HttpResponseOk<SematextAppListResponse>, HttpError> {
        let ctx = rqctx.context();
        let user = ctx.authenticate(rqctx.request.headers()).await?;

        let apps = ctx
            .list_sematext_apps(&user)
            .await
            .map_err(|e| e.logged("list_sematext_apps"))?;

        Ok(HttpResponseOk(apps))
    }

    async fn list_sematext_plans(
        rqctx: RequestContext<Self::Context>,
        query: Query<SematextPlansQuery>,
    ) -> Result<HttpResponseOk<SematextPlanListResponse>, HttpError> {
        let ctx = rqctx.context();
        ctx.authenticate(rqctx.request.headers()).await?;
        let query = query.into_inner();

        let plans = ctx
            .list_sematext_plans(query.app_type.as_deref())
            .await
            .map_err(|e| e.logged("list_sematext_plans"))?;

        Ok(HttpResponseOk(plans))
    }

    // ------------------------------------------------------------------------
    // Ansible Tower
    // ------------------------------------------------------------------------

    async fn list_job_templates(
        rqctx: RequestContext<Self::Context>,
    ) -> Result<HttpResponseOk<JobTemplateListResponse>, HttpError> {
        let ctx = rqctx.context();
        ctx.authenticate(rqctx.request.headers()).await?;

        let templates = ctx
            .list_job_templates()
            .await
            .map_err(|e| e.logged("list_job_templates"))?;

        Ok(HttpResponseOk(templates))
    }

    async fn launch_job_template(
        rqctx: RequestContext<Self::Context>,
        path: Path<NumericIdPath>,
        body: TypedBody<LaunchJobRequest>,
    ) -> Result<HttpResponseOk<LaunchJobResponse>, HttpError> {
        let ctx = rqctx.context();
        let user = ctx.authenticate(rqctx.request.headers()).await?;
        let id = path.into_inner().id;

        let launched = ctx
            .launch_job_template(&user, id, body.into_inner())
            .await
            .map_err(|e| e.logged("launch_job_template"))?;

        Ok(HttpResponseOk(launched))
    }

    async fn get_job(
        rqctx: RequestContext<Self::Context>,
        path: Path<NumericIdPath>,
    ) -> Result<HttpResponseOk<Job>, HttpError> {
        let ctx = rqctx.context();
        let user = ctx.authenticate(rqctx.request.headers()).await?;
        let id = path.into_inner().id;

        let job = ctx
            .get_job(&user, id)
            .await
            .map_err(|e| e.logged("get_job"))?;

        Ok(HttpResponseOk(job))
    }

    async fn get_job_stdout(
        rqctx: RequestContext<Self::Context>,
        path: Path<NumericIdPath>,
    ) -> Result<Response<Body>, HttpError> {
        let ctx = rqctx.context();
        let user = ctx.authenticate(rqctx.request.headers()).await?;
        let id = path.into_inner().id;

        let stdout = ctx
            .get_job_stdout(&user, id)
            .await
            .map_err(|e| e.logged("get_job_stdout"))?;

        Response::builder()
            .status(200)
            .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(stdout.into())
            .map_err(|e| HttpError::for_internal_error(format!("Failed to build response: {}", e)))
    }
}
