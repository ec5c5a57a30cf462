// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Ansible Tower operations
//!
//! Jobs are tied to the portal user through the `custom_tower_user_name`
//! extra var, which the service sets on every launch. Jobs without it, or
//! with another user's name, are reported as not found.

use keycloak_auth::AuthenticatedUser;
use serde_json::Value;
use ssp_api::{Job, JobTemplate, JobTemplateListResponse, LaunchJobRequest, LaunchJobResponse};

use crate::context::ApiContext;
use crate::error::SspError;

/// Extra var naming the portal user that launched a job
pub const USER_NAME_VAR: &str = "custom_tower_user_name";

impl ApiContext {
    /// Allowed templates, in allowlist order
    pub async fn list_job_templates(&self) -> Result<JobTemplateListResponse, SspError> {
        let tower = self.tower()?;

        let mut job_templates = Vec::with_capacity(tower.policy.job_templates.len());
        for id in &tower.policy.job_templates {
            let t = tower.client.get_job_template(*id).await?;
            job_templates.push(JobTemplate {
                id: t.id,
                name: t.name,
                description: t.description,
            });
        }

        Ok(JobTemplateListResponse { job_templates })
    }

    pub async fn launch_job_template(
        &self,
        user: &AuthenticatedUser,
        template_id: u64,
        request: LaunchJobRequest,
    ) -> Result<LaunchJobResponse, SspError> {
        let tower = self.tower()?;

        if !tower.policy.allows_template(template_id) {
            return Err(SspError::TemplateNotAllowed);
        }
        if let Some(key) = tower.policy.blocked_parameter(request.extra_vars.keys()) {
            return Err(SspError::ParameterNotAllowed(key.to_string()));
        }

        let mut extra_vars = request.extra_vars;
        extra_vars.insert(
            USER_NAME_VAR.to_string(),
            Value::String(user.username.clone()),
        );

        let job_id = tower
            .client
            .launch_job_template(template_id, &extra_vars)
            .await?;
        tracing::info!(user = %user.username, template = template_id, job = job_id, "job launched");

        Ok(LaunchJobResponse { job_id })
    }

    /// A job the caller launched
    pub async fn get_job(&self, user: &AuthenticatedUser, job_id: u64) -> Result<Job, SspError> {
        let job = self.owned_job(user, job_id).await?;
        Ok(Job {
            id: job.id,
            name: job.name,
            status: job.status,
            failed: job.failed,
            started: job.started.map(|t| t.to_rfc3339()),
            finished: job.finished.map(|t| t.to_rfc3339()),
        })
    }

    pub async fn get_job_stdout(
        &self,
        user: &AuthenticatedUser,
        job_id: u64,
    ) -> Result<String, SspError> {
        self.owned_job(user, job_id).await?;
        Ok(self.tower()?.client.get_job_stdout(job_id).await?)
    }

    async fn owned_job(
        &self,
        user: &AuthenticatedUser,
        job_id: u64,
    ) -> Result<tower_client::Job, SspError> {
        let job = match self.tower()?.client.get_job(job_id).await {
            Ok(job) => job,
            Err(e) if e.status() == Some(404) => return Err(SspError::JobNotFound),
            Err(e) => return Err(e.into()),
        };

        match job.extra_var(USER_NAME_VAR) {
            Some(owner) if owner == user.username => Ok(job),
            _ => Err(SspError::JobNotFound),
        }
    }
}
