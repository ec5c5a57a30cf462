// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Ansible Tower (AWX) API v2 client
//!
//! Reads job templates and jobs, launches templates and fetches job output.
//! Requests use HTTP basic auth with a technical user.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use reqwest::header::{AUTHORIZATION, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TowerError {
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{method} {url} returned {status}: {body}")]
    Status {
        method: &'static str,
        url: String,
        status: u16,
        body: String,
    },

    #[error("Launch response carried no job id")]
    MissingJobId,
}

impl TowerError {
    pub fn status(&self) -> Option<u16> {
        match self {
            TowerError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobTemplate {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Job {
    pub id: u64,
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub failed: bool,
    #[serde(default)]
    pub started: Option<DateTime<Utc>>,
    #[serde(default)]
    pub finished: Option<DateTime<Utc>>,
    /// Tower serializes extra vars as a JSON (or YAML) string
    #[serde(default)]
    pub extra_vars: String,
}

impl Job {
    /// A string-valued entry of the job's extra vars. Vars that are not a
    /// JSON object yield `None`.
    pub fn extra_var(&self, key: &str) -> Option<String> {
        let vars: Map<String, Value> = serde_json::from_str(&self.extra_vars).ok()?;
        vars.get(key).and_then(Value::as_str).map(str::to_string)
    }
}

#[derive(Deserialize)]
struct LaunchResponse {
    #[serde(default)]
    job: Option<u64>,
    #[serde(default)]
    id: Option<u64>,
}

#[derive(Clone)]
pub struct TowerClient {
    http: reqwest::Client,
    base_url: String,
    auth: HeaderValue,
}

impl TowerClient {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        username: &str,
        password: &SecretString,
    ) -> Result<Self, TowerError> {
        let credentials = format!("{}:{}", username, password.expose_secret());
        let mut auth = HeaderValue::from_str(&format!("Basic {}", STANDARD.encode(credentials)))
            .map_err(|e| TowerError::InvalidCredentials(e.to_string()))?;
        auth.set_sensitive(true);

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v2/{}", self.base_url, path)
    }

    async fn check(
        method: &'static str,
        url: &str,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, TowerError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        tracing::debug!(method, url, status = status.as_u16(), "tower request failed");
        Err(TowerError::Status {
            method,
            url: url.to_string(),
            status: status.as_u16(),
            body,
        })
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, TowerError> {
        let response = self
            .http
            .get(url)
            .header(AUTHORIZATION, self.auth.clone())
            .send()
            .await?;
        Self::check("GET", url, response).await
    }

    pub async fn get_job_template(&self, id: u64) -> Result<JobTemplate, TowerError> {
        let url = self.url(&format!("job_templates/{}/", id));
        Ok(self.get(&url).await?.json().await?)
    }

    /// Launch a template and return the new job's id
    pub async fn launch_job_template(
        &self,
        id: u64,
        extra_vars: &Map<String, Value>,
    ) -> Result<u64, TowerError> {
        let url = self.url(&format!("job_templates/{}/launch/", id));
        tracing::info!(template = id, "launching job template");

        let response = self
            .http
            .post(&url)
            .header(AUTHORIZATION, self.auth.clone())
            .json(&json!({ "extra_vars": extra_vars }))
            .send()
            .await?;
        let launched: LaunchResponse = Self::check("POST", &url, response).await?.json().await?;
        launched.job.or(launched.id).ok_or(TowerError::MissingJobId)
    }

    pub async fn get_job(&self, id: u64) -> Result<Job, TowerError> {
        let url = self.url(&format!("jobs/{}/", id));
        Ok(self.get(&url).await?.json().await?)
    }

    /// Plain-text job output
    pub async fn get_job_stdout(&self, id: u64) -> Result<String, TowerError> {
        let url = self.url(&format!("jobs/{}/stdout/?format=txt", id));
        Ok(self.get(&url).await?.text().await?)
    }
}
