// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! OpenShift project API client
//!
//! Talks to `project.openshift.io/v1` on one cluster with a service account
//! bearer token. Only reads are supported.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

const PROJECTS_PATH: &str = "apis/project.openshift.io/v1/projects";

/// Annotation naming the user who requested a project
pub const REQUESTER_ANNOTATION: &str = "openshift.io/requester";
pub const BILLING_ANNOTATION: &str = "openshift.io/kontierung-element";
pub const MEGAID_ANNOTATION: &str = "openshift.io/MEGAID";

#[derive(Debug, Error)]
pub enum OpenshiftError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GET {url} returned {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Project {0} not found")]
    NotFound(String),
}

/// One cluster the portal manages
#[derive(Clone, Deserialize)]
pub struct ClusterConfig {
    /// Identifier used by the frontend, e.g. `awsdev`
    pub id: String,
    pub name: String,
    /// API server URL
    pub url: String,
    /// Service account token
    pub token: SecretString,
    /// NFS volume API for this cluster, when it offers one
    #[serde(default)]
    pub nfs_api_url: Option<String>,
}

impl std::fmt::Debug for ClusterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClusterConfig")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("url", &self.url)
            .field("token", &"****")
            .field("nfs_api_url", &self.nfs_api_url)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub status: ProjectStatus,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    pub name: String,
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
    #[serde(default)]
    pub creation_timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectStatus {
    #[serde(default)]
    pub phase: String,
}

impl Project {
    fn annotation(&self, key: &str) -> Option<&str> {
        self.metadata
            .annotations
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn requester(&self) -> Option<&str> {
        self.annotation(REQUESTER_ANNOTATION)
    }

    pub fn billing(&self) -> Option<&str> {
        self.annotation(BILLING_ANNOTATION)
    }

    pub fn megaid(&self) -> Option<&str> {
        self.annotation(MEGAID_ANNOTATION)
    }

    pub fn is_requested_by(&self, username: &str) -> bool {
        self.requester()
            .is_some_and(|r| r.eq_ignore_ascii_case(username))
    }
}

#[derive(Deserialize)]
struct ProjectList {
    #[serde(default)]
    items: Vec<Project>,
}

/// Client for one cluster
#[derive(Clone)]
pub struct OpenshiftClient {
    http: reqwest::Client,
    cluster: ClusterConfig,
}

impl OpenshiftClient {
    pub fn new(http: reqwest::Client, cluster: ClusterConfig) -> Self {
        Self { http, cluster }
    }

    pub fn cluster(&self) -> &ClusterConfig {
        &self.cluster
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.cluster.url.trim_end_matches('/'), path)
    }

    async fn get<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T, OpenshiftError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(self.cluster.token.expose_secret())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(cluster = %self.cluster.id, url, status = status.as_u16(), "openshift request failed");
            return Err(OpenshiftError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }

    /// All projects the service account can see
    pub async fn list_projects(&self) -> Result<Vec<Project>, OpenshiftError> {
        let list: ProjectList = self.get(&self.url(PROJECTS_PATH)).await?;
        Ok(list.items)
    }

    /// One project by name
    pub async fn get_project(&self, name: &str) -> Result<Project, OpenshiftError> {
        let url = self.url(&format!("{}/{}", PROJECTS_PATH, urlencoding::encode(name)));
        match self.get(&url).await {
            Err(OpenshiftError::Status { status: 404, .. }) => {
                Err(OpenshiftError::NotFound(name.to_string()))
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn project(annotations: serde_json::Value) -> Project {
        serde_json::from_value(json!({
            "metadata": {
                "name": "team-a-dev",
                "annotations": annotations,
                "creationTimestamp": "2026-01-20T09:30:00Z"
            },
            "status": {"phase": "Active"}
        }))
        .unwrap()
    }

    #[test]
    fn test_annotations() {
        let p = project(json!({
            "openshift.io/requester": "U123456",
            "openshift.io/kontierung-element": "70012345",
            "openshift.io/MEGAID": ""
        }));
        assert!(p.is_requested_by("u123456"));
        assert!(!p.is_requested_by("u654321"));
        assert_eq!(p.billing(), Some("70012345"));
        assert_eq!(p.megaid(), None);
        assert_eq!(p.status.phase, "Active");
    }

    #[test]
    fn test_project_without_requester() {
        let p = project(json!({}));
        assert_eq!(p.requester(), None);
        assert!(!p.is_requested_by("u123456"));
    }

    #[test]
    fn test_cluster_debug_hides_token() {
        let cluster: ClusterConfig = serde_json::from_value(json!({
            "id": "awsdev",
            "name": "AWS Dev",
            "url": "https://api.awsdev.example.com:6443",
            "token": "sa-token-value"
        }))
        .unwrap();
        assert!(!format!("{:?}", cluster).contains("sa-token-value"));
        assert_eq!(cluster.nfs_api_url, None);
    }
}
