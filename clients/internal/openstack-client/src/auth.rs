// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Keystone v3 password authentication and service catalog lookup

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::OpenStackError;

/// Header Keystone returns the issued token in
const SUBJECT_TOKEN_HEADER: &str = "X-Subject-Token";

/// Password credentials scoped to one project
#[derive(Clone)]
pub struct AuthOptions {
    /// Identity endpoint, with or without the `/v3` suffix
    pub auth_url: String,
    pub username: String,
    pub password: SecretString,
    /// Domain of the user, also used for the project scope
    pub domain_name: String,
    pub project_name: String,
}

impl std::fmt::Debug for AuthOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthOptions")
            .field("auth_url", &self.auth_url)
            .field("username", &self.username)
            .field("password", &"****")
            .field("domain_name", &self.domain_name)
            .field("project_name", &self.project_name)
            .finish()
    }
}

impl AuthOptions {
    /// Read the standard `OS_*` variables through `lookup`.
    ///
    /// `OS_USER_DOMAIN_NAME` falls back to `OS_DOMAIN_NAME`, and
    /// `OS_PROJECT_NAME` falls back to the older `OS_TENANT_NAME`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, OpenStackError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| OpenStackError::Config(format!("{} is not set", name)))
        };
        let either = |primary: &str, fallback: &str| {
            required(primary).or_else(|_| {
                required(fallback).map_err(|_| {
                    OpenStackError::Config(format!("neither {} nor {} is set", primary, fallback))
                })
            })
        };

        Ok(Self {
            auth_url: required("OS_AUTH_URL")?,
            username: required("OS_USERNAME")?,
            password: SecretString::from(required("OS_PASSWORD")?),
            domain_name: either("OS_USER_DOMAIN_NAME", "OS_DOMAIN_NAME")?,
            project_name: either("OS_PROJECT_NAME", "OS_TENANT_NAME")?,
        })
    }

    /// Same credentials, scoped to another project
    pub fn with_project(&self, project_name: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            ..self.clone()
        }
    }

    /// `{auth_url}/auth/tokens`, adding `/v3` when missing
    pub fn tokens_url(&self) -> String {
        let base = self.auth_url.trim_end_matches('/');
        if base.ends_with("/v3") {
            format!("{}/auth/tokens", base)
        } else {
            format!("{}/v3/auth/tokens", base)
        }
    }

    fn request_body(&self) -> TokenRequest<'_> {
        TokenRequest {
            auth: AuthBody {
                identity: Identity {
                    methods: vec!["password"],
                    password: PasswordMethod {
                        user: User {
                            name: &self.username,
                            password: self.password.expose_secret(),
                            domain: Domain {
                                name: &self.domain_name,
                            },
                        },
                    },
                },
                scope: Scope {
                    project: ProjectScope {
                        name: &self.project_name,
                        domain: Domain {
                            name: &self.domain_name,
                        },
                    },
                },
            },
        }
    }
}

// ============================================================================
// Keystone wire types
// ============================================================================

#[derive(Serialize)]
struct TokenRequest<'a> {
    auth: AuthBody<'a>,
}

#[derive(Serialize)]
struct AuthBody<'a> {
    identity: Identity<'a>,
    scope: Scope<'a>,
}

#[derive(Serialize)]
struct Identity<'a> {
    methods: Vec<&'static str>,
    password: PasswordMethod<'a>,
}

#[derive(Serialize)]
struct PasswordMethod<'a> {
    user: User<'a>,
}

#[derive(Serialize)]
struct User<'a> {
    name: &'a str,
    password: &'a str,
    domain: Domain<'a>,
}

#[derive(Serialize)]
struct Domain<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct Scope<'a> {
    project: ProjectScope<'a>,
}

#[derive(Serialize)]
struct ProjectScope<'a> {
    name: &'a str,
    domain: Domain<'a>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: TokenBody,
}

#[derive(Debug, Deserialize)]
struct TokenBody {
    #[serde(default)]
    expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    project: Option<TokenProject>,
    #[serde(default)]
    catalog: Vec<CatalogEntry>,
}

#[derive(Debug, Deserialize)]
struct TokenProject {
    id: String,
}

/// One service in the Keystone catalog
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    #[serde(rename = "type")]
    pub service_type: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub endpoints: Vec<CatalogEndpoint>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEndpoint {
    pub interface: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub region_id: Option<String>,
    pub url: String,
}

/// Which endpoint of a service to use
#[derive(Debug, Clone)]
pub struct EndpointOpts {
    /// Empty matches any region
    pub region: String,
    pub interface: String,
}

impl EndpointOpts {
    pub fn public(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            interface: "public".to_string(),
        }
    }
}

/// A scoped Keystone token plus the catalog it came with
#[derive(Clone)]
pub struct Token {
    pub(crate) value: SecretString,
    pub project_id: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub catalog: Vec<CatalogEntry>,
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("project_id", &self.project_id)
            .field("expires_at", &self.expires_at)
            .field("catalog_entries", &self.catalog.len())
            .finish_non_exhaustive()
    }
}

impl Token {
    /// Issue a project-scoped token with password credentials
    pub async fn issue(http: &reqwest::Client, opts: &AuthOptions) -> Result<Self, OpenStackError> {
        let url = opts.tokens_url();
        tracing::debug!(url = %url, project = %opts.project_name, "requesting keystone token");

        let response = http.post(&url).json(&opts.request_body()).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OpenStackError::Status {
                method: "POST",
                url,
                status: status.as_u16(),
                body,
            });
        }

        let value = response
            .headers()
            .get(SUBJECT_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or(OpenStackError::MissingToken)?;

        let body: TokenResponse = response.json().await?;
        let project_id = body
            .token
            .project
            .map(|p| p.id)
            .ok_or_else(|| OpenStackError::Config("token is not project scoped".to_string()))?;

        Ok(Self {
            value: SecretString::from(value),
            project_id,
            expires_at: body.token.expires_at,
            catalog: body.token.catalog,
        })
    }

    /// True when the token expires within `margin` (or has no expiry info)
    pub fn expires_within(&self, margin: chrono::Duration) -> bool {
        match self.expires_at {
            Some(at) => at - margin <= Utc::now(),
            None => true,
        }
    }

    /// Resolve a service endpoint from the catalog.
    ///
    /// `$(tenant_id)s` and `$(project_id)s` placeholders, which some clouds
    /// leave in catalog URLs, are replaced with the scoped project id.
    pub fn endpoint(&self, service_type: &str, opts: &EndpointOpts) -> Result<String, OpenStackError> {
        let region_matches = |ep: &CatalogEndpoint| {
            opts.region.is_empty()
                || ep.region.as_deref() == Some(opts.region.as_str())
                || ep.region_id.as_deref() == Some(opts.region.as_str())
        };

        self.catalog
            .iter()
            .filter(|entry| entry.service_type == service_type)
            .flat_map(|entry| entry.endpoints.iter())
            .find(|ep| ep.interface == opts.interface && region_matches(ep))
            .map(|ep| {
                ep.url
                    .replace("$(tenant_id)s", &self.project_id)
                    .replace("$(project_id)s", &self.project_id)
                    .trim_end_matches('/')
                    .to_string()
            })
            .ok_or_else(|| OpenStackError::EndpointNotFound {
                service_type: service_type.to_string(),
                region: opts.region.clone(),
                interface: opts.interface.clone(),
            })
    }
}
