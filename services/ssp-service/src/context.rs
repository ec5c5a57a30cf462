// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! API context shared across all request handlers

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result};
use http::HeaderMap;
use keycloak_auth::{AuthenticatedUser, KeycloakConfig, KeycloakVerifier};
use openshift_client::OpenshiftClient;
use openstack_client::{EndpointOpts, Session};
use sematext_client::SematextClient;
use tower_client::TowerClient;

use crate::config::{SspConfig, TowerPolicy};
use crate::error::SspError;
use crate::features::{DdcFeatures, FeatureAggregator, OpenshiftFeatures, OtcFeatures};

const USER_AGENT: &str = concat!("ssp-service/", env!("CARGO_PKG_VERSION"));

/// Build the HTTP client every provider shares.
///
/// reqwest is built without a bundled crypto provider, so the ring provider
/// is installed here first. Installing twice is harmless.
pub fn build_http_client(timeout_secs: u64) -> Result<reqwest::Client> {
    let _ = rustls::crypto::ring::default_provider().install_default();

    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(USER_AGENT)
        .build()
        .context("Failed to create HTTP client")
}

/// OTC sessions, one per project
pub struct OtcProvider {
    pub(crate) compute: Session,
    pub(crate) rds: Session,
}

pub struct TowerProvider {
    pub(crate) client: TowerClient,
    pub(crate) policy: TowerPolicy,
}

pub struct ApiContext {
    verifier: KeycloakVerifier,
    pub(crate) otc: Option<OtcProvider>,
    /// Keyed by cluster id
    pub(crate) clusters: HashMap<String, OpenshiftClient>,
    pub(crate) sematext: Option<SematextClient>,
    pub(crate) tower: Option<TowerProvider>,
    features: FeatureAggregator,
}

impl ApiContext {
    /// Create the context from configuration, fetching Keycloak keys over
    /// HTTP
    pub fn new(config: &SspConfig) -> Result<Self> {
        let http = build_http_client(config.http_timeout_secs)?;
        let verifier = KeycloakVerifier::new(keycloak_config(config), http.clone());
        Self::with_verifier(config, http, verifier)
    }

    /// Create the context with a caller-supplied token verifier
    pub fn with_verifier(
        config: &SspConfig,
        http: reqwest::Client,
        verifier: KeycloakVerifier,
    ) -> Result<Self> {
        let otc = config.otc.as_ref().map(|otc| {
            tracing::info!(
                region = %otc.region,
                project = %otc.auth.project_name,
                rds_project = %otc.rds_project,
                "OTC enabled"
            );
            OtcProvider {
                compute: Session::new(http.clone(), otc.auth.clone(), otc.region.clone()),
                rds: Session::new(
                    http.clone(),
                    otc.auth.with_project(otc.rds_project.clone()),
                    otc.region.clone(),
                )
                // RDS is catalogued without a region tag
                .with_endpoint_opts(EndpointOpts::public("")),
            }
        });

        let clusters: HashMap<String, OpenshiftClient> = config
            .file
            .openshift_clusters
            .iter()
            .map(|c| (c.id.clone(), OpenshiftClient::new(http.clone(), c.clone())))
            .collect();
        if !clusters.is_empty() {
            tracing::info!(count = clusters.len(), "OpenShift clusters configured");
        }

        let sematext = config.sematext.as_ref().map(|s| {
            tracing::info!(base_url = %s.base_url, "Sematext enabled");
            SematextClient::new(http.clone(), s.base_url.clone(), s.api_key.clone())
        });

        let tower = match &config.tower {
            Some(t) => {
                tracing::info!(
                    base_url = %t.base_url,
                    templates = ?config.file.tower.job_templates,
                    "Ansible Tower enabled"
                );
                Some(TowerProvider {
                    client: TowerClient::new(http.clone(), t.base_url.clone(), &t.username, &t.password)
                        .context("Failed to create Tower client")?,
                    policy: config.file.tower.clone(),
                })
            }
            None => None,
        };

        let features = FeatureAggregator::new()
            .with_source(OpenshiftFeatures {
                clusters: config
                    .file
                    .openshift_clusters
                    .iter()
                    .map(|c| (c.id.clone(), c.nfs_api_url.is_some()))
                    .collect(),
            })
            .with_source(DdcFeatures {
                enabled: config.ddc_api.is_some(),
            })
            .with_source(OtcFeatures {
                credentials: config.otc.is_some(),
                rds_project: config
                    .otc
                    .as_ref()
                    .is_some_and(|o| !o.rds_project.is_empty()),
            });

        Ok(Self {
            verifier,
            otc,
            clusters,
            sematext,
            tower,
            features,
        })
    }

    /// The user a request's bearer token was issued to
    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<AuthenticatedUser, SspError> {
        self.verifier
            .authenticate(headers)
            .await
            .map_err(|e| SspError::from(e).logged("authenticate"))
    }

    pub fn features(&self) -> &FeatureAggregator {
        &self.features
    }

    pub(crate) fn otc(&self) -> Result<&OtcProvider, SspError> {
        self.otc.as_ref().ok_or(SspError::ProviderDisabled("OTC"))
    }

    pub(crate) fn sematext(&self) -> Result<&SematextClient, SspError> {
        self.sematext
            .as_ref()
            .ok_or(SspError::ProviderDisabled("Sematext"))
    }

    pub(crate) fn tower(&self) -> Result<&TowerProvider, SspError> {
        self.tower
            .as_ref()
            .ok_or(SspError::ProviderDisabled("Ansible Tower"))
    }
}

pub fn keycloak_config(config: &SspConfig) -> KeycloakConfig {
    let keycloak = KeycloakConfig::new(&config.keycloak.url, &config.keycloak.realm);
    match &config.keycloak.audience {
        Some(aud) => keycloak.with_audience(aud),
        None => keycloak,
    }
}
