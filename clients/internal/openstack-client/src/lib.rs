// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! OpenStack client for the Open Telekom Cloud
//!
//! A small hand-written client covering the calls the portal needs:
//! Nova servers, flavors and availability zones, Glance images, Cinder volume
//! types and the OTC RDS v1 API.
//!
//! ## Usage
//!
//! ```ignore
//! use openstack_client::{AuthOptions, Session};
//!
//! let options = AuthOptions::from_lookup(|name| std::env::var(name).ok())?;
//! let session = Session::new(http, options, "eu-ch");
//! let servers = session.compute().await?.list_servers_detail().await?;
//! ```
//!
//! A [`Session`] authenticates against Keystone v3 once and reuses the scoped
//! token until it is close to expiry or a service rejects it. Each accessor
//! resolves the service's public endpoint from the token's catalog.

pub mod auth;
pub mod blockstorage;
pub mod compute;
pub mod error;
pub mod image;
pub mod rds;
pub mod retry;

use std::sync::Arc;

use reqwest::StatusCode;
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

pub use auth::{AuthOptions, CatalogEntry, EndpointOpts, Token};
pub use blockstorage::{BlockStorageClient, VolumeType};
pub use compute::{AvailabilityZone, ComputeClient, Flavor, Server, ServerAction};
pub use error::OpenStackError;
pub use image::{Image, ImageClient};
pub use rds::{RdsClient, RdsFlavor, RdsInstance, RdsVersion};
pub use retry::with_retries;

/// Header carrying the scoped token on service requests
const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

/// Tokens closer than this to expiry are replaced before use
const TOKEN_REFRESH_MARGIN_MINUTES: i64 = 5;

/// Upper bound on followed pagination links
pub(crate) const MAX_PAGES: usize = 100;

/// The scoped token of one session, shared with the service clients it
/// hands out
struct TokenCache {
    http: reqwest::Client,
    options: AuthOptions,
    token: Mutex<Option<Token>>,
}

impl TokenCache {
    async fn get(&self) -> Result<Token, OpenStackError> {
        let mut guard = self.token.lock().await;
        let margin = chrono::Duration::minutes(TOKEN_REFRESH_MARGIN_MINUTES);

        if let Some(token) = guard.as_ref().filter(|t| !t.expires_within(margin)) {
            return Ok(token.clone());
        }

        let token = Token::issue(&self.http, &self.options).await?;
        tracing::info!(
            project = %self.options.project_name,
            expires_at = ?token.expires_at,
            "issued keystone token"
        );
        *guard = Some(token.clone());
        Ok(token)
    }

    /// Forget `rejected`, unless another caller already replaced it
    async fn invalidate(&self, rejected: &Token) {
        let mut guard = self.token.lock().await;
        let current = guard
            .as_ref()
            .is_some_and(|t| t.value.expose_secret() == rejected.value.expose_secret());
        if current {
            *guard = None;
        }
    }
}

/// Authenticated access to one project in one region
pub struct Session {
    tokens: Arc<TokenCache>,
    endpoint: EndpointOpts,
    region: String,
}

impl Session {
    pub fn new(http: reqwest::Client, options: AuthOptions, region: impl Into<String>) -> Self {
        let region = region.into();
        Self {
            tokens: Arc::new(TokenCache {
                http,
                options,
                token: Mutex::new(None),
            }),
            endpoint: EndpointOpts::public(region.clone()),
            region,
        }
    }

    /// Select catalog endpoints with `endpoint` instead of the session
    /// region. The region is still sent where an API asks for it.
    pub fn with_endpoint_opts(mut self, endpoint: EndpointOpts) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// A valid token, re-authenticating when the cached one is about to expire
    pub async fn token(&self) -> Result<Token, OpenStackError> {
        self.tokens.get().await
    }

    /// Client for an arbitrary catalog service type
    pub async fn service(&self, service_type: &str) -> Result<ServiceClient, OpenStackError> {
        let token = self.tokens.get().await?;
        let endpoint = token.endpoint(service_type, &self.endpoint)?;
        Ok(ServiceClient {
            http: self.tokens.http.clone(),
            tokens: Arc::clone(&self.tokens),
            endpoint,
        })
    }

    pub async fn compute(&self) -> Result<ComputeClient, OpenStackError> {
        Ok(ComputeClient::new(self.service("compute").await?))
    }

    pub async fn image(&self) -> Result<ImageClient, OpenStackError> {
        Ok(ImageClient::new(self.service("image").await?))
    }

    /// Block storage v3, falling back to v2 on clouds that only publish that
    pub async fn block_storage(&self) -> Result<BlockStorageClient, OpenStackError> {
        match self.service("volumev3").await {
            Ok(client) => Ok(BlockStorageClient::new(client)),
            Err(OpenStackError::EndpointNotFound { .. }) => {
                Ok(BlockStorageClient::new(self.service("volumev2").await?))
            }
            Err(e) => Err(e),
        }
    }

    pub async fn rds(&self) -> Result<RdsClient, OpenStackError> {
        Ok(RdsClient::new(self.service("rds").await?, self.region.clone()))
    }
}

/// Resolved endpoint for one service, authenticated through its session's
/// token. A request answered with 401 is sent once more with a freshly
/// issued token.
#[derive(Clone)]
pub struct ServiceClient {
    http: reqwest::Client,
    tokens: Arc<TokenCache>,
    endpoint: String,
}

impl ServiceClient {
    /// Resolved endpoint, without a trailing slash
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// `{endpoint}/{path}`
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.endpoint, path.trim_start_matches('/'))
    }

    async fn send<F>(
        &self,
        method: &'static str,
        url: &str,
        request: F,
    ) -> Result<reqwest::Response, OpenStackError>
    where
        F: Fn(&str) -> reqwest::RequestBuilder,
    {
        let token = self.tokens.get().await?;
        let response = request(token.value.expose_secret()).send().await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return check_status(method, url, response).await;
        }

        tracing::info!(method, url, "token rejected, re-authenticating");
        self.tokens.invalidate(&token).await;
        let token = self.tokens.get().await?;
        let response = request(token.value.expose_secret()).send().await?;
        check_status(method, url, response).await
    }

    /// GET a JSON document relative to the endpoint, with retries
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, OpenStackError> {
        let url = self.url(path);
        self.get_json_url(&url).await
    }

    /// GET a JSON document from an absolute URL, with retries
    pub async fn get_json_url<T: DeserializeOwned>(&self, url: &str) -> Result<T, OpenStackError> {
        with_retries(
            || async {
                let response = self
                    .send("GET", url, |token| {
                        self.http.get(url).header(AUTH_TOKEN_HEADER, token)
                    })
                    .await?;
                Ok(response.json::<T>().await?)
            },
            url,
        )
        .await
    }

    /// POST a JSON body and discard the response body. Not retried.
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), OpenStackError> {
        let url = self.url(path);
        self.send("POST", &url, |token| {
            self.http
                .post(&url)
                .header(AUTH_TOKEN_HEADER, token)
                .json(body)
        })
        .await?;
        Ok(())
    }
}

async fn check_status(
    method: &'static str,
    url: &str,
    response: reqwest::Response,
) -> Result<reqwest::Response, OpenStackError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    tracing::debug!(method, url, status = status.as_u16(), body = %body, "openstack request failed");
    Err(OpenStackError::Status {
        method,
        url: url.to_string(),
        status: status.as_u16(),
        body,
    })
}
