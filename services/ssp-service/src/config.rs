// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Configuration for the SSP service
//!
//! Credentials and endpoints come from environment variables (see
//! [`SspConfig::from_env`]). Lists that are awkward to express as variables,
//! the OpenShift clusters and the Tower allowlists, live in an optional JSON
//! file named by `CONFIG_FILE`:
//!
//! ```json
//! {
//!   "openshift_clusters": [
//!     { "id": "awsdev", "name": "AWS Dev", "url": "https://api.awsdev:6443",
//!       "token": "...", "nfs_api_url": "https://nfs.awsdev" }
//!   ],
//!   "tower": { "job_templates": [12, 15], "parameter_blocklist": ["hosts"] }
//! }
//! ```

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use openshift_client::ClusterConfig;
use openstack_client::AuthOptions;
use secrecy::SecretString;
use serde::Deserialize;

/// Port used when neither `BIND_ADDRESS` nor `PORT` is set
pub const DEFAULT_PORT: u16 = 8000;

pub const DEFAULT_OTC_REGION: &str = "eu-ch";
pub const DEFAULT_RDS_PROJECT: &str = "eu-ch_rds";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct KeycloakSettings {
    pub url: String,
    pub realm: String,
    pub audience: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OtcSettings {
    pub auth: AuthOptions,
    pub region: String,
    /// Project holding the RDS instances
    pub rds_project: String,
}

#[derive(Clone)]
pub struct SematextSettings {
    pub base_url: String,
    pub api_key: SecretString,
}

impl std::fmt::Debug for SematextSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SematextSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &"****")
            .finish()
    }
}

#[derive(Clone)]
pub struct TowerSettings {
    pub base_url: String,
    pub username: String,
    pub password: SecretString,
}

impl std::fmt::Debug for TowerSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TowerSettings")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"****")
            .finish()
    }
}

/// Which Tower templates portal users may launch, and with what
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TowerPolicy {
    pub job_templates: Vec<u64>,
    pub parameter_blocklist: Vec<String>,
}

impl TowerPolicy {
    pub fn allows_template(&self, id: u64) -> bool {
        self.job_templates.contains(&id)
    }

    /// First of `keys` that is on the blocklist
    pub fn blocked_parameter<'a, I>(&self, keys: I) -> Option<&'a str>
    where
        I: IntoIterator<Item = &'a String>,
    {
        keys.into_iter()
            .find(|k| self.parameter_blocklist.iter().any(|b| b == *k))
            .map(String::as_str)
    }
}

/// Contents of `CONFIG_FILE`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub openshift_clusters: Vec<ClusterConfig>,
    pub tower: TowerPolicy,
}

impl FileConfig {
    pub async fn from_file(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}

#[derive(Debug, Clone)]
pub struct SspConfig {
    pub bind_address: SocketAddr,
    pub debug: bool,
    pub http_timeout_secs: u64,
    pub keycloak: KeycloakSettings,
    /// `None` when `OS_AUTH_URL` is unset
    pub otc: Option<OtcSettings>,
    pub sematext: Option<SematextSettings>,
    pub tower: Option<TowerSettings>,
    pub ddc_api: Option<String>,
    pub config_file: Option<PathBuf>,
    /// Loaded separately from `config_file`
    pub file: FileConfig,
}

impl SspConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let bind_address = match var("BIND_ADDRESS") {
            Some(addr) => addr.parse().context("Invalid BIND_ADDRESS")?,
            None => {
                let port = var("PORT")
                    .map(|p| p.parse::<u16>())
                    .transpose()
                    .context("Invalid PORT")?
                    .unwrap_or(DEFAULT_PORT);
                SocketAddr::from(([0, 0, 0, 0], port))
            }
        };

        let debug = var("DEBUG")
            .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
            .unwrap_or(false);

        let http_timeout_secs = var("HTTP_TIMEOUT_SECS")
            .map(|v| v.parse::<u64>())
            .transpose()
            .context("Invalid HTTP_TIMEOUT_SECS")?
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);

        let keycloak = KeycloakSettings {
            url: var("KEYCLOAK_URL").context("KEYCLOAK_URL environment variable required")?,
            realm: var("KEYCLOAK_REALM")
                .context("KEYCLOAK_REALM environment variable required")?,
            audience: var("KEYCLOAK_AUDIENCE"),
        };

        let otc = match var("OS_AUTH_URL") {
            Some(_) => Some(OtcSettings {
                auth: AuthOptions::from_lookup(&var).context("Incomplete OTC credentials")?,
                region: var("OTC_REGION").unwrap_or_else(|| DEFAULT_OTC_REGION.to_string()),
                rds_project: var("OTC_RDS_PROJECT_NAME")
                    .unwrap_or_else(|| DEFAULT_RDS_PROJECT.to_string()),
            }),
            None => None,
        };

        let sematext = var("SEMATEXT_API_KEY").map(|key| SematextSettings {
            base_url: var("SEMATEXT_BASE_URL")
                .unwrap_or_else(|| sematext_client::DEFAULT_BASE_URL.to_string()),
            api_key: SecretString::from(key),
        });

        let tower = match var("TOWER_BASE_URL") {
            Some(base_url) => Some(TowerSettings {
                base_url,
                username: var("TOWER_USERNAME")
                    .context("TOWER_USERNAME is required when TOWER_BASE_URL is set")?,
                password: SecretString::from(
                    var("TOWER_PASSWORD")
                        .context("TOWER_PASSWORD is required when TOWER_BASE_URL is set")?,
                ),
            }),
            None => None,
        };

        Ok(Self {
            bind_address,
            debug,
            http_timeout_secs,
            keycloak,
            otc,
            sematext,
            tower,
            ddc_api: var("DDC_API"),
            config_file: var("CONFIG_FILE").map(PathBuf::from),
            file: FileConfig::default(),
        })
    }

    /// Read `config_file`, if one is configured, into `file`
    pub async fn load_file(&mut self) -> Result<()> {
        if let Some(path) = &self.config_file {
            self.file = FileConfig::from_file(path).await?;
        }
        Ok(())
    }

    /// Default `RUST_LOG` filter
    pub fn default_log_filter(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "ssp_service=info,dropshot=info"
        }
    }
}
