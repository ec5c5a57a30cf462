// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Sematext Cloud account API client
//!
//! Covers listing the account's apps and the billing plans available for an
//! app type. Requests authenticate with `Authorization: apiKey <key>`.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://apps.eu.sematext.com";

const APPS_PATH: &str = "users-web/api/v3/apps/users";
const PLANS_PATH: &str = "users-web/api/v3/billing/availablePlans";

/// Roles that make a user responsible for an app
const MANAGING_ROLES: [&str; 2] = ["OWNER", "ADMIN"];

#[derive(Debug, Error)]
pub enum SematextError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GET {url} returned {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Sematext reported failure: {0}")]
    Api(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct App {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub app_type: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub plan: Option<AppPlan>,
    #[serde(default)]
    pub user_roles: Vec<UserRole>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppPlan {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRole {
    pub user_email: String,
    pub role: String,
}

impl App {
    /// Whether `identity` (an email or login) owns or administers the app
    pub fn is_managed_by(&self, identity: &str) -> bool {
        self.user_roles.iter().any(|r| {
            r.user_email.eq_ignore_ascii_case(identity)
                && MANAGING_ROLES
                    .iter()
                    .any(|role| r.role.eq_ignore_ascii_case(role))
        })
    }

    pub fn plan_name(&self) -> Option<&str> {
        self.plan.as_ref().and_then(|p| p.name.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub price_per_month: f64,
    #[serde(default)]
    pub default_daily_max_limit_size_mb: Option<u64>,
}

/// Sematext wraps every payload in `{ "success", "message", "data" }`
#[derive(Deserialize)]
struct Envelope<T> {
    #[serde(default = "default_success")]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    data: Option<T>,
}

fn default_success() -> bool {
    true
}

#[derive(Deserialize)]
struct AppsData {
    #[serde(default)]
    apps: Vec<App>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlansData {
    #[serde(default)]
    available_plans: Vec<Plan>,
}

#[derive(Clone)]
pub struct SematextClient {
    http: reqwest::Client,
    base_url: String,
    api_key: SecretString,
}

impl SematextClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, api_key: SecretString) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    async fn get<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T, SematextError> {
        let response = self
            .http
            .get(url)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("apiKey {}", self.api_key.expose_secret()),
            )
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(url, status = status.as_u16(), "sematext request failed");
            return Err(SematextError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let envelope: Envelope<T> = response.json().await?;
        if !envelope.success {
            return Err(SematextError::Api(envelope.message.unwrap_or_default()));
        }
        envelope
            .data
            .ok_or_else(|| SematextError::Api("response carried no data".to_string()))
    }

    /// Every app of the account
    pub async fn list_apps(&self) -> Result<Vec<App>, SematextError> {
        let data: AppsData = self.get(&format!("{}/{}", self.base_url, APPS_PATH)).await?;
        Ok(data.apps)
    }

    /// Plans that can be chosen for a new app of `app_type`
    pub async fn list_plans(&self, app_type: &str) -> Result<Vec<Plan>, SematextError> {
        let url = format!(
            "{}/{}?appType={}",
            self.base_url,
            PLANS_PATH,
            urlencoding::encode(app_type)
        );
        let data: PlansData = self.get(&url).await?;
        Ok(data.available_plans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_managing_roles() {
        let app: App = serde_json::from_value(json!({
            "id": 4711,
            "name": "shop-logs",
            "appType": "Logsene",
            "status": "ACTIVE",
            "plan": {"name": "Standard"},
            "userRoles": [
                {"userEmail": "Jane.Doe@example.com", "role": "OWNER"},
                {"userEmail": "bob@example.com", "role": "USER"},
                {"userEmail": "ops@example.com", "role": "admin"}
            ]
        }))
        .unwrap();

        assert!(app.is_managed_by("jane.doe@example.com"));
        assert!(app.is_managed_by("ops@example.com"));
        assert!(!app.is_managed_by("bob@example.com"));
        assert!(!app.is_managed_by("mallory@example.com"));
        assert_eq!(app.plan_name(), Some("Standard"));
    }
}
