// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Sematext operations

use keycloak_auth::AuthenticatedUser;
use ssp_api::{
    DEFAULT_SEMATEXT_APP_TYPE, SematextApp, SematextAppListResponse, SematextPlan,
    SematextPlanListResponse,
};

use crate::context::ApiContext;
use crate::error::SspError;

impl ApiContext {
    /// Apps the caller owns or administers. Roles are matched on the token's
    /// email, or on the username when the token carries none.
    pub async fn list_sematext_apps(
        &self,
        user: &AuthenticatedUser,
    ) -> Result<SematextAppListResponse, SspError> {
        let identity = user.email.as_deref().unwrap_or(&user.username);

        let apps = self
            .sematext()?
            .list_apps()
            .await?
            .into_iter()
            .filter(|a| a.is_managed_by(identity))
            .map(|a| SematextApp {
                plan_name: a.plan_name().map(str::to_string),
                id: a.id,
                name: a.name,
                app_type: a.app_type,
                status: a.status,
            })
            .collect();

        Ok(SematextAppListResponse { apps })
    }

    pub async fn list_sematext_plans(
        &self,
        app_type: Option<&str>,
    ) -> Result<SematextPlanListResponse, SspError> {
        let app_type = app_type
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_SEMATEXT_APP_TYPE);

        let plans = self
            .sematext()?
            .list_plans(app_type)
            .await?
            .into_iter()
            .map(|p| SematextPlan {
                id: p.id,
                name: p.name,
                price_per_month: p.price_per_month,
                default_daily_max_limit_mb: p.default_daily_max_limit_size_mb,
            })
            .collect();

        Ok(SematextPlanListResponse { plans })
    }
}
