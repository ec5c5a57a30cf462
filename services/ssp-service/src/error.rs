// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Portal errors and their HTTP mapping
//!
//! Provider failures carry the underlying error for logging, but clients only
//! ever see the fixed message of the variant.

use dropshot::{ClientErrorStatusCode, HttpError};
use keycloak_auth::AuthError;
use openshift_client::OpenshiftError;
use openstack_client::OpenStackError;
use sematext_client::SematextError;
use thiserror::Error;
use tower_client::TowerError;

pub const OTC_ERROR: &str = "Error when calling the OTC API. Please create a ticket";
pub const WRONG_API_USAGE: &str =
    "Invalid API request: Argument doesn't match definition. Please create a ticket.";
pub const OPENSHIFT_ERROR: &str = "Error when calling the OpenShift API. Please create a ticket";
pub const SEMATEXT_ERROR: &str = "Error when calling the Sematext API. Please create a ticket";
pub const TOWER_ERROR: &str = "Error when calling the Ansible Tower API. Please create a ticket";

#[derive(Debug, Error)]
pub enum SspError {
    #[error("unauthorized: {0}")]
    Unauthorized(#[from] AuthError),

    #[error("OTC call failed: {0}")]
    Otc(#[from] OpenStackError),

    #[error("request does not match the API definition: {0}")]
    WrongApiUsage(String),

    #[error("You are not the owner of server {0}")]
    NotOwner(String),

    #[error("OpenShift call failed: {0}")]
    Openshift(#[from] OpenshiftError),

    #[error("Unknown cluster id")]
    UnknownCluster,

    #[error("Project not found")]
    ProjectNotFound,

    #[error("Sematext call failed: {0}")]
    Sematext(#[from] SematextError),

    #[error("Ansible Tower call failed: {0}")]
    Tower(#[from] TowerError),

    #[error("Job template is not allowed")]
    TemplateNotAllowed,

    #[error("Parameter {0} is not allowed")]
    ParameterNotAllowed(String),

    #[error("Job not found")]
    JobNotFound,

    #[error("{0} is not configured on this server")]
    ProviderDisabled(&'static str),
}

impl SspError {
    /// Log a provider failure with the operation it happened in. The
    /// returned error is unchanged.
    pub fn logged(self, operation: &'static str) -> Self {
        match &self {
            SspError::Otc(_)
            | SspError::Openshift(_)
            | SspError::Sematext(_)
            | SspError::Tower(_) => {
                tracing::error!(operation, error = %self, "provider call failed");
            }
            _ => {
                tracing::debug!(operation, error = %self, "request refused");
            }
        }
        self
    }
}

fn client_error(status: ClientErrorStatusCode, message: String) -> HttpError {
    HttpError::for_client_error(None, status, message)
}

impl From<SspError> for HttpError {
    fn from(err: SspError) -> Self {
        match err {
            SspError::Unauthorized(_) => client_error(
                ClientErrorStatusCode::UNAUTHORIZED,
                "Unauthorized".to_string(),
            ),
            SspError::Otc(_) => HttpError::for_bad_request(None, OTC_ERROR.to_string()),
            SspError::WrongApiUsage(_) => {
                HttpError::for_bad_request(None, WRONG_API_USAGE.to_string())
            }
            e @ SspError::NotOwner(_) => {
                client_error(ClientErrorStatusCode::FORBIDDEN, e.to_string())
            }
            SspError::Openshift(_) => HttpError::for_bad_request(None, OPENSHIFT_ERROR.to_string()),
            e @ SspError::UnknownCluster => HttpError::for_bad_request(None, e.to_string()),
            e @ SspError::ProjectNotFound => {
                client_error(ClientErrorStatusCode::NOT_FOUND, e.to_string())
            }
            SspError::Sematext(_) => HttpError::for_bad_request(None, SEMATEXT_ERROR.to_string()),
            SspError::Tower(_) => HttpError::for_bad_request(None, TOWER_ERROR.to_string()),
            e @ SspError::TemplateNotAllowed => {
                client_error(ClientErrorStatusCode::FORBIDDEN, e.to_string())
            }
            e @ SspError::ParameterNotAllowed(_) => HttpError::for_bad_request(None, e.to_string()),
            e @ SspError::JobNotFound => {
                client_error(ClientErrorStatusCode::NOT_FOUND, e.to_string())
            }
            e @ SspError::ProviderDisabled(_) => HttpError::for_bad_request(None, e.to_string()),
        }
    }
}
