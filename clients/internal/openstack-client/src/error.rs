// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Error types for openstack-client

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OpenStackError {
    /// Required credential or setting is missing
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The service answered with a non-success status
    #[error("{method} {url} returned {status}: {body}")]
    Status {
        method: &'static str,
        url: String,
        status: u16,
        body: String,
    },

    #[error("Keystone response carried no X-Subject-Token header")]
    MissingToken,

    #[error("No {interface} endpoint for service type {service_type} in region {region:?}")]
    EndpointNotFound {
        service_type: String,
        region: String,
        interface: String,
    },
}

impl OpenStackError {
    /// HTTP status returned by the service, if the request got that far
    pub fn status(&self) -> Option<u16> {
        match self {
            OpenStackError::Status { status, .. } => Some(*status),
            OpenStackError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether repeating the same request may succeed
    pub fn is_retriable(&self) -> bool {
        match self {
            OpenStackError::Status { status, .. } => *status == 429 || *status >= 500,
            OpenStackError::Http(e) => {
                e.is_timeout()
                    || e.is_connect()
                    || e.status().is_some_and(|s| s.as_u16() == 429 || s.is_server_error())
            }
            _ => false,
        }
    }
}
