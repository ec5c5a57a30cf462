// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Error types for keycloak-auth

use thiserror::Error;

/// Errors that can occur while authenticating a request
#[derive(Error, Debug)]
pub enum AuthError {
    /// No Authorization header on the request
    #[error("Missing Authorization header")]
    MissingToken,

    /// Authorization header present but not a usable bearer token
    #[error("Authorization header is not a bearer token")]
    InvalidScheme,

    /// Fetching the realm's signing keys failed
    #[error("Failed to fetch JWKS: {0}")]
    JwksFetch(#[from] reqwest::Error),

    /// The realm answered the JWKS request with an error status
    #[error("JWKS endpoint returned status {0}")]
    JwksStatus(u16),

    /// The token names a key the realm does not publish
    #[error("No signing key found for kid {0:?}")]
    UnknownKey(Option<String>),

    /// The realm published a key we cannot verify with
    #[error("Unsupported signing key: {0}")]
    UnsupportedKey(String),

    /// Signature, expiry, issuer or audience check failed
    #[error("Invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    /// The token carries neither `preferred_username` nor `sub`
    #[error("Token does not identify a user")]
    MissingIdentity,
}
