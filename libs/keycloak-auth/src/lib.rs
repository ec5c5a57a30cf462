// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Keycloak bearer token verification
//!
//! Verifies RS256/ES256 access tokens issued by a Keycloak realm and extracts
//! the user they were issued to.
//!
//! ## Usage
//!
//! ```ignore
//! use keycloak_auth::{KeycloakConfig, KeycloakVerifier};
//!
//! let config = KeycloakConfig::new("https://sso.example.com", "portal");
//! let verifier = KeycloakVerifier::new(config, reqwest::Client::new());
//!
//! let user = verifier.authenticate(request.headers()).await?;
//! println!("request from {}", user.username);
//! ```
//!
//! The realm's signing keys are fetched from
//! `{base_url}/realms/{realm}/protocol/openid-connect/certs` and cached. A
//! token signed with a key id that is not in the cache triggers a refresh, so
//! realm key rotation is picked up without a restart. Refreshes are
//! serialized and at most one is made per [`KeycloakConfig::refresh_cooldown`],
//! however many unknown key ids arrive.

pub mod error;
pub mod jwks;

use std::time::{Duration, Instant};

use http::HeaderMap;
use http::header::AUTHORIZATION;
use jsonwebtoken::{Validation, decode, decode_header};
use serde::Deserialize;
use tokio::sync::RwLock;

pub use error::AuthError;
pub use jwks::{Jwk, JwkSet};

/// How long fetched realm keys are trusted before they are re-fetched
const DEFAULT_JWKS_TTL: Duration = Duration::from_secs(10 * 60);

/// Minimum time between two fetches of the realm keys
const DEFAULT_REFRESH_COOLDOWN: Duration = Duration::from_secs(30);

/// Where tokens come from and what they must contain
#[derive(Debug, Clone)]
pub struct KeycloakConfig {
    /// Keycloak base URL, e.g. `https://sso.example.com`
    pub base_url: String,
    pub realm: String,
    /// Required `aud` claim; audience is not checked when unset
    pub audience: Option<String>,
    pub jwks_ttl: Duration,
    pub refresh_cooldown: Duration,
}

impl KeycloakConfig {
    pub fn new(base_url: impl Into<String>, realm: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            realm: realm.into(),
            audience: None,
            jwks_ttl: DEFAULT_JWKS_TTL,
            refresh_cooldown: DEFAULT_REFRESH_COOLDOWN,
        }
    }

    pub fn with_refresh_cooldown(mut self, cooldown: Duration) -> Self {
        self.refresh_cooldown = cooldown;
        self
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    /// Expected `iss` claim
    pub fn issuer(&self) -> String {
        format!("{}/realms/{}", self.base_url, self.realm)
    }

    pub fn certs_url(&self) -> String {
        format!("{}/protocol/openid-connect/certs", self.issuer())
    }
}

/// The user a verified token was issued to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub username: String,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Claims {
    #[serde(default)]
    preferred_username: Option<String>,
    #[serde(default)]
    sub: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

enum KeySource {
    Remote { http: reqwest::Client, url: String },
    Static,
}

struct CachedKeys {
    keys: JwkSet,
    fetched_at: Option<Instant>,
    /// Last fetch attempt, successful or not
    attempted_at: Option<Instant>,
}

/// Verifies bearer tokens against a realm's published keys
pub struct KeycloakVerifier {
    config: KeycloakConfig,
    source: KeySource,
    cache: RwLock<CachedKeys>,
}

impl KeycloakVerifier {
    /// Verifier that fetches the realm's keys over HTTP
    pub fn new(config: KeycloakConfig, http: reqwest::Client) -> Self {
        let url = config.certs_url();
        Self {
            config,
            source: KeySource::Remote { http, url },
            cache: RwLock::new(CachedKeys {
                keys: JwkSet::default(),
                fetched_at: None,
                attempted_at: None,
            }),
        }
    }

    /// Verifier with a fixed key set that is never refreshed
    pub fn from_jwks(config: KeycloakConfig, keys: JwkSet) -> Self {
        Self {
            config,
            source: KeySource::Static,
            cache: RwLock::new(CachedKeys {
                keys,
                fetched_at: None,
                attempted_at: None,
            }),
        }
    }

    /// Authenticate a request from its `Authorization` header
    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<AuthenticatedUser, AuthError> {
        let token = bearer_token(headers)?;
        self.verify(token).await
    }

    /// Verify a raw token and return the user it identifies
    pub async fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let header = decode_header(token)?;
        let kid = header.kid.as_deref();

        let keys = match self.cached_candidates(kid).await? {
            Some(keys) => keys,
            None => {
                // Unknown kid: the realm may have rotated its keys.
                self.refresh().await?;
                self.cached_candidates(kid)
                    .await?
                    .ok_or_else(|| AuthError::UnknownKey(header.kid.clone()))?
            }
        };

        let mut last_err = None;
        for jwk in keys {
            let Ok(alg) = jwk.algorithm() else {
                continue;
            };
            if alg != header.alg {
                continue;
            }
            let key = jwk.decoding_key()?;

            match decode::<Claims>(token, &key, &self.validation(alg)) {
                Ok(data) => return user_from_claims(data.claims),
                Err(e) => last_err = Some(e),
            }
        }

        match last_err {
            Some(e) => Err(AuthError::InvalidToken(e)),
            None => Err(AuthError::UnknownKey(header.kid)),
        }
    }

    fn validation(&self, alg: jsonwebtoken::Algorithm) -> Validation {
        let mut validation = Validation::new(alg);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.set_issuer(&[self.config.issuer()]);
        match &self.config.audience {
            Some(aud) => validation.set_audience(&[aud]),
            None => validation.validate_aud = false,
        }
        validation
    }

    /// Matching keys from the cache, or `None` when the cache is stale or
    /// has no key for `kid`.
    async fn cached_candidates(&self, kid: Option<&str>) -> Result<Option<Vec<Jwk>>, AuthError> {
        let cache = self.cache.read().await;

        if let KeySource::Remote { .. } = self.source {
            let fresh = cache
                .fetched_at
                .is_some_and(|t| t.elapsed() < self.config.jwks_ttl);
            if !fresh {
                return Ok(None);
            }
        }

        let found: Vec<Jwk> = cache.keys.candidates(kid).into_iter().cloned().collect();
        Ok((!found.is_empty()).then_some(found))
    }

    /// Re-fetch the realm keys unless another fetch was attempted within
    /// the cooldown. The write lock is held for the whole fetch, so
    /// concurrent callers wait for it and then find the cooldown active.
    async fn refresh(&self) -> Result<(), AuthError> {
        let KeySource::Remote { http, url } = &self.source else {
            return Ok(());
        };

        let mut cache = self.cache.write().await;
        let cooldown = self.config.refresh_cooldown.min(self.config.jwks_ttl);
        if cache.attempted_at.is_some_and(|t| t.elapsed() < cooldown) {
            tracing::debug!("Skipping Keycloak key refresh during cooldown");
            return Ok(());
        }
        cache.attempted_at = Some(Instant::now());

        let response = http.get(url).send().await?;
        if !response.status().is_success() {
            tracing::warn!(
                status = %response.status(),
                url = %url,
                "Keycloak certs endpoint returned non-success status"
            );
            return Err(AuthError::JwksStatus(response.status().as_u16()));
        }
        let keys: JwkSet = response.json().await?;

        tracing::debug!(count = keys.keys.len(), "Refreshed Keycloak signing keys");

        cache.keys = keys;
        cache.fetched_at = Some(Instant::now());
        Ok(())
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidScheme)?;

    let (scheme, token) = value.split_once(' ').ok_or(AuthError::InvalidScheme)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::InvalidScheme);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::InvalidScheme);
    }
    Ok(token)
}

fn user_from_claims(claims: Claims) -> Result<AuthenticatedUser, AuthError> {
    let username = claims
        .preferred_username
        .filter(|u| !u.is_empty())
        .or(claims.sub.filter(|s| !s.is_empty()))
        .ok_or(AuthError::MissingIdentity)?;

    Ok(AuthenticatedUser {
        username,
        email: claims.email,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(bearer_token(&headers_with("Bearer abc.def")).unwrap(), "abc.def");
        assert_eq!(bearer_token(&headers_with("bearer  abc ")).unwrap(), "abc");
    }

    #[test]
    fn test_bearer_token_rejects_other_schemes() {
        assert!(matches!(
            bearer_token(&HeaderMap::new()),
            Err(AuthError::MissingToken)
        ));
        assert!(matches!(
            bearer_token(&headers_with("Basic dXNlcjpwdw==")),
            Err(AuthError::InvalidScheme)
        ));
        assert!(matches!(
            bearer_token(&headers_with("Bearer ")),
            Err(AuthError::InvalidScheme)
        ));
        assert!(matches!(
            bearer_token(&headers_with("Bearer")),
            Err(AuthError::InvalidScheme)
        ));
    }

    #[test]
    fn test_config_urls() {
        let config = KeycloakConfig::new("https://sso.example.com/", "portal");
        assert_eq!(config.issuer(), "https://sso.example.com/realms/portal");
        assert_eq!(
            config.certs_url(),
            "https://sso.example.com/realms/portal/protocol/openid-connect/certs"
        );
    }

    #[test]
    fn test_username_falls_back_to_subject() {
        let user = user_from_claims(Claims {
            preferred_username: None,
            sub: Some("f81d4fae".to_string()),
            email: None,
        })
        .unwrap();
        assert_eq!(user.username, "f81d4fae");

        let missing = user_from_claims(Claims {
            preferred_username: Some(String::new()),
            sub: None,
            email: None,
        });
        assert!(matches!(missing, Err(AuthError::MissingIdentity)));
    }
}
