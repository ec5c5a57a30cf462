// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! JSON Web Key Set handling
//!
//! Keycloak publishes one or more keys per realm at the `certs` endpoint.
//! Encryption keys (`use: enc`) share the endpoint with signing keys and
//! must never be picked for signature verification.

use jsonwebtoken::{Algorithm, DecodingKey};
use serde::Deserialize;

use crate::error::AuthError;

/// A realm's published key set
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JwkSet {
    #[serde(default)]
    pub keys: Vec<Jwk>,
}

/// A single JSON Web Key
#[derive(Debug, Clone, Deserialize)]
pub struct Jwk {
    pub kty: String,
    #[serde(default)]
    pub kid: Option<String>,
    #[serde(default)]
    pub alg: Option<String>,
    #[serde(default, rename = "use")]
    pub key_use: Option<String>,

    // RSA
    #[serde(default)]
    pub n: Option<String>,
    #[serde(default)]
    pub e: Option<String>,

    // EC
    #[serde(default)]
    pub x: Option<String>,
    #[serde(default)]
    pub y: Option<String>,
}

impl Jwk {
    fn is_signing_key(&self) -> bool {
        self.key_use.as_deref().is_none_or(|u| u == "sig")
    }

    /// Algorithm this key verifies; explicit `alg` wins over the key type
    pub fn algorithm(&self) -> Result<Algorithm, AuthError> {
        if let Some(alg) = self.alg.as_deref() {
            return match alg {
                "RS256" => Ok(Algorithm::RS256),
                "RS384" => Ok(Algorithm::RS384),
                "RS512" => Ok(Algorithm::RS512),
                "PS256" => Ok(Algorithm::PS256),
                "ES256" => Ok(Algorithm::ES256),
                "ES384" => Ok(Algorithm::ES384),
                other => Err(AuthError::UnsupportedKey(format!("alg {}", other))),
            };
        }

        match self.kty.as_str() {
            "RSA" => Ok(Algorithm::RS256),
            "EC" => Ok(Algorithm::ES256),
            other => Err(AuthError::UnsupportedKey(format!("kty {}", other))),
        }
    }

    pub fn decoding_key(&self) -> Result<DecodingKey, AuthError> {
        match self.kty.as_str() {
            "RSA" => {
                let (n, e) = self.n.as_deref().zip(self.e.as_deref()).ok_or_else(|| {
                    AuthError::UnsupportedKey("RSA key missing n or e".to_string())
                })?;
                Ok(DecodingKey::from_rsa_components(n, e)?)
            }
            "EC" => {
                let (x, y) = self.x.as_deref().zip(self.y.as_deref()).ok_or_else(|| {
                    AuthError::UnsupportedKey("EC key missing x or y".to_string())
                })?;
                Ok(DecodingKey::from_ec_components(x, y)?)
            }
            other => Err(AuthError::UnsupportedKey(format!("kty {}", other))),
        }
    }
}

impl JwkSet {
    /// Signing keys matching `kid`, or every signing key when the token
    /// header carries no `kid`.
    pub fn candidates(&self, kid: Option<&str>) -> Vec<&Jwk> {
        self.keys
            .iter()
            .filter(|k| k.is_signing_key())
            .filter(|k| match kid {
                Some(kid) => k.kid.as_deref() == Some(kid),
                None => true,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rsa_key(kid: &str, key_use: Option<&str>) -> Jwk {
        Jwk {
            kty: "RSA".to_string(),
            kid: Some(kid.to_string()),
            alg: None,
            key_use: key_use.map(str::to_string),
            n: Some("AQAB".to_string()),
            e: Some("AQAB".to_string()),
            x: None,
            y: None,
        }
    }

    #[test]
    fn test_candidates_skip_encryption_keys() {
        let set = JwkSet {
            keys: vec![rsa_key("a", Some("sig")), rsa_key("b", Some("enc"))],
        };
        let kids: Vec<_> = set
            .candidates(None)
            .iter()
            .filter_map(|k| k.kid.clone())
            .collect();
        assert_eq!(kids, vec!["a".to_string()]);
        assert!(set.candidates(Some("b")).is_empty());
    }

    #[test]
    fn test_candidates_match_kid() {
        let set = JwkSet {
            keys: vec![rsa_key("a", None), rsa_key("b", None)],
        };
        let found = set.candidates(Some("b"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kid.as_deref(), Some("b"));
    }

    #[test]
    fn test_algorithm_inferred_from_key_type() {
        let mut key = rsa_key("a", None);
        assert_eq!(key.algorithm().unwrap(), Algorithm::RS256);

        key.alg = Some("RS512".to_string());
        assert_eq!(key.algorithm().unwrap(), Algorithm::RS512);

        key.alg = Some("HS256".to_string());
        assert!(matches!(key.algorithm(), Err(AuthError::UnsupportedKey(_))));
    }

    #[test]
    fn test_parse_keycloak_certs_document() {
        let doc = r#"{"keys":[{"kid":"k1","kty":"RSA","alg":"RS256","use":"sig",
            "n":"abc","e":"AQAB","x5c":["..."],"x5t":"t"}]}"#;
        let set: JwkSet = serde_json::from_str(doc).unwrap();
        assert_eq!(set.keys.len(), 1);
        assert_eq!(set.keys[0].kid.as_deref(), Some("k1"));
    }
}
