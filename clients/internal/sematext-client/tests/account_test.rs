// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

// Allow expect/unwrap in tests - they provide clear panic messages on failure
#![allow(clippy::expect_used, clippy::unwrap_used)]

use secrecy::SecretString;
use sematext_client::{SematextClient, SematextError};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> SematextClient {
    let _ = rustls::crypto::ring::default_provider().install_default();
    SematextClient::new(
        reqwest::Client::builder().build().unwrap(),
        server.uri(),
        SecretString::from("st-key".to_string()),
    )
}

#[tokio::test]
async fn test_list_apps_unwraps_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users-web/api/v3/apps/users"))
        .and(header("Authorization", "apiKey st-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"apps": [
                {"id": 1, "name": "a", "appType": "Logsene", "status": "ACTIVE", "userRoles": []}
            ]}
        })))
        .mount(&server)
        .await;

    let apps = client_for(&server).list_apps().await.unwrap();
    assert_eq!(apps.len(), 1);
    assert_eq!(apps[0].app_type, "Logsene");
}

#[tokio::test]
async fn test_list_plans_by_app_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users-web/api/v3/billing/availablePlans"))
        .and(query_param("appType", "Logsene"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"availablePlans": [
                {"id": 7, "name": "Basic", "pricePerMonth": 0.0, "defaultDailyMaxLimitSizeMb": 500},
                {"id": 8, "name": "Standard", "pricePerMonth": 50.0}
            ]}
        })))
        .mount(&server)
        .await;

    let plans = client_for(&server).list_plans("Logsene").await.unwrap();
    assert_eq!(plans.len(), 2);
    assert_eq!(plans[0].default_daily_max_limit_size_mb, Some(500));
    assert_eq!(plans[1].default_daily_max_limit_size_mb, None);
}

#[tokio::test]
async fn test_unsuccessful_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "Invalid api key"
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).list_apps().await.unwrap_err();
    assert!(matches!(err, SematextError::Api(ref m) if m == "Invalid api key"), "got {:?}", err);
}

#[tokio::test]
async fn test_http_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client_for(&server).list_plans("Logsene").await.unwrap_err();
    assert!(matches!(err, SematextError::Status { status: 401, .. }), "got {:?}", err);
}
