// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

// Allow expect/unwrap in tests - they provide clear panic messages on failure
#![allow(clippy::expect_used, clippy::unwrap_used)]

use secrecy::SecretString;
use serde_json::{Map, Value, json};
use tower_client::{TowerClient, TowerError};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// "svc-tower:tower-pw" in base64
const BASIC_AUTH: &str = "Basic c3ZjLXRvd2VyOnRvd2VyLXB3";

fn client_for(server: &MockServer) -> TowerClient {
    let _ = rustls::crypto::ring::default_provider().install_default();
    TowerClient::new(
        reqwest::Client::builder().build().unwrap(),
        server.uri(),
        "svc-tower",
        &SecretString::from("tower-pw".to_string()),
    )
    .unwrap()
}

#[tokio::test]
async fn test_get_job_template_with_basic_auth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/job_templates/12/"))
        .and(header("Authorization", BASIC_AUTH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 12,
            "name": "Create VM",
            "description": "Provision a virtual machine",
            "type": "job_template"
        })))
        .mount(&server)
        .await;

    let template = client_for(&server).get_job_template(12).await.unwrap();
    assert_eq!(template.name, "Create VM");
}

#[tokio::test]
async fn test_launch_posts_extra_vars() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/job_templates/12/launch/"))
        .and(body_json(json!({"extra_vars": {"custom_tower_user_name": "u123456"}})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"job": 981, "id": 981})))
        .expect(1)
        .mount(&server)
        .await;

    let mut vars = Map::new();
    vars.insert("custom_tower_user_name".to_string(), Value::from("u123456"));
    let job_id = client_for(&server)
        .launch_job_template(12, &vars)
        .await
        .unwrap();
    assert_eq!(job_id, 981);
}

#[tokio::test]
async fn test_job_and_stdout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/jobs/981/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 981,
            "name": "Create VM",
            "status": "running",
            "failed": false,
            "started": "2026-04-02T12:00:00Z",
            "finished": null,
            "extra_vars": "{\"custom_tower_user_name\": \"u123456\"}"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/jobs/981/stdout/"))
        .and(query_param("format", "txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("PLAY [all] ****\n"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let job = client.get_job(981).await.unwrap();
    assert_eq!(job.extra_var("custom_tower_user_name").as_deref(), Some("u123456"));
    assert!(job.finished.is_none());

    let stdout = client.get_job_stdout(981).await.unwrap();
    assert_eq!(stdout, "PLAY [all] ****\n");
}

#[tokio::test]
async fn test_missing_job_is_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Not found."})))
        .mount(&server)
        .await;

    let err = client_for(&server).get_job(5).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert!(matches!(err, TowerError::Status { method: "GET", .. }));
}
