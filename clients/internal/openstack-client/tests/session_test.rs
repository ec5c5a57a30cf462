// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

// Allow expect/unwrap in tests - they provide clear panic messages on failure
#![allow(clippy::expect_used, clippy::unwrap_used)]

//! Session, catalog and service call tests against a mocked cloud

use openstack_client::{AuthOptions, EndpointOpts, OpenStackError, ServerAction, Session};
use secrecy::SecretString;
use serde_json::{Value, json};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const REGION: &str = "eu-ch";
const PROJECT_ID: &str = "0a1b2c3d4e5f";

fn http_client() -> reqwest::Client {
    let _ = rustls::crypto::ring::default_provider().install_default();
    reqwest::Client::builder().build().unwrap()
}

fn auth_options(server: &MockServer) -> AuthOptions {
    AuthOptions {
        auth_url: format!("{}/v3", server.uri()),
        username: "svc-ssp".to_string(),
        password: SecretString::from("s3cret".to_string()),
        domain_name: "OTC-EU-CH-0000".to_string(),
        project_name: REGION.to_string(),
    }
}

fn catalog(base: &str) -> Value {
    json!([
        {"type": "compute", "name": "nova", "endpoints": [
            {"interface": "public", "region": REGION, "url": format!("{}/nova/v2.1/{}", base, PROJECT_ID)}
        ]},
        {"type": "image", "name": "glance", "endpoints": [
            {"interface": "public", "region": REGION, "url": format!("{}/glance", base)}
        ]},
        {"type": "volumev2", "name": "cinderv2", "endpoints": [
            {"interface": "public", "region": REGION, "url": format!("{}/cinder/v2/$(tenant_id)s", base)}
        ]},
        {"type": "rds", "name": "rds", "endpoints": [
            {"interface": "public", "region": REGION, "url": format!("{}/rds/v1/{}", base, PROJECT_ID)}
        ]}
    ])
}

async fn mount_keystone(server: &MockServer, expires_in: chrono::Duration, times: u64) {
    let expires_at = (chrono::Utc::now() + expires_in).to_rfc3339();
    Mock::given(method("POST"))
        .and(path("/v3/auth/tokens"))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("X-Subject-Token", "gAAAAAB-token")
                .set_body_json(json!({
                    "token": {
                        "expires_at": expires_at,
                        "project": {"id": PROJECT_ID, "name": REGION},
                        "catalog": catalog(&server.uri())
                    }
                })),
        )
        .expect(times)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_token_is_reused_until_close_to_expiry() {
    let server = MockServer::start().await;
    mount_keystone(&server, chrono::Duration::hours(12), 1).await;

    let session = Session::new(http_client(), auth_options(&server), REGION);
    let first = session.token().await.unwrap();
    let second = session.token().await.unwrap();
    assert_eq!(first.project_id, PROJECT_ID);
    assert_eq!(second.project_id, PROJECT_ID);
}

#[tokio::test]
async fn test_expiring_token_is_replaced() {
    let server = MockServer::start().await;
    mount_keystone(&server, chrono::Duration::minutes(2), 2).await;

    let session = Session::new(http_client(), auth_options(&server), REGION);
    session.token().await.unwrap();
    session.token().await.unwrap();
}

#[tokio::test]
async fn test_keystone_rejection_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/auth/tokens"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad credentials"))
        .mount(&server)
        .await;

    let session = Session::new(http_client(), auth_options(&server), REGION);
    let err = session.token().await.unwrap_err();
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn test_missing_subject_token_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/auth/tokens"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "token": {"project": {"id": PROJECT_ID}, "catalog": []}
        })))
        .mount(&server)
        .await;

    let session = Session::new(http_client(), auth_options(&server), REGION);
    let err = session.token().await.unwrap_err();
    assert!(matches!(err, OpenStackError::MissingToken), "got {:?}", err);
}

#[tokio::test]
async fn test_unknown_region_has_no_endpoint() {
    let server = MockServer::start().await;
    mount_keystone(&server, chrono::Duration::hours(12), 1).await;

    let session = Session::new(http_client(), auth_options(&server), "eu-nl");
    let err = session.compute().await.err().unwrap();
    assert!(
        matches!(err, OpenStackError::EndpointNotFound { .. }),
        "got {:?}",
        err
    );
}

#[tokio::test]
async fn test_compute_calls_send_token_and_parse() {
    let server = MockServer::start().await;
    mount_keystone(&server, chrono::Duration::hours(12), 1).await;

    Mock::given(method("GET"))
        .and(path(format!("/nova/v2.1/{}/servers/detail", PROJECT_ID)))
        .and(header("X-Auth-Token", "gAAAAAB-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "servers": [{
                "id": "srv-1",
                "name": "web-1",
                "status": "ACTIVE",
                "created": "2026-03-01T10:00:00Z",
                "metadata": {"owner": "u123456"},
                "flavor": {"id": "s2.medium.4"},
                "image": {"id": "img-1"},
                "addresses": {"net": [{"addr": "10.0.0.7", "version": 4}]}
            }]
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("/nova/v2.1/{}/servers/srv-1/action", PROJECT_ID)))
        .and(body_json(json!({"reboot": {"type": "SOFT"}})))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let session = Session::new(http_client(), auth_options(&server), REGION);
    let compute = session.compute().await.unwrap();

    let servers = compute.list_servers_detail().await.unwrap();
    assert_eq!(servers.len(), 1);
    assert!(servers[0].is_owned_by("U123456"));

    compute
        .server_action("srv-1", ServerAction::Reboot)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_server_errors_are_retried() {
    let server = MockServer::start().await;
    mount_keystone(&server, chrono::Duration::hours(12), 1).await;

    Mock::given(method("GET"))
        .and(path(format!("/nova/v2.1/{}/flavors/detail", PROJECT_ID)))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/nova/v2.1/{}/flavors/detail", PROJECT_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "flavors": [{"id": "s2.large.2", "name": "s2.large.2", "vcpus": 2, "ram": 4096, "disk": 0}]
        })))
        .mount(&server)
        .await;

    let session = Session::new(http_client(), auth_options(&server), REGION);
    let flavors = session
        .compute()
        .await
        .unwrap()
        .list_flavors()
        .await
        .unwrap();
    assert_eq!(flavors[0].vcpus, 2);
}

#[tokio::test]
async fn test_actions_are_not_retried() {
    let server = MockServer::start().await;
    mount_keystone(&server, chrono::Duration::hours(12), 1).await;

    Mock::given(method("POST"))
        .and(path(format!("/nova/v2.1/{}/servers/srv-1/action", PROJECT_ID)))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let session = Session::new(http_client(), auth_options(&server), REGION);
    let err = session
        .compute()
        .await
        .unwrap()
        .server_action("srv-1", ServerAction::Stop)
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn test_images_follow_next_links() {
    let server = MockServer::start().await;
    mount_keystone(&server, chrono::Duration::hours(12), 1).await;

    Mock::given(method("GET"))
        .and(path("/glance/v2/images"))
        .respond_with(|req: &Request| {
            let second_page = req.url.query_pairs().any(|(k, _)| k == "marker");
            if second_page {
                ResponseTemplate::new(200).set_body_json(json!({
                    "images": [{"id": "img-2", "name": "Standard_Debian_12", "status": "active", "visibility": "public"}]
                }))
            } else {
                ResponseTemplate::new(200).set_body_json(json!({
                    "images": [{"id": "img-1", "name": "Standard_Ubuntu_24.04", "status": "active", "visibility": "public"}],
                    "next": "/v2/images?marker=img-1"
                }))
            }
        })
        .expect(2)
        .mount(&server)
        .await;

    let session = Session::new(http_client(), auth_options(&server), REGION);
    let images = session
        .image()
        .await
        .unwrap()
        .list_images()
        .await
        .unwrap();
    let ids: Vec<&str> = images.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["img-1", "img-2"]);
}

#[tokio::test]
async fn test_block_storage_falls_back_to_v2() {
    let server = MockServer::start().await;
    mount_keystone(&server, chrono::Duration::hours(12), 1).await;

    Mock::given(method("GET"))
        .and(path(format!("/cinder/v2/{}/types", PROJECT_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "volume_types": [{"id": "vt-1", "name": "SSD", "description": null}]
        })))
        .mount(&server)
        .await;

    let session = Session::new(http_client(), auth_options(&server), REGION);
    let types = session
        .block_storage()
        .await
        .unwrap()
        .list_volume_types()
        .await
        .unwrap();
    assert_eq!(types[0].name, "SSD");
}

#[tokio::test]
async fn test_rds_flavors_query() {
    let server = MockServer::start().await;
    mount_keystone(&server, chrono::Duration::hours(12), 1).await;

    Mock::given(method("GET"))
        .and(path(format!("/rds/v1/{}/flavors", PROJECT_ID)))
        .and(query_param("dbId", "ver-57"))
        .and(query_param("region", REGION))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "flavors": [{
                "id": "fl-1",
                "name": "rds.mysql.c2.large",
                "specCode": "rds.mysql.c2.large",
                "ram": 4096,
                "flavorDetail": [{"name": "cpu", "value": "2"}]
            }]
        })))
        .mount(&server)
        .await;

    let session = Session::new(http_client(), auth_options(&server), REGION);
    let flavors = session
        .rds()
        .await
        .unwrap()
        .list_flavors("ver-57")
        .await
        .unwrap();
    assert_eq!(flavors[0].vcpus(), Some(2));
    assert_eq!(flavors[0].spec_code, "rds.mysql.c2.large");
}

fn server_json(id: &str) -> Value {
    json!({
        "id": id,
        "name": id,
        "status": "ACTIVE",
        "created": "2026-03-01T10:00:00Z",
        "metadata": {"owner": "u123456"},
        "flavor": {"id": "s2.medium.4"},
        "image": {"id": "img-1"}
    })
}

#[tokio::test]
async fn test_servers_follow_pagination_links() {
    let server = MockServer::start().await;
    mount_keystone(&server, chrono::Duration::hours(12), 1).await;

    let next = format!(
        "{}/nova/v2.1/{}/servers/detail?marker=srv-1",
        server.uri(),
        PROJECT_ID
    );
    Mock::given(method("GET"))
        .and(path(format!("/nova/v2.1/{}/servers/detail", PROJECT_ID)))
        .respond_with(move |req: &Request| {
            let second_page = req.url.query_pairs().any(|(k, _)| k == "marker");
            if second_page {
                ResponseTemplate::new(200).set_body_json(json!({
                    "servers": [server_json("srv-2")]
                }))
            } else {
                ResponseTemplate::new(200).set_body_json(json!({
                    "servers": [server_json("srv-1")],
                    "servers_links": [{"href": next, "rel": "next"}]
                }))
            }
        })
        .expect(2)
        .mount(&server)
        .await;

    let session = Session::new(http_client(), auth_options(&server), REGION);
    let servers = session
        .compute()
        .await
        .unwrap()
        .list_servers_detail()
        .await
        .unwrap();
    let ids: Vec<&str> = servers.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["srv-1", "srv-2"]);
}

#[tokio::test]
async fn test_rejected_token_is_replaced_once() {
    let server = MockServer::start().await;
    mount_keystone(&server, chrono::Duration::hours(12), 2).await;

    Mock::given(method("GET"))
        .and(path(format!("/nova/v2.1/{}/flavors/detail", PROJECT_ID)))
        .respond_with(ResponseTemplate::new(401).set_body_string("token revoked"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/nova/v2.1/{}/flavors/detail", PROJECT_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "flavors": [{"id": "s2.large.2", "name": "s2.large.2", "vcpus": 2, "ram": 4096}]
        })))
        .mount(&server)
        .await;

    let session = Session::new(http_client(), auth_options(&server), REGION);
    let flavors = session
        .compute()
        .await
        .unwrap()
        .list_flavors()
        .await
        .unwrap();
    assert_eq!(flavors[0].name, "s2.large.2");
}

#[tokio::test]
async fn test_persistent_rejection_is_reported() {
    let server = MockServer::start().await;
    mount_keystone(&server, chrono::Duration::hours(12), 2).await;

    Mock::given(method("POST"))
        .and(path(format!("/nova/v2.1/{}/servers/srv-1/action", PROJECT_ID)))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;

    let session = Session::new(http_client(), auth_options(&server), REGION);
    let err = session
        .compute()
        .await
        .unwrap()
        .server_action("srv-1", ServerAction::Start)
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn test_rds_endpoint_without_region() {
    let server = MockServer::start().await;
    let base = server.uri();
    Mock::given(method("POST"))
        .and(path("/v3/auth/tokens"))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("X-Subject-Token", "gAAAAAB-rds-token")
                .set_body_json(json!({
                    "token": {
                        "expires_at": (chrono::Utc::now() + chrono::Duration::hours(12)).to_rfc3339(),
                        "project": {"id": PROJECT_ID, "name": "eu-ch_rds"},
                        "catalog": [
                            {"type": "rds", "name": "rds", "endpoints": [
                                {"interface": "public", "url": format!("{}/rds/v1/$(tenant_id)s", base)}
                            ]}
                        ]
                    }
                })),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/rds/v1/{}/flavors", PROJECT_ID)))
        .and(query_param("region", REGION))
        .and(header("X-Auth-Token", "gAAAAAB-rds-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"flavors": []})))
        .expect(1)
        .mount(&server)
        .await;

    let mut options = auth_options(&server);
    options.project_name = "eu-ch_rds".to_string();

    let strict = Session::new(http_client(), options.clone(), REGION);
    let err = strict.rds().await.err().unwrap();
    assert!(
        matches!(err, OpenStackError::EndpointNotFound { .. }),
        "got {:?}",
        err
    );

    let session = Session::new(http_client(), options, REGION)
        .with_endpoint_opts(EndpointOpts::public(""));
    let flavors = session
        .rds()
        .await
        .unwrap()
        .list_flavors("ver-57")
        .await
        .unwrap();
    assert!(flavors.is_empty());
}
