// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Nova (compute) calls

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::OpenStackError;
use crate::{MAX_PAGES, ServiceClient};

/// Server metadata key naming the user a server belongs to
pub const OWNER_METADATA_KEY: &str = "owner";

#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    pub id: String,
    pub name: String,
    pub status: String,
    pub created: DateTime<Utc>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    pub flavor: ServerFlavor,
    /// An object with an `id`, or `""` for volume-booted servers
    #[serde(default)]
    pub image: Value,
    #[serde(default)]
    pub addresses: HashMap<String, Vec<ServerAddress>>,
    #[serde(rename = "OS-EXT-AZ:availability_zone", default)]
    pub availability_zone: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerFlavor {
    #[serde(default)]
    pub id: Option<String>,
    /// Present from microversion 2.47 on, where `id` is dropped
    #[serde(default)]
    pub original_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerAddress {
    pub addr: String,
    #[serde(default)]
    pub version: Option<u8>,
}

impl Server {
    /// Value of the `owner` metadata entry, matching the key case-insensitively
    pub fn owner(&self) -> Option<&str> {
        self.metadata
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(OWNER_METADATA_KEY))
            .map(|(_, v)| v.as_str())
    }

    pub fn is_owned_by(&self, username: &str) -> bool {
        self.owner()
            .is_some_and(|owner| owner.eq_ignore_ascii_case(username))
    }

    pub fn image_id(&self) -> Option<&str> {
        self.image.get("id").and_then(Value::as_str)
    }

    /// All addresses across networks, sorted for stable output
    pub fn ip_addresses(&self) -> Vec<String> {
        let mut ips: Vec<String> = self
            .addresses
            .values()
            .flatten()
            .map(|a| a.addr.clone())
            .collect();
        ips.sort();
        ips.dedup();
        ips
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Flavor {
    pub id: String,
    pub name: String,
    pub vcpus: u32,
    /// MiB
    pub ram: u64,
    /// GiB
    #[serde(default)]
    pub disk: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AvailabilityZone {
    #[serde(rename = "zoneName")]
    pub name: String,
    #[serde(rename = "zoneState")]
    pub state: ZoneState,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ZoneState {
    pub available: bool,
}

/// Power actions a portal user may trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerAction {
    Start,
    Stop,
    Reboot,
}

impl ServerAction {
    pub fn body(self) -> Value {
        match self {
            ServerAction::Start => json!({ "os-start": null }),
            ServerAction::Stop => json!({ "os-stop": null }),
            ServerAction::Reboot => json!({ "reboot": { "type": "SOFT" } }),
        }
    }

    /// Past tense, for user-facing messages
    pub fn verb(self) -> &'static str {
        match self {
            ServerAction::Start => "started",
            ServerAction::Stop => "stopped",
            ServerAction::Reboot => "rebooted",
        }
    }
}

#[derive(Deserialize)]
struct ServersEnvelope {
    servers: Vec<Server>,
    #[serde(default)]
    servers_links: Vec<Link>,
}

#[derive(Deserialize)]
struct Link {
    href: String,
    rel: String,
}

impl ServersEnvelope {
    /// Absolute URL of the following page, if Nova truncated this one
    fn next_page(&self) -> Option<&str> {
        self.servers_links
            .iter()
            .find(|link| link.rel == "next")
            .map(|link| link.href.as_str())
    }
}

#[derive(Deserialize)]
struct ServerEnvelope {
    server: Server,
}

#[derive(Deserialize)]
struct FlavorsEnvelope {
    flavors: Vec<Flavor>,
}

#[derive(Deserialize)]
struct ZonesEnvelope {
    #[serde(rename = "availabilityZoneInfo")]
    zones: Vec<AvailabilityZone>,
}

pub struct ComputeClient {
    inner: ServiceClient,
}

impl ComputeClient {
    pub fn new(inner: ServiceClient) -> Self {
        Self { inner }
    }

    /// Every server in the project, following `servers_links` when Nova
    /// caps the page size
    pub async fn list_servers_detail(&self) -> Result<Vec<Server>, OpenStackError> {
        let mut servers = Vec::new();
        let mut url = self.inner.url("servers/detail");

        for _ in 0..MAX_PAGES {
            let page: ServersEnvelope = self.inner.get_json_url(&url).await?;
            let next = page.next_page().map(str::to_string);
            servers.extend(page.servers);

            match next {
                Some(next) => url = next,
                None => return Ok(servers),
            }
        }

        tracing::warn!(pages = MAX_PAGES, "stopped following nova pagination");
        Ok(servers)
    }

    pub async fn get_server(&self, id: &str) -> Result<Server, OpenStackError> {
        let path = format!("servers/{}", urlencoding::encode(id));
        let envelope: ServerEnvelope = self.inner.get_json(&path).await?;
        Ok(envelope.server)
    }

    pub async fn server_action(&self, id: &str, action: ServerAction) -> Result<(), OpenStackError> {
        let path = format!("servers/{}/action", urlencoding::encode(id));
        tracing::info!(server = id, action = ?action, "sending server action");
        self.inner.post_json(&path, &action.body()).await
    }

    pub async fn list_flavors(&self) -> Result<Vec<Flavor>, OpenStackError> {
        let envelope: FlavorsEnvelope = self.inner.get_json("flavors/detail").await?;
        Ok(envelope.flavors)
    }

    pub async fn list_availability_zones(&self) -> Result<Vec<AvailabilityZone>, OpenStackError> {
        let envelope: ZonesEnvelope = self.inner.get_json("os-availability-zone").await?;
        Ok(envelope.zones)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn server(metadata: Value, image: Value) -> Server {
        serde_json::from_value(json!({
            "id": "6f1b2c3d",
            "name": "web-1",
            "status": "ACTIVE",
            "created": "2026-03-01T10:00:00Z",
            "metadata": metadata,
            "flavor": {"id": "s2.medium.4"},
            "image": image,
            "addresses": {
                "net-b": [{"addr": "10.0.1.5", "version": 4}],
                "net-a": [{"addr": "10.0.0.7", "version": 4}]
            },
            "OS-EXT-AZ:availability_zone": "eu-ch-01"
        }))
        .unwrap()
    }

    #[test]
    fn test_owner_matching_ignores_case() {
        let s = server(json!({"Owner": "U123456"}), json!({"id": "img-1"}));
        assert_eq!(s.owner(), Some("U123456"));
        assert!(s.is_owned_by("u123456"));
        assert!(!s.is_owned_by("u999999"));
    }

    #[test]
    fn test_server_without_owner() {
        let s = server(json!({}), json!(""));
        assert_eq!(s.owner(), None);
        assert!(!s.is_owned_by("u123456"));
        assert_eq!(s.image_id(), None);
    }

    #[test]
    fn test_ip_addresses_flattened() {
        let s = server(json!({}), json!({"id": "img-1"}));
        assert_eq!(s.ip_addresses(), vec!["10.0.0.7", "10.0.1.5"]);
        assert_eq!(s.image_id(), Some("img-1"));
        assert_eq!(s.availability_zone.as_deref(), Some("eu-ch-01"));
    }

    #[test]
    fn test_next_page_link() {
        let page: ServersEnvelope = serde_json::from_value(json!({
            "servers": [],
            "servers_links": [
                {"href": "https://ecs.example.com/v2.1/p/servers/detail?marker=a", "rel": "next"}
            ]
        }))
        .unwrap();
        assert_eq!(
            page.next_page(),
            Some("https://ecs.example.com/v2.1/p/servers/detail?marker=a")
        );

        let last: ServersEnvelope = serde_json::from_value(json!({"servers": []})).unwrap();
        assert_eq!(last.next_page(), None);
    }

    #[test]
    fn test_action_bodies() {
        assert_eq!(ServerAction::Stop.body(), json!({"os-stop": null}));
        assert_eq!(ServerAction::Start.body(), json!({"os-start": null}));
        assert_eq!(
            ServerAction::Reboot.body(),
            json!({"reboot": {"type": "SOFT"}})
        );
    }
}
