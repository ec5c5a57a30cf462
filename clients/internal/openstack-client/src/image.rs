// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Glance (image) calls

use serde::Deserialize;

use crate::error::OpenStackError;
use crate::{MAX_PAGES, ServiceClient};

#[derive(Debug, Clone, Deserialize)]
pub struct Image {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub status: String,
    #[serde(default)]
    pub visibility: String,
    #[serde(default)]
    pub min_disk: u64,
    #[serde(default)]
    pub min_ram: u64,
}

#[derive(Deserialize)]
struct ImagesPage {
    images: Vec<Image>,
    #[serde(default)]
    next: Option<String>,
}

pub struct ImageClient {
    inner: ServiceClient,
}

impl ImageClient {
    pub fn new(inner: ServiceClient) -> Self {
        Self { inner }
    }

    /// Catalog endpoint without any version suffix; Glance `next` links are
    /// relative to this.
    fn root(&self) -> &str {
        self.inner.endpoint().trim_end_matches("/v2")
    }

    /// Every image visible to the project, across all pages
    pub async fn list_images(&self) -> Result<Vec<Image>, OpenStackError> {
        let mut images = Vec::new();
        let mut url = format!("{}/v2/images", self.root());

        for _ in 0..MAX_PAGES {
            let page: ImagesPage = self.inner.get_json_url(&url).await?;
            images.extend(page.images);

            match page.next {
                Some(next) if !next.is_empty() => {
                    url = format!("{}/{}", self.root(), next.trim_start_matches('/'));
                }
                _ => return Ok(images),
            }
        }

        tracing::warn!(pages = MAX_PAGES, "stopped following glance pagination");
        Ok(images)
    }
}
