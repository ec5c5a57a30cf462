// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Feature toggle aggregation
//!
//! Every provider reports its capability flags through [`FeatureSource`]. The
//! [`FeatureAggregator`] runs them in order and merges their contributions.
//! A source that fails leaves its flags at `false`; the aggregate itself
//! never fails.

use ssp_api::{FeatureToggleResponse, FeaturesQuery};

use crate::error::SspError;

/// A provider that contributes flags to the feature toggle response
pub trait FeatureSource: Send + Sync {
    /// Provider name for logging
    fn name(&self) -> &'static str;

    /// Set this provider's flags in `flags`
    fn contribute(
        &self,
        query: &FeaturesQuery,
        flags: &mut FeatureToggleResponse,
    ) -> Result<(), SspError>;
}

#[derive(Default)]
pub struct FeatureAggregator {
    sources: Vec<Box<dyn FeatureSource>>,
}

impl FeatureAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: impl FeatureSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    pub fn collect(&self, query: &FeaturesQuery) -> FeatureToggleResponse {
        let mut flags = FeatureToggleResponse::default();

        for source in &self.sources {
            // Work on a copy so a failing source cannot leave partial flags
            let mut scratch = flags;
            match source.contribute(query, &mut scratch) {
                Ok(()) => flags = scratch,
                Err(e) => {
                    tracing::warn!(source = source.name(), error = %e, "feature source failed");
                }
            }
        }

        flags
    }
}

/// DDC is on whenever its API is configured
pub struct DdcFeatures {
    pub enabled: bool,
}

impl FeatureSource for DdcFeatures {
    fn name(&self) -> &'static str {
        "ddc"
    }

    fn contribute(
        &self,
        _query: &FeaturesQuery,
        flags: &mut FeatureToggleResponse,
    ) -> Result<(), SspError> {
        flags.ddc.enabled = self.enabled;
        Ok(())
    }
}

/// OTC flags follow from configured credentials
pub struct OtcFeatures {
    pub credentials: bool,
    pub rds_project: bool,
}

impl FeatureSource for OtcFeatures {
    fn name(&self) -> &'static str {
        "otc"
    }

    fn contribute(
        &self,
        _query: &FeaturesQuery,
        flags: &mut FeatureToggleResponse,
    ) -> Result<(), SspError> {
        flags.otc.ecs = self.credentials;
        flags.otc.rds = self.credentials && self.rds_project;
        Ok(())
    }
}

/// NFS availability per OpenShift cluster
pub struct OpenshiftFeatures {
    /// `(cluster id, has NFS API)`
    pub clusters: Vec<(String, bool)>,
}

impl FeatureSource for OpenshiftFeatures {
    fn name(&self) -> &'static str {
        "openshift"
    }

    fn contribute(
        &self,
        query: &FeaturesQuery,
        flags: &mut FeatureToggleResponse,
    ) -> Result<(), SspError> {
        let Some(cluster_id) = query.clusterid.as_deref().filter(|c| !c.is_empty()) else {
            return Ok(());
        };
        // An unknown cluster has no NFS API; that is not a failure
        flags.openshift.nfs = self
            .clusters
            .iter()
            .any(|(id, nfs)| id == cluster_id && *nfs);
        Ok(())
    }
}
