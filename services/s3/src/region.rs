// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::constants::AVAILABILITY_ZONE_PATH;
use crate::{Config, MetadataClient};
use cob_core::{Context, Error, Result};
use log::debug;
use std::sync::Arc;

/// RegionResolver finds the region the instance runs in.
///
/// - `aws.region` from config wins.
/// - Otherwise the availability zone from instance metadata, minus its zone letter.
#[derive(Debug)]
pub struct RegionResolver {
    config: Arc<Config>,
    client: MetadataClient,
}

impl RegionResolver {
    /// Create a new `RegionResolver` instance.
    pub fn new(config: Arc<Config>) -> Self {
        let client = MetadataClient::new(&config);
        Self { config, client }
    }

    /// Replace the metadata client used for the availability zone lookup.
    pub fn with_metadata_client(mut self, client: MetadataClient) -> Self {
        self.client = client;
        self
    }

    /// Resolve the region or fail with `NoRegion`.
    pub fn resolve(&self, ctx: &Context) -> Result<String> {
        if let Some(region) = &self.config.region {
            return Ok(region.clone());
        }

        let url = self.client.url(AVAILABILITY_ZONE_PATH);
        let Some(content) = self.client.fetch(ctx, &url, false).into_content() else {
            return Err(Error::no_region(
                "no region configured and availability zone is unknown",
            ));
        };

        let zone = String::from_utf8_lossy(&content);
        let region = region_from_availability_zone(&zone)
            .ok_or_else(|| Error::no_region(format!("invalid availability zone {zone:?}")))?;
        debug!("resolved region {region} from availability zone");
        Ok(region)
    }
}

/// `us-east-1a` => `us-east-1`
fn region_from_availability_zone(zone: &str) -> Option<String> {
    let zone = zone.trim();
    let region = zone.strip_suffix(|c: char| c.is_ascii_lowercase())?;
    if region.ends_with(|c: char| c.is_ascii_digit()) {
        Some(region.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup;
    use cob_core::ErrorKind;

    #[test]
    fn test_region_from_availability_zone() {
        assert_eq!(region_from_availability_zone("us-east-1a").as_deref(), Some("us-east-1"));
        assert_eq!(region_from_availability_zone("eu-west-1c\n").as_deref(), Some("eu-west-1"));
        assert_eq!(region_from_availability_zone(""), None);
        assert_eq!(region_from_availability_zone("us-east-1"), None);
    }

    #[test]
    fn test_configured_region_skips_metadata() {
        let (ctx, http, _) = setup(vec![]);
        let resolver = RegionResolver::new(Arc::new(Config {
            region: Some("ap-northeast-1".to_string()),
            ..Default::default()
        }));

        assert_eq!(resolver.resolve(&ctx).expect("must resolve"), "ap-northeast-1");
        assert!(http.calls().is_empty());
    }

    #[test]
    fn test_region_from_metadata() {
        let (ctx, http, _) = setup(vec![Some((200, "eu-central-1b\n"))]);
        let resolver = RegionResolver::new(Arc::new(Config::default()));

        assert_eq!(resolver.resolve(&ctx).expect("must resolve"), "eu-central-1");
        assert_eq!(
            http.urls(),
            vec!["http://169.254.169.254/latest/meta-data/placement/availability-zone/"]
        );
    }

    #[test]
    fn test_no_region() {
        let (ctx, _, sleep) = setup(vec![]);
        let resolver = RegionResolver::new(Arc::new(Config {
            retries: 2,
            ..Default::default()
        }));

        let err = resolver.resolve(&ctx).expect_err("must fail");

        assert_eq!(err.kind(), ErrorKind::NoRegion);
        assert_eq!(sleep.slept(), vec![1]);
    }
}
