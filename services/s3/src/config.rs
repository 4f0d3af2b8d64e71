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

use crate::constants::*;
use cob_core::utils::Redact;
use cob_core::{ConfigLookup, Error, Result};
use std::fmt::{Debug, Formatter};
use std::time::Duration;

/// Config for S3 repositories.
///
/// Built once from the host configuration and then shared read-only by every
/// component that needs it.
#[derive(Clone)]
pub struct Config {
    /// `timeout` bounds every single metadata request.
    ///
    /// - config value: `aws.timeout` (seconds)
    /// - default to: `60`
    pub timeout: Duration,
    /// `retries` is the number of attempts made against the metadata service.
    ///
    /// - config value: `aws.retries`
    /// - default to: `5`
    pub retries: u32,
    /// `metadata_server` is the base url of the instance metadata service.
    ///
    /// - config value: `aws.metadata_server`
    /// - default to: `http://169.254.169.254`
    pub metadata_server: String,
    /// `region` overrides region discovery.
    ///
    /// - config value: `aws.region`
    pub region: Option<String>,
    /// `access_key_id` will be loaded from
    ///
    /// - config value: `aws.access_key`
    pub access_key_id: Option<String>,
    /// `secret_access_key` will be loaded from
    ///
    /// - config value: `aws.secret_key`
    pub secret_access_key: Option<String>,
    /// `session_token` will be loaded from
    ///
    /// - config value: `aws.token`
    pub session_token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS as u64),
            retries: DEFAULT_RETRIES as u32,
            metadata_server: DEFAULT_METADATA_SERVER.to_string(),
            region: None,
            access_key_id: None,
            secret_access_key: None,
            session_token: None,
        }
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("timeout", &self.timeout)
            .field("retries", &self.retries)
            .field("metadata_server", &self.metadata_server)
            .field("region", &self.region)
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("secret_access_key", &Redact::from(&self.secret_access_key))
            .field("session_token", &Redact::from(&self.session_token))
            .finish()
    }
}

impl Config {
    /// Load config from the host's `aws` section.
    ///
    /// Empty strings are treated as unset.
    pub fn from_lookup(lookup: &dyn ConfigLookup) -> Result<Self> {
        let timeout = lookup.get_int_or(CONFIG_SECTION, CONFIG_TIMEOUT, DEFAULT_TIMEOUT_SECS)?;
        let timeout = u64::try_from(timeout).map_err(|e| {
            Error::config_invalid(format!("aws.timeout must not be negative, got {timeout}"))
                .with_source(e)
        })?;

        let retries = lookup.get_int_or(CONFIG_SECTION, CONFIG_RETRIES, DEFAULT_RETRIES)?;
        let retries = u32::try_from(retries).map_err(|e| {
            Error::config_invalid(format!(
                "aws.retries must be a small positive number, got {retries}"
            ))
            .with_source(e)
        })?;

        let string = |key: &str| {
            lookup
                .get_string(CONFIG_SECTION, key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Ok(Self {
            timeout: Duration::from_secs(timeout),
            retries,
            metadata_server: string(CONFIG_METADATA_SERVER)
                .unwrap_or_else(|| DEFAULT_METADATA_SERVER.to_string()),
            region: string(CONFIG_REGION),
            access_key_id: string(CONFIG_ACCESS_KEY),
            secret_access_key: string(CONFIG_SECRET_KEY),
            session_token: string(CONFIG_TOKEN),
        })
    }
}
