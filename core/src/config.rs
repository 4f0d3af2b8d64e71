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

use crate::{Error, Result};
use std::collections::HashMap;
use std::fmt::Debug;

/// ConfigLookup is the host's key/value configuration.
///
/// Values are addressed by `(section, key)`, for example `("aws", "timeout")`.
/// Implementations only need to provide string lookup; integer lookup and
/// defaults are derived from it.
pub trait ConfigLookup: Debug + Send + Sync + 'static {
    /// Get a string value.
    ///
    /// - Returns `Some(v)` if the key is set.
    /// - Returns `None` if the key (or the whole section) is absent.
    fn get_string(&self, section: &str, key: &str) -> Option<String>;

    /// Get an integer value.
    ///
    /// Returns `ConfigInvalid` if the key is set to something that is not an integer.
    fn get_int(&self, section: &str, key: &str) -> Result<Option<i64>> {
        let Some(v) = self.get_string(section, key) else {
            return Ok(None);
        };

        v.trim().parse::<i64>().map(Some).map_err(|e| {
            Error::config_invalid(format!("{section}.{key} must be an integer, got {v:?}"))
                .with_source(e)
        })
    }

    /// Get a string value, falling back to `default`.
    fn get_string_or(&self, section: &str, key: &str, default: &str) -> String {
        self.get_string(section, key)
            .unwrap_or_else(|| default.to_string())
    }

    /// Get an integer value, falling back to `default`.
    fn get_int_or(&self, section: &str, key: &str, default: i64) -> Result<i64> {
        Ok(self.get_int(section, key)?.unwrap_or(default))
    }
}

/// StaticConfig provides an in-memory configuration.
///
/// This is useful for testing or for hosts that already parsed their config files.
#[derive(Debug, Clone, Default)]
pub struct StaticConfig {
    values: HashMap<(String, String), String>,
}

impl StaticConfig {
    /// Set `section.key` to `value`.
    pub fn with(mut self, section: &str, key: &str, value: impl Into<String>) -> Self {
        self.values
            .insert((section.to_string(), key.to_string()), value.into());
        self
    }
}

impl ConfigLookup for StaticConfig {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.values
            .get(&(section.to_string(), key.to_string()))
            .cloned()
    }
}
