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

use crate::provide_credential::{ConfigCredentialProvider, ImdsCredentialProvider};
use crate::{Config, Credential, MetadataClient};
use cob_core::{Context, Error, ProvideCredential, Result};
use log::debug;
use std::sync::Arc;

/// DefaultCredentialProvider resolves credentials in this order:
///
/// 1. Static keys from config (`aws.access_key` + `aws.secret_key`). When both
///    are present the metadata service is never contacted.
/// 2. The IAM role attached to the instance, via instance metadata.
#[derive(Debug)]
pub struct DefaultCredentialProvider {
    config_loader: ConfigCredentialProvider,
    imds_loader: ImdsCredentialProvider,
}

impl DefaultCredentialProvider {
    /// Create a new `DefaultCredentialProvider` instance.
    pub fn new(config: Arc<Config>) -> Self {
        let imds_loader = ImdsCredentialProvider::new(MetadataClient::new(&config));
        Self {
            config_loader: ConfigCredentialProvider::new(config),
            imds_loader,
        }
    }

    /// Replace the metadata client used for the IAM role lookup.
    pub fn with_metadata_client(mut self, client: MetadataClient) -> Self {
        self.imds_loader = ImdsCredentialProvider::new(client);
        self
    }

    /// Resolve credentials or fail with `NoCredentials` / `IncorrectCredentials`.
    pub fn resolve(&self, ctx: &Context) -> Result<Credential> {
        self.provide_credential(ctx)?
            .ok_or_else(|| Error::no_credentials("no credentials could be found"))
    }
}

impl ProvideCredential for DefaultCredentialProvider {
    type Credential = Credential;

    fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        if let Some(cred) = self.config_loader.provide_credential(ctx)? {
            debug!("loaded credential from config");
            return Ok(Some(cred));
        }

        let cred = self.imds_loader.provide_credential(ctx)?;
        debug!("loaded credential from instance metadata");
        Ok(cred)
    }
}
