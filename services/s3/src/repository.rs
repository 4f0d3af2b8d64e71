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

use crate::constants::{AWS_URI_ENCODE_SET, DEFAULT_REGION, SERVICE_NAME};
use crate::endpoint::embedded_region;
use crate::{
    is_storage_url, is_storage_urls, Config, Credential, DefaultCredentialProvider, RequestSigner,
};
use cob_core::{Context, Error, Result};
use http::HeaderMap;
use log::{debug, warn};
use percent_encoding::utf8_percent_encode;
use std::sync::Arc;

/// A repository as seen by the host package manager.
pub trait Mirrors {
    /// Repository id, used in logs and in [`Prepared`].
    fn id(&self) -> &str;

    /// Candidate base urls of this repository.
    fn base_urls(&self) -> Vec<String>;

    /// Disabled repositories are never prepared.
    fn enabled(&self) -> bool {
        true
    }
}

/// An S3 backed repository holding the credential resolved for it.
///
/// The host calls [`S3Repository::fetch_headers`] before every file it fetches
/// and adds the returned headers to its own request.
#[derive(Debug, Clone)]
pub struct S3Repository {
    id: String,
    config: Arc<Config>,
    credential: Credential,
}

impl S3Repository {
    /// Resolve credentials for repository `id` and build it.
    ///
    /// Fails with `NoCredentials` or `IncorrectCredentials`; the host must
    /// disable the repository in that case.
    pub fn new(ctx: &Context, config: Arc<Config>, id: &str) -> Result<Self> {
        let credential = DefaultCredentialProvider::new(config.clone()).resolve(ctx)?;
        Ok(Self::with_credential(config, id, credential))
    }

    /// Build a repository from an already resolved credential.
    pub fn with_credential(config: Arc<Config>, id: &str, credential: Credential) -> Self {
        Self {
            id: id.to_string(),
            config,
            credential,
        }
    }

    /// Repository id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Credential used to sign this repository's fetches.
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Compute the headers needed to `GET` `relative` from mirror `base_url`.
    ///
    /// Mirrors outside S3 get an empty header map. The region comes from the
    /// mirror hostname, then from `aws.region`, then defaults to `us-east-1`.
    pub fn fetch_headers(&self, base_url: &str, relative: &str) -> Result<HeaderMap> {
        if !is_storage_url(base_url) {
            debug!("repo {}: mirror {base_url} is not on s3, not signing", self.id);
            return Ok(HeaderMap::new());
        }

        let url = join_url(base_url, relative);
        let region = embedded_region(base_url)
            .or_else(|| self.config.region.clone())
            .unwrap_or_else(|| DEFAULT_REGION.to_string());
        debug!("repo {}: signing {url} for region {region}", self.id);

        let (mut parts, _) = http::Request::get(url.as_str()).body(())?.into_parts();
        RequestSigner::new(SERVICE_NAME, &region).sign(&mut parts, Some(&self.credential))?;

        Ok(parts.headers)
    }
}

/// Outcome of preparing one S3 backed repository.
#[derive(Debug)]
pub enum Prepared {
    /// Credentials resolved, fetches can be signed.
    Ready(S3Repository),
    /// Credentials could not be resolved; the host must disable the repository.
    Disabled {
        /// Repository id.
        id: String,
        /// Why the repository can't be used.
        error: Error,
    },
}

impl Prepared {
    /// Repository id.
    pub fn id(&self) -> &str {
        match self {
            Prepared::Ready(repo) => repo.id(),
            Prepared::Disabled { id, .. } => id,
        }
    }
}

/// Prepare every enabled, S3 backed repository of `repos`.
///
/// Each repository resolves its own credential; a failure only disables that
/// repository. Repositories that are disabled or not on S3 are not returned.
pub fn prepare_repositories<'a, R>(
    ctx: &Context,
    config: Arc<Config>,
    repos: impl IntoIterator<Item = &'a R>,
) -> Vec<Prepared>
where
    R: Mirrors + ?Sized + 'a,
{
    repos
        .into_iter()
        .filter(|repo| repo.enabled() && is_storage_urls(repo.base_urls()))
        .map(|repo| match S3Repository::new(ctx, config.clone(), repo.id()) {
            Ok(repo) => Prepared::Ready(repo),
            Err(error) => {
                warn!("repo {}: disabled, {error}", repo.id());
                Prepared::Disabled {
                    id: repo.id().to_string(),
                    error,
                }
            }
        })
        .collect()
}

/// Join a mirror base url and a repository relative path.
///
/// The relative path is quoted, keeping `/` as separator.
fn join_url(base_url: &str, relative: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        utf8_percent_encode(relative.trim_start_matches('/'), &AWS_URI_ENCODE_SET)
    )
}
