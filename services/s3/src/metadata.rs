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

use crate::Config;
use backon::{BackoffBuilder, ExponentialBuilder};
use bytes::Bytes;
use cob_core::{Context, Result};
use http::{Method, StatusCode};
use log::{debug, error, warn};
use std::time::Duration;

/// Outcome of a metadata fetch.
///
/// Ordinary network failures never surface as errors; callers decide from
/// context what an absent document means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataResponse {
    /// The document was served.
    Content(Bytes),
    /// The service answered 404: the feature (for example an IAM role) does not exist.
    NotFound,
    /// Every attempt failed.
    Unavailable,
}

impl MetadataResponse {
    /// Returns the document if one was served.
    pub fn into_content(self) -> Option<Bytes> {
        match self {
            MetadataResponse::Content(bs) => Some(bs),
            _ => None,
        }
    }

    /// Returns true for both `NotFound` and `Unavailable`.
    pub fn is_absent(&self) -> bool {
        !matches!(self, MetadataResponse::Content(_))
    }
}

/// MetadataClient reads documents from the instance metadata service.
///
/// Every fetch is bounded by a per-request timeout and retried with exponential
/// backoff (1s, 2s, 4s, ...) up to `max_attempts` attempts. Requests go through the
/// [`Context`]'s HTTP sender, which must not route them through a proxy.
#[derive(Debug, Clone)]
pub struct MetadataClient {
    endpoint: String,
    timeout: Duration,
    max_attempts: u32,
}

impl MetadataClient {
    /// Create a client from the `aws` config.
    pub fn new(config: &Config) -> Self {
        Self {
            endpoint: config.metadata_server.clone(),
            timeout: config.timeout,
            max_attempts: config.retries,
        }
    }

    /// Set the base url of the metadata service.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the timeout of a single attempt.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the maximum number of attempts.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Build the url of a metadata document, `path` is relative to the endpoint.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.endpoint.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Fetch `url`, retrying failures.
    ///
    /// With `retry_on_404` unset a 404 returns [`MetadataResponse::NotFound`] after a
    /// single attempt. Any other failure is logged and retried after sleeping
    /// `2^i` seconds, until `max_attempts` attempts are used up.
    pub fn fetch(&self, ctx: &Context, url: &str, retry_on_404: bool) -> MetadataResponse {
        // Zero attempts would never ask the service at all.
        let attempts = self.max_attempts.max(1);
        let mut backoff = ExponentialBuilder::default()
            .with_min_delay(Duration::from_secs(1))
            .with_factor(2.0)
            .without_max_delay()
            .with_max_times(attempts as usize - 1)
            .build();

        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.fetch_once(ctx, url) {
                Ok(resp) if resp.status().is_success() => {
                    debug!("read instance metadata from {url} on attempt {attempt}");
                    return MetadataResponse::Content(resp.into_body());
                }
                Ok(resp) if resp.status() == StatusCode::NOT_FOUND && !retry_on_404 => {
                    debug!("instance metadata {url} not found");
                    return MetadataResponse::NotFound;
                }
                Ok(resp) => warn!(
                    "caught status {} reading instance data from {url} (attempt {attempt}/{attempts})",
                    resp.status()
                ),
                Err(err) => warn!(
                    "caught exception reading instance data from {url} (attempt {attempt}/{attempts}): {err}"
                ),
            }

            match backoff.next() {
                Some(dur) => ctx.sleep(dur),
                None => {
                    error!(
                        "unable to read instance data from {url}, giving up after {attempt} attempts"
                    );
                    return MetadataResponse::Unavailable;
                }
            }
        }
    }

    fn fetch_once(&self, ctx: &Context, url: &str) -> Result<http::Response<Bytes>> {
        let req = http::Request::builder()
            .method(Method::GET)
            .uri(url)
            .body(Bytes::new())?;

        ctx.http_send(req, self.timeout)
    }
}
