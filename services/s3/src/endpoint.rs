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

//! Classify repository urls by the storage service they point to.

use crate::constants::DEFAULT_REGION;
use http::Uri;

const AMAZONAWS_SUFFIXES: [&str; 2] = [".amazonaws.com", ".amazonaws.com.cn"];

/// Lower-cased hostname of `url`, `None` if it has no authority.
fn hostname(url: &str) -> Option<String> {
    let uri: Uri = url.trim().parse().ok()?;
    uri.host().map(|h| h.to_ascii_lowercase())
}

/// Labels in front of the amazonaws suffix, `None` for other domains.
fn amazonaws_labels(host: &str) -> Option<Vec<&str>> {
    AMAZONAWS_SUFFIXES
        .iter()
        .find_map(|suffix| host.strip_suffix(suffix))
        .map(|prefix| prefix.split('.').collect())
}

/// Check whether `url` points to S3, i.e. its hostname matches `s3*.amazonaws.com`.
///
/// Both path-style (`s3-eu-west-1.amazonaws.com`) and virtual-hosted style
/// (`bucket.s3.amazonaws.com`) hostnames match.
pub fn is_storage_url(url: &str) -> bool {
    let Some(host) = hostname(url) else {
        return false;
    };

    amazonaws_labels(&host)
        .map(|labels| labels.iter().any(|label| label.starts_with("s3")))
        .unwrap_or(false)
}

/// Check whether at least one of `urls` points to S3.
///
/// An empty list is not storage backed.
pub fn is_storage_urls<I, S>(urls: I) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    urls.into_iter().any(|url| is_storage_url(url.as_ref()))
}

/// Extract the region embedded in an S3 hostname.
///
/// - `s3.<region>.amazonaws.com` (optionally `s3.dualstack.<region>`) yields `<region>`.
/// - `s3-<region>.<suffix>` yields `<region>`; the `s3-` label must be the one
///   right before the amazonaws suffix, or the first label for other domains.
/// - Anything else yields `us-east-1`.
///
/// Bucket names in front of the endpoint (`s3-backups.s3.amazonaws.com`) are
/// never read as a region.
pub fn region_from_url(url: &str) -> String {
    embedded_region(url).unwrap_or_else(|| DEFAULT_REGION.to_string())
}

/// Region named by the hostname of `url`, `None` if it names none.
pub(crate) fn embedded_region(url: &str) -> Option<String> {
    let host = hostname(url)?;

    let endpoint = match amazonaws_labels(&host) {
        Some(labels) => {
            if let Some(pos) = labels.iter().rposition(|label| *label == "s3") {
                let rest: Vec<&str> = labels[pos + 1..]
                    .iter()
                    .copied()
                    .filter(|label| *label != "dualstack")
                    .collect();
                return match rest.as_slice() {
                    [region] => Some(region.to_string()),
                    _ => None,
                };
            }
            labels.last().copied()
        }
        None => host.split('.').next(),
    };

    let region = endpoint?
        .strip_prefix("s3-")
        .filter(|region| !region.is_empty())?;
    // Legacy alias of the global endpoint.
    if region == "external-1" {
        return Some(DEFAULT_REGION.to_string());
    }
    Some(region.to_string())
}
