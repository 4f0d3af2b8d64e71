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

//! S3 support for signing package repository fetches.
//!
//! This crate decides which repository mirrors live on S3, resolves the
//! credentials to access them (static configuration first, then the IAM role
//! attached to the instance), and computes Signature V4 headers for every
//! file fetched from those mirrors.
//!
//! ## Example
//!
//! ```no_run
//! use cob_core::{Context, StaticConfig};
//! use cob_http_send_reqwest::ReqwestHttpSend;
//! use cob_s3::{is_storage_url, Config, S3Repository};
//!
//! # fn main() -> cob_core::Result<()> {
//! let ctx = Context::new().with_http_send(ReqwestHttpSend::no_proxy()?);
//! let config = Config::from_lookup(&StaticConfig::default())?;
//!
//! let mirror = "https://s3-eu-west-1.amazonaws.com/my-yum-bucket/";
//! assert!(is_storage_url(mirror));
//!
//! let repo = S3Repository::new(&ctx, config.into(), "my-repo")?;
//! let headers = repo.fetch_headers(mirror, "repodata/repomd.xml")?;
//! assert!(headers.contains_key(http::header::AUTHORIZATION));
//! # Ok(())
//! # }
//! ```

mod constants;
pub use constants::EMPTY_STRING_SHA256;

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod endpoint;
pub use endpoint::{is_storage_url, is_storage_urls, region_from_url};

mod metadata;
pub use metadata::{MetadataClient, MetadataResponse};

mod provide_credential;
pub use provide_credential::{
    ConfigCredentialProvider, DefaultCredentialProvider, ImdsCredentialProvider,
};

mod region;
pub use region::RegionResolver;

mod sign_request;
pub use sign_request::RequestSigner;

mod repository;
pub use repository::{prepare_repositories, Mirrors, Prepared, S3Repository};

#[cfg(test)]
mod test_utils;
