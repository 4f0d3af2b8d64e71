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

//! Blocking [`reqwest`] implementation of [`cob_core::HttpSend`].

use bytes::Bytes;
use cob_core::{Error, HttpSend, Result};
use log::debug;
use reqwest::blocking::{Client, ClientBuilder, Request};
use std::time::Duration;

/// ReqwestHttpSend sends requests with a blocking reqwest client.
///
/// The client never goes through a proxy: instance metadata lives on a
/// link-local address and must not be routed through `HTTP_PROXY` /
/// `HTTPS_PROXY` from the environment.
#[derive(Debug, Clone)]
pub struct ReqwestHttpSend {
    client: Client,
}

impl ReqwestHttpSend {
    /// Create a new ReqwestHttpSend from a customized client builder.
    ///
    /// Any proxy configured on `builder` is dropped.
    pub fn new(builder: ClientBuilder) -> Result<Self> {
        let client = builder.no_proxy().build().map_err(|e| {
            Error::unexpected("failed to build http client without proxy").with_source(e)
        })?;

        Ok(Self { client })
    }

    /// Create a ReqwestHttpSend with reqwest's default settings.
    pub fn no_proxy() -> Result<Self> {
        Self::new(Client::builder())
    }
}

impl HttpSend for ReqwestHttpSend {
    fn http_send(
        &self,
        req: http::Request<Bytes>,
        timeout: Duration,
    ) -> Result<http::Response<Bytes>> {
        let mut req = Request::try_from(req)
            .map_err(|e| Error::request_invalid("failed to build http request").with_source(e))?;
        // Per-request timeout, the client stays untouched.
        *req.timeout_mut() = Some(timeout);

        debug!("sending {} {} with timeout {timeout:?}", req.method(), req.url());
        let resp = self.client.execute(req).map_err(|e| {
            Error::unexpected(format!("failed to send http request: {e}")).with_source(e)
        })?;

        let status = resp.status();
        let version = resp.version();
        let headers = resp.headers().clone();
        let body = resp.bytes().map_err(|e| {
            Error::unexpected("failed to read http response body").with_source(e)
        })?;

        let mut out = http::Response::new(body);
        *out.status_mut() = status;
        *out.version_mut() = version;
        *out.headers_mut() = headers;
        Ok(out)
    }
}
