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
use bytes::Bytes;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

/// Context provides the side-effecting components used while resolving
/// credentials and signing requests.
///
/// ## Important
///
/// cob provides NO default HTTP client. Any unconfigured HTTP sender is a no-op
/// implementation that returns errors when called. Sleeping defaults to blocking
/// the current thread.
///
/// ## Example
///
/// ```
/// use cob_core::{Context, ThreadSleep};
///
/// let ctx = Context::new().with_sleep(ThreadSleep);
/// ```
#[derive(Clone, Debug)]
pub struct Context {
    http: Arc<dyn HttpSend>,
    sleep: Arc<dyn Sleep>,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    /// Create a new Context with a no-op HTTP sender and a thread sleeper.
    pub fn new() -> Self {
        Self {
            http: Arc::new(NoopHttpSend),
            sleep: Arc::new(ThreadSleep),
        }
    }

    /// Replace the HTTP client implementation.
    pub fn with_http_send(mut self, http: impl HttpSend) -> Self {
        self.http = Arc::new(http);
        self
    }

    /// Replace the sleep implementation.
    pub fn with_sleep(mut self, sleep: impl Sleep) -> Self {
        self.sleep = Arc::new(sleep);
        self
    }

    /// Send http request and return the response.
    ///
    /// `timeout` bounds this call only.
    #[inline]
    pub fn http_send(
        &self,
        req: http::Request<Bytes>,
        timeout: Duration,
    ) -> Result<http::Response<Bytes>> {
        self.http.http_send(req, timeout)
    }

    /// Block the caller for `dur`.
    #[inline]
    pub fn sleep(&self, dur: Duration) {
        self.sleep.sleep(dur)
    }
}

/// HttpSend is used to send http request during credential resolution.
///
/// For example, fetch the IAM role name from the instance metadata service. This
/// trait is designed especially for the signer, please don't use it as a general
/// http client.
pub trait HttpSend: Debug + Send + Sync + 'static {
    /// Send http request and return the response.
    ///
    /// Implementations must apply `timeout` to this request alone and never
    /// change a timeout shared with other callers.
    fn http_send(&self, req: http::Request<Bytes>, timeout: Duration)
        -> Result<http::Response<Bytes>>;
}

/// Sleep blocks the current caller between retry attempts.
pub trait Sleep: Debug + Send + Sync + 'static {
    /// Block for the given duration.
    fn sleep(&self, dur: Duration);
}

/// NoopHttpSend is a no-op implementation that always returns an error.
///
/// This is used when no HTTP client is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHttpSend;

impl HttpSend for NoopHttpSend {
    fn http_send(
        &self,
        _req: http::Request<Bytes>,
        _timeout: Duration,
    ) -> Result<http::Response<Bytes>> {
        Err(Error::unexpected(
            "HTTP sending not supported: no HTTP client configured",
        ))
    }
}

/// ThreadSleep blocks the current thread via [`std::thread::sleep`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleep;

impl Sleep for ThreadSleep {
    fn sleep(&self, dur: Duration) {
        std::thread::sleep(dur)
    }
}
