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

//! Stubs shared by unit tests.

use bytes::Bytes;
use cob_core::{Context, Error, HttpSend, Result, Sleep};
use http::StatusCode;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One scripted reply: `Some((status, body))`, or `None` for a connection error.
pub type Outcome = Option<(u16, &'static str)>;

/// Replays canned outcomes in order and records every request.
///
/// An exhausted script fails every further call with a connection error.
#[derive(Debug, Clone, Default)]
pub struct ScriptedHttpSend {
    outcomes: Arc<Mutex<VecDeque<Outcome>>>,
    calls: Arc<Mutex<Vec<(String, Duration)>>>,
}

impl ScriptedHttpSend {
    pub fn new(outcomes: Vec<Outcome>) -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(outcomes.into())),
            calls: Arc::default(),
        }
    }

    /// `(url, timeout)` of every request sent so far.
    pub fn calls(&self) -> Vec<(String, Duration)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn urls(&self) -> Vec<String> {
        self.calls().into_iter().map(|(url, _)| url).collect()
    }
}

impl HttpSend for ScriptedHttpSend {
    fn http_send(
        &self,
        req: http::Request<Bytes>,
        timeout: Duration,
    ) -> Result<http::Response<Bytes>> {
        self.calls
            .lock()
            .unwrap()
            .push((req.uri().to_string(), timeout));

        match self.outcomes.lock().unwrap().pop_front().flatten() {
            Some((status, body)) => {
                let mut resp = http::Response::new(Bytes::from_static(body.as_bytes()));
                *resp.status_mut() = StatusCode::from_u16(status).unwrap();
                Ok(resp)
            }
            None => Err(Error::unexpected("connection refused")),
        }
    }
}

/// Records requested sleeps instead of blocking.
#[derive(Debug, Clone, Default)]
pub struct RecordingSleep(Arc<Mutex<Vec<Duration>>>);

impl RecordingSleep {
    /// Whole seconds of every sleep so far.
    pub fn slept(&self) -> Vec<u64> {
        self.0.lock().unwrap().iter().map(|d| d.as_secs()).collect()
    }
}

impl Sleep for RecordingSleep {
    fn sleep(&self, dur: Duration) {
        self.0.lock().unwrap().push(dur)
    }
}

pub fn setup(outcomes: Vec<Outcome>) -> (Context, ScriptedHttpSend, RecordingSleep) {
    let _ = env_logger::builder().is_test(true).try_init();

    let http = ScriptedHttpSend::new(outcomes);
    let sleep = RecordingSleep::default();
    let ctx = Context::new()
        .with_http_send(http.clone())
        .with_sleep(sleep.clone());
    (ctx, http, sleep)
}
