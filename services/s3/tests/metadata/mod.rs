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

mod credential;
mod region;
mod repository;

use cob_core::{Context, StaticConfig};
use cob_http_send_reqwest::ReqwestHttpSend;
use cob_s3::Config;
use httptest::Server;

pub const ROLE_LIST: &str = "/latest/meta-data/iam/security-credentials/";
pub const ROLE_DOCUMENT: &str = "/latest/meta-data/iam/security-credentials/yum-reader";
pub const AVAILABILITY_ZONE: &str = "/latest/meta-data/placement/availability-zone/";

/// Context talking to the network through a proxy-free blocking client.
pub fn create_test_context() -> Context {
    let _ = env_logger::builder().is_test(true).try_init();

    Context::new().with_http_send(ReqwestHttpSend::no_proxy().expect("client must build"))
}

/// Config pointing at `server` with short timeouts and a single attempt.
pub fn create_test_config(server: &Server) -> StaticConfig {
    StaticConfig::default()
        .with("aws", "metadata_server", format!("http://{}", server.addr()))
        .with("aws", "timeout", "2")
        .with("aws", "retries", "1")
}

pub fn load_config(lookup: &StaticConfig) -> Config {
    Config::from_lookup(lookup).expect("config must be valid")
}
