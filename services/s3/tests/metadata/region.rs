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

use super::{create_test_config, create_test_context, load_config, AVAILABILITY_ZONE};
use cob_core::ErrorKind;
use cob_s3::RegionResolver;
use httptest::matchers::request;
use httptest::responders::status_code;
use httptest::{Expectation, Server};
use std::sync::Arc;

#[test]
fn test_region_from_availability_zone() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", AVAILABILITY_ZONE))
            .times(1)
            .respond_with(status_code(200).body("us-west-2c\n")),
    );
    let ctx = create_test_context();
    let config = load_config(&create_test_config(&server));

    let region = RegionResolver::new(Arc::new(config))
        .resolve(&ctx)
        .expect("region must resolve");

    assert_eq!(region, "us-west-2");
}

#[test]
fn test_configured_region() {
    let server = Server::run();
    let ctx = create_test_context();
    let config = load_config(&create_test_config(&server).with("aws", "region", "eu-north-1"));

    let region = RegionResolver::new(Arc::new(config))
        .resolve(&ctx)
        .expect("region must resolve");

    assert_eq!(region, "eu-north-1");
}

#[test]
fn test_empty_availability_zone() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", AVAILABILITY_ZONE))
            .respond_with(status_code(200)),
    );
    let ctx = create_test_context();
    let config = load_config(&create_test_config(&server));

    let err = RegionResolver::new(Arc::new(config))
        .resolve(&ctx)
        .expect_err("must fail");

    assert_eq!(err.kind(), ErrorKind::NoRegion);
}
