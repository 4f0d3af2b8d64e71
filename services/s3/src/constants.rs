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

use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;

// Headers used in s3 signing.
pub const X_AMZ_CONTENT_SHA_256: &str = "x-amz-content-sha256";
pub const X_AMZ_DATE: &str = "x-amz-date";
pub const X_AMZ_SECURITY_TOKEN: &str = "x-amz-security-token";

/// Hex encoded SHA256 of empty content.
///
/// Only bodyless GET-style requests are signed, so this is always the payload hash.
pub const EMPTY_STRING_SHA256: &str =
    "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

// Signature V4 protocol constants.
pub const ALGORITHM: &str = "AWS4-HMAC-SHA256";
pub const SIGNING_KEY_PREFIX: &str = "AWS4";
pub const SCOPE_TERMINATOR: &str = "aws4_request";
pub const SERVICE_NAME: &str = "s3";
pub const DEFAULT_REGION: &str = "us-east-1";

// Config keys, all under the `aws` section.
pub const CONFIG_SECTION: &str = "aws";
pub const CONFIG_TIMEOUT: &str = "timeout";
pub const CONFIG_RETRIES: &str = "retries";
pub const CONFIG_METADATA_SERVER: &str = "metadata_server";
pub const CONFIG_REGION: &str = "region";
pub const CONFIG_ACCESS_KEY: &str = "access_key";
pub const CONFIG_SECRET_KEY: &str = "secret_key";
pub const CONFIG_TOKEN: &str = "token";

pub const DEFAULT_TIMEOUT_SECS: i64 = 60;
pub const DEFAULT_RETRIES: i64 = 5;
pub const DEFAULT_METADATA_SERVER: &str = "http://169.254.169.254";

// Instance metadata paths.
pub const IAM_SECURITY_CREDENTIALS_PATH: &str = "latest/meta-data/iam/security-credentials/";
pub const AVAILABILITY_ZONE_PATH: &str = "latest/meta-data/placement/availability-zone/";

/// AsciiSet for [AWS UriEncode](https://docs.aws.amazon.com/AmazonS3/latest/API/sig-v4-header-based-auth.html)
///
/// Used to quote relative object paths; `/` is kept as the key separator.
pub static AWS_URI_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// AsciiSet for [AWS UriEncode](https://docs.aws.amazon.com/AmazonS3/latest/API/sig-v4-header-based-auth.html)
///
/// But used in query.
pub static AWS_QUERY_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');
