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

use crate::constants::{
    ALGORITHM, AWS_QUERY_ENCODE_SET, EMPTY_STRING_SHA256, SCOPE_TERMINATOR, SIGNING_KEY_PREFIX,
    X_AMZ_CONTENT_SHA_256, X_AMZ_DATE, X_AMZ_SECURITY_TOKEN,
};
use crate::Credential;
use cob_core::hash::{hex_hmac_sha256, hex_sha256, hmac_sha256};
use cob_core::time::{format_date, format_iso8601, now, DateTime};
use cob_core::{Context, Error, Result, SignRequest};
use http::request::Parts;
use http::{header, HeaderMap, HeaderValue};
use log::debug;
use percent_encoding::utf8_percent_encode;
use std::collections::BTreeMap;

/// RequestSigner that implement AWS SigV4 for bodyless requests.
///
/// - [Signature Version 4 signing process](https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html)
///
/// The signer is stateless between calls: every call takes a fresh timestamp,
/// so one instance can sign any number of requests.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    service: String,
    region: String,

    time: Option<DateTime>,
}

impl RequestSigner {
    /// Create a new signer for the given service and region.
    pub fn new(service: &str, region: &str) -> Self {
        Self {
            service: service.into(),
            region: region.into(),

            time: None,
        }
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    #[cfg(test)]
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Sign the request in place.
    ///
    /// Any previous `Authorization` is replaced, so signing the same request
    /// again (for example on a retried fetch) is safe.
    pub fn sign(&self, req: &mut Parts, credential: Option<&Credential>) -> Result<()> {
        let now = self.time.unwrap_or_else(now);
        self.sign_at(req, credential, now)
    }

    fn sign_at(
        &self,
        req: &mut Parts,
        credential: Option<&Credential>,
        now: DateTime,
    ) -> Result<()> {
        let Some(cred) = credential else {
            return Err(Error::no_credentials("signing requires a credential"));
        };

        prepare_headers(&mut req.headers, cred, now)?;

        let headers = canonical_headers(req)?;
        let signed_headers = signed_header_names(&headers);
        let creq = canonical_request_string(req, &headers, &signed_headers)?;
        debug!("calculated canonical request: {creq}");

        // Scope: "20220313/<region>/<service>/aws4_request"
        let scope = format!(
            "{}/{}/{}/{SCOPE_TERMINATOR}",
            format_date(now),
            self.region,
            self.service
        );
        debug!("calculated scope: {scope}");

        // StringToSign:
        //
        // AWS4-HMAC-SHA256
        // 20220313T072004Z
        // 20220313/<region>/<service>/aws4_request
        // <hashed_canonical_request>
        let string_to_sign = format!(
            "{ALGORITHM}\n{}\n{scope}\n{}",
            format_iso8601(now),
            hex_sha256(creq.as_bytes())
        );
        debug!("calculated string to sign: {string_to_sign}");

        let signing_key =
            generate_signing_key(&cred.secret_access_key, now, &self.region, &self.service);
        let signature = hex_hmac_sha256(&signing_key, string_to_sign.as_bytes());
        debug!("calculated signature: {signature}");

        let mut authorization = HeaderValue::from_str(&format!(
            "{ALGORITHM} Credential={}/{scope}, SignedHeaders={}, Signature={signature}",
            cred.access_key_id,
            signed_headers,
        ))?;
        authorization.set_sensitive(true);
        req.headers.insert(header::AUTHORIZATION, authorization);

        Ok(())
    }
}

impl SignRequest for RequestSigner {
    type Credential = Credential;

    fn sign_request(
        &self,
        _: &Context,
        req: &mut Parts,
        credential: Option<&Self::Credential>,
    ) -> Result<()> {
        self.sign(req, credential)
    }
}

fn prepare_headers(headers: &mut HeaderMap, cred: &Credential, now: DateTime) -> Result<()> {
    headers.remove(header::AUTHORIZATION);

    if !headers.contains_key(header::DATE) {
        headers.insert(X_AMZ_DATE, HeaderValue::try_from(format_iso8601(now))?);
    }

    if let Some(token) = &cred.session_token {
        let mut value = HeaderValue::from_str(token)?;
        // Set token value sensitive to valid leaking.
        value.set_sensitive(true);
        headers.insert(X_AMZ_SECURITY_TOKEN, value);
    }

    headers.insert(
        X_AMZ_CONTENT_SHA_256,
        HeaderValue::from_static(EMPTY_STRING_SHA256),
    );

    Ok(())
}

/// Canonical headers keyed by lowercase name.
///
/// Repeated headers are trimmed, sorted and joined with `,`. `host` is taken
/// from the URI authority when the request doesn't carry one.
fn canonical_headers(req: &Parts) -> Result<BTreeMap<String, String>> {
    let mut headers = BTreeMap::new();
    for name in req.headers.keys() {
        let mut values = req
            .headers
            .get_all(name)
            .iter()
            .map(|v| v.to_str().map(str::trim))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        values.sort_unstable();
        headers.insert(name.as_str().to_string(), values.join(","));
    }

    if !headers.contains_key(header::HOST.as_str()) {
        let authority = req.uri.authority().ok_or_else(|| {
            Error::request_invalid(format!("request {} without authority can't be signed", req.uri))
        })?;
        headers.insert(header::HOST.to_string(), authority.as_str().to_string());
    }

    Ok(headers)
}

/// `SignedHeaders` value: lowercase names joined with `;`.
fn signed_header_names(headers: &BTreeMap<String, String>) -> String {
    headers.keys().map(String::as_str).collect::<Vec<_>>().join(";")
}

fn canonical_query_string(req: &Parts) -> String {
    let Some(query) = req.uri.query() else {
        return String::new();
    };

    let mut pairs = form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| {
            (
                utf8_percent_encode(&k, &AWS_QUERY_ENCODE_SET).to_string(),
                utf8_percent_encode(&v, &AWS_QUERY_ENCODE_SET).to_string(),
            )
        })
        .collect::<Vec<_>>();
    pairs.sort();

    pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

fn canonical_request_string(
    req: &Parts,
    headers: &BTreeMap<String, String>,
    signed_headers: &str,
) -> Result<String> {
    // 256 is specially chosen to avoid reallocation for most requests.
    let mut f = String::with_capacity(256);

    f.push_str(req.method.as_str());
    f.push('\n');
    // The path is signed as sent: dot segments are never collapsed.
    f.push_str(req.uri.path());
    f.push('\n');
    f.push_str(&canonical_query_string(req));
    f.push('\n');
    for (name, value) in headers.iter() {
        f.push_str(name);
        f.push(':');
        f.push_str(value);
        f.push('\n');
    }
    f.push('\n');
    f.push_str(signed_headers);
    f.push('\n');

    let payload_hash = match req.headers.get(X_AMZ_CONTENT_SHA_256) {
        Some(v) => v.to_str()?,
        None => EMPTY_STRING_SHA256,
    };
    f.push_str(payload_hash);

    Ok(f)
}

fn generate_signing_key(secret: &str, time: DateTime, region: &str, service: &str) -> Vec<u8> {
    // Sign secret
    let secret = format!("{SIGNING_KEY_PREFIX}{secret}");
    // Sign date
    let sign_date = hmac_sha256(secret.as_bytes(), format_date(time).as_bytes());
    // Sign region
    let sign_region = hmac_sha256(sign_date.as_slice(), region.as_bytes());
    // Sign service
    let sign_service = hmac_sha256(sign_region.as_slice(), service.as_bytes());
    // Sign request
    hmac_sha256(sign_service.as_slice(), SCOPE_TERMINATOR.as_bytes())
}
