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

use crate::constants::IAM_SECURITY_CREDENTIALS_PATH;
use crate::{Credential, MetadataClient, MetadataResponse};
use cob_core::{Context, Error, ProvideCredential, Result};
use log::debug;
use serde::Deserialize;

/// ImdsCredentialProvider loads the credentials of the IAM role attached to
/// the instance.
///
/// 1. `GET /latest/meta-data/iam/security-credentials/` lists the role name.
/// 2. `GET /latest/meta-data/iam/security-credentials/<role>` returns the
///    temporary credentials as JSON.
///
/// No role (or no answer at all) fails with `NoCredentials`; a missing or
/// malformed credential document fails with `IncorrectCredentials`.
#[derive(Debug, Clone)]
pub struct ImdsCredentialProvider {
    client: MetadataClient,
}

impl ImdsCredentialProvider {
    /// Create a new `ImdsCredentialProvider` instance.
    pub fn new(client: MetadataClient) -> Self {
        Self { client }
    }

    fn load_role_name(&self, ctx: &Context) -> Result<String> {
        let url = self.client.url(IAM_SECURITY_CREDENTIALS_PATH);
        let content = match self.client.fetch(ctx, &url, false) {
            MetadataResponse::Content(bs) => bs,
            MetadataResponse::NotFound => {
                return Err(Error::no_credentials(
                    "no credentials configured and no IAM role attached to this instance",
                ))
            }
            MetadataResponse::Unavailable => {
                return Err(Error::no_credentials(
                    "no credentials configured and instance metadata service is unavailable",
                ))
            }
        };

        String::from_utf8_lossy(&content)
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_string)
            .ok_or_else(|| Error::no_credentials("instance metadata listed an empty IAM role"))
    }
}

impl ProvideCredential for ImdsCredentialProvider {
    type Credential = Credential;

    fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let role = self.load_role_name(ctx)?;
        debug!("found IAM role {role} in instance metadata");

        let url = format!("{}{role}", self.client.url(IAM_SECURITY_CREDENTIALS_PATH));
        let Some(content) = self.client.fetch(ctx, &url, false).into_content() else {
            return Err(Error::incorrect_credentials(format!(
                "failed to get IAM credentials for role {role}"
            )));
        };

        let resp: IamSecurityCredentials = serde_json::from_slice(&content).map_err(|e| {
            Error::incorrect_credentials(format!(
                "failed to parse IAM credentials for role {role}"
            ))
            .with_source(e)
        })?;

        if let Some(code) = resp.code.as_deref().filter(|code| *code != "Success") {
            return Err(Error::incorrect_credentials(format!(
                "IAM credentials for role {role} returned [{code}] {}",
                resp.message.unwrap_or_default()
            )));
        }

        let (Some(ak), Some(sk), Some(token)) = (
            resp.access_key_id.filter(|v| !v.is_empty()),
            resp.secret_access_key.filter(|v| !v.is_empty()),
            resp.token.filter(|v| !v.is_empty()),
        ) else {
            return Err(Error::incorrect_credentials(format!(
                "IAM credentials for role {role} are incomplete"
            )));
        };

        Ok(Some(Credential {
            access_key_id: ak,
            secret_access_key: sk,
            session_token: Some(token),
        }))
    }
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct IamSecurityCredentials {
    access_key_id: Option<String>,
    secret_access_key: Option<String>,
    token: Option<String>,

    code: Option<String>,
    message: Option<String>,
}
