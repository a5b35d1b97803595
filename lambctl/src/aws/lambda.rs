// Copyright (c) 2020-present, UMD Database Group.
//
// This program is free software: you can use, redistribute, and/or modify
// it under the terms of the GNU Affero General Public License, version 3
// or later ("AGPL"), as published by the Free Software Foundation.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or
// FITNESS FOR A PARTICULAR PURPOSE.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <http://www.gnu.org/licenses/>.

//! The SigV4-signed HTTPS client of the Lambda REST API.

use crate::aws::client::LambdaService;
use crate::aws::errors::{classify_transport_error, parse_service_error};
use crate::aws::response::shape_response;
use crate::config::Settings;
use crate::error::{LambctlError, Result};
use crate::request::{Body, Request};
use crate::schema::{Method, OperationSpec};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::provider::{ProvideCredentials, SharedCredentialsProvider};
use aws_sigv4::http_request::{sign, SignableBody, SignableRequest, SigningSettings};
use aws_sigv4::sign::v4;
use bytes::Bytes;
use log::{debug, warn};
use serde_json::Value;
use std::time::{Duration, SystemTime};
use tokio_util::sync::CancellationToken;

/// The signing name of the Lambda service.
const SERVICE_NAME: &str = "lambda";

/// Connection settings of the [`SignedLambdaClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct LambdaClientConfig {
    /// The AWS region requests are signed for.
    pub region:       String,
    /// Overrides `https://lambda.{region}.amazonaws.com`.
    pub endpoint_url: Option<String>,
    /// How many times a throttled or failed call is sent again.
    pub max_retries:  usize,
    /// The delay before the first retry; doubled on each further retry.
    pub base_backoff: Duration,
    /// The limit of one HTTP exchange.
    pub timeout:      Duration,
}

impl LambdaClientConfig {
    /// Builds the client settings from the resolved configuration.
    pub fn new(region: impl Into<String>, settings: &Settings) -> Self {
        Self {
            region:       region.into(),
            endpoint_url: settings.endpoint_url.clone(),
            max_retries:  settings.max_retries,
            base_backoff: settings.base_backoff,
            timeout:      settings.timeout,
        }
    }

    /// Returns the service endpoint, without a trailing slash.
    pub fn endpoint(&self) -> String {
        match &self.endpoint_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://lambda.{}.amazonaws.com", self.region),
        }
    }

    /// The delay before the given retry, counting from zero.
    pub fn backoff(&self, retry: usize) -> Duration {
        self.base_backoff * 2_u32.pow(retry.min(16) as u32)
    }
}

/// Sends requests to the Lambda REST API over HTTPS, signed with SigV4.
pub struct SignedLambdaClient {
    http_client:          reqwest::Client,
    credentials_provider: SharedCredentialsProvider,
    config:               LambdaClientConfig,
}

impl SignedLambdaClient {
    /// Creates a client from the resolved configuration. Credentials and,
    /// when not configured, the region come from the AWS default provider
    /// chain of the selected profile.
    pub async fn from_settings(settings: &Settings) -> Result<Self> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(profile) = &settings.profile {
            loader = loader.profile_name(profile);
        }
        if let Some(region) = &settings.region {
            loader = loader.region(Region::new(region.clone()));
        }
        let sdk_config = loader.load().await;

        let credentials_provider = sdk_config.credentials_provider().ok_or_else(|| {
            LambctlError::Credentials("no credentials provider is configured".to_string())
        })?;
        let region = sdk_config.region().map(|r| r.to_string()).ok_or_else(|| {
            LambctlError::Config(
                "no AWS region is configured; pass --region, set AWS_REGION or add \
                 [aws] region to the configuration file"
                    .to_string(),
            )
        })?;

        Self::with_config(
            credentials_provider,
            LambdaClientConfig::new(region, settings),
        )
    }

    /// Creates a client with explicit credentials and settings.
    pub fn with_config(
        credentials_provider: SharedCredentialsProvider,
        config: LambdaClientConfig,
    ) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LambctlError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http_client,
            credentials_provider,
            config,
        })
    }

    /// Returns the client settings.
    pub fn config(&self) -> &LambdaClientConfig {
        &self.config
    }

    /// Signs a request and returns the headers to add to it.
    async fn sign_request(
        &self,
        method: &str,
        uri: &str,
        headers: &[(String, String)],
        body: &[u8],
    ) -> Result<Vec<(String, String)>> {
        let credentials = self
            .credentials_provider
            .provide_credentials()
            .await
            .map_err(|e| LambctlError::Credentials(format!("Failed to get AWS credentials: {}", e)))?;

        let identity = credentials.into();
        let signing_params = v4::SigningParams::builder()
            .identity(&identity)
            .region(&self.config.region)
            .name(SERVICE_NAME)
            .time(SystemTime::now())
            .settings(SigningSettings::default())
            .build()
            .map_err(|e| {
                LambctlError::Credentials(format!("Failed to build signing params: {}", e))
            })?;

        let signable_request = SignableRequest::new(
            method,
            uri,
            headers.iter().map(|(k, v)| (k.as_str(), v.as_str())),
            SignableBody::Bytes(body),
        )
        .map_err(|e| LambctlError::Credentials(format!("Failed to create signable request: {}", e)))?;

        let (signing_instructions, _signature) = sign(signable_request, &signing_params.into())
            .map_err(|e| LambctlError::Credentials(format!("Failed to sign request: {}", e)))?
            .into_parts();

        let mut signed = http::Request::builder()
            .method(method)
            .uri(uri)
            .body(())
            .map_err(|e| LambctlError::Internal(format!("Failed to build request: {}", e)))?;
        signing_instructions.apply_to_request_http1x(&mut signed);

        Ok(signed
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.to_string(), v.to_string()))
            })
            .collect())
    }

    /// Sends the request once, without retrying.
    async fn send_once(&self, operation: &OperationSpec, request: &Request) -> Result<Value> {
        let endpoint = self.config.endpoint();
        let uri = format!("{}{}", endpoint, request.uri());
        let (content_type, body) = match &request.body {
            Body::Empty => (None, Bytes::new()),
            Body::Json(document) => (
                Some("application/json"),
                Bytes::from(serde_json::to_vec(document)?),
            ),
            Body::Blob(bytes) => (Some("application/octet-stream"), bytes.clone()),
        };

        let mut headers = request.headers.clone();
        if let Some(content_type) = content_type {
            headers.push(("Content-Type".to_string(), content_type.to_string()));
        }
        let signed = self
            .sign_request(request.method.as_str(), &uri, &headers, &body)
            .await?;

        debug!("{} {} ({} bytes)", request.method.as_str(), uri, body.len());
        let mut builder = self.http_client.request(http_method(request.method), &uri);
        for (name, value) in headers.iter().chain(signed.iter()) {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let response = builder
            .body(body)
            .send()
            .await
            .map_err(|e| classify_transport_error(&endpoint, &e))?;

        let status = response.status().as_u16();
        let response_headers = response.headers().clone();
        let response_body = response
            .bytes()
            .await
            .map_err(|e| LambctlError::Transport {
                message:   format!("Failed to read response body: {}", e),
                retriable: true,
            })?;
        debug!("{} returned HTTP {}", operation.name, status);

        if !(200..300).contains(&status) {
            return Err(parse_service_error(status, &response_headers, &response_body).into());
        }
        shape_response(&operation.response, status, &response_headers, &response_body)
    }
}

#[async_trait]
impl LambdaService for SignedLambdaClient {
    async fn send(
        &self,
        operation: &OperationSpec,
        request: Request,
        cancel: &CancellationToken,
    ) -> Result<Value> {
        // Error retries and exponential backoff in AWS Lambda
        let mut retries = 0;
        loop {
            let attempt = tokio::select! {
                _ = cancel.cancelled() => return Err(LambctlError::Cancelled),
                result = self.send_once(operation, &request) => result,
            };
            match attempt {
                Ok(response) => return Ok(response),
                Err(e) if e.is_retriable() && retries < self.config.max_retries => {
                    let backoff = self.config.backoff(retries);
                    warn!(
                        "{} failed: {}. Retrying in {}...",
                        operation.name,
                        e,
                        humantime::format_duration(backoff)
                    );
                    tokio::select! {
                        _ = cancel.cancelled() => return Err(LambctlError::Cancelled),
                        _ = tokio::time::sleep(backoff) => {}
                    }
                    retries += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

fn http_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}
