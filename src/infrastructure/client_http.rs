use anyhow::Context;
use log::debug;
use reqwest::{
    Client,
    header::{ACCEPT, HeaderMap, HeaderValue},
};
use serde::de::DeserializeOwned;

use crate::{ApiClientConfig, ApiResult, NetworkError, StdResult};

const GITHUB_JSON_MEDIA_TYPE: &str = "application/vnd.github+json";

/// Issues GET requests against a JSON API and decodes the responses.
pub struct HttpApiClient {
    client: Client,
    config: ApiClientConfig,
}

impl HttpApiClient {
    /// Creates a new `HttpApiClient` instance with the given configuration.
    pub fn try_new(config: ApiClientConfig) -> StdResult<Self> {
        let headers = HeaderMap::from_iter([(
            ACCEPT,
            HeaderValue::from_static(GITHUB_JSON_MEDIA_TYPE),
        )]);
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .with_context(|| "Failed to build the HTTP client")?;

        Ok(Self { client, config })
    }

    /// Retrieves the configuration of the client.
    pub fn config(&self) -> &ApiClientConfig {
        &self.config
    }

    /// Fetches `url` and decodes its JSON body into `T`.
    ///
    /// Exactly one outbound request is made, without retry. Transport failures,
    /// non-success statuses and undecodable bodies are all returned as errors.
    pub async fn request<T: DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        debug!("GET {url}");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            debug!("GET {url} answered with status {status}");
            return Err(NetworkError::HttpStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().map(|reason| reason.to_string()),
            }
            .into());
        }
        let body = response.bytes().await?;

        Ok(serde_json::from_slice(&body)?)
    }
}
