use std::sync::Arc;

use anyhow::{Context, anyhow};
use log::{debug, info};
use reqwest::Url;
use serde::Deserialize;

use crate::{
    ApiResult, HttpApiClient, Repository, RepositoryId, RepositoryName, RepositoryService,
    StdResult,
};

/// A repository as returned by the `/users/{username}/repos` endpoint.
///
/// Only the fields in use are decoded. `description` must be present but may be null.
#[derive(Deserialize, Debug)]
struct RepositoryPayload {
    id: RepositoryId,
    name: RepositoryName,
    #[serde(deserialize_with = "Option::deserialize")]
    description: Option<String>,
}

impl From<RepositoryPayload> for Repository {
    fn from(payload: RepositoryPayload) -> Self {
        Repository::from_parts(payload.id, payload.name, payload.description)
    }
}

/// Fetches the repositories of a user from the GitHub REST API.
pub struct GitHubRepositoryService {
    client: Arc<HttpApiClient>,
    base_url: Url,
}

impl GitHubRepositoryService {
    /// Creates a new `GitHubRepositoryService` using the base URL configured on the client.
    pub fn try_new(client: Arc<HttpApiClient>) -> StdResult<Self> {
        let base_url = Url::parse(&client.config().base_url)
            .with_context(|| format!("Invalid API base URL: {}", client.config().base_url))?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("API base URL can not carry a path: {base_url}"));
        }

        Ok(Self { client, base_url })
    }

    /// Builds the URL listing the repositories of `username`.
    pub fn repositories_url(&self, username: &str) -> String {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["users", username, "repos"]);
        }

        url.to_string()
    }
}

#[async_trait::async_trait]
impl RepositoryService for GitHubRepositoryService {
    async fn fetch_repositories(&self, username: &str) -> ApiResult<Vec<Repository>> {
        let url = self.repositories_url(username);
        info!("Fetching repositories of user '{username}'");
        let payloads: Vec<RepositoryPayload> = self.client.request(&url).await?;
        debug!("Fetched {} repositories from {url}", payloads.len());

        Ok(payloads.into_iter().map(Repository::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use httpmock::MockServer;
    use serde_json::json;

    use crate::{ApiClientConfig, ApiError, NetworkError};

    use super::*;

    fn build_service(base_url: &str) -> GitHubRepositoryService {
        let client = HttpApiClient::try_new(ApiClientConfig::new(base_url)).unwrap();

        GitHubRepositoryService::try_new(Arc::new(client)).unwrap()
    }

    #[test]
    fn repositories_url_is_built_from_username() {
        let service = build_service("https://api.github.com");

        assert_eq!(
            "https://api.github.com/users/airbnb/repos",
            service.repositories_url("airbnb")
        );
    }

    #[test]
    fn repositories_url_keeps_base_path_and_encodes_username() {
        let service = build_service("https://github.example.com/api/v3/");

        assert_eq!(
            "https://github.example.com/api/v3/users/a%2Fb%20c/repos",
            service.repositories_url("a/b c")
        );
    }

    #[test]
    fn try_new_fails_on_invalid_base_url() {
        let client = HttpApiClient::try_new(ApiClientConfig::new("not a url")).unwrap();

        GitHubRepositoryService::try_new(Arc::new(client))
            .err()
            .expect("Invalid base URL should be rejected");
    }

    #[test]
    fn try_new_fails_on_base_url_without_path() {
        let client = HttpApiClient::try_new(ApiClientConfig::new("mailto:me@example.com")).unwrap();

        GitHubRepositoryService::try_new(Arc::new(client))
            .err()
            .expect("Base URL that can not carry a path should be rejected");
    }

    #[tokio::test]
    async fn fetch_repositories_decodes_records_in_server_order() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method("GET").path("/users/airbnb/repos");
                then.status(200)
                    .header("Content-Type", "application/json")
                    .json_body(json!([
                        {
                            "id": 1,
                            "name": "javascript",
                            "description": null,
                            "stargazers_count": 140000
                        },
                        {
                            "id": 2,
                            "name": "styleguide",
                            "description": "A mostly reasonable style guide"
                        }
                    ]));
            })
            .await;
        let service = build_service(&server.base_url());

        let repositories = service.fetch_repositories("airbnb").await.unwrap();

        mock.assert_async().await;
        assert_eq!(
            vec![
                Repository::new(1, "javascript", None),
                Repository::new(2, "styleguide", Some("A mostly reasonable style guide")),
            ],
            repositories
        );
    }

    #[tokio::test]
    async fn fetch_repositories_keeps_duplicate_ids() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method("GET").path("/users/octocat/repos");
                then.status(200).json_body(json!([
                    { "id": 7, "name": "first", "description": null },
                    { "id": 7, "name": "second", "description": null }
                ]));
            })
            .await;
        let service = build_service(&server.base_url());

        let repositories = service.fetch_repositories("octocat").await.unwrap();

        assert_eq!(
            vec![
                Repository::new(7, "first", None),
                Repository::new(7, "second", None),
            ],
            repositories
        );
    }

    #[tokio::test]
    async fn fetch_repositories_accepts_empty_list() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method("GET").path("/users/nobody-home/repos");
                then.status(200).json_body(json!([]));
            })
            .await;
        let service = build_service(&server.base_url());

        let repositories = service.fetch_repositories("nobody-home").await.unwrap();

        assert!(repositories.is_empty());
    }

    #[tokio::test]
    async fn fetch_repositories_fails_when_description_is_missing() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method("GET").path("/users/airbnb/repos");
                then.status(200)
                    .json_body(json!([{ "id": 1, "name": "javascript" }]));
            })
            .await;
        let service = build_service(&server.base_url());

        let error = service
            .fetch_repositories("airbnb")
            .await
            .expect_err("Missing description should fail decoding");

        assert!(matches!(error, ApiError::Network(NetworkError::Decode(_))));
    }

    #[tokio::test]
    async fn fetch_repositories_fails_when_name_is_empty() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method("GET").path("/users/airbnb/repos");
                then.status(200)
                    .json_body(json!([{ "id": 1, "name": "", "description": null }]));
            })
            .await;
        let service = build_service(&server.base_url());

        let error = service
            .fetch_repositories("airbnb")
            .await
            .expect_err("Empty name should fail decoding");

        assert!(matches!(error, ApiError::Network(NetworkError::Decode(_))));
    }

    #[tokio::test]
    async fn fetch_repositories_fails_when_id_is_not_an_integer() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method("GET").path("/users/airbnb/repos");
                then.status(200)
                    .json_body(json!([{ "id": "1", "name": "javascript", "description": null }]));
            })
            .await;
        let service = build_service(&server.base_url());

        let error = service
            .fetch_repositories("airbnb")
            .await
            .expect_err("String id should fail decoding");

        assert!(matches!(error, ApiError::Network(NetworkError::Decode(_))));
    }

    #[tokio::test]
    async fn fetch_repositories_passes_not_found_through() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method("GET").path("/users/airbnb/repos");
                then.status(404);
            })
            .await;
        let service = build_service(&server.base_url());

        let error = service
            .fetch_repositories("airbnb")
            .await
            .expect_err("Not found should be an error");

        assert!(matches!(
            error,
            ApiError::Network(NetworkError::HttpStatus { status: 404, .. })
        ));
    }
}
