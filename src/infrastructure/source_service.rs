use std::sync::Arc;

use crate::{ApiResult, Repository, RepositoryService, RepositorySource};

/// A repository source backed by a remote repository service.
pub struct ServiceRepositorySource {
    service: Arc<dyn RepositoryService>,
}

impl ServiceRepositorySource {
    /// Creates a new `ServiceRepositorySource` instance with the given service.
    pub fn new(service: Arc<dyn RepositoryService>) -> Self {
        Self { service }
    }
}

#[async_trait::async_trait]
impl RepositorySource for ServiceRepositorySource {
    async fn get_user_repositories(&self, username: &str) -> ApiResult<Vec<Repository>> {
        self.service.fetch_repositories(username).await
    }
}
