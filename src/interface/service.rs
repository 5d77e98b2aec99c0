use crate::{ApiResult, Repository};

/// A trait for fetching the repositories of a user from a remote API.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RepositoryService: Sync + Send {
    /// Fetches the repositories owned by `username`, in server order.
    async fn fetch_repositories(&self, username: &str) -> ApiResult<Vec<Repository>>;
}
