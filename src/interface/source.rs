use crate::{ApiResult, Repository};

/// A trait giving access to the repositories of a user, whatever their origin.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RepositorySource: Sync + Send {
    /// Retrieves the repositories owned by `username`.
    async fn get_user_repositories(&self, username: &str) -> ApiResult<Vec<Repository>>;
}
