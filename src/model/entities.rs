use std::{fmt::Display, ops::Deref};

use serde::Deserialize;

/// The unique identifier of a repository.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RepositoryId(pub u64);

impl Deref for RepositoryId {
    type Target = u64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for RepositoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The name of a repository, never empty.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(try_from = "String")]
pub struct RepositoryName(String);

impl TryFrom<String> for RepositoryName {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Err("repository name must not be empty".to_string());
        }

        Ok(Self(value))
    }
}

impl Deref for RepositoryName {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for RepositoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A public repository owned by a GitHub user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    /// The repository identifier.
    id: RepositoryId,

    /// The name of the repository.
    name: RepositoryName,

    /// The description of the repository, if the owner wrote one.
    description: Option<String>,
}

impl Repository {
    /// Creates a new `Repository` instance.
    ///
    /// Panics if `name` is empty.
    #[cfg(test)]
    pub fn new(id: u64, name: &str, description: Option<&str>) -> Self {
        assert!(!name.is_empty(), "repository name must not be empty");
        Self {
            id: RepositoryId(id),
            name: RepositoryName(name.to_string()),
            description: description.map(|description| description.to_string()),
        }
    }

    pub(crate) fn from_parts(
        id: RepositoryId,
        name: RepositoryName,
        description: Option<String>,
    ) -> Self {
        Self {
            id,
            name,
            description,
        }
    }

    /// Retrieves the repository identifier.
    pub fn id(&self) -> &RepositoryId {
        &self.id
    }

    /// Retrieves the repository name.
    pub fn name(&self) -> &RepositoryName {
        &self.name
    }

    /// Retrieves the repository description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl Display for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Repository: #{}, Name: {}, Description: {}",
            self.id,
            self.name,
            self.description.as_deref().unwrap_or("-")
        )
    }
}
