use std::fmt::Display;

use super::Repository;

/// An identifier distinguishing successive fetches of a pipeline.
pub type Generation = u64;

/// The lifecycle phase of a repositories fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing has been requested yet.
    #[default]
    Idle,

    /// A request is in flight.
    Loading,

    /// The last request succeeded with the given repositories, in server order.
    Success(Vec<Repository>),

    /// The last request failed with a displayable message.
    Failed(String),
}

impl LoadState {
    /// Whether the state ends a fetch (`Success` or `Failed`).
    pub fn is_terminal(&self) -> bool {
        matches!(self, LoadState::Success(_) | LoadState::Failed(_))
    }
}

impl Display for LoadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadState::Idle => write!(f, "Idle"),
            LoadState::Loading => write!(f, "Loading"),
            LoadState::Success(repositories) => {
                write!(f, "Success: {} repositories", repositories.len())
            }
            LoadState::Failed(message) => write!(f, "Failed: {message}"),
        }
    }
}
