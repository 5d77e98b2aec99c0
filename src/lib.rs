//! Fetches the public repositories of a GitHub user and exposes the fetch
//! lifecycle as observable state with cancellable in-flight requests.

mod infrastructure;
mod interface;
mod model;

pub use infrastructure::*;
pub use interface::*;
pub use model::*;
