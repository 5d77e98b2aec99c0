mod client_http;
mod presenter_table;
mod service_github;
mod source_service;
mod state_published;
mod viewmodel_repositories;

pub use client_http::*;
pub use presenter_table::*;
pub use service_github::*;
pub use source_service::*;
pub use state_published::*;
pub use viewmodel_repositories::*;
