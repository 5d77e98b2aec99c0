mod service;
mod source;

pub use service::*;
pub use source::*;
