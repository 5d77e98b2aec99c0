mod config;
mod entities;
mod error;
mod load_state;

pub use config::*;
pub use entities::*;
pub use error::*;
pub use load_state::*;
