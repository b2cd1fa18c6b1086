pub mod api;
pub mod args;
pub mod commands;
mod config;
mod error;
pub mod model;
mod report;
pub mod store;
mod utils;

pub use config::Config;
pub use error::Error;
pub use error::ErrorType;
pub use error::Result;
