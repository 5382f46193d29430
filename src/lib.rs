pub mod types;
pub mod error;
pub mod config;
pub mod provider;
pub mod data;
pub mod sheets;
pub mod scheduler;
pub mod time;

pub use types::*;
pub use error::{Result, CollectorError};
