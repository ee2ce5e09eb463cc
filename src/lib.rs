pub mod config;
pub mod error;
pub mod probe;
pub mod record;
pub mod runner;

pub mod kafka;

pub use config::Config;
pub use error::{Error, Result};
pub use runner::{RunSettings, RunSummary, Runner};
