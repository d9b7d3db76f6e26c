//! Core system foundations
//!
//! Error handling, configuration and logging shared by every generator stage.

pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used items
pub use config::{Config, HashConfig, LoggingConfig, MethodEntry, OutputConfig};
pub use error::{ConstructionError, Error, Result, ValidationError};
