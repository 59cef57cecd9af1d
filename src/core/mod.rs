//! Planner core module
//!
//! This module contains the core functionality shared by every layer:
//! - Configuration management
//! - Error types and formatting
//! - Plan data types
//! - Utility functions

pub mod config;
pub mod error;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::{AppConfig, MediaConfig, ServiceConfig};
pub use error::{
    DefaultErrorFormatter, ErrorClass, ErrorFormatter, MediaError, PlannerError, Result,
    ServiceError,
};
