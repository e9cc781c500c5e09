//! Common utilities shared across services and binaries.
//!
//! This crate provides:
//! - Unified application error handling
//! - Configuration structures
//! - Tracing setup

pub mod config;
pub mod error;
pub mod telemetry;

pub use config::*;
pub use error::{AppError, AppResult, OptionExt};
