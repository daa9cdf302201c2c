//! Shared types, errors, and configuration for Tally.
//!
//! This crate provides common types used across all other crates:
//! - Lenient decimal parsing for form-style amount fields
//! - Typed IDs for backend entity references
//! - List/pagination envelopes matching the REST backend
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
