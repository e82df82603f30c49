//! Shared errors and configuration for rackfs.
//!
//! This crate provides what every other crate needs:
//! - The adapter-wide error taxonomy
//! - Configuration management

pub mod config;
pub mod error;

pub use config::{AppConfig, HttpConfig, IdentityConfig, StorageConfig};
pub use error::{StoreError, StoreResult};
