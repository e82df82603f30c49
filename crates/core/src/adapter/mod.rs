//! Storage abstraction consumed by callers.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       StorageAdapter                         │
//! ├──────────────────────────────────────────────────────────────┤
//! │ write / update / create_dir     │ read / read_stream         │
//! │ rename / delete / delete_dir    │ has / list_contents        │
//! │ get_metadata (+ size/mimetype/timestamp shorthands)          │
//! ├──────────────────────────────────────────────────────────────┤
//! │ defaults: *_stream, copy, visibility (unsupported)           │
//! └──────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod traits;

pub use config::WriteConfig;
pub use traits::{StorageAdapter, Visibility};
