//! Core translation logic for rackfs.
//!
//! This crate contains everything that does not touch the network: the
//! storage abstraction, the path codec and the rules that turn object store
//! responses into descriptors.
//!
//! # Modules
//!
//! - `adapter` - Storage abstraction trait and write options
//! - `entry` - Descriptors, response normalization, directory emulation
//! - `path` - Per-segment percent-encoding and root prefixes
//! - `mimetype` - Content type inference for uploads

pub mod adapter;
pub mod entry;
pub mod mimetype;
pub mod path;

pub use adapter::{StorageAdapter, Visibility, WriteConfig};
pub use entry::{DIRECTORY_MIME_TYPE, Entry, EntryKind};
pub use path::PathCodec;
