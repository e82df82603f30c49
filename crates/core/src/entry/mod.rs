//! Stored object descriptors and the rules that derive them.
//!
//! Descriptors are rebuilt from every HTTP response; nothing here is cached.

mod emulate;
mod normalize;
mod types;

pub use emulate::emulate_directories;
pub use normalize::{DIRECTORY_MIME_TYPE, Headers, ObjectInfo, parse_listing, parse_timestamp};
pub use types::{Entry, EntryKind};
