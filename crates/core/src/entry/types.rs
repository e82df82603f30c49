//! Descriptor types returned by the storage abstraction.

use serde::{Deserialize, Serialize};

use crate::path::dirname;

/// Whether an entry is file content or a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Object holding file content.
    File,
    /// Directory marker or implied directory.
    Dir,
}

impl EntryKind {
    /// String form used in listings.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Dir => "dir",
        }
    }
}

/// Descriptor of a stored object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// File or directory.
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// Logical path below the container.
    pub path: String,
    /// Parent of `path`; empty at the root.
    pub dirname: String,
    /// Last modification as a Unix timestamp.
    pub timestamp: Option<i64>,
    /// Primary media type, without parameters.
    pub mimetype: Option<String>,
    /// Size in bytes.
    pub size: Option<u64>,
}

impl Entry {
    /// Directory entry synthesized from path structure alone.
    #[must_use]
    pub fn implied_directory(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            kind: EntryKind::Dir,
            dirname: dirname(&path),
            path,
            timestamp: None,
            mimetype: None,
            size: None,
        }
    }

    /// Returns true for directory entries.
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }

    /// Returns true for file entries.
    #[must_use]
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_implied_directory() {
        let entry = Entry::implied_directory("a/b");
        assert!(entry.is_dir());
        assert!(!entry.is_file());
        assert_eq!(entry.dirname, "a");
        assert_eq!(entry.timestamp, None);
        assert_eq!(entry.size, None);
    }

    #[test]
    fn test_entry_serializes_kind_as_type() {
        let entry = Entry::implied_directory("a");
        let json = serde_json::to_value(&entry).expect("serializable");
        assert_eq!(json["type"], "dir");
        assert_eq!(json["dirname"], "");
        assert_eq!(EntryKind::File.as_str(), "file");
    }
}
