//! Path codec for object locations.
//!
//! Logical paths (`notes/todo.txt`) travel over HTTP with every segment
//! percent-encoded on its own, so separators survive and everything else is
//! URL safe. An optional root prefix roots all paths below a pseudo-directory
//! inside the container.

use rackfs_shared::{StoreError, StoreResult};

/// Encodes logical paths into object locations and back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathCodec {
    /// Encoded prefix, always ending in `/` when present.
    prefix: Option<String>,
}

impl PathCodec {
    /// Create a codec rooted at `prefix`.
    ///
    /// Surrounding slashes are ignored; an empty prefix means no prefix.
    #[must_use]
    pub fn new(prefix: Option<&str>) -> Self {
        let prefix = prefix
            .map(|p| p.trim_matches('/'))
            .filter(|p| !p.is_empty())
            .map(|p| format!("{}/", encode_segments(p)));
        Self { prefix }
    }

    /// The encoded root prefix, if any.
    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Encode a logical path and prepend the root prefix.
    #[must_use]
    pub fn apply_prefix(&self, path: &str) -> String {
        let encoded = encode_segments(path.trim_start_matches('/'));
        match &self.prefix {
            Some(prefix) => format!("{prefix}{encoded}"),
            None => encoded,
        }
    }

    /// Strip the root prefix from a location and decode its segments.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPath` if a segment is not valid percent-encoded UTF-8.
    pub fn remove_prefix(&self, location: &str) -> StoreResult<String> {
        let stripped = self
            .prefix
            .as_deref()
            .and_then(|prefix| location.strip_prefix(prefix))
            .unwrap_or(location);

        stripped
            .split('/')
            .map(|segment| {
                urlencoding::decode(segment)
                    .map(std::borrow::Cow::into_owned)
                    .map_err(|e| StoreError::InvalidPath(format!("{location}: {e}")))
            })
            .collect::<StoreResult<Vec<_>>>()
            .map(|segments| segments.join("/"))
    }
}

/// Percent-encode each `/`-separated segment independently.
#[must_use]
pub fn encode_segments(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Join an encoded name onto an encoded location.
#[must_use]
pub fn join_location(location: &str, name: &str) -> String {
    if location.is_empty() || location.ends_with('/') {
        format!("{location}{name}")
    } else {
        format!("{location}/{name}")
    }
}

/// Parent directory of a logical path; the root is the empty string.
#[must_use]
pub fn dirname(path: &str) -> String {
    path.trim_end_matches('/')
        .rsplit_once('/')
        .map(|(parent, _)| parent.to_string())
        .unwrap_or_default()
}
