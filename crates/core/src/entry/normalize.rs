//! Response normalization.
//!
//! Two inputs produce descriptors: the headers of a single-object response and
//! the entries of a JSON listing. Both are first read into [`ObjectInfo`] and
//! then normalized against the location they were requested for.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDateTime};
use rackfs_shared::{StoreError, StoreResult};
use serde::Deserialize;

use super::types::{Entry, EntryKind};
use crate::path::{PathCodec, dirname, encode_segments, join_location};

/// Content type that marks an object as a directory.
pub const DIRECTORY_MIME_TYPE: &str = "application/directory";

/// Listing timestamps, e.g. `2024-03-01T10:15:30.123456`.
const LISTING_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Obsolete HTTP-date forms: RFC 850 and asctime.
const OBSOLETE_HTTP_DATE_FORMATS: [&str; 2] =
    ["%A, %d-%b-%y %H:%M:%S GMT", "%a %b %d %H:%M:%S %Y"];

/// Case-insensitive access to response headers.
pub trait Headers {
    /// Value of the first header named `name`, ignoring case.
    fn header(&self, name: &str) -> Option<&str>;
}

impl Headers for HashMap<String, String> {
    fn header(&self, name: &str) -> Option<&str> {
        self.iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Raw object attributes as reported by the object store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ObjectInfo {
    /// Name relative to the listed directory; absent for single objects.
    #[serde(default)]
    pub name: Option<String>,
    /// Raw content type, parameters included.
    pub content_type: String,
    /// HTTP-date or listing timestamp.
    pub last_modified: String,
    /// Size in bytes.
    #[serde(default)]
    pub bytes: Option<u64>,
}

impl ObjectInfo {
    /// Read object attributes from single-object response headers.
    ///
    /// # Errors
    ///
    /// Returns `MalformedResponse` if `Content-Type` or `Last-Modified` is
    /// missing, or `Content-Length` is not a number.
    pub fn from_headers(headers: &impl Headers) -> StoreResult<Self> {
        let content_type = headers
            .header("Content-Type")
            .ok_or_else(|| StoreError::malformed("missing Content-Type header"))?;
        let last_modified = headers
            .header("Last-Modified")
            .ok_or_else(|| StoreError::malformed("missing Last-Modified header"))?;
        let bytes = headers
            .header("Content-Length")
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .map_err(|_| StoreError::malformed(format!("invalid Content-Length '{raw}'")))
            })
            .transpose()?;

        Ok(Self {
            name: None,
            content_type: content_type.to_string(),
            last_modified: last_modified.to_string(),
            bytes,
        })
    }

    /// Build a descriptor for this object.
    ///
    /// `location` is the encoded, prefixed location that was requested. A
    /// listing entry's `name` is appended to it; without a name the location
    /// itself identifies the object.
    ///
    /// # Errors
    ///
    /// Returns `MalformedResponse` for an unparseable timestamp and
    /// `InvalidPath` for a location that cannot be decoded.
    pub fn normalize(&self, location: &str, codec: &PathCodec) -> StoreResult<Entry> {
        let location = match &self.name {
            Some(name) => join_location(location, &encode_segments(name)),
            None => location.to_string(),
        };
        let path = codec.remove_prefix(&location)?;

        let mut parts = self.content_type.split("; ");
        let mimetype = parts.next().unwrap_or_default().to_string();
        let kind = if mimetype == DIRECTORY_MIME_TYPE || parts.any(|p| p == DIRECTORY_MIME_TYPE) {
            EntryKind::Dir
        } else {
            EntryKind::File
        };

        Ok(Entry {
            kind,
            dirname: dirname(&path),
            path,
            timestamp: Some(parse_timestamp(&self.last_modified)?),
            mimetype: (!mimetype.is_empty()).then_some(mimetype),
            size: self.bytes,
        })
    }
}

/// Parse a JSON listing body.
///
/// An empty body is an empty listing.
///
/// # Errors
///
/// Returns `MalformedResponse` if the body is not a JSON array of objects.
pub fn parse_listing(body: &[u8]) -> StoreResult<Vec<ObjectInfo>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    serde_json::from_slice(body).map_err(|e| StoreError::malformed(format!("invalid listing: {e}")))
}

/// Convert an HTTP-date (or listing timestamp, read as UTC) to Unix time.
///
/// All three HTTP-date forms are accepted: IMF-fixdate, RFC 850 and asctime.
///
/// # Errors
///
/// Returns `MalformedResponse` if no format matches.
pub fn parse_timestamp(raw: &str) -> StoreResult<i64> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc2822(raw) {
        return Ok(parsed.timestamp());
    }

    // asctime pads single-digit days with a space
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    std::iter::once(LISTING_TIMESTAMP_FORMAT)
        .chain(OBSOLETE_HTTP_DATE_FORMATS)
        .find_map(|format| NaiveDateTime::parse_from_str(&collapsed, format).ok())
        .map(|naive| naive.and_utc().timestamp())
        .ok_or_else(|| StoreError::malformed(format!("invalid timestamp '{raw}'")))
}
