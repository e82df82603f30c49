//! The storage abstraction implemented by remote adapters.

use std::io::{Cursor, Read};

use bytes::Bytes;
use rackfs_shared::{StoreError, StoreResult};
use tracing::warn;

use super::config::WriteConfig;
use crate::entry::Entry;

/// Object visibility. Stores without ACLs reject both values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Readable by anyone.
    Public,
    /// Readable only with credentials.
    Private,
}

/// Filesystem-like verbs over an object store.
///
/// Implementors provide the operations with store-specific behaviour. Streams,
/// copying, the metadata shorthands and visibility come with defaults.
///
/// Boolean operations report failure as `false`; data-returning operations
/// return a typed error, with `NotFound` for absent objects.
pub trait StorageAdapter {
    /// Write a new object.
    fn write(&self, path: &str, contents: &[u8], config: &WriteConfig) -> StoreResult<Entry>;

    /// Overwrite an object, always resetting its content type.
    fn update(&self, path: &str, contents: &[u8], config: &WriteConfig) -> StoreResult<Entry>;

    /// Read an object's content.
    fn read(&self, path: &str) -> StoreResult<Bytes>;

    /// Move an object. The source is kept if the copy step fails.
    fn rename(&self, path: &str, new_path: &str) -> bool;

    /// Delete an object.
    fn delete(&self, path: &str) -> bool;

    /// Delete a directory marker.
    fn delete_dir(&self, dirname: &str) -> bool;

    /// Create a directory marker.
    fn create_dir(&self, dirname: &str, config: &WriteConfig) -> StoreResult<Entry>;

    /// Whether an object exists. Every failure counts as absent.
    fn has(&self, path: &str) -> bool;

    /// List a directory, including implied parent directories.
    fn list_contents(&self, directory: &str) -> StoreResult<Vec<Entry>>;

    /// Fetch an object's descriptor.
    fn get_metadata(&self, path: &str) -> StoreResult<Entry>;

    /// Write a new object from a reader.
    fn write_stream(
        &self,
        path: &str,
        reader: &mut dyn Read,
        config: &WriteConfig,
    ) -> StoreResult<Entry> {
        let contents = drain(reader)?;
        self.write(path, &contents, config)
    }

    /// Overwrite an object from a reader.
    fn update_stream(
        &self,
        path: &str,
        reader: &mut dyn Read,
        config: &WriteConfig,
    ) -> StoreResult<Entry> {
        let contents = drain(reader)?;
        self.update(path, &contents, config)
    }

    /// Read an object as a stream.
    fn read_stream(&self, path: &str) -> StoreResult<Box<dyn Read + Send>> {
        let contents = self.read(path)?;
        Ok(Box::new(Cursor::new(contents)))
    }

    /// Copy an object by streaming it through the client.
    fn copy(&self, path: &str, new_path: &str) -> bool {
        let copied = self.read_stream(path).and_then(|mut reader| {
            self.write_stream(new_path, reader.as_mut(), &WriteConfig::default())
        });
        match copied {
            Ok(_) => true,
            Err(err) => {
                warn!(path, new_path, error = %err, "copy failed");
                false
            }
        }
    }

    /// Size of an object; shares the metadata fetch.
    fn get_size(&self, path: &str) -> StoreResult<Entry> {
        self.get_metadata(path)
    }

    /// Mimetype of an object; shares the metadata fetch.
    fn get_mimetype(&self, path: &str) -> StoreResult<Entry> {
        self.get_metadata(path)
    }

    /// Timestamp of an object; shares the metadata fetch.
    fn get_timestamp(&self, path: &str) -> StoreResult<Entry> {
        self.get_metadata(path)
    }

    /// Visibility is not supported.
    fn get_visibility(&self, _path: &str) -> StoreResult<Entry> {
        Err(StoreError::unsupported("get_visibility"))
    }

    /// Visibility is not supported.
    fn set_visibility(&self, _path: &str, _visibility: Visibility) -> StoreResult<Entry> {
        Err(StoreError::unsupported("set_visibility"))
    }
}

fn drain(reader: &mut dyn Read) -> StoreResult<Vec<u8>> {
    let mut contents = Vec::new();
    reader
        .read_to_end(&mut contents)
        .map_err(|e| StoreError::transport(format!("failed to read stream: {e}")))?;
    Ok(contents)
}

#[cfg(test)]
#[path = "traits_tests.rs"]
mod tests;
