//! Public distribution of a container through the CDN endpoint.

use rackfs_core::entry::Headers;
use rackfs_shared::{StoreError, StoreResult};
use tracing::info;

use crate::adapter::CloudFilesAdapter;
use crate::transport::{HttpMethod, HttpTransport};

/// Time-to-live for CDN-cached objects, in seconds (one week).
pub const CDN_TTL_SECS: u32 = 604_800;

/// Header holding the container's public base URI.
pub const CDN_URI_HEADER: &str = "X-Cdn-Uri";

impl<T: HttpTransport> CloudFilesAdapter<T> {
    fn cdn_container_url(&self) -> StoreResult<String> {
        let endpoint = self
            .endpoints
            .cdn
            .as_deref()
            .ok_or_else(|| StoreError::endpoint_not_configured("cdn"))?;
        Ok(format!(
            "{}/{}",
            endpoint.trim_end_matches('/'),
            self.encoded_container()?
        ))
    }

    /// Enable public distribution of the container.
    ///
    /// # Errors
    ///
    /// Returns `EndpointNotConfigured` without a CDN endpoint, or the
    /// transport error of the PUT.
    pub fn enable_cdn(&self) -> StoreResult<()> {
        let request = self
            .authorized(HttpMethod::Put, self.cdn_container_url()?)
            .with_header("X-CDN-Enabled", "True")
            .with_header("X-TTL", CDN_TTL_SECS.to_string());

        let container = self.container_name().unwrap_or_default();
        self.send(request, container)?;
        info!(container, ttl = CDN_TTL_SECS, "CDN distribution enabled");
        Ok(())
    }

    /// Public CDN URL of an object.
    ///
    /// # Errors
    ///
    /// Returns `EndpointNotConfigured` without a CDN endpoint, `NotFound` if
    /// the container is not CDN-enabled, and `MalformedResponse` if the
    /// response lacks the `X-Cdn-Uri` header.
    pub fn public_url(&self, path: &str) -> StoreResult<String> {
        let request = self.authorized(HttpMethod::Head, self.cdn_container_url()?);
        let response = self.send(request, self.container_name().unwrap_or_default())?;

        let base = response
            .header(CDN_URI_HEADER)
            .ok_or_else(|| StoreError::malformed("missing X-Cdn-Uri header"))?;

        Ok(format!(
            "{}/{}",
            base.trim_end_matches('/'),
            self.codec().apply_prefix(path)
        ))
    }
}
