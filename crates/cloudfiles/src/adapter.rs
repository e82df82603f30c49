//! Cloud Files implementation of the storage abstraction.
//!
//! Each verb becomes exactly one HTTP call (two for `rename`):
//!
//! ```text
//! write/update/create_dir  PUT     {endpoint}/{container}/{path}
//! rename                   COPY    {endpoint}/{container}/{path}  Destination: {container}/{new}
//!                          DELETE  {endpoint}/{container}/{path}
//! delete/delete_dir        DELETE  {endpoint}/{container}/{path}
//! has                      HEAD    {endpoint}/{container}/{path}
//! read/get_metadata        GET     {endpoint}/{container}/{path}
//! list_contents            GET     {endpoint}/{container}/{dir}?format=json
//! ```

use bytes::Bytes;
use rackfs_core::entry::{Headers, ObjectInfo, emulate_directories, parse_listing};
use rackfs_core::path::encode_segments;
use rackfs_core::{DIRECTORY_MIME_TYPE, Entry, PathCodec, StorageAdapter, WriteConfig, mimetype};
use rackfs_shared::{AppConfig, StoreError, StoreResult};
use tracing::{debug, info, warn};

use crate::endpoint::Endpoints;
use crate::identity::{Credentials, IdentityClient, Session};
use crate::transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};

/// Header carrying the session token.
pub const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

/// Metadata header `update` attaches to every overwrite.
pub const UPDATE_METADATA_HEADER: (&str, &str) = ("X-Object-Meta-Some-Key", "some-value");

/// Storage adapter backed by Rackspace Cloud Files.
///
/// Built once per set of credentials. Endpoints and container are selected
/// during single-threaded setup and read-only afterwards.
#[derive(Debug)]
pub struct CloudFilesAdapter<T: HttpTransport = ReqwestTransport> {
    pub(crate) transport: T,
    pub(crate) session: Session,
    pub(crate) endpoints: Endpoints,
    pub(crate) container: Option<String>,
    pub(crate) codec: PathCodec,
}

impl CloudFilesAdapter<ReqwestTransport> {
    /// Authenticate, resolve endpoints and select the container from config.
    ///
    /// # Errors
    ///
    /// Returns `Authentication` if the identity handshake fails and
    /// `EndpointNotConfigured` if the catalog has no object store for the
    /// configured service and region.
    pub fn from_config(config: &AppConfig) -> StoreResult<Self> {
        let transport = ReqwestTransport::from_config(&config.http)?;
        let credentials = Credentials::new(&config.identity.username, &config.identity.api_key);

        let mut adapter = Self::connect(transport, &credentials, config.identity.identity_url())?;
        adapter
            .object_store_service(&config.storage.service_name, &config.storage.region)
            .set_container_name(&config.storage.container)
            .set_path_prefix(config.storage.path_prefix.as_deref());

        adapter.storage_endpoint()?;
        Ok(adapter)
    }
}

impl<T: HttpTransport> CloudFilesAdapter<T> {
    /// Authenticate against the identity service at `identity_url`.
    ///
    /// # Errors
    ///
    /// Returns `Authentication` if the handshake fails. The adapter is not
    /// created in that case.
    pub fn connect(
        transport: T,
        credentials: &Credentials,
        identity_url: &str,
    ) -> StoreResult<Self> {
        let session = IdentityClient::new(&transport, identity_url).authenticate(credentials)?;
        Ok(Self {
            transport,
            session,
            endpoints: Endpoints::default(),
            container: None,
            codec: PathCodec::default(),
        })
    }

    /// Select the object store and CDN endpoints for a service and region.
    pub fn object_store_service(&mut self, service_name: &str, region: &str) -> &mut Self {
        self.endpoints = Endpoints::resolve(self.session.catalog(), service_name, region);
        if self.endpoints.storage.is_none() {
            warn!(service_name, region, "No object store endpoint in catalog");
        }
        info!(
            service_name,
            region,
            storage = ?self.endpoints.storage,
            cdn = ?self.endpoints.cdn,
            "Resolved endpoints"
        );
        self
    }

    /// Set the container all paths are rooted under.
    pub fn set_container_name(&mut self, container: impl Into<String>) -> &mut Self {
        self.container = Some(container.into());
        self
    }

    /// Root all paths below `prefix` inside the container.
    pub fn set_path_prefix(&mut self, prefix: Option<&str>) -> &mut Self {
        self.codec = PathCodec::new(prefix);
        self
    }

    /// Authenticated session.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Resolved endpoints.
    #[must_use]
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Selected container, if any.
    #[must_use]
    pub fn container_name(&self) -> Option<&str> {
        self.container.as_deref()
    }

    /// Path codec in use.
    #[must_use]
    pub fn codec(&self) -> &PathCodec {
        &self.codec
    }

    pub(crate) fn storage_endpoint(&self) -> StoreResult<&str> {
        self.endpoints
            .storage
            .as_deref()
            .ok_or_else(|| StoreError::endpoint_not_configured("object store"))
    }

    pub(crate) fn encoded_container(&self) -> StoreResult<String> {
        self.container
            .as_deref()
            .filter(|c| !c.is_empty())
            .map(encode_segments)
            .ok_or(StoreError::ContainerNotConfigured)
    }

    /// `{endpoint}/{container}[/{location}]`.
    fn object_url(&self, location: &str) -> StoreResult<String> {
        let endpoint = self.storage_endpoint()?.trim_end_matches('/');
        let container = self.encoded_container()?;
        if location.is_empty() {
            Ok(format!("{endpoint}/{container}"))
        } else {
            Ok(format!("{endpoint}/{container}/{location}"))
        }
    }

    /// Request carrying the session token.
    pub(crate) fn authorized(&self, method: HttpMethod, url: String) -> HttpRequest {
        HttpRequest::new(method, url).with_header(AUTH_TOKEN_HEADER, self.session.token())
    }

    /// Send a request and map its status; `path` names the object in errors.
    pub(crate) fn send(&self, request: HttpRequest, path: &str) -> StoreResult<HttpResponse> {
        debug!(method = %request.method, url = %request.url, "Sending request");
        self.transport.send(request)?.error_for_status(path)
    }

    fn put_object(
        &self,
        path: &str,
        contents: &[u8],
        headers: Vec<(String, String)>,
        content_type: Option<String>,
    ) -> StoreResult<Entry> {
        let location = self.codec.apply_prefix(path);
        let mut request = self.authorized(HttpMethod::Put, self.object_url(&location)?);
        request.headers.extend(headers);
        let request = request.with_body(Bytes::copy_from_slice(contents));

        let response = self.send(request, path)?;
        uploaded_entry(&response, contents, content_type)?.normalize(&location, &self.codec)
    }

    fn caller_headers(config: &WriteConfig) -> Vec<(String, String)> {
        config
            .headers()
            .filter(|(name, _)| !name.eq_ignore_ascii_case(AUTH_TOKEN_HEADER))
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }

    fn copy_object(&self, path: &str, new_path: &str) -> StoreResult<()> {
        let url = self.object_url(&self.codec.apply_prefix(path))?;
        let destination = format!(
            "{}/{}",
            self.encoded_container()?,
            self.codec.apply_prefix(new_path)
        );
        let request = self
            .authorized(HttpMethod::Copy, url)
            .with_header("Destination", destination);
        self.send(request, path).map(|_| ())
    }

    fn delete_object(&self, path: &str) -> StoreResult<()> {
        let url = self.object_url(&self.codec.apply_prefix(path))?;
        self.send(self.authorized(HttpMethod::Delete, url), path)
            .map(|_| ())
    }

    fn head_object(&self, path: &str) -> StoreResult<HttpResponse> {
        let url = self.object_url(&self.codec.apply_prefix(path))?;
        self.send(self.authorized(HttpMethod::Head, url), path)
    }

    fn get_object(&self, path: &str) -> StoreResult<HttpResponse> {
        let url = self.object_url(&self.codec.apply_prefix(path))?;
        self.send(self.authorized(HttpMethod::Get, url), path)
    }
}

/// Descriptor source for a completed PUT.
///
/// A PUT response describes its own (empty) body, so size and content type
/// come from what was uploaded; only `Last-Modified` is taken from the store.
/// Without an uploaded content type the store picks one, and the descriptor
/// reports none.
fn uploaded_entry(
    response: &HttpResponse,
    contents: &[u8],
    content_type: Option<String>,
) -> StoreResult<ObjectInfo> {
    let last_modified = response
        .header("Last-Modified")
        .ok_or_else(|| StoreError::malformed("missing Last-Modified header"))?;

    Ok(ObjectInfo {
        name: None,
        content_type: content_type.unwrap_or_default(),
        last_modified: last_modified.to_string(),
        bytes: Some(contents.len() as u64),
    })
}

impl<T: HttpTransport> StorageAdapter for CloudFilesAdapter<T> {
    fn write(&self, path: &str, contents: &[u8], config: &WriteConfig) -> StoreResult<Entry> {
        let mut headers = Self::caller_headers(config);
        let content_type = match config.content_type() {
            Some(content_type) => Some(content_type.to_string()),
            None if contents.is_empty() => None,
            None => {
                let inferred = mimetype::infer(path, contents);
                headers.push(("Content-Type".to_string(), inferred.clone()));
                Some(inferred)
            }
        };

        self.put_object(path, contents, headers, content_type)
    }

    fn update(&self, path: &str, contents: &[u8], config: &WriteConfig) -> StoreResult<Entry> {
        let content_type = mimetype::infer(path, contents);
        let mut headers: Vec<(String, String)> = Self::caller_headers(config)
            .into_iter()
            .filter(|(name, _)| !name.eq_ignore_ascii_case("Content-Type"))
            .collect();
        headers.push(("Content-Type".to_string(), content_type.clone()));
        headers.push((
            UPDATE_METADATA_HEADER.0.to_string(),
            UPDATE_METADATA_HEADER.1.to_string(),
        ));

        self.put_object(path, contents, headers, Some(content_type))
    }

    fn read(&self, path: &str) -> StoreResult<Bytes> {
        self.get_object(path).map(|response| response.body)
    }

    fn rename(&self, path: &str, new_path: &str) -> bool {
        if self.codec.apply_prefix(path) == self.codec.apply_prefix(new_path) {
            return self.has(path);
        }
        if let Err(err) = self.copy_object(path, new_path) {
            warn!(path, new_path, error = %err, "Rename failed at copy; source kept");
            return false;
        }
        self.delete(path)
    }

    fn delete(&self, path: &str) -> bool {
        match self.delete_object(path) {
            Ok(()) => true,
            Err(err) => {
                warn!(path, error = %err, "Delete failed");
                false
            }
        }
    }

    fn delete_dir(&self, dirname: &str) -> bool {
        self.delete(dirname)
    }

    fn create_dir(&self, dirname: &str, config: &WriteConfig) -> StoreResult<Entry> {
        let config = config
            .clone()
            .with_header("Content-Type", DIRECTORY_MIME_TYPE);
        self.write(dirname, b"", &config)
    }

    fn has(&self, path: &str) -> bool {
        match self.head_object(path) {
            Ok(_) => true,
            Err(err) if err.is_not_found() => false,
            Err(err) => {
                warn!(path, error = %err, "Existence check failed");
                false
            }
        }
    }

    /// A directory the store answers with 404 is `NotFound`, not an empty
    /// listing.
    fn list_contents(&self, directory: &str) -> StoreResult<Vec<Entry>> {
        let location = self.codec.apply_prefix(directory.trim_end_matches('/'));
        let url = format!("{}?format=json", self.object_url(&location)?);
        let response = self.send(self.authorized(HttpMethod::Get, url), directory)?;

        let listing = parse_listing(&response.body)?
            .iter()
            .map(|info| info.normalize(&location, &self.codec))
            .collect::<StoreResult<Vec<_>>>()?;

        debug!(directory, entries = listing.len(), "Listed directory");
        Ok(emulate_directories(listing))
    }

    fn get_metadata(&self, path: &str) -> StoreResult<Entry> {
        let location = self.codec.apply_prefix(path);
        let response = self.get_object(path)?;
        ObjectInfo::from_headers(&response)?.normalize(&location, &self.codec)
    }
}

#[cfg(test)]
#[path = "adapter_tests.rs"]
pub(crate) mod tests;
