//! Rackspace Cloud Files backend for rackfs.
//!
//! Authenticates once against the identity service, resolves the object
//! store endpoint for a region from the service catalog and then maps every
//! [`StorageAdapter`](rackfs_core::StorageAdapter) call onto the object
//! store's HTTP API.
//!
//! # Modules
//!
//! - `adapter` - The storage adapter itself
//! - `cdn` - CDN enablement and public URLs
//! - `endpoint` - Service catalog lookup
//! - `identity` - Token authentication
//! - `transport` - HTTP seam and its `reqwest` implementation

pub mod adapter;
pub mod cdn;
pub mod endpoint;
pub mod identity;
pub mod transport;

pub use adapter::CloudFilesAdapter;
pub use endpoint::Endpoints;
pub use identity::{Credentials, Session};
pub use transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
