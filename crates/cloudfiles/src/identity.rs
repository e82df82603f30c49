//! Identity client.
//!
//! One POST to `{identity}/tokens` exchanges a username and API key for an
//! access token and the service catalog. There is no refresh: an expired
//! token makes every later call fail until a new adapter is built.

use std::fmt;

use rackfs_shared::{StoreError, StoreResult};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::transport::{HttpMethod, HttpRequest, HttpTransport};

/// Account credentials. Only used for the authentication call.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    api_key: String,
}

impl Credentials {
    /// Create credentials from a username and API key.
    #[must_use]
    pub fn new(username: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            api_key: api_key.into(),
        }
    }

    /// Account username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    fn to_request_body(&self) -> serde_json::Value {
        json!({
            "auth": {
                "RAX-KSKEY:apiKeyCredentials": {
                    "username": self.username,
                    "apiKey": self.api_key,
                }
            }
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("api_key", &"[hidden]")
            .finish()
    }
}

/// A named service in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogService {
    /// Service name, e.g. `cloudFiles`.
    pub name: String,
    /// Region-scoped endpoints.
    #[serde(default)]
    pub endpoints: Vec<CatalogEndpoint>,
}

/// One endpoint of a catalog service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogEndpoint {
    /// Region code; global services have none.
    #[serde(default)]
    pub region: Option<String>,
    /// Public URL of the endpoint.
    #[serde(default, rename = "publicURL")]
    pub public_url: Option<String>,
}

/// Authenticated session: token plus service catalog. Immutable once built.
#[derive(Clone)]
pub struct Session {
    token: String,
    catalog: Vec<CatalogService>,
}

impl Session {
    #[cfg(test)]
    pub(crate) fn new(token: impl Into<String>, catalog: Vec<CatalogService>) -> Self {
        Self {
            token: token.into(),
            catalog,
        }
    }

    /// Token sent as `X-Auth-Token` on every request.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Service catalog returned with the token.
    #[must_use]
    pub fn catalog(&self) -> &[CatalogService] {
        &self.catalog
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"[hidden]")
            .field("catalog", &self.catalog)
            .finish()
    }
}

#[derive(Deserialize)]
struct AuthResponse {
    access: Access,
}

#[derive(Deserialize)]
struct Access {
    token: Token,
    #[serde(rename = "serviceCatalog", default)]
    service_catalog: Vec<CatalogService>,
}

#[derive(Deserialize)]
struct Token {
    id: String,
}

/// Performs the authentication handshake.
pub struct IdentityClient<'a, T: HttpTransport> {
    transport: &'a T,
    base_url: &'a str,
}

impl<'a, T: HttpTransport> IdentityClient<'a, T> {
    /// Create a client for the identity service at `base_url`.
    #[must_use]
    pub fn new(transport: &'a T, base_url: &'a str) -> Self {
        Self {
            transport,
            base_url,
        }
    }

    /// URL of the token endpoint.
    #[must_use]
    pub fn tokens_url(&self) -> String {
        if self.base_url.ends_with('/') {
            format!("{}tokens", self.base_url)
        } else {
            format!("{}/tokens", self.base_url)
        }
    }

    /// Exchange credentials for a session.
    ///
    /// # Errors
    ///
    /// Returns `Authentication` on transport failure, a non-2xx status or an
    /// unexpected response body.
    pub fn authenticate(&self, credentials: &Credentials) -> StoreResult<Session> {
        let request = HttpRequest::new(HttpMethod::Post, self.tokens_url())
            .with_header("Content-Type", "application/json")
            .with_header("Accept", "application/json")
            .with_body(credentials.to_request_body().to_string());

        let response = self
            .transport
            .send(request)
            .map_err(|e| StoreError::authentication(e.to_string()))?;

        if !response.is_success() {
            return Err(StoreError::authentication(response.status_line()));
        }

        let parsed: AuthResponse = serde_json::from_slice(&response.body)
            .map_err(|e| StoreError::authentication(format!("unexpected identity response: {e}")))?;

        info!(
            username = credentials.username(),
            services = parsed.access.service_catalog.len(),
            "Authenticated against identity service"
        );

        Ok(Session {
            token: parsed.access.token.id,
            catalog: parsed.access.service_catalog,
        })
    }
}
