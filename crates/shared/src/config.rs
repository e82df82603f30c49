//! Application configuration management.

use std::fmt;

use serde::Deserialize;

/// Identity endpoint for accounts hosted in the US.
pub const US_IDENTITY_ENDPOINT: &str = "https://identity.api.rackspacecloud.com/v2.0/";

/// Identity endpoint for accounts hosted in the UK.
pub const UK_IDENTITY_ENDPOINT: &str = "https://lon.identity.api.rackspacecloud.com/v2.0/";

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Identity (authentication) configuration.
    pub identity: IdentityConfig,
    /// Object store configuration.
    pub storage: StorageConfig,
    /// HTTP client configuration.
    #[serde(default)]
    pub http: HttpConfig,
}

/// Identity configuration.
#[derive(Clone, Deserialize)]
pub struct IdentityConfig {
    /// Account username.
    pub username: String,
    /// Account API key.
    pub api_key: String,
    /// `us`, `uk`, or an explicit identity base URL.
    #[serde(default = "default_identity_endpoint")]
    pub endpoint: String,
}

fn default_identity_endpoint() -> String {
    "us".to_string()
}

impl IdentityConfig {
    /// Resolves the configured endpoint to an identity base URL.
    #[must_use]
    pub fn identity_url(&self) -> &str {
        match self.endpoint.to_ascii_lowercase().as_str() {
            "us" => US_IDENTITY_ENDPOINT,
            "uk" | "lon" => UK_IDENTITY_ENDPOINT,
            _ => &self.endpoint,
        }
    }
}

impl fmt::Debug for IdentityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityConfig")
            .field("username", &self.username)
            .field("api_key", &"[hidden]")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

/// Object store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Service name as it appears in the catalog.
    #[serde(default = "default_service_name")]
    pub service_name: String,
    /// Region code (DFW, IAD, ORD, LON, SYD, HKG).
    pub region: String,
    /// Container all paths are rooted under.
    pub container: String,
    /// Optional prefix applied inside the container.
    #[serde(default)]
    pub path_prefix: Option<String>,
}

fn default_service_name() -> String {
    "cloudFiles".to_string()
}

/// HTTP client configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("RACKFS").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
