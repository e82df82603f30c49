//! Endpoint resolution from the service catalog.

use crate::identity::CatalogService;

/// Catalog name of the CDN management service.
pub const CDN_SERVICE_NAME: &str = "cloudFilesCDN";

/// Object store and CDN endpoints selected for one region.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Endpoints {
    /// Primary object store endpoint.
    pub storage: Option<String>,
    /// CDN management endpoint.
    pub cdn: Option<String>,
}

impl Endpoints {
    /// Scan `catalog` once for `service_name` and the CDN service in `region`.
    ///
    /// When the catalog lists the same service and region more than once,
    /// the last entry wins.
    #[must_use]
    pub fn resolve(catalog: &[CatalogService], service_name: &str, region: &str) -> Self {
        let mut endpoints = Self::default();

        for service in catalog {
            let last_in_region = || {
                service
                    .endpoints
                    .iter()
                    .filter(|e| e.region.as_deref() == Some(region))
                    .filter_map(|e| e.public_url.clone())
                    .last()
            };

            if service.name == service_name
                && let Some(url) = last_in_region()
            {
                endpoints.storage = Some(url);
            }
            if service.name == CDN_SERVICE_NAME
                && let Some(url) = last_in_region()
            {
                endpoints.cdn = Some(url);
            }
        }

        endpoints
    }
}
